//! wm_core: Core types, tokens, chart parameters and integer rounding.
//!
//! This crate is **I/O-free**. It defines stable types/APIs used across the
//! engine (`wm_io`, `wm_algo`, `wm_pipeline`, `wm_report`, `wm_cli`).
//!
//! - Tokens: `ProcedureId`, `PartyName`
//! - Entities: `Procedure`, `PartyVote`, `VoteSelection`, `LocalSelections`
//! - Tallies: `MatchDiffTally` and the first-encounter ordered `PartyTallies`
//! - Chart parameters (`ChartParams`) with domain validation
//! - Integer-first percentage helpers
//!
//! Serialization derives are gated behind `serde` feature.

#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

pub mod entities;
pub mod rounding;
pub mod tally;
pub mod variables;

pub mod errors {
    use core::fmt;

    /// Minimal error set for core-domain validation & parsing.
    #[derive(Clone, Copy, Debug, Eq, PartialEq)]
    pub enum CoreError {
        InvalidToken,
        InvalidPartyName,
        InvalidSelection,
        InvalidColor,
        DomainOutOfRange(&'static str),
    }

    impl fmt::Display for CoreError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            match self {
                CoreError::InvalidToken => write!(f, "invalid token"),
                CoreError::InvalidPartyName => write!(f, "invalid party name"),
                CoreError::InvalidSelection => write!(f, "invalid vote selection"),
                CoreError::InvalidColor => write!(f, "invalid color (expected #rrggbb)"),
                CoreError::DomainOutOfRange(k) => write!(f, "domain out of range: {k}"),
            }
        }
    }

    #[cfg(feature = "std")]
    impl std::error::Error for CoreError {}
}

pub mod tokens {
    //! Identifier types with strict validation on construction.

    use crate::errors::CoreError;
    use alloc::string::{String, ToString};
    use core::fmt;
    use core::str::FromStr;

    #[cfg(feature = "serde")]
    use serde::{Deserialize, Serialize};

    // Backend ids are opaque ("230018", "BT 19/1234"); only length is bounded.
    fn is_procedure_id(s: &str) -> bool {
        (1..=256).contains(&s.chars().count())
    }

    // Party names carry spaces, slashes and umlauts ("BÜNDNIS 90/DIE GRÜNEN").
    fn is_party_name(s: &str) -> bool {
        (1..=128).contains(&s.chars().count()) && !s.chars().any(char::is_control)
    }

    fn verbatim(s: &str) -> &str { s }

    // " SPD" and "SPD" are the same party.
    fn trimmed(s: &str) -> &str { s.trim() }

    macro_rules! def_string_id {
        ($name:ident, $check:ident, $norm:ident, $err:expr) => {
            #[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
            #[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
            #[cfg_attr(feature = "serde", serde(try_from = "String", into = "String"))]
            pub struct $name(String);

            impl $name {
                pub fn as_str(&self) -> &str { &self.0 }
            }

            impl fmt::Display for $name {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
            }

            impl FromStr for $name {
                type Err = CoreError;
                fn from_str(s: &str) -> Result<Self, Self::Err> {
                    let s = $norm(s);
                    if $check(s) { Ok(Self(s.to_string())) } else { Err($err) }
                }
            }

            impl TryFrom<String> for $name {
                type Error = CoreError;
                fn try_from(s: String) -> Result<Self, Self::Error> {
                    if $norm(&s).len() != s.len() {
                        return $norm(&s).parse();
                    }
                    if $check(&s) { Ok(Self(s)) } else { Err($err) }
                }
            }

            impl From<$name> for String {
                fn from(v: $name) -> String { v.0 }
            }

            impl AsRef<str> for $name {
                fn as_ref(&self) -> &str { &self.0 }
            }
        };
    }

    def_string_id!(ProcedureId, is_procedure_id, verbatim, CoreError::InvalidToken);
    def_string_id!(PartyName, is_party_name, trimmed, CoreError::InvalidPartyName);

}

// Convenience re-exports (downstream crates import these from the crate root)
pub use entities::{LocalSelections, LocalVote, PartyVote, Procedure, VoteResults, VoteSelection};
pub use errors::CoreError;
pub use tally::{MatchDiffTally, PartyTallies};
pub use tokens::{PartyName, ProcedureId};
pub use variables::{ChartParams, HexColor};
