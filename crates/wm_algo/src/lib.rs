// crates/wm_algo/src/lib.rs
#![forbid(unsafe_code)]

//! VoteMatchAggregator: compares the user's local selections with official
//! party stances and turns the comparison into chart-ready data.
//!
//! Stages (all pure, synchronous, input-preserving):
//! 1. [`filter_voted_procedures`]: keep procedures the user voted on
//! 2. [`compute_tallies`]: per-party match/diff counts
//! 3. [`rank`]: stable descending order by matches
//! 4. [`select_legend`]: two-entry legend for the selected party

use core::fmt;

// Core types come from wm_core
pub use wm_core::{
    ChartParams, LocalSelections, MatchDiffTally, PartyName, PartyTallies, Procedure,
    ProcedureId, VoteSelection,
};

pub mod filter;
pub mod legend;
pub mod rank;
pub mod tally;

pub use filter::filter_voted_procedures;
pub use legend::{clamp_selection, select_legend, LegendEntry};
pub use rank::{rank, ChartValue, RankedParty};
pub use tally::{compute_tallies, tally_procedure, TallyOutcome};

// ----------------------------- Errors ------------------------------------------------

/// Contract violations raised by the aggregator. Both are programmer errors.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum AlgoError {
    /// A procedure reached tally computation without a local selection.
    Precondition { procedure_id: ProcedureId },
    /// `select_legend` was called with `index >= len`.
    IndexOutOfRange { index: usize, len: usize },
}

impl fmt::Display for AlgoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AlgoError::Precondition { procedure_id } => {
                write!(f, "no local selection for procedure {procedure_id}")
            }
            AlgoError::IndexOutOfRange { index, len } => {
                write!(f, "selected index {index} out of range (len {len})")
            }
        }
    }
}

impl std::error::Error for AlgoError {}
