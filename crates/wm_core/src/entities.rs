//! Domain entities: procedures, party votes and the user's local selections.
//!
//! Wire names follow the GraphQL shape consumed by the app (`procedureId`,
//! `voteResults.partyVotes`, `votesSelectionLocal`), hence `camelCase` renames.

use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;
use core::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::errors::CoreError;
use crate::tokens::{PartyName, ProcedureId};

/// A recorded stance on a procedure, used both for the user and for parties.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum VoteSelection {
    Yes,
    No,
    Abstination,
    Notvoted,
}

impl VoteSelection {
    pub fn as_str(&self) -> &'static str {
        match self {
            VoteSelection::Yes => "YES",
            VoteSelection::No => "NO",
            VoteSelection::Abstination => "ABSTINATION",
            VoteSelection::Notvoted => "NOTVOTED",
        }
    }
}

impl fmt::Display for VoteSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VoteSelection {
    type Err = CoreError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "YES" => Ok(VoteSelection::Yes),
            "NO" => Ok(VoteSelection::No),
            "ABSTINATION" => Ok(VoteSelection::Abstination),
            "NOTVOTED" => Ok(VoteSelection::Notvoted),
            _ => Err(CoreError::InvalidSelection),
        }
    }
}

/// A party's principal recorded stance on one procedure.
#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PartyVote {
    pub party: PartyName,
    pub main: VoteSelection,
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct VoteResults {
    #[cfg_attr(feature = "serde", serde(default))]
    pub party_votes: Vec<PartyVote>,
}

/// A parliamentary voting matter with its official per-party outcomes.
#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Procedure {
    pub procedure_id: ProcedureId,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub title: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub vote_results: VoteResults,
}

/// One raw entry of the locally persisted vote list.
#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct LocalVote {
    pub procedure_id: ProcedureId,
    pub selection: VoteSelection,
}

/// The user's selections keyed by procedure.
///
/// Built from the raw list with first-entry-wins semantics; later duplicates
/// are remembered in `duplicates` so callers can report them.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct LocalSelections {
    by_id: BTreeMap<ProcedureId, VoteSelection>,
    duplicates: Vec<ProcedureId>,
}

impl LocalSelections {
    pub fn from_votes(votes: &[LocalVote]) -> Self {
        let mut out = LocalSelections::default();
        for v in votes {
            if out.by_id.contains_key(&v.procedure_id) {
                out.duplicates.push(v.procedure_id.clone());
            } else {
                out.by_id.insert(v.procedure_id.clone(), v.selection);
            }
        }
        out
    }

    /// Selection recorded for `id`, if any.
    #[inline]
    pub fn get(&self, id: &ProcedureId) -> Option<VoteSelection> {
        self.by_id.get(id).copied()
    }

    #[inline]
    pub fn contains(&self, id: &ProcedureId) -> bool {
        self.by_id.contains_key(id)
    }

    pub fn len(&self) -> usize { self.by_id.len() }

    pub fn is_empty(&self) -> bool { self.by_id.is_empty() }

    /// Procedure ids that appeared more than once in the raw list (ignored).
    pub fn duplicates(&self) -> &[ProcedureId] { &self.duplicates }

    /// Iterate selections in ascending procedure id order.
    pub fn iter(&self) -> impl Iterator<Item = (&ProcedureId, VoteSelection)> + '_ {
        self.by_id.iter().map(|(k, v)| (k, *v))
    }
}

impl FromIterator<(ProcedureId, VoteSelection)> for LocalSelections {
    fn from_iter<I: IntoIterator<Item = (ProcedureId, VoteSelection)>>(it: I) -> Self {
        let votes: Vec<LocalVote> = it
            .into_iter()
            .map(|(procedure_id, selection)| LocalVote { procedure_id, selection })
            .collect();
        LocalSelections::from_votes(&votes)
    }
}
