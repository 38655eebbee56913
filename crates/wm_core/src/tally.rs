//! Match/diff tallies and the first-encounter ordered party map.

use alloc::collections::BTreeMap;
use alloc::vec::Vec;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::tokens::PartyName;

/// Agreement counts between the user and one party.
///
/// `matches + diffs` is the number of tallied procedures the party voted on.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MatchDiffTally {
    pub matches: u32,
    pub diffs: u32,
}

impl MatchDiffTally {
    #[inline]
    pub fn total(&self) -> u64 {
        u64::from(self.matches) + u64::from(self.diffs)
    }

    /// Count one comparison.
    #[inline]
    pub fn record(&mut self, matched: bool) {
        if matched {
            self.matches = self.matches.saturating_add(1);
        } else {
            self.diffs = self.diffs.saturating_add(1);
        }
    }
}

/// Party → tally map that iterates in **first-encounter** order.
///
/// Entries live in a vector; a key index gives O(log n) presence checks.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct PartyTallies {
    entries: Vec<(PartyName, MatchDiffTally)>,
    index: BTreeMap<PartyName, usize>,
}

impl PartyTallies {
    pub fn new() -> Self { Self::default() }

    /// Tally for `party`, if the party has been seen.
    pub fn get(&self, party: &PartyName) -> Option<&MatchDiffTally> {
        self.index.get(party).map(|&i| &self.entries[i].1)
    }

    /// Mutable tally for `party`, inserting `{0, 0}` at the end when absent.
    pub fn entry_or_default(&mut self, party: &PartyName) -> &mut MatchDiffTally {
        let i = match self.index.get(party) {
            Some(&i) => i,
            None => {
                let i = self.entries.len();
                self.entries.push((party.clone(), MatchDiffTally::default()));
                self.index.insert(party.clone(), i);
                i
            }
        };
        &mut self.entries[i].1
    }

    pub fn len(&self) -> usize { self.entries.len() }

    pub fn is_empty(&self) -> bool { self.entries.is_empty() }

    /// Iterate `(party, tally)` in first-encounter order.
    pub fn iter(&self) -> impl Iterator<Item = (&PartyName, &MatchDiffTally)> + '_ {
        self.entries.iter().map(|(p, t)| (p, t))
    }

    pub fn total_matches(&self) -> u64 {
        self.entries.iter().map(|(_, t)| u64::from(t.matches)).sum()
    }

    pub fn total_diffs(&self) -> u64 {
        self.entries.iter().map(|(_, t)| u64::from(t.diffs)).sum()
    }
}
