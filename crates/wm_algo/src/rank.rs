//! Stage 3: ranking for chart display.

use wm_core::rounding::percent_one_decimal_tenths;
use wm_core::{ChartParams, PartyName, PartyTallies};

/// One labelled bar segment.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ChartValue {
    pub label: String,
    pub value: u32,
}

/// A party with `values == [matches, diffs]`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RankedParty {
    pub party: PartyName,
    pub values: [ChartValue; 2],
}

impl RankedParty {
    #[inline]
    pub fn matches(&self) -> u32 { self.values[0].value }

    #[inline]
    pub fn diffs(&self) -> u32 { self.values[1].value }

    /// Share of matches in tenths of a percent; `None` if the party has no votes.
    pub fn agreement_tenths(&self) -> Option<u32> {
        let m = u64::from(self.matches());
        percent_one_decimal_tenths(m, m + u64::from(self.diffs()))
    }
}

/// Order parties by descending `matches`.
///
/// `sort_by` is stable, so equal match counts keep the tallies' first-encounter
/// order.
pub fn rank(tallies: &PartyTallies, params: &ChartParams) -> Vec<RankedParty> {
    let mut out: Vec<RankedParty> = tallies
        .iter()
        .map(|(party, t)| RankedParty {
            party: party.clone(),
            values: [
                ChartValue { label: params.matches_label.clone(), value: t.matches },
                ChartValue { label: params.diffs_label.clone(), value: t.diffs },
            ],
        })
        .collect();
    out.sort_by(|a, b| b.matches().cmp(&a.matches()));
    out
}
