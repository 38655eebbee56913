//! Stage 4: legend for the party the user selected in the chart.

use wm_core::{ChartParams, HexColor};

use crate::{AlgoError, RankedParty};

/// One legend row: label, value and fixed display colour.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LegendEntry {
    pub label: String,
    pub value: u32,
    pub color: HexColor,
}

/// `[matches, diffs]` of `ranked[selected]`.
///
/// Callers clamp user-driven indices first (see [`clamp_selection`]).
pub fn select_legend(
    ranked: &[RankedParty],
    selected: usize,
    params: &ChartParams,
) -> Result<[LegendEntry; 2], AlgoError> {
    let party = ranked
        .get(selected)
        .ok_or(AlgoError::IndexOutOfRange { index: selected, len: ranked.len() })?;

    Ok([
        LegendEntry {
            label: params.matches_label.clone(),
            value: party.matches(),
            color: params.matches_color.clone(),
        },
        LegendEntry {
            label: params.diffs_label.clone(),
            value: party.diffs(),
            color: params.diffs_color.clone(),
        },
    ])
}

/// Clamp `index` into `[0, len - 1]`; `None` when there is nothing to select.
#[inline]
pub fn clamp_selection(index: usize, len: usize) -> Option<usize> {
    if len == 0 { None } else { Some(index.min(len - 1)) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ChartValue;

    fn ranked(rows: &[(&str, u32, u32)]) -> Vec<RankedParty> {
        rows.iter()
            .map(|(p, m, d)| RankedParty {
                party: p.parse().unwrap(),
                values: [
                    ChartValue { label: "Übereinstimmungen".into(), value: *m },
                    ChartValue { label: "Differenzen".into(), value: *d },
                ],
            })
            .collect()
    }

    #[test]
    fn top_party_with_fixed_colors() {
        let r = ranked(&[("A", 3, 1), ("B", 1, 3)]);
        let [m, d] = select_legend(&r, 0, &ChartParams::default()).unwrap();
        assert_eq!((m.value, m.color.as_str()), (3, "#f5a623"));
        assert_eq!((d.value, d.color.as_str()), (1, "#b1b3b4"));
        assert_eq!(m.label, "Übereinstimmungen");
        assert_eq!(d.label, "Differenzen");
    }

    #[test]
    fn out_of_range_is_reported() {
        let r = ranked(&[("A", 3, 1), ("B", 1, 3)]);
        let err = select_legend(&r, 2, &ChartParams::default()).unwrap_err();
        assert_eq!(err, AlgoError::IndexOutOfRange { index: 2, len: 2 });
        assert!(select_legend(&[], 0, &ChartParams::default()).is_err());
    }

    #[test]
    fn clamping() {
        assert_eq!(clamp_selection(0, 0), None);
        assert_eq!(clamp_selection(7, 3), Some(2));
        assert_eq!(clamp_selection(1, 3), Some(1));
    }
}
