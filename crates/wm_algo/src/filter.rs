//! Stage 1: keep only procedures the user has a local selection for.

use wm_core::{LocalSelections, Procedure};

/// Procedures from `all` that have an entry in `selections`, in input order.
///
/// Returns borrowed references; `all` is never modified.
pub fn filter_voted_procedures<'a>(
    all: &'a [Procedure],
    selections: &LocalSelections,
) -> Vec<&'a Procedure> {
    if selections.is_empty() {
        return Vec::new();
    }
    all.iter()
        .filter(|p| selections.contains(&p.procedure_id))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use wm_core::{ProcedureId, VoteResults, VoteSelection};

    fn proc_(id: &str) -> Procedure {
        Procedure {
            procedure_id: id.parse().unwrap(),
            title: None,
            vote_results: VoteResults::default(),
        }
    }

    fn pid(s: &str) -> ProcedureId { s.parse().unwrap() }

    #[test]
    fn empty_selections_yield_nothing() {
        let all: Vec<Procedure> = (0..50).map(|i| proc_(&i.to_string())).collect();
        let got = filter_voted_procedures(&all, &LocalSelections::default());
        assert!(got.is_empty());
    }

    #[test]
    fn keeps_input_order_not_selection_order() {
        let all = vec![proc_("c"), proc_("a"), proc_("b"), proc_("d")];
        let sel: LocalSelections = [
            (pid("b"), VoteSelection::Yes),
            (pid("c"), VoteSelection::No),
            (pid("zzz"), VoteSelection::No),
        ]
        .into_iter()
        .collect();

        let got: Vec<&str> = filter_voted_procedures(&all, &sel)
            .iter()
            .map(|p| p.procedure_id.as_str())
            .collect();
        assert_eq!(got, vec!["c", "b"]);
    }
}
