//! Stage 2: per-party match/diff tallies.
//!
//! A party vote counts as a *match* when the party's `main` stance equals the
//! user's selection for that procedure, otherwise as a *diff*. Entries whose
//! party equals the no-affiliation marker are skipped entirely.

use log::warn;
use wm_core::{LocalSelections, PartyTallies, Procedure, ProcedureId};

use crate::AlgoError;

/// Tallies plus the procedures that had to be skipped.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct TallyOutcome {
    pub tallies: PartyTallies,
    /// Procedures without a local selection, in encounter order.
    pub skipped: Vec<ProcedureId>,
}

/// Fold one procedure into `tallies`.
///
/// Fails with [`AlgoError::Precondition`] (leaving `tallies` untouched) when the
/// user has no selection for the procedure.
pub fn tally_procedure(
    procedure: &Procedure,
    selections: &LocalSelections,
    no_affiliation_marker: &str,
    tallies: &mut PartyTallies,
) -> Result<(), AlgoError> {
    let me = selections
        .get(&procedure.procedure_id)
        .ok_or_else(|| AlgoError::Precondition { procedure_id: procedure.procedure_id.clone() })?;

    for pv in &procedure.vote_results.party_votes {
        if pv.party.as_str() == no_affiliation_marker {
            continue;
        }
        tallies.entry_or_default(&pv.party).record(me == pv.main);
    }
    Ok(())
}

/// Tally every procedure in `matching` (normally the output of
/// [`filter_voted_procedures`](crate::filter_voted_procedures)).
///
/// A procedure without a selection is logged and skipped; the rest still count.
pub fn compute_tallies<'a, I>(
    matching: I,
    selections: &LocalSelections,
    no_affiliation_marker: &str,
) -> TallyOutcome
where
    I: IntoIterator<Item = &'a Procedure>,
{
    let mut out = TallyOutcome::default();
    for procedure in matching {
        if let Err(e) = tally_procedure(procedure, selections, no_affiliation_marker, &mut out.tallies) {
            warn!("skipping procedure: {e}");
            out.skipped.push(procedure.procedure_id.clone());
        }
    }
    out
}
