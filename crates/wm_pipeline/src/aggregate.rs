//! crates/wm_pipeline/src/aggregate.rs
//! AGGREGATE stage: filter → tally → rank → legend over a loaded context.
//! Pure; delegates all math to `wm_algo`.

use log::{debug, warn};
use wm_algo::{
    clamp_selection, compute_tallies, filter_voted_procedures, rank, select_legend, AlgoError,
    LegendEntry, RankedParty,
};
use wm_core::{Procedure, ProcedureId};
use wm_io::loader::LoadedContext;

/// Everything downstream stages need from the aggregation.
#[derive(Clone, Debug)]
pub struct AggregateOut<'a> {
    /// Procedures the user voted on, in input order.
    pub matching: Vec<&'a Procedure>,
    pub ranked: Vec<RankedParty>,
    /// Clamped selection; `None` when the chart is empty.
    pub selected: Option<usize>,
    pub legend: Option<[LegendEntry; 2]>,
    pub skipped: Vec<ProcedureId>,
}

pub fn aggregate(ctx: &LoadedContext, requested: usize) -> Result<AggregateOut<'_>, AlgoError> {
    let params = &ctx.params;
    let matching = filter_voted_procedures(&ctx.voted.procedures, &ctx.selections);
    let outcome = compute_tallies(matching.iter().copied(), &ctx.selections, &params.no_affiliation_marker);
    let ranked = rank(&outcome.tallies, params);
    debug!(
        "aggregate: {} voted procedure(s), {} part(y/ies), {} skipped",
        matching.len(),
        ranked.len(),
        outcome.skipped.len()
    );

    let selected = clamp_selection(requested, ranked.len());
    if let Some(s) = selected {
        if s != requested {
            warn!("selected index {requested} clamped to {s} ({} parties)", ranked.len());
        }
    }
    let legend = match selected {
        Some(s) => Some(select_legend(&ranked, s, params)?),
        None => None,
    };

    Ok(AggregateOut { matching, ranked, selected, legend, skipped: outcome.skipped })
}
