//! crates/wm_pipeline/src/build_result.rs
//! BUILD_RESULT: shape the aggregation into the canonical `result.json` model
//! and derive its `RES:` id from the canonical body.

use serde::{Deserialize, Serialize};
use wm_core::rounding::{format_tenths, percent_one_decimal_tenths};
use wm_io::{hasher, loader::LoadedContext, IoResult};

use crate::aggregate::AggregateOut;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultDoc {
    pub id: String, // "RES:<hex64>"
    #[serde(flatten)]
    pub body: ResultBody,
}

/// Everything but the id; hashed to produce the id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultBody {
    pub header: HeaderBlock,
    /// No voted procedures: display shows the placeholder instead of a chart.
    pub empty: bool,
    pub chart: Vec<ChartRow>,
    pub selected: Option<usize>,
    pub legend: Option<Vec<LegendRow>>,
    pub note: String,
    pub voted_procedures: Vec<VotedProcedureRow>,
    pub skipped_procedures: Vec<String>,
    pub totals: TotalsBlock,
    pub inputs: InputsBlock,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderBlock {
    pub total_procedures: u64,
    pub voted_procedures_count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartRow {
    pub party: String,
    pub values: Vec<ValueRow>, // [matches, diffs]
    pub agreement_pct_1dp: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueRow {
    pub label: String,
    pub value: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegendRow {
    pub label: String,
    pub value: u32,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VotedProcedureRow {
    pub procedure_id: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub title: Option<String>,
}

/// Sums across all parties; overall agreement over every counted party vote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TotalsBlock {
    pub matches: u64,
    pub diffs: u64,
    pub agreement_pct_1dp: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputsBlock {
    pub voted_procedures_sha256: String,
    pub local_votes_sha256: String,
    pub chart_params_sha256: String,
}

pub fn build_result(ctx: &LoadedContext, agg: &AggregateOut<'_>) -> IoResult<ResultDoc> {
    let chart: Vec<ChartRow> = agg
        .ranked
        .iter()
        .map(|p| ChartRow {
            party: p.party.to_string(),
            values: p
                .values
                .iter()
                .map(|v| ValueRow { label: v.label.clone(), value: v.value })
                .collect(),
            agreement_pct_1dp: p.agreement_tenths().map(format_tenths),
        })
        .collect();

    let legend = agg.legend.as_ref().map(|entries| {
        entries
            .iter()
            .map(|e| LegendRow { label: e.label.clone(), value: e.value, color: e.color.to_string() })
            .collect()
    });

    let matches: u64 = agg.ranked.iter().map(|p| u64::from(p.matches())).sum();
    let diffs: u64 = agg.ranked.iter().map(|p| u64::from(p.diffs())).sum();

    let body = ResultBody {
        header: HeaderBlock {
            total_procedures: ctx.voted.total,
            voted_procedures_count: agg.matching.len() as u64,
        },
        empty: agg.matching.is_empty(),
        chart,
        selected: agg.selected,
        legend,
        note: ctx.params.note.clone(),
        voted_procedures: agg
            .matching
            .iter()
            .map(|p| VotedProcedureRow { procedure_id: p.procedure_id.to_string(), title: p.title.clone() })
            .collect(),
        skipped_procedures: agg.skipped.iter().map(|id| id.to_string()).collect(),
        totals: TotalsBlock {
            matches,
            diffs,
            agreement_pct_1dp: percent_one_decimal_tenths(matches, matches + diffs).map(format_tenths),
        },
        inputs: InputsBlock {
            voted_procedures_sha256: ctx.digests.voted_procedures_sha256.clone(),
            local_votes_sha256: ctx.digests.local_votes_sha256.clone(),
            chart_params_sha256: ctx.digests.chart_params_sha256.clone(),
        },
    };

    let id = hasher::res_id_from_canonical(&body)?;
    Ok(ResultDoc { id, body })
}
