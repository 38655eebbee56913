//! wm_report/src/lib.rs: Pure offline report model + renderers (JSON/HTML).
//!
//! Determinism rules:
//! - No network, no I/O here. Callers supply the result artifact in memory.
//! - Percent strings come precomputed from the result; bar widths use
//!   integer tenths only.
//! - Stable section order and field names.
//!
//! Inputs are accepted as JSON values (`serde_json::Value`) to avoid tight
//! coupling with wm_pipeline concrete types.

#![deny(unsafe_code)]

use std::fmt;

use serde_json::Value;
use wm_core::variables::{DEFAULT_DIFFS_COLOR, DEFAULT_DIFFS_LABEL, DEFAULT_MATCHES_COLOR, DEFAULT_MATCHES_LABEL};

#[cfg(feature = "render_html")]
pub mod render_html;
#[cfg(feature = "render_json")]
pub mod render_json;

/// The canonical `result.json` as parsed JSON.
pub type ResultArtifact = Value;

// ===== Errors =====
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportError {
    MissingField(&'static str),
    Inconsistent(&'static str),
}

impl fmt::Display for ReportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportError::MissingField(p) => write!(f, "missing field {p}"),
            ReportError::Inconsistent(m) => write!(f, "inconsistent result: {m}"),
        }
    }
}

impl std::error::Error for ReportError {}

// ===== Model =====
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReportModel {
    pub header: SectionHeader,
    pub chart: SectionChart,
    pub procedures: Vec<ProcedureLine>,
    pub note: String,
    pub integrity: SectionIntegrity,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SectionHeader {
    pub total_procedures: u64,
    pub voted_procedures_count: u64,
    pub empty: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SectionChart {
    pub matches_label: String,
    pub diffs_label: String,
    pub matches_color: String,
    pub diffs_color: String,
    pub parties: Vec<PartyLine>,
    pub selected: Option<usize>,
    pub legend: Option<[LegendLine; 2]>,
    pub overall_agreement_pct: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PartyLine {
    pub party: String,
    pub matches: u64,
    pub diffs: u64,
    pub agreement_pct: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LegendLine {
    pub label: String,
    pub value: u64,
    pub color: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProcedureLine {
    pub procedure_id: String,
    pub title: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SectionIntegrity {
    pub result_id: String,
    pub skipped_procedures: Vec<String>,
    pub voted_procedures_sha256: String,
    pub local_votes_sha256: String,
    pub chart_params_sha256: String,
}

// ===== API =====

/// Build the report model from the result artifact (pure, offline).
///
/// Missing required fields yield `ReportError::MissingField`; structurally
/// impossible combinations yield `ReportError::Inconsistent`.
pub fn build_model(result: &ResultArtifact) -> Result<ReportModel, ReportError> {
    let header = SectionHeader {
        total_procedures: json_get_u64(result, "/header/total_procedures")?,
        voted_procedures_count: json_get_u64(result, "/header/voted_procedures_count")?,
        empty: json_get_bool(result, "/empty")?,
    };

    let rows = json_get_array(result, "/chart")?;
    let mut parties = Vec::with_capacity(rows.len());
    let mut labels: Option<(String, String)> = None;
    for row in rows {
        let values = json_get_array(row, "/values")?;
        if values.len() != 2 {
            return Err(ReportError::Inconsistent("chart row must carry [matches, diffs]"));
        }
        if labels.is_none() {
            labels = Some((json_get_str(&values[0], "/label")?, json_get_str(&values[1], "/label")?));
        }
        parties.push(PartyLine {
            party: json_get_str(row, "/party")?,
            matches: json_get_u64(&values[0], "/value")?,
            diffs: json_get_u64(&values[1], "/value")?,
            agreement_pct: json_get_opt_str(row, "/agreement_pct_1dp"),
        });
    }

    let selected = result.pointer("/selected").and_then(Value::as_u64).map(|s| s as usize);
    if let Some(s) = selected {
        if s >= parties.len() {
            return Err(ReportError::Inconsistent("selected index outside chart"));
        }
    }

    let legend = match result.pointer("/legend") {
        Some(Value::Array(entries)) if entries.len() == 2 => Some([
            legend_line(&entries[0])?,
            legend_line(&entries[1])?,
        ]),
        Some(Value::Null) | None => None,
        Some(_) => return Err(ReportError::Inconsistent("legend must have two entries")),
    };
    if legend.is_some() != selected.is_some() {
        return Err(ReportError::Inconsistent("legend present without selection (or vice versa)"));
    }

    let (matches_label, diffs_label) = match (&labels, &legend) {
        (Some(l), _) => l.clone(),
        (None, Some([m, d])) => (m.label.clone(), d.label.clone()),
        (None, None) => (DEFAULT_MATCHES_LABEL.to_string(), DEFAULT_DIFFS_LABEL.to_string()),
    };
    let (matches_color, diffs_color) = match &legend {
        Some([m, d]) => (m.color.clone(), d.color.clone()),
        None => (DEFAULT_MATCHES_COLOR.to_string(), DEFAULT_DIFFS_COLOR.to_string()),
    };

    let mut procedures = Vec::new();
    for p in json_get_array(result, "/voted_procedures")? {
        procedures.push(ProcedureLine {
            procedure_id: json_get_str(p, "/procedure_id")?,
            title: json_get_opt_str(p, "/title"),
        });
    }
    if procedures.len() as u64 != header.voted_procedures_count {
        return Err(ReportError::Inconsistent("voted_procedures_count differs from listed procedures"));
    }

    let skipped_procedures = json_get_array(result, "/skipped_procedures")?
        .iter()
        .filter_map(|v| v.as_str().map(str::to_string))
        .collect();

    Ok(ReportModel {
        header,
        chart: SectionChart {
            matches_label,
            diffs_label,
            matches_color,
            diffs_color,
            parties,
            selected,
            legend,
            overall_agreement_pct: json_get_opt_str(result, "/totals/agreement_pct_1dp"),
        },
        procedures,
        note: json_get_str(result, "/note")?,
        integrity: SectionIntegrity {
            result_id: json_get_str(result, "/id")?,
            skipped_procedures,
            voted_procedures_sha256: json_get_str(result, "/inputs/voted_procedures_sha256")?,
            local_votes_sha256: json_get_str(result, "/inputs/local_votes_sha256")?,
            chart_params_sha256: json_get_str(result, "/inputs/chart_params_sha256")?,
        },
    })
}

fn legend_line(v: &Value) -> Result<LegendLine, ReportError> {
    Ok(LegendLine {
        label: json_get_str(v, "/label")?,
        value: json_get_u64(v, "/value")?,
        color: json_get_str(v, "/color")?,
    })
}

// ---- JSON pointer helpers ----

fn json_get_str(v: &Value, ptr: &'static str) -> Result<String, ReportError> {
    v.pointer(ptr)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or(ReportError::MissingField(ptr))
}

fn json_get_opt_str(v: &Value, ptr: &str) -> Option<String> {
    v.pointer(ptr).and_then(Value::as_str).map(str::to_string)
}

fn json_get_u64(v: &Value, ptr: &'static str) -> Result<u64, ReportError> {
    v.pointer(ptr).and_then(Value::as_u64).ok_or(ReportError::MissingField(ptr))
}

fn json_get_bool(v: &Value, ptr: &'static str) -> Result<bool, ReportError> {
    v.pointer(ptr).and_then(Value::as_bool).ok_or(ReportError::MissingField(ptr))
}

fn json_get_array<'a>(v: &'a Value, ptr: &'static str) -> Result<&'a Vec<Value>, ReportError> {
    v.pointer(ptr).and_then(Value::as_array).ok_or(ReportError::MissingField(ptr))
}
