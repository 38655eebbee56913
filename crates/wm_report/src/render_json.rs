//! render_json.rs
//! Report JSON renderer (header → chart → legend → procedures → note → integrity).
//!
//! Key order is fixed by insertion: this crate enables `serde_json`'s
//! `preserve_order`, so `Map` keeps the order sections are inserted in.

use serde_json::{Map as JsonMap, Value};

use crate::{LegendLine, PartyLine, ReportModel, SectionChart, SectionHeader, SectionIntegrity};

/// Build the top-level report object.
pub fn render_report_json(m: &ReportModel) -> Value {
    let mut root = obj();

    root.insert("header".into(), header_json(&m.header));
    root.insert("chart".into(), chart_json(&m.chart));

    let procedures = m
        .procedures
        .iter()
        .map(|p| {
            let mut o = obj();
            o.insert("procedure_id".into(), Value::String(p.procedure_id.clone()));
            if let Some(t) = p.title.as_ref().filter(|s| !s.is_empty()) {
                o.insert("title".into(), Value::String(t.clone()));
            }
            Value::Object(o)
        })
        .collect();
    root.insert("procedures".into(), Value::Array(procedures));

    root.insert("note".into(), Value::String(m.note.clone()));
    root.insert("integrity".into(), integrity_json(&m.integrity));

    Value::Object(root)
}

/* ----------------------- sections ----------------------- */

fn header_json(h: &SectionHeader) -> Value {
    // total → voted → empty
    let mut o = obj();
    o.insert("total_procedures".into(), h.total_procedures.into());
    o.insert("voted_procedures_count".into(), h.voted_procedures_count.into());
    o.insert("empty".into(), Value::Bool(h.empty));
    Value::Object(o)
}

fn chart_json(c: &SectionChart) -> Value {
    let mut o = obj();

    let mut series = obj();
    series.insert("matches".into(), series_json(&c.matches_label, &c.matches_color));
    series.insert("diffs".into(), series_json(&c.diffs_label, &c.diffs_color));
    o.insert("series".into(), Value::Object(series));

    let parties = c
        .parties
        .iter()
        .enumerate()
        .map(|(i, p)| party_json(p, c.selected == Some(i)))
        .collect();
    o.insert("parties".into(), Value::Array(parties));

    // Legend only exists for a non-empty chart.
    match &c.legend {
        Some(entries) => {
            o.insert("legend".into(), Value::Array(entries.iter().map(legend_json).collect()));
        }
        None => {
            o.insert("legend".into(), Value::Null);
        }
    }

    o.insert(
        "overall_agreement_pct".into(),
        c.overall_agreement_pct.clone().map(Value::String).unwrap_or(Value::Null),
    );

    Value::Object(o)
}

fn series_json(label: &str, color: &str) -> Value {
    let mut o = obj();
    o.insert("label".into(), Value::String(label.to_string()));
    o.insert("color".into(), Value::String(color.to_string()));
    Value::Object(o)
}

fn party_json(p: &PartyLine, selected: bool) -> Value {
    let mut o = obj();
    o.insert("party".into(), Value::String(p.party.clone()));
    o.insert("matches".into(), p.matches.into());
    o.insert("diffs".into(), p.diffs.into());
    o.insert(
        "agreement_pct".into(),
        p.agreement_pct.clone().map(Value::String).unwrap_or(Value::Null),
    );
    o.insert("selected".into(), Value::Bool(selected));
    Value::Object(o)
}

fn legend_json(l: &LegendLine) -> Value {
    let mut o = obj();
    o.insert("label".into(), Value::String(l.label.clone()));
    o.insert("value".into(), l.value.into());
    o.insert("color".into(), Value::String(l.color.clone()));
    Value::Object(o)
}

fn integrity_json(i: &SectionIntegrity) -> Value {
    let mut o = obj();
    o.insert("result_id".into(), Value::String(i.result_id.clone()));
    o.insert(
        "skipped_procedures".into(),
        Value::Array(i.skipped_procedures.iter().cloned().map(Value::String).collect()),
    );
    let mut inputs = obj();
    inputs.insert("voted_procedures_sha256".into(), Value::String(i.voted_procedures_sha256.clone()));
    inputs.insert("local_votes_sha256".into(), Value::String(i.local_votes_sha256.clone()));
    inputs.insert("chart_params_sha256".into(), Value::String(i.chart_params_sha256.clone()));
    o.insert("inputs".into(), Value::Object(inputs));
    Value::Object(o)
}

#[inline]
fn obj() -> JsonMap<String, Value> {
    JsonMap::new()
}
