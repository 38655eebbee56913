//! End-to-end pipeline scenarios over in-memory and on-disk inputs.

use assert_json_diff::assert_json_eq;
use serde_json::{json, Value};

use wm_core::ChartParams;
use wm_io::{canonical_json, hasher, loader};
use wm_pipeline::{run_from_paths, run_with_ctx, PipelineCtx, ResultDoc};

fn procedure(id: &str, title: &str, votes: &[(&str, &str)]) -> Value {
    json!({
        "procedureId": id,
        "title": title,
        "voteResults": {
            "partyVotes": votes.iter().map(|(p, m)| json!({"party": p, "main": m})).collect::<Vec<_>>()
        }
    })
}

fn run(procedures: Vec<Value>, total: Option<u64>, local: &[(&str, &str)], selected: usize) -> ResultDoc {
    let mut page = json!({ "procedures": procedures });
    if let Some(t) = total {
        page["total"] = json!(t);
    }
    let voted = loader::parse_voted_procedures(json!({ "proceduresByIdHavingVoteResults": page })).unwrap();
    let local_votes = loader::parse_local_votes(json!({
        "votesSelectionLocal": local
            .iter()
            .map(|(id, s)| json!({"procedureId": id, "selection": s}))
            .collect::<Vec<_>>()
    }))
    .unwrap();
    let loaded = loader::context_from_parts(voted, local_votes, ChartParams::default()).unwrap();
    run_with_ctx(&PipelineCtx { loaded, selected }).unwrap().result
}

#[test]
fn one_match_one_diff_for_single_party() {
    let doc = run(
        vec![procedure("1", "Eins", &[("A", "YES")]), procedure("2", "Zwei", &[("A", "YES")])],
        None,
        &[("1", "YES"), ("2", "NO")],
        0,
    );

    assert_json_eq!(
        serde_json::to_value(&doc.body.chart).unwrap(),
        json!([{
            "party": "A",
            "values": [
                {"label": "Übereinstimmungen", "value": 1},
                {"label": "Differenzen", "value": 1}
            ],
            "agreement_pct_1dp": "50.0"
        }])
    );
    assert_eq!(doc.body.header.voted_procedures_count, 2);
    assert!(!doc.body.empty);
}

#[test]
fn no_affiliation_entries_are_excluded() {
    let doc = run(
        vec![procedure("1", "Eins", &[("fraktionslos", "YES"), ("SPD", "YES")])],
        None,
        &[("1", "YES")],
        0,
    );
    let parties: Vec<&str> = doc.body.chart.iter().map(|r| r.party.as_str()).collect();
    assert_eq!(parties, vec!["SPD"]);
    assert_eq!((doc.body.totals.matches, doc.body.totals.diffs), (1, 0));
}

#[test]
fn no_local_votes_gives_placeholder() {
    let doc = run(
        vec![procedure("1", "Eins", &[("SPD", "YES")]), procedure("2", "Zwei", &[("SPD", "NO")])],
        Some(250),
        &[],
        0,
    );
    assert!(doc.body.empty);
    assert!(doc.body.chart.is_empty());
    assert_eq!(doc.body.selected, None);
    assert_eq!(doc.body.legend, None);
    assert_eq!(doc.body.header.total_procedures, 250);
    assert_eq!(doc.body.header.voted_procedures_count, 0);
    assert_eq!(doc.body.totals.agreement_pct_1dp, None);
}

#[test]
fn legend_for_top_party_uses_fixed_colors() {
    let doc = run(
        vec![
            procedure("1", "Eins", &[("CDU/CSU", "NO"), ("SPD", "YES")]),
            procedure("2", "Zwei", &[("CDU/CSU", "YES"), ("SPD", "YES")]),
        ],
        None,
        &[("1", "YES"), ("2", "YES")],
        0,
    );
    assert_eq!(doc.body.chart[0].party, "SPD");
    assert_json_eq!(
        serde_json::to_value(&doc.body.legend).unwrap(),
        json!([
            {"label": "Übereinstimmungen", "value": 2, "color": "#f5a623"},
            {"label": "Differenzen", "value": 0, "color": "#b1b3b4"}
        ])
    );
}

#[test]
fn out_of_range_selection_is_clamped() {
    let doc = run(
        vec![procedure("1", "Eins", &[("A", "YES"), ("B", "NO")])],
        None,
        &[("1", "YES")],
        9,
    );
    assert_eq!(doc.body.selected, Some(1));
    let legend = doc.body.legend.unwrap();
    assert_eq!((legend[0].value, legend[1].value), (0, 1));
}

#[test]
fn voted_list_follows_input_order_and_ties_keep_first_encounter() {
    let doc = run(
        vec![
            procedure("30", "Drei", &[("Z", "YES"), ("A", "YES")]),
            procedure("10", "Eins", &[("A", "NO"), ("Z", "NO")]),
            procedure("20", "Zwei", &[("A", "YES")]),
        ],
        None,
        &[("10", "NO"), ("30", "YES")],
        0,
    );
    let ids: Vec<&str> = doc.body.voted_procedures.iter().map(|r| r.procedure_id.as_str()).collect();
    assert_eq!(ids, vec!["30", "10"]);
    let parties: Vec<&str> = doc.body.chart.iter().map(|r| r.party.as_str()).collect();
    assert_eq!(parties, vec!["Z", "A"]);
}

#[test]
fn output_is_byte_identical_and_id_is_content_hash() {
    let mk = || {
        run(
            vec![procedure("1", "Eins", &[("A", "YES"), ("B", "NO")]), procedure("2", "Zwei", &[("B", "NO")])],
            Some(10),
            &[("1", "NO"), ("2", "NO")],
            0,
        )
    };
    let a = mk();
    let b = mk();
    let bytes_a = canonical_json::to_canonical_bytes(&a).unwrap();
    let bytes_b = canonical_json::to_canonical_bytes(&b).unwrap();
    assert_eq!(bytes_a, bytes_b);
    assert_eq!(a.id, hasher::res_id_from_canonical(&a.body).unwrap());
    assert!(hasher::parse_res_id(&a.id).is_ok());
}

#[test]
fn runs_from_files() {
    let dir = tempfile::tempdir().unwrap();
    let pp = dir.path().join("procedures.json");
    let lp = dir.path().join("local.json");
    let params = dir.path().join("params.json");
    std::fs::write(
        &pp,
        json!({"data": {"proceduresByIdHavingVoteResults": {"total": 3, "procedures": [
            procedure("1", "Eins", &[("SPD", "YES"), ("AfD", "NO")])
        ]}}})
        .to_string(),
    )
    .unwrap();
    std::fs::write(&lp, r#"{"votesSelectionLocal":[{"procedureId":"1","selection":"NO"}]}"#).unwrap();
    std::fs::write(&params, r#"{"matches_label":"Matches","diffs_label":"Diffs"}"#).unwrap();

    let out = run_from_paths(&pp, &lp, Some(&params), 0).unwrap();
    let body = out.result.body;
    assert_eq!(body.chart[0].party, "AfD");
    assert_eq!(body.chart[0].values[0].label, "Matches");
    assert_eq!(body.header.total_procedures, 3);
}

#[test]
fn schema_violation_surfaces_as_schema_error() {
    let dir = tempfile::tempdir().unwrap();
    let pp = dir.path().join("procedures.json");
    let lp = dir.path().join("local.json");
    std::fs::write(&pp, r#"{"proceduresByIdHavingVoteResults":{"procedures":[]}}"#).unwrap();
    std::fs::write(&lp, r#"{"votesSelectionLocal":[{"procedureId":"1","selection":"JA"}]}"#).unwrap();

    let err = run_from_paths(&pp, &lp, None, 0).unwrap_err();
    assert!(matches!(err, wm_pipeline::PipelineError::Schema(_)), "{err}");
}
