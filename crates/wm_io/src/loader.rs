//! Loader: read local JSON inputs (voted procedures → local votes → chart
//! params), validate via embedded schemas, and return a typed `LoadedContext`
//! for the pipeline. No network I/O.
//!
//! Inputs may be bare query payloads or wrapped in a GraphQL `{"data": ...}`
//! envelope.

#![forbid(unsafe_code)]

use std::fs::File;
use std::io::Read;
use std::path::Path;

use log::{debug, warn};
use serde::Deserialize;
use serde_json::Value;
use wm_core::{
    variables::{self, ChartParams},
    LocalSelections, LocalVote, Procedure,
};

use crate::schema::{self, SchemaKind};
use crate::{hasher, IoError, IoResult};

/// Hard cap on any single input file.
pub const MAX_INPUT_BYTES: u64 = 16 * 1024 * 1024;

// ----------------------------- Public wire-facing types -----------------------------

/// `proceduresByIdHavingVoteResults` payload.
#[derive(Debug, Clone)]
pub struct VotedProcedures {
    /// Total procedures known to the backend (the chart header's denominator).
    pub total: u64,
    pub procedures: Vec<Procedure>,
}

/// Input digests (sha256 hex over canonical JSON of the parsed inputs).
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct InputDigests {
    pub voted_procedures_sha256: String,
    pub local_votes_sha256: String,
    pub chart_params_sha256: String,
}

/// Loaded, validated, normalized context for the pipeline.
#[derive(Debug, Clone)]
pub struct LoadedContext {
    pub voted: VotedProcedures,
    pub local_votes: Vec<LocalVote>,
    pub selections: LocalSelections,
    pub params: ChartParams,
    pub digests: InputDigests,
}

// ----------------------------- Orchestration -----------------------------

/// Load all inputs from explicit paths. `params` is optional (defaults apply).
pub fn load_inputs(
    procedures: &Path,
    local_votes: &Path,
    params: Option<&Path>,
) -> IoResult<LoadedContext> {
    let voted = load_voted_procedures(procedures)?;
    let local_votes = load_local_votes(local_votes)?;
    let params = match params {
        Some(p) => load_params(p)?,
        None => ChartParams::default(),
    };
    context_from_parts(voted, local_votes, params)
}

/// Assemble a context from already-parsed inputs (used by in-memory callers).
pub fn context_from_parts(
    voted: VotedProcedures,
    local_votes: Vec<LocalVote>,
    params: ChartParams,
) -> IoResult<LoadedContext> {
    variables::validate_domains(&params)?;

    let selections = LocalSelections::from_votes(&local_votes);
    if !selections.duplicates().is_empty() {
        warn!(
            "ignoring {} duplicate local vote(s); first entry per procedure wins",
            selections.duplicates().len()
        );
    }

    let digests = InputDigests {
        voted_procedures_sha256: hasher::sha256_canonical(&voted.procedures)?,
        local_votes_sha256: hasher::sha256_canonical(&local_votes)?,
        chart_params_sha256: hasher::sha256_canonical(&params)?,
    };
    debug!(
        "inputs: {} procedures (total {}), {} local votes",
        voted.procedures.len(),
        voted.total,
        local_votes.len()
    );

    Ok(LoadedContext { voted, local_votes, selections, params, digests })
}

// ----------------------------- Targeted loaders -----------------------------

pub fn load_voted_procedures(path: &Path) -> IoResult<VotedProcedures> {
    parse_voted_procedures(read_json_value_with_limits(path)?)
}

pub fn load_local_votes(path: &Path) -> IoResult<Vec<LocalVote>> {
    parse_local_votes(read_json_value_with_limits(path)?)
}

pub fn load_params(path: &Path) -> IoResult<ChartParams> {
    parse_params(read_json_value_with_limits(path)?)
}

pub fn parse_voted_procedures(v: Value) -> IoResult<VotedProcedures> {
    #[derive(Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct RawPage {
        total: Option<u64>,
        procedures: Vec<Procedure>,
    }
    #[derive(Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct Raw {
        procedures_by_id_having_vote_results: RawPage,
    }

    let v = unwrap_graphql_data(v);
    schema::validate_value(SchemaKind::VotedProcedures, &v)?;
    let raw: Raw = from_value_at(v, "/proceduresByIdHavingVoteResults")?;
    let page = raw.procedures_by_id_having_vote_results;

    let listed = page.procedures.len() as u64;
    let total = page.total.unwrap_or(listed);
    if total < listed {
        return Err(IoError::Domain(format!(
            "total ({total}) is smaller than the number of listed procedures ({listed})"
        )));
    }
    Ok(VotedProcedures { total, procedures: page.procedures })
}

pub fn parse_local_votes(v: Value) -> IoResult<Vec<LocalVote>> {
    #[derive(Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct Raw {
        votes_selection_local: Vec<LocalVote>,
    }

    let v = unwrap_graphql_data(v);
    schema::validate_value(SchemaKind::LocalVotes, &v)?;
    let raw: Raw = from_value_at(v, "/votesSelectionLocal")?;
    Ok(raw.votes_selection_local)
}

pub fn parse_params(v: Value) -> IoResult<ChartParams> {
    schema::validate_value(SchemaKind::ChartParams, &v)?;
    let params: ChartParams = from_value_at(v, "/")?;
    variables::validate_domains(&params)?;
    Ok(params)
}

// ----------------------------- Helpers -----------------------------

/// Strip a GraphQL response envelope (`{"data": {...}, "errors": ..., "extensions": ...}`)
/// whenever `data` is an object; sibling keys are dropped.
fn unwrap_graphql_data(v: Value) -> Value {
    match v {
        Value::Object(mut map) if map.get("data").map_or(false, Value::is_object) => {
            if map.get("errors").and_then(Value::as_array).map_or(false, |e| !e.is_empty()) {
                warn!("GraphQL envelope carries errors; using its data payload as-is");
            }
            map.remove("data").unwrap_or(Value::Null)
        }
        other => other,
    }
}

fn from_value_at<T: serde::de::DeserializeOwned>(v: Value, pointer: &str) -> IoResult<T> {
    serde_json::from_value(v).map_err(|e| IoError::Json { pointer: pointer.into(), msg: e.to_string() })
}

/// Read a JSON file, refusing anything larger than [`MAX_INPUT_BYTES`].
pub fn read_json_value_with_limits(path: &Path) -> IoResult<Value> {
    let f = File::open(path).map_err(|e| IoError::Read(format!("{}: {e}", path.display())))?;
    let mut buf = Vec::new();
    f.take(MAX_INPUT_BYTES + 1)
        .read_to_end(&mut buf)
        .map_err(|e| IoError::Read(format!("{}: {e}", path.display())))?;
    if buf.len() as u64 > MAX_INPUT_BYTES {
        return Err(IoError::Limit(format!(
            "{} exceeds {} bytes",
            path.display(),
            MAX_INPUT_BYTES
        )));
    }
    debug!("read {} ({} bytes, sha256 {})", path.display(), buf.len(), hasher::sha256_hex(&buf));
    serde_json::from_slice(&buf).map_err(|e| IoError::Json {
        pointer: "/".into(),
        msg: format!("{}: {e}", path.display()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;
    use wm_core::VoteSelection;

    fn procedures_doc() -> Value {
        json!({
            "proceduresByIdHavingVoteResults": {
                "total": 12,
                "procedures": [
                    {"procedureId": "1", "title": "A", "voteResults": {"partyVotes": [
                        {"party": "SPD", "main": "YES", "__typename": "PartyVote"}
                    ]}},
                    {"procedureId": "2", "title": null, "voteResults": {"partyVotes": []}}
                ]
            }
        })
    }

    #[test]
    fn parses_bare_and_enveloped_procedures() {
        let bare = parse_voted_procedures(procedures_doc()).unwrap();
        assert_eq!(bare.total, 12);
        assert_eq!(bare.procedures.len(), 2);
        assert_eq!(bare.procedures[1].title, None);

        let wrapped = parse_voted_procedures(json!({"data": procedures_doc()})).unwrap();
        assert_eq!(wrapped.procedures, bare.procedures);
    }

    #[test]
    fn total_defaults_to_listed_count() {
        let v = json!({"proceduresByIdHavingVoteResults": {"procedures": [
            {"procedureId": "1", "voteResults": {"partyVotes": []}}
        ]}});
        assert_eq!(parse_voted_procedures(v).unwrap().total, 1);
    }

    #[test]
    fn total_below_listed_is_rejected() {
        let v = json!({"proceduresByIdHavingVoteResults": {"total": 0, "procedures": [
            {"procedureId": "1", "voteResults": {"partyVotes": []}}
        ]}});
        assert!(matches!(parse_voted_procedures(v), Err(IoError::Domain(_))));
    }

    #[test]
    fn local_votes_parse() {
        let v = json!({"votesSelectionLocal": [
            {"procedureId": "1", "selection": "NO"},
            {"procedureId": "2", "selection": "ABSTINATION"}
        ]});
        let votes = parse_local_votes(v).unwrap();
        assert_eq!(votes[1].selection, VoteSelection::Abstination);
    }

    #[test]
    fn party_names_are_trimmed() {
        let v = json!({"proceduresByIdHavingVoteResults": {"procedures": [
            {"procedureId": "1", "voteResults": {"partyVotes": [
                {"party": " SPD", "main": "YES"}, {"party": "SPD ", "main": "NO"}
            ]}}
        ]}});
        let parsed = parse_voted_procedures(v).unwrap();
        let votes = &parsed.procedures[0].vote_results.party_votes;
        assert_eq!(votes[0].party.as_str(), "SPD");
        assert_eq!(votes[0].party, votes[1].party);
    }

    #[test]
    fn blank_party_name_is_rejected() {
        let v = json!({"proceduresByIdHavingVoteResults": {"procedures": [
            {"procedureId": "1", "voteResults": {"partyVotes": [{"party": "  ", "main": "YES"}]}}
        ]}});
        assert!(matches!(parse_voted_procedures(v), Err(IoError::Json { .. })));
    }

    #[test]
    fn free_form_procedure_ids_are_accepted() {
        let v = json!({"proceduresByIdHavingVoteResults": {"procedures": [
            {"procedureId": "BT 19/1234", "voteResults": {"partyVotes": [{"party": "SPD", "main": "YES"}]}}
        ]}});
        let voted = parse_voted_procedures(v).unwrap();
        assert_eq!(voted.procedures[0].procedure_id.as_str(), "BT 19/1234");

        let local = parse_local_votes(json!({"votesSelectionLocal": [
            {"procedureId": "BT 19/1234", "selection": "YES"}
        ]}))
        .unwrap();
        assert_eq!(local[0].procedure_id, voted.procedures[0].procedure_id);

        assert!(matches!(
            parse_local_votes(json!({"votesSelectionLocal": [{"procedureId": "", "selection": "YES"}]})),
            Err(IoError::Schema { .. })
        ));
    }

    #[test]
    fn full_graphql_response_is_unwrapped() {
        let local = parse_local_votes(json!({
            "data": {"votesSelectionLocal": [{"procedureId": "1", "selection": "NO"}]},
            "errors": [],
            "extensions": {}
        }))
        .unwrap();
        assert_eq!(local.len(), 1);

        let voted = parse_voted_procedures(json!({
            "data": procedures_doc(),
            "errors": [{"message": "partial"}],
            "extensions": {"cost": 3}
        }))
        .unwrap();
        assert_eq!(voted.total, 12);
    }

    #[test]
    fn params_schema_and_domain() {
        let p = parse_params(json!({"matches_color": "#00FF00"})).unwrap();
        assert_eq!(p.matches_color.as_str(), "#00ff00");
        assert!(matches!(parse_params(json!({"matches_color": "green"})), Err(IoError::Schema { .. })));
        assert!(matches!(
            parse_params(json!({"matches_label": "X", "diffs_label": "X"})),
            Err(IoError::Domain(_))
        ));
    }

    #[test]
    fn load_inputs_from_files_and_digest_stability() {
        let dir = tempfile::tempdir().unwrap();
        let pp = dir.path().join("procedures.json");
        let lp = dir.path().join("local.json");
        fs::write(&pp, procedures_doc().to_string()).unwrap();
        fs::write(&lp, r#"{"votesSelectionLocal":[{"procedureId":"1","selection":"YES"}]}"#).unwrap();

        let a = load_inputs(&pp, &lp, None).unwrap();
        let b = load_inputs(&pp, &lp, None).unwrap();
        assert_eq!(a.digests, b.digests);
        assert_eq!(a.selections.len(), 1);
        assert_eq!(a.params, ChartParams::default());
    }

    #[test]
    fn missing_file_is_read_error() {
        let err = load_local_votes(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(matches!(err, IoError::Read(_)));
    }

    #[test]
    fn malformed_json_is_json_error() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("bad.json");
        fs::write(&p, "{ not json").unwrap();
        assert!(matches!(read_json_value_with_limits(&p), Err(IoError::Json { .. })));
    }
}
