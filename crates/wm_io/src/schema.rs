//! Embedded JSON Schemas (draft-07) for every input file.
//!
//! Schemas are compiled on each call; inputs are validated once per run.

use jsonschema::{Draft, JSONSchema};
use serde_json::Value;

use crate::{IoError, IoResult};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SchemaKind {
    VotedProcedures,
    LocalVotes,
    ChartParams,
}

impl SchemaKind {
    pub fn name(self) -> &'static str {
        match self {
            SchemaKind::VotedProcedures => "voted_procedures",
            SchemaKind::LocalVotes => "local_votes",
            SchemaKind::ChartParams => "chart_params",
        }
    }

    fn source(self) -> &'static str {
        match self {
            SchemaKind::VotedProcedures => include_str!("../schemas/voted_procedures.schema.json"),
            SchemaKind::LocalVotes => include_str!("../schemas/local_votes.schema.json"),
            SchemaKind::ChartParams => include_str!("../schemas/chart_params.schema.json"),
        }
    }
}

/// Validate `v` against the schema for `kind`; reports the first failing path.
pub fn validate_value(kind: SchemaKind, v: &Value) -> IoResult<()> {
    let schema: Value = serde_json::from_str(kind.source()).map_err(|e| IoError::Schema {
        pointer: "/".into(),
        msg: format!("{} schema unreadable: {e}", kind.name()),
    })?;
    let compiled = JSONSchema::options()
        .with_draft(Draft::Draft7)
        .compile(&schema)
        .map_err(|e| IoError::Schema {
            pointer: "/".into(),
            msg: format!("{} schema invalid: {e}", kind.name()),
        })?;

    let result = compiled.validate(v);
    if let Err(mut errors) = result {
        if let Some(first) = errors.next() {
            let pointer = first.instance_path.to_string();
            return Err(IoError::Schema {
                pointer: if pointer.is_empty() { "/".into() } else { pointer },
                msg: format!("{}: {first}", kind.name()),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn schemas_compile_and_accept_minimal_docs() {
        validate_value(
            SchemaKind::VotedProcedures,
            &json!({"proceduresByIdHavingVoteResults": {"procedures": []}}),
        )
        .unwrap();
        validate_value(SchemaKind::LocalVotes, &json!({"votesSelectionLocal": []})).unwrap();
        validate_value(SchemaKind::ChartParams, &json!({})).unwrap();
    }

    #[test]
    fn bad_selection_points_at_instance() {
        let err = validate_value(
            SchemaKind::LocalVotes,
            &json!({"votesSelectionLocal": [{"procedureId": "1", "selection": "MAYBE"}]}),
        )
        .unwrap_err();
        match err {
            IoError::Schema { pointer, .. } => assert_eq!(pointer, "/votesSelectionLocal/0/selection"),
            other => panic!("expected schema error, got {other:?}"),
        }
    }

    #[test]
    fn unknown_param_rejected() {
        assert!(validate_value(SchemaKind::ChartParams, &json!({"colour": "#ffffff"})).is_err());
    }
}
