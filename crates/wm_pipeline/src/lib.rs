//! wm_pipeline: deterministic pipeline surface (load → filter → tally → rank → legend → build)
//! This crate stays free of direct file handling and delegates JSON/Schema/Hashing to `wm_io`
//! and math to `wm_algo`.
//!
//! The same inputs always produce the same `ResultDoc`, byte for byte once
//! canonicalized: there are no timestamps and the id is a content hash.

use std::fmt;
use std::path::Path;

use log::info;
use wm_io::loader::{self, LoadedContext};

pub mod aggregate;
pub mod build_result;

pub use build_result::{
    ChartRow, HeaderBlock, InputsBlock, LegendRow, ResultBody, ResultDoc, TotalsBlock, ValueRow,
    VotedProcedureRow,
};

/// Pipeline context: inputs are already loaded and validated by wm_io.
#[derive(Debug, Clone)]
pub struct PipelineCtx {
    pub loaded: LoadedContext,
    /// Chart segment the user selected; clamped into range by the pipeline.
    pub selected: usize,
}

/// Top-level pipeline outputs.
#[derive(Debug, Clone)]
pub struct PipelineOutputs {
    pub result: ResultDoc,
}

/// Single error surface for the pipeline orchestration.
#[derive(Debug)]
pub enum PipelineError {
    Io(String),
    Schema(String),
    Validate(String),
    Aggregate(String),
    Build(String),
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineError::Io(m) => write!(f, "io: {m}"),
            PipelineError::Schema(m) => write!(f, "schema: {m}"),
            PipelineError::Validate(m) => write!(f, "validate: {m}"),
            PipelineError::Aggregate(m) => write!(f, "aggregate: {m}"),
            PipelineError::Build(m) => write!(f, "build: {m}"),
        }
    }
}

impl std::error::Error for PipelineError {}

impl From<wm_io::IoError> for PipelineError {
    fn from(e: wm_io::IoError) -> Self {
        use wm_io::IoError;
        use PipelineError::*;
        match e {
            IoError::Schema { pointer, msg } => Schema(format!("{pointer}: {msg}")),
            IoError::Json { pointer, msg } => Schema(format!("json {pointer}: {msg}")),
            IoError::Domain(m) => Validate(m),
            IoError::Read(m) => Io(format!("read: {m}")),
            IoError::Write(m) => Io(format!("write: {m}")),
            IoError::Path(m) => Io(format!("path: {m}")),
            IoError::Limit(m) => Io(format!("limit: {m}")),
            IoError::Canon(m) => Build(format!("canon: {m}")),
            IoError::Hash(m) => Build(format!("hash: {m}")),
        }
    }
}

impl From<wm_algo::AlgoError> for PipelineError {
    fn from(e: wm_algo::AlgoError) -> Self {
        PipelineError::Aggregate(e.to_string())
    }
}

// -------------------------------------- Public API --------------------------------------

/// Run the pipeline over a preloaded context.
pub fn run_with_ctx(ctx: &PipelineCtx) -> Result<PipelineOutputs, PipelineError> {
    let agg = aggregate::aggregate(&ctx.loaded, ctx.selected)?;
    let result = build_result::build_result(&ctx.loaded, &agg)?;

    info!(
        "result {}: {}/{} procedures voted, {} parties",
        result.id,
        result.body.header.voted_procedures_count,
        result.body.header.total_procedures,
        result.body.chart.len()
    );
    Ok(PipelineOutputs { result })
}

/// Convenience entry: load the three inputs via wm_io, then run the pipeline.
pub fn run_from_paths(
    procedures: &Path,
    local_votes: &Path,
    params: Option<&Path>,
    selected: usize,
) -> Result<PipelineOutputs, PipelineError> {
    let loaded = loader::load_inputs(procedures, local_votes, params)?;
    run_with_ctx(&PipelineCtx { loaded, selected })
}
