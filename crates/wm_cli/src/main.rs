// crates/wm_cli/src/main.rs
//
// Exit codes, typed error mapping, logging setup, the validate-only
// short-circuit and the full run path (load → pipeline → result.json → reports).

mod args;

mod exitcodes {
    pub const OK: i32 = 0;
    pub const VALIDATION: i32 = 2;
    pub const IO: i32 = 4;
    pub const AGGREGATE: i32 = 5;
}

use std::fs;
use std::path::Path;
use std::process::ExitCode;

use log::{error, info};

use args::{parse_and_validate as parse_cli, Args, CliError};
use wm_io::{canonical_json, loader};
use wm_pipeline::{run_with_ctx, PipelineCtx, PipelineError, PipelineOutputs};

/// Central error type for CLI → exit-code mapping.
#[derive(Debug)]
enum MainError {
    /// Schema / JSON shape / domain failures in the inputs
    Validation(String),
    /// Read/write/path/limit failures
    Io(String),
    /// Aggregation or result contract violations (including report model checks)
    Aggregate(String),
}

impl std::fmt::Display for MainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MainError::Validation(m) => write!(f, "validation: {m}"),
            MainError::Io(m) => write!(f, "io: {m}"),
            MainError::Aggregate(m) => write!(f, "aggregate: {m}"),
        }
    }
}

fn main() -> ExitCode {
    let args = match parse_cli() {
        Ok(a) => a,
        Err(e) => {
            eprintln!("wm: error: {e}");
            return ExitCode::from(cli_exit_code(&e) as u8);
        }
    };
    init_logging(&args);

    let outcome = if args.validate_only { validate_only(&args) } else { run_once(&args) };
    let rc = match outcome {
        Ok(()) => exitcodes::OK,
        Err(e) => {
            error!("{e}");
            map_error(&e)
        }
    };
    ExitCode::from(rc as u8)
}

/// Unreadable inputs are I/O failures; non-local paths are rejected input.
fn cli_exit_code(e: &CliError) -> i32 {
    match e {
        CliError::NonLocalPath(_) => exitcodes::VALIDATION,
        CliError::NotFound(_) => exitcodes::IO,
    }
}

/// `RUST_LOG` wins; otherwise `--quiet`/`--verbose` pick the default level.
fn init_logging(args: &Args) {
    let default = if args.quiet {
        "error"
    } else if args.verbose {
        "debug"
    } else {
        "info"
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default))
        .format_timestamp(None)
        .init();
}

/// Loads inputs to exercise schema and domain checks; writes nothing.
fn validate_only(args: &Args) -> Result<(), MainError> {
    loader::load_inputs(&args.procedures, &args.local_votes, args.params.as_deref())
        .map_err(|e| map_pipeline_err(PipelineError::from(e)))?;
    info!("validate-only: inputs OK");
    Ok(())
}

fn map_error(e: &MainError) -> i32 {
    match e {
        MainError::Validation(_) => exitcodes::VALIDATION,
        MainError::Io(_) => exitcodes::IO,
        MainError::Aggregate(_) => exitcodes::AGGREGATE,
    }
}

fn map_pipeline_err(e: PipelineError) -> MainError {
    use PipelineError::*;
    match e {
        Schema(m) | Validate(m) => MainError::Validation(m),
        Io(m) => MainError::Io(m),
        Aggregate(m) | Build(m) => MainError::Aggregate(m),
    }
}

fn run_once(args: &Args) -> Result<(), MainError> {
    let loaded = loader::load_inputs(&args.procedures, &args.local_votes, args.params.as_deref())
        .map_err(|e| map_pipeline_err(PipelineError::from(e)))?;

    let ctx = PipelineCtx { loaded, selected: args.selected };
    let outs = run_with_ctx(&ctx).map_err(map_pipeline_err)?;

    write_artifacts(&args.out, &outs)?;
    maybe_render_reports(args, &outs)?;

    info!("artifacts written to {}", args.out.to_string_lossy());
    Ok(())
}

fn write_artifacts(out_dir: &Path, outs: &PipelineOutputs) -> Result<(), MainError> {
    fs::create_dir_all(out_dir)
        .map_err(|e| MainError::Io(format!("mkdir {}: {e}", out_dir.to_string_lossy())))?;

    let res_path = out_dir.join("result.json");
    canonical_json::write_canonical_file(&res_path, &outs.result)
        .map_err(|e| MainError::Io(format!("write result.json: {e}")))?;
    Ok(())
}

fn maybe_render_reports(args: &Args, outs: &PipelineOutputs) -> Result<(), MainError> {
    if args.render.is_empty() {
        return Ok(());
    }

    let result_val = serde_json::to_value(&outs.result)
        .map_err(|e| MainError::Aggregate(format!("result to JSON: {e}")))?;
    let model = wm_report::build_model(&result_val).map_err(|e| MainError::Aggregate(e.to_string()))?;

    for fmt in &args.render {
        match fmt.as_str() {
            "json" => render_json_report(&model, &args.out)?,
            "html" => render_html_report(&model, &args.out, &args.lang)?,
            other => return Err(MainError::Validation(format!("unknown renderer: {other}"))),
        }
    }
    Ok(())
}

#[cfg(feature = "report-json")]
fn render_json_report(model: &wm_report::ReportModel, out_dir: &Path) -> Result<(), MainError> {
    // Pretty, insertion-ordered; not canonicalized so section order survives.
    let value = wm_report::render_json::render_report_json(model);
    let bytes = serde_json::to_vec_pretty(&value)
        .map_err(|e| MainError::Aggregate(format!("report to JSON: {e}")))?;
    canonical_json::write_bytes_atomic(&out_dir.join("report.json"), &bytes)
        .map_err(|e| MainError::Io(format!("write report.json: {e}")))
}

#[cfg(not(feature = "report-json"))]
fn render_json_report(_model: &wm_report::ReportModel, _out_dir: &Path) -> Result<(), MainError> {
    Err(MainError::Validation("json renderer not enabled (build with feature `report-json`)".into()))
}

#[cfg(feature = "report-html")]
fn render_html_report(model: &wm_report::ReportModel, out_dir: &Path, lang: &str) -> Result<(), MainError> {
    let html = wm_report::render_html::render_html(model, lang);
    canonical_json::write_bytes_atomic(&out_dir.join("report.html"), html.as_bytes())
        .map_err(|e| MainError::Io(format!("write report.html: {e}")))
}

#[cfg(not(feature = "report-html"))]
fn render_html_report(_model: &wm_report::ReportModel, _out_dir: &Path, _lang: &str) -> Result<(), MainError> {
    Err(MainError::Validation("html renderer not enabled (build with feature `report-html`)".into()))
}
