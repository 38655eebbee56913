// crates/wm_cli/src/args.rs
//
// Deterministic, offline CLI argument parsing surface.
// - No networked paths (reject any scheme:// like http/https/file)
// - Required inputs: --procedures, --local-votes; optional --params
// - Output: --out dir, --render [json|html]*
// - --validate-only performs load + schema/domain checks without aggregating

use std::{
    env, fs,
    path::{Path, PathBuf},
};

use clap::Parser;

/// Parsed CLI arguments (raw).
#[derive(Debug, Parser, Clone)]
#[command(
    name = "wm",
    disable_help_subcommand = true,
    about = "Offline, deterministic party agreement chart for locally cast votes"
)]
pub struct Args {
    // --- Inputs ---
    /// Voted procedures JSON (`proceduresByIdHavingVoteResults`, optionally under `data`).
    #[arg(long)]
    pub procedures: PathBuf,
    /// Local votes JSON (`votesSelectionLocal`, optionally under `data`).
    #[arg(long = "local-votes")]
    pub local_votes: PathBuf,
    /// Chart parameters JSON (labels, colors, no-affiliation marker, note).
    #[arg(long)]
    pub params: Option<PathBuf>,

    // --- Selection ---
    /// Chart segment to show in the legend; clamped into range.
    #[arg(long, default_value_t = 0)]
    pub selected: usize,

    // --- Output & rendering ---
    /// Output directory (default: current directory).
    #[arg(long, default_value = ".")]
    pub out: PathBuf,
    /// Renderer(s) to emit. Choose up to 2 (json, html). Omit to skip rendering.
    #[arg(long, value_parser = ["json", "html"], num_args = 0..=2)]
    pub render: Vec<String>,
    /// Language for the HTML report.
    #[arg(long, value_parser = ["de", "en"], default_value = "de")]
    pub lang: String,

    // --- Control ---
    /// Validate inputs only (load + schema/domain), do not aggregate.
    #[arg(long = "validate-only")]
    pub validate_only: bool,
    /// Only log errors.
    #[arg(long, conflicts_with = "verbose")]
    pub quiet: bool,
    /// Log debug detail (file digests, stage counts).
    #[arg(long)]
    pub verbose: bool,
}

/// Errors surfaced by argument validation.
#[derive(Debug)]
pub enum CliError {
    NonLocalPath(String),
    NotFound(String),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::NonLocalPath(p) => write!(f, "path must be local file (no scheme): {p}"),
            CliError::NotFound(p) => write!(f, "file not found: {p}"),
        }
    }
}
impl std::error::Error for CliError {}

/// Entry point used by main.rs
pub fn parse_and_validate() -> Result<Args, CliError> {
    validate(Args::parse())
}

/// Scheme and existence checks, then path normalization.
pub fn validate(mut args: Args) -> Result<Args, CliError> {
    for p in iter_all_paths(&args) {
        ensure_local_path(p)?;
    }

    ensure_local_exists(&args.procedures, "--procedures")?;
    ensure_local_exists(&args.local_votes, "--local-votes")?;
    if let Some(p) = &args.params {
        ensure_local_exists(p, "--params")?;
    }

    args.procedures = normalize_path(&args.procedures);
    args.local_votes = normalize_path(&args.local_votes);
    args.params = args.params.take().map(|p| normalize_path(&p));
    args.out = normalize_path(&args.out);
    Ok(args)
}

/// Reject any explicit URI scheme (e.g., http://, https://, file://).
#[inline]
fn has_scheme(s: &str) -> bool {
    let lower = s.trim().to_ascii_lowercase();
    wm_io::looks_like_url_strict(&lower)
        || lower.starts_with("http:")
        || lower.starts_with("https:")
        || lower.starts_with("file:")
}

#[inline]
fn ensure_local_path(p: &Path) -> Result<(), CliError> {
    if let Some(s) = p.to_str() {
        if has_scheme(s) {
            return Err(CliError::NonLocalPath(s.to_string()));
        }
    }
    Ok(())
}

fn iter_all_paths(args: &Args) -> impl Iterator<Item = &Path> {
    [
        Some(args.procedures.as_path()),
        Some(args.local_votes.as_path()),
        args.params.as_deref(),
        Some(args.out.as_path()),
    ]
    .into_iter()
    .flatten()
}

/// Ensure a path is local (no scheme) and exists as a regular file.
fn ensure_local_exists(p: &Path, label: &'static str) -> Result<(), CliError> {
    let meta = fs::metadata(p).map_err(|_| CliError::NotFound(format!("{label} {}", p.display())))?;
    if !meta.is_file() {
        return Err(CliError::NotFound(format!("{label} {}", p.display())));
    }
    Ok(())
}

/// Best-effort normalization to an absolute path.
/// If canonicalize fails (e.g., path doesn't exist yet), produce an absolute path relative to CWD.
fn normalize_path(p: &Path) -> PathBuf {
    fs::canonicalize(p).unwrap_or_else(|_| {
        if p.is_absolute() {
            p.to_path_buf()
        } else {
            env::current_dir().unwrap_or_else(|_| PathBuf::from(".")).join(p)
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(extra: &[&str]) -> Args {
        let mut argv = vec!["wm", "--procedures", "p.json", "--local-votes", "l.json"];
        argv.extend_from_slice(extra);
        Args::try_parse_from(argv).unwrap()
    }

    #[test]
    fn defaults() {
        let a = parse(&[]);
        assert_eq!(a.selected, 0);
        assert_eq!(a.out, PathBuf::from("."));
        assert!(a.render.is_empty());
        assert_eq!(a.lang, "de");
        assert!(!a.validate_only);
    }

    #[test]
    fn render_accepts_up_to_two() {
        let a = parse(&["--render", "json", "html"]);
        assert_eq!(a.render, vec!["json", "html"]);
        assert!(Args::try_parse_from(["wm", "--procedures", "p", "--local-votes", "l", "--render", "pdf"]).is_err());
    }

    #[test]
    fn local_votes_flag_is_required() {
        assert!(Args::try_parse_from(["wm", "--procedures", "p.json"]).is_err());
    }

    #[test]
    fn quiet_and_verbose_conflict() {
        assert!(Args::try_parse_from(["wm", "--procedures", "p", "--local-votes", "l", "--quiet", "--verbose"]).is_err());
    }

    #[test]
    fn ensure_local_path_rejects_schemes() {
        assert!(ensure_local_path(Path::new("http://x")).is_err());
        assert!(ensure_local_path(Path::new("file://C:/x.json")).is_err());
        assert!(ensure_local_path(Path::new("https://x/y.json")).is_err());
        assert!(ensure_local_path(Path::new("/tmp/file.json")).is_ok());
    }

    #[test]
    fn validate_reports_missing_file() {
        let a = parse(&[]);
        assert!(matches!(validate(a), Err(CliError::NotFound(_))));
    }

    #[test]
    fn validate_rejects_url_before_existence() {
        let a = Args::try_parse_from(["wm", "--procedures", "https://api/x.json", "--local-votes", "l"]).unwrap();
        assert!(matches!(validate(a), Err(CliError::NonLocalPath(_))));
    }

    #[test]
    fn normalize_path_returns_absolute() {
        assert!(normalize_path(Path::new("does/not/exist.txt")).is_absolute());
    }
}
