//! crates/wm_io/src/lib.rs
//! Minimal, single-source-of-truth I/O crate.
//!
//! - Shared error type (`IoError`) with `From` conversions used across modules.
//! - Public surface kept stable; details live in submodules.

#![forbid(unsafe_code)]

use thiserror::Error;

/// Unified error for wm_io (used by canonical_json/hasher/schema/loader).
#[derive(Debug, Error)]
pub enum IoError {
    /// Reading an input file failed.
    #[error("read error: {0}")]
    Read(String),

    /// Writing an artifact failed.
    #[error("write error: {0}")]
    Write(String),

    /// Filesystem / path errors (create_dir_all, rename, fsync, etc.)
    #[error("io/path error: {0}")]
    Path(String),

    /// JSON serialization/deserialization errors with an optional JSON Pointer.
    #[error("json error at {pointer}: {msg}")]
    Json { pointer: String, msg: String },

    /// JSON Schema validation failures (first failing instance path).
    #[error("schema error at {pointer}: {msg}")]
    Schema { pointer: String, msg: String },

    /// Input exceeds a configured limit.
    #[error("limit exceeded: {0}")]
    Limit(String),

    /// Parsed input violates a domain rule (e.g. parameter domains).
    #[error("domain error: {0}")]
    Domain(String),

    /// Canonicalization failures.
    #[error("canonicalization error: {0}")]
    Canon(String),

    /// Hashing-related errors.
    #[error("hash error: {0}")]
    Hash(String),
}

pub type IoResult<T> = Result<T, IoError>;

/* ---------------- From conversions (used by file modules) ---------------- */

impl From<std::io::Error> for IoError {
    fn from(e: std::io::Error) -> Self {
        IoError::Path(e.to_string())
    }
}

impl From<serde_json::Error> for IoError {
    fn from(e: serde_json::Error) -> Self {
        // serde_json doesn't keep a pointer; default to root.
        IoError::Json {
            pointer: "/".to_string(),
            msg: e.to_string(),
        }
    }
}

impl From<wm_core::CoreError> for IoError {
    fn from(e: wm_core::CoreError) -> Self {
        IoError::Domain(e.to_string())
    }
}

pub mod canonical_json;
pub mod hasher;
pub mod loader;
pub mod schema;

/// Returns true if `s` looks like a URL (any `<scheme>://`, including `file://`).
#[inline]
pub fn looks_like_url_strict(s: &str) -> bool {
    s.trim().contains("://")
}

pub mod prelude {
    pub use crate::{looks_like_url_strict, IoError, IoResult};

    pub use crate::canonical_json::{to_canonical_bytes, write_canonical_file};
    pub use crate::hasher::{sha256_canonical, sha256_hex};
    pub use crate::loader::{load_inputs, InputDigests, LoadedContext};
}
