//! crates/wm_io/src/hasher.rs
//!
//! Deterministic hashing and ID builders for canonical artifacts.
//!
//! - Canonical JSON hashing: **sorted object keys**, array order preserved.
//! - `RES:` ids derive from the canonical bytes of the result body.
//! - Hex digests are **lowercase**.
//!
//! Use `sha256_canonical(..)` for JSON values/structs and `sha256_hex(..)` for
//! raw bytes.

#![forbid(unsafe_code)]

use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::canonical_json::to_canonical_bytes;
use crate::{IoError, IoResult};

/// SHA-256 over raw bytes, lowercase hex.
pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

/// SHA-256 over **canonical JSON bytes** of any serializable value.
pub fn sha256_canonical<T: Serialize + ?Sized>(value: &T) -> IoResult<String> {
    let bytes = to_canonical_bytes(value)?;
    Ok(sha256_hex(&bytes))
}

/// `RES:<hex>`: id for `result.json` derived from canonical bytes of the
/// result body (without its own id).
pub fn res_id_from_canonical<T: Serialize + ?Sized>(value: &T) -> IoResult<String> {
    let hex = sha256_canonical(value)?;
    Ok(format!("RES:{hex}"))
}

/// Check a `RES:<64-hex>` id shape.
pub fn parse_res_id(s: &str) -> IoResult<&str> {
    let hex = s
        .strip_prefix("RES:")
        .ok_or_else(|| IoError::Hash(format!("missing RES: prefix in {s}")))?;
    if hex.len() == 64 && hex.bytes().all(|c| matches!(c, b'0'..=b'9' | b'a'..=b'f')) {
        Ok(hex)
    } else {
        Err(IoError::Hash(format!("invalid lowercase 64-hex: {hex}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn known_digest() {
        assert_eq!(
            sha256_hex(b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn key_order_does_not_change_digest() {
        let a = sha256_canonical(&json!({"a": 1, "b": [1, 2]})).unwrap();
        let b = sha256_canonical(&json!({"b": [1, 2], "a": 1})).unwrap();
        assert_eq!(a, b);
        let c = sha256_canonical(&json!({"b": [2, 1], "a": 1})).unwrap();
        assert_ne!(a, c);
    }

    #[test]
    fn res_id_round_trips_shape() {
        let id = res_id_from_canonical(&json!({"x": 1})).unwrap();
        assert!(parse_res_id(&id).is_ok());
        assert!(parse_res_id("RES:ABC").is_err());
        assert!(parse_res_id("FR:00").is_err());
    }
}
