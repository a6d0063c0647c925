//! Content Fingerprints
//!
//! Deterministic content hashes and keyless audit markers bound to
//! (content hash, previous hash, timestamp).
//!
//! The default `mixing` scheme is fast and reproducible but NOT
//! cryptographic. Deployments that need real tamper-evidence should build
//! chains with `HashScheme::Sha256`. Neither scheme is a signature in the
//! asymmetric sense: anyone holding the inputs can recompute the marker.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// Previous-hash sentinel for the first event of every chain
pub const GENESIS_HASH: &str = "0000000000000000000000000000000000000000000000000000000000000000";

/// Length of every content hash, in hex characters
pub const HASH_HEX_LEN: usize = 64;

/// Length of every audit marker produced by `sign`
pub const SIGNATURE_LEN: usize = 88;

const MIXING_SEEDS: [i32; 8] = [
    0x5a4d, 0x8f3c, 0x1b7e, 0xd2a9, 0x6c1f, 0xe49b, 0x374a, 0xbc50,
];

const GOLDEN_GAMMA: i32 = 0x9e37_79b9_u32 as i32;

const SIGNATURE_ALPHABET: &[u8; 64] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";

/// Hash and marker functions shared by chain building, verification and proofs
pub trait Fingerprinter {
    /// 64 lowercase hex characters, deterministic in `input`
    fn hash(&self, input: &str) -> String;

    /// Fixed-length audit marker over the three inputs
    fn sign(&self, content_hash: &str, previous_hash: &str, timestamp: &str) -> String;
}

/// Fingerprint scheme a chain was built with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashScheme {
    /// Multi-seed 32-bit mixing, non-cryptographic
    #[default]
    Mixing,
    /// SHA-256 digests
    Sha256,
}

impl HashScheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            HashScheme::Mixing => "mixing",
            HashScheme::Sha256 => "sha256",
        }
    }
}

impl fmt::Display for HashScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Fingerprinter for HashScheme {
    fn hash(&self, input: &str) -> String {
        match self {
            HashScheme::Mixing => mixing_hash(input),
            HashScheme::Sha256 => hex::encode(Sha256::digest(input.as_bytes())),
        }
    }

    fn sign(&self, content_hash: &str, previous_hash: &str, timestamp: &str) -> String {
        let payload = format!("{}:{}:{}", content_hash, previous_hash, timestamp);
        match self {
            HashScheme::Mixing => mixing_signature(&payload),
            HashScheme::Sha256 => sha256_signature(&payload),
        }
    }
}

/// Hash `input` with the default scheme
pub fn hash(input: &str) -> String {
    HashScheme::default().hash(input)
}

/// Audit marker over the three inputs with the default scheme
pub fn sign(content_hash: &str, previous_hash: &str, timestamp: &str) -> String {
    HashScheme::default().sign(content_hash, previous_hash, timestamp)
}

/// 31-multiplier string hash over UTF-16 code units, absolute value
pub fn string_hash(s: &str) -> u32 {
    let mut h: i32 = 0;
    for unit in s.encode_utf16() {
        h = h.wrapping_mul(31).wrapping_add(i32::from(unit));
    }
    h.unsigned_abs()
}

/// Canonical timestamp form fed into `sign`
///
/// Always second precision with a `Z` suffix, for primary and sub-events
/// alike, so markers never depend on how a timestamp was rendered.
pub fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// True when `value` is a 64-char lowercase hex string
pub fn is_hash_hex(value: &str) -> bool {
    value.len() == HASH_HEX_LEN
        && value
            .bytes()
            .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
}

fn mixing_hash(input: &str) -> String {
    let units: Vec<u16> = input.encode_utf16().collect();
    let mut out = String::with_capacity(HASH_HEX_LEN);

    for seed in MIXING_SEEDS {
        let mut h = seed;
        for &unit in &units {
            h = h.wrapping_mul(37) ^ i32::from(unit);
            h = h.wrapping_mul(GOLDEN_GAMMA) ^ ((h as u32) >> 16) as i32;
        }
        out.push_str(&format!("{:08x}", h.unsigned_abs()));
    }

    out
}

fn mixing_signature(payload: &str) -> String {
    (0..SIGNATURE_LEN)
        .map(|i| {
            let h = string_hash(&format!("{}{}{}", payload, i, i));
            SIGNATURE_ALPHABET[(h % 64) as usize] as char
        })
        .collect()
}

fn sha256_signature(payload: &str) -> String {
    let first = Sha256::digest(payload.as_bytes());

    let mut hasher = Sha256::new();
    hasher.update(&first[..]);
    hasher.update(payload.as_bytes());
    let second = hasher.finalize();

    let mut bytes = Vec::with_capacity(64);
    bytes.extend_from_slice(&first);
    bytes.extend_from_slice(&second);
    STANDARD.encode(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_hash_shape() {
        for scheme in [HashScheme::Mixing, HashScheme::Sha256] {
            for input in ["", "a", "doc-42:v1:initial:0", "ünïcødé ✓"] {
                let digest = scheme.hash(input);
                assert!(is_hash_hex(&digest), "{} produced {}", scheme, digest);
            }
        }
    }

    #[test]
    fn test_hash_deterministic() {
        assert_eq!(hash("doc-42"), hash("doc-42"));
        assert_ne!(hash("doc-42"), hash("doc-43"));
        assert_ne!(hash("ab"), hash("ba"));
    }

    #[test]
    fn test_mixing_known_vector() {
        assert_eq!(
            hash("doc-42:v1:initial:0"),
            "62ea642e02acd7bf4746f14274e2c5ce010137a26f3621e42f041b46178f2b4d"
        );
    }

    #[test]
    fn test_mixing_signature_known_vector() {
        assert_eq!(
            sign(&hash("x"), GENESIS_HASH, "2025-03-01T00:00:00Z"),
            "kEkEkEkEkEacegikmoqsYacegikmoqWYacegikmoUWYacegikmSUWYacegikQSUWYacegiOQSUWYacegMOQSUWYa"
        );
    }

    #[test]
    fn test_sha256_known_vector() {
        assert_eq!(
            HashScheme::Sha256.hash("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_signature_shape() {
        for scheme in [HashScheme::Mixing, HashScheme::Sha256] {
            let marker = scheme.sign(&"a".repeat(64), GENESIS_HASH, "2025-03-01T00:00:00Z");
            assert_eq!(marker.len(), SIGNATURE_LEN);
            assert!(marker
                .bytes()
                .all(|b| SIGNATURE_ALPHABET.contains(&b) || b == b'='));
        }
    }

    #[test]
    fn test_signature_binds_all_inputs() {
        let content = hash("content");
        let base = sign(&content, GENESIS_HASH, "2025-03-01T00:00:00Z");

        assert_eq!(base, sign(&content, GENESIS_HASH, "2025-03-01T00:00:00Z"));
        assert_ne!(base, sign(&hash("other"), GENESIS_HASH, "2025-03-01T00:00:00Z"));
        assert_ne!(base, sign(&content, &hash("prev"), "2025-03-01T00:00:00Z"));
        assert_ne!(base, sign(&content, GENESIS_HASH, "2025-06-01T00:00:00Z"));
    }

    #[test]
    fn test_string_hash() {
        assert_eq!(string_hash(""), 0);
        assert_eq!(string_hash("a"), 97);
        assert_eq!(string_hash("ab"), 97 * 31 + 98);
        assert_eq!(string_hash("doc-42"), 1_326_547_149);
    }

    #[test]
    fn test_format_timestamp() {
        let ts = Utc.with_ymd_and_hms(2025, 3, 1, 0, 47, 0).unwrap();
        assert_eq!(format_timestamp(&ts), "2025-03-01T00:47:00Z");
    }

    #[test]
    fn test_genesis_hash_is_hex() {
        assert!(is_hash_hex(GENESIS_HASH));
        assert!(!is_hash_hex("sha256:abc"));
    }

    #[test]
    fn test_scheme_serde_names() {
        assert_eq!(serde_json::to_string(&HashScheme::Sha256).unwrap(), "\"sha256\"");
        let parsed: HashScheme = serde_json::from_str("\"mixing\"").unwrap();
        assert_eq!(parsed, HashScheme::Mixing);
    }
}
