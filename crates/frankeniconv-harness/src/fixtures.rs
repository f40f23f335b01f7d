//! Fixture loading and management.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::HarnessError;

/// How a case drives the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FixtureOperation {
    /// open, one `convert` per chunk (resubmitting unconsumed tails), close.
    Stream,
    /// `conv_detailed` over the concatenated chunks.
    OneShot,
}

impl FixtureOperation {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Stream => "stream",
            Self::OneShot => "oneshot",
        }
    }
}

fn default_operation() -> String {
    FixtureOperation::Stream.as_str().to_string()
}

/// A single fixture test case.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixtureCase {
    /// Case identifier.
    pub name: String,
    /// `stream` (default) or `oneshot`.
    #[serde(default = "default_operation")]
    pub operation: String,
    /// Source charset name as passed to `open`.
    pub from: String,
    /// Target charset name, suffixes included.
    pub to: String,
    /// Optional policy override (`substitute`, `ignore`, `strict`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback: Option<String>,
    /// Hex-encoded input, one entry per call.
    pub chunks: Vec<String>,
    /// Hex-encoded expected output, close bytes included.
    pub expected_output: String,
    /// Expected `IconvError::kind`, if the case must fail.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_error: Option<String>,
    /// Expected errno (0 on success).
    #[serde(default)]
    pub expected_errno: i32,
    /// Expected non-reversible count, when checked.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_non_reversible: Option<usize>,
}

impl FixtureCase {
    pub fn operation(&self) -> Result<FixtureOperation, HarnessError> {
        match self.operation.to_ascii_lowercase().as_str() {
            "stream" => Ok(FixtureOperation::Stream),
            "oneshot" | "one-shot" | "conv" => Ok(FixtureOperation::OneShot),
            _ => Err(HarnessError::UnknownOperation {
                case: self.name.clone(),
                operation: self.operation.clone(),
            }),
        }
    }

    /// Decoded input chunks.
    pub fn input_chunks(&self) -> Result<Vec<Vec<u8>>, HarnessError> {
        self.chunks
            .iter()
            .map(|chunk| decode_hex(&self.name, chunk))
            .collect()
    }

    pub fn expected_bytes(&self) -> Result<Vec<u8>, HarnessError> {
        decode_hex(&self.name, &self.expected_output)
    }

    /// `"<from> -> <to>"`, used in logs and reports.
    #[must_use]
    pub fn charset_pair(&self) -> String {
        format!("{} -> {}", self.from, self.to)
    }
}

/// A collection of fixture cases for one charset family.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixtureSet {
    /// Schema version.
    pub version: String,
    /// Family name (e.g. `japanese`, `unicode`).
    pub family: String,
    /// Individual test cases.
    pub cases: Vec<FixtureCase>,
}

impl FixtureSet {
    /// Load fixture set from JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Serialize fixture set to JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Load fixture set from a file path.
    pub fn from_file(path: &Path) -> Result<Self, HarnessError> {
        let content = std::fs::read_to_string(path)?;
        Ok(Self::from_json(&content)?)
    }
}

/// A fixture set together with where it came from.
#[derive(Debug, Clone)]
pub struct LoadedFixture {
    pub path: PathBuf,
    /// Lowercase hex SHA-256 of the file bytes.
    pub sha256: String,
    pub set: FixtureSet,
}

impl LoadedFixture {
    pub fn from_file(path: &Path) -> Result<Self, HarnessError> {
        let bytes = std::fs::read(path)?;
        let set = serde_json::from_slice(&bytes)?;
        Ok(Self {
            path: path.to_path_buf(),
            sha256: hex_lower(&Sha256::digest(&bytes)),
            set,
        })
    }
}

/// Loads one fixture file, or every `*.json` file of a directory in path
/// order.
pub fn load_fixtures(path: &Path) -> Result<Vec<LoadedFixture>, HarnessError> {
    if path.is_file() {
        return Ok(vec![LoadedFixture::from_file(path)?]);
    }
    let mut paths: Vec<PathBuf> = std::fs::read_dir(path)?
        .filter_map(|entry| entry.ok().map(|entry| entry.path()))
        .filter(|path| path.extension().and_then(|s| s.to_str()) == Some("json"))
        .collect();
    paths.sort();
    if paths.is_empty() {
        return Err(HarnessError::NoFixtures {
            path: path.to_path_buf(),
        });
    }
    paths.iter().map(|path| LoadedFixture::from_file(path)).collect()
}

pub(crate) fn hex_lower(bytes: &[u8]) -> String {
    const DIGITS: &[u8; 16] = b"0123456789abcdef";
    let mut out = String::with_capacity(bytes.len() * 2);
    for &b in bytes {
        out.push(char::from(DIGITS[usize::from(b >> 4)]));
        out.push(char::from(DIGITS[usize::from(b & 0x0f)]));
    }
    out
}

/// Decodes hex, ignoring ASCII whitespace between digits.
pub(crate) fn decode_hex(case: &str, value: &str) -> Result<Vec<u8>, HarnessError> {
    let bad = || HarnessError::BadHex {
        case: case.to_string(),
        value: value.to_string(),
    };
    let digits: Vec<u8> = value
        .bytes()
        .filter(|b| !b.is_ascii_whitespace())
        .map(|b| match b {
            b'0'..=b'9' => Some(b - b'0'),
            b'a'..=b'f' => Some(b - b'a' + 10),
            b'A'..=b'F' => Some(b - b'A' + 10),
            _ => None,
        })
        .collect::<Option<_>>()
        .ok_or_else(bad)?;
    if digits.len() % 2 != 0 {
        return Err(bad());
    }
    Ok(digits.chunks(2).map(|pair| (pair[0] << 4) | pair[1]).collect())
}
