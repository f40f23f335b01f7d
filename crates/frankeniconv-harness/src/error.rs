//! Harness error type.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("case {case}: invalid hex string {value:?}")]
    BadHex { case: String, value: String },

    #[error("case {case}: unknown fixture operation {operation:?}")]
    UnknownOperation { case: String, operation: String },

    #[error("no fixture JSON files found in {}", path.display())]
    NoFixtures { path: PathBuf },
}
