// ─────────────────────────────────────────────────────────────────────
// Visage Rig Engine — Definition Error Hierarchy
// ─────────────────────────────────────────────────────────────────────

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failure modes of the rig-definition parser.
///
/// Solve-time anomalies are never errors — an inactive combo or a
/// degenerate sub-simplex simply contributes nothing. The only fallible
/// surface is loading a definition document.
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DefinitionError {
    /// The definition is not parseable JSON. `offset` is the byte
    /// offset reported by the JSON reader.
    #[error("malformed definition at offset {offset}: {message}")]
    Malformed { message: String, offset: usize },

    /// Structurally valid JSON with a missing/mistyped field or an
    /// out-of-range index reference.
    #[error("schema violation: {message}")]
    Schema { message: String },

    /// `encodingVersion` is not one the parser understands.
    #[error("unsupported encoding version {version}")]
    UnsupportedEncoding { version: u64 },
}

impl DefinitionError {
    /// Build a schema violation with a formatted message.
    pub fn schema(message: impl Into<String>) -> Self {
        DefinitionError::Schema {
            message: message.into(),
        }
    }

    /// Character offset of the failure, 0 when not applicable.
    pub fn offset(&self) -> usize {
        match self {
            DefinitionError::Malformed { offset, .. } => *offset,
            _ => 0,
        }
    }
}

pub type DefResult<T> = Result<T, DefinitionError>;
