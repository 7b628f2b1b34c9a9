//! JSON encoding of boards for persistence, export and import.

use crate::board::Board;
use serde_json::Value;
use thiserror::Error;

/// File name offered for exported boards.
pub const EXPORT_FILE_NAME: &str = "whiteboard-teams.json";
/// MIME type of exported boards.
pub const EXPORT_MIME_TYPE: &str = "application/json";

/// Reasons an externally supplied document is rejected.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("Not a valid JSON document: {0}")]
    Parse(String),
    #[error("Not a board document: {0}")]
    Schema(String),
}

/// Result type for decoding.
pub type CodecResult<T> = Result<T, CodecError>;

/// Compact JSON for the local store.
pub fn serialize(board: &Board) -> Result<String, serde_json::Error> {
    serde_json::to_string(board)
}

/// Indented JSON for export files.
pub fn serialize_pretty(board: &Board) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(board)
}

/// Decode a board document.
///
/// The top level must be an object holding both `items` and `settings`.
/// Item fields beyond their basic types are not checked; missing ones take
/// their defaults. Items repeating an earlier id are given a fresh one.
pub fn deserialize(text: &str) -> CodecResult<Board> {
    let value: Value = serde_json::from_str(text).map_err(|e| CodecError::Parse(e.to_string()))?;

    let Some(object) = value.as_object() else {
        return Err(CodecError::Schema("top-level value is not an object".to_string()));
    };
    let missing: Vec<&str> = ["items", "settings"]
        .into_iter()
        .filter(|key| !object.contains_key(*key))
        .collect();
    if !missing.is_empty() {
        return Err(CodecError::Schema(format!("missing {}", missing.join(" and "))));
    }

    let board: Board =
        serde_json::from_value(value).map_err(|e| CodecError::Schema(e.to_string()))?;
    Ok(board.with_unique_ids())
}

/// A downloadable board document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportFile {
    pub file_name: &'static str,
    pub mime_type: &'static str,
    pub contents: String,
}

impl ExportFile {
    pub fn new(board: &Board) -> Result<Self, serde_json::Error> {
        Ok(Self {
            file_name: EXPORT_FILE_NAME,
            mime_type: EXPORT_MIME_TYPE,
            contents: serialize_pretty(board)?,
        })
    }
}
