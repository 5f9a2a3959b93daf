//! JSON codec between the agent list and its on-disk form.
//!
//! The same codec is used for the primary file, snapshots, import and
//! export: a top-level JSON array of objects, pretty-printed with two-space
//! indentation, UTF-8, non-ASCII text written verbatim.

use crate::agent::domain::AgentRecord;
use crate::error::ApiError;
use serde_json::Value;
use std::path::Path;

/// Serialize records to the on-disk text form.
pub fn encode(records: &[AgentRecord]) -> Result<String, ApiError> {
    let mut text = serde_json::to_string_pretty(records)
        .map_err(|e| ApiError::SerializeError(e.to_string()))?;
    text.push('\n');
    Ok(text)
}

/// Parse the on-disk text form. `origin` is only used in error messages.
///
/// The top level must be an array and every element an object; inside an
/// object missing or mistyped fields take their defaults (see `AgentRecord`).
pub fn decode(content: &str, origin: &Path) -> Result<Vec<AgentRecord>, ApiError> {
    let parse_error = |message: String| ApiError::ParseError {
        path: origin.to_path_buf(),
        message,
    };

    let value: Value = serde_json::from_str(content)
        .map_err(|e| parse_error(format!("invalid JSON: {}", e)))?;
    let Value::Array(items) = value else {
        return Err(parse_error(
            "expected a JSON array of agent objects".to_string(),
        ));
    };

    items
        .into_iter()
        .enumerate()
        .map(|(position, item)| {
            if !item.is_object() {
                return Err(parse_error(format!(
                    "element {} is not a JSON object",
                    position
                )));
            }
            serde_json::from_value(item)
                .map_err(|e| parse_error(format!("element {}: {}", position, e)))
        })
        .collect()
}

/// Read and decode a file.
pub fn load(path: &Path) -> Result<Vec<AgentRecord>, ApiError> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            ApiError::NotFound(path.to_path_buf())
        } else {
            ApiError::io(path, e)
        }
    })?;
    let records = decode(&content, path)?;
    tracing::debug!("Loaded {} agents from {}", records.len(), path.display());
    Ok(records)
}

/// Encode and write a file, overwriting it.
///
/// This is the raw write; taking the automatic snapshot first is the job of
/// `AgentCommandService::save`.
pub fn save(path: &Path, records: &[AgentRecord]) -> Result<(), ApiError> {
    let text = encode(records)?;
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|e| ApiError::io(parent, e))?;
        }
    }
    std::fs::write(path, text).map_err(|e| ApiError::io(path, e))?;
    tracing::debug!("Wrote {} agents to {}", records.len(), path.display());
    Ok(())
}
