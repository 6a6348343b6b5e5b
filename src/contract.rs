//! Request and response shapes exchanged with the surrounding application.
//!
//! Callers hand over loosely shaped JSON. It is validated once here into
//! strongly typed requests, so the engine never sees a malformed request.

use crate::fs_ops::is_hidden;
use crate::rules::Rule;
use crate::snapshot::{AfterSnapshot, BeforeSnapshot};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;

/// File name reported for failures that are not tied to a single file.
pub const SYSTEM_ERROR_FILE_NAME: &str = "System Error";

/// Reason reported when a request fails boundary validation.
pub const INVALID_EXECUTE_PARAMS: &str = "Invalid parameters sent to execute.";

/// A flat directory listing entry as shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectoryEntry {
    pub name: String,
    pub is_file: bool,
}

impl DirectoryEntry {
    pub fn file(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_file: true,
        }
    }

    pub fn folder(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_file: false,
        }
    }
}

/// Asks the engine to reorganize the top level of `folder_path`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecuteRequest {
    pub folder_path: String,
    pub rules: Vec<Rule>,
}

/// Errors found while validating a raw execute request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestError {
    /// The payload is not a JSON object.
    NotAnObject,
    /// `folderPath` is absent or not a string.
    InvalidFolderPath,
    /// `rules` is absent or not an array.
    InvalidRules,
    /// A rule entry could not be read.
    MalformedRule { index: usize, reason: String },
    /// A destination is a path rather than a bare folder name.
    InvalidDestination { index: usize, destination: String },
}

impl std::fmt::Display for RequestError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotAnObject => write!(f, "request is not an object"),
            Self::InvalidFolderPath => write!(f, "'folderPath' must be a string"),
            Self::InvalidRules => write!(f, "'rules' must be a list"),
            Self::MalformedRule { index, reason } => {
                write!(f, "rule {} is malformed: {}", index + 1, reason)
            }
            Self::InvalidDestination { index, destination } => write!(
                f,
                "rule {} destination '{}' must be a visible folder name, not a path",
                index + 1,
                destination
            ),
        }
    }
}

impl std::error::Error for RequestError {}

impl ExecuteRequest {
    pub fn new(folder_path: impl Into<String>, rules: Vec<Rule>) -> Self {
        Self {
            folder_path: folder_path.into(),
            rules,
        }
    }

    /// Validates an untrusted JSON payload into a request.
    pub fn from_value(value: &Value) -> Result<Self, RequestError> {
        let object = value.as_object().ok_or(RequestError::NotAnObject)?;

        let folder_path = object
            .get("folderPath")
            .and_then(Value::as_str)
            .ok_or(RequestError::InvalidFolderPath)?;

        let raw_rules = object
            .get("rules")
            .and_then(Value::as_array)
            .ok_or(RequestError::InvalidRules)?;

        let rules = raw_rules
            .iter()
            .enumerate()
            .map(|(index, raw)| {
                serde_json::from_value::<Rule>(raw.clone()).map_err(|e| {
                    RequestError::MalformedRule {
                        index,
                        reason: e.to_string(),
                    }
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let request = Self::new(folder_path, rules);
        request.validate()?;
        Ok(request)
    }

    /// Checks that every destination is a bare folder name.
    pub fn validate(&self) -> Result<(), RequestError> {
        for (index, rule) in self.rules.iter().enumerate() {
            if !is_bare_folder_name(&rule.destination_folder) {
                return Err(RequestError::InvalidDestination {
                    index,
                    destination: rule.destination_folder.clone(),
                });
            }
        }
        Ok(())
    }
}

/// Returns false for destinations that would escape or address the root, or
/// that would be hidden from the listing the after snapshot is built from.
///
/// Blank destinations pass: such rules are incomplete and simply never match.
pub fn is_bare_folder_name(destination: &str) -> bool {
    let trimmed = destination.trim();
    if trimmed.is_empty() {
        return true;
    }
    !(is_hidden(trimmed)
        || trimmed.contains('/')
        || trimmed.contains('\\')
        || Path::new(trimmed).is_absolute())
}

/// A file the engine tried to move but could not.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveFailure {
    pub file_name: String,
    /// The operating system's error text, unmodified.
    pub reason: String,
}

/// Outcome of one reorganization run.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionResult {
    /// True iff nothing failed.
    pub success: bool,
    pub moved_count: usize,
    pub failed_count: usize,
    pub errors: Vec<MoveFailure>,
    pub before_snapshot: BeforeSnapshot,
    pub after_snapshot: AfterSnapshot,
}

impl ExecutionResult {
    /// A result for a run that failed before any file was considered.
    pub fn system_error(reason: impl Into<String>) -> Self {
        Self {
            success: false,
            errors: vec![MoveFailure {
                file_name: SYSTEM_ERROR_FILE_NAME.to_string(),
                reason: reason.into(),
            }],
            ..Default::default()
        }
    }

    /// Some files moved and some failed.
    pub fn is_partial_success(&self) -> bool {
        self.moved_count > 0 && self.failed_count > 0
    }
}

/// Asks for a flat listing of `folder_path`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadFolderRequest {
    pub folder_path: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadFolderResponse {
    pub files: Vec<DirectoryEntry>,
    /// Human readable error, or `None` when the listing succeeded.
    pub error: Option<String>,
}

impl ReadFolderResponse {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            files: Vec::new(),
            error: Some(message.into()),
        }
    }
}
