//! Boundary handlers for the surrounding application.
//!
//! These take untrusted payloads, validate them once, and hand typed
//! requests to the engine or the folder listing.

use crate::contract::{
    DirectoryEntry, ExecuteRequest, ExecutionResult, INVALID_EXECUTE_PARAMS, ReadFolderRequest,
    ReadFolderResponse,
};
use crate::engine::ReorganizeEngine;
use crate::fs_ops::{FileSystem, is_hidden};
use serde_json::Value;
use std::io;
use std::path::Path;

/// Lists the visible top-level entries of a folder for display.
///
/// Unlike the engine, failures come back as a friendly message.
pub fn read_folder<F: FileSystem>(fs: &F, request: &ReadFolderRequest) -> ReadFolderResponse {
    match fs.read_dir(Path::new(&request.folder_path)) {
        Ok(entries) => ReadFolderResponse {
            files: entries
                .into_iter()
                .filter(|e| !is_hidden(&e.name))
                .map(|e| DirectoryEntry {
                    is_file: e.is_file(),
                    name: e.name,
                })
                .collect(),
            error: None,
        },
        Err(e) if e.kind() == io::ErrorKind::PermissionDenied => {
            log::warn!("Permission denied reading {}", request.folder_path);
            ReadFolderResponse::error("Permission denied. ClutterCut cannot read this folder.")
        }
        Err(e) => ReadFolderResponse::error(format!("Failed to read folder: {}", e)),
    }
}

/// Validates a raw read-folder payload and lists the folder.
pub fn handle_read_folder<F: FileSystem>(fs: &F, payload: &Value) -> ReadFolderResponse {
    let folder_path = payload
        .get("folderPath")
        .and_then(Value::as_str)
        .filter(|path| !path.trim().is_empty());

    match folder_path {
        Some(path) => read_folder(
            fs,
            &ReadFolderRequest {
                folder_path: path.to_string(),
            },
        ),
        None => ReadFolderResponse::error("Invalid folder path."),
    }
}

/// Validates a raw execute payload and runs it.
///
/// Malformed payloads never reach the engine and yield a system error result.
pub fn handle_execute<F: FileSystem>(
    engine: &ReorganizeEngine<F>,
    payload: &Value,
) -> ExecutionResult {
    match ExecuteRequest::from_value(payload) {
        Ok(request) => engine.execute(&request),
        Err(e) => {
            log::warn!("Rejected execute request: {}", e);
            ExecutionResult::system_error(INVALID_EXECUTE_PARAMS)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs_ops::OsFileSystem;
    use serde_json::json;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_read_folder_lists_visible_entries() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base_path = temp_dir.path();
        fs::write(base_path.join("a.txt"), "a").unwrap();
        fs::write(base_path.join(".DS_Store"), "").unwrap();
        fs::create_dir(base_path.join("Photos")).unwrap();

        let response = read_folder(
            &OsFileSystem,
            &ReadFolderRequest {
                folder_path: base_path.to_string_lossy().to_string(),
            },
        );

        assert!(response.error.is_none());
        assert_eq!(
            response.files,
            vec![DirectoryEntry::folder("Photos"), DirectoryEntry::file("a.txt")]
        );
    }

    #[test]
    fn test_read_folder_missing_path_reports_error() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let missing = temp_dir.path().join("missing");

        let response = read_folder(
            &OsFileSystem,
            &ReadFolderRequest {
                folder_path: missing.to_string_lossy().to_string(),
            },
        );

        assert!(response.files.is_empty());
        assert!(response.error.unwrap().starts_with("Failed to read folder: "));
    }

    #[test]
    fn test_handle_read_folder_rejects_blank_path() {
        for payload in [json!({}), json!({ "folderPath": "   " }), json!({ "folderPath": 3 })] {
            let response = handle_read_folder(&OsFileSystem, &payload);
            assert_eq!(response.error.as_deref(), Some("Invalid folder path."));
        }
    }

    #[test]
    fn test_handle_execute_rejects_invalid_payload() {
        let engine = ReorganizeEngine::new();
        let result = handle_execute(&engine, &json!({ "folderPath": "/x", "rules": "pdf" }));

        assert!(!result.success);
        assert_eq!(result.moved_count, 0);
        assert_eq!(result.failed_count, 0);
        assert!(result.before_snapshot.is_empty());
        assert_eq!(result.errors[0].file_name, "System Error");
        assert_eq!(result.errors[0].reason, INVALID_EXECUTE_PARAMS);
    }

    #[test]
    fn test_handle_execute_runs_valid_payload() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base_path = temp_dir.path();
        fs::write(base_path.join("a.pdf"), "pdf").unwrap();

        let payload = json!({
            "folderPath": base_path.to_string_lossy(),
            "rules": [{ "conditionType": "extension", "conditionValue": "pdf", "destinationFolder": "Documents" }]
        });
        let result = handle_execute(&ReorganizeEngine::new(), &payload);

        assert!(result.success);
        assert_eq!(result.moved_count, 1);
        assert!(base_path.join("Documents").join("a.pdf").exists());
    }
}
