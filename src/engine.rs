//! Rule-driven reorganization of a folder's top level.
//!
//! [`ReorganizeEngine::execute`] scans a folder, moves every file matched by
//! a rule into its destination subfolder, resolves name collisions by
//! numbering, and reports before/after snapshots plus per-file failures.
//! It only creates directories, checks existence and renames. Nothing is
//! ever deleted.

use crate::contract::{ExecuteRequest, ExecutionResult, MoveFailure, SYSTEM_ERROR_FILE_NAME};
use crate::fs_ops::{FileSystem, ListedEntry, OsFileSystem, is_hidden};
use crate::rules::match_rule;
use crate::snapshot::TouchedFolders;
use std::path::{Path, PathBuf};

/// Errors raised while reorganizing a folder.
///
/// Only [`EngineError::ScanFailed`] aborts a run. Every other variant is
/// recorded against the file it concerns and the run continues.
#[derive(Debug)]
pub enum EngineError {
    /// The root folder could not be listed.
    ScanFailed {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Failed to create a destination directory.
    DirectoryCreationFailed {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Could not tell whether a candidate destination name is taken.
    ProbeFailed {
        path: PathBuf,
        source: std::io::Error,
    },
    /// The file's name is not valid UTF-8, so it cannot be addressed by the
    /// name it is listed under.
    UnaddressableName { name: String },
    /// Failed to move a file to its destination.
    FileMoveFailure {
        source: PathBuf,
        destination: PathBuf,
        source_error: std::io::Error,
    },
}

impl EngineError {
    /// The reason reported to callers: the operating system's error text,
    /// unmodified, or a fixed message when no system call was made.
    pub fn reason(&self) -> String {
        match self {
            Self::ScanFailed { source, .. }
            | Self::DirectoryCreationFailed { source, .. }
            | Self::ProbeFailed { source, .. } => source.to_string(),
            Self::UnaddressableName { .. } => "File name is not valid UTF-8".to_string(),
            Self::FileMoveFailure { source_error, .. } => source_error.to_string(),
        }
    }
}

impl std::fmt::Display for EngineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ScanFailed { path, source } => {
                write!(f, "Failed to read folder {}: {}", path.display(), source)
            }
            Self::DirectoryCreationFailed { path, source } => {
                write!(
                    f,
                    "Failed to create directory {}: {}",
                    path.display(),
                    source
                )
            }
            Self::ProbeFailed { path, source } => {
                write!(f, "Failed to check {}: {}", path.display(), source)
            }
            Self::UnaddressableName { name } => {
                write!(f, "Cannot move {}: file name is not valid UTF-8", name)
            }
            Self::FileMoveFailure {
                source,
                destination,
                source_error,
            } => {
                write!(
                    f,
                    "Failed to move {} to {}: {}",
                    source.display(),
                    destination.display(),
                    source_error
                )
            }
        }
    }
}

impl std::error::Error for EngineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ScanFailed { source, .. }
            | Self::DirectoryCreationFailed { source, .. }
            | Self::ProbeFailed { source, .. } => Some(source),
            Self::UnaddressableName { .. } => None,
            Self::FileMoveFailure { source_error, .. } => Some(source_error),
        }
    }
}

pub type EngineResult<T> = Result<T, EngineError>;

/// A file that was moved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovedFile {
    pub original_name: String,
    /// Name at the destination after conflict resolution.
    pub final_name: String,
    pub destination: String,
}

/// What happened to one matched file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveOutcome {
    Moved(MovedFile),
    Failed(MoveFailure),
}

/// Splits a file name into base and extension, the dot kept on the extension.
///
/// Only a dot after the first character separates an extension, matching
/// how rules read extensions.
pub fn split_name(file_name: &str) -> (&str, &str) {
    match file_name.rfind('.') {
        Some(dot) if dot > 0 => file_name.split_at(dot),
        _ => (file_name, ""),
    }
}

/// Returns the `attempt`-th candidate name for `file_name`.
///
/// Attempt 0 is the name itself, then `base_1.ext`, `base_2.ext`, and so on.
pub fn numbered_name(file_name: &str, attempt: u64) -> String {
    if attempt == 0 {
        return file_name.to_string();
    }
    let (base, ext) = split_name(file_name);
    format!("{}_{}{}", base, attempt, ext)
}

/// Reorganizes folders according to ordered rules.
///
/// The engine keeps no state between calls; each run re-reads the folder.
#[derive(Debug, Clone, Default)]
pub struct ReorganizeEngine<F = OsFileSystem> {
    fs: F,
}

impl ReorganizeEngine<OsFileSystem> {
    pub fn new() -> Self {
        Self { fs: OsFileSystem }
    }
}

impl<F: FileSystem> ReorganizeEngine<F> {
    /// Creates an engine over a custom filesystem.
    pub fn with_fs(fs: F) -> Self {
        Self { fs }
    }

    pub fn fs(&self) -> &F {
        &self.fs
    }

    /// Runs a request and returns its result. Never fails as a whole.
    ///
    /// The after snapshot comes from a second listing of the folder, so
    /// changes made by other processes during the run show up in it.
    /// Destinations are matched to that listing by exact name first, then
    /// case-insensitively, so a folder reached through a differently cased
    /// name or through a symlink is still reported as touched.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use cluttercut::contract::ExecuteRequest;
    /// use cluttercut::engine::ReorganizeEngine;
    /// use cluttercut::rules::{ConditionType, Rule};
    ///
    /// let request = ExecuteRequest::new(
    ///     "/path/to/Downloads",
    ///     vec![Rule::new(ConditionType::Extension, "pdf", "Documents")],
    /// );
    /// let result = ReorganizeEngine::new().execute(&request);
    /// println!("moved {}, failed {}", result.moved_count, result.failed_count);
    /// ```
    pub fn execute(&self, request: &ExecuteRequest) -> ExecutionResult {
        self.execute_with_observer(request, |_| {})
    }

    /// Like [`execute`](Self::execute), reporting each matched file's outcome
    /// to `observer` as soon as it is known.
    pub fn execute_with_observer<O>(
        &self,
        request: &ExecuteRequest,
        mut observer: O,
    ) -> ExecutionResult
    where
        O: FnMut(&MoveOutcome),
    {
        let root = Path::new(&request.folder_path);

        let before = match self.scan(root) {
            Ok(entries) => entries,
            Err(e) => {
                log::error!("{}", e);
                return ExecutionResult::system_error(e.reason());
            }
        };

        let mut result = ExecutionResult {
            success: true,
            ..Default::default()
        };
        result.before_snapshot.insert(
            request.folder_path.clone(),
            before.iter().map(|e| e.name.clone()).collect(),
        );

        let mut touched = TouchedFolders::new();

        for entry in before.iter().filter(|e| e.is_file()) {
            let Some(found) = match_rule(&entry.name, &request.rules) else {
                log::debug!("{}: no matching rule", entry.name);
                continue;
            };

            let moved = if entry.lossy {
                Err(EngineError::UnaddressableName {
                    name: entry.name.clone(),
                })
            } else {
                self.move_file(root, &entry.name, found.destination)
            };

            let outcome = match moved {
                Ok(final_name) => {
                    log::debug!(
                        "{} -> {}/{} (rule {})",
                        entry.name,
                        found.destination,
                        final_name,
                        found.index + 1
                    );
                    result.moved_count += 1;
                    touched.record(found.destination, final_name.clone());
                    MoveOutcome::Moved(MovedFile {
                        original_name: entry.name.clone(),
                        final_name,
                        destination: found.destination.to_string(),
                    })
                }
                Err(e) => {
                    log::warn!("{}", e);
                    let failure = MoveFailure {
                        file_name: entry.name.clone(),
                        reason: e.reason(),
                    };
                    result.success = false;
                    result.failed_count += 1;
                    result.errors.push(failure.clone());
                    MoveOutcome::Failed(failure)
                }
            };
            observer(&outcome);
        }

        match self.scan(root) {
            Ok(after) => {
                let entries =
                    touched.annotate(after.iter().map(|e| (e.name.as_str(), !e.is_file())));
                result
                    .after_snapshot
                    .insert(request.folder_path.clone(), entries);
            }
            Err(e) => {
                // Moves already happened, so keep the counts and report the rescan failure.
                log::error!("{}", e);
                result.success = false;
                result.errors.push(MoveFailure {
                    file_name: SYSTEM_ERROR_FILE_NAME.to_string(),
                    reason: e.reason(),
                });
            }
        }

        log::info!(
            "Reorganized {}: {} moved, {} failed",
            request.folder_path,
            result.moved_count,
            result.failed_count
        );

        result
    }

    /// Lists the visible top-level entries of `root`.
    fn scan(&self, root: &Path) -> EngineResult<Vec<ListedEntry>> {
        let entries = self
            .fs
            .read_dir(root)
            .map_err(|e| EngineError::ScanFailed {
                path: root.to_path_buf(),
                source: e,
            })?;
        Ok(entries.into_iter().filter(|e| !is_hidden(&e.name)).collect())
    }

    /// Moves `file_name` from `root` into `root/destination`, returning the
    /// name it ended up with.
    fn move_file(&self, root: &Path, file_name: &str, destination: &str) -> EngineResult<String> {
        let destination_dir = root.join(destination);
        self.fs
            .create_dir_all(&destination_dir)
            .map_err(|e| EngineError::DirectoryCreationFailed {
                path: destination_dir.clone(),
                source: e,
            })?;

        let final_name = self.resolve_conflict(&destination_dir, file_name)?;
        let source = root.join(file_name);
        let target = destination_dir.join(&final_name);

        self.fs
            .rename(&source, &target)
            .map_err(|e| EngineError::FileMoveFailure {
                source,
                destination: target,
                source_error: e,
            })?;

        Ok(final_name)
    }

    /// Finds the first free name for `file_name` inside `destination_dir`.
    ///
    /// Candidates are `name`, `base_1.ext`, `base_2.ext`, ... Every candidate
    /// is distinct and a directory holds finitely many entries, so some
    /// candidate is free and the loop ends. Moves run one at a time, so each
    /// probe already sees files placed earlier in the same run.
    pub fn resolve_conflict(&self, destination_dir: &Path, file_name: &str) -> EngineResult<String> {
        let mut attempt = 0;
        loop {
            let candidate = numbered_name(file_name, attempt);
            let path = destination_dir.join(&candidate);
            let taken = self
                .fs
                .exists(&path)
                .map_err(|e| EngineError::ProbeFailed {
                    path: path.clone(),
                    source: e,
                })?;
            if !taken {
                return Ok(candidate);
            }
            log::debug!("{} already exists, trying next suffix", path.display());
            attempt += 1;
        }
    }
}
