//! cluttercut - rule-based folder reorganization
//!
//! This library classifies the files at the top of a folder against an
//! ordered list of rules, moves each matched file into its destination
//! subfolder without ever overwriting or deleting anything, and reports
//! before/after snapshots together with per-file failures.

pub mod cli;
pub mod config;
pub mod contract;
pub mod engine;
pub mod folder_service;
pub mod fs_ops;
pub mod output;
pub mod preview;
pub mod rules;
pub mod snapshot;

pub use config::{ConfigError, RulesConfig};
pub use contract::{
    DirectoryEntry, ExecuteRequest, ExecutionResult, MoveFailure, ReadFolderRequest,
    ReadFolderResponse,
};
pub use engine::{EngineError, MoveOutcome, ReorganizeEngine};
pub use fs_ops::{FileSystem, OsFileSystem};
pub use preview::{Preview, preview};
pub use rules::{ConditionType, Rule, RuleMatch, match_rule};
pub use snapshot::SnapshotEntry;

pub use cli::{Cli, run_cli};
