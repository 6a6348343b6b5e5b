//! Side-effect-free preview of what a run would do.
//!
//! The preview works from a listing the caller already has and uses the same
//! matcher as the engine, so the two agree on every file. It never touches
//! the filesystem.

use crate::contract::DirectoryEntry;
use crate::fs_ops::is_hidden;
use crate::rules::{Rule, match_rule};
use std::collections::HashSet;

/// A file the engine would move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedMove {
    pub file_name: String,
    /// Index of the rule that claimed the file.
    pub rule_index: usize,
    pub destination: String,
    /// Whether a folder with the destination's name is already listed.
    pub destination_exists: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Preview {
    pub planned: Vec<PlannedMove>,
    pub unmatched_files: Vec<String>,
    /// Directories that would receive nothing.
    pub untouched_dirs: Vec<String>,
}

impl Preview {
    /// Planned moves grouped by destination, in order of first appearance.
    pub fn by_destination(&self) -> Vec<(&str, Vec<&PlannedMove>)> {
        let mut groups: Vec<(&str, Vec<&PlannedMove>)> = Vec::new();
        for planned in &self.planned {
            match groups
                .iter_mut()
                .find(|(dest, _)| *dest == planned.destination)
            {
                Some((_, moves)) => moves.push(planned),
                None => groups.push((planned.destination.as_str(), vec![planned])),
            }
        }
        groups
    }

    pub fn is_empty(&self) -> bool {
        self.planned.is_empty()
    }
}

/// Computes the preview for `entries` under `rules`.
pub fn preview(entries: &[DirectoryEntry], rules: &[Rule]) -> Preview {
    let visible = entries.iter().filter(|e| !is_hidden(&e.name));
    let existing_dirs: HashSet<&str> = visible
        .clone()
        .filter(|e| !e.is_file)
        .map(|e| e.name.as_str())
        .collect();

    let mut result = Preview::default();
    for entry in visible.clone().filter(|e| e.is_file) {
        match match_rule(&entry.name, rules) {
            Some(found) => result.planned.push(PlannedMove {
                file_name: entry.name.clone(),
                rule_index: found.index,
                destination: found.destination.to_string(),
                destination_exists: existing_dirs.contains(found.destination),
            }),
            None => result.unmatched_files.push(entry.name.clone()),
        }
    }

    let destinations: HashSet<&str> = result
        .planned
        .iter()
        .map(|p| p.destination.as_str())
        .collect();
    result.untouched_dirs = visible
        .filter(|e| !e.is_file && !destinations.contains(e.name.as_str()))
        .map(|e| e.name.clone())
        .collect();

    result
}
