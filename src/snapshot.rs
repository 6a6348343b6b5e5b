//! Before/after listings of a reorganized folder.
//!
//! A snapshot maps the root folder path to its top-level entries. Before a
//! run every entry is a plain name. After a run, destination folders the
//! engine moved files into are reported together with the names it placed
//! there; everything else stays a plain name.
//!
//! On the wire a touched folder is a single-key object, so an after
//! snapshot looks like:
//!
//! ```json
//! { "/home/me/Downloads": ["random.txt", { "Documents": ["file1.pdf"] }] }
//! ```

use serde::de::{self, Deserializer};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Before-run listing: root path to plain entry names.
pub type BeforeSnapshot = BTreeMap<String, Vec<String>>;

/// After-run listing: root path to plain or touched-folder entries.
pub type AfterSnapshot = BTreeMap<String, Vec<SnapshotEntry>>;

/// One top-level entry of an after-run listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SnapshotEntry {
    /// An untouched file or directory.
    Plain(String),
    /// A directory that received at least one file during the run.
    TouchedFolder { name: String, files: Vec<String> },
}

impl SnapshotEntry {
    pub fn name(&self) -> &str {
        match self {
            Self::Plain(name) => name,
            Self::TouchedFolder { name, .. } => name,
        }
    }

    pub fn is_touched(&self) -> bool {
        matches!(self, Self::TouchedFolder { .. })
    }
}

impl Serialize for SnapshotEntry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Plain(name) => serializer.serialize_str(name),
            Self::TouchedFolder { name, files } => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry(name, files)?;
                map.end()
            }
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LooseEntry {
    Plain(String),
    Touched(BTreeMap<String, Vec<String>>),
}

impl<'de> Deserialize<'de> for SnapshotEntry {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match LooseEntry::deserialize(deserializer)? {
            LooseEntry::Plain(name) => Ok(Self::Plain(name)),
            LooseEntry::Touched(map) => {
                if map.len() != 1 {
                    return Err(de::Error::invalid_length(
                        map.len(),
                        &"a single-key touched folder object",
                    ));
                }
                let (name, files) = map.into_iter().next().ok_or_else(|| {
                    de::Error::custom("touched folder object has no entries")
                })?;
                Ok(Self::TouchedFolder { name, files })
            }
        }
    }
}

/// Files placed into each destination folder during one run, in move order.
#[derive(Debug, Clone, Default)]
pub struct TouchedFolders {
    placed: HashMap<String, Vec<String>>,
    /// Destinations in the order they first received a file.
    order: Vec<String>,
}

impl TouchedFolders {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records that `file_name` now lives in `folder`.
    pub fn record(&mut self, folder: &str, file_name: String) {
        if !self.placed.contains_key(folder) {
            self.order.push(folder.to_string());
        }
        self.placed
            .entry(folder.to_string())
            .or_default()
            .push(file_name);
    }

    pub fn files_in(&self, folder: &str) -> Option<&[String]> {
        self.placed.get(folder).map(Vec::as_slice)
    }

    pub fn is_empty(&self) -> bool {
        self.placed.is_empty()
    }

    /// Builds the after-run entries for a fresh listing of the root.
    ///
    /// Each listed item is `(name, can_hold_files)`; regular files pass
    /// `false` and always stay plain. A destination is attached to the
    /// listed entry with exactly its name, or failing that to one whose name
    /// differs only in case, as on case-insensitive filesystems. Destinations
    /// that land on the same entry are merged in the order they were first
    /// used.
    pub fn annotate<'a, I>(&self, listing: I) -> Vec<SnapshotEntry>
    where
        I: IntoIterator<Item = (&'a str, bool)>,
    {
        let listing: Vec<(&str, bool)> = listing.into_iter().collect();

        let mut owners: HashMap<&str, Vec<&str>> = HashMap::new();
        for folder in &self.order {
            let exact = listing
                .iter()
                .find(|(name, container)| *container && *name == folder.as_str());
            let folded = || {
                let wanted = folder.to_lowercase();
                listing
                    .iter()
                    .find(|(name, container)| *container && name.to_lowercase() == wanted)
            };
            if let Some((name, _)) = exact.or_else(folded) {
                owners.entry(*name).or_default().push(folder.as_str());
            }
        }

        listing
            .iter()
            .map(|(name, _)| match owners.get(name) {
                Some(folders) => SnapshotEntry::TouchedFolder {
                    name: name.to_string(),
                    files: folders
                        .iter()
                        .filter_map(|folder| self.files_in(folder))
                        .flatten()
                        .cloned()
                        .collect(),
                },
                None => SnapshotEntry::Plain(name.to_string()),
            })
            .collect()
    }
}
