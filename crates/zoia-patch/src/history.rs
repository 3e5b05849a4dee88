//! Slot history: which patches have lived in which slot
//!
//! The history is stored in a small document (the "slots file") whose only
//! meaningful key is `slots`, a table from zero-padded slot index to the base
//! identifiers previously placed there, most preferred first:
//!
//! ```toml
//! [slots]
//! "000" = ["Looper.bin"]
//! "001" = ["Delay.bin", "Tape Delay.bin"]
//! ```
//!
//! TOML, YAML and JSON are supported; the format follows the file extension.
//! Other top-level keys are carried through a load/save cycle untouched.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{PatchError, Result};

/// Per-slot preference lists keyed by zero-padded slot index
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SlotHistory {
    slots: BTreeMap<String, Vec<String>>,
}

impl SlotHistory {
    /// An empty history
    pub fn new() -> Self {
        Self::default()
    }

    /// The key a slot is stored under
    pub fn slot_key(index: usize) -> String {
        format!("{index:03}")
    }

    /// Base identifiers previously placed in `index`, most preferred first
    pub fn preferences(&self, index: usize) -> &[String] {
        self.slots
            .get(&Self::slot_key(index))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Remember that `base_id` was placed in `index`
    ///
    /// Returns `true` if the entry is new.
    pub fn record(&mut self, index: usize, base_id: &str) -> bool {
        let slot = self.slots.entry(Self::slot_key(index)).or_default();
        if slot.iter().any(|b| b == base_id) {
            false
        } else {
            slot.push(base_id.to_string());
            true
        }
    }

    /// Number of slots with any history
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// True if no slot has history
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Iterate `(key, preferences)` in slot order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.slots.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }
}

impl FromIterator<(usize, Vec<String>)> for SlotHistory {
    fn from_iter<T: IntoIterator<Item = (usize, Vec<String>)>>(iter: T) -> Self {
        Self {
            slots: iter
                .into_iter()
                .map(|(index, bases)| (Self::slot_key(index), bases))
                .collect(),
        }
    }
}

/// Serialization format of a slots file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryFormat {
    /// `.toml`
    Toml,
    /// `.yaml` or `.yml`
    Yaml,
    /// `.json`
    Json,
}

impl HistoryFormat {
    /// Pick the format from the file extension
    pub fn from_path(path: &Path) -> Result<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => Ok(Self::Toml),
            Some("yaml" | "yml") => Ok(Self::Yaml),
            Some("json") => Ok(Self::Json),
            other => Err(PatchError::UnsupportedFormat {
                suffix: other.map(|e| format!(".{e}")).unwrap_or_default(),
                path: path.to_path_buf(),
            }),
        }
    }
}

/// A slots file: the history plus whatever else the user keeps in it
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HistoryDocument {
    /// Slot history
    #[serde(default, skip_serializing_if = "SlotHistory::is_empty")]
    pub slots: SlotHistory,

    /// Unrelated top-level keys, preserved as-is
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl HistoryDocument {
    /// Parse a document from text
    pub fn parse(content: &str, format: HistoryFormat) -> Result<Self> {
        let doc = match format {
            HistoryFormat::Toml => toml::from_str(content)?,
            HistoryFormat::Yaml => {
                if content.trim().is_empty() {
                    Self::default()
                } else {
                    serde_yaml_ng::from_str(content)?
                }
            }
            HistoryFormat::Json => serde_json::from_str(content)?,
        };
        Ok(doc)
    }

    /// Render the document as text
    pub fn render(&self, format: HistoryFormat) -> Result<String> {
        let text = match format {
            HistoryFormat::Toml => toml::to_string_pretty(self)?,
            HistoryFormat::Yaml => serde_yaml_ng::to_string(self)?,
            HistoryFormat::Json => {
                let mut text = serde_json::to_string_pretty(self)?;
                text.push('\n');
                text
            }
        };
        Ok(text)
    }

    /// Load a slots file; a missing file is an empty document
    ///
    /// Read and parse failures come back as [`PatchError::SlotsFile`].
    pub fn load(path: &Path) -> Result<Self> {
        let format = HistoryFormat::from_path(path)?;
        if !path.exists() {
            debug!("{} does not exist, starting with empty history", path.display());
            return Ok(Self::default());
        }
        let doc = fs::read_to_string(path)
            .map_err(PatchError::from)
            .and_then(|content| Self::parse(&content, format))
            .map_err(|source| PatchError::SlotsFile {
                path: path.to_path_buf(),
                source: Box::new(source),
            })?;
        debug!(
            "Loaded history for {} slots from {}",
            doc.slots.len(),
            path.display()
        );
        Ok(doc)
    }

    /// Write the slots file in the format its extension names
    pub fn save(&self, path: &Path) -> Result<()> {
        let format = HistoryFormat::from_path(path)?;
        fs::write(path, self.render(format)?)?;
        Ok(())
    }

    /// True if saving would write nothing
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty() && self.extra.is_empty()
    }
}
