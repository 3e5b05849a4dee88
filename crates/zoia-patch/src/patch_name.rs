//! Patch file name classification
//!
//! A ZOIA patch is recognised by its file name alone. Files exported from the
//! pedal look like `012_zoia_Delay.bin`; files kept in a patch library are
//! just `Delay.bin`. Both share the base identifier `Delay.bin`, which is the
//! identity used for deduplication and slot history.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::{PatchError, Result};

/// Marker between the slot number and the base identifier
pub const SLOT_MARKER: &str = "_zoia_";

/// Extension shared by every patch file
pub const PATCH_EXTENSION: &str = ".bin";

/// Width of the zero-padded slot prefix
pub const SLOT_PREFIX_WIDTH: usize = 3;

/// A classified patch file name
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PatchName {
    /// `NNN_zoia_<base>.bin`, as written by the pedal
    Slotted {
        /// Slot number from the prefix
        slot: u16,
        /// Base identifier with prefix and marker removed
        base_id: String,
    },
    /// `<base>.bin`, a file from a patch library
    Library {
        /// The whole file name
        base_id: String,
    },
}

impl PatchName {
    /// Classify a bare file name
    ///
    /// # Examples
    ///
    /// ```
    /// use zoia_patch::PatchName;
    ///
    /// let name = PatchName::parse("012_zoia_Delay.bin").unwrap();
    /// assert_eq!(name.base_id(), "Delay.bin");
    /// assert_eq!(name.slot(), Some(12));
    ///
    /// assert!(PatchName::parse("notes.txt").is_err());
    /// ```
    pub fn parse(name: &str) -> Result<Self> {
        if !name.ends_with(PATCH_EXTENSION) {
            return Err(PatchError::NotAPatchFile(name.to_string()));
        }

        if let Some((slot, base_id)) = split_slotted(name) {
            return Ok(Self::Slotted {
                slot,
                base_id: base_id.to_string(),
            });
        }

        Ok(Self::Library {
            base_id: name.to_string(),
        })
    }

    /// Classify the final component of a path
    pub fn from_path(path: &Path) -> Result<Self> {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| PatchError::NotAPatchFile(path.display().to_string()))?;
        Self::parse(name)
    }

    /// The base identifier
    pub fn base_id(&self) -> &str {
        match self {
            Self::Slotted { base_id, .. } | Self::Library { base_id } => base_id,
        }
    }

    /// Slot number carried by a device-slotted name
    pub fn slot(&self) -> Option<u16> {
        match self {
            Self::Slotted { slot, .. } => Some(*slot),
            Self::Library { .. } => None,
        }
    }

    /// Consume the name, keeping only the base identifier
    pub fn into_base_id(self) -> String {
        match self {
            Self::Slotted { base_id, .. } | Self::Library { base_id } => base_id,
        }
    }
}

impl fmt::Display for PatchName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Slotted { slot, base_id } => write!(f, "{}", slot_file_name(*slot as usize, base_id)),
            Self::Library { base_id } => write!(f, "{base_id}"),
        }
    }
}

fn split_slotted(name: &str) -> Option<(u16, &str)> {
    let prefix = name.get(..SLOT_PREFIX_WIDTH)?;
    if !prefix.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let base_id = name[SLOT_PREFIX_WIDTH..].strip_prefix(SLOT_MARKER)?;
    if !base_id.ends_with(PATCH_EXTENSION) {
        return None;
    }
    let slot = prefix.parse().ok()?;
    Some((slot, base_id))
}

/// Return the base identifier of a file name
pub fn classify(name: &str) -> Result<String> {
    PatchName::parse(name).map(PatchName::into_base_id)
}

/// Build the on-device file name for a base identifier in a slot
///
/// ```
/// assert_eq!(zoia_patch::slot_file_name(7, "Delay.bin"), "007_zoia_Delay.bin");
/// ```
pub fn slot_file_name(slot: usize, base_id: &str) -> String {
    format!("{slot:03}{SLOT_MARKER}{base_id}")
}

/// Memoized classification keyed by source path
///
/// Owned by whoever classifies; there is no process-wide cache.
#[derive(Debug, Default)]
pub struct NameCache {
    names: HashMap<PathBuf, Option<PatchName>>,
}

impl NameCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Classify `path`, reusing an earlier answer for the same path
    pub fn classify(&mut self, path: &Path) -> Result<&PatchName> {
        let entry = self
            .names
            .entry(path.to_path_buf())
            .or_insert_with(|| PatchName::from_path(path).ok());
        entry
            .as_ref()
            .ok_or_else(|| PatchError::NotAPatchFile(path.display().to_string()))
    }

    /// Number of distinct paths seen
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// True if nothing has been classified yet
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
