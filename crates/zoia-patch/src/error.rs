//! Error types for patch slot assignment

use std::fmt;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

use crate::allocate::MAX_SLOT_INDEX;

/// Result type alias for patch operations
pub type Result<T> = std::result::Result<T, PatchError>;

/// Main error type for patch operations
#[derive(Error, Debug)]
pub enum PatchError {
    /// File name matches neither the device-slotted nor the library shape
    #[error("Not a patch file: {0}")]
    NotAPatchFile(String),

    /// A glob pattern or list file was given a `:N` slot suffix
    #[error("{kind} cannot have slot indexes: {spec}")]
    AmbiguousSlotSuffix {
        /// "Globs" or "Text files"
        kind: &'static str,
        /// The offending input specification
        spec: String,
    },

    /// A list file could not be read
    #[error("Failed to read list file {}: {source}", .path.display())]
    ReadList {
        /// The list file
        path: PathBuf,
        /// Underlying I/O error
        source: io::Error,
    },

    /// List files nested deeper than the expander allows
    #[error("List files nested more than {limit} deep at: {spec}")]
    NestingTooDeep {
        /// Maximum nesting depth
        limit: usize,
        /// The specification that would exceed it
        spec: String,
    },

    /// Invalid glob pattern
    #[error("Invalid glob pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    /// A glob match could not be read
    #[error("Glob error: {0}")]
    Glob(#[from] glob::GlobError),

    /// Slots file has an extension we cannot read or write
    #[error("Do not understand suffix {suffix:?} in file {}", .path.display())]
    UnsupportedFormat {
        /// The file extension, including the dot
        suffix: String,
        /// The slots file
        path: PathBuf,
    },

    /// I/O error while reading or writing the slots file
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Slots file is not valid TOML
    #[error("Failed to parse TOML: {0}")]
    Toml(#[from] toml::de::Error),

    /// Slots file could not be written as TOML
    #[error("Failed to write TOML: {0}")]
    TomlSer(#[from] toml::ser::Error),

    /// Slots file is not valid YAML
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    /// Slots file is not valid JSON
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A slots file could not be read or parsed
    #[error("Failed to load slots file {}: {source}", .path.display())]
    SlotsFile {
        /// The slots file
        path: PathBuf,
        /// The I/O or parse error
        #[source]
        source: Box<Self>,
    },

    /// The slot table could not be computed
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The rename plan could not be computed
    #[error(transparent)]
    Rename(#[from] RenameError),
}

/// Every problem found while allocating slots, grouped by category
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Inputs whose names are not patch files
    pub malformed: Vec<PathBuf>,
    /// Inputs whose `:N` suffix is not a slot number
    pub bad_slot: Vec<String>,
    /// Slot indexes requested by more than one input, with every claimant
    pub collisions: Vec<(usize, Vec<PathBuf>)>,
    /// Base identifiers given more than twice without a slot
    pub duplicates: Vec<String>,
    /// Requested slot count, when it is more than the device naming allows
    pub slot_count: Option<usize>,
}

impl ValidationError {
    /// True when no category has any members
    pub fn is_empty(&self) -> bool {
        self.malformed.is_empty()
            && self.bad_slot.is_empty()
            && self.collisions.is_empty()
            && self.duplicates.is_empty()
            && self.slot_count.is_none()
    }

    /// Number of individual problems across all categories
    pub fn len(&self) -> usize {
        self.malformed.len()
            + self.bad_slot.len()
            + self.collisions.len()
            + self.duplicates.len()
            + usize::from(self.slot_count.is_some())
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut lines = Vec::new();
        if !self.malformed.is_empty() {
            lines.push(format!("Not zoia: {}", join_paths(&self.malformed)));
        }
        if !self.bad_slot.is_empty() {
            lines.push(format!("Bad slot identifier: {}", self.bad_slot.join(", ")));
        }
        if !self.collisions.is_empty() {
            let slots: Vec<String> = self
                .collisions
                .iter()
                .map(|(slot, paths)| format!("{slot} ({})", join_paths(paths)))
                .collect();
            lines.push(format!(
                "Slot numbers must be distinct: {}",
                slots.join(", ")
            ));
        }
        if !self.duplicates.is_empty() {
            lines.push(format!("Duplicates: {}", self.duplicates.join(", ")));
        }
        if let Some(count) = self.slot_count {
            lines.push(format!(
                "Slot count must be at most {}: {count}",
                MAX_SLOT_INDEX + 1
            ));
        }
        for (i, line) in lines.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "ERROR: {line}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

/// Every problem found while planning renames
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RenameError {
    /// Inputs that do not exist
    pub missing: Vec<PathBuf>,
    /// Rename targets that exist and would be overwritten
    pub already_exists: Vec<PathBuf>,
    /// Nothing was left to rename
    pub nothing_to_do: bool,
}

impl RenameError {
    /// True when nothing went wrong
    pub fn is_empty(&self) -> bool {
        self.missing.is_empty() && self.already_exists.is_empty() && !self.nothing_to_do
    }
}

impl fmt::Display for RenameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut lines = Vec::new();
        if !self.missing.is_empty() {
            lines.push(format!("Missing: {}", join_paths(&self.missing)));
        }
        if !self.already_exists.is_empty() {
            lines.push(format!(
                "Cannot overwrite: {}. Use -f to replace",
                join_paths(&self.already_exists)
            ));
        }
        if self.nothing_to_do {
            lines.push("No files to rename".to_string());
        }
        for (i, line) in lines.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "ERROR: {line}")?;
        }
        Ok(())
    }
}

impl std::error::Error for RenameError {}

fn join_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = PatchError::NotAPatchFile("notes.md".to_string());
        assert_eq!(format!("{}", error), "Not a patch file: notes.md");

        let error = PatchError::AmbiguousSlotSuffix {
            kind: "Globs",
            spec: "*.bin:3".to_string(),
        };
        assert_eq!(format!("{}", error), "Globs cannot have slot indexes: *.bin:3");
    }

    #[test]
    fn test_validation_error_lists_every_category() {
        let error = ValidationError {
            malformed: vec![PathBuf::from("readme.md")],
            bad_slot: vec!["Delay.bin:x".to_string()],
            collisions: vec![(
                3,
                vec![PathBuf::from("a.bin"), PathBuf::from("b.bin")],
            )],
            duplicates: vec!["Loop.bin".to_string()],
            slot_count: Some(5000),
        };

        assert_eq!(error.len(), 5);
        assert_eq!(
            error.to_string(),
            "ERROR: Not zoia: readme.md\n\
             ERROR: Bad slot identifier: Delay.bin:x\n\
             ERROR: Slot numbers must be distinct: 3 (a.bin, b.bin)\n\
             ERROR: Duplicates: Loop.bin\n\
             ERROR: Slot count must be at most 1000: 5000"
        );
    }

    #[test]
    fn test_validation_error_skips_empty_categories() {
        let error = ValidationError {
            duplicates: vec!["Loop.bin".to_string()],
            ..ValidationError::default()
        };
        assert!(!error.is_empty());
        assert_eq!(error.to_string(), "ERROR: Duplicates: Loop.bin");
        assert!(ValidationError::default().is_empty());
    }

    #[test]
    fn test_rename_error_display() {
        let error = RenameError {
            already_exists: vec![PathBuf::from("Delay.bin")],
            ..RenameError::default()
        };
        assert_eq!(
            error.to_string(),
            "ERROR: Cannot overwrite: Delay.bin. Use -f to replace"
        );
    }
}
