//! In-place renames of files exported from the pedal
//!
//! A patch pulled off the device is called `NNN_zoia_Name.bin`. Renaming it
//! to `Name.bin` turns it back into a library file that can be placed in any
//! slot.

use std::path::PathBuf;

use log::debug;

use crate::error::{RenameError, Result};
use crate::expand::FileRef;
use crate::patch_name::PatchName;

/// One planned rename
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenameOp {
    /// Current path
    pub from: PathBuf,
    /// New path, in the same directory
    pub to: PathBuf,
}

/// Renames to perform plus the inputs that were passed over
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenamePlan {
    /// Renames, in input order
    pub ops: Vec<RenameOp>,
    /// Inputs that are not device-slotted patch files
    pub skipped: Vec<PathBuf>,
}

impl RenamePlan {
    /// Plan renames for `refs`
    ///
    /// Unless `force` is set, an existing target is an error. Problems are
    /// collected into one [`RenameError`].
    pub fn new(refs: &[FileRef], force: bool) -> Result<Self> {
        let mut plan = Self::default();
        let mut errors = RenameError::default();

        for file in refs {
            let base_id = match file.patch_name() {
                Ok(PatchName::Slotted { base_id, .. }) => base_id,
                Ok(PatchName::Library { .. }) | Err(_) => {
                    plan.skipped.push(file.path.clone());
                    continue;
                }
            };
            if !file.path.exists() {
                errors.missing.push(file.path.clone());
                continue;
            }
            let to = file.path.with_file_name(&base_id);
            if !force && to.exists() {
                errors.already_exists.push(to);
            } else {
                plan.ops.push(RenameOp {
                    from: file.path.clone(),
                    to,
                });
            }
        }

        errors.nothing_to_do = plan.ops.is_empty() && errors.is_empty();
        if !errors.is_empty() {
            return Err(errors.into());
        }
        debug!(
            "Planned {} renames, skipped {}",
            plan.ops.len(),
            plan.skipped.len()
        );
        Ok(plan)
    }
}
