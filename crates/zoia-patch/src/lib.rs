//! Slot assignment engine for ZOIA patch files.
//!
//! The ZOIA pedal stores up to 64 patches in numbered slots, one file per
//! slot named `NNN_zoia_<name>.bin`. This crate decides which patch goes in
//! which slot:
//!
//! - [`patch_name`] recognises patch file names and extracts their base
//!   identifier,
//! - [`expand`] turns globs, `.txt` list files and `path:N` inputs into
//!   concrete [`FileRef`]s,
//! - [`allocate`] computes the [`SlotTable`] from those files, the slot
//!   [`history`] and the requested slot count,
//! - [`plan`] turns the table into file copies and updates the history,
//! - [`rename`] plans renames of exported files back to library names.
//!
//! # Examples
//!
//! ```
//! use zoia_patch::{FileRef, SlotHistory, allocate};
//!
//! let refs = vec![
//!     FileRef::parse("Looper.bin"),
//!     FileRef::parse("Delay.bin:0"),
//! ];
//! let table = allocate(&SlotHistory::new(), &refs, 4).unwrap();
//!
//! assert_eq!(table.base_ids(), vec![Some("Delay.bin"), Some("Looper.bin"), None, None]);
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod allocate;
pub mod error;
pub mod expand;
pub mod history;
pub mod patch_name;
pub mod plan;
pub mod rename;

pub use allocate::{MAX_SLOT_INDEX, Placement, Slot, SlotTable, allocate};
pub use error::{PatchError, RenameError, Result, ValidationError};
pub use expand::{Expand, FileRef, SlotSuffix, expand, expand_all};
pub use history::{HistoryDocument, HistoryFormat, SlotHistory};
pub use patch_name::{NameCache, PatchName, classify, slot_file_name};
pub use plan::{CopyOp, CopyPlan};
pub use rename::{RenameOp, RenamePlan};
