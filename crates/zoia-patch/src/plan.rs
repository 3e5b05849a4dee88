//! Copy plans: from a slot table to files on disk

use std::path::{Path, PathBuf};

use crate::allocate::{Slot, SlotTable};
use crate::history::SlotHistory;
use crate::patch_name::{PATCH_EXTENSION, slot_file_name};

/// One file copy into the output directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyOp {
    /// Slot index
    pub slot: usize,
    /// File to copy
    pub source: PathBuf,
    /// Destination, named `NNN_zoia_<base>.bin`
    pub target: PathBuf,
    /// Base identifier, `None` for the placeholder
    pub base_id: Option<String>,
}

impl CopyOp {
    /// True if this copies the placeholder patch
    pub fn is_placeholder(&self) -> bool {
        self.base_id.is_none()
    }
}

/// Every copy needed to materialize a slot table, in slot order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CopyPlan {
    ops: Vec<CopyOp>,
}

impl CopyPlan {
    /// Plan copies of `table` into `output`, using `placeholder` for empty
    /// slots
    pub fn new(table: &SlotTable, output: &Path, placeholder: &Path) -> Self {
        let ops = table
            .iter()
            .enumerate()
            .map(|(slot, cell)| match cell {
                Slot::Assigned(placement) => CopyOp {
                    slot,
                    source: placement.source.clone(),
                    target: output.join(slot_file_name(slot, &placement.base_id)),
                    base_id: Some(placement.base_id.clone()),
                },
                Slot::Empty => CopyOp {
                    slot,
                    source: placeholder.to_path_buf(),
                    target: output.join(slot_file_name(slot, PATCH_EXTENSION)),
                    base_id: None,
                },
            })
            .collect();
        Self { ops }
    }

    /// Append each placed base identifier to its slot's history
    ///
    /// Returns the number of new history entries.
    pub fn record_history(&self, history: &mut SlotHistory) -> usize {
        let mut added = 0;
        for op in &self.ops {
            if let Some(base_id) = &op.base_id
                && history.record(op.slot, base_id)
            {
                added += 1;
            }
        }
        added
    }

    /// True if any slot needs the placeholder
    pub fn needs_placeholder(&self) -> bool {
        self.ops.iter().any(CopyOp::is_placeholder)
    }

    /// The planned copies
    pub fn ops(&self) -> &[CopyOp] {
        &self.ops
    }

    /// Number of copies
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    /// True if there is nothing to copy
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }
}

impl<'a> IntoIterator for &'a CopyPlan {
    type Item = &'a CopyOp;
    type IntoIter = std::slice::Iter<'a, CopyOp>;

    fn into_iter(self) -> Self::IntoIter {
        self.ops.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::allocate::Placement;
    use pretty_assertions::assert_eq;

    fn table() -> SlotTable {
        SlotTable::from(vec![
            Slot::Assigned(Placement {
                source: PathBuf::from("lib/Delay.bin"),
                base_id: "Delay.bin".to_string(),
            }),
            Slot::Empty,
            Slot::Assigned(Placement {
                source: PathBuf::from("old/004_zoia_Looper.bin"),
                base_id: "Looper.bin".to_string(),
            }),
        ])
    }

    #[test]
    fn test_target_names() {
        let plan = CopyPlan::new(&table(), Path::new("out"), Path::new("zoia_empty.bin"));
        let targets: Vec<&Path> = plan.ops().iter().map(|op| op.target.as_path()).collect();
        assert_eq!(
            targets,
            vec![
                Path::new("out/000_zoia_Delay.bin"),
                Path::new("out/001_zoia_.bin"),
                Path::new("out/002_zoia_Looper.bin"),
            ]
        );
        assert_eq!(plan.ops()[1].source, PathBuf::from("zoia_empty.bin"));
        assert!(plan.needs_placeholder());
        assert_eq!(plan.len(), 3);
    }

    #[test]
    fn test_record_history_skips_placeholders() {
        let plan = CopyPlan::new(&table(), Path::new("out"), Path::new("zoia_empty.bin"));
        let mut history = SlotHistory::new();
        history.record(2, "Tape.bin");

        assert_eq!(plan.record_history(&mut history), 2);
        assert_eq!(history.preferences(0), ["Delay.bin"]);
        assert!(history.preferences(1).is_empty());
        assert_eq!(history.preferences(2), ["Tape.bin", "Looper.bin"]);

        // A second run records nothing new
        assert_eq!(plan.record_history(&mut history), 0);
    }

    #[test]
    fn test_full_table_needs_no_placeholder() {
        let table = SlotTable::from(vec![Slot::Assigned(Placement {
            source: PathBuf::from("A.bin"),
            base_id: "A.bin".to_string(),
        })]);
        let plan = CopyPlan::new(&table, Path::new("out"), Path::new("missing.bin"));
        assert!(!plan.needs_placeholder());
    }
}
