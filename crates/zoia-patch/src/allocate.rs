//! Slot allocation
//!
//! Turns expanded [`FileRef`]s into a [`SlotTable`]:
//!
//! 1. files with an explicit `:N` take slot `N`,
//! 2. each remaining empty slot, in ascending order, takes the first file
//!    its history prefers,
//! 3. the rest fill the remaining empty slots in input order,
//! 4. trailing empty slots beyond the requested count are dropped.
//!
//! Every validation problem is collected before anything is placed, so a
//! single [`ValidationError`] reports them all.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use log::{debug, trace};

use crate::error::ValidationError;
use crate::expand::{FileRef, SlotSuffix};
use crate::history::SlotHistory;
use crate::patch_name::NameCache;

/// A base identifier may be given this many times without a slot
pub const MAX_UNPLACED_COPIES: usize = 2;

/// Largest slot index; slot file names carry a three-digit prefix
pub const MAX_SLOT_INDEX: usize = 999;

/// A file assigned to a slot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    /// File to copy into the slot
    pub source: PathBuf,
    /// Base identifier of the file
    pub base_id: String,
}

/// One cell of the slot table
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Slot {
    /// A real patch file
    Assigned(Placement),
    /// Nothing assigned; the placeholder patch goes here
    Empty,
}

impl Slot {
    /// The placement, if any
    pub fn placement(&self) -> Option<&Placement> {
        match self {
            Self::Assigned(placement) => Some(placement),
            Self::Empty => None,
        }
    }

    /// True for the placeholder
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }
}

/// The final ordered assignment of files to slots
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SlotTable {
    slots: Vec<Slot>,
}

impl SlotTable {
    /// Number of slots
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// True if the table has no slots at all
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// The cell at `index`
    pub fn get(&self, index: usize) -> Option<&Slot> {
        self.slots.get(index)
    }

    /// Iterate the cells in slot order
    pub fn iter(&self) -> std::slice::Iter<'_, Slot> {
        self.slots.iter()
    }

    /// The cells as a slice
    pub fn as_slice(&self) -> &[Slot] {
        &self.slots
    }

    /// Number of cells holding a real file
    pub fn assigned_count(&self) -> usize {
        self.slots.iter().filter(|s| !s.is_empty()).count()
    }

    /// Base identifiers in slot order; `None` for placeholders
    pub fn base_ids(&self) -> Vec<Option<&str>> {
        self.slots
            .iter()
            .map(|s| s.placement().map(|p| p.base_id.as_str()))
            .collect()
    }

    /// Pad with placeholders up to `count`, then drop trailing placeholders
    /// while longer than `count`. Assigned cells are never dropped.
    fn fit_to(&mut self, count: usize) {
        if self.slots.len() < count {
            self.slots.resize(count, Slot::Empty);
        }
        while self.slots.len() > count && self.slots.last().is_some_and(Slot::is_empty) {
            self.slots.pop();
        }
    }
}

impl<'a> IntoIterator for &'a SlotTable {
    type Item = &'a Slot;
    type IntoIter = std::slice::Iter<'a, Slot>;

    fn into_iter(self) -> Self::IntoIter {
        self.slots.iter()
    }
}

impl From<Vec<Slot>> for SlotTable {
    fn from(slots: Vec<Slot>) -> Self {
        Self { slots }
    }
}

/// Files without a slot, keyed by base identifier, in first-seen order
///
/// A base identifier given twice keeps the position of its first occurrence
/// and the source of its last.
#[derive(Debug, Default)]
struct UnplacedPool {
    order: Vec<String>,
    sources: HashMap<String, PathBuf>,
}

impl UnplacedPool {
    fn insert(&mut self, base_id: &str, source: &Path) {
        if self
            .sources
            .insert(base_id.to_string(), source.to_path_buf())
            .is_none()
        {
            self.order.push(base_id.to_string());
        }
    }

    fn take(&mut self, base_id: &str) -> Option<Placement> {
        let source = self.sources.remove(base_id)?;
        Some(Placement {
            source,
            base_id: base_id.to_string(),
        })
    }

    fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Drain what is left in input order
    fn drain(mut self) -> impl Iterator<Item = Placement> {
        let order = std::mem::take(&mut self.order);
        order.into_iter().filter_map(move |base_id| self.take(&base_id))
    }
}

/// Compute the slot table
///
/// `requested_count` of zero means "as many slots as the inputs need". Slot
/// suffixes above [`MAX_SLOT_INDEX`] are bad slot identifiers, and a
/// `requested_count` above `MAX_SLOT_INDEX + 1` is rejected.
pub fn allocate(
    history: &SlotHistory,
    refs: &[FileRef],
    requested_count: usize,
) -> Result<SlotTable, ValidationError> {
    let mut cache = NameCache::new();
    let mut errors = ValidationError::default();
    let mut explicit: BTreeMap<usize, Vec<Placement>> = BTreeMap::new();
    let mut unplaced: Vec<(String, &Path)> = Vec::new();

    for file in refs {
        let base_id = match file.base_id_cached(&mut cache) {
            Ok(base_id) => base_id.to_string(),
            Err(_) => {
                errors.malformed.push(file.path.clone());
                continue;
            }
        };
        match &file.slot {
            None => unplaced.push((base_id, file.path.as_path())),
            Some(SlotSuffix::Invalid(_)) => errors.bad_slot.push(file.to_string()),
            Some(SlotSuffix::Index(index)) if *index > MAX_SLOT_INDEX => {
                errors.bad_slot.push(file.to_string());
            }
            Some(SlotSuffix::Index(index)) => explicit.entry(*index).or_default().push(Placement {
                source: file.path.clone(),
                base_id,
            }),
        }
    }

    for (index, claims) in &explicit {
        if claims.len() > 1 {
            errors
                .collisions
                .push((*index, claims.iter().map(|p| p.source.clone()).collect()));
        }
    }

    let mut counts: HashMap<&str, usize> = HashMap::new();
    for (base_id, _) in &unplaced {
        let count = counts.entry(base_id.as_str()).or_default();
        *count += 1;
        if *count == MAX_UNPLACED_COPIES + 1 {
            errors.duplicates.push(base_id.clone());
        }
    }

    if requested_count > MAX_SLOT_INDEX + 1 {
        errors.slot_count = Some(requested_count);
    }

    if !errors.is_empty() {
        debug!("Slot allocation rejected with {} problems", errors.len());
        return Err(errors);
    }

    let length = [
        refs.len(),
        requested_count,
        explicit
            .keys()
            .next_back()
            .and_then(|max| max.checked_add(1))
            .unwrap_or_default(),
    ]
    .into_iter()
    .max()
    .unwrap_or_default();

    let mut slots = vec![Slot::Empty; length];
    for (index, mut claims) in explicit {
        if let Some(placement) = claims.pop() {
            trace!("slot {index:03}: {} (explicit)", placement.base_id);
            slots[index] = Slot::Assigned(placement);
        }
    }

    let mut pool = UnplacedPool::default();
    for (base_id, source) in &unplaced {
        pool.insert(base_id, source);
    }

    for (index, slot) in slots.iter_mut().enumerate() {
        if pool.is_empty() {
            break;
        }
        if !slot.is_empty() {
            continue;
        }
        if let Some(placement) = history
            .preferences(index)
            .iter()
            .find_map(|base_id| pool.take(base_id))
        {
            trace!("slot {index:03}: {} (history)", placement.base_id);
            *slot = Slot::Assigned(placement);
        }
    }

    let mut remaining = pool.drain();
    for (index, slot) in slots.iter_mut().enumerate() {
        if !slot.is_empty() {
            continue;
        }
        let Some(placement) = remaining.next() else {
            break;
        };
        trace!("slot {index:03}: {} (input order)", placement.base_id);
        *slot = Slot::Assigned(placement);
    }
    debug_assert!(remaining.next().is_none(), "more unplaced files than slots");

    let mut table = SlotTable::from(slots);
    table.fit_to(requested_count);
    debug!(
        "Allocated {} files into {} slots",
        table.assigned_count(),
        table.len()
    );
    Ok(table)
}
