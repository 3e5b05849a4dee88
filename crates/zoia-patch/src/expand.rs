//! Input specification expansion
//!
//! Command-line inputs are not just file names. Each input may be
//!
//! - a literal path, optionally suffixed with `:N` to pin it to slot `N`,
//! - a glob pattern such as `library/*.bin`,
//! - a `.txt` list file whose lines are themselves inputs.
//!
//! [`expand`] flattens all of these into [`FileRef`]s, depth first, keeping
//! the order in which entries were written. That order matters: slots that
//! neither an explicit suffix nor the history decides are filled in input
//! order.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::vec;

use log::{debug, trace};

use crate::error::{PatchError, Result};
use crate::patch_name::{NameCache, PatchName};

/// Extension of list files
pub const LIST_EXTENSION: &str = "txt";

/// Starts a comment in a list file
pub const LIST_COMMENT: char = '#';

/// Separates a path from its slot suffix
pub const SLOT_SEPARATOR: char = ':';

/// Maximum nesting of list files
pub const MAX_LIST_DEPTH: usize = 32;

/// The `:N` part of an input
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SlotSuffix {
    /// A slot number
    Index(usize),
    /// Anything that is not a slot number, kept for error reporting
    Invalid(String),
}

impl SlotSuffix {
    /// Parse the text after the separator
    pub fn parse(text: &str) -> Self {
        match text.parse::<usize>() {
            Ok(index) => Self::Index(index),
            Err(_) => Self::Invalid(text.to_string()),
        }
    }
}

impl fmt::Display for SlotSuffix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Index(index) => write!(f, "{index}"),
            Self::Invalid(text) => write!(f, "{text}"),
        }
    }
}

/// A concrete patch file reference produced by expansion
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FileRef {
    /// Source path, without any slot suffix
    pub path: PathBuf,
    /// Explicit slot request, if the input carried one
    pub slot: Option<SlotSuffix>,
}

impl FileRef {
    /// A reference with no slot request
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            slot: None,
        }
    }

    /// A reference pinned to `slot`
    pub fn with_slot(path: impl Into<PathBuf>, slot: usize) -> Self {
        Self {
            path: path.into(),
            slot: Some(SlotSuffix::Index(slot)),
        }
    }

    /// Parse a literal `path[:N]` specification
    ///
    /// ```
    /// use zoia_patch::{FileRef, SlotSuffix};
    ///
    /// let r = FileRef::parse("lib/Delay.bin:12");
    /// assert_eq!(r.path.to_str(), Some("lib/Delay.bin"));
    /// assert_eq!(r.slot, Some(SlotSuffix::Index(12)));
    /// ```
    pub fn parse(spec: &str) -> Self {
        let (path, slot) = split_slot(spec);
        Self {
            path: PathBuf::from(path),
            slot: slot.filter(|s| !s.is_empty()).map(SlotSuffix::parse),
        }
    }

    /// The explicit slot number, if one was requested and is valid
    pub fn explicit_slot(&self) -> Option<usize> {
        match self.slot {
            Some(SlotSuffix::Index(index)) => Some(index),
            _ => None,
        }
    }

    /// Classify the file name
    pub fn patch_name(&self) -> Result<PatchName> {
        PatchName::from_path(&self.path)
    }

    /// The base identifier of the file name
    pub fn base_id(&self) -> Result<String> {
        self.patch_name().map(PatchName::into_base_id)
    }

    /// The base identifier, classified through `cache`
    pub fn base_id_cached<'c>(&self, cache: &'c mut NameCache) -> Result<&'c str> {
        cache.classify(&self.path).map(PatchName::base_id)
    }
}

impl fmt::Display for FileRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path.display())?;
        if let Some(slot) = &self.slot {
            write!(f, "{SLOT_SEPARATOR}{slot}")?;
        }
        Ok(())
    }
}

/// Split a specification at the last separator of its file name
///
/// Colons in directory names belong to the path. A trailing separator gives
/// an empty suffix.
fn split_slot(spec: &str) -> (&str, Option<&str>) {
    let name_start = spec.rfind(std::path::is_separator).map_or(0, |i| i + 1);
    match spec[name_start..].rfind(SLOT_SEPARATOR) {
        Some(i) => {
            let at = name_start + i;
            (&spec[..at], Some(&spec[at + SLOT_SEPARATOR.len_utf8()..]))
        }
        None => (spec, None),
    }
}

fn has_glob_magic(s: &str) -> bool {
    s.contains(['*', '?', '['])
}

fn is_list_file(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == LIST_EXTENSION)
}

/// Parse the entries of a list file
///
/// Everything after `#` is a comment; surrounding whitespace is trimmed and
/// blank lines are dropped.
pub fn list_entries(content: &str) -> Vec<String> {
    content
        .lines()
        .filter_map(|line| {
            let entry = line
                .split_once(LIST_COMMENT)
                .map_or(line, |(entry, _)| entry)
                .trim();
            (!entry.is_empty()).then(|| entry.to_string())
        })
        .collect()
}

#[derive(Debug)]
enum Pending {
    /// An input as the user wrote it
    Spec(String),
    /// A path produced by glob matching: never re-globbed, never suffixed
    Matched(PathBuf),
}

/// Lazy depth-first expansion of input specifications
///
/// Yields one [`FileRef`] per concrete file. The first error ends the
/// iteration.
#[derive(Debug)]
pub struct Expand {
    stack: Vec<vec::IntoIter<Pending>>,
    failed: bool,
}

impl Expand {
    fn push(&mut self, entries: Vec<Pending>, spec: &str) -> Result<()> {
        if self.stack.len() > MAX_LIST_DEPTH {
            return Err(PatchError::NestingTooDeep {
                limit: MAX_LIST_DEPTH,
                spec: spec.to_string(),
            });
        }
        self.stack.push(entries.into_iter());
        Ok(())
    }

    fn read_list(&mut self, path: &Path, spec: &str) -> Result<()> {
        let content = fs::read_to_string(path).map_err(|source| PatchError::ReadList {
            path: path.to_path_buf(),
            source,
        })?;
        let entries: Vec<Pending> = list_entries(&content)
            .into_iter()
            .map(Pending::Spec)
            .collect();
        debug!("{} lists {} entries", path.display(), entries.len());
        self.push(entries, spec)
    }

    fn glob(&mut self, pattern: &str) -> Result<()> {
        let matches = glob::glob(pattern)?
            .map(|entry| entry.map(Pending::Matched))
            .collect::<std::result::Result<Vec<_>, _>>()?;
        debug!("{pattern} matched {} files", matches.len());
        self.push(matches, pattern)
    }

    /// Resolve one pending entry; a concrete file is returned, anything else
    /// pushes its children
    fn resolve(&mut self, pending: Pending) -> Result<Option<FileRef>> {
        match pending {
            Pending::Matched(path) => {
                if is_list_file(&path) {
                    let spec = path.display().to_string();
                    self.read_list(&path, &spec)?;
                    Ok(None)
                } else {
                    Ok(Some(FileRef::new(path)))
                }
            }
            Pending::Spec(spec) => {
                let (base, slot) = split_slot(&spec);
                if has_glob_magic(base) {
                    if slot.is_some() {
                        return Err(PatchError::AmbiguousSlotSuffix { kind: "Globs", spec });
                    }
                    self.glob(base)?;
                    Ok(None)
                } else if is_list_file(Path::new(base)) {
                    if slot.is_some() {
                        return Err(PatchError::AmbiguousSlotSuffix {
                            kind: "Text files",
                            spec,
                        });
                    }
                    self.read_list(Path::new(base), &spec)?;
                    Ok(None)
                } else {
                    Ok(Some(FileRef::parse(&spec)))
                }
            }
        }
    }
}

impl Iterator for Expand {
    type Item = Result<FileRef>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        loop {
            let top = self.stack.last_mut()?;
            let Some(pending) = top.next() else {
                self.stack.pop();
                continue;
            };
            match self.resolve(pending) {
                Ok(Some(file)) => {
                    trace!("expanded {file}");
                    return Some(Ok(file));
                }
                Ok(None) => {}
                Err(e) => {
                    self.failed = true;
                    self.stack.clear();
                    return Some(Err(e));
                }
            }
        }
    }
}

/// Expand input specifications lazily
///
/// The expander owns its copy of `specs`, so expanding the same inputs twice
/// gives the same files as long as the file system has not changed.
pub fn expand<I, S>(specs: I) -> Expand
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let top: Vec<Pending> = specs
        .into_iter()
        .map(|s| Pending::Spec(s.into()))
        .collect();
    Expand {
        stack: vec![top.into_iter()],
        failed: false,
    }
}

/// Expand input specifications, stopping at the first error
pub fn expand_all<I, S>(specs: I) -> Result<Vec<FileRef>>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    expand(specs).collect()
}
