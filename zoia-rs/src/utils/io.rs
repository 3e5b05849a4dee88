//! I/O and path utilities

use anyhow::{Context, Result};
use std::fs;
use std::path::{Component, Path};

/// Shorten a path for display, keeping as many trailing components as fit
///
/// The file name is always kept, even when it alone is longer than
/// `max_len`.
pub fn short_path(path: &Path, max_len: usize) -> String {
    let full = path.display().to_string();
    if full.chars().count() <= max_len {
        return full;
    }

    let mut parts: Vec<String> = Vec::new();
    let mut len = "...".len();
    for component in path.components().rev() {
        let Component::Normal(name) = component else {
            break;
        };
        let name = name.to_string_lossy();
        let needed = name.chars().count() + 1;
        if !parts.is_empty() && len + needed > max_len {
            break;
        }
        len += needed;
        parts.push(name.into_owned());
    }
    parts.reverse();
    format!(".../{}", parts.join("/"))
}

/// Create `dir` and its parents unless it already exists
///
/// Returns `true` if anything was created.
pub fn ensure_dir(dir: &Path) -> Result<bool> {
    if dir.is_dir() {
        return Ok(false);
    }
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create directory: {}", dir.display()))?;
    Ok(true)
}
