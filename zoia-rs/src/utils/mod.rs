//! Shared utilities for the zoia CLI

pub mod format;
pub mod io;
pub mod progress;
pub mod table;

pub use format::*;
pub use io::*;
pub use progress::*;
pub use table::*;
