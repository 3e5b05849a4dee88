//! Progress bar utilities

use indicatif::{ProgressBar, ProgressStyle};

/// Create a progress bar for copying patch files
///
/// Hidden when `hidden` is set, so verbose and dry runs print plain lines
/// instead.
pub fn create_copy_progress(total: u64, hidden: bool) -> ProgressBar {
    if hidden {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new(total);
    if let Ok(style) =
        ProgressStyle::default_bar().template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}")
    {
        pb.set_style(style.progress_chars("##-"));
    }
    pb.set_message("Copying patches");
    pb
}
