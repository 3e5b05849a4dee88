//! `zoia rename`: strip the slot prefix from files exported from the pedal

use anyhow::{Context, Result};
use clap::Args;
use console::style;
use log::warn;
use std::fs;

use zoia_patch::{RenamePlan, expand_all};

use crate::utils::format_count;

#[derive(Debug, Args)]
pub struct RenameArgs {
    /// Exported patch files (NNN_zoia_Name.bin), glob patterns or .txt list files
    #[arg(required = true, value_name = "FILES")]
    pub files: Vec<String>,

    /// Print what would be done, don't do it
    #[arg(short, long)]
    pub dry_run: bool,

    /// Overwrite existing files
    #[arg(short, long)]
    pub force: bool,
}

pub fn execute(args: RenameArgs) -> Result<()> {
    let refs = expand_all(args.files.iter().cloned()).context("Failed to expand input files")?;
    let plan = RenamePlan::new(&refs, args.force)?;

    if !plan.skipped.is_empty() {
        let skipped: Vec<String> = plan
            .skipped
            .iter()
            .map(|p| p.display().to_string())
            .collect();
        warn!("Not zoia files: {}", skipped.join(", "));
    }

    for op in &plan.ops {
        println!("{} -> {}", op.from.display(), op.to.display());
        if !args.dry_run {
            fs::rename(&op.from, &op.to).with_context(|| {
                format!(
                    "Failed to rename {} to {}",
                    op.from.display(),
                    op.to.display()
                )
            })?;
        }
    }

    println!("{} renamed", style(format_count(plan.ops.len(), "file")).green());

    Ok(())
}
