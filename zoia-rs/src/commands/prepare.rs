//! `zoia prepare`: copy patch files into numbered slots

use anyhow::{Context, Result};
use clap::Args;
use console::style;
use log::{info, warn};
use std::fs;
use std::path::PathBuf;

use zoia_patch::{CopyPlan, HistoryDocument, allocate, expand_all};

use crate::utils::{create_copy_progress, default_output_dir, ensure_dir, format_count, slot_table};

#[derive(Debug, Args)]
pub struct PrepareArgs {
    /// Patch files, glob patterns or .txt list files; append :N to pin a file to slot N
    #[arg(required = true, value_name = "FILES")]
    pub files: Vec<String>,

    /// Print what would be done, don't do it
    #[arg(short, long)]
    pub dry_run: bool,

    /// Directory to write patch files to [default: zoia-<timestamp>]
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// How many slots to fill; zero fills up to the last used slot
    #[arg(short, long, default_value_t = 0, value_name = "N")]
    pub slot_count: usize,

    /// File that remembers which patches lived in which slot (.toml, .yaml or .json)
    #[arg(
        short = 'f',
        long,
        default_value = "slots_file.toml",
        env = "ZOIA_SLOTS_FILE",
        value_name = "PATH"
    )]
    pub slots_file: PathBuf,

    /// Record this run's slot assignments in the slots file
    #[arg(short, long)]
    pub update_slots_file: bool,

    /// Patch copied into slots that nothing else fills
    #[arg(
        long,
        default_value = "zoia_empty.bin",
        env = "ZOIA_EMPTY_PATCH",
        value_name = "PATH"
    )]
    pub empty_patch: PathBuf,
}

pub fn execute(args: PrepareArgs) -> Result<()> {
    let output = args
        .output
        .clone()
        .unwrap_or_else(|| default_output_dir(chrono::Local::now()));

    let mut doc = HistoryDocument::load(&args.slots_file)?;

    let refs = expand_all(args.files.iter().cloned()).context("Failed to expand input files")?;
    info!("Expanded {} input files", refs.len());

    let table = allocate(&doc.slots, &refs, args.slot_count)?;
    let plan = CopyPlan::new(&table, &output, &args.empty_patch);

    if plan.needs_placeholder() && !args.empty_patch.is_file() {
        if args.dry_run {
            warn!("Empty patch not found: {}", args.empty_patch.display());
        } else {
            anyhow::bail!(
                "Empty patch not found: {} (use --empty-patch or ZOIA_EMPTY_PATCH)",
                args.empty_patch.display()
            );
        }
    }

    if args.dry_run {
        println!("{}", slot_table(&plan));
        if !output.exists() {
            println!("Making output directory {}", output.display());
        }
    } else if ensure_dir(&output)? {
        info!("Made output directory {}", output.display());
    }

    let verbose = args.dry_run || log::log_enabled!(log::Level::Info);
    let progress = create_copy_progress(plan.len() as u64, verbose);
    for op in &plan {
        if args.dry_run {
            println!("Copying {} to {}", op.source.display(), op.target.display());
        } else {
            info!("Copying {} to {}", op.source.display(), op.target.display());
            fs::copy(&op.source, &op.target).with_context(|| {
                format!(
                    "Failed to copy {} to {}",
                    op.source.display(),
                    op.target.display()
                )
            })?;
        }
        progress.inc(1);
    }
    progress.finish_and_clear();

    if args.update_slots_file {
        let added = plan.record_history(&mut doc.slots);
        info!("{} new slot history entries", added);
        if !doc.is_empty() {
            if args.dry_run {
                println!("Writing {}", args.slots_file.display());
            } else {
                doc.save(&args.slots_file).with_context(|| {
                    format!("Failed to write slots file: {}", args.slots_file.display())
                })?;
                info!("Wrote {}", args.slots_file.display());
            }
        }
    }

    println!(
        "{} copied to {}",
        style(format_count(plan.len(), "file")).green(),
        style(output.display()).cyan()
    );

    Ok(())
}
