//! Command-line interface for scoring a composite PNG or a directory of them

use crate::algorithm::scoring::{BatchEntry, Scorer};
use crate::analysis::statistics::BatchReport;
use crate::io::configuration::{DEFAULT_BEST_COUNT, DEFAULT_WORST_COUNT, IMAGE_EXTENSION};
use crate::io::error::{Result, ScoreError, invalid_parameter};
use crate::io::progress::ProgressManager;
use crate::spatial::mask::BackgroundMode;
use clap::{ArgAction, Parser};
use log::LevelFilter;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "sketchscore")]
#[command(
    author,
    version,
    about = "Score observational drawings against their reference"
)]
/// Command-line arguments for the scoring tool
// CLI tools commonly need multiple boolean flags for various features and user preferences
#[allow(clippy::struct_excessive_bools)]
pub struct Cli {
    /// Composite PNG file or directory of composites to score
    #[arg(value_name = "TARGET")]
    pub target: PathBuf,

    /// Read strokes from the alpha channel instead of a white background
    #[arg(short, long)]
    pub transparent: bool,

    /// Suppress progress output
    #[arg(short, long)]
    pub quiet: bool,

    /// Print results as JSON
    #[arg(short, long)]
    pub json: bool,

    /// Include rendering data when scoring a single file as JSON
    #[arg(short, long)]
    pub overlay: bool,

    /// Write a JSON batch report to this path
    #[arg(short, long, value_name = "PATH")]
    pub report: Option<PathBuf>,

    /// Number of worst images listed in batch output
    #[arg(short, long, default_value_t = DEFAULT_WORST_COUNT)]
    pub worst: usize,

    /// Number of best images listed in batch output
    #[arg(short, long, default_value_t = DEFAULT_BEST_COUNT)]
    pub best: usize,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Background convention selected by the flags
    pub const fn mode(&self) -> BackgroundMode {
        BackgroundMode::from_transparent(self.transparent)
    }

    /// Check if progress should be displayed
    pub const fn should_show_progress(&self) -> bool {
        !self.quiet
    }

    /// Log level implied by the verbosity count
    pub const fn log_level(&self) -> LevelFilter {
        match self.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }
}

/// Orchestrates scoring of the target files with progress tracking
pub struct FileProcessor {
    cli: Cli,
    scorer: Scorer,
    progress_manager: Option<ProgressManager>,
}

impl FileProcessor {
    /// Create a new file processor with the given CLI arguments
    pub fn new(cli: Cli) -> Self {
        let progress_manager = cli.should_show_progress().then(ProgressManager::new);
        let scorer = Scorer::canonical(cli.mode());

        Self {
            cli,
            scorer,
            progress_manager,
        }
    }

    /// Score the target and print the results
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The target does not exist or cannot be read
    /// - The target is neither a PNG file nor a directory
    /// - A single-file target cannot be scored
    /// - The directory cannot be listed
    /// - Output serialization or report writing fails
    pub fn process(&mut self) -> Result<()> {
        std::fs::metadata(&self.cli.target).map_err(|source| ScoreError::NotFound {
            path: self.cli.target.clone(),
            source,
        })?;

        if self.cli.target.is_file() {
            return self.process_single();
        }

        let files = self.collect_files()?;
        if files.is_empty() {
            log::warn!("no {IMAGE_EXTENSION} files in {}", self.cli.target.display());
            return Ok(());
        }

        let entries = self.score_files(&files);
        let report = BatchReport::from_entries(&entries, self.cli.worst, self.cli.best);
        if let Some(ref path) = self.cli.report {
            Self::write_report(&report, path)?;
        }

        let output = if self.cli.json {
            serde_json::to_string_pretty(&report)?
        } else {
            render_report(&report)
        };
        Self::emit(&output);
        Ok(())
    }

    fn process_single(&self) -> Result<()> {
        if !has_image_extension(&self.cli.target) {
            return Err(invalid_parameter(
                "target",
                &self.cli.target.display(),
                &format!("file must be a .{IMAGE_EXTENSION} image"),
            ));
        }

        let summary = self
            .scorer
            .summarize_path(&self.cli.target, self.cli.json && self.cli.overlay)?;

        if let Some(ref path) = self.cli.report {
            let entries = [BatchEntry {
                path: self.cli.target.clone(),
                result: Ok(summary.score.clone()),
            }];
            let report = BatchReport::from_entries(&entries, self.cli.worst, self.cli.best);
            Self::write_report(&report, path)?;
        }

        let output = if self.cli.json {
            serde_json::to_string_pretty(&summary)?
        } else {
            summary.score.evaluation_text()
        };
        Self::emit(&output);
        Ok(())
    }

    /// List the images of a directory target in name order
    fn collect_files(&self) -> Result<Vec<PathBuf>> {
        if !self.cli.target.is_dir() {
            return Err(invalid_parameter(
                "target",
                &self.cli.target.display(),
                &format!("must be a .{IMAGE_EXTENSION} file or a directory"),
            ));
        }

        let listing_error = |source: std::io::Error| ScoreError::FileSystem {
            path: self.cli.target.clone(),
            operation: "directory listing",
            source,
        };

        let mut files = Vec::new();
        for entry in std::fs::read_dir(&self.cli.target).map_err(listing_error)? {
            let path = entry.map_err(listing_error)?.path();
            if path.is_file() && has_image_extension(&path) {
                files.push(path);
            }
        }
        files.sort();
        log::info!("found {} images in {}", files.len(), self.cli.target.display());
        Ok(files)
    }

    fn score_files(&mut self, files: &[PathBuf]) -> Vec<BatchEntry> {
        if let Some(ref mut pm) = self.progress_manager {
            pm.initialize(files.len());
        }

        let progress = self.progress_manager.as_ref();
        let entries = self.scorer.score_batch_with(files, |entry| {
            if let Some(pm) = progress {
                pm.complete_file(&entry.path, entry.result.is_ok());
            }
        });

        if let Some(ref pm) = self.progress_manager {
            pm.finish();
        }
        entries
    }

    fn write_report(report: &BatchReport, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(report)?;
        std::fs::write(path, json).map_err(|source| ScoreError::FileSystem {
            path: path.to_path_buf(),
            operation: "report write",
            source,
        })?;
        log::info!("report written to {}", path.display());
        Ok(())
    }

    // Allow print for the command's primary output
    #[allow(clippy::print_stdout)]
    fn emit(output: &str) {
        println!("{output}");
    }
}

/// Plain-text rendering of a batch report
///
/// One line per scored image, one per failure, then the aggregate figures and
/// the selected cases.
pub fn render_report(report: &BatchReport) -> String {
    let mut out = String::new();
    for (id, score) in &report.scores {
        let _ = writeln!(out, "{id}: {score}");
    }
    for (id, reason) in &report.failures {
        let _ = writeln!(out, "{id}: FAILED ({reason})");
    }

    let totals = report.statistics.as_ref().map_or_else(
        || "no images scored".to_string(),
        |stats| {
            format!(
                "{} scored | top 5 mean {:.1} | min {:.1} | max {:.1} | mean error {:.1}%",
                stats.count, stats.mean_top5, stats.min_top5, stats.max_top5, stats.mean_error_pct
            )
        },
    );
    let _ = writeln!(out, "\n{totals}");

    let selection = &report.selection;
    if !selection.worst.is_empty() {
        let _ = writeln!(out, "worst: {}", selection.worst.join(", "));
    }
    if !selection.best.is_empty() {
        let _ = writeln!(out, "best: {}", selection.best.join(", "));
    }
    if let Some(ref median) = selection.median {
        let _ = writeln!(out, "median: {median}");
    }
    out.trim_end().to_string()
}

fn has_image_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(IMAGE_EXTENSION))
}
