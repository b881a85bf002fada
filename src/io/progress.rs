//! Batch progress tracking shared across scoring worker threads

use crate::io::configuration::PROGRESS_BAR_WIDTH;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use std::sync::LazyLock;
use std::sync::atomic::{AtomicUsize, Ordering};

static BATCH_STYLE: LazyLock<ProgressStyle> = LazyLock::new(|| {
    let template = format!(
        "[{{elapsed_precise}}] Images: [{{bar:{PROGRESS_BAR_WIDTH}.cyan/blue}}] {{pos}}/{{len}} {{msg}}"
    );
    ProgressStyle::default_bar()
        .template(&template)
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏ ")
});

/// Single progress bar over a batch of images
///
/// All reporting methods take `&self` so the manager can be shared with
/// parallel workers.
pub struct ProgressManager {
    bar: Option<ProgressBar>,
    failures: AtomicUsize,
}

impl Default for ProgressManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressManager {
    /// Create a manager with no bar until [`ProgressManager::initialize`]
    pub const fn new() -> Self {
        Self {
            bar: None,
            failures: AtomicUsize::new(0),
        }
    }

    /// Create the bar for `file_count` images
    pub fn initialize(&mut self, file_count: usize) {
        let bar = ProgressBar::new(file_count as u64);
        bar.set_style(BATCH_STYLE.clone());
        self.bar = Some(bar);
        self.failures.store(0, Ordering::Relaxed);
    }

    /// Record one finished image
    pub fn complete_file(&self, path: &Path, succeeded: bool) {
        if !succeeded {
            self.failures.fetch_add(1, Ordering::Relaxed);
        }
        if let Some(ref bar) = self.bar {
            let name = path
                .file_name()
                .unwrap_or_default()
                .to_string_lossy()
                .into_owned();
            let mark = if succeeded { "✓" } else { "✗" };
            bar.set_message(format!("{mark} {name}"));
            bar.inc(1);
        }
    }

    /// Number of images reported as failed since initialization
    pub fn failure_count(&self) -> usize {
        self.failures.load(Ordering::Relaxed)
    }

    /// Number of images reported so far
    pub fn position(&self) -> u64 {
        self.bar.as_ref().map_or(0, ProgressBar::position)
    }

    /// Close the bar with a closing summary
    pub fn finish(&self) {
        if let Some(ref bar) = self.bar {
            let failures = self.failure_count();
            if failures == 0 {
                bar.finish_with_message("all images scored");
            } else {
                bar.finish_with_message(format!("{failures} failed"));
            }
        }
    }
}
