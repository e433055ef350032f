/*!
 * Batch translation processing.
 *
 * Translates every page of a directory in name order. A failing page is
 * logged and counted; the batch continues with the next one.
 */

use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info};
use std::path::Path;
use std::time::{Duration, Instant};

use crate::file_utils::FileManager;

use super::core::{DocumentTranslator, FileOutcome};

/// Counts of a batch run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchStats {
    /// Pages translated and written
    pub translated: usize,
    /// Pages skipped because a translation already existed
    pub skipped: usize,
    /// Pages that failed
    pub failed: usize,
}

impl BatchStats {
    /// Total number of pages seen
    pub fn total(&self) -> usize {
        self.translated + self.skipped + self.failed
    }

    /// Add the counts of another run
    pub fn merge(&mut self, other: &BatchStats) {
        self.translated += other.translated;
        self.skipped += other.skipped;
        self.failed += other.failed;
    }
}

/// Batch translator for whole directories of pages
pub struct BatchTranslator<'a> {
    /// The translator to use
    translator: &'a DocumentTranslator,
    /// Whether to draw a progress bar
    show_progress: bool,
}

impl<'a> BatchTranslator<'a> {
    /// Create a new batch translator
    pub fn new(translator: &'a DocumentTranslator) -> Self {
        Self {
            translator,
            show_progress: true,
        }
    }

    /// Enable or disable the progress bar
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// Translate every `.html` file of `input_dir` into `output_dir`
    pub async fn translate_directory(&self, input_dir: &Path, output_dir: &Path, force: bool) -> Result<BatchStats> {
        let start_time = Instant::now();
        let files = FileManager::find_files(input_dir, "html")?;
        FileManager::ensure_dir(output_dir)?;

        info!(
            "Translating {} pages from {:?} into {:?} with {}",
            files.len(),
            input_dir,
            output_dir,
            self.translator.provider_name()
        );

        let progress_bar = self.progress_bar(files.len() as u64);
        let mut stats = BatchStats::default();

        for file in &files {
            let file_name = file
                .file_name()
                .map(|f| f.to_string_lossy().to_string())
                .unwrap_or_else(|| "unknown".to_string());
            progress_bar.set_message(format!("Translating: {}", file_name));

            match self.translator.translate_file(file, output_dir, force).await {
                Ok(FileOutcome::Translated { .. }) => stats.translated += 1,
                Ok(FileOutcome::Skipped { .. }) => stats.skipped += 1,
                Err(e) => {
                    error!("Error translating {}: {:#}", file_name, e);
                    stats.failed += 1;
                }
            }

            progress_bar.inc(1);
        }

        progress_bar.finish_with_message("Translation complete");
        info!(
            "Translation completed: {} translated, {} skipped, {} failed in {}",
            stats.translated,
            stats.skipped,
            stats.failed,
            format_duration(start_time.elapsed())
        );

        Ok(stats)
    }

    fn progress_bar(&self, len: u64) -> ProgressBar {
        if !self.show_progress {
            return ProgressBar::hidden();
        }

        let progress_bar = ProgressBar::new(len);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} pages ({percent}%) {msg}")
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        progress_bar.set_style(style.progress_chars("█▓▒░"));
        progress_bar
    }
}

/// Format a duration as "1m 5s" or "4.250s"
pub fn format_duration(duration: Duration) -> String {
    let total_seconds = duration.as_secs();
    let minutes = total_seconds / 60;
    let seconds = total_seconds % 60;

    if minutes > 0 {
        format!("{}m {}s", minutes, seconds)
    } else {
        format!("{}.{:03}s", seconds, duration.subsec_millis())
    }
}
