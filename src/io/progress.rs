//! Multi-file progress tracking with automatic batching for large sets

use crate::io::configuration::MAX_INDIVIDUAL_PROGRESS_BARS;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::path::Path;
use std::sync::LazyLock;
use std::time::Duration;

/// Pipeline stage reached by a file
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum Stage {
    /// Decoding the depth map and template
    #[default]
    Load,
    /// Building the pattern tile
    Tile,
    /// Laying out and linking the stereogram
    Composite,
    /// Writing the PNG
    Export,
    /// Finished
    Done,
}

impl Stage {
    /// Number of stages before completion
    pub const COUNT: usize = 4;

    /// Zero-based position of the stage in the pipeline
    pub const fn position(self) -> usize {
        match self {
            Self::Load => 0,
            Self::Tile => 1,
            Self::Composite => 2,
            Self::Export => 3,
            Self::Done => Self::COUNT,
        }
    }

    /// Short label shown next to the bar
    pub const fn label(self) -> &'static str {
        match self {
            Self::Load => "load",
            Self::Tile => "tile",
            Self::Composite => "composite",
            Self::Export => "export",
            Self::Done => "done",
        }
    }
}

/// Coordinates progress display for batch operations
///
/// Automatically switches between individual progress bars (for small batches)
/// and a single batch progress bar (for large batches) based on file count
pub struct ProgressManager {
    multi_progress: MultiProgress,
    batch_bar: Option<ProgressBar>,
    file_bars: Vec<ProgressBar>,
    /// One slot per announced file, in processing order
    files: Vec<FileState>,
}

#[derive(Debug, Clone, Default)]
struct FileState {
    /// Set once the file has been started
    name: Option<String>,
    stage: Stage,
    elapsed: Option<Duration>,
}

impl FileState {
    fn message(&self) -> String {
        match self.elapsed {
            Some(elapsed) if self.stage == Stage::Done => {
                format!("{}ms", elapsed.as_millis())
            }
            _ => self.stage.label().to_string(),
        }
    }
}

impl Default for ProgressManager {
    fn default() -> Self {
        Self::new()
    }
}

static PROGRESS_STYLE: LazyLock<ProgressStyle> = LazyLock::new(|| {
    ProgressStyle::default_bar()
        .template("{msg:>9} [{bar:30.cyan/blue}] {prefix}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏ ")
});

static BATCH_STYLE: LazyLock<ProgressStyle> = LazyLock::new(|| {
    ProgressStyle::default_bar()
        .template("[{elapsed_precise}] Files: [{bar:40.cyan/blue}] {pos}/{len}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
});

impl ProgressManager {
    /// Create a new progress manager
    pub fn new() -> Self {
        Self {
            multi_progress: MultiProgress::new(),
            batch_bar: None,
            file_bars: Vec::new(),
            files: Vec::new(),
        }
    }

    /// Initialize progress bars based on file count
    pub fn initialize(&mut self, file_count: usize) {
        self.files = vec![FileState::default(); file_count];

        // Switch to batch mode for large file sets to avoid terminal spam
        if file_count > MAX_INDIVIDUAL_PROGRESS_BARS + 1 {
            let batch_bar = ProgressBar::new(file_count as u64);
            batch_bar.set_style(BATCH_STYLE.clone());
            self.batch_bar = Some(self.multi_progress.add(batch_bar));
        }

        self.file_bars = (0..file_count.min(MAX_INDIVIDUAL_PROGRESS_BARS))
            .map(|_| {
                let pb = ProgressBar::new(Stage::COUNT as u64);
                pb.set_style(PROGRESS_STYLE.clone());
                self.multi_progress.add(pb)
            })
            .collect();
    }

    /// Number of files announced by [`Self::initialize`]
    pub const fn file_count(&self) -> usize {
        self.files.len()
    }

    /// Whether a single batch bar is shown above the per-file bars
    pub const fn is_batched(&self) -> bool {
        self.batch_bar.is_some()
    }

    /// Register a file at the load stage; unknown indices are ignored
    pub fn start_file(&mut self, index: usize, path: &Path) {
        if let Some(state) = self.files.get_mut(index) {
            let name = path.file_name().unwrap_or_default().to_string_lossy();
            *state = FileState {
                name: Some(name.into_owned()),
                ..FileState::default()
            };
        }
        self.update_bars();
    }

    /// Report that a file has moved on to `stage`
    pub fn update_stage(&mut self, index: usize, stage: Stage) {
        if let Some(state) = self.files.get_mut(index) {
            state.stage = stage;
        }
        self.update_bars();
    }

    /// Stage most recently reported for a file
    pub fn stage(&self, index: usize) -> Option<Stage> {
        self.files.get(index).map(|state| state.stage)
    }

    /// Whether a file has been registered with [`Self::start_file`]
    pub fn is_started(&self, index: usize) -> bool {
        self.files.get(index).is_some_and(|state| state.name.is_some())
    }

    /// Mark file as completed and update batch progress
    pub fn complete_file(&mut self, index: usize, elapsed: Duration) {
        if let Some(ref batch_bar) = self.batch_bar {
            batch_bar.inc(1);
        }

        if let Some(state) = self.files.get_mut(index) {
            state.stage = Stage::Done;
            state.elapsed = Some(elapsed);
        }
        self.update_bars();
    }

    /// Clean up all progress displays
    pub fn finish(&self) {
        if let Some(ref batch_bar) = self.batch_bar {
            batch_bar.finish_with_message("All files processed");
        }
        let _ = self.multi_progress.clear();
    }

    // Bars show the most recently started files, oldest on top
    fn update_bars(&self) {
        let started: Vec<&FileState> = self
            .files
            .iter()
            .filter(|state| state.name.is_some())
            .collect();
        let skip = started.len().saturating_sub(self.file_bars.len());

        let mut bars = self.file_bars.iter();
        for (state, bar) in started.iter().skip(skip).zip(bars.by_ref()) {
            bar.set_position(state.stage.position() as u64);
            bar.set_message(state.message());
            bar.set_prefix(state.name.clone().unwrap_or_default());
        }
        for bar in bars {
            bar.set_position(0);
            bar.set_message("");
            bar.set_prefix("");
        }
    }
}
