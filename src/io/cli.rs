//! Command-line interface for batch stereogram generation from depth images

use crate::algorithm::generator::{GenerationConfig, Parameters, StereogramGenerator};
use crate::algorithm::pattern::PatternSource;
use crate::io::configuration::{
    DEFAULT_DEPTH_STRENGTH, DEFAULT_SEED, DEFAULT_SEPARATION, MAX_INTENDED_DEPTH_STRENGTH,
    MIN_INTENDED_DEPTH_STRENGTH, OUTPUT_EXTENSION, OUTPUT_SUFFIX,
};
use crate::io::error::{Result, StereogramError, invalid_parameter, not_found};
use crate::io::image::{export_png, load_depth_map, load_template};
use crate::io::library::{TemplateLibrary, is_image_file};
use crate::io::progress::{ProgressManager, Stage};
use clap::Parser;
use std::path::{Path, PathBuf};
use std::time::Instant;

#[derive(Parser)]
#[command(name = "sirds")]
#[command(
    author,
    version,
    about = "Generate single-image random-dot stereograms from depth maps"
)]
/// Command-line arguments for the stereogram tool
// CLI tools commonly need multiple boolean flags for various features and user preferences
#[allow(clippy::struct_excessive_bools)]
pub struct Cli {
    /// Depth image or directory of depth images to process
    #[arg(value_name = "TARGET")]
    pub target: PathBuf,

    /// Template image, or a directory of templates to pick from
    #[arg(short, long)]
    pub template: Option<PathBuf>,

    /// Name (file stem) of the template to use from a template directory
    #[arg(long, requires = "template")]
    pub template_name: Option<String>,

    /// Horizontal period of the base pattern in pixels
    #[arg(short = 'S', long, default_value_t = DEFAULT_SEPARATION)]
    pub separation: usize,

    /// Percentage of the separation removed at maximum depth
    #[arg(short, long, default_value_t = DEFAULT_DEPTH_STRENGTH, allow_negative_numbers = true)]
    pub depth_strength: i32,

    /// Seed for noise tiles and random template choice
    #[arg(short, long, default_value_t = DEFAULT_SEED)]
    pub seed: u64,

    /// Worker threads for row linking (defaults to one per core)
    #[arg(short = 'j', long)]
    pub threads: Option<usize>,

    /// Link rows on the calling thread only
    #[arg(long, conflicts_with = "threads")]
    pub sequential: bool,

    /// Output path (single target file only)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Suppress progress output
    #[arg(short, long)]
    pub quiet: bool,

    /// Process files even if output exists
    #[arg(short, long)]
    pub no_skip: bool,

    /// Enable debug logging when `RUST_LOG` is unset
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Check if existing output files should be skipped
    pub const fn skip_existing(&self) -> bool {
        !self.no_skip
    }

    /// Check if progress should be displayed
    pub const fn should_show_progress(&self) -> bool {
        !self.quiet
    }

    /// Stereo parameters requested on the command line
    ///
    /// # Errors
    ///
    /// Returns an error if the separation is zero
    pub fn parameters(&self) -> Result<Parameters> {
        Parameters::new(self.separation, self.depth_strength)
    }

    /// Full generation configuration including threading
    ///
    /// # Errors
    ///
    /// Returns an error if the separation is zero
    pub fn generation_config(&self) -> Result<GenerationConfig> {
        Ok(GenerationConfig {
            parameters: self.parameters()?,
            parallel: !self.sequential,
            threads: self.threads,
        })
    }
}

/// Orchestrates batch processing of depth images with progress tracking
pub struct FileProcessor {
    cli: Cli,
    progress_manager: Option<ProgressManager>,
}

impl FileProcessor {
    /// Create a new file processor with the given CLI arguments
    pub fn new(cli: Cli) -> Self {
        let progress_manager = cli.should_show_progress().then(ProgressManager::new);

        Self {
            cli,
            progress_manager,
        }
    }

    /// Process files according to CLI arguments
    ///
    /// # Errors
    ///
    /// Returns an error if target validation, template resolution or file
    /// processing fails
    pub fn process(&mut self) -> Result<()> {
        let files = self.collect_files()?;

        if files.is_empty() {
            return Ok(());
        }

        if self.cli.output.is_some() && self.cli.target.is_dir() {
            return Err(invalid_parameter(
                "output",
                &self.cli.target.display(),
                &"an explicit output path requires a single target file",
            ));
        }

        let config = self.cli.generation_config()?;
        if !config.parameters.is_intended_strength() {
            tracing::warn!(
                depth_strength = config.parameters.depth_strength(),
                min = MIN_INTENDED_DEPTH_STRENGTH,
                max = MAX_INTENDED_DEPTH_STRENGTH,
                "depth strength outside the intended range"
            );
        }

        let generator = StereogramGenerator::new(config)?;
        let source = self.resolve_pattern_source()?;

        if let Some(ref mut pm) = self.progress_manager {
            pm.initialize(files.len());
        }

        for (index, file) in files.iter().enumerate() {
            self.process_file(&generator, &source, file, index)?;
        }

        if let Some(ref mut pm) = self.progress_manager {
            pm.finish();
        }

        Ok(())
    }

    /// Decide the pattern source from the template options
    ///
    /// No template gives a seeded noise tile. A template directory is opened
    /// as a library and either the named template or a seeded random one is
    /// used.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the template path or name does not exist, or an
    /// image error if the template cannot be decoded
    pub fn resolve_pattern_source(&self) -> Result<PatternSource> {
        let Some(template) = &self.cli.template else {
            return Ok(PatternSource::Noise {
                seed: self.cli.seed,
            });
        };

        let path = if template.is_dir() {
            let library = TemplateLibrary::open(template)?;
            let chosen = match &self.cli.template_name {
                Some(name) => library.find(name)?,
                None => library.choose(self.cli.seed)?,
            };
            tracing::debug!(
                template = %chosen.display(),
                available = library.len(),
                "selected template from library"
            );
            chosen.to_path_buf()
        } else if template.is_file() {
            template.clone()
        } else {
            return Err(not_found("template", &template.display()));
        };

        load_template(&path).map(PatternSource::Template)
    }

    fn collect_files(&self) -> Result<Vec<PathBuf>> {
        let target = &self.cli.target;
        if target.is_file() {
            if is_image_file(target) {
                if self.should_process_file(target) {
                    Ok(vec![target.clone()])
                } else {
                    Ok(vec![])
                }
            } else {
                Err(invalid_parameter(
                    "target",
                    &target.display(),
                    &"must be an image file",
                ))
            }
        } else if target.is_dir() {
            let read_error = |e| StereogramError::FileSystem {
                path: target.clone(),
                operation: "read directory",
                source: e,
            };

            let mut files = Vec::new();
            for entry in std::fs::read_dir(target).map_err(read_error)? {
                let path = entry.map_err(read_error)?.path();
                if path.is_file()
                    && is_image_file(&path)
                    && !Self::is_generated_output(&path)
                    && self.should_process_file(&path)
                {
                    files.push(path);
                }
            }
            files.sort();
            Ok(files)
        } else {
            Err(not_found("depth map", &target.display()))
        }
    }

    fn should_process_file(&self, input_path: &Path) -> bool {
        if !self.cli.skip_existing() {
            return true;
        }

        let output_path = self.output_path(input_path);
        if output_path.exists() {
            tracing::info!(input = %input_path.display(), "skipping, output exists");
            false
        } else {
            true
        }
    }

    fn process_file(
        &mut self,
        generator: &StereogramGenerator,
        source: &PatternSource,
        input_path: &Path,
        index: usize,
    ) -> Result<()> {
        let start_time = Instant::now();
        let output_path = self.output_path(input_path);

        if let Some(ref mut pm) = self.progress_manager {
            pm.start_file(index, input_path);
        }
        let depth = load_depth_map(input_path)?;

        self.report_stage(index, Stage::Tile);
        let tile = generator.tile(source, depth.height())?;

        self.report_stage(index, Stage::Composite);
        let stereogram = generator.composite(&depth, &tile)?;

        self.report_stage(index, Stage::Export);
        export_png(&stereogram, &output_path)?;

        if let Some(ref mut pm) = self.progress_manager {
            pm.complete_file(index, start_time.elapsed());
        }

        tracing::debug!(
            input = %input_path.display(),
            output = %output_path.display(),
            elapsed_ms = start_time.elapsed().as_millis(),
            "wrote stereogram"
        );
        Ok(())
    }

    fn report_stage(&mut self, index: usize, stage: Stage) {
        if let Some(ref mut pm) = self.progress_manager {
            pm.update_stage(index, stage);
        }
    }

    /// Destination for the stereogram generated from `input_path`
    pub fn output_path(&self, input_path: &Path) -> PathBuf {
        if let Some(output) = &self.cli.output {
            return output.clone();
        }

        let stem = input_path.file_stem().unwrap_or_default();
        let output_name = format!(
            "{}{OUTPUT_SUFFIX}.{OUTPUT_EXTENSION}",
            stem.to_string_lossy()
        );

        if let Some(parent) = input_path.parent() {
            parent.join(output_name)
        } else {
            PathBuf::from(output_name)
        }
    }

    // Earlier runs leave their results next to the inputs
    fn is_generated_output(path: &Path) -> bool {
        path.file_stem()
            .is_some_and(|stem| stem.to_string_lossy().ends_with(OUTPUT_SUFFIX))
    }
}
