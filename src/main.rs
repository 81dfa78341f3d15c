use clap::{Parser, Subcommand};
use lensbake::adjust::{AdjustmentState, Adjustments, CropState};
use lensbake::export::{EditRecord, edited_stems};
use lensbake::filters::FilterCatalog;
use lensbake::imaging::{BatchSource, RustCodec, save_batch};
use lensbake::output::{self, BakeOutcome};
use lensbake::session::EditSnapshot;
use lensbake::{config, pipeline};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Editing state shared by `preview` and `bake`.
#[derive(clap::Args, Clone)]
struct EditArgs {
    /// Base filter from the catalog (e.g. "vintage")
    #[arg(long)]
    filter: Option<String>,

    /// Brightness, -50..=50
    #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
    brightness: i32,

    /// Contrast, -50..=50
    #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
    contrast: i32,

    /// Saturation, -50..=50
    #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
    saturation: i32,

    /// Temperature, -50..=50 (warm is positive)
    #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
    temperature: i32,

    /// Sharpness, -50..=50 (only positive values sharpen the export)
    #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
    sharpness: i32,

    /// Rotation in degrees, clockwise
    #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
    rotation: i32,

    /// Mirror horizontally
    #[arg(long)]
    flip: bool,

    /// Preview zoom, 0.5..=5.0
    #[arg(long, default_value_t = 1.0)]
    zoom: f32,

    /// Horizontal pan in source pixels (only while zoomed in)
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    pan_x: f32,

    /// Vertical pan in source pixels (only while zoomed in)
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    pan_y: f32,

    /// Load the edit from a saved edit-history JSON record instead
    #[arg(long, conflicts_with_all = ["filter", "brightness", "contrast", "saturation", "temperature", "sharpness", "rotation", "flip"])]
    record: Option<PathBuf>,
}

impl EditArgs {
    fn snapshot(&self) -> Result<EditSnapshot, Box<dyn std::error::Error>> {
        let (adjustments, mut crop) = match &self.record {
            Some(path) => {
                let record: EditRecord = serde_json::from_str(&std::fs::read_to_string(path)?)?;
                record.to_state()?
            }
            None => {
                let values = Adjustments {
                    brightness: self.brightness,
                    contrast: self.contrast,
                    saturation: self.saturation,
                    temperature: self.temperature,
                    sharpness: self.sharpness,
                };
                (
                    AdjustmentState::try_from_record(self.filter.clone(), values)?,
                    CropState::new(self.rotation, self.flip),
                )
            }
        };
        crop.set_zoom(self.zoom)?;
        crop.set_pan(self.pan_x, self.pan_y)?;
        Ok(EditSnapshot { adjustments, crop })
    }
}

#[derive(Parser)]
#[command(name = "lensbake")]
#[command(about = "Preview and bake photo edits")]
#[command(long_about = "\
Preview and bake photo edits

An edit is a base filter from the catalog, five adjustment sliders
(brightness, contrast, saturation, temperature, sharpness; each -50..=50),
a clockwise rotation and an optional horizontal flip.

  preview  prints the CSS filter/transform the live editor would show
  bake     renders the edit into full-resolution files

Baked output for photo.jpg:

  <output-dir>/photo-edited.jpg    # rotated canvas, colour pass, sharpen
  <output-dir>/photo-edited.json   # edit record + sha256 of the image

Run 'lensbake gen-config' to generate a documented lensbake.toml.")]
#[command(version)]
struct Cli {
    /// Config file (defaults to ./lensbake.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Filter catalog JSON (overrides the config)
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    /// Log bake passes to stderr (repeat for more detail)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show the live-preview descriptors for an edit
    Preview {
        #[command(flatten)]
        edit: EditArgs,

        /// Print the descriptor as JSON
        #[arg(long)]
        json: bool,
    },
    /// Render an edit into full-resolution images
    Bake {
        /// Photos to bake
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Where baked files are written
        #[arg(long, default_value = ".")]
        output_dir: PathBuf,

        /// Crop to the zoomed/panned preview window
        #[arg(long)]
        crop_to_viewport: bool,

        #[command(flatten)]
        edit: EditArgs,
    },
    /// List the filter catalog
    Filters,
    /// Print a stock lensbake.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Preview { edit, json } => {
            let (_, catalog) = load_context(&cli.config, &cli.catalog)?;
            let snapshot = edit.snapshot()?;
            let preview =
                pipeline::build_preview(&snapshot.adjustments, &snapshot.crop, &catalog);
            if json {
                println!("{}", serde_json::to_string_pretty(&preview)?);
            } else {
                output::print_preview(&preview);
            }
        }
        Command::Bake {
            inputs,
            output_dir,
            crop_to_viewport,
            edit,
        } => {
            let (editor_config, catalog) = load_context(&cli.config, &cli.catalog)?;
            init_thread_pool(&editor_config.processing);
            let snapshot = edit.snapshot()?;
            let mut params = editor_config.export.params();
            params.bake.crop_to_viewport |= crop_to_viewport;

            std::fs::create_dir_all(&output_dir)?;

            let mut sources = Vec::new();
            let mut unreadable = Vec::new();
            for input in &inputs {
                match std::fs::read(input) {
                    Ok(bytes) => sources.push(BatchSource {
                        origin: input.to_string_lossy().into_owned(),
                        bytes,
                    }),
                    Err(e) => unreadable.push((input.as_path(), e.to_string())),
                }
            }

            let results = save_batch(&RustCodec::new(), &sources, &snapshot, &catalog, &params);
            let origins: Vec<&str> = sources.iter().map(|s| s.origin.as_str()).collect();
            let stems = edited_stems(&origins);

            let mut written = Vec::with_capacity(results.len());
            for ((source, stem), result) in sources.iter().zip(&stems).zip(results) {
                let source_path = Path::new(&source.origin);
                let written_result = result.map_err(|e| e.to_string()).and_then(|saved| {
                    write_outputs(&output_dir, stem, &saved)
                        .map(|path| (path, saved))
                        .map_err(|e| e.to_string())
                });
                written.push((source_path, written_result));
            }

            let mut outcomes: Vec<BakeOutcome> = written
                .iter()
                .map(|(source, result)| match result {
                    Ok((output, saved)) => BakeOutcome::Saved {
                        source,
                        output: output.as_path(),
                        saved,
                    },
                    Err(error) => BakeOutcome::Failed {
                        source,
                        error: error.clone(),
                    },
                })
                .collect();
            outcomes.extend(unreadable.into_iter().map(|(source, error)| {
                BakeOutcome::Failed { source, error }
            }));
            output::print_bake_summary(&outcomes);

            let failed = outcomes
                .iter()
                .filter(|o| matches!(o, BakeOutcome::Failed { .. }))
                .count();
            if failed > 0 {
                return Err(format!("{failed} of {} photos failed", inputs.len()).into());
            }
        }
        Command::Filters => {
            let (_, catalog) = load_context(&cli.config, &cli.catalog)?;
            output::print_filters(&catalog);
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Resolve the config, then the catalog (`--catalog` wins over the config).
fn load_context(
    config_path: &Option<PathBuf>,
    catalog_path: &Option<PathBuf>,
) -> Result<(config::EditorConfig, FilterCatalog), Box<dyn std::error::Error>> {
    let editor_config = config::load_config(config_path.as_deref())?;
    let catalog = match catalog_path {
        Some(path) => FilterCatalog::load(path)?,
        None => editor_config.catalog.load()?,
    };
    Ok((editor_config, catalog))
}

/// Write `<stem>.<ext>` and its JSON record; returns the image path.
fn write_outputs(
    output_dir: &Path,
    stem: &str,
    saved: &lensbake::export::SavedEdit,
) -> std::io::Result<PathBuf> {
    let image_path = output_dir.join(format!("{stem}.{}", saved.format.extension()));
    let record_path = output_dir.join(format!("{stem}.json"));

    std::fs::write(&image_path, &saved.bytes)?;
    let json = serde_json::to_string_pretty(saved).map_err(std::io::Error::other)?;
    std::fs::write(&record_path, json)?;
    Ok(image_path)
}

/// Install the stderr log subscriber. `RUST_LOG` wins over `-v`.
fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "lensbake=info",
        _ => "lensbake=debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Initialize the rayon thread pool based on processing config.
///
/// Caps at the number of available CPU cores; users can constrain down, not up.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}
