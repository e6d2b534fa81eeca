use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};

use floormark::annotation::{AnnotationBatch, Marker, Region};
use floormark::config::{Config, FooterPolicy};
use floormark::export::{self, ExportArtifact};
use floormark::session::{
    EditorContext, EditorSession, JsonFileStore, RecordQuery, RecordStore, SaveError, SaveOutcome,
    SessionObserver, SourceImage,
};

#[derive(Parser, Debug)]
#[command(name = "floormark")]
#[command(version, about = "Floor-plan annotation and compositing engine")]
struct Cli {
    /// Load configuration from this file instead of ~/.config/floormark/config.toml
    #[arg(long, short = 'c', value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compose an annotated export of a floor plan and record its markers
    Export {
        /// Source floor-plan image (PNG, JPEG, WebP or BMP)
        #[arg(long, short = 'i', value_name = "FILE")]
        image: PathBuf,

        /// Annotation batch (JSON with `markers` and `regions`)
        #[arg(long, short = 'a', value_name = "FILE")]
        annotations: Option<PathBuf>,

        /// Write the PNG to this path instead of the export directory
        #[arg(long, short = 'o', value_name = "FILE")]
        output: Option<PathBuf>,

        /// Directory for the suggested filename (default: ~/Pictures/Floormark)
        #[arg(long, value_name = "DIR", conflicts_with = "output")]
        out_dir: Option<PathBuf>,

        /// Append marker records to this JSON file
        #[arg(long, value_name = "FILE")]
        records: Option<PathBuf>,

        #[arg(long, default_value = "")]
        company: String,

        #[arg(long, default_value = "")]
        branch: String,

        /// Operator name shown in the footer and stored with each record
        #[arg(long, default_value = "")]
        recorder: String,

        /// Start from the markers already recorded for this company branch
        #[arg(long, action = ArgAction::SetTrue, requires = "records")]
        resume: bool,

        /// Never draw the timestamp footer
        #[arg(long, action = ArgAction::SetTrue)]
        no_footer: bool,
    },

    /// List stored marker records
    History {
        #[arg(long, value_name = "FILE")]
        records: PathBuf,

        #[arg(long)]
        company: Option<String>,

        #[arg(long)]
        branch: Option<String>,
    },
}

/// Logs session notifications for the command line.
#[derive(Default)]
struct LogObserver {
    export: Option<(ExportArtifact, String)>,
}

impl SessionObserver for LogObserver {
    fn on_export_ready(&mut self, artifact: &ExportArtifact, suggested_filename: &str) {
        self.export = Some((artifact.clone(), suggested_filename.to_string()));
    }

    fn on_save_failed(&mut self, error: &SaveError) {
        log::error!("{error}");
    }

    fn on_marker_batch_changed(&mut self, markers: &[Marker]) {
        let complete = markers.iter().filter(|m| m.is_complete()).count();
        log::info!("{} marker(s), {} complete", markers.len(), complete);
    }

    fn on_regions_changed(&mut self, regions: &[Region]) {
        log::info!("{} region(s)", regions.len());
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    match cli.command {
        Command::Export {
            image,
            annotations,
            output,
            out_dir,
            records,
            company,
            branch,
            recorder,
            resume,
            no_footer,
        } => {
            if no_footer {
                config.export.footer = FooterPolicy::Never;
            }
            let context = EditorContext::new(company, branch, recorder);
            let (artifact, suggested_filename) = run_export(
                &config,
                context,
                &image,
                annotations.as_deref(),
                records.as_deref(),
                resume,
            )
            .await?;

            let path = match output {
                Some(path) => write_output(&path, &artifact.png)?,
                None => {
                    let directory = out_dir
                        .map(|dir| export::expand_tilde(&dir.to_string_lossy()))
                        .unwrap_or_else(export::default_export_directory);
                    export::save_artifact(&artifact.png, &directory, &suggested_filename)?
                }
            };
            println!(
                "{} ({}x{})",
                path.display(),
                artifact.width,
                artifact.height
            );
        }
        Command::History {
            records,
            company,
            branch,
        } => {
            let store = JsonFileStore::new(records);
            let found = store
                .fetch(&RecordQuery { company, branch })
                .await
                .with_context(|| format!("Failed to read {}", store.path().display()))?;
            if found.is_empty() {
                println!("No records found");
            }
            for record in found {
                println!(
                    "{}  {}/{}  #{} {} [{}] {} at ({:.1}%, {:.1}%) by {}",
                    record.saved_at,
                    record.company,
                    record.branch,
                    record.label,
                    record.serial,
                    record.kind,
                    record.name,
                    record.position.x,
                    record.position.y,
                    record.recorder
                );
            }
        }
    }

    Ok(())
}

async fn run_export(
    config: &Config,
    context: EditorContext,
    image: &Path,
    annotations: Option<&Path>,
    records: Option<&Path>,
    resume: bool,
) -> Result<(ExportArtifact, String)> {
    let source = SourceImage::from_path(image)
        .with_context(|| format!("Failed to load image {}", image.display()))?;
    let surface = source.size();
    let mut session = EditorSession::open(source, context, config, surface);
    let mut observer = LogObserver::default();

    let store = records.map(JsonFileStore::new);
    if resume {
        if let Some(store) = &store {
            let restored = session.resume_from(store).await?;
            log::info!("Resumed {restored} marker(s) from {}", store.path().display());
        }
    }

    if let Some(path) = annotations {
        let data = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read annotations from {}", path.display()))?;
        let batch: AnnotationBatch = serde_json::from_str(&data)
            .with_context(|| format!("Failed to parse annotations from {}", path.display()))?;
        session.interaction_mut().load_batch(batch);
    }
    session.dispatch_events(&mut observer);

    let job = session.begin_save()?;
    let result = match &store {
        Some(store) => job.run(store).await,
        None => match job.export().await {
            Ok(artifact) => Ok(SaveOutcome {
                artifact,
                suggested_filename: job.suggested_filename().to_string(),
                records_saved: 0,
                persisted: Vec::new(),
            }),
            Err(source) => Err(SaveError::Export {
                source,
                persisted: Vec::new(),
            }),
        },
    };
    session.finish_save(&result, &mut observer);

    let outcome = result?;
    if store.is_some() {
        log::info!("Recorded {} marker(s)", outcome.records_saved);
    }
    session.close();

    observer
        .export
        .context("Save finished without an export")
}

fn write_output(path: &Path, png: &[u8]) -> Result<PathBuf> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
    }
    std::fs::write(path, png).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(path.to_path_buf())
}
