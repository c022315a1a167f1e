use clap::{Parser, Subcommand};
use edita::binding::{FieldEdit, FieldPath};
use edita::config::{self, EditorConfig};
use edita::document::Document;
use edita::output;
use edita::session::{EditSession, SessionError};
use edita::store::ContentStore;
use std::path::PathBuf;
use std::sync::mpsc;

#[derive(Parser)]
#[command(name = "edita")]
#[command(about = "Local content editor for the site content document")]
#[command(long_about = "\
Local content editor for the site content document

The site's editable copy and media references live in a single JSON
document inside the storage directory. Commands load it (falling back to
the built-in defaults), apply edits through an admin session, and publish
the result back to the store.

Field paths address content as section.field:

  hero.title1        hero.title2      hero.description   hero.mediaUrl
  showcase.mainImage showcase.title   showcase.subtitle  showcase.description
  sobre.missao

Media fields (hero.mediaUrl, showcase.mainImage) accept local image or
video files via 'ingest'; the file is inlined as a data URL, capped at the
configured size limit.

Run 'edita gen-config' to generate a documented edita.toml.")]
#[command(version)]
struct Cli {
    /// Storage directory for the persisted document (overrides config)
    #[arg(long, global = true)]
    store_dir: Option<PathBuf>,

    /// Path to an edita.toml config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the current content document (stored, or defaults)
    Show,
    /// Edit a single field and publish: edita set hero.title1 "Nova Era"
    Set {
        /// Field path like hero.title1
        path: String,
        /// New value, taken verbatim
        value: String,
    },
    /// Replace a media field with an inlined local file and publish
    Ingest {
        /// Media field path like hero.mediaUrl
        path: String,
        /// Local image or video file
        file: PathBuf,
    },
    /// Apply a JSON batch of {section, field, value} edits and publish once
    Apply {
        /// JSON file holding an array of edits
        edits: PathBuf,
    },
    /// Overwrite the stored document with the built-in defaults
    Reset,
    /// Print a documented stock edita.toml with all options
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let cfg = match &cli.config {
        Some(path) => config::load(path)?,
        None => EditorConfig::default(),
    };
    let store_dir = cli
        .store_dir
        .clone()
        .unwrap_or_else(|| PathBuf::from(&cfg.storage_dir));
    let store = ContentStore::new(store_dir);

    match cli.command {
        Command::Show => {
            for line in output::format_document(&store.load_or_default()) {
                println!("{line}");
            }
        }
        Command::Set { path, value } => {
            let target: FieldPath = path.parse()?;
            run_session(&store, &cfg, move |session| {
                let edit = FieldEdit::new(target.section, target.field, value);
                session.commit(&edit).map(|_| ())
            })?;
        }
        Command::Ingest { path, file } => {
            let target: FieldPath = path.parse()?;
            run_session(&store, &cfg, move |session| {
                session.ingest_media(&target.section, &target.field, &file)
            })?;
        }
        Command::Apply { edits } => {
            let raw = std::fs::read_to_string(&edits)?;
            let batch: Vec<FieldEdit> = serde_json::from_str(&raw)?;
            run_session(&store, &cfg, move |session| {
                for edit in &batch {
                    session.commit(edit)?;
                }
                Ok(())
            })?;
        }
        Command::Reset => {
            let receipt = store.save(&Document::default_site())?;
            println!(
                "Store reset: {} ({})",
                output::human_size(receipt.bytes as u64),
                if receipt.written {
                    "written"
                } else {
                    "already at defaults"
                }
            );
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Load the document, run one admin editing session over it, and publish.
///
/// Session feedback streams to stdout from a printer thread while the
/// edits and the save run, so pending/settled saves read in order.
fn run_session(
    store: &ContentStore,
    cfg: &EditorConfig,
    edits: impl FnOnce(&mut EditSession) -> Result<(), SessionError>,
) -> Result<(), Box<dyn std::error::Error>> {
    let (tx, rx) = mpsc::channel();
    let printer = std::thread::spawn(move || {
        for event in rx {
            println!("{}", output::format_session_event(&event));
        }
    });

    let mut session = EditSession::new(store.load_or_default())
        .events(tx)
        .max_media_bytes(cfg.media.max_inline_bytes);
    session.set_admin(true);

    let result = edits(&mut session).and_then(|()| session.save(store).map(|_| ()));

    drop(session); // closes the channel so the printer drains and exits
    printer.join().unwrap();

    result?;
    Ok(())
}
