//! discshelf - identify and organize PS2 disc images.
//!
//! Usage:
//!   discshelf identify FILES...          Find the game ID inside each image
//!   discshelf move SOURCE DEST           Move an image, across volumes if needed
//!   discshelf rename FILE --id --name    Rename an image to `ID.Title.ext`
//!   discshelf fix FILES...               Identify and rename in one pass
//!   discshelf --help                     Show help

use std::io::Write;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Context, Result, bail};
use humansize::{BINARY, format_size};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use discshelf_core::{
    MoveConfig, MoveResponse, ProgressPayload, ScanConfig, ScanOutcome, ScanResponse,
    TransferOutcome, TransferProgress,
};
use discshelf_ops::{MoveEvent, rename_game_file, start_move};
use discshelf_scan::{IdentifierScanner, scan_batch};

#[derive(Parser)]
#[command(
    name = "discshelf",
    version,
    about = "Identify and organize PS2 disc images",
    long_about = "discshelf reads the game ID embedded in PS2 disc images, looks up \
                  the title in an offline catalog, and moves or renames images to \
                  match the Open PS2 Loader layout."
)]
struct Cli {
    /// Catalog file to read titles from (may be repeated; tried in order)
    #[arg(long, global = true)]
    catalog: Vec<PathBuf>,

    /// Print machine-readable JSON responses
    #[arg(long, global = true)]
    json: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Find the game ID inside each image
    Identify {
        /// Image files to scan
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Move an image to a directory or file path
    Move {
        /// Image to move
        source: PathBuf,

        /// Destination directory or file path
        destination: PathBuf,

        /// Copy buffer size in bytes when moving across volumes
        #[arg(long, default_value = "1048576")]
        chunk_size: usize,
    },

    /// Rename an image in place to `GAME_ID.Title.ext`
    Rename {
        /// Image to rename
        file: PathBuf,

        /// Game ID, e.g. SLUS_123.45
        #[arg(long)]
        id: String,

        /// Game title
        #[arg(long)]
        name: String,
    },

    /// Identify images and rename those with a known title
    Fix {
        /// Image files to fix
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Show what would be renamed without touching anything
        #[arg(short = 'n', long)]
        dry_run: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Identify { files } => {
            let scanner = build_scanner(&cli.catalog)?;
            run_identify(&scanner, &files, cli.json)?;
        }
        Command::Move {
            source,
            destination,
            chunk_size,
        } => {
            let config = MoveConfig::builder()
                .chunk_size(chunk_size)
                .build()
                .context("Invalid move options")?;
            run_move(source, destination, config, cli.json).await?;
        }
        Command::Rename { file, id, name } => {
            run_rename(&file, &id, &name, cli.json)?;
        }
        Command::Fix { files, dry_run } => {
            let scanner = build_scanner(&cli.catalog)?;
            run_fix(&scanner, &files, dry_run)?;
        }
    }

    Ok(())
}

/// Log to stderr, filtered by `DISCSHELF_LOG` or the verbosity flag.
fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_env("DISCSHELF_LOG")
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();
}

fn build_scanner(catalog: &[PathBuf]) -> Result<IdentifierScanner> {
    let config = if catalog.is_empty() {
        ScanConfig::default()
    } else {
        ScanConfig::with_catalog_candidates(catalog.to_vec())
    };
    debug!(candidates = ?config.catalog_candidates, "catalog search path");
    IdentifierScanner::new(config).context("Invalid scan configuration")
}

/// Scan images and print one line (or JSON object) per file.
fn run_identify(scanner: &IdentifierScanner, files: &[PathBuf], json: bool) -> Result<()> {
    let results = scan_batch(scanner, files);

    if json {
        let responses: Vec<ScanResponse> = results
            .into_iter()
            .map(|entry| ScanResponse::from(entry.result))
            .collect();
        println!("{}", serde_json::to_string_pretty(&responses)?);
        return Ok(());
    }

    for entry in results {
        let path = entry.path.display();
        match entry.result {
            Ok(ScanOutcome::Identified(m)) => match m.title() {
                Some(title) => println!("{path}: {} ({title})", m.game_id()),
                None => println!("{path}: {} (title unknown)", m.game_id()),
            },
            Ok(ScanOutcome::Unidentified) => println!("{path}: could not identify"),
            Err(e) => eprintln!("{path}: error: {e}"),
        }
    }

    Ok(())
}

/// Move one image, drawing progress on stderr.
async fn run_move(
    source: PathBuf,
    destination: PathBuf,
    config: MoveConfig,
    json: bool,
) -> Result<()> {
    let mut rx = start_move(source, destination, config);
    let mut outcome = None;

    while let Some(event) = rx.recv().await {
        match event {
            MoveEvent::Progress(progress) => report_progress(&progress, json)?,
            MoveEvent::Complete(done) => outcome = Some(done),
        }
    }

    let Some(outcome) = outcome else {
        bail!("Move ended without reporting an outcome");
    };

    if json {
        println!("{}", serde_json::to_string(&MoveResponse::from(&outcome))?);
        return Ok(());
    }

    match outcome {
        TransferOutcome::Renamed { final_path } => println!("Moved to {}", final_path.display()),
        TransferOutcome::Copied { final_path } => {
            eprintln!();
            println!("Copied to {}", final_path.display());
        }
        TransferOutcome::Failed { reason } => {
            eprintln!();
            return Err(reason).context("Move failed");
        }
    }

    Ok(())
}

fn report_progress(progress: &TransferProgress, json: bool) -> Result<()> {
    let mut stderr = std::io::stderr().lock();
    if json {
        writeln!(stderr, "{}", serde_json::to_string(&ProgressPayload::from(progress))?)?;
    } else {
        write!(
            stderr,
            "\r{:>5.1}%  {} / {}  {:.1}s",
            progress.percent_rounded(),
            format_size(progress.copied_bytes, BINARY),
            format_size(progress.total_bytes, BINARY),
            progress.elapsed_rounded(),
        )?;
    }
    stderr.flush()?;
    Ok(())
}

fn run_rename(file: &Path, id: &str, name: &str, json: bool) -> Result<()> {
    let result = rename_game_file(file, id, name);

    if json {
        let response = match &result {
            Ok(path) => MoveResponse::moved(path),
            Err(e) => MoveResponse::failed(e.to_string()),
        };
        println!("{}", serde_json::to_string(&response)?);
        return Ok(());
    }

    let new_path = result.context("Rename failed")?;
    println!("Renamed to {}", new_path.display());
    Ok(())
}

/// Identify each image and rename the ones the catalog knows.
fn run_fix(scanner: &IdentifierScanner, files: &[PathBuf], dry_run: bool) -> Result<()> {
    let mut renamed = 0usize;
    let mut skipped = 0usize;

    for entry in scan_batch(scanner, files) {
        let path = entry.path.display();
        let m = match entry.result {
            Ok(ScanOutcome::Identified(m)) => m,
            Ok(ScanOutcome::Unidentified) => {
                println!("skip {path}: could not identify");
                skipped += 1;
                continue;
            }
            Err(e) => {
                eprintln!("skip {path}: {e}");
                skipped += 1;
                continue;
            }
        };

        let Some(title) = m.title() else {
            println!("skip {path}: {} not in catalog", m.game_id());
            skipped += 1;
            continue;
        };

        if dry_run {
            let name = discshelf_ops::game_file_name(&entry.path, m.game_id(), title);
            println!("would rename {path} -> {name}");
            continue;
        }

        match rename_game_file(&entry.path, m.game_id(), title) {
            Ok(new_path) => {
                println!("{path} -> {}", new_path.display());
                renamed += 1;
            }
            Err(e) => {
                eprintln!("skip {path}: {e}");
                skipped += 1;
            }
        }
    }

    if !dry_run {
        println!("{renamed} renamed, {skipped} skipped");
    }
    Ok(())
}
