//! memoir CLI — import journaling exports, export period digests.
//!
//! # Responsibility
//! - Wire filesystem paths and the database connection into core services.
//! - Report errors on stderr and exit non-zero on any failure.

use clap::{Parser, Subcommand};
use memoir_core::{
    default_log_level, init_logging, open_db, ExportPeriod, JournalService, SqliteMemoryRepository,
};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(
    name = "memoir",
    about = "Normalize journaling exports into a local record store and flatten them back out"
)]
struct Cli {
    /// SQLite database file (default: ~/.memoir/memoir.db).
    #[arg(long, global = true)]
    db: Option<PathBuf>,
    /// Directory for rolling log files; logging is off when omitted.
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Import a Daylio backup archive (.daylio).
    ImportDaylio {
        /// Path to the backup archive.
        archive: PathBuf,
    },
    /// Import markdown notes from an Obsidian vault directory.
    ImportNotes {
        /// Path to the vault root.
        vault: PathBuf,
    },
    /// Export all stored records as per-period text files.
    Export {
        /// Destination directory, created if absent.
        dest: PathBuf,
        /// Grouping period for output files.
        #[arg(long, default_value = "month")]
        period: ExportPeriod,
    },
}

fn default_db_path() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".into());
    PathBuf::from(home).join(".memoir").join("memoir.db")
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if let Some(log_dir) = &cli.log_dir {
        init_logging(default_log_level(), &log_dir.to_string_lossy())?;
    }

    let db_path = cli.db.unwrap_or_else(default_db_path);
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let conn = open_db(&db_path)?;
    let repo = SqliteMemoryRepository::try_new(&conn)?;
    let service = JournalService::new(repo);

    match cli.command {
        Command::ImportDaylio { archive } => {
            let count = service.import_daylio(&archive)?;
            println!("imported {count} day records from {}", archive.display());
        }
        Command::ImportNotes { vault } => {
            let count = service.import_obsidian(&vault)?;
            println!("imported {count} notes from {}", vault.display());
        }
        Command::Export { dest, period } => {
            std::fs::create_dir_all(&dest)?;
            service.export(&dest, period)?;
            println!("exported records to {}", dest.display());
        }
    }

    Ok(())
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("memoir: {err}");
            ExitCode::from(1)
        }
    }
}
