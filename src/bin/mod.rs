use std::{io, path::PathBuf};

use clap::{Parser, Subcommand};
use syncdog::{folder::FolderState, store::HttpStore};
use tracing::level_filters::LevelFilter;

#[derive(Debug, Clone, Parser)]
struct Args {
    #[command(subcommand)]
    command: Commands,
    #[arg(long, default_value_t = false)]
    verbose: bool,
}

#[derive(Debug, Clone, Subcommand)]
enum Commands {
    /// Mirror every file of a local folder into the document database.
    #[command(name = "sync_folder_to_db")]
    SyncFolderToDb {
        folder_path: PathBuf,
        server_url: String,
        database_name: String,
    },
}

#[tokio::main]
async fn main() -> syncdog::Result<()> {
    let args = Args::parse();

    let log_level = if args.verbose {
        LevelFilter::TRACE
    } else {
        LevelFilter::INFO
    };

    tracing_subscriber::fmt().with_max_level(log_level).init();

    match args.command {
        Commands::SyncFolderToDb {
            folder_path,
            server_url,
            database_name,
        } => {
            let folder_path = folder_path
                .to_str()
                .ok_or_else(|| {
                    io::Error::new(io::ErrorKind::InvalidInput, "folder path is not valid UTF-8")
                })?
                .to_owned();

            let store = HttpStore::new(&server_url, &database_name);

            let mut state = FolderState::load_or_default(&store, &folder_path).await?;
            state.sync(&store).await?;
        }
    }

    Ok(())
}
