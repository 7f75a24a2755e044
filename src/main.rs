//! Notiview CLI - view schema-unknown SQLite files as notification lists

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use notiview::config::{self, NotiviewConfig};
use notiview::loader::{Database, Engine};
use notiview::remote::{DriveClient, RemoteSource};
use notiview::{filter, output, resolver};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "notiview")]
#[command(version = "0.1.0")]
#[command(about = "View schema-unknown SQLite files as notification lists")]
#[command(long_about = r#"
Notiview opens any SQLite file, figures out which table holds
notification-like data, and shows it as a uniform record list:

  notiview show backup.db
  notiview show backup.db --query "alice budget"
  notiview tables backup.db
  notiview fetch --token $DRIVE_TOKEN --out ./downloads
"#)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve a database file and list its notifications
    Show {
        /// Path to the SQLite file
        file: PathBuf,

        /// Free-text filter; every whitespace-separated term must match
        #[arg(short, long)]
        query: Option<String>,

        /// Maximum number of records to display
        #[arg(short, long)]
        limit: Option<usize>,

        /// Emit JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Show every table the way the resolver sees it
    Tables {
        /// Path to the SQLite file
        file: PathBuf,
    },

    /// Count notification rows without materializing them
    Count {
        /// Path to the SQLite file
        file: PathBuf,
    },

    /// List and download database files from the remote folder
    Fetch {
        /// OAuth bearer token (defaults to $DRIVE_TOKEN)
        #[arg(long)]
        token: Option<String>,

        /// Remote folder name (overrides config)
        #[arg(long)]
        folder: Option<String>,

        /// Directory to download into
        #[arg(short, long, default_value = ".")]
        out: PathBuf,

        /// Path to a config file
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Write a default config file
    Init {
        /// Overwrite an existing config
        #[arg(long)]
        force: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    match cli.command {
        Commands::Show { file, query, limit, json } => {
            let db = Database::open_file(&file)
                .with_context(|| format!("could not open {}", file.display()))?;

            let mut records = resolver::resolve(&db)?;

            if let Some(query) = &query {
                records = filter::filter(&records, query);
            }
            if let Some(limit) = limit {
                records.truncate(limit);
            }

            if json {
                println!("{}", serde_json::to_string_pretty(&records)?);
            } else if records.is_empty() {
                if query.is_some() {
                    println!("{}", output::empty_state("no notifications match the filter"));
                } else {
                    // The database opened fine; it just holds nothing we recognize
                    println!(
                        "{}",
                        output::empty_state("no recognizable notification data in this database")
                    );
                }
            } else {
                println!("{}", output::records_table(&records));
                println!("📋 {} notification(s)", records.len());
            }
        }

        Commands::Tables { file } => {
            let db = Database::open_file(&file)
                .with_context(|| format!("could not open {}", file.display()))?;

            println!("🗄️  {} (SQLite {})", file.display(), Engine::global().version());
            let reports = resolver::inspect(&db)?;
            if reports.is_empty() {
                println!("{}", output::empty_state("no tables"));
            } else {
                println!("{}", output::tables_report(&reports));
            }
        }

        Commands::Count { file } => {
            let db = Database::open_file(&file)
                .with_context(|| format!("could not open {}", file.display()))?;
            println!("{}", resolver::count(&db));
        }

        Commands::Fetch { token, folder, out, config: config_path } => {
            let token = token
                .or_else(|| std::env::var("DRIVE_TOKEN").ok())
                .context("no token given (pass --token or set DRIVE_TOKEN)")?;

            let config = config::load_config(config_path.as_deref())?.unwrap_or_default();
            let folder_name = folder.unwrap_or_else(|| config.folder_name().to_string());
            let extension = config.extension_filter().to_string();

            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(async {
                let client = DriveClient::new(token);

                let folder_id = client
                    .find_folder(&folder_name)
                    .await?
                    .with_context(|| format!("remote folder '{}' not found", folder_name))?;

                let files = client.list_files(&folder_id, &extension).await?;
                if files.is_empty() {
                    println!("{}", output::empty_state("no database files in the remote folder"));
                    return Ok(());
                }

                std::fs::create_dir_all(&out)?;
                println!("☁️  Downloading {} file(s) from '{}'", files.len(), folder_name);

                for file in &files {
                    let bytes = client.download(&file.id).await?;
                    // Remote names are untrusted; keep only the final component
                    let name = std::path::Path::new(&file.name)
                        .file_name()
                        .map(|n| n.to_string_lossy().into_owned())
                        .unwrap_or_else(|| file.id.clone());
                    let target = out.join(name);
                    std::fs::write(&target, &bytes)?;
                    println!("  ⬇️  {} ({} bytes)", target.display(), bytes.len());
                }

                println!("✅ Done");
                anyhow::Ok(())
            })?;
        }

        Commands::Init { force } => {
            let path = config::default_config_path();
            config::write_config(&path, &NotiviewConfig::default(), force)?;
            println!("✅ Wrote {}", path.display());
        }
    }

    Ok(())
}
