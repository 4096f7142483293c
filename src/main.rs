//! serverdb CLI - manage the local server profile store

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use serverdb::config::{self, ServerDbConfig};
use serverdb::storage::{ProfileStore, StoreContext, INVALID_ROW_ID};
use serverdb::ui::{self, Icons};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "serverdb")]
#[command(version)]
#[command(about = "Manage locally stored server connection profiles")]
#[command(long_about = r#"
serverdb keeps server connection profiles (host, port, username, password)
in a local SQLite file named `data` inside the data directory.

Example usage:
  serverdb add --host example.com --port 22 --username alice --password secret
  serverdb list
  serverdb update --id 1 --host example.com --port 2222 --username alice
  serverdb remove --id 1
"#)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to the config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Data directory (overrides the config file)
    #[arg(short, long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a config file and create the database
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },

    /// Add a server profile
    Add {
        #[arg(long)]
        host: String,

        #[arg(long, default_value = "22", allow_negative_numbers = true)]
        port: i32,

        #[arg(short, long)]
        username: String,

        #[arg(short, long, default_value = "")]
        password: String,
    },

    /// List all server profiles
    List {
        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,

        /// Print passwords instead of masking them
        #[arg(long)]
        show_passwords: bool,
    },

    /// Show one server profile
    Show {
        #[arg(long)]
        id: i64,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,

        /// Print the password instead of masking it
        #[arg(long)]
        show_password: bool,
    },

    /// Overwrite a server profile
    Update {
        #[arg(long)]
        id: i64,

        #[arg(long)]
        host: String,

        #[arg(long, default_value = "22", allow_negative_numbers = true)]
        port: i32,

        #[arg(short, long)]
        username: String,

        #[arg(short, long, default_value = "")]
        password: String,
    },

    /// Remove a server profile
    Remove {
        #[arg(long)]
        id: i64,
    },
}

fn open_store(ctx: StoreContext) -> anyhow::Result<ProfileStore> {
    let mut store = ProfileStore::new(ctx);
    store.open()?;
    Ok(store)
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
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    run(cli)
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config_path = cli.config.clone().unwrap_or_else(config::default_config_path);
    let loaded = config::load_config(Some(config_path.as_path()))?.unwrap_or_default();
    let ctx = loaded.store_context(cli.data_dir.as_deref());
    tracing::debug!("Using storage context {:?}", ctx);

    match cli.command {
        Commands::Init { force } => {
            let data_dir = match &ctx {
                StoreContext::Directory(dir) => dir.clone(),
                StoreContext::InMemory => config::default_data_dir(),
            };
            let new_config = ServerDbConfig {
                data_dir: Some(data_dir.to_string_lossy().to_string()),
            };
            config::write_config(&config_path, &new_config, force)?;

            let mut store = open_store(ctx)?;
            store.close()?;

            ui::success(&format!("Wrote config to {}", config_path.display()));
            ui::field("database", &data_dir.join(serverdb::storage::schema::DATABASE_NAME).display().to_string());
        }

        Commands::Add { host, port, username, password } => {
            let store = open_store(ctx)?;
            let id = store.create_server(&host, port, &username, &password);
            if id == INVALID_ROW_ID {
                anyhow::bail!("Failed to add server {}", host);
            }
            ui::success(&format!("Added server #{}", id));
        }

        Commands::List { format, show_passwords } => {
            let store = open_store(ctx)?;
            let servers = store.fetch_all_servers()?;

            if format == "json" {
                println!("{}", serde_json::to_string_pretty(&servers)?);
            } else if servers.is_empty() {
                println!("{} No servers stored.", Icons::EMPTY);
            } else {
                ui::header(&format!("{} server(s)", store.count_servers()?));
                println!("{}", ui::servers_table(&servers, show_passwords));
            }
        }

        Commands::Show { id, format, show_password } => {
            let store = open_store(ctx)?;
            let Some(server) = store.fetch_server(id)? else {
                anyhow::bail!("No server with id {}", id);
            };

            if format == "json" {
                println!("{}", serde_json::to_string_pretty(&server)?);
            } else {
                ui::server_details(&server, show_password);
            }
        }

        Commands::Update { id, host, port, username, password } => {
            let store = open_store(ctx)?;
            if !store.update_server(id, &host, port, &username, &password)? {
                anyhow::bail!("No server with id {}", id);
            }
            ui::success(&format!("Updated server #{}", id));
        }

        Commands::Remove { id } => {
            let store = open_store(ctx)?;
            if !store.delete_server(id)? {
                anyhow::bail!("No server with id {}", id);
            }
            println!("{} Removed server #{}", Icons::DEL, id);
        }
    }

    Ok(())
}
