//! talenta-server binary.
//!
//! Reads `config.toml` (or the path given with `--config`) overlaid by
//! `TALENTA_*` environment variables, opens the SQLite store and runs one of
//! the subcommands below.
//!
//! # Bootstrap
//!
//! ```text
//! talenta-server hash-password          # paste into admin_password_hash
//! talenta-server seed                   # companies + superadmin
//! talenta-server serve
//! ```

use std::{
  io::Write as _,
  path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use talenta_server::{ServerConfig, app, import_file, read_password, seed, write_template_file};
use talenta_store_sqlite::SqliteStore;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Talenta HR portal server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand)]
enum Command {
  /// Serve the JSON API under `/api`.
  Serve,
  /// Add the group's companies and the configured superadmin if missing.
  Seed,
  /// Print the argon2 hash for a password entered on stdin and exit.
  HashPassword,
  /// Import an employee workbook with unrestricted scope.
  Import {
    /// The `.xlsx` file to import.
    file: PathBuf,
  },
  /// Write the blank upload template.
  Template {
    /// Destination `.xlsx` path.
    #[arg(default_value = "template_data_karyawan.xlsx")]
    out: PathBuf,
  },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  match cli.command {
    Command::HashPassword => {
      print!("Password: ");
      std::io::stdout().flush().ok();
      let password = read_password(std::io::stdin().lock())?;
      let hash = talenta_api::auth::hash_password(&password)?;
      println!("{hash}");
    }
    Command::Serve => {
      let (server_cfg, store) = open(&cli.config).await?;
      seed::ensure_admin(&store, &server_cfg)
        .await
        .context("failed to create bootstrap superadmin")?;

      let app = app(store, &server_cfg);
      let address = format!("{}:{}", server_cfg.host, server_cfg.port);

      tracing::info!("Listening on http://{address}/api");
      let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind {address}"))?;
      axum::serve(listener, app).await.context("server error")?;
    }
    Command::Seed => {
      let (server_cfg, store) = open(&cli.config).await?;
      let added = seed::seed_companies(&store).await.context("failed to seed companies")?;
      let admin = seed::ensure_admin(&store, &server_cfg)
        .await
        .context("failed to create bootstrap superadmin")?;
      println!("{added} companies added");
      if let Some(admin) = admin {
        println!("superadmin {} created", admin.email);
      }
    }
    Command::Import { file } => {
      let (_, store) = open(&cli.config).await?;
      let report = import_file(&store, &file).await?;
      println!(
        "{} employees in workbook: {} created, {} updated",
        report.intended, report.created, report.updated
      );
    }
    Command::Template { out } => {
      let (_, store) = open(&cli.config).await?;
      write_template_file(&store, &out).await?;
      println!("template written to {}", out.display());
    }
  }

  Ok(())
}

/// Load configuration and open (creating if needed) the SQLite store.
async fn open(config: &Path) -> anyhow::Result<(ServerConfig, SqliteStore)> {
  let server_cfg = ServerConfig::load(config).context("failed to load configuration")?;
  let store_path = server_cfg.store_path();
  if let Some(parent) = store_path.parent()
    && !parent.as_os_str().is_empty()
  {
    std::fs::create_dir_all(parent)
      .with_context(|| format!("failed to create {parent:?}"))?;
  }
  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;
  Ok((server_cfg, store))
}

