//! Configuration, router assembly and seeding for the `talenta-server`
//! binary.

pub mod seed;

use std::{
  io::BufRead,
  path::{Path, PathBuf},
};

use anyhow::Context as _;
use axum::Router;
use serde::Deserialize;
use talenta_api::{AppState, DEFAULT_MAX_UPLOAD_BYTES, api_router};
use talenta_core::{batch::UpsertReport, store::PortalStore, user::Caller};
use tower_http::trace::TraceLayer;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` overlaid by
/// `TALENTA_*` environment variables.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:                String,
  #[serde(default = "default_port")]
  pub port:                u16,
  #[serde(default = "default_store_path")]
  pub store_path:          PathBuf,
  #[serde(default = "default_max_upload_bytes")]
  pub max_upload_bytes:    usize,
  /// Bootstrap superadmin, created by `seed` (and on `serve`) when absent.
  pub admin_email:         Option<String>,
  pub admin_name:          Option<String>,
  /// argon2 PHC string, see `talenta-server hash-password`.
  pub admin_password_hash: Option<String>,
}

fn default_host() -> String { "127.0.0.1".to_owned() }
fn default_port() -> u16 { 3000 }
fn default_store_path() -> PathBuf { PathBuf::from("~/.local/share/talenta/talenta.db") }
fn default_max_upload_bytes() -> usize { DEFAULT_MAX_UPLOAD_BYTES }

impl ServerConfig {
  /// Load from an optional TOML file at `path`, then the environment.
  pub fn load(path: &Path) -> Result<Self, config::ConfigError> {
    config::Config::builder()
      .add_source(config::File::from(path).required(false))
      .add_source(config::Environment::with_prefix("TALENTA"))
      .build()?
      .try_deserialize()
  }

  /// The store path with a leading `~` expanded.
  pub fn store_path(&self) -> PathBuf { expand_tilde(&self.store_path) }
}

/// Expand a leading `~` (alone or as `~/…`) to the user's home directory.
/// Paths are returned unchanged when `HOME` is unset.
pub fn expand_tilde(path: &Path) -> PathBuf {
  let Ok(home) = std::env::var("HOME") else {
    return path.to_path_buf();
  };
  match path.strip_prefix("~") {
    Ok(rest) if rest.as_os_str().is_empty() => PathBuf::from(home),
    Ok(rest) => PathBuf::from(home).join(rest),
    Err(_) => path.to_path_buf(),
  }
}

// ─── Offline commands ─────────────────────────────────────────────────────────

/// Read one password line, without its line terminator. An empty password is
/// rejected.
pub fn read_password(mut input: impl BufRead) -> anyhow::Result<String> {
  let mut line = String::new();
  input.read_line(&mut line).context("failed to read password")?;
  let password = line.trim_end_matches(['\n', '\r']);
  anyhow::ensure!(!password.is_empty(), "password must not be empty");
  Ok(password.to_owned())
}

/// Run the full ingestion pipeline on the workbook at `path` with
/// unrestricted scope.
pub async fn import_file<S: PortalStore>(store: &S, path: &Path) -> anyhow::Result<UpsertReport> {
  let bytes = std::fs::read(path).with_context(|| format!("failed to read {path:?}"))?;
  let report = talenta_sheets::import_workbook(store, &Caller::system(), &bytes)
    .await
    .with_context(|| format!("failed to import {path:?}"))?;
  tracing::info!(
    path = %path.display(),
    created = report.created,
    updated = report.updated,
    "workbook imported"
  );
  Ok(report)
}

/// Write the blank upload template, listing the store's companies, to `out`.
pub async fn write_template_file<S: PortalStore>(store: &S, out: &Path) -> anyhow::Result<()> {
  let companies = store.list_companies().await.context("failed to list companies")?;
  let bytes =
    talenta_sheets::template::write_template(&companies).context("failed to build template")?;
  std::fs::write(out, bytes).with_context(|| format!("failed to write {out:?}"))?;
  Ok(())
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// The full application: the API under `/api` with request tracing.
pub fn app<S>(store: S, config: &ServerConfig) -> Router
where
  S: PortalStore + Clone + 'static,
{
  let mut state = AppState::new(std::sync::Arc::new(store));
  state.max_upload_bytes = config.max_upload_bytes;

  Router::new()
    .nest("/api", api_router(state))
    .layer(TraceLayer::new_for_http())
}
