//! `doorlist` — reconcile access-control exports into a single store.
//!
//! # Usage
//!
//! ```text
//! doorlist --config doorlist.toml build
//! doorlist export
//! doorlist show-reader 12
//! ```

mod settings;

use std::path::PathBuf;

use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};
use doorlist_core::{
  pipeline::{self, Sources},
  reader::ReaderNumber,
  store::{AccessStore, PersistReport, persist},
};
use doorlist_store_sqlite::SqliteStore;
use doorlist_xlsx::{export, ingest};
use serde::Serialize;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use crate::settings::{AppConfig, Layouts, SourcePaths};

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "doorlist", version, about = "Reconcile door reader authorizations")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "doorlist.toml")]
  config: PathBuf,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Read the source exports, reconcile them and write the result to the store.
  Build {
    /// Print the run summary as JSON instead of log lines.
    #[arg(long)]
    json: bool,
  },
  /// Write the authorization, reader and department reports.
  Export,
  /// Print one stored reader, with its authorized people, as JSON.
  ShowReader {
    /// Reader number, with or without zero padding.
    number: String,
  },
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();
  let cfg = AppConfig::load(&cli.config)?;

  let store = SqliteStore::open(&cfg.store_path)
    .await
    .with_context(|| format!("failed to open store at {:?}", cfg.store_path))?;

  match cli.command {
    Command::Build { json } => build(&cfg, &store, json).await,
    Command::Export => export_reports(&cfg, &store).await,
    Command::ShowReader { number } => show_reader(&store, &number).await,
  }
}

// ─── Commands ─────────────────────────────────────────────────────────────────

#[derive(Serialize)]
struct BuildSummary {
  reconcile: pipeline::ReconcileReport,
  persist:   PersistReport,
}

async fn build(cfg: &AppConfig, store: &SqliteStore, json: bool) -> Result<()> {
  let paths = cfg
    .sources
    .as_ref()
    .context("`sources` must be configured to run a build")?;

  let sources = read_sources(paths, &cfg.layouts)?;
  let reconciliation = pipeline::reconcile(sources);
  let persisted = persist(store, &reconciliation)
    .await
    .context("failed to persist reconciliation")?;

  let summary = BuildSummary { reconcile: reconciliation.report, persist: persisted };
  if json {
    println!("{}", serde_json::to_string_pretty(&summary)?);
  } else {
    let auth = &summary.reconcile.authorizations;
    tracing::info!(
      readers = reconciliation.readers.len(),
      people = summary.reconcile.people,
      edges = auth.edges_added,
      unmatched_rows = auth.unmatched_rows,
      unresolved_names = auth.unresolved_names.len(),
      ambiguous_names = auth.ambiguous_names.len(),
      "build complete"
    );
  }
  Ok(())
}

fn read_sources(paths: &SourcePaths, layouts: &Layouts) -> Result<Sources> {
  let readers = ingest::read_reader_rows(&paths.readers, &layouts.readers)?;
  let people = ingest::read_person_rows(&paths.people, &layouts.people)?;
  let authorizations =
    ingest::read_authorization_rows(&paths.authorizations, &layouts.authorizations)?;
  let abi_locations = paths
    .abi_locations
    .as_deref()
    .map(|p| ingest::read_abi_rows(p, &layouts.abi_locations))
    .transpose()?;
  let reader_list = paths
    .reader_list
    .as_deref()
    .map(|p| ingest::read_reader_list_rows(p, &layouts.reader_list))
    .transpose()?;

  Ok(Sources { readers, abi_locations, reader_list, people, authorizations })
}

async fn export_reports(cfg: &AppConfig, store: &SqliteStore) -> Result<()> {
  let people = store.list_people().await?;
  let readers = store.list_readers().await?;
  let authorizations = store.list_authorizations().await?;

  std::fs::create_dir_all(&cfg.output_dir)
    .with_context(|| format!("failed to create {:?}", cfg.output_dir))?;

  let reports = [
    (
      "AuthorizationsOutput.xlsx",
      export::authorizations_report(&people, &readers, &authorizations),
    ),
    ("ReadersOutput.xlsx", export::readers_report(&readers)),
    (
      "DepartmentsOutput.xlsx",
      export::departments_report(&people, &authorizations),
    ),
  ];

  for (file, report) in &reports {
    let path = cfg.output_dir.join(file);
    export::write_report(report, &path)
      .with_context(|| format!("failed to write {}", path.display()))?;
  }
  Ok(())
}

async fn show_reader(store: &SqliteStore, number: &str) -> Result<()> {
  let number: ReaderNumber = number.parse()?;
  let reader = store
    .get_reader(&number)
    .await?
    .with_context(|| format!("reader {number} not found"))?;

  let mut people = Vec::with_capacity(reader.authorized_persons().len());
  for person in reader.authorized_persons() {
    if let Some(p) = store.get_person(person).await? {
      people.push(p);
    }
  }

  let out = serde_json::json!({ "reader": reader, "authorized_people": people });
  println!("{}", serde_json::to_string_pretty(&out)?);
  Ok(())
}
