// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Wayback CLI
//!
//! Prints the diffed history of one map element, read from a JSON dump of
//! element versions, as JSON.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, info, Level};
use tracing_subscriber::FmtSubscriber;

use wayback_app_core::config::ConfigService;
use wayback_app_core::prefs::HistoryPrefs;
use wayback_config_fs::FsConfigStore;
use wayback_core::{load_report, ElementId, ElementKind, HistoryDump, MemorySource};

mod view;

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// JSON dump with `versions`, `relation_nodes` and `changesets`
    dump: PathBuf,

    /// Element kind: node, way or relation
    kind: ElementKind,

    /// Element id
    id: u64,

    /// Only list versions that changed at least one tag
    #[clap(long)]
    tags_only: bool,

    /// Maximum log level written to stderr
    #[clap(long, default_value_t = Level::INFO)]
    log_level: Level,

    /// Ignore saved preferences
    #[clap(long)]
    no_config: bool,

    /// Persist the effective preferences before running
    #[clap(long, conflicts_with = "no_config")]
    save_config: bool,
}

fn load_prefs(args: &Args) -> Result<HistoryPrefs> {
    if args.no_config {
        return Ok(HistoryPrefs::default());
    }
    let svc = ConfigService::new(FsConfigStore::new().context("opening config store")?);
    let prefs = svc.load_prefs();
    if args.save_config {
        svc.save_prefs(&prefs).context("saving preferences")?;
        info!("preferences saved");
    }
    Ok(prefs)
}

fn main() -> Result<()> {
    let args = Args::parse();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(args.log_level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("setting default subscriber failed")?;

    let prefs = load_prefs(&args)?;
    debug!(?prefs, "effective preferences");

    let bytes = std::fs::read(&args.dump)
        .with_context(|| format!("reading {}", args.dump.display()))?;
    let dump: HistoryDump = serde_json::from_slice(&bytes)
        .with_context(|| format!("decoding {}", args.dump.display()))?;
    let source = MemorySource::from(dump);
    info!(elements = source.len(), "dump loaded");

    let report = load_report(&source, args.kind, ElementId(args.id), &prefs.report_options())
        .with_context(|| format!("loading {} {}", args.kind, args.id))?;
    let view = view::ReportView::new(&report, &prefs, args.tags_only);
    debug!(entries = view.entry_count(), "rendering report");

    let mut out = std::io::stdout().lock();
    serde_json::to_writer_pretty(&mut out, &view)?;
    writeln!(out)?;
    Ok(())
}
