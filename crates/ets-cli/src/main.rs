//! CLI binary for the emissions-trading registry: import disclosure files,
//! classify installations, inspect the graph.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use ets_core::config::RegistryConfig;
use ets_core::model::{EdgeKind, NodeKind};
use ets_core::store::Store;
use ets_import::pipeline::{self, ImportPaths};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Parser)]
#[command(name = "ets-registry", about = "Emissions-trading registry graph builder")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Import all disclosure sources in dependency order
    Import {
        /// Registry store directory
        #[arg(long)]
        db: PathBuf,

        /// Folder of installation extracts
        #[arg(long)]
        installations: PathBuf,

        /// Folder of aircraft-operator extracts
        #[arg(long)]
        aircraft_operators: PathBuf,

        /// Folder of yearly compliance extracts
        #[arg(long)]
        compliance: PathBuf,

        /// NER allocation file
        #[arg(long)]
        ner_allocation: PathBuf,

        /// Article-10c allocation file
        #[arg(long)]
        article10c_allocation: PathBuf,

        /// Installation offset-entitlements file
        #[arg(long)]
        installation_entitlements: PathBuf,

        /// Aircraft-operator offset-entitlements file
        #[arg(long)]
        aircraft_operator_entitlements: PathBuf,

        /// Folder of offset transaction extracts
        #[arg(long)]
        offsets: PathBuf,
    },

    /// Run the power-flag classification pass
    Classify {
        /// Registry store directory
        #[arg(long)]
        db: PathBuf,
    },

    /// Show node and edge counts per kind
    Info {
        /// Registry store directory
        #[arg(long)]
        db: PathBuf,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Import {
            db,
            installations,
            aircraft_operators,
            compliance,
            ner_allocation,
            article10c_allocation,
            installation_entitlements,
            aircraft_operator_entitlements,
            offsets,
        } => cmd_import(
            &db,
            ImportPaths {
                installations,
                aircraft_operators,
                compliance,
                ner_allocation,
                article10c_allocation,
                installation_entitlements,
                aircraft_operator_entitlements,
                offsets,
            },
        ),
        Commands::Classify { db } => cmd_classify(&db),
        Commands::Info { db } => cmd_info(&db),
    }
}

fn open_store(db: &Path) -> Result<Store> {
    Store::open(db).with_context(|| format!("failed to open registry store at {}", db.display()))
}

fn spinner(message: &'static str) -> ProgressBar {
    let bar = ProgressBar::new_spinner();
    bar.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .expect("valid template"),
    );
    bar.enable_steady_tick(Duration::from_millis(120));
    bar.set_message(message);
    bar
}

fn cmd_import(db: &Path, paths: ImportPaths) -> Result<()> {
    let config = RegistryConfig::load(db)?;
    let mut store = open_store(db)?;

    let bar = spinner("Importing disclosure files...");
    let report = pipeline::run(&mut store, &config, &paths)?;
    bar.finish_and_clear();

    tracing::info!(
        "registry now holds {} nodes and {} edges",
        store.node_count(),
        store.edge_count()
    );
    println!("{report}");
    Ok(())
}

fn cmd_classify(db: &Path) -> Result<()> {
    let config = RegistryConfig::load(db)?;
    let mut store = open_store(db)?;

    let bar = spinner("Classifying installations...");
    let report = ets_import::classify::run(&mut store, &config)?;
    bar.finish_and_clear();

    println!(
        "Classified {} installations: {} power-flagged by NACE code, {} by Article 10c allocation",
        report.installations_scanned, report.flagged_nace, report.flagged_article10c
    );
    Ok(())
}

fn cmd_info(db: &Path) -> Result<()> {
    let store = open_store(db)?;

    println!("Nodes:");
    for kind in NodeKind::ALL {
        let count = store.node_count_of(kind);
        if count > 0 {
            println!("  {kind:<20} {count:>8}");
        }
    }
    println!("Edges:");
    for kind in [
        EdgeKind::Allocation,
        EdgeKind::VerifiedEmissions,
        EdgeKind::SurrenderedUnits,
        EdgeKind::Compliance,
        EdgeKind::OffsetEntitlement,
        EdgeKind::Country,
        EdgeKind::Company,
        EdgeKind::Sector,
        EdgeKind::SandbagSector,
        EdgeKind::NaceCode,
        EdgeKind::FuelType,
        EdgeKind::OffsetFor,
        EdgeKind::ForPeriod,
        EdgeKind::FromProject,
        EdgeKind::OriginatingCountry,
    ] {
        let count = store.edge_count_of(kind);
        if count > 0 {
            println!("  {kind:<20?} {count:>8}");
        }
    }
    println!(
        "{} nodes, {} edges in total",
        store.node_count(),
        store.edge_count()
    );
    Ok(())
}
