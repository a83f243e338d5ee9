use std::path::PathBuf;
use std::sync::Arc;

use chrono::{DateTime, Local};
use clap::{Parser, Subcommand};
use tracing::{info, warn};

use nh_collectors::CollectionManager;
use nh_core::{AppConfig, DailySummary, Error, ReportStore, Result};
use nh_report::{FileReportStore, LoggingTransport};
use nh_scheduler::Scheduler;

#[derive(Parser)]
#[command(author, version, about = "Automated technology news collection")]
struct Cli {
    /// JSON configuration file; built-in defaults apply when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one collection cycle and persist the results
    Collect,
    /// Run the scheduling loop until interrupted
    Schedule,
    /// Recompute the daily summary from the latest collection output
    Summary,
    /// Show the most recent output files
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => AppConfig::from_file(path)?,
        None => AppConfig::default(),
    };

    let store: Arc<dyn ReportStore> = Arc::new(FileReportStore::new(&config.output.output_dir));

    match cli.command {
        Commands::Collect => run_single_collection(&config, store).await,
        Commands::Schedule => run_scheduler(&config, store).await,
        Commands::Summary => {
            let scheduler = build_scheduler(&config, store)?;
            scheduler.run_daily_summary().await
        }
        Commands::Status => show_status(&config).await,
    }
}

fn build_scheduler(config: &AppConfig, store: Arc<dyn ReportStore>) -> Result<Scheduler> {
    let manager = CollectionManager::new(config.collection.clone())?;
    Scheduler::new(
        manager,
        store,
        Some(Arc::new(LoggingTransport)),
        config.output.email_subject_prefix.clone(),
        config.schedule.clone(),
    )
}

/// One collection pass end to end: collect, persist, summarize.
async fn run_single_collection(config: &AppConfig, store: Arc<dyn ReportStore>) -> Result<()> {
    let manager = CollectionManager::new(config.collection.clone())?;
    let articles = manager.collect_all().await;

    if articles.is_empty() {
        warn!("no articles collected; nothing to persist");
        return Ok(());
    }

    let written = store.persist(&articles).await?;
    for path in &written {
        println!("written: {}", path.display());
    }

    println!("\ncollected {} articles:", articles.len());
    for article in articles.iter().take(5) {
        println!("- {}", article);
    }

    let summary = DailySummary::from_records(&articles);
    let summary_path = store.persist_summary(&summary).await?;
    println!("summary: {}", summary_path.display());

    Ok(())
}

/// Foreground scheduler hosting: spawn the loop, stop it on Ctrl-C.
async fn run_scheduler(config: &AppConfig, store: Arc<dyn ReportStore>) -> Result<()> {
    let scheduler = Arc::new(build_scheduler(config, store)?);

    let handle = scheduler.clone().spawn();
    info!("scheduler running; press Ctrl-C to stop");
    tokio::signal::ctrl_c().await?;
    info!("shutting down after the current tick");
    scheduler.stop();

    handle
        .await
        .map_err(|e| Error::Scheduler(format!("scheduler task failed: {}", e)))??;
    Ok(())
}

/// List the most recently modified output files, newest first.
async fn show_status(config: &AppConfig) -> Result<()> {
    let output_dir = &config.output.output_dir;
    println!("output directory: {}", output_dir.display());

    let mut entries = match tokio::fs::read_dir(output_dir).await {
        Ok(entries) => entries,
        Err(_) => {
            println!("output directory does not exist yet");
            return Ok(());
        }
    };

    let mut files = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        let name = entry.file_name().to_string_lossy().to_string();
        if !name.ends_with(".csv") && !name.ends_with(".json") && !name.ends_with(".html") {
            continue;
        }
        let modified = entry.metadata().await?.modified()?;
        files.push((name, modified));
    }

    files.sort_by(|a, b| b.1.cmp(&a.1));
    println!("output files: {}", files.len());
    for (name, modified) in files.iter().take(5) {
        let modified: DateTime<Local> = (*modified).into();
        println!("- {} (modified {})", name, modified.format("%d/%m/%Y %H:%M"));
    }

    Ok(())
}
