//! EconLab CLI: fetch macro series and report what is stored.
//!
//! Commands:
//! - `banxico`: fetch the FIX exchange rate and the interbank equilibrium rate from Banxico SIE
//! - `inegi`: fetch annual inflation from the INEGI indicators API
//! - `status`: report which series files exist, their rows, ranges and hashes
//!
//! A configuration that cannot be read or parsed exits with status 1 before
//! anything is fetched. A missing token, upstream failures and save failures
//! are logged and do not change the exit status.

use anyhow::Result;
use clap::{Parser, Subcommand};
use econlab_core::config::DEFAULT_CONFIG_PATH;
use econlab_core::data::{
    fetch_and_save, BanxicoProvider, CsvStore, InegiProvider, SeriesProvider, TracingProgress,
};
use econlab_core::logging::init_logging;
use econlab_core::{AppConfig, ConfigError, SeriesKind};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "econlab",
    about = "EconLab CLI: Mexican macroeconomic series fetcher"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Options shared by every command.
#[derive(clap::Args)]
struct CommonArgs {
    /// Path to the TOML config file.
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Data directory. Overrides `data_dir` from the config file.
    #[arg(long)]
    data_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch exchange rate and interest rate series from Banxico.
    Banxico {
        #[command(flatten)]
        common: CommonArgs,
    },
    /// Fetch the inflation series from INEGI.
    Inegi {
        #[command(flatten)]
        common: CommonArgs,
    },
    /// Report the series files present in the data directory.
    Status {
        #[command(flatten)]
        common: CommonArgs,
    },
}

#[derive(Clone, Copy)]
enum Source {
    Banxico,
    Inegi,
}

fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();

    match cli.command {
        Commands::Banxico { common } => run_fetch(Source::Banxico, &common),
        Commands::Inegi { common } => run_fetch(Source::Inegi, &common),
        Commands::Status { common } => run_status(&common),
    }
}

/// Load the config or terminate with status 1.
fn load_config(common: &CommonArgs) -> AppConfig {
    match AppConfig::from_file(&common.config) {
        Ok(mut config) => {
            if let Some(dir) = &common.data_dir {
                config.data_dir = dir.clone();
            }
            config
        }
        Err(e) => config_failure(&e),
    }
}

fn config_failure(e: &ConfigError) -> ! {
    tracing::error!(error = %e, "failed to load config");
    std::process::exit(1);
}

fn build_provider(source: Source, config: &AppConfig) -> anyhow::Result<Box<dyn SeriesProvider>> {
    let provider: Box<dyn SeriesProvider> = match source {
        Source::Banxico => {
            Box::new(BanxicoProvider::new(&config.banxico, config.banxico_token()?)?)
        }
        Source::Inegi => Box::new(InegiProvider::new(&config.inegi, config.inegi_token()?)?),
    };
    Ok(provider)
}

fn run_fetch(source: Source, common: &CommonArgs) -> Result<()> {
    let config = load_config(common);

    // A missing token fails every request upstream; report it once and skip.
    let provider = match build_provider(source, &config) {
        Ok(provider) => provider,
        Err(e) => {
            tracing::error!(error = %e, "could not set up provider, nothing fetched");
            return Ok(());
        }
    };

    tracing::info!(
        provider = provider.name(),
        start = %config.start_date,
        end = %config.end_date,
        data_dir = %config.data_dir.display(),
        "starting fetch"
    );

    let store = CsvStore::new(&config.data_dir);
    let summary = fetch_and_save(
        provider.as_ref(),
        &store,
        provider.kinds(),
        config.start_date,
        config.end_date,
        &TracingProgress,
    );

    if !summary.all_succeeded() {
        tracing::warn!(
            failed = summary.errors.len(),
            total = summary.total,
            "some series were not saved"
        );
    }

    Ok(())
}

fn run_status(common: &CommonArgs) -> Result<()> {
    let data_dir = match &common.data_dir {
        Some(dir) => dir.clone(),
        None => load_config(common).data_dir,
    };

    let store = CsvStore::new(&data_dir);
    let statuses = store.status(&SeriesKind::ALL);
    let total_size: u64 = statuses.iter().map(|s| s.size_bytes).sum();
    let present = statuses.iter().filter(|s| s.present).count();

    println!("Data: {}", data_dir.display());
    println!("Series: {present}/{}", statuses.len());
    println!("Total size: {}", format_size(total_size));
    println!();
    println!(
        "{:<16} {:<8} {:<25} {:>8} {:>10}  {}",
        "Series", "Source", "Date Range", "Rows", "Size", "Hash"
    );
    println!("{}", "-".repeat(86));
    for status in &statuses {
        let name = status.kind.value_column();
        let source = status.kind.provider_dir();
        if !status.present {
            println!("{name:<16} {source:<8} {:<25}", "(missing)");
            continue;
        }
        let range = match status.date_range {
            Some((first, last)) => format!("{first} to {last}"),
            None => "(empty)".to_string(),
        };
        let hash = status
            .content_hash
            .as_deref()
            .map(|h| &h[..h.len().min(12)])
            .unwrap_or("");
        println!(
            "{name:<16} {source:<8} {range:<25} {:>8} {:>10}  {hash}",
            status.rows,
            format_size(status.size_bytes)
        );
    }

    Ok(())
}

fn format_size(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{bytes} B")
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}
