use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;
use tracing_error::ErrorLayer;
use tracing_subscriber::prelude::*;
use vacancy_crawler::{dou::DouBoard, persistent, stats, ChromeSession, Config, Pipeline};

#[derive(Debug, Parser)]
#[command(version, about = "Harvests and classifies DOU vacancies")]
struct Cli {
    /// JSON config file, built-in defaults when omitted
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Scrape every query target and write the CSV
    Crawl {
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Show the browser window
        #[arg(long)]
        headed: bool,
    },
    /// Technology frequency per experience level
    Stats {
        #[arg(short, long)]
        input: Option<PathBuf>,
    },
    /// Print the effective config as JSON
    Config,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_env("LOG_LEVEL").unwrap_or_else(|_| {
                "info,html5ever=error,selectors=error,headless_chrome=warn,tungstenite=warn".into()
            }),
        )
        .with(ErrorLayer::default())
        .init();

    let cli = Cli::parse();
    let mut config = Config::load(cli.config.as_deref())?;

    match cli.command {
        Command::Crawl { output, headed } => {
            if headed {
                config.browser.headless = false;
            }
            let output = output.unwrap_or_else(|| config.output.clone());

            let pipeline = Pipeline::new(&config, DouBoard)?;
            let session = ChromeSession::launch(&config.browser)?;
            let report = pipeline.run(session, &output)?;
            let failed: usize = report.targets.iter().map(|t| t.failed + t.malformed).sum();
            info!(
                "Done: {} vacancies from {} pages, {} skipped",
                report.records.len(),
                report.targets.len(),
                failed
            );
        }
        Command::Stats { input } => {
            let input = input.unwrap_or_else(|| config.output.clone());
            let records = persistent::read_vacancies(&input)?;
            for table in stats::summarize(&records, &config.experience_levels) {
                println!("{}", table);
            }
        }
        Command::Config => {
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
    }

    Ok(())
}
