//! Symptom Advisor CLI
//!
//! Command-line front end for matching symptoms against the advice catalog.

use clap::{Parser, Subcommand};
use std::path::Path;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use symptom_advisor::{
    load_catalog, locate_catalog, present, AdvisorConfig, AdvisorService, Answer, Result,
};

#[derive(Parser)]
#[command(name = "symptom-advisor")]
#[command(author, version, about = "Semantic symptom advisor", long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "advisor.toml")]
    config: String,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default configuration file
    Init {
        /// Output path for configuration file
        #[arg(short, long, default_value = "advisor.toml")]
        output: String,
    },

    /// Load the catalog and report how many rows are usable
    Check,

    /// Answer a single query
    Ask {
        /// Symptoms, as a sentence or comma-separated list
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,

        /// Override the similarity threshold
        #[arg(long)]
        threshold: Option<f32>,

        /// Print the answer as JSON
        #[arg(long)]
        json: bool,
    },

    /// Prompt for symptoms until EOF, `quit` or Ctrl+C
    Interactive {
        /// Override the similarity threshold
        #[arg(long)]
        threshold: Option<f32>,
    },
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    // Answers go to stdout; keep logs on stderr.
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn load_config(path: &str) -> Result<AdvisorConfig> {
    if Path::new(path).exists() {
        info!("Loading configuration from: {}", path);
        AdvisorConfig::load(path)
    } else {
        info!("Using default configuration");
        Ok(AdvisorConfig::default())
    }
}

async fn start_service(mut config: AdvisorConfig, threshold: Option<f32>) -> Result<AdvisorService> {
    if let Some(threshold) = threshold {
        config.matcher.similarity_threshold = threshold;
    }
    info!("Initializing advisor (downloads the embedding model on first use)...");
    AdvisorService::start(config).await
}

fn print_answer(answer: &Answer, json: bool) -> Result<()> {
    let rendered = if json {
        answer.to_json()?
    } else {
        answer.to_string()
    };
    if answer.is_problem() {
        eprintln!("{}", rendered);
    } else {
        println!("{}", rendered);
    }
    Ok(())
}

async fn run_interactive(service: &AdvisorService) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    println!("Enter your symptoms (comma-separated or full sentence). Type 'quit' to exit.");

    loop {
        stdout.write_all(b"> ").await?;
        stdout.flush().await?;

        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    info!("End of input");
                    break;
                };
                let trimmed = line.trim();
                if trimmed.eq_ignore_ascii_case("quit") || trimmed.eq_ignore_ascii_case("exit") {
                    break;
                }
                let answer = present(service.advise(&line).await);
                print_answer(&answer, false)?;
            }

            _ = signal::ctrl_c() => {
                info!("Received shutdown signal");
                break;
            }
        }
    }

    Ok(())
}

async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Init { output } => {
            info!("Writing default configuration to: {}", output);
            AdvisorConfig::default().save(&output)?;
            info!("Configuration saved successfully");
        }

        Commands::Check => {
            let config = load_config(&cli.config)?;
            let path = locate_catalog(&config.catalog)?;
            let (entries, report) = load_catalog(&path)?;
            println!(
                "{}: {} entries loaded, {} rows skipped",
                path.display(),
                entries.len(),
                report.skipped
            );
        }

        Commands::Ask {
            query,
            threshold,
            json,
        } => {
            let config = load_config(&cli.config)?;
            let service = start_service(config, threshold).await?;
            let answer = present(service.advise(&query.join(" ")).await);
            print_answer(&answer, json)?;
        }

        Commands::Interactive { threshold } => {
            let config = load_config(&cli.config)?;
            let service = start_service(config, threshold).await?;
            run_interactive(&service).await?;
            info!("Advisor stopped");
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    if let Err(e) = run(cli).await {
        error!("{}", e);
        std::process::exit(1);
    }
}
