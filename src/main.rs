//! Plagiat command-line entrypoint.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use mimalloc::MiMalloc;
use serde::Serialize;
use tokio::signal;

use plagiat::config::Config;
use plagiat::context::ServiceContext;
use plagiat::storage::CorpusStore;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[derive(Parser, Debug)]
#[command(name = "plagiat", version, about = "Sentence-level plagiarism detection")]
struct Cli {
    /// Corpus store directory (overrides PLAGIAT_CORPUS_DIR).
    #[arg(long, global = true)]
    corpus_dir: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Analyze a document against the corpus and print the JSON report.
    Analyze {
        file: PathBuf,
        #[arg(long)]
        top_k: Option<usize>,
        #[arg(long)]
        min_score: Option<f32>,
        #[arg(long)]
        pretty: bool,
    },
    /// Ingest staged documents into the corpus.
    UpdateCorpus,
    /// Create an empty corpus store.
    Init {
        /// Vector dimension; defaults to the configured embedder's.
        #[arg(long)]
        dimension: Option<usize>,
    },
    /// Print the current corpus manifest.
    Stats,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = Config::from_env()?;
    if let Some(dir) = cli.corpus_dir {
        config.corpus_dir = dir;
    }
    config.validate()?;

    tracing::debug!(?config, "Configuration loaded");

    let job = tokio::task::spawn_blocking(move || run(cli.command, config));

    tokio::select! {
        result = job => {
            result.context("worker thread panicked")??;
            Ok(ExitCode::SUCCESS)
        }
        _ = signal::ctrl_c() => {
            tracing::warn!(
                "Received Ctrl+C, exiting; the corpus store keeps its last published generation"
            );
            Ok(ExitCode::from(130))
        }
    }
}

fn run(command: Command, config: Config) -> anyhow::Result<()> {
    match command {
        Command::Analyze {
            file,
            top_k,
            min_score,
            pretty,
        } => {
            let context = ServiceContext::initialize(config)?;
            let mut options = context.config().analysis_options();
            if let Some(top_k) = top_k {
                options = options.with_top_k(top_k);
            }
            if let Some(min_score) = min_score {
                options = options.with_min_verdict_score(min_score);
            }

            let outcome = context
                .analyze_file(&file, &options)
                .with_context(|| format!("analysis of {} failed", file.display()))?;
            print_json(&outcome, pretty)?;
            context.shutdown();
        }
        Command::UpdateCorpus => {
            let context = ServiceContext::initialize(config)?;
            let summary = context.update_corpus().context("corpus update failed")?;
            print_json(&summary, true)?;
            context.shutdown();
        }
        Command::Init { dimension } => {
            let manifest = ServiceContext::init_store(&config, dimension)?;
            print_json(&manifest, true)?;
        }
        Command::Stats => {
            let manifest = CorpusStore::new(&config.corpus_dir).read_manifest()?;
            print_json(&manifest, true)?;
        }
    }
    Ok(())
}

fn print_json<T: Serialize>(value: &T, pretty: bool) -> anyhow::Result<()> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{json}");
    Ok(())
}
