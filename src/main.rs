use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use provenance_ledger::config::AppConfig;
use provenance_ledger::provenance::{generate_proof, load_export, ChainBuilder};
use provenance_ledger::source::StaticVersionSource;

#[derive(Parser)]
#[command(name = "provenance-ledger", version, about = "Build, export and prove provenance chains")]
struct Cli {
    /// Configuration file (YAML, TOML or JSON)
    #[arg(short, long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Build a chain from a version history file and export it
    Build {
        /// YAML file with `subjects: {<id>: [versions...]}`
        #[arg(short, long, value_name = "PATH")]
        source: PathBuf,

        /// Subject to build the chain for
        #[arg(long)]
        subject: String,

        /// Write the export here instead of stdout
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
    /// Produce an inclusion proof for one event of an exported chain
    Prove {
        #[arg(short, long, value_name = "PATH")]
        export: PathBuf,

        #[arg(long)]
        event_id: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::load(cli.config.as_deref())?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.log_filter.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Command::Build {
            source,
            subject,
            output,
        } => {
            let versions = StaticVersionSource::from_yaml_file(&source)?;
            let chain = ChainBuilder::new(config.hash_scheme).build_from_source(&versions, &subject)?;

            let exporter = config.export.exporter();
            let export = exporter.export(&chain);
            info!("{}", export.verification.summary());

            match output {
                Some(path) => exporter.save_export(&export, &path)?,
                None => println!("{}", serde_json::to_string_pretty(&export)?),
            }
        }
        Command::Prove { export, event_id } => {
            let export = load_export(&export)?;
            let proof = generate_proof(&export.chain, &event_id);

            println!("{}", serde_json::to_string_pretty(&proof)?);
            if !proof.verified {
                return Err(anyhow!("{}", proof.message));
            }
        }
    }

    Ok(())
}
