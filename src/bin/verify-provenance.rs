use anyhow::{anyhow, Result};
use clap::{Arg, ArgAction, Command};
use std::collections::HashMap;
use std::path::Path;
use tracing::{error, info};

use provenance_ledger::provenance::{
    find_tampered_events, load_export, verify_merkle_root, ProvenanceExport,
};

fn main() -> Result<()> {
    let matches = Command::new("verify-provenance")
        .version("0.1.0")
        .about("Verify the integrity of an exported provenance chain")
        .arg(
            Arg::new("export")
                .short('e')
                .long("export")
                .value_name("PATH")
                .help("Path to provenance export JSON")
                .required(true),
        )
        .arg(
            Arg::new("merkle-root")
                .short('m')
                .long("merkle-root")
                .value_name("HASH")
                .help("Expected Merkle root hash"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::SetTrue)
                .help("Enable verbose output"),
        )
        .arg(
            Arg::new("quiet")
                .short('q')
                .long("quiet")
                .action(ArgAction::SetTrue)
                .help("Suppress output except errors"),
        )
        .get_matches();

    let export_path = matches
        .get_one::<String>("export")
        .ok_or_else(|| anyhow!("--export is required"))?;
    let expected_merkle_root = matches.get_one::<String>("merkle-root");
    let verbose = matches.get_flag("verbose");
    let quiet = matches.get_flag("quiet");

    let level = if quiet {
        tracing::Level::ERROR
    } else if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = verify_export_file(export_path, expected_merkle_root, verbose) {
        error!("Provenance verification failed: {}", e);
        std::process::exit(1);
    }

    if !quiet {
        println!("✓ Provenance verification completed successfully");
    }

    Ok(())
}

fn verify_export_file(
    export_path: &str,
    expected_merkle_root: Option<&String>,
    verbose: bool,
) -> Result<()> {
    info!("Verifying provenance export: {}", export_path);

    let path = Path::new(export_path);
    if !path.exists() {
        return Err(anyhow!("Export file not found: {}", export_path));
    }

    let export = load_export(path)?;
    let chain = &export.chain;

    if verbose {
        println!("Loaded chain {} with {} events", chain.chain_id, chain.events.len());
    }

    info!("Verifying hash chain integrity");
    let result = export.reverify();
    if verbose {
        println!("{}", result.detailed_status());
    }

    if !result.valid {
        let tampered = find_tampered_events(chain);
        if !tampered.is_empty() {
            println!("⚠ Events with invalid signatures: {:?}", tampered);
        }
        return Err(anyhow!("{}", result.message));
    }

    if result != export.verification {
        return Err(anyhow!(
            "Stored verification does not match a fresh verification: {}",
            export.verification.message
        ));
    }

    if let Some(expected) = expected_merkle_root {
        info!("Verifying Merkle root against expected value");
        if !verify_merkle_root(chain.hash_scheme, &chain.leaf_hashes(), expected) {
            return Err(anyhow!(
                "Merkle root mismatch. Expected: {}, Got: {}",
                expected,
                chain.merkle_root
            ));
        }

        if verbose {
            println!("✓ Merkle root matches expected value");
        }
    }

    if verbose {
        print_summary(&export);
    }

    Ok(())
}

fn print_summary(export: &ProvenanceExport) {
    let chain = &export.chain;

    println!("\nProvenance Summary:");
    println!("  Schema: {}", export.schema);
    println!("  Generated: {}", export.generated);
    println!("  Compliance: {}", export.compliance.join(", "));
    println!("  Subject: {}", chain.subject_id);
    println!("  Hash scheme: {}", chain.hash_scheme);
    println!("  First event: {}", chain.created_at);
    println!("  Last event: {}", chain.updated_at);
    println!("  Merkle root: {}", chain.merkle_root);
    if let Some(head) = chain.head_hash() {
        println!("  Head hash: {}", head);
    }

    let mut mutation_types = HashMap::new();
    for event in &chain.events {
        *mutation_types.entry(event.mutation_type.label()).or_insert(0) += 1;
    }

    println!("\nMutation type distribution:");
    for (label, count) in mutation_types {
        println!("  {}: {}", label, count);
    }
}
