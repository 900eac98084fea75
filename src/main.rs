//! CLI for ECDSA nonce search and key recovery

use anyhow::Result;
use clap::{Parser, Subcommand};
use k256::Scalar;
use noncehunt::codec::address_for_private_key;
use noncehunt::error::Error;
use noncehunt::math::{
    parse_scalar_decimal_strict, scalar_to_decimal_string, scalar_to_hex_string, ScalarKind,
};
use noncehunt::provider::load_signatures;
use noncehunt::recovery::recover_private_key;
use noncehunt::search::{run_parallel, Search, SearchConfig, SearchOutcome};
use noncehunt::signature::Signature;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use std::io::Write;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "noncehunt")]
#[command(about = "ECDSA nonce search and private key recovery")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Search for a (key, nonce) pair satisfying each input signature
    Search {
        #[arg(default_value = "-")]
        input: String,

        #[arg(long, default_value = "500000", help = "Attempt budget per signature")]
        max_attempts: u64,

        #[arg(
            long,
            default_value = "10000",
            help = "Log progress every N attempts (0 disables)"
        )]
        report_interval: u64,

        #[arg(long, default_value = "1", help = "Worker threads per signature")]
        workers: usize,

        #[arg(long, help = "Append recovered keys to this file")]
        found_log: Option<String>,
    },
    /// Recover the private key from a signature with a known nonce
    Recover {
        #[arg(long)]
        r: String,

        #[arg(long)]
        s: String,

        #[arg(long)]
        z: String,

        #[arg(long)]
        k: String,
    },
    /// Derive the Base58Check address for a private key
    Address { private_key: String },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(found_keys) => {
            if found_keys {
                ExitCode::from(1)
            } else {
                ExitCode::SUCCESS
            }
        }
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::from(2)
        }
    }
}

fn run(cli: Cli) -> Result<bool> {
    match cli.command {
        Command::Search {
            input,
            max_attempts,
            report_interval,
            workers,
            found_log,
        } => {
            let signatures = load_signatures(&input)?;
            let config = SearchConfig {
                max_attempts,
                report_interval,
                workers,
                ..SearchConfig::default()
            };

            let report = search_signatures(&signatures, &config, found_log.as_deref())?;
            let output = format_search_output(&report, cli.json)?;
            println!("{}", output);

            Ok(report.summary.keys_recovered > 0)
        }
        Command::Recover { r, s, z, k } => {
            let r = parse_scalar_decimal_strict(&r, ScalarKind::RorS)?;
            let s = parse_scalar_decimal_strict(&s, ScalarKind::RorS)?;
            let z = parse_scalar_decimal_strict(&z, ScalarKind::Z)?;
            let k = parse_scalar_decimal_strict(&k, ScalarKind::RorS)?;

            let d = recover_private_key(&r, &s, &z, &k)?;
            let recovered = recovered_key_output(&d, &k)?;

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&recovered)?);
            } else {
                println!("Private Key (decimal): {}", recovered.private_key_decimal);
                println!("Private Key (hex): {}", recovered.private_key_hex);
                println!("Address: {}", recovered.address);
            }
            Ok(false)
        }
        Command::Address { private_key } => {
            let d = parse_scalar_decimal_strict(&private_key, ScalarKind::RorS)?;
            let address = address_for_private_key(&d)?;

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&serde_json::json!({ "address": address }))?);
            } else {
                println!("{}", address);
            }
            Ok(false)
        }
    }
}

#[derive(Serialize)]
struct OutputReport {
    results: Vec<SearchResultOutput>,
    summary: SummaryOutput,
}

#[derive(Serialize)]
struct SearchResultOutput {
    r: String,
    s: String,
    z: String,
    status: String,
    attempts: u64,
    recovered: Option<RecoveredKeyOutput>,
}

#[derive(Serialize)]
struct RecoveredKeyOutput {
    private_key_decimal: String,
    private_key_hex: String,
    nonce_decimal: String,
    address: String,
}

#[derive(Serialize)]
struct SummaryOutput {
    total_signatures: usize,
    keys_recovered: usize,
    total_attempts: u64,
}

fn recovered_key_output(d: &Scalar, k: &Scalar) -> Result<RecoveredKeyOutput> {
    Ok(RecoveredKeyOutput {
        private_key_decimal: scalar_to_decimal_string(d),
        private_key_hex: scalar_to_hex_string(d),
        nonce_decimal: scalar_to_decimal_string(k),
        address: address_for_private_key(d)?,
    })
}

fn search_signatures(
    signatures: &[Signature],
    config: &SearchConfig,
    found_log: Option<&str>,
) -> Result<OutputReport> {
    let mut results = Vec::new();
    let mut keys_recovered = 0;
    let mut total_attempts = 0;

    for sig in signatures {
        let outcome = if config.workers > 1 {
            run_parallel(sig, config, |_| None)
        } else {
            let mut search = Search::new(config.clone(), StdRng::from_entropy());
            search.run(sig)
        };

        // A malformed signature is rejected; the rest still get searched.
        let outcome = match outcome {
            Ok(outcome) => outcome,
            Err(Error::InvalidSignatureComponent) => {
                results.push(SearchResultOutput {
                    r: scalar_to_decimal_string(&sig.r),
                    s: scalar_to_decimal_string(&sig.s),
                    z: scalar_to_decimal_string(&sig.z),
                    status: "rejected".to_string(),
                    attempts: 0,
                    recovered: None,
                });
                continue;
            }
            Err(e) => return Err(e.into()),
        };

        let (status, attempts, recovered) = match outcome {
            SearchOutcome::Found {
                private_key,
                nonce,
                attempts,
            } => {
                keys_recovered += 1;
                let recovered = recovered_key_output(&private_key, &nonce)?;
                if let Some(path) = found_log {
                    append_found_record(path, sig, &recovered)?;
                }
                ("found".to_string(), attempts, Some(recovered))
            }
            SearchOutcome::Exhausted { attempts } => ("exhausted".to_string(), attempts, None),
        };
        total_attempts += attempts;

        results.push(SearchResultOutput {
            r: scalar_to_decimal_string(&sig.r),
            s: scalar_to_decimal_string(&sig.s),
            z: scalar_to_decimal_string(&sig.z),
            status,
            attempts,
            recovered,
        });
    }

    Ok(OutputReport {
        results,
        summary: SummaryOutput {
            total_signatures: signatures.len(),
            keys_recovered,
            total_attempts,
        },
    })
}

fn append_found_record(path: &str, sig: &Signature, key: &RecoveredKeyOutput) -> Result<()> {
    let mut file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)?;
    writeln!(
        file,
        "r={} s={} z={}",
        scalar_to_decimal_string(&sig.r),
        scalar_to_decimal_string(&sig.s),
        scalar_to_decimal_string(&sig.z)
    )?;
    writeln!(
        file,
        "d={} k={} address={}",
        key.private_key_decimal, key.nonce_decimal, key.address
    )?;
    writeln!(file, "--------------------------------------------------")?;
    Ok(())
}

fn format_search_output(report: &OutputReport, json: bool) -> Result<String> {
    if json {
        return Ok(serde_json::to_string_pretty(report)?);
    }

    let mut output = String::new();
    output.push_str(&format!(
        "Analyzed {} signatures\n\n",
        report.summary.total_signatures
    ));

    for (i, result) in report.results.iter().enumerate() {
        output.push_str(&format!("Signature #{}\n", i + 1));
        output.push_str(&format!("  R Value: {}\n", result.r));
        output.push_str(&format!("  Status: {}\n", result.status));
        output.push_str(&format!("  Attempts: {}\n", result.attempts));

        if let Some(key) = &result.recovered {
            output.push_str(&format!(
                "  Private Key (decimal): {}\n",
                key.private_key_decimal
            ));
            output.push_str(&format!("  Private Key (hex): {}\n", key.private_key_hex));
            output.push_str(&format!("  Nonce (decimal): {}\n", key.nonce_decimal));
            output.push_str(&format!("  Address: {}\n", key.address));
        }
        output.push('\n');
    }

    if report.summary.keys_recovered == 0 {
        output.push_str("No keys recovered.\n");
    } else {
        output.push_str(&format!(
            "Recovered {} keys in {} attempts.\n",
            report.summary.keys_recovered, report.summary.total_attempts
        ));
    }

    Ok(output)
}
