//! Dynamics CLI - command-line interface for the conversation dynamics engine
//!
//! Commands:
//! - extract: Compute feature records for conversation JSON (file or stdin)
//! - metrics: List the registered metric names

use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use convo_dynamics::{
    Conversation, DynamicsError, DynamicsProcessor, MetricKind, NoisePolicy, ENGINE_VERSION,
};

/// Dynamics - compute dyadic conversation dynamics features
#[derive(Parser)]
#[command(name = "dynamics")]
#[command(version = ENGINE_VERSION)]
#[command(about = "Compute conversation dynamics features from diarized segments or transcripts", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute feature records for conversations (batch mode)
    Extract {
        /// Input file path with a conversation object or array (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Output file path (use - for stdout)
        #[arg(short, long, default_value = "-")]
        output: PathBuf,

        /// Metrics to run (defaults to all six)
        #[arg(short, long, value_delimiter = ',')]
        metrics: Vec<String>,

        /// Noise-speaker removal policy
        #[arg(long, default_value = "remove-once")]
        noise_policy: NoisePolicyArg,

        /// Pretty-print the output JSON
        #[arg(long)]
        pretty: bool,
    },

    /// List the available metric names
    Metrics {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum NoisePolicyArg {
    /// Remove one noise speaker, fail if more than two remain
    RemoveOnce,
    /// Remove smallest speakers until at most two remain
    Iterative,
}

impl From<NoisePolicyArg> for NoisePolicy {
    fn from(arg: NoisePolicyArg) -> Self {
        match arg {
            NoisePolicyArg::RemoveOnce => NoisePolicy::RemoveOnce,
            NoisePolicyArg::Iterative => NoisePolicy::Iterative,
        }
    }
}

#[derive(Serialize)]
struct CliError {
    error: String,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let payload = CliError {
                error: e.to_string(),
            };
            eprintln!(
                "{}",
                serde_json::to_string(&payload).unwrap_or_else(|_| payload.error.clone())
            );
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Extract {
            input,
            output,
            metrics,
            noise_policy,
            pretty,
        } => extract(&input, &output, &metrics, noise_policy.into(), pretty),
        Commands::Metrics { json } => {
            let names = MetricKind::available_names();
            if json {
                println!("{}", serde_json::to_string(&names)?);
            } else {
                for name in names {
                    println!("{name}");
                }
            }
            Ok(())
        }
    }
}

fn extract(
    input: &PathBuf,
    output: &PathBuf,
    metrics: &[String],
    noise_policy: NoisePolicy,
    pretty: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let raw = read_input(input)?;
    let mut conversations = parse_conversations(&raw)?;

    let mut processor = DynamicsProcessor::with_noise_policy(noise_policy);
    if metrics.is_empty() {
        processor.register_all_metrics();
    } else {
        processor.register_metrics(metrics)?;
    }

    let failures = processor.process_batch(&mut conversations);
    for (id, err) in &failures {
        eprintln!("conversation '{id}' failed: {err}");
    }

    let reports: Vec<_> = conversations
        .iter()
        .filter_map(|c| c.dynamics.as_ref())
        .collect();
    let rendered = if pretty {
        serde_json::to_string_pretty(&reports)?
    } else {
        serde_json::to_string(&reports)?
    };
    write_output(output, &rendered)?;

    if reports.is_empty() && !failures.is_empty() {
        // every conversation failed; surface the first error
        let (_, err) = failures.into_iter().next().expect("non-empty failures");
        return Err(Box::new(err));
    }
    Ok(())
}

/// Accept either a single conversation object or an array of them
fn parse_conversations(raw: &str) -> Result<Vec<Conversation>, DynamicsError> {
    let trimmed = raw.trim_start();
    if trimmed.starts_with('[') {
        Ok(serde_json::from_str(raw)?)
    } else {
        Ok(vec![serde_json::from_str(raw)?])
    }
}

fn read_input(path: &PathBuf) -> io::Result<String> {
    if path.to_str() == Some("-") {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        Ok(buf)
    } else {
        fs::read_to_string(path)
    }
}

fn write_output(path: &PathBuf, content: &str) -> io::Result<()> {
    if path.to_str() == Some("-") {
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        writeln!(handle, "{content}")?;
        Ok(())
    } else {
        fs::write(path, content)
    }
}
