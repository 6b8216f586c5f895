//! nlpwire CLI Client
//!
//! Sends a text file to the analysis service and prints the result.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use nlpwire::{ClientConfig, NlpError, ProtocolClient, Request, RequestKind, Response};
use tracing_subscriber::{fmt, EnvFilter};

/// nlpwire CLI
#[derive(Parser, Debug)]
#[command(name = "nlpwire-cli")]
#[command(about = "Client for the text-analysis service")]
#[command(version)]
struct Args {
    /// Server address (host:port)
    #[arg(short, long, default_value = "127.0.0.1:12345")]
    server: String,

    /// Read/write timeout in milliseconds (0 = wait indefinitely)
    #[arg(short, long, default_value = "0")]
    timeout_ms: u64,

    /// Print the decoded response as JSON
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Count the words in a file
    CountWords {
        /// Text file to analyze
        file: PathBuf,
    },

    /// Determine the topic of a file
    DetermineTopic {
        /// Text file to analyze
        file: PathBuf,
    },

    /// Generate a summary of a file
    GenerateSummary {
        /// Text file to analyze
        file: PathBuf,
    },
}

impl Commands {
    fn kind_and_file(&self) -> (RequestKind, &PathBuf) {
        match self {
            Commands::CountWords { file } => (RequestKind::CountWords, file),
            Commands::DetermineTopic { file } => (RequestKind::DetermineTopic, file),
            Commands::GenerateSummary { file } => (RequestKind::GenerateSummary, file),
        }
    }
}

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,nlpwire=info"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let (kind, file) = args.command.kind_and_file();

    let request = match Request::from_file(kind, file) {
        Ok(r) => r,
        Err(e) => {
            tracing::error!("Cannot load {}: {}", file.display(), e);
            return ExitCode::FAILURE;
        }
    };

    let config = ClientConfig::builder()
        .server_addr(&args.server)
        .io_timeout_ms(args.timeout_ms)
        .build();
    let client = ProtocolClient::new(config);

    tracing::info!("Sending {} request for {} to {}", kind, file.display(), args.server);

    let response = match client.exchange(&request) {
        Ok(r) => r,
        Err(e) => {
            report_core_error(&e);
            return ExitCode::FAILURE;
        }
    };

    if args.json {
        let report = serde_json::json!({ "kind": kind, "response": response });
        match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                tracing::error!("Cannot render response: {}", e);
                return ExitCode::FAILURE;
            }
        }
        return if response.is_success() {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        };
    }

    match response {
        Response::Success(analysis) => {
            match kind {
                RequestKind::CountWords => {
                    println!("Word count: {}", analysis.word_count);
                }
                RequestKind::DetermineTopic => {
                    println!("Topic: {}", analysis.topic.as_deref().unwrap_or("Unknown"));
                }
                RequestKind::GenerateSummary => {
                    println!("Summary:");
                    println!(
                        "{}",
                        analysis
                            .summary
                            .as_deref()
                            .unwrap_or("No summary could be generated")
                    );
                }
            }
            println!("Processing time: {:.3} seconds", analysis.processing_time_secs);
            ExitCode::SUCCESS
        }
        Response::Failure { message } => {
            eprintln!("Server error: {}", message);
            ExitCode::FAILURE
        }
    }
}

/// Report a network or protocol failure (as opposed to a server-side one)
fn report_core_error(err: &NlpError) {
    match err {
        NlpError::Connection { .. } => tracing::error!("Communication error: {}", err),
        NlpError::ProtocolViolation(_) => {
            tracing::error!("Communication error (bad response): {}", err)
        }
        e if e.is_io() => tracing::error!("Communication error: {}", e),
        e => tracing::error!("{}", e),
    }
}
