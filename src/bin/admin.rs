//! nlpwire Admin Client
//!
//! Queries the service's administrative socket.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

/// nlpwire admin
#[derive(Parser, Debug)]
#[command(name = "nlpwire-admin")]
#[command(about = "Administrative queries for the text-analysis service")]
#[command(version)]
struct Args {
    /// Administrative UNIX socket
    #[arg(short, long, default_value = nlpwire::config::DEFAULT_ADMIN_SOCKET)]
    socket: String,

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
    /// List connected clients
    Clients,

    /// Show processing queue occupancy
    QueueStatus,
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
    run(args)
}

#[cfg(unix)]
fn run(args: Args) -> ExitCode {
    use nlpwire::client::AdminClient;
    use nlpwire::protocol::admin::{AdminCommand, AdminResponse};
    use nlpwire::ClientConfig;

    let command = match args.command {
        Commands::Clients => AdminCommand::Clients,
        Commands::QueueStatus => AdminCommand::QueueStatus,
    };

    let config = ClientConfig::builder()
        .admin_socket_path(&args.socket)
        .io_timeout_ms(args.timeout_ms)
        .build();
    let client = AdminClient::from_config(&config);
    tracing::debug!("Querying {}", client.socket_path().display());

    let response = match client.query(command) {
        Ok(r) => r,
        Err(e) => {
            tracing::error!("Admin query failed: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if args.json {
        let report = serde_json::json!({ "command": command, "response": response });
        return match serde_json::to_string_pretty(&report) {
            Ok(json) => {
                println!("{}", json);
                ExitCode::SUCCESS
            }
            Err(e) => {
                tracing::error!("Cannot render response: {}", e);
                ExitCode::FAILURE
            }
        };
    }

    match response {
        AdminResponse::Success(report) => {
            match command {
                AdminCommand::Clients => {
                    println!("Connected clients: {}", report.clients.len());
                    println!("{:<5} {:<20} {:<25} {:<15}", "ID", "Address", "Connected at (unix)", "Requests");
                    println!("{}", "-".repeat(61));
                    for (i, client) in report.clients.iter().enumerate() {
                        println!(
                            "{:<5} {:<20} {:<25} {:<15}",
                            i + 1,
                            client.address,
                            client.connect_time,
                            client.request_count
                        );
                    }
                }
                AdminCommand::QueueStatus => {
                    println!("Processing queue:");
                    println!(
                        "Pending requests: {} / {}",
                        report.queue_size, report.queue_capacity
                    );
                }
            }
            ExitCode::SUCCESS
        }
        AdminResponse::Failure { message } => {
            eprintln!("Server error: {}", message);
            ExitCode::FAILURE
        }
    }
}

#[cfg(not(unix))]
fn run(_args: Args) -> ExitCode {
    tracing::error!("The administrative socket is only available on UNIX platforms");
    ExitCode::FAILURE
}
