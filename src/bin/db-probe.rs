use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use users_api::config::ObservabilityConfig;
use users_api::observability::logging;
use users_api::probe::{self, ProbeTarget};

#[derive(Parser)]
#[command(name = "db-probe")]
#[command(about = "Wait, then try one database connection and report the result", long_about = None)]
struct Cli {
    #[arg(long, default_value = probe::DEFAULT_HOST)]
    host: String,

    #[arg(long, default_value_t = probe::DEFAULT_PORT)]
    port: u16,

    #[arg(long, default_value = probe::DEFAULT_DATABASE)]
    database: String,

    #[arg(long, default_value = probe::DEFAULT_USER)]
    user: String,

    #[arg(long, default_value = probe::DEFAULT_PASSWORD)]
    password: String,

    /// Seconds to wait before connecting
    #[arg(long, default_value_t = probe::DEFAULT_STARTUP_DELAY.as_secs())]
    delay_secs: u64,

    /// Connect timeout in seconds
    #[arg(long, default_value_t = probe::DEFAULT_CONNECT_TIMEOUT.as_secs())]
    timeout_secs: u64,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let _ = logging::init(&ObservabilityConfig {
        log_level: "warn".to_string(),
        ..ObservabilityConfig::default()
    });

    println!("Starting application...");
    println!(
        "Waiting {} seconds before attempting database connection...",
        cli.delay_secs
    );
    tokio::time::sleep(Duration::from_secs(cli.delay_secs)).await;

    println!("Attempting to connect to database...");

    let target = ProbeTarget {
        host: cli.host,
        port: cli.port,
        database: cli.database,
        user: cli.user,
        password: cli.password,
        connect_timeout: Duration::from_secs(cli.timeout_secs),
    };

    match probe::probe(&target).await {
        Ok(version) => {
            println!("Database version: {}", version);
            ExitCode::SUCCESS
        }
        Err(e) => {
            println!("{}", e.headline());
            println!("Details: {}", e);
            ExitCode::FAILURE
        }
    }
}
