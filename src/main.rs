use clap::{Parser, Subcommand};
use poolwatch::{config::AppConfig, supervisor::Watcher};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Runs the log watcher until interrupted.
    Run,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing subscriber
    let subscriber =
        FmtSubscriber::builder().with_env_filter(EnvFilter::from_default_env()).finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    let cli = Cli::parse();

    match cli.command {
        Commands::Run => run_watcher().await?,
    }

    Ok(())
}

async fn run_watcher() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::new()?;
    tracing::info!(
        log_file = %config.log_file.display(),
        window_size = config.window_size,
        error_rate_threshold = config.error_rate_threshold,
        webhook_configured = config.webhook_url.is_some(),
        "Starting nginx log watcher."
    );

    // A missing log file fails here, before the loop starts.
    let watcher = Watcher::builder().config(config).build().inspect_err(|error| {
        tracing::error!(%error, "Failed to start log watcher.");
    })?;

    let token = watcher.cancellation_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            token.cancel();
        }
    });

    watcher.run().await?;
    tracing::info!("Stopped by user.");

    Ok(())
}
