mod bubble;
mod chat;
mod scroll;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("invalid pacing: {0}")]
    Pacing(#[from] choreo::PacingError),
    #[error("relay setup failed: {0}")]
    Relay(#[from] relay::RelayError),
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("health check failed with HTTP {0}")]
    Unhealthy(u16),
    #[error("terminal I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON encoding failed: {0}")]
    Json(#[from] serde_json::Error),
    #[error("--steps must be at least 1")]
    NoSteps,
}

#[derive(Parser, Debug)]
#[command(name = "marmalade-cli", about = "Nuclear Marmalade site tools: chat with Nuke, preview the case-study scroll")]
struct Cli {
    #[arg(long, env = "MARMALADE_BASE_URL", default_value = "http://127.0.0.1:3001")]
    base_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check that the site server is up.
    Ping,
    /// Talk to the mascot through a running site server.
    Chat(ChatArgs),
    /// Simulate scrolling through the case-study gallery.
    Scroll(ScrollArgs),
}

#[derive(Args, Debug)]
struct ChatArgs {
    /// Turns of context sent with each message, the new one included.
    #[arg(long, default_value_t = relay::config::DEFAULT_HISTORY_WINDOW)]
    history_window: usize,
}

#[derive(Args, Debug)]
struct ScrollArgs {
    /// Scroll samples from top to bottom of the gallery.
    #[arg(long, default_value_t = 10)]
    steps: u32,

    /// Number of case-study panels.
    #[arg(long, default_value_t = choreo::consts::DEFAULT_SEGMENTS)]
    segments: usize,

    /// Fraction of each segment spent holding before the transition.
    #[arg(long, default_value_t = choreo::consts::DEFAULT_HOLD_FRACTION)]
    hold: f64,

    /// Scrollable height of the gallery wrapper, in pixels.
    #[arg(long, default_value_t = 2000.0)]
    height: f64,

    /// Emit one JSON object per sample instead of a table.
    #[arg(long, default_value_t = false)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Ping => run_ping(&cli.base_url).await,
        Command::Chat(args) => chat::run(&cli.base_url, args).await,
        Command::Scroll(args) => scroll::run(args),
    }
}

async fn run_ping(base_url: &str) -> Result<(), CliError> {
    let client = reqwest::Client::new();
    let url = format!("{}/healthz", base_url.trim_end_matches('/'));
    let response = client.get(url).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(CliError::Unhealthy(status.as_u16()));
    }
    println!("ok");
    Ok(())
}
