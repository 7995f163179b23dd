//! ImpactSpark - Entry Point
//!
//! Serves the dashboard over HTTP (default) or JSON lines over stdio.

use clap::Parser;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use impactspark::{config::Config, server::DashboardServer};

#[derive(Parser, Debug)]
#[command(name = "impactspark")]
#[command(about = "Scholarly impact dashboard over OpenAlex and Crossref")]
#[command(version)]
struct Cli {
    /// Contact email for the OpenAlex/Crossref polite pools
    #[arg(long, env = "USER_EMAIL")]
    user_email: Option<String>,

    /// Transport mode: http or stdio
    #[arg(long, default_value = "http")]
    transport: Transport,

    /// Address to bind (only used with --transport http)
    #[arg(long, env = "IMPACTSPARK_HOST")]
    host: Option<String>,

    /// HTTP server port (only used with --transport http)
    #[arg(long, env = "IMPACTSPARK_PORT")]
    port: Option<u16>,

    /// Maximum publications enriched per request
    #[arg(long, env = "IMPACTSPARK_MAX_ENRICH")]
    max_enrich_items: Option<usize>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", env = "RUST_LOG")]
    log_level: String,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,
}

#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
enum Transport {
    /// Dashboard page and JSON API
    #[default]
    Http,
    /// JSON lines over standard input/output
    Stdio,
}

fn init_tracing(log_level: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    let subscriber = tracing_subscriber::registry().with(filter);

    // Logs go to stderr so stdio mode keeps stdout for responses
    if json {
        subscriber.with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr)).init();
    } else {
        subscriber.with(tracing_subscriber::fmt::layer().compact().with_writer(std::io::stderr)).init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_tracing(&cli.log_level, cli.json_logs);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        transport = ?cli.transport,
        "Starting ImpactSpark"
    );

    let mut config = Config::from_env()?;
    if let Some(email) = cli.user_email {
        config.user_email = email;
    }
    if let Some(host) = cli.host {
        config.host = host;
    }
    if let Some(port) = cli.port {
        config.port = port;
    }
    if let Some(max) = cli.max_enrich_items {
        config.max_enrich_items = max.max(1);
    }

    if !config.has_contact_email() {
        tracing::warn!("No USER_EMAIL set; requests use the shared pool and may be throttled");
    }

    let server = DashboardServer::new(config)?;

    match cli.transport {
        Transport::Http => server.run_http().await?,
        Transport::Stdio => {
            tracing::info!("Running in stdio mode");
            server.run_stdio().await?;
        }
    }

    Ok(())
}
