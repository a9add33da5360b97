//! Tradepost - command-line client for the second-hand marketplace
//!
//! Wires the reqwest transport and the credentials file into the
//! authenticated client and runs one command against the backend.

mod commands;

use std::sync::Arc;

use clap::Parser;
use commands::{Client, Commands, Context, Store};
use tradepost_application::{ApiError, SessionEvent};
use tradepost_infrastructure::{
    ClientConfig, FileCredentialStore, ReqwestTransport, TokioFileSystem,
};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "tradepost")]
#[command(about = "Command-line client for the Tradepost marketplace")]
#[command(version)]
struct Cli {
    /// Backend base URL (overrides TRADEPOST_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Log filter used when RUST_LOG is not set
    #[arg(short = 'l', long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Logs go to stderr so command output stays pipeable
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level)))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let mut config = ClientConfig::from_env()?;
    if let Some(url) = &cli.api_url {
        config = config.with_base_url(url)?;
    }
    tracing::debug!(
        base_url = %config.base_url,
        "starting tradepost v{}",
        env!("CARGO_PKG_VERSION")
    );

    let transport = Arc::new(ReqwestTransport::new(&config)?);
    let store: Arc<Store> = Arc::new(FileCredentialStore::new(
        TokioFileSystem::new(),
        config.credentials_path.clone(),
    ));
    let client = Arc::new(Client::with_options(
        transport,
        Arc::clone(&store),
        config.client_options(),
    ));
    let mut events = client.subscribe();

    let result = cli.command.execute(Context { client, store }).await;

    while let Ok(event) = events.try_recv() {
        report_event(&event);
    }

    if let Err(err) = result {
        report_error(&err);
        std::process::exit(1);
    }
    Ok(())
}

fn report_event(event: &SessionEvent) {
    match event {
        SessionEvent::TokenRefreshed { token_preview } => {
            tracing::info!(%token_preview, "access token refreshed");
        }
        SessionEvent::Invalidated { reason } => {
            tracing::warn!(%reason, "session invalidated");
        }
        SessionEvent::LoggedIn { .. } | SessionEvent::LoggedOut => {}
    }
    if event.requires_login() {
        eprintln!("Your session has ended. Run `tradepost login` to sign in again.");
    }
}

fn report_error(err: &ApiError) {
    eprintln!("error: {}", err.user_message("Request failed"));
    for (field, messages) in err.field_errors() {
        eprintln!("  {field}: {}", messages.join(" "));
    }
}
