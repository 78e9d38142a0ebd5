use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use grid_marshal::config::Config;
use grid_marshal::discord::DiscordClient;
use grid_marshal::notify::WebhookNotifier;
use grid_marshal::poller::{run_poll_worker, TickRunner};
use grid_marshal::server::build_router;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "grid_marshal=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("configuration error: {e}");
            std::process::exit(1);
        }
    };

    let http = match reqwest::Client::builder()
        .timeout(config.http_timeout)
        .build()
    {
        Ok(http) => http,
        Err(e) => {
            eprintln!("failed to build HTTP client: {e}");
            std::process::exit(1);
        }
    };

    let discord = DiscordClient::new(
        http.clone(),
        config.discord_token.clone(),
        config.channel_id.clone(),
    );
    let notifier = config
        .webhook_url
        .clone()
        .map(|url| WebhookNotifier::new(http, url));
    if notifier.is_none() {
        info!("no webhook configured, roster changes will only update the status message");
    }

    let listen_port = config.listen_port;
    let runner = Arc::new(TickRunner::new(config, discord, notifier));

    let cancel = CancellationToken::new();
    let worker = tokio::spawn(run_poll_worker(Arc::clone(&runner), cancel.clone()));

    let app = build_router(runner);
    let addr = SocketAddr::from(([0, 0, 0, 0], listen_port));
    let listener = match TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!(%addr, error = %e, "failed to bind");
            std::process::exit(1);
        }
    };
    info!(%addr, "listening");

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(cancel.clone()))
        .await
    {
        error!(error = %e, "server error");
    }

    // Stop the poll worker and wait for any in-flight tick to finish.
    cancel.cancel();
    if let Err(e) = worker.await {
        error!(error = %e, "poll worker panicked");
    }
}

async fn shutdown_signal(cancel: CancellationToken) {
    if tokio::signal::ctrl_c().await.is_err() {
        error!("failed to install the shutdown signal handler");
        cancel.cancelled().await;
        return;
    }
    info!("shutdown signal received");
    cancel.cancel();
}
