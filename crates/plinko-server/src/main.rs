use std::sync::Arc;

use anyhow::Result;
use axum::extract::DefaultBodyLimit;
use clap::Parser;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

mod cli;
mod config;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("plinko=info,tower_http=debug")),
        )
        .init();

    let args = cli::Args::parse();
    let mut config = config::Config::load(&args.config)?;
    if let Some(bind) = args.bind_address {
        config.server.bind_address = bind;
    }

    let gateway = plinko_discord::DiscordClient::new(
        config.discord.token.clone(),
        config.discord.application_id.clone(),
    )?;

    let state = plinko_core::AppState {
        store: Arc::new(plinko_core::PollStore::new()),
        gateway: Arc::new(gateway),
        config: plinko_core::AppConfig {
            poll_page_url: config.web.poll_page_url.clone(),
        },
    };

    let app = plinko_api::build_router()
        .with_state(state)
        .layer(DefaultBodyLimit::max(config.server.max_upload_size))
        .layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind(&config.server.bind_address).await?;
    print_startup_banner(&config);

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    println!();
    tracing::info!("Shutting down...");
}

fn print_startup_banner(config: &config::Config) {
    println!();
    println!("  plinko poll");
    println!();
    println!("  Listening:   http://{}", config.server.bind_address);
    println!("  Poll page:   {}", config.web.poll_page_url);
    println!();
}
