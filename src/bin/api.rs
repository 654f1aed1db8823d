use std::net::SocketAddr;
use std::sync::Arc;

use next_actions::config::ApiConfig;
use next_actions::server::{self, ApiState};
use next_actions::trello::client::Client;
use next_actions::trello::fetcher::Fetcher;

#[tokio::main]
async fn main() {
    systemd_journal_logger::JournalLog::new()
        .unwrap()
        .with_syslog_identifier("next-actions-api".to_string())
        .install()
        .unwrap();
    log::set_max_level(log::LevelFilter::Info);

    let config = match ApiConfig::from_environment() {
        Ok(config) => config,
        Err(e) => {
            log::error!("{}", e);
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };

    let client = Client::new(&config.trello_key, &config.trello_token);
    let fetcher = Fetcher::new(
        client,
        &config.next_actions_list_id,
        &config.projects_list_id,
    );
    let state = Arc::new(ApiState { fetcher });

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            log::error!("Failed to bind {}: {}", addr, e);
            std::process::exit(1);
        }
    };

    log::info!("Listening on port {}", config.port);

    if let Err(e) = axum::serve(listener, server::router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        log::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    log::info!("Shutting down");
}
