// src/main.rs

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use dotenvy::dotenv;
use lms_backend::config::Config;
use lms_backend::narrative::HttpTextGenerator;
use lms_backend::routes;
use lms_backend::state::AppState;
use lms_backend::storage::FileStore;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // Load .env file (if present)
    dotenv().ok();

    // Load configuration from environment
    let config = Config::from_env();

    let file_appender = tracing_appender::rolling::daily("logs", "app.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    let env_filter = EnvFilter::new(&config.rust_log);
    let stdout_layer = fmt::layer().with_writer(std::io::stdout).with_target(false);
    let file_layer = fmt::layer().with_writer(non_blocking).with_ansi(false);

    // Initialize Tracing (Logging)
    tracing_subscriber::registry()
        .with(env_filter)
        .with(stdout_layer)
        .with(file_layer)
        .init();

    // Flat-file document store
    std::fs::create_dir_all(&config.data_dir).expect("Failed to create data directory");
    let store = Arc::new(FileStore::new(&config.data_dir));
    tracing::info!("Document store at '{}'", config.data_dir);

    // Text-generation backend client
    let generator = Arc::new(
        HttpTextGenerator::new(
            config.generator_url.clone(),
            Duration::from_secs(config.generator_timeout_secs),
        )
        .expect("Failed to build text-generation client"),
    );
    tracing::info!("Narrative generator at '{}'", config.generator_url);

    // Create AppState
    let state = AppState::new(store, generator, config);

    // Create the Axum application router
    let app = routes::create_router(state);

    // Bind to the listening address
    let addr = SocketAddr::from(([0, 0, 0, 0], 3000));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();

    // Start the server
    axum::serve(listener, app).await.unwrap();
}
