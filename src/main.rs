use dotenv::dotenv;
use lifelink_backend::util::logger::Logger;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // File logging with console fallback; the guards must stay alive for the
    // lifetime of the process.
    let _logger = match Logger::new() {
        Ok(logger) => Some(logger),
        Err(e) => {
            let env_filter = EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("debug"));
            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_target(true)
                .with_thread_ids(true)
                .with_level(true)
                .with_ansi(true)
                .init();
            warn!("⚠️ File logging unavailable ({}), using console only", e);
            None
        }
    };

    info!("🚀 Starting LifeLink Backend Application");

    // Load environment variables from .env file
    match dotenv() {
        Ok(_) => info!("✅ Successfully loaded .env file"),
        Err(e) => warn!("⚠️ Failed to load .env file: {} (using system env vars)", e),
    }

    // Create and start the App
    let app = lifelink_backend::app::app::App::new().await;
    app.start().await;
}
