use std::env;

use tracing::info;

/// HTTP bind address for the LifeLink API server.
///
/// Defaults to `127.0.0.1:8080` so a bare `cargo run` serves locally
/// without any environment setup.
pub struct AppConfig {
    pub host: String,
    pub port: u16,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(8080);
        info!("LifeLink server configured for {}:{}", host, port);
        AppConfig { host, port }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_env() {
        env::remove_var("APP_HOST");
        env::remove_var("APP_PORT");
        let config = AppConfig::from_env();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 8080);
    }
}
