//! Environment-driven configuration.

use std::time::Duration;

/// Runtime configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub jwt_secret: String,
    pub port: u16,
    pub request_timeout: Duration,
    pub token_ttl: chrono::Duration,
    pub bcrypt_cost: u32,
}

impl Config {
    pub fn from_env() -> Self {
        let jwt_secret = std::env::var("JWT_SECRET").unwrap_or_else(|_| {
            tracing::warn!("JWT_SECRET not set; using insecure dev default");
            "dev-secret".to_string()
        });

        let port = env_parse("PORT", 3000);
        let request_timeout = Duration::from_secs(env_parse("REQUEST_TIMEOUT_SECS", 30));
        let token_ttl = chrono::Duration::minutes(env_parse("TOKEN_TTL_MINUTES", 60 * 24 * 7));
        let bcrypt_cost = env_parse("BCRYPT_COST", 10);

        Self {
            jwt_secret,
            port,
            request_timeout,
            token_ttl,
            bcrypt_cost,
        }
    }
}

fn env_parse<T: std::str::FromStr + Copy>(name: &str, default: T) -> T {
    match std::env::var(name) {
        Ok(raw) => raw.parse().unwrap_or_else(|_| {
            tracing::warn!(name, %raw, "unparseable environment value; using default");
            default
        }),
        Err(_) => default,
    }
}
