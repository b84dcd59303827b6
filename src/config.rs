use std::net::IpAddr;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: Option<String>,
    pub managed: Option<ManagedConfig>,
    pub host: IpAddr,
    pub port: u16,
    pub max_body_size: usize,
    pub log_level: String,
}

/// Credentials for the managed (Supabase-style) backend. Both values must be
/// present for the backend to be considered configured.
#[derive(Debug, Clone)]
pub struct ManagedConfig {
    pub url: String,
    pub service_key: String,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        let database_url = std::env::var("DATABASE_URL").ok().filter(|s| !s.is_empty());

        // SUPABASE_KEY is accepted as a legacy alias for the service key.
        let managed = match (
            std::env::var("SUPABASE_URL").ok().filter(|s| !s.is_empty()),
            std::env::var("SUPABASE_SERVICE_KEY")
                .or_else(|_| std::env::var("SUPABASE_KEY"))
                .ok()
                .filter(|s| !s.is_empty()),
        ) {
            (Some(url), Some(service_key)) => Some(ManagedConfig { url, service_key }),
            _ => None,
        };

        let host: IpAddr = env_or("MARKBOX_HOST", "0.0.0.0")
            .parse()
            .map_err(|e| format!("Invalid MARKBOX_HOST: {e}"))?;

        let port: u16 = env_or("MARKBOX_PORT", "5000")
            .parse()
            .map_err(|e| format!("Invalid MARKBOX_PORT: {e}"))?;

        let max_body_size: usize = env_or("MARKBOX_MAX_BODY_SIZE", "1048576")
            .parse()
            .map_err(|e| format!("Invalid MARKBOX_MAX_BODY_SIZE: {e}"))?;

        let log_level = env_or("MARKBOX_LOG_LEVEL", "info");

        Ok(Config {
            database_url,
            managed,
            host,
            port,
            max_body_size,
            log_level,
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
