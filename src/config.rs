use std::env;
use std::net::SocketAddr;

/// Which credential store backs the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Redis,
    Memory,
}

impl std::str::FromStr for StorageBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "redis" => Ok(StorageBackend::Redis),
            "memory" => Ok(StorageBackend::Memory),
            other => Err(format!("unknown storage backend '{}'", other)),
        }
    }
}

#[derive(Clone)]
pub struct Config {
    // Token signing
    pub jwt_secret: String,
    pub jwt_expires_in_secs: u64,

    // Session cookie
    pub jwt_cookie_expires_in_days: i64,
    pub production: bool,

    // Storage
    pub storage_backend: StorageBackend,
    pub redis_url: Option<String>,

    // Server
    pub bind_addr: SocketAddr,
    pub max_body_bytes: usize,
    pub cors_origin: Option<String>,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("jwt_secret", &"[REDACTED]")
            .field("jwt_expires_in_secs", &self.jwt_expires_in_secs)
            .field(
                "jwt_cookie_expires_in_days",
                &self.jwt_cookie_expires_in_days,
            )
            .field("production", &self.production)
            .field("storage_backend", &self.storage_backend)
            .field("redis_url", &self.redis_url.as_ref().map(|_| "[REDACTED]"))
            .field("bind_addr", &self.bind_addr)
            .field("max_body_bytes", &self.max_body_bytes)
            .field("cors_origin", &self.cors_origin)
            .finish()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(String),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),

    #[error("Failed to parse {0}: {1}")]
    ParseError(String, String),
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        // Attempt to load .env file, but don't fail if it doesn't exist
        // (env vars may be set directly in production)
        let _ = dotenvy::dotenv();

        let jwt_secret = env::var("JWT_SECRET")
            .map_err(|_| ConfigError::MissingVar("JWT_SECRET".to_string()))?;
        if jwt_secret.is_empty() {
            return Err(ConfigError::InvalidValue(
                "JWT_SECRET".to_string(),
                "cannot be empty".to_string(),
            ));
        }

        let jwt_expires_in = env::var("JWT_EXPIRES_IN").unwrap_or_else(|_| "90d".to_string());
        let jwt_expires_in_secs = parse_duration_secs(&jwt_expires_in)
            .map_err(|e| ConfigError::ParseError("JWT_EXPIRES_IN".to_string(), e))?;

        let jwt_cookie_expires_in_days: i64 = parse_env_or_default("JWT_COOKIE_EXPIRES_IN", 90)?;
        if jwt_cookie_expires_in_days <= 0 {
            return Err(ConfigError::InvalidValue(
                "JWT_COOKIE_EXPIRES_IN".to_string(),
                "must be a positive number of days".to_string(),
            ));
        }

        let app_env = env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());
        let production = app_env.eq_ignore_ascii_case("production");

        let storage_backend: StorageBackend =
            parse_env_or_default("STORAGE_BACKEND", StorageBackend::Redis)?;

        // Redis is only required when it backs the credential store
        let redis_url = env::var("REDIS_URL").ok().filter(|s| !s.is_empty());
        if storage_backend == StorageBackend::Redis && redis_url.is_none() {
            return Err(ConfigError::MissingVar("REDIS_URL".to_string()));
        }

        let bind_addr_str = env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
        let bind_addr = bind_addr_str
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::ParseError("BIND_ADDR".to_string(), e.to_string()))?;

        let max_body_bytes = parse_env_or_default("MAX_BODY_BYTES", 65_536)?;

        let cors_origin = env::var("CORS_ORIGIN")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        Ok(Config {
            jwt_secret,
            jwt_expires_in_secs,
            jwt_cookie_expires_in_days,
            production,
            storage_backend,
            redis_url,
            bind_addr,
            max_body_bytes,
            cors_origin,
        })
    }
}

/// Parse a lifetime such as `90d`, `12h`, `30m`, `45s` or a bare number of seconds.
pub fn parse_duration_secs(value: &str) -> Result<u64, String> {
    let value = value.trim();
    let (digits, multiplier) = match value.chars().last() {
        Some('d') => (&value[..value.len() - 1], 86_400),
        Some('h') => (&value[..value.len() - 1], 3_600),
        Some('m') => (&value[..value.len() - 1], 60),
        Some('s') => (&value[..value.len() - 1], 1),
        Some(c) if c.is_ascii_digit() => (value, 1),
        _ => return Err(format!("invalid duration '{}'", value)),
    };

    let amount = digits
        .parse::<u64>()
        .map_err(|e| format!("{}: {}", e, value))?;
    if amount == 0 {
        return Err(format!("duration must be positive: {}", value));
    }

    amount
        .checked_mul(multiplier)
        .ok_or_else(|| format!("duration overflows: {}", value))
}

/// Helper function to parse environment variable with a default value
fn parse_env_or_default<T>(key: &str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(val) => val
            .parse::<T>()
            .map_err(|e| ConfigError::ParseError(key.to_string(), format!("{}: {}", e, val))),
        Err(_) => Ok(default),
    }
}
