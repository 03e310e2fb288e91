use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub market: MarketConfig,
    pub admin: Option<AdminBootstrap>,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let defaults = MarketConfig::default();
        let market = MarketConfig {
            page_size: numeric_var("MARKET_PAGE_SIZE", defaults.page_size)?,
            unread_cache_ttl: ttl_var(
                "MARKET_UNREAD_CACHE_TTL_SECS",
                defaults.unread_cache_ttl.as_secs(),
                1,
            )?,
            session_ttl: ttl_var(
                "MARKET_SESSION_TTL_HOURS",
                defaults.session_ttl.as_secs() / 3600,
                3600,
            )?,
            channel_capacity: numeric_var("MARKET_CHANNEL_CAPACITY", defaults.channel_capacity)?,
        };

        if market.page_size == 0 {
            return Err(ConfigError::InvalidNumber {
                variable: "MARKET_PAGE_SIZE",
            });
        }
        if market.channel_capacity == 0 {
            return Err(ConfigError::InvalidNumber {
                variable: "MARKET_CHANNEL_CAPACITY",
            });
        }

        let admin = match (
            env::var("MARKET_ADMIN_USERNAME"),
            env::var("MARKET_ADMIN_PHONE"),
        ) {
            (Ok(username), Ok(phone_number)) => Some(AdminBootstrap {
                username,
                phone_number,
            }),
            _ => None,
        };

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            market,
            admin,
        })
    }
}

fn numeric_var<T: std::str::FromStr>(variable: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(variable) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|_| ConfigError::InvalidNumber { variable }),
        Err(_) => Ok(default),
    }
}

/// Longest cache lifetime accepted from the environment (ten years).
pub const MAX_TTL_SECS: u64 = 10 * 365 * 24 * 3600;

/// Duration variable expressed in `unit_secs` units; must be positive and at most `MAX_TTL_SECS`.
fn ttl_var(variable: &'static str, default: u64, unit_secs: u64) -> Result<Duration, ConfigError> {
    let secs = numeric_var(variable, default)?
        .checked_mul(unit_secs)
        .filter(|secs| (1..=MAX_TTL_SECS).contains(secs))
        .ok_or(ConfigError::InvalidNumber { variable })?;
    Ok(Duration::from_secs(secs))
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Marketplace tunables: paging, cache lifetimes and realtime buffering.
#[derive(Debug, Clone)]
pub struct MarketConfig {
    pub page_size: usize,
    pub unread_cache_ttl: Duration,
    pub session_ttl: Duration,
    pub channel_capacity: usize,
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self {
            page_size: 12,
            unread_cache_ttl: Duration::from_secs(300),
            session_ttl: Duration::from_secs(336 * 3600),
            channel_capacity: 64,
        }
    }
}

/// Staff account ensured at startup when both admin variables are present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminBootstrap {
    pub username: String,
    pub phone_number: String,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidNumber { variable: &'static str },
    MissingAdmin,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidNumber { variable } => {
                write!(f, "{variable} must be a positive integer within range")
            }
            ConfigError::MissingAdmin => write!(
                f,
                "admin username and phone are required (MARKET_ADMIN_USERNAME, MARKET_ADMIN_PHONE)"
            ),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort
            | ConfigError::InvalidNumber { .. }
            | ConfigError::MissingAdmin => None,
            ConfigError::InvalidHost { source } => Some(source),
        }
    }
}
