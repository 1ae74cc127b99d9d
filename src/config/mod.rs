use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};

use crate::booking::pricing::{PricingConfig, PricingConfigError};

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn parse(value: &str) -> Self {
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
    pub pricing: PricingConfig,
    /// Optional CSV distance table (`outward_code,distance_miles`).
    pub distance_table_path: Option<String>,
    /// Optional CSV file the booking export sink appends to.
    pub booking_export_path: Option<String>,
}

fn env_or(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let port = env_or("FRESHQUOTE_PORT", "8080")
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidNumber {
                name: "FRESHQUOTE_PORT",
            })?;

        let pricing = load_pricing()?;
        pricing.validate().map_err(ConfigError::Pricing)?;

        Ok(Self {
            environment: AppEnvironment::parse(&env_or("FRESHQUOTE_ENV", "development")),
            server: ServerConfig {
                host: env_or("FRESHQUOTE_HOST", "127.0.0.1"),
                port,
            },
            telemetry: TelemetryConfig {
                log_level: env_or("FRESHQUOTE_LOG", "info"),
            },
            pricing,
            distance_table_path: env::var("QUOTE_DISTANCE_TABLE").ok(),
            booking_export_path: env::var("BOOKING_EXPORT_CSV").ok(),
        })
    }
}

/// Standard rate card with each value individually overridable from the
/// environment. The quote engine itself never reads the environment.
fn load_pricing() -> Result<PricingConfig, ConfigError> {
    let mut pricing = PricingConfig::standard();

    if let Some(rate) = env_f64("QUOTE_PER_ROOM_RATE")? {
        pricing.per_room_rate = rate;
    }
    if let Some(rate) = env_f64("QUOTE_PER_SQM_RATE")? {
        pricing.per_sqm_rate = rate;
    }
    if let Some(rate) = env_f64("QUOTE_STAIN_REMOVAL_RATE")? {
        pricing.stain_removal_flat_rate = rate;
    }
    if let Some(area) = env_f64("QUOTE_DEFAULT_AREA_SQM")? {
        pricing.default_assumed_area_sqm = area;
    }
    if let Some(radius) = env_f64("QUOTE_FREE_RADIUS_MILES")? {
        pricing.free_radius_miles = radius;
    }
    if let Some(rate) = env_f64("QUOTE_PER_MILE_RATE")? {
        pricing.per_mile_rate = rate;
    }
    if let Some(radius) = env_f64("QUOTE_MAX_RADIUS_MILES")? {
        pricing.max_service_radius_miles = radius;
    }

    Ok(pricing)
}

fn env_f64(name: &'static str) -> Result<Option<f64>, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse::<f64>()
            .map(Some)
            .map_err(|_| ConfigError::InvalidNumber { name }),
        Err(_) => Ok(None),
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        // "localhost" is accepted as a convenience alias.
        let ip: IpAddr = if self.host.eq_ignore_ascii_case("localhost") {
            IpAddr::from([127, 0, 0, 1])
        } else {
            self.host
                .parse()
                .map_err(|source| ConfigError::InvalidHost { source })?
        };

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing and metrics controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidNumber { name: &'static str },
    InvalidHost { source: std::net::AddrParseError },
    Pricing(PricingConfigError),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidNumber { name } => {
                write!(f, "{name} must parse to a number")
            }
            ConfigError::InvalidHost { .. } => {
                write!(f, "FRESHQUOTE_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::Pricing(err) => write!(f, "pricing configuration invalid: {err}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidNumber { .. } => None,
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::Pricing(err) => Some(err),
        }
    }
}
