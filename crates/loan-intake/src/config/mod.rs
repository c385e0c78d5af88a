use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};

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
    pub intake: IntakeConfig,
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

        let progress_percent_per_minute = match env::var("INTAKE_PROGRESS_PERCENT_PER_MINUTE") {
            Ok(raw) => raw
                .trim()
                .parse::<u32>()
                .ok()
                .filter(|rate| (1..=100).contains(rate))
                .ok_or(ConfigError::InvalidProgressRate { value: raw })?,
            Err(_) => IntakeConfig::DEFAULT_PROGRESS_PERCENT_PER_MINUTE,
        };
        let default_checker_email = env::var("INTAKE_DEFAULT_CHECKER_EMAIL")
            .unwrap_or_else(|_| IntakeConfig::DEFAULT_CHECKER_EMAIL.to_string());

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            intake: IntakeConfig {
                progress_percent_per_minute,
                default_checker_email,
            },
        })
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

/// Tracing and metrics controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Knobs for the simulated document pipeline and approval defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntakeConfig {
    /// Simulated processing speed; a document completes after `100 / rate` minutes.
    pub progress_percent_per_minute: u32,
    /// Assignee used when a workflow is started without a checker.
    pub default_checker_email: String,
}

impl IntakeConfig {
    pub const DEFAULT_PROGRESS_PERCENT_PER_MINUTE: u32 = 20;
    pub const DEFAULT_CHECKER_EMAIL: &'static str = "checker@example.com";
}

impl Default for IntakeConfig {
    fn default() -> Self {
        Self {
            progress_percent_per_minute: Self::DEFAULT_PROGRESS_PERCENT_PER_MINUTE,
            default_checker_email: Self::DEFAULT_CHECKER_EMAIL.to_string(),
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidProgressRate { value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidProgressRate { value } => write!(
                f,
                "INTAKE_PROGRESS_PERCENT_PER_MINUTE must be between 1 and 100, got '{value}'"
            ),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort | ConfigError::InvalidProgressRate { .. } => None,
            ConfigError::InvalidHost { source } => Some(source),
        }
    }
}
