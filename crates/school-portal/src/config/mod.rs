use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};

/// Token used when `APP_ADMIN_TOKEN` is unset. Refused in production.
pub const DEFAULT_ADMIN_TOKEN: &str = "portal-admin-dev-token";

const DEFAULT_MAX_UNIT_LOAD: u16 = 24;
const DEFAULT_MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

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
    pub admin: AdminConfig,
    pub portal: PortalConfig,
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

        let public_url = env::var("APP_PUBLIC_URL")
            .unwrap_or_else(|_| format!("http://{host}:{port}"))
            .trim_end_matches('/')
            .to_string();

        let max_unit_load = parse_number("APP_MAX_UNIT_LOAD", DEFAULT_MAX_UNIT_LOAD)?;
        if max_unit_load == 0 {
            return Err(ConfigError::InvalidNumber {
                key: "APP_MAX_UNIT_LOAD",
            });
        }
        let max_upload_bytes = parse_number("APP_MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES)?;

        let admin = AdminConfig {
            email: env::var("APP_ADMIN_EMAIL").unwrap_or_else(|_| "admin@demo.com".to_string()),
            password: env::var("APP_ADMIN_PASSWORD").unwrap_or_else(|_| "admin".to_string()),
            token: env::var("APP_ADMIN_TOKEN").unwrap_or_else(|_| DEFAULT_ADMIN_TOKEN.to_string()),
            reviewer: env::var("APP_ADMIN_REVIEWER").unwrap_or_else(|_| "registrar".to_string()),
        };

        if environment == AppEnvironment::Production && admin.token == DEFAULT_ADMIN_TOKEN {
            return Err(ConfigError::DefaultAdminToken);
        }

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            admin,
            portal: PortalConfig {
                public_url,
                max_unit_load,
                max_upload_bytes,
            },
        })
    }
}

fn parse_number<T: std::str::FromStr>(key: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|_| ConfigError::InvalidNumber { key }),
        Err(_) => Ok(default),
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

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Credentials for the single administrator account and the bearer token it is issued.
#[derive(Clone)]
pub struct AdminConfig {
    pub email: String,
    pub password: String,
    pub token: String,
    pub reviewer: String,
}

impl fmt::Debug for AdminConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdminConfig")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("token", &"<redacted>")
            .field("reviewer", &self.reviewer)
            .finish()
    }
}

/// Limits and addressing used by the portal workflows.
#[derive(Debug, Clone)]
pub struct PortalConfig {
    /// Base URL prefixed to blob references handed back to clients.
    pub public_url: String,
    /// Ceiling on the summed units of one course registration.
    pub max_unit_load: u16,
    pub max_upload_bytes: usize,
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            public_url: "http://127.0.0.1:3000".to_string(),
            max_unit_load: DEFAULT_MAX_UNIT_LOAD,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidNumber { key: &'static str },
    DefaultAdminToken,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must be an IP address or 'localhost'")
            }
            ConfigError::InvalidNumber { key } => {
                write!(f, "{key} must be a positive integer")
            }
            ConfigError::DefaultAdminToken => {
                write!(f, "APP_ADMIN_TOKEN must be set in production")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::InvalidNumber { .. }
            | ConfigError::DefaultAdminToken => None,
        }
    }
}
