use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

use reqwest::Url;

use crate::forms::Endpoints;

/// Public spreadsheet endpoint collecting meeting check-ins.
pub const DEFAULT_ATTENDANCE_ENDPOINT: &str =
    "https://sheets.livepolls.app/api/spreadsheets/0dc2d533-238d-4ac1-a923-729d22ef9eb3/attendance";

/// District domain used by student school accounts.
pub const DEFAULT_SCHOOL_DOMAIN: &str = "houstonisd.org";

type UrlParseError = <Url as FromStr>::Err;

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
    pub forms: FormsConfig,
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

        let school_domain = env::var("SCHOOL_EMAIL_DOMAIN")
            .unwrap_or_else(|_| DEFAULT_SCHOOL_DOMAIN.to_string())
            .trim()
            .to_ascii_lowercase();
        if school_domain.is_empty() || school_domain.contains(char::is_whitespace) {
            return Err(ConfigError::InvalidSchoolDomain);
        }

        let attendance = parse_endpoint(
            "ATTENDANCE_ENDPOINT",
            &env::var("ATTENDANCE_ENDPOINT")
                .unwrap_or_else(|_| DEFAULT_ATTENDANCE_ENDPOINT.to_string()),
        )?;
        let signup = match env::var("SIGN_UP_API_KEY") {
            Ok(raw) if !raw.trim().is_empty() => Some(parse_endpoint("SIGN_UP_API_KEY", &raw)?),
            _ => None,
        };

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig {
                log_level,
                ansi: environment == AppEnvironment::Development,
            },
            forms: FormsConfig {
                school_domain,
                endpoints: Endpoints { attendance, signup },
            },
        })
    }
}

fn parse_endpoint(variable: &'static str, raw: &str) -> Result<Url, ConfigError> {
    Url::parse(raw.trim()).map_err(|source| ConfigError::InvalidEndpoint { variable, source })
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

/// Tracing controls. Colored output is only enabled for local development.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
    pub ansi: bool,
}

/// Validation and delivery settings for the club forms.
#[derive(Debug, Clone)]
pub struct FormsConfig {
    pub school_domain: String,
    pub endpoints: Endpoints,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidSchoolDomain,
    InvalidEndpoint {
        variable: &'static str,
        source: UrlParseError,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidSchoolDomain => {
                write!(f, "SCHOOL_EMAIL_DOMAIN must be a non-empty domain name")
            }
            ConfigError::InvalidEndpoint { variable, .. } => {
                write!(f, "{variable} must be an absolute URL")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort | ConfigError::InvalidSchoolDomain => None,
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidEndpoint { source, .. } => Some(source),
        }
    }
}
