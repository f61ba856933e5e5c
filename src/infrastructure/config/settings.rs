use std::env;
use std::fmt;

use config::{Config, ConfigError, File};
use serde::{de::IgnoredAny, Deserialize, Deserializer};

const DEFAULT_DB_PORT: u16 = 5432;
const DEFAULT_LISTEN_PORT: u16 = 3000;

/// Environment variables recognized by the service and the settings key
/// each one overrides.
const ENV_OVERRIDES: &[(&str, &str)] = &[
    ("DB_HOST", "database.host"),
    ("DB_DATABASE", "database.name"),
    ("DB_USER", "database.user"),
    ("DB_PASSWORD", "database.password"),
    ("DB_PORT", "database.port"),
    ("HOST", "server.host"),
    ("PORT", "server.port"),
    ("OTEL_ENABLED", "otel.enabled"),
    ("OTEL_ENDPOINT", "otel.endpoint"),
    ("OTEL_SERVICE_NAME", "otel.service_name"),
    ("OTEL_SAMPLING_RATIO", "otel.sampling_ratio"),
];

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub otel: OtelConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_listen_port", deserialize_with = "listen_port")]
    pub port: u16,
}

/// Connection target for the greetings database.
///
/// Missing values are kept as empty strings: a bad target is reported by the
/// first query that needs a connection, not while loading settings.
#[derive(Clone, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default)]
    pub host: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub user: String,
    #[serde(default)]
    pub password: String,
    #[serde(default = "default_db_port", deserialize_with = "database_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OtelConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_otel_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_service_name")]
    pub service_name: String,
    /// Fraction of traces sampled (0.0-1.0)
    #[serde(default = "default_sampling_ratio")]
    pub sampling_ratio: f64,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_listen_port() -> u16 {
    DEFAULT_LISTEN_PORT
}

fn default_db_port() -> u16 {
    DEFAULT_DB_PORT
}

fn default_otel_endpoint() -> String {
    "http://localhost:4317".to_string()
}

fn default_service_name() -> String {
    "greetings-service".to_string()
}

fn default_sampling_ratio() -> f64 {
    1.0
}

/// Port as it may arrive from a file or the environment.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawPort {
    Number(i64),
    Text(String),
    Other(IgnoredAny),
}

impl RawPort {
    /// Resolve to a usable port, falling back on anything unparsable or zero.
    fn resolve(self, default: u16) -> u16 {
        let parsed = match self {
            RawPort::Number(n) => u16::try_from(n).ok(),
            RawPort::Text(s) => s.trim().parse::<u16>().ok(),
            RawPort::Other(_) => None,
        };
        parsed.filter(|port| *port != 0).unwrap_or(default)
    }
}

fn database_port<'de, D>(deserializer: D) -> Result<u16, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<RawPort>::deserialize(deserializer)?;
    Ok(raw.map_or(DEFAULT_DB_PORT, |p| p.resolve(DEFAULT_DB_PORT)))
}

fn listen_port<'de, D>(deserializer: D) -> Result<u16, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<RawPort>::deserialize(deserializer)?;
    Ok(raw.map_or(DEFAULT_LISTEN_PORT, |p| p.resolve(DEFAULT_LISTEN_PORT)))
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        // Load .env file if exists
        let _ = dotenvy::dotenv();

        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let mut builder = Config::builder()
            .set_default("server.host", default_host())?
            .set_default("server.port", i64::from(DEFAULT_LISTEN_PORT))?
            .set_default("database.port", i64::from(DEFAULT_DB_PORT))?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false));

        for (var, key) in ENV_OVERRIDES {
            builder = builder.set_override_option(*key, env::var(var).ok())?;
        }

        builder.build()?.try_deserialize()
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("host", &self.host)
            .field("name", &self.name)
            .field("user", &self.user)
            .field("password", &"***")
            .field("port", &self.port)
            .finish()
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_listen_port(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            host: String::new(),
            name: String::new(),
            user: String::new(),
            password: String::new(),
            port: default_db_port(),
        }
    }
}

impl Default for OtelConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            endpoint: default_otel_endpoint(),
            service_name: default_service_name(),
            sampling_ratio: default_sampling_ratio(),
        }
    }
}
