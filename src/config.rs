//! Application configuration module
//!
//! Handles loading and validating configuration from environment variables.

use serde::Deserialize;
use std::net::Ipv4Addr;
use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),
}

/// Server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: Ipv4Addr,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: Ipv4Addr::new(0, 0, 0, 0),
            port: 3000,
        }
    }
}

/// Database configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub database: String,
    pub max_pool_size: usize,
    /// Connect over TLS (hosted Postgres requires it)
    pub use_tls: bool,
    /// Create development tables at startup
    pub bootstrap_schema: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 5432,
            user: "postgres".to_string(),
            password: String::new(),
            database: "postgres".to_string(),
            max_pool_size: 10,
            use_tls: false,
            bootstrap_schema: false,
        }
    }
}

/// CORS configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec!["http://localhost:8080".to_string()],
        }
    }
}

/// Token verification for JWTs issued by the hosted auth layer
#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub audience: String,
    /// Users allowed on admin routes
    pub admin_user_ids: Vec<Uuid>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "freelance-hub-dev-secret-change-in-production".to_string(),
            audience: "authenticated".to_string(),
            admin_user_ids: Vec::new(),
        }
    }
}

/// Proposal generator (OpenAI-compatible chat completions)
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// Generator is disabled without a key
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub timeout_secs: u64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://api.groq.com/openai/v1".to_string(),
            model: "llama-3.3-70b-versatile".to_string(),
            timeout_secs: 60,
        }
    }
}

/// Analytics configuration
#[derive(Debug, Clone)]
pub struct AnalyticsConfig {
    /// Memoized dashboard reports; 0 disables the cache
    pub report_cache_capacity: usize,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            report_cache_capacity: 256,
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

/// Complete application settings
#[derive(Debug, Clone, Default)]
pub struct Settings {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub cors: CorsConfig,
    pub auth: AuthConfig,
    pub generator: GeneratorConfig,
    pub analytics: AnalyticsConfig,
    pub log_format: LogFormat,
    /// True when JWT_SECRET was not provided
    pub using_default_jwt_secret: bool,
}

impl Settings {
    /// Load settings from environment variables
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if it exists (ignore errors if file not found)
        let _ = dotenvy::dotenv();

        let server = ServerConfig {
            host: env_parse("HOST").unwrap_or_else(|| ServerConfig::default().host),
            port: env_parse("PORT").unwrap_or_else(|| ServerConfig::default().port),
        };

        // Try to load DATABASE_URL first (modern format), fall back to individual vars
        let mut database = if let Ok(database_url) = std::env::var("DATABASE_URL") {
            Self::parse_database_url(&database_url)?
        } else {
            DatabaseConfig {
                host: std::env::var("DB_HOST").unwrap_or_else(|_| "localhost".to_string()),
                port: env_parse("DB_PORT").unwrap_or(5432),
                user: std::env::var("DB_USER").unwrap_or_else(|_| "postgres".to_string()),
                password: std::env::var("DB_PASSWORD").unwrap_or_default(),
                database: std::env::var("DB_NAME").unwrap_or_else(|_| "postgres".to_string()),
                ..DatabaseConfig::default()
            }
        };
        database.max_pool_size = env_parse("DB_MAX_CONNECTIONS").unwrap_or(database.max_pool_size);
        if let Some(use_tls) = env_flag("DB_SSL") {
            database.use_tls = use_tls;
        }
        database.bootstrap_schema = env_flag("DB_BOOTSTRAP_SCHEMA").unwrap_or(false);

        let cors = CorsConfig {
            allowed_origins: std::env::var("ALLOWED_ORIGINS")
                .ok()
                .map(|s| split_list(&s))
                .unwrap_or_else(|| CorsConfig::default().allowed_origins),
        };

        let jwt_secret = std::env::var("JWT_SECRET").ok().filter(|s| !s.is_empty());
        let using_default_jwt_secret = jwt_secret.is_none();
        let auth = AuthConfig {
            jwt_secret: jwt_secret.unwrap_or_else(|| AuthConfig::default().jwt_secret),
            audience: std::env::var("JWT_AUDIENCE")
                .unwrap_or_else(|_| AuthConfig::default().audience),
            admin_user_ids: match std::env::var("ADMIN_USER_IDS") {
                Ok(ids) => Self::parse_user_ids(&ids)?,
                Err(_) => Vec::new(),
            },
        };

        let defaults = GeneratorConfig::default();
        let generator = GeneratorConfig {
            api_key: std::env::var("GROQ_API_KEY").ok().filter(|k| !k.is_empty()),
            base_url: std::env::var("GROQ_BASE_URL")
                .map(|u| u.trim_end_matches('/').to_string())
                .unwrap_or(defaults.base_url),
            model: std::env::var("GROQ_MODEL").unwrap_or(defaults.model),
            timeout_secs: env_parse("GENERATOR_TIMEOUT_SECS").unwrap_or(defaults.timeout_secs),
        };

        let analytics = AnalyticsConfig {
            report_cache_capacity: env_parse("REPORT_CACHE_CAPACITY")
                .unwrap_or_else(|| AnalyticsConfig::default().report_cache_capacity),
        };

        let log_format = match std::env::var("LOG_FORMAT") {
            Ok(format) => Self::parse_log_format(&format)?,
            Err(_) => LogFormat::default(),
        };

        Ok(Self {
            server,
            database,
            cors,
            auth,
            generator,
            analytics,
            log_format,
            using_default_jwt_secret,
        })
    }

    /// Parse a DATABASE_URL connection string (postgresql://...)
    fn parse_database_url(url: &str) -> Result<DatabaseConfig, ConfigError> {
        let parsed = url::Url::parse(url).map_err(|_| {
            ConfigError::InvalidValue(
                "Invalid DATABASE_URL format (expected postgresql://...)".to_string(),
            )
        })?;

        if !matches!(parsed.scheme(), "postgres" | "postgresql") {
            return Err(ConfigError::InvalidValue(format!(
                "Unsupported DATABASE_URL scheme: {}",
                parsed.scheme()
            )));
        }

        let host = parsed
            .host_str()
            .ok_or_else(|| ConfigError::InvalidValue("Missing host in DATABASE_URL".to_string()))?
            .to_string();

        let database = parsed.path().trim_start_matches('/').to_string();
        if database.is_empty() {
            return Err(ConfigError::InvalidValue(
                "Missing database name in DATABASE_URL".to_string(),
            ));
        }

        // Hosted providers only accept TLS connections
        let use_tls = parsed
            .query_pairs()
            .any(|(k, v)| k == "sslmode" && v == "require")
            || host.ends_with(".supabase.co")
            || host.ends_with(".supabase.com")
            || host.contains("neon.tech");

        Ok(DatabaseConfig {
            port: parsed.port().unwrap_or(5432),
            user: parsed.username().to_string(),
            password: parsed.password().map(|p| p.to_string()).unwrap_or_default(),
            host,
            database,
            use_tls,
            ..DatabaseConfig::default()
        })
    }

    fn parse_user_ids(value: &str) -> Result<Vec<Uuid>, ConfigError> {
        split_list(value)
            .iter()
            .map(|id| {
                id.parse::<Uuid>().map_err(|_| {
                    ConfigError::InvalidValue(format!("Invalid user id in ADMIN_USER_IDS: {}", id))
                })
            })
            .collect()
    }

    fn parse_log_format(value: &str) -> Result<LogFormat, ConfigError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" | "" => Ok(LogFormat::Compact),
            "json" => Ok(LogFormat::Json),
            other => Err(ConfigError::InvalidValue(format!(
                "Unknown LOG_FORMAT: {} (expected compact or json)",
                other
            ))),
        }
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.trim().parse().ok())
}

fn env_flag(key: &str) -> Option<bool> {
    std::env::var(key)
        .ok()
        .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
