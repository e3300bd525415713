use std::str::FromStr;

use anyhow::Context;
use sqlx::postgres::PgConnectOptions;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Full connection URL; takes precedence over the individual parts.
    pub url: Option<String>,
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub name: String,
    /// Always `UTF8`: sqlx decodes Postgres text as UTF-8 only.
    pub charset: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Clone)]
pub struct AppInfo {
    pub name: String,
    pub version: String,
    pub environment: String,
    pub log_level: String,
    pub log_format: LogFormat,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub app: AppInfo,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let text = |key: &str, default: &str| var(key).unwrap_or_else(|| default.to_string());

        let server = ServerConfig {
            host: text("SERVER_HOST", "localhost"),
            port: parse_or(var("SERVER_PORT"), "SERVER_PORT", 8082)?,
        };

        let database = DatabaseConfig {
            url: var("DATABASE_URL"),
            host: text("DB_HOST", "localhost"),
            port: parse_or(var("DB_PORT"), "DB_PORT", 5432)?,
            username: text("DB_USERNAME", "postgres"),
            password: text("DB_PASSWORD", ""),
            name: text("DB_NAME", "rest_api_db"),
            charset: charset(var("DB_CHARSET"))?,
            max_connections: parse_or(var("DB_MAX_CONNECTIONS"), "DB_MAX_CONNECTIONS", 25)?,
        };

        let log_format = match var("LOG_FORMAT").map(|v| v.to_lowercase()).as_deref() {
            None | Some("text") => LogFormat::Text,
            Some("json") => LogFormat::Json,
            Some(other) => anyhow::bail!("invalid LOG_FORMAT: {other:?} (expected text or json)"),
        };

        let app = AppInfo {
            name: text("APP_NAME", "REST API Project"),
            version: text("APP_VERSION", env!("CARGO_PKG_VERSION")),
            environment: text("APP_ENV", "development"),
            log_level: text("LOG_LEVEL", "info"),
            log_format,
        };

        Ok(Self {
            server,
            database,
            app,
        })
    }

    /// `host:port` to bind the listener on.
    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

impl DatabaseConfig {
    pub fn connect_options(&self) -> anyhow::Result<PgConnectOptions> {
        let options = match &self.url {
            Some(url) => PgConnectOptions::from_str(url).context("parse DATABASE_URL")?,
            None => PgConnectOptions::new()
                .host(&self.host)
                .port(self.port)
                .username(&self.username)
                .password(&self.password)
                .database(&self.name),
        };
        Ok(options.options([("client_encoding", self.charset.as_str())]))
    }

    /// Connection string with the password masked, safe to log.
    pub fn display_url(&self) -> String {
        if let Some(url) = &self.url {
            return match url.split_once("://") {
                Some((scheme, rest)) => match rest.rsplit_once('@') {
                    Some((_, host)) => format!("{scheme}://****@{host}"),
                    None => url.clone(),
                },
                None => "<invalid DATABASE_URL>".to_string(),
            };
        }
        let secret = if self.password.is_empty() { "" } else { ":****" };
        format!(
            "postgres://{}{}@{}:{}/{}",
            self.username, secret, self.host, self.port, self.name
        )
    }
}

fn charset(value: Option<String>) -> anyhow::Result<String> {
    match value {
        None => Ok("UTF8".to_string()),
        Some(v) if matches!(v.trim().to_uppercase().as_str(), "UTF8" | "UTF-8") => {
            Ok("UTF8".to_string())
        }
        Some(v) => anyhow::bail!("unsupported DB_CHARSET: {v:?} (only UTF8 is supported)"),
    }
}

fn parse_or<T>(value: Option<String>, key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    value
        .map(|v| {
            v.trim()
                .parse::<T>()
                .with_context(|| format!("invalid {key}: {v:?}"))
        })
        .transpose()
        .map(|parsed| parsed.unwrap_or(default))
}
