/// Server configuration
use crate::error::{Result, ServerError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Publication media API listing the catalog
pub const DEFAULT_CATALOG_URL: &str = "https://b.jw-cdn.org/apis/pub-media/GETPUBMEDIALINKS?output=json&pub=osg&fileformat=MP3&alllangs=0&langwritten=T";

/// Browser-like User-Agent; the upstream API rejects unknown clients
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/108.0.0.0 Safari/537.36";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_server")]
    pub server: ServerSettings,

    #[serde(default = "default_upstream")]
    pub upstream: UpstreamSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UpstreamSettings {
    /// Upstream catalog API
    #[serde(default = "default_catalog_url")]
    pub catalog_url: String,

    /// Language key under `files` in the upstream response
    #[serde(default = "default_language")]
    pub language: String,

    /// Format key under the language in the upstream response
    #[serde(default = "default_format")]
    pub format: String,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Whole-request timeout for the catalog fetch
    #[serde(default = "default_catalog_timeout_secs")]
    pub catalog_timeout_secs: u64,

    /// Connect timeout for every upstream request (relayed audio has no total timeout)
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

impl ServerConfig {
    /// Load configuration from an explicit file (or `config.toml`) and environment
    ///
    /// Environment variables use the `CADENCE_` prefix with `__` between sections,
    /// e.g. `CADENCE_SERVER__PORT=9000`.
    pub fn load_from(path: Option<&Path>) -> Result<Self> {
        let mut settings = config::Config::builder();

        match path {
            Some(path) => {
                settings = settings.add_source(config::File::from(path.to_path_buf()));
            }
            None => {
                let default_path = PathBuf::from("config.toml");
                if default_path.exists() {
                    settings = settings.add_source(config::File::from(default_path));
                }
            }
        }

        settings = settings.add_source(
            config::Environment::with_prefix("CADENCE")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = settings
            .build()
            .map_err(|e| ServerError::Config(e.to_string()))?;

        config
            .try_deserialize()
            .map_err(|e| ServerError::Config(e.to_string()))
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        let url = url::Url::parse(&self.upstream.catalog_url).map_err(|e| {
            ServerError::Config(format!(
                "Invalid upstream catalog URL {:?}: {e}",
                self.upstream.catalog_url
            ))
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ServerError::Config(format!(
                "Upstream catalog URL must be http(s), got {}",
                url.scheme()
            )));
        }

        if self.upstream.language.is_empty() || self.upstream.format.is_empty() {
            return Err(ServerError::Config(
                "Upstream language and format keys cannot be empty".to_string(),
            ));
        }

        Ok(())
    }
}

// Default values
fn default_server() -> ServerSettings {
    ServerSettings {
        host: default_host(),
        port: default_port(),
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_upstream() -> UpstreamSettings {
    UpstreamSettings {
        catalog_url: default_catalog_url(),
        language: default_language(),
        format: default_format(),
        user_agent: default_user_agent(),
        catalog_timeout_secs: default_catalog_timeout_secs(),
        connect_timeout_secs: default_connect_timeout_secs(),
    }
}

fn default_catalog_url() -> String {
    DEFAULT_CATALOG_URL.to_string()
}

fn default_language() -> String {
    "T".to_string()
}

fn default_format() -> String {
    "MP3".to_string()
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

fn default_catalog_timeout_secs() -> u64 {
    30
}

fn default_connect_timeout_secs() -> u64 {
    10
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            server: default_server(),
            upstream: default_upstream(),
        }
    }
}
