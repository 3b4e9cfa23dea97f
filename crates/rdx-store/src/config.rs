use std::env;
use std::path::PathBuf;

use anyhow::Context;

/// Default base URL of the remote user service.
pub const DEFAULT_API_BASE_URL: &str = "https://reqres.in/api";
/// Default page size requested from the service.
pub const DEFAULT_PER_PAGE: u32 = 6;

/// Deployment environment, used to pick the tracing output format.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Environment {
    /// Local development: pretty logs, DEBUG default
    #[default]
    Development,
    /// Production: JSON logs, INFO default
    Production,
}

impl Environment {
    /// Parse `APP_ENV`; anything other than production means development.
    pub fn from_env() -> Self {
        match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Self::Production,
            _ => Self::Development,
        }
    }

    /// Whether this is a development environment.
    pub const fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }
}

/// Runtime configuration for the directory client.
#[derive(Clone, Debug)]
pub struct DirectoryConfig {
    /// Base URL of the remote user service
    pub api_base_url: String,
    /// Page size for collection fetches
    pub per_page: u32,
    /// Where to persist the directory cache, if anywhere
    pub cache_path: Option<PathBuf>,
    /// Deployment environment
    pub env: Environment,
}

impl DirectoryConfig {
    /// Load configuration from environment variables, with defaults for
    /// everything: `API_BASE_URL`, `PER_PAGE`, `STATE_CACHE_PATH`, `APP_ENV`.
    pub fn from_env() -> anyhow::Result<Self> {
        let api_base_url =
            env::var("API_BASE_URL").unwrap_or_else(|_| DEFAULT_API_BASE_URL.to_string());

        let per_page = match env::var("PER_PAGE") {
            Ok(value) => {
                let parsed: u32 = value
                    .parse()
                    .with_context(|| format!("PER_PAGE must be a positive integer, got '{value}'"))?;
                anyhow::ensure!(parsed > 0, "PER_PAGE must be at least 1");
                parsed
            }
            Err(_) => DEFAULT_PER_PAGE,
        };

        let cache_path = env::var("STATE_CACHE_PATH").ok().map(PathBuf::from);

        Ok(Self {
            api_base_url,
            per_page,
            cache_path,
            env: Environment::from_env(),
        })
    }
}
