use std::path::PathBuf;

use url::Url;

use crate::error::ConfigError;

pub const ENV_VAR: &str = "RECIPEBOOK_ENV";
pub const API_URL_VAR: &str = "RECIPEBOOK_API_URL";
pub const DATA_DIR_VAR: &str = "RECIPEBOOK_DATA_DIR";

const DEV_SERVER_ADDRESS: &str = "http://localhost:8000/api/v1/";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Environment {
    /// Session-scoped storage, local API server.
    #[default]
    Development,
    /// Durable storage, API address must be configured.
    Production,
}

impl Environment {
    pub fn parse(raw: &str) -> Result<Self, ConfigError> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "" | "dev" | "development" => Ok(Self::Development),
            "prod" | "production" => Ok(Self::Production),
            other => Err(ConfigError::UnknownEnvironment(other.to_owned())),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub environment: Environment,
    pub api_url: Option<String>,
    pub data_dir: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let environment = match std::env::var(ENV_VAR) {
            Ok(raw) => Environment::parse(&raw)?,
            Err(_) => Environment::default(),
        };
        Ok(Self {
            environment,
            api_url: non_empty_var(API_URL_VAR),
            data_dir: non_empty_var(DATA_DIR_VAR).map(PathBuf::from),
        })
    }

    /// Base URL of the recipe API. Always ends in `/` so endpoints join under it.
    pub fn server_address(&self) -> Result<Url, ConfigError> {
        let raw = match (&self.api_url, self.environment) {
            (Some(raw), _) => raw.as_str(),
            (None, Environment::Development) => DEV_SERVER_ADDRESS,
            (None, Environment::Production) => return Err(ConfigError::MissingServerAddress),
        };
        normalize_base_url(raw)
    }

    pub fn data_dir(&self) -> Result<PathBuf, ConfigError> {
        if let Some(dir) = &self.data_dir {
            return Ok(dir.clone());
        }
        dirs::data_local_dir()
            .map(|dir| dir.join("recipebook"))
            .ok_or(ConfigError::MissingDataDir)
    }
}

/// Parses `raw` and appends a trailing slash; without it `Url::join` drops the
/// last path segment (`/api/v1` + `weekly` => `/api/weekly`).
pub fn normalize_base_url(raw: &str) -> Result<Url, ConfigError> {
    let mut url =
        Url::parse(raw.trim()).map_err(|_| ConfigError::InvalidServerAddress(raw.to_owned()))?;
    if url.cannot_be_a_base() {
        return Err(ConfigError::InvalidServerAddress(raw.to_owned()));
    }
    ensure_trailing_slash(&mut url);
    Ok(url)
}

pub(crate) fn ensure_trailing_slash(url: &mut Url) {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_environment_variants() {
        assert_eq!(Environment::parse("").unwrap(), Environment::Development);
        assert_eq!(Environment::parse("DEV").unwrap(), Environment::Development);
        assert_eq!(
            Environment::parse(" production ").unwrap(),
            Environment::Production
        );
        assert_eq!(Environment::parse("prod").unwrap(), Environment::Production);
        assert!(Environment::parse("staging").is_err());
    }

    #[test]
    fn development_defaults_to_local_server() {
        let config = Config::default();
        assert_eq!(
            config.server_address().unwrap().as_str(),
            "http://localhost:8000/api/v1/"
        );
    }

    #[test]
    fn production_requires_server_address() {
        let config = Config {
            environment: Environment::Production,
            ..Config::default()
        };
        assert_eq!(
            config.server_address().unwrap_err(),
            ConfigError::MissingServerAddress
        );
    }

    #[test]
    fn base_url_gets_trailing_slash() {
        let url = normalize_base_url("https://recipes.example.com/api/v1").unwrap();
        assert_eq!(url.as_str(), "https://recipes.example.com/api/v1/");
        assert_eq!(
            url.join("weekly").unwrap().as_str(),
            "https://recipes.example.com/api/v1/weekly"
        );
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        assert!(normalize_base_url("not a url").is_err());
        assert!(normalize_base_url("mailto:chef@example.com").is_err());
    }
}
