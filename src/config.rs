//! Configuration constants and profile loading for jobline
//!
//! Connection settings live in an INI profile file, one section per profile.
//! A few `NOTION_*` environment variables override the file so credentials
//! can be kept out of it.

use crate::notion::{ConnectionSettings, DEFAULT_API_URL, DEFAULT_NOTION_VERSION};
use ini::Ini;
use regex::Regex;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::OnceLock;
use thiserror::Error;

/// Default profile file path for jobline
pub const DEFAULT_PROFILE_PATH: &str = "~/.jobline/profile";

/// Environment variable name for overriding the profile path
pub const PROFILE_PATH_ENV_VAR: &str = "JOBLINE_PROFILE_PATH";

/// Default location of the saved database schema
pub const DEFAULT_SCHEMA_PATH: &str = "data/notion_db_schema.json";

pub const API_URL_ENV_VAR: &str = "NOTION_API_URL";
pub const API_KEY_ENV_VAR: &str = "NOTION_API_KEY";
pub const DATABASE_ID_ENV_VAR: &str = "NOTION_DATABASE_ID";

const KEY_API_URL: &str = "notion_api_url";
const KEY_API_KEY: &str = "notion_api_key";
const KEY_VERSION: &str = "notion_version";
const KEY_DATABASE_ID: &str = "database_id";
const KEY_SCHEMA_PATH: &str = "schema_path";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read profile file `{path}`: {source}")]
    Read {
        path: String,
        #[source]
        source: ini::Error,
    },

    #[error("`{key}` is not set in profile `{profile}` (or via {env})")]
    Missing {
        key: &'static str,
        env: &'static str,
        profile: String,
    },

    #[error("`{0}` is not a valid database id")]
    InvalidDatabaseId(String),
}

/// Get the profile file path, checking environment variable first, then falling back to default
pub fn get_profile_path() -> String {
    std::env::var_os(PROFILE_PATH_ENV_VAR)
        .and_then(|val| val.into_string().ok())
        .unwrap_or_else(|| DEFAULT_PROFILE_PATH.to_string())
}

/// Expand a leading `~` in a path
pub fn expand_path(path: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path).into_owned())
}

/// Resolved settings for one profile
#[derive(Debug, Clone, PartialEq)]
pub struct NotionProfile {
    pub name: String,
    pub api_url: String,
    pub api_key: String,
    pub notion_version: String,
    pub database_id: String,
    pub schema_path: PathBuf,
}

impl NotionProfile {
    /// Load `profile` from the INI file at `path`, then apply environment overrides.
    ///
    /// A missing file or section is fine as long as the environment supplies
    /// the required values.
    pub fn load(profile: &str, path: &str) -> Result<Self, ConfigError> {
        let values = read_section(profile, path)?;
        Self::from_values(profile, values, |key| std::env::var(key).ok())
    }

    /// Build a profile from section values and an environment lookup
    pub fn from_values<F>(
        profile: &str,
        mut values: HashMap<String, String>,
        env: F,
    ) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let overrides = [
            (KEY_API_URL, API_URL_ENV_VAR),
            (KEY_API_KEY, API_KEY_ENV_VAR),
            (KEY_DATABASE_ID, DATABASE_ID_ENV_VAR),
        ];
        for (key, var) in overrides {
            if let Some(value) = env(var).filter(|v| !v.trim().is_empty()) {
                tracing::debug!("Using {} from environment", var);
                values.insert(key.to_string(), value);
            }
        }

        let mut take = |key: &str| {
            values
                .remove(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let missing = |key: &'static str, env: &'static str| ConfigError::Missing {
            key,
            env,
            profile: profile.to_string(),
        };

        let api_url = take(KEY_API_URL).unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let api_key = take(KEY_API_KEY).ok_or_else(|| missing(KEY_API_KEY, API_KEY_ENV_VAR))?;
        let notion_version =
            take(KEY_VERSION).unwrap_or_else(|| DEFAULT_NOTION_VERSION.to_string());
        let database_id = take(KEY_DATABASE_ID)
            .ok_or_else(|| missing(KEY_DATABASE_ID, DATABASE_ID_ENV_VAR))?;
        let database_id = normalize_database_id(&database_id)?;
        let schema_path = take(KEY_SCHEMA_PATH)
            .map(|p| expand_path(&p))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SCHEMA_PATH));

        Ok(Self {
            name: profile.to_string(),
            api_url,
            api_key,
            notion_version,
            database_id,
            schema_path,
        })
    }

    pub fn connection_settings(&self) -> ConnectionSettings {
        ConnectionSettings::new(self.api_key.clone())
            .with_api_url(self.api_url.clone())
            .with_notion_version(self.notion_version.clone())
    }
}

/// Key/value pairs of one INI section; empty when the file or section is absent
pub fn read_section(profile: &str, path: &str) -> Result<HashMap<String, String>, ConfigError> {
    let file = expand_path(path);
    if !file.exists() {
        tracing::debug!("Profile file '{}' not found", file.display());
        return Ok(HashMap::new());
    }

    tracing::debug!("Loading profile '{}' from '{}'", profile, file.display());
    let ini = Ini::load_from_file(&file).map_err(|source| ConfigError::Read {
        path: file.display().to_string(),
        source,
    })?;
    let values = match ini.section(Some(profile)) {
        Some(props) => props
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
        None => {
            tracing::debug!("Profile '{}' not found in '{}'", profile, file.display());
            HashMap::new()
        }
    };
    Ok(values)
}

fn database_id_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^(?:[0-9a-fA-F]{32}|[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12})$")
            .expect("database id pattern is valid")
    })
}

/// Validate a database id and strip the UUID dashes
pub fn normalize_database_id(id: &str) -> Result<String, ConfigError> {
    let id = id.trim();
    if !database_id_pattern().is_match(id) {
        return Err(ConfigError::InvalidDatabaseId(id.to_string()));
    }
    Ok(id.replace('-', "").to_lowercase())
}
