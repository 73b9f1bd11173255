use std::{fs, path::Path, time::Duration};

use serde::Deserialize;
use thiserror::Error;
use url::Url;

pub const DEFAULT_SETTINGS_FILE: &str = "client.toml";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("invalid {name} '{value}': {source}")]
    InvalidEndpoint {
        name: &'static str,
        value: String,
        source: url::ParseError,
    },
    #[error("failed to read settings file '{path}': {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse settings file '{path}': {source}")]
    Parse {
        path: String,
        source: toml::de::Error,
    },
}

/// Session configuration, fixed once the session is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSettings {
    pub upload_url: String,
    pub query_url: String,
    pub use_mock: bool,
    pub mock_delay_ms: u64,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            upload_url: "http://localhost:8080/upload".into(),
            query_url: "http://localhost:8080/query".into(),
            use_mock: true,
            mock_delay_ms: 700,
        }
    }
}

impl ClientSettings {
    pub fn mock_delay(&self) -> Duration {
        Duration::from_millis(self.mock_delay_ms)
    }

    pub fn upload_endpoint(&self) -> Result<Url, SettingsError> {
        parse_endpoint("upload endpoint", &self.upload_url)
    }

    pub fn query_endpoint(&self) -> Result<Url, SettingsError> {
        parse_endpoint("query endpoint", &self.query_url)
    }
}

/// Highest-precedence layer, usually filled from command-line flags.
#[derive(Debug, Clone, Default)]
pub struct SettingsOverrides {
    pub upload_url: Option<String>,
    pub query_url: Option<String>,
    pub use_mock: Option<bool>,
    pub mock_delay_ms: Option<u64>,
}

impl SettingsOverrides {
    pub fn apply(self, settings: &mut ClientSettings) {
        if let Some(v) = self.upload_url {
            settings.upload_url = v;
        }
        if let Some(v) = self.query_url {
            settings.query_url = v;
        }
        if let Some(v) = self.use_mock {
            settings.use_mock = v;
        }
        if let Some(v) = self.mock_delay_ms {
            settings.mock_delay_ms = v;
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    upload_url: Option<String>,
    query_url: Option<String>,
    use_mock: Option<bool>,
    mock_delay_ms: Option<u64>,
}

fn parse_endpoint(name: &'static str, value: &str) -> Result<Url, SettingsError> {
    Url::parse(value.trim()).map_err(|source| SettingsError::InvalidEndpoint {
        name,
        value: value.to_string(),
        source,
    })
}

/// Only the literal `true`, in any case, turns mock mode on.
pub fn parse_mock_flag(raw: &str) -> bool {
    raw.trim().eq_ignore_ascii_case("true")
}

/// Defaults, then the optional settings file, then process environment.
///
/// A missing file at the default location is not an error; an explicitly named file must
/// exist and parse.
pub fn load_settings(config_path: Option<&Path>) -> Result<ClientSettings, SettingsError> {
    let (path, required) = match config_path {
        Some(path) => (path, true),
        None => (Path::new(DEFAULT_SETTINGS_FILE), false),
    };
    let raw = match fs::read_to_string(path) {
        Ok(raw) => Some(raw),
        Err(err) if !required && err.kind() == std::io::ErrorKind::NotFound => None,
        Err(source) => {
            return Err(SettingsError::Read {
                path: path.display().to_string(),
                source,
            })
        }
    };
    let file = match raw {
        Some(raw) => toml::from_str::<FileSettings>(&raw).map_err(|source| SettingsError::Parse {
            path: path.display().to_string(),
            source,
        })?,
        None => FileSettings::default(),
    };

    Ok(resolve_settings(file, |name| std::env::var(name).ok()))
}

fn resolve_settings(file: FileSettings, env: impl Fn(&str) -> Option<String>) -> ClientSettings {
    let mut settings = ClientSettings::default();

    if let Some(v) = file.upload_url {
        settings.upload_url = v;
    }
    if let Some(v) = file.query_url {
        settings.query_url = v;
    }
    if let Some(v) = file.use_mock {
        settings.use_mock = v;
    }
    if let Some(v) = file.mock_delay_ms {
        settings.mock_delay_ms = v;
    }

    if let Some(v) = env("UPLOAD_URL") {
        settings.upload_url = v;
    }
    if let Some(v) = env("APP__UPLOAD_URL") {
        settings.upload_url = v;
    }

    if let Some(v) = env("QUERY_URL") {
        settings.query_url = v;
    }
    if let Some(v) = env("APP__QUERY_URL") {
        settings.query_url = v;
    }

    if let Some(v) = env("USE_MOCK") {
        settings.use_mock = parse_mock_flag(&v);
    }
    if let Some(v) = env("APP__USE_MOCK") {
        settings.use_mock = parse_mock_flag(&v);
    }

    if let Some(v) = env("APP__MOCK_DELAY_MS") {
        if let Ok(parsed) = v.trim().parse::<u64>() {
            settings.mock_delay_ms = parsed;
        }
    }

    settings
}

#[cfg(test)]
#[path = "tests/settings_tests.rs"]
mod tests;
