use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::export::sync::parse_endpoint;

/// Operator-editable settings persisted between runs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// Web-app URL that receives resident sync pushes.
    #[serde(default, rename = "googleSheetScriptUrl")]
    pub sheet_sync_url: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("could not access settings file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("settings file {path} is not valid JSON: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("`{0}` is not an http(s) URL")]
    InvalidUrl(String),
}

/// JSON file holding [`Settings`]. A missing file reads as defaults.
#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Result<Settings, SettingsError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Settings::default()),
            Err(source) => {
                return Err(SettingsError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        serde_json::from_str(&raw).map_err(|source| SettingsError::Parse {
            path: self.path.clone(),
            source,
        })
    }

    pub fn save(&self, settings: &Settings) -> Result<(), SettingsError> {
        let body = serde_json::to_string_pretty(settings).map_err(|source| SettingsError::Parse {
            path: self.path.clone(),
            source,
        })?;
        fs::write(&self.path, body).map_err(|source| SettingsError::Io {
            path: self.path.clone(),
            source,
        })
    }

    /// Store a new sync URL. A blank value clears it.
    pub fn set_sync_url(&self, url: &str) -> Result<Settings, SettingsError> {
        let mut settings = self.load()?;
        let trimmed = url.trim();
        settings.sheet_sync_url = if trimmed.is_empty() {
            None
        } else {
            parse_endpoint(trimmed).map_err(|_| SettingsError::InvalidUrl(trimmed.to_string()))?;
            Some(trimmed.to_string())
        };

        self.save(&settings)?;
        info!(path = %self.path.display(), "settings saved");
        Ok(settings)
    }
}
