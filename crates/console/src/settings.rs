use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::Context;
use chrono::TimeDelta;

#[allow(async_fn_in_trait)]
pub trait SettingsService {
    async fn get_settings(&self) -> Result<Settings, String>;
    async fn set_settings(&self, settings: Settings) -> Result<(), String>;
}

#[allow(async_fn_in_trait)]
pub trait SettingsRepository {
    async fn read_settings(&self) -> Result<Settings, String>;
    async fn write_settings(&self, settings: Settings) -> Result<(), String>;
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    pub exercise_page_size: u32,
    pub user_page_size: u32,
    pub search_debounce_ms: u64,
    pub assignment_expiry_days: Option<u32>,
}

impl Settings {
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read settings from {}", path.display()))?;
        Self::parse(&content, path)
    }

    fn parse(content: &str, path: &Path) -> anyhow::Result<Self> {
        serde_json::from_str(content)
            .with_context(|| format!("failed to parse settings in {}", path.display()))
    }

    #[must_use]
    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }

    #[must_use]
    pub fn assignment_validity(&self) -> Option<TimeDelta> {
        self.assignment_expiry_days
            .map(|days| TimeDelta::days(i64::from(days)))
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            exercise_page_size: 20,
            user_page_size: 20,
            search_debounce_ms: 500,
            assignment_expiry_days: None,
        }
    }
}

/// Settings persisted as a JSON file. A missing file yields the defaults.
pub struct JsonFile {
    path: PathBuf,
}

impl JsonFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SettingsRepository for JsonFile {
    async fn read_settings(&self) -> Result<Settings, String> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Ok(Settings::default());
            }
            Err(err) => {
                return Err(format!(
                    "failed to read settings from {}: {err}",
                    self.path.display()
                ));
            }
        };
        Settings::parse(&content, &self.path).map_err(|err| format!("{err:#}"))
    }

    async fn write_settings(&self, settings: Settings) -> Result<(), String> {
        let content = serde_json::to_string_pretty(&settings).map_err(|err| err.to_string())?;
        tokio::fs::write(&self.path, content)
            .await
            .map_err(|err| format!("failed to write settings to {}: {err}", self.path.display()))
    }
}
