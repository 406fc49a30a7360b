// Persistent launcher settings (anyi_config.json)
use super::error::LifecycleResult;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const SETTINGS_FILE: &str = "anyi_config.json";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LauncherSettings {
    /// Last known-good path to the application executable
    #[serde(default)]
    pub anyi_path: String,
}

pub struct SettingsStore {
    path: PathBuf,
    settings: LauncherSettings,
}

impl SettingsStore {
    /// Load settings from `path`, falling back to defaults when the file is absent or unreadable
    pub fn load_or_default(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let settings = match Self::read(&path) {
            Ok(Some(settings)) => settings,
            Ok(None) => LauncherSettings::default(),
            Err(e) => {
                log::warn!("⚠️ Could not read {}: {}", path.display(), e);
                LauncherSettings::default()
            }
        };
        Self { path, settings }
    }

    fn read(path: &Path) -> LifecycleResult<Option<LauncherSettings>> {
        if !path.exists() {
            return Ok(None);
        }
        let raw = std::fs::read_to_string(path)?;
        Ok(Some(serde_json::from_str(&raw)?))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn settings(&self) -> &LauncherSettings {
        &self.settings
    }

    pub fn anyi_path(&self) -> &str {
        &self.settings.anyi_path
    }

    /// Remember `path` and write the file; failures are logged
    pub fn set_anyi_path(&mut self, path: &str) -> bool {
        self.settings.anyi_path = path.to_string();
        match self.save() {
            Ok(()) => {
                log::info!("💾 Saved executable path to {}", self.path.display());
                true
            }
            Err(e) => {
                log::error!("❌ Failed to save {}: {}", self.path.display(), e);
                false
            }
        }
    }

    pub fn save(&self) -> LifecycleResult<()> {
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
        self.settings.serialize(&mut serializer)?;
        std::fs::write(&self.path, buf)?;
        Ok(())
    }
}
