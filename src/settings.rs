//! Store preferences persisted as a single JSON document on disk.
//!
//! The document is read and rewritten wholesale on every request; there is
//! no partial patching and no locking against concurrent writers. A missing
//! file yields the defaults.

use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct StoreInfo {
    pub name: String,
    pub address: String,
    pub phone: String,
    pub email: String,
}

impl Default for StoreInfo {
    fn default() -> Self {
        StoreInfo {
            name: "My Bakery".to_string(),
            address: String::new(),
            phone: String::new(),
            email: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct NotificationSettings {
    pub low_stock_alerts: bool,
    pub new_order_alerts: bool,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        NotificationSettings {
            low_stock_alerts: true,
            new_order_alerts: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct SystemSettings {
    pub currency: String,
    pub timezone: String,
    pub theme: String,
}

impl Default for SystemSettings {
    fn default() -> Self {
        SystemSettings {
            currency: "USD".to_string(),
            timezone: "UTC".to_string(),
            theme: "light".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    pub store: StoreInfo,
    pub notifications: NotificationSettings,
    pub system: SystemSettings,
}

#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        SettingsStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Defaults when the file does not exist; unknown keys in the file
    /// are ignored, missing keys fall back to their defaults.
    pub fn load(&self) -> io::Result<Settings> {
        match std::fs::read(&self.path) {
            Ok(bytes) => serde_json::from_slice(&bytes)
                .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Settings::default()),
            Err(e) => Err(e),
        }
    }

    pub fn save(&self, settings: &Settings) -> io::Result<()> {
        let json = serde_json::to_vec_pretty(settings)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        std::fs::write(&self.path, json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store() -> SettingsStore {
        let path = std::env::temp_dir().join(format!("settings-{}.json", uuid::Uuid::new_v4()));
        SettingsStore::new(path)
    }

    #[test]
    fn missing_file_yields_defaults() {
        let store = temp_store();
        let settings = store.load().unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.system.currency, "USD");
        assert!(settings.notifications.low_stock_alerts);
    }

    #[test]
    fn save_then_load_round_trips() {
        let store = temp_store();
        let mut settings = Settings::default();
        settings.store.name = "Dona Rosa Confeitaria".to_string();
        settings.system.currency = "BRL".to_string();
        settings.notifications.new_order_alerts = false;

        store.save(&settings).unwrap();
        assert_eq!(store.load().unwrap(), settings);

        std::fs::remove_file(store.path()).unwrap();
    }

    #[test]
    fn partial_document_fills_in_defaults() {
        let store = temp_store();
        std::fs::write(store.path(), r#"{"system":{"currency":"EUR"}}"#).unwrap();

        let settings = store.load().unwrap();
        assert_eq!(settings.system.currency, "EUR");
        assert_eq!(settings.system.theme, "light");
        assert_eq!(settings.store.name, "My Bakery");

        std::fs::remove_file(store.path()).unwrap();
    }
}
