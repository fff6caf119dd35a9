use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    sync::{PoisonError, RwLock},
    time::Duration,
};

use crate::{
    admin::{refresh::DEFAULT_REFRESH_INTERVAL, AdminCredentials},
    booking::service::{BookingConfig, DEFAULT_MAX_BOOKINGS, DEFAULT_WHATSAPP_NUMBER},
};

pub const SETTINGS_FILE: &str = "settings.json";
pub const DEFAULT_PROFILE: &str = "default";
pub const DEFAULT_IMAGES_DIR: &str = "shree_public/images";

pub const ENV_DATA_DIR: &str = "SHREE_LODGE_DATA_DIR";
pub const ENV_PROFILE: &str = "SHREE_LODGE_PROFILE";
pub const ENV_WHATSAPP: &str = "SHREE_LODGE_WHATSAPP";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    pub whatsapp_number: String,
    pub max_bookings: usize,
    pub profile: String,
    pub refresh_interval_secs: u64,
    pub whatsapp_open_delay_ms: u64,
    pub form_reset_delay_ms: u64,
    pub admin_username: String,
    pub admin_password: String,
    pub images_dir: PathBuf,
}

impl Default for AppSettings {
    fn default() -> Self {
        let credentials = AdminCredentials::default();
        Self {
            whatsapp_number: DEFAULT_WHATSAPP_NUMBER.into(),
            max_bookings: DEFAULT_MAX_BOOKINGS,
            profile: DEFAULT_PROFILE.into(),
            refresh_interval_secs: DEFAULT_REFRESH_INTERVAL.as_secs(),
            whatsapp_open_delay_ms: 1500,
            form_reset_delay_ms: 3000,
            admin_username: credentials.username,
            admin_password: credentials.password,
            images_dir: PathBuf::from(DEFAULT_IMAGES_DIR),
        }
    }
}

impl AppSettings {
    pub fn booking_config(&self) -> BookingConfig {
        BookingConfig {
            whatsapp_number: self.whatsapp_number.clone(),
            max_bookings: self.max_bookings.max(1),
        }
    }

    pub fn credentials(&self) -> AdminCredentials {
        AdminCredentials {
            username: self.admin_username.clone(),
            password: self.admin_password.clone(),
        }
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs.max(1))
    }

    pub fn link_delay(&self) -> Duration {
        Duration::from_millis(self.whatsapp_open_delay_ms)
    }

    pub fn reset_delay(&self) -> Duration {
        Duration::from_millis(self.form_reset_delay_ms)
    }

    /// Environment values win over the file.
    fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(number) = lookup(ENV_WHATSAPP).filter(|v| !v.trim().is_empty()) {
            self.whatsapp_number = number.trim().to_string();
        }
        if let Some(profile) = lookup(ENV_PROFILE).filter(|v| !v.trim().is_empty()) {
            self.profile = profile.trim().to_string();
        }
    }
}

/// Resolve the data directory: explicit flag, then environment, then the
/// platform data dir, then the working directory.
pub fn resolve_data_dir(flag: Option<PathBuf>) -> PathBuf {
    flag.or_else(|| std::env::var_os(ENV_DATA_DIR).map(PathBuf::from))
        .or_else(platform_data_dir)
        .unwrap_or_else(|| PathBuf::from(".shree-lodge"))
}

fn platform_data_dir() -> Option<PathBuf> {
    if cfg!(target_os = "windows") {
        std::env::var_os("APPDATA").map(|dir| PathBuf::from(dir).join("shree-lodge"))
    } else if let Some(xdg) = std::env::var_os("XDG_DATA_HOME") {
        Some(PathBuf::from(xdg).join("shree-lodge"))
    } else {
        std::env::var_os("HOME").map(|home| {
            let home = PathBuf::from(home);
            if cfg!(target_os = "macos") {
                home.join("Library/Application Support/shree-lodge")
            } else {
                home.join(".local/share/shree-lodge")
            }
        })
    }
}

pub struct SettingsStore {
    path: PathBuf,
    data: RwLock<AppSettings>,
}

impl SettingsStore {
    pub fn load(data_dir: &Path) -> Result<Self> {
        Self::load_with_env(data_dir, |key| std::env::var(key).ok())
    }

    pub fn load_with_env<F>(data_dir: &Path, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let path = data_dir.join(SETTINGS_FILE);
        let mut data = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read settings from {}", path.display()))?;
            serde_json::from_str(&contents)
                .with_context(|| format!("Invalid settings in {}", path.display()))?
        } else {
            AppSettings::default()
        };
        data.apply_env(lookup);

        Ok(Self {
            path,
            data: RwLock::new(data),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn current(&self) -> AppSettings {
        self.data
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn update<F>(&self, change: F) -> Result<AppSettings>
    where
        F: FnOnce(&mut AppSettings),
    {
        let mut guard = self.data.write().unwrap_or_else(PoisonError::into_inner);
        let mut next = guard.clone();
        change(&mut next);
        self.persist(&next)?;
        *guard = next.clone();
        Ok(next)
    }

    fn persist(&self, data: &AppSettings) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let serialized = serde_json::to_string_pretty(data)?;
        fs::write(&self.path, serialized)
            .with_context(|| format!("Failed to write settings to {}", self.path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "shree-lodge-settings-{name}-{}",
            std::process::id()
        ));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn defaults_when_file_is_missing() {
        let dir = scratch_dir("missing");
        let store = SettingsStore::load_with_env(&dir, |_| None).unwrap();
        let settings = store.current();

        assert_eq!(settings, AppSettings::default());
        assert_eq!(settings.refresh_interval(), Duration::from_secs(5));
        assert_eq!(settings.credentials().username, "kartik");
        assert!(!store.path().exists());
    }

    #[test]
    fn update_persists_and_reloads() {
        let dir = scratch_dir("update");
        let store = SettingsStore::load_with_env(&dir, |_| None).unwrap();
        store
            .update(|s| {
                s.max_bookings = 25;
                s.whatsapp_number = "911234567890".into();
            })
            .unwrap();

        let reloaded = SettingsStore::load_with_env(&dir, |_| None).unwrap();
        assert_eq!(reloaded.current().max_bookings, 25);
        assert_eq!(reloaded.current().booking_config().whatsapp_number, "911234567890");
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn environment_overrides_file() {
        let dir = scratch_dir("env");
        fs::create_dir_all(&dir).unwrap();
        fs::write(
            dir.join(SETTINGS_FILE),
            r#"{ "whatsapp_number": "910000000000", "profile": "front-desk" }"#,
        )
        .unwrap();

        let store = SettingsStore::load_with_env(&dir, |key| match key {
            ENV_WHATSAPP => Some("919999999999".into()),
            _ => None,
        })
        .unwrap();
        let settings = store.current();
        assert_eq!(settings.whatsapp_number, "919999999999");
        assert_eq!(settings.profile, "front-desk");
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = scratch_dir("bad");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(SETTINGS_FILE), "{ not json").unwrap();
        assert!(SettingsStore::load_with_env(&dir, |_| None).is_err());
        fs::remove_dir_all(&dir).unwrap();
    }
}
