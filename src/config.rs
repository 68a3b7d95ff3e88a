use crate::domain::error::DomainError;
use crate::domain::values::recipient_id::RecipientId;
use crate::domain::values::report_limit::DEFAULT_LIMIT;
use serde::Deserialize;
use std::path::Path;
use tracing::warn;

pub const CONFIG_PATH_ENV: &str = "STEAM_TOPSELLERS_CONFIG";
pub const DATA_PATH_ENV: &str = "STEAM_TOPSELLERS_DATA";
pub const REMIND_TIME_ENV: &str = "STEAM_TOPSELLERS_REMIND_TIME";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Daily report time, e.g. "08:35".
    pub remind_time: String,
    pub manually_added_groups: Vec<String>,
    pub manually_added_senders: Vec<String>,
    pub default_top_num: i64,
    /// Platform prefix for configured ids that are not full session ids.
    pub platform: String,
    pub data_path: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            remind_time: "09:00".into(),
            manually_added_groups: Vec::new(),
            manually_added_senders: Vec::new(),
            default_top_num: DEFAULT_LIMIT as i64,
            platform: "aiocqhttp".into(),
            data_path: "./steam_topsellers_subscriptions.json".into(),
        }
    }
}

impl Settings {
    /// Read the JSON config named by `STEAM_TOPSELLERS_CONFIG` (defaults if
    /// absent), then apply environment overrides.
    pub fn from_env() -> Result<Self, DomainError> {
        let path = std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| "./steam_topsellers.json".into());
        let mut settings = Self::from_file(Path::new(&path))?;

        if let Ok(data_path) = std::env::var(DATA_PATH_ENV) {
            settings.data_path = data_path;
        }
        if let Ok(remind_time) = std::env::var(REMIND_TIME_ENV) {
            settings.remind_time = remind_time;
        }
        Ok(settings)
    }

    /// Missing file means defaults; an unreadable or invalid one is an error.
    pub fn from_file(path: &Path) -> Result<Self, DomainError> {
        match std::fs::read_to_string(path) {
            Ok(raw) => serde_json::from_str(&raw)
                .map_err(|e| DomainError::Config(format!("{}: {e}", path.display()))),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(DomainError::Config(format!("{}: {e}", path.display()))),
        }
    }

    /// Configured groups and senders as recipients. Invalid ids are skipped.
    pub fn static_recipients(&self) -> Vec<RecipientId> {
        let groups = self
            .manually_added_groups
            .iter()
            .map(|raw| (raw, RecipientId::group(&self.platform, raw)));
        let senders = self
            .manually_added_senders
            .iter()
            .map(|raw| (raw, RecipientId::direct(&self.platform, raw)));

        groups
            .chain(senders)
            .filter_map(|(raw, id)| match id {
                Ok(id) => Some(id),
                Err(e) => {
                    warn!(entry = %raw, error = %e, "Ignoring configured recipient");
                    None
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"remind_time": "8:35", "manually_added_groups": ["555"]}"#).unwrap();

        let settings = Settings::from_file(&path).unwrap();
        assert_eq!(settings.remind_time, "8:35");
        assert_eq!(settings.default_top_num, 5);
        assert_eq!(settings.platform, "aiocqhttp");
    }

    #[test]
    fn test_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::from_file(&dir.path().join("nope.json")).unwrap();
        assert_eq!(settings.remind_time, "09:00");
    }

    #[test]
    fn test_invalid_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(Settings::from_file(&path), Err(DomainError::Config(_))));
    }

    #[test]
    fn test_static_recipients() {
        let settings = Settings {
            manually_added_groups: vec!["555".into(), " ".into()],
            manually_added_senders: vec!["10001".into()],
            ..Settings::default()
        };
        let ids: Vec<String> = settings.static_recipients().iter().map(|i| i.to_string()).collect();
        assert_eq!(
            ids,
            vec!["aiocqhttp:GroupMessage:555", "aiocqhttp:FriendMessage:10001"]
        );
    }
}
