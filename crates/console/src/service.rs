use std::collections::VecDeque;

use crate::{
    log,
    settings::{Settings, SettingsRepository, SettingsService},
};

pub struct Service<R> {
    repository: R,
}

impl<R> Service<R> {
    pub fn new(repository: R) -> Self {
        Self { repository }
    }
}

impl<R: log::Repository> log::Service for Service<R> {
    fn get_log_entries(&self) -> Result<VecDeque<log::Entry>, log::Error> {
        self.repository.read_entries()
    }

    fn add_log_entry(&self, entry: log::Entry) -> Result<(), log::Error> {
        self.repository.write_entry(entry)
    }
}

impl<R: SettingsRepository> SettingsService for Service<R> {
    async fn get_settings(&self) -> Result<Settings, String> {
        self.repository.read_settings().await
    }

    async fn set_settings(&self, settings: Settings) -> Result<(), String> {
        self.repository.write_settings(settings).await
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::{
        log::{Entry, MemoryLog, Service as _},
        settings::JsonFile,
    };

    use super::*;

    #[test]
    fn test_log_entries() {
        let service = Service::new(MemoryLog::default());
        let entry = Entry {
            time: "Feb 02 10:00:00".to_string(),
            level: ::log::Level::Error,
            message: "failed to create assignment".to_string(),
        };
        service.add_log_entry(entry.clone()).unwrap();
        assert_eq!(service.get_log_entries().unwrap(), VecDeque::from([entry]));
    }

    #[tokio::test]
    async fn test_settings() {
        let path = std::env::temp_dir().join(format!("coach-{}.json", uuid::Uuid::new_v4()));
        let service = Service::new(JsonFile::new(&path));
        let settings = Settings {
            search_debounce_ms: 0,
            ..Settings::default()
        };
        service.set_settings(settings).await.unwrap();
        assert_eq!(service.get_settings().await, Ok(settings));
        std::fs::remove_file(path).unwrap();
    }
}
