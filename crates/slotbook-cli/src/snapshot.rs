//! JSON snapshot of the CLI's persisted state.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use slotbook_core::Appointment;
use slotbook_store::Notification;

use crate::error::{CliError, CliResult};

/// Everything the CLI keeps between runs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Snapshot {
    pub appointments: Vec<Appointment>,
    pub notifications: Vec<Notification>,
}

impl Snapshot {
    /// Loads a snapshot, or an empty one if the file does not exist yet.
    pub async fn load(path: &Path) -> CliResult<Self> {
        let content = match tokio::fs::read_to_string(path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "No snapshot yet, starting empty");
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(CliError::SnapshotIo {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        serde_json::from_str(&content).map_err(|source| CliError::SnapshotFormat {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Writes the snapshot, replacing the file atomically.
    pub async fn save(&self, path: &Path) -> CliResult<()> {
        let io_err = |source| CliError::SnapshotIo {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(io_err)?;
        }

        let json = serde_json::to_string_pretty(self)?;
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, json).await.map_err(io_err)?;
        tokio::fs::rename(&tmp, path).await.map_err(io_err)?;

        debug!(
            path = %path.display(),
            appointments = self.appointments.len(),
            notifications = self.notifications.len(),
            "Snapshot saved"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use slotbook_core::{AppointmentId, NewAppointment};
    use tempfile::TempDir;

    fn sample() -> Snapshot {
        let date = NaiveDate::from_ymd_opt(2024, 3, 10)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();
        Snapshot {
            appointments: vec![Appointment::from_new(
                AppointmentId::new(),
                NewAppointment::new("pa", "cb", date),
            )],
            notifications: vec![Notification {
                id: uuid::Uuid::new_v4(),
                recipient_id: "pa".to_string(),
                content: "New appointment for 10/03/2024 at 09:00".to_string(),
                read: false,
                created_at: date,
            }],
        }
    }

    #[tokio::test]
    async fn missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let snapshot = Snapshot::load(&dir.path().join("none.json")).await.unwrap();
        assert_eq!(snapshot, Snapshot::default());
    }

    #[tokio::test]
    async fn save_then_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("data.json");
        let snapshot = sample();

        snapshot.save(&path).await.unwrap();
        assert!(!path.with_extension("json.tmp").exists());
        assert_eq!(Snapshot::load(&path).await.unwrap(), snapshot);
    }

    #[tokio::test]
    async fn missing_sections_default() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("data.json");
        std::fs::write(&path, r#"{"appointments": []}"#).unwrap();
        assert!(Snapshot::load(&path).await.unwrap().notifications.is_empty());
    }

    #[tokio::test]
    async fn corrupt_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("data.json");
        std::fs::write(&path, "not json").unwrap();
        let err = Snapshot::load(&path).await.unwrap_err();
        assert!(matches!(err, CliError::SnapshotFormat { .. }));
    }
}
