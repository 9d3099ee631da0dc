use crate::domain::model::Participant;
use crate::domain::ports::{RosterStore, Storage};
use crate::utils::error::{Result, ToolboxError};
use std::path::{Path, PathBuf};

pub const DEFAULT_ROSTER_KEY: &str = "hr_event_participants";

#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
}

impl LocalStorage {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }
}

impl Storage for LocalStorage {
    async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
        let full_path = self.base_path.join(path);
        let data = tokio::fs::read(full_path).await?;
        Ok(data)
    }

    async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
        let full_path = self.base_path.join(path);

        if let Some(parent) = full_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        tokio::fs::write(full_path, data).await?;
        Ok(())
    }
}

/// Keeps the roster as a JSON array in `<key>.json` on any `Storage`.
#[derive(Debug, Clone)]
pub struct FileRosterStore<S: Storage> {
    storage: S,
    key: String,
}

impl<S: Storage> FileRosterStore<S> {
    pub fn new(storage: S, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
        }
    }

    fn file_name(&self) -> String {
        format!("{}.json", self.key)
    }
}

impl<S: Storage> RosterStore for FileRosterStore<S> {
    async fn load(&self) -> Result<Vec<Participant>> {
        let data = match self.storage.read_file(&self.file_name()).await {
            Ok(data) => data,
            Err(ToolboxError::IoError(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("No saved roster under '{}'", self.key);
                return Ok(Vec::new());
            }
            Err(e) => return Err(e),
        };

        serde_json::from_slice(&data).map_err(|e| ToolboxError::PersistenceParse {
            message: e.to_string(),
        })
    }

    async fn save(&self, participants: &[Participant]) -> Result<()> {
        let json = serde_json::to_vec_pretty(participants)?;
        self.storage.write_file(&self.file_name(), &json).await?;
        tracing::debug!("Saved {} participants under '{}'", participants.len(), self.key);
        Ok(())
    }
}

/// Any load failure is logged and treated as "no saved roster".
pub async fn load_roster_or_empty<R: RosterStore>(store: &R) -> Vec<Participant> {
    match store.load().await {
        Ok(participants) => participants,
        Err(e) => {
            tracing::warn!("⚠️ Discarding saved roster: {}", e);
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    #[derive(Clone, Default)]
    struct MockStorage {
        files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    }

    impl MockStorage {
        async fn put(&self, path: &str, data: &[u8]) {
            self.files.lock().await.insert(path.to_string(), data.to_vec());
        }

        async fn get_file(&self, path: &str) -> Option<Vec<u8>> {
            self.files.lock().await.get(path).cloned()
        }
    }

    impl Storage for MockStorage {
        async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned().ok_or_else(|| {
                ToolboxError::IoError(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("File not found: {}", path),
                ))
            })
        }

        async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
            self.put(path, data).await;
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_save_then_load_roster() {
        let storage = MockStorage::default();
        let store = FileRosterStore::new(storage.clone(), DEFAULT_ROSTER_KEY);
        let roster = vec![Participant::new("Ana"), Participant::new("Bo")];

        store.save(&roster).await.unwrap();

        assert!(storage
            .get_file("hr_event_participants.json")
            .await
            .is_some());
        assert_eq!(store.load().await.unwrap(), roster);
    }

    #[tokio::test]
    async fn test_missing_file_is_empty_roster() {
        let store = FileRosterStore::new(MockStorage::default(), "roster");
        assert!(store.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_malformed_roster_reports_parse_error() {
        let storage = MockStorage::default();
        storage.put("roster.json", b"{not json").await;
        let store = FileRosterStore::new(storage, "roster");

        assert!(matches!(
            store.load().await,
            Err(ToolboxError::PersistenceParse { .. })
        ));
        assert!(load_roster_or_empty(&store).await.is_empty());
    }

    #[tokio::test]
    async fn test_local_storage_creates_directories() {
        let dir = tempfile::TempDir::new().unwrap();
        let storage = LocalStorage::new(dir.path());

        storage.write_file("nested/data.txt", b"hello").await.unwrap();

        assert_eq!(storage.read_file("nested/data.txt").await.unwrap(), b"hello");
    }
}
