//! Durable persistence for server records.
//!
//! The store holds the flat list of [`ServerRecord`]s under a single
//! namespaced JSON file (`~/.config/mocktty/servers.json` on most platforms)
//! and re-serializes the whole list on every mutation. Loading never fails on
//! bad content: an empty, unreadable, or malformed file falls over to the
//! built-in seed set, and records missing their owning service id are
//! repaired before use. Both recoveries are written back to disk.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::Utc;
use dirs_next::config_dir;
use mocktty_types::ServerRecord;
use thiserror::Error;
use tracing::warn;

use crate::expand_tilde;

/// Environment variable allowing callers to override the server list path.
pub const SERVERS_PATH_ENV: &str = "MOCKTTY_SERVERS_PATH";

/// Default filename for the persisted server list.
pub const SERVERS_FILE_NAME: &str = "servers.json";

/// Service id assigned to loaded records that are missing one.
pub const FALLBACK_SERVICE_ID: &str = "user";

/// Error surfaced when persisting the server list fails.
#[derive(Debug, Error)]
pub enum ServerStoreError {
    /// I/O failure (for example, permissions or missing directory).
    #[error("server store I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Serialization failure.
    #[error("server store serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// File-backed store for the flat server list.
#[derive(Debug)]
pub struct ServerStore {
    path: PathBuf,
    records: Mutex<Vec<ServerRecord>>,
    persist_to_disk: bool,
}

impl ServerStore {
    /// Load the store from its default location.
    pub fn load() -> Result<Self, ServerStoreError> {
        Self::at_path(default_servers_path())
    }

    /// Load the store from an explicit path.
    ///
    /// Falls over to the seed set on empty, unreadable, or malformed content
    /// and repairs records missing their owning service id; either recovery
    /// rewrites the file.
    pub fn at_path(path: PathBuf) -> Result<Self, ServerStoreError> {
        let (records, needs_rewrite) = load_records(&path);
        let store = Self {
            path,
            records: Mutex::new(records),
            persist_to_disk: true,
        };
        if needs_rewrite {
            let records = store.records.lock().expect("server store lock poisoned");
            store.save_locked(&records)?;
        }
        Ok(store)
    }

    /// Build an in-memory store seeded with the default servers; used when
    /// the config directory cannot be accessed, and in tests.
    pub fn ephemeral() -> Self {
        Self {
            path: PathBuf::new(),
            records: Mutex::new(seed_servers()),
            persist_to_disk: false,
        }
    }

    /// Path to the underlying JSON file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Snapshot of all records.
    pub fn records(&self) -> Vec<ServerRecord> {
        self.records.lock().expect("server store lock poisoned").clone()
    }

    /// Snapshot of the records owned by the given service.
    pub fn records_for_service(&self, service_id: &str) -> Vec<ServerRecord> {
        self.records
            .lock()
            .expect("server store lock poisoned")
            .iter()
            .filter(|record| record.service_id == service_id)
            .cloned()
            .collect()
    }

    /// Look up a record by id.
    pub fn record(&self, id: &str) -> Option<ServerRecord> {
        self.records
            .lock()
            .expect("server store lock poisoned")
            .iter()
            .find(|record| record.id == id)
            .cloned()
    }

    /// Append a record and re-persist the full list.
    pub fn add(&self, record: ServerRecord) -> Result<(), ServerStoreError> {
        let mut records = self.records.lock().expect("server store lock poisoned");
        records.push(record);
        self.save_locked(&records)
    }

    /// Replace the record with the same id and re-persist the full list.
    ///
    /// Returns `false` when no record matched.
    pub fn update(&self, record: ServerRecord) -> Result<bool, ServerStoreError> {
        let mut records = self.records.lock().expect("server store lock poisoned");
        let Some(slot) = records.iter_mut().find(|existing| existing.id == record.id) else {
            return Ok(false);
        };
        *slot = record;
        self.save_locked(&records)?;
        Ok(true)
    }

    /// Remove the record with the given id and re-persist the full list.
    ///
    /// Returns `false` when no record matched. Advancing the UI selection
    /// after removing the selected server is the caller's responsibility.
    pub fn remove(&self, id: &str) -> Result<bool, ServerStoreError> {
        let mut records = self.records.lock().expect("server store lock poisoned");
        let before = records.len();
        records.retain(|record| record.id != id);
        if records.len() == before {
            return Ok(false);
        }
        self.save_locked(&records)?;
        Ok(true)
    }

    fn save_locked(&self, records: &[ServerRecord]) -> Result<(), ServerStoreError> {
        if !self.persist_to_disk {
            return Ok(());
        }
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_string_pretty(records)?;
        fs::write(&self.path, data)?;
        Ok(())
    }
}

/// Generate a record id from the creation timestamp (millisecond epoch).
pub fn new_record_id() -> String {
    Utc::now().timestamp_millis().to_string()
}

/// The hard-coded seed set used when no usable server list exists.
pub fn seed_servers() -> Vec<ServerRecord> {
    [
        ("1", "用户服务-开发环境", "http://dev-api.example.com/user", "user"),
        ("2", "用户服务-测试环境", "http://test-api.example.com/user", "user"),
        ("3", "用户服务-生产环境", "http://api.example.com/user", "user"),
        ("4", "订单服务-开发环境", "http://dev-api.example.com/order", "order"),
        ("5", "订单服务-测试环境", "http://test-api.example.com/order", "order"),
        ("6", "产品服务-开发环境", "http://dev-api.example.com/product", "product"),
        ("7", "数据分析-开发环境", "http://dev-api.example.com/analytics", "analytics"),
    ]
    .into_iter()
    .map(|(id, name, address, service_id)| ServerRecord {
        id: id.into(),
        name: name.into(),
        address: address.into(),
        service_id: service_id.into(),
    })
    .collect()
}

fn default_servers_path() -> PathBuf {
    if let Ok(path) = env::var(SERVERS_PATH_ENV)
        && !path.trim().is_empty()
    {
        return expand_tilde(&path);
    }

    config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("mocktty")
        .join(SERVERS_FILE_NAME)
}

/// Read the server list, returning the records and whether they must be
/// written back (seed fallback or repair).
fn load_records(path: &Path) -> (Vec<ServerRecord>, bool) {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(error) => {
            if error.kind() != std::io::ErrorKind::NotFound {
                warn!(path = %path.display(), error = %error, "Server list unreadable; using seed servers");
            }
            return (seed_servers(), true);
        }
    };

    match serde_json::from_str::<Vec<ServerRecord>>(&content) {
        Ok(records) if records.is_empty() => (seed_servers(), true),
        Ok(mut records) => {
            let mut repaired = false;
            for record in &mut records {
                if record.service_id.is_empty() {
                    record.service_id = FALLBACK_SERVICE_ID.into();
                    repaired = true;
                }
            }
            (records, repaired)
        }
        Err(error) => {
            warn!(path = %path.display(), error = %error, "Failed to parse server list; using seed servers");
            (seed_servers(), true)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn record(id: &str, service_id: &str) -> ServerRecord {
        ServerRecord {
            id: id.into(),
            name: format!("server {id}"),
            address: format!("http://example.com/{id}"),
            service_id: service_id.into(),
        }
    }

    #[test]
    fn missing_file_seeds_and_persists() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("servers.json");

        let store = ServerStore::at_path(path.clone()).unwrap();
        assert_eq!(store.records(), seed_servers());
        assert!(path.exists(), "seed list must be written back");
    }

    #[test]
    fn malformed_content_falls_back_to_seed() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("servers.json");
        fs::write(&path, "not json").unwrap();

        let store = ServerStore::at_path(path.clone()).unwrap();
        assert_eq!(store.records(), seed_servers());

        let rewritten = fs::read_to_string(&path).unwrap();
        let parsed: Vec<ServerRecord> = serde_json::from_str(&rewritten).unwrap();
        assert_eq!(parsed, seed_servers());
    }

    #[test]
    fn empty_list_falls_back_to_seed() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("servers.json");
        fs::write(&path, "[]").unwrap();

        let store = ServerStore::at_path(path).unwrap();
        assert_eq!(store.records(), seed_servers());
    }

    #[test]
    fn missing_service_id_is_repaired_and_rewritten() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("servers.json");
        fs::write(
            &path,
            r#"[{"id": "9", "name": "legacy", "address": "http://example.com/legacy"}]"#,
        )
        .unwrap();

        let store = ServerStore::at_path(path.clone()).unwrap();
        assert_eq!(store.records()[0].service_id, FALLBACK_SERVICE_ID);

        let rewritten = fs::read_to_string(&path).unwrap();
        assert!(rewritten.contains("\"serviceId\": \"user\""));
    }

    #[test]
    fn mutations_re_persist_the_whole_list() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("servers.json");
        let store = ServerStore::at_path(path.clone()).unwrap();

        store.add(record("100", "order")).unwrap();
        let reloaded = ServerStore::at_path(path.clone()).unwrap();
        assert!(reloaded.record("100").is_some());

        let mut renamed = record("100", "order");
        renamed.name = "renamed".into();
        assert!(store.update(renamed).unwrap());
        let reloaded = ServerStore::at_path(path.clone()).unwrap();
        assert_eq!(reloaded.record("100").unwrap().name, "renamed");

        assert!(store.remove("100").unwrap());
        assert!(!store.remove("100").unwrap());
        let reloaded = ServerStore::at_path(path).unwrap();
        assert!(reloaded.record("100").is_none());
    }

    #[test]
    fn records_for_service_filters_by_owner() {
        let store = ServerStore::ephemeral();
        let owned = store.records_for_service("order");
        assert!(!owned.is_empty());
        assert!(owned.iter().all(|record| record.service_id == "order"));
    }

    #[test]
    fn default_path_honors_env_override() {
        temp_env::with_var(SERVERS_PATH_ENV, Some("~/custom/servers.json"), || {
            let path = default_servers_path();
            assert_eq!(path, expand_tilde("~/custom/servers.json"));
        });
    }

    #[test]
    fn new_record_ids_are_epoch_millis() {
        let id = new_record_id();
        assert!(id.parse::<i64>().is_ok());
    }
}
