//! Throwaway SQLite databases for storage tests.

use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use super::sqlite::CatalogStorage;

pub struct TempStorage {
    pub storage: CatalogStorage,
    path: PathBuf,
}

impl TempStorage {
    pub async fn new(tag: &str) -> Self {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time before UNIX_EPOCH")
            .as_nanos();
        let mut path = std::env::temp_dir();
        path.push(format!(
            "retro-catalog-{tag}-{}-{nanos}.sqlite",
            std::process::id()
        ));
        let storage = CatalogStorage::connect(&format!("sqlite:{}", path.display()))
            .await
            .expect("failed to open test database");
        Self { storage, path }
    }
}

impl Drop for TempStorage {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.path);
        for suffix in ["-wal", "-shm"] {
            let mut sidecar = self.path.clone().into_os_string();
            sidecar.push(suffix);
            let _ = std::fs::remove_file(sidecar);
        }
    }
}
