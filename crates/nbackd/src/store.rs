//! File-backed key-value store.
//!
//! All keys live in one JSON object (`store.json`). The whole object is
//! rewritten on every `set`; writes are rare (a new high score, an audio
//! toggle) so there is no batching.

use nback::{KeyValueStore, StoreError};
use std::collections::BTreeMap;
use std::fs;
use std::io::Write as _;
use std::path::PathBuf;
use tracing::warn;

#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl FileStore {
    /// Open the store at `path`. A missing file is an empty store; an
    /// unreadable one is logged and treated as empty.
    pub fn open(path: PathBuf) -> Self {
        let values = match fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str::<BTreeMap<String, String>>(&raw) {
                Ok(v) => v,
                Err(e) => {
                    warn!("Ignoring unreadable store {:?}: {}", path, e);
                    BTreeMap::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => {
                warn!("Could not read store {:?}: {}", path, e);
                BTreeMap::new()
            }
        };
        Self { path, values }
    }

    fn flush(&self) -> Result<(), StoreError> {
        let raw = serde_json::to_string_pretty(&self.values)?;

        // Write-then-rename so a crash mid-write never leaves a torn file.
        let tmp = self.path.with_extension("json.tmp");
        {
            let mut f = fs::File::create(&tmp)?;
            f.write_all(raw.as_bytes())?;
            f.sync_all()?;
        }
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.values.insert(key.to_string(), value.to_string());
        self.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("nbackd-{}-{}", name, std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn missing_file_is_empty() {
        let dir = scratch_dir("missing");
        let s = FileStore::open(dir.join("store.json"));
        assert_eq!(s.get("highScoreData"), None);
    }

    #[test]
    fn values_survive_reopen() {
        let dir = scratch_dir("reopen");
        let path = dir.join("store.json");

        let mut s = FileStore::open(path.clone());
        s.set("isAudioEnabled", "false").unwrap();
        s.set("highScoreData", r#"{"score":3}"#).unwrap();

        let s = FileStore::open(path);
        assert_eq!(s.get("isAudioEnabled").as_deref(), Some("false"));
        assert_eq!(s.get("highScoreData").as_deref(), Some(r#"{"score":3}"#));
    }

    #[test]
    fn corrupt_file_is_treated_as_empty() {
        let dir = scratch_dir("corrupt");
        let path = dir.join("store.json");
        fs::write(&path, "{not json").unwrap();

        let mut s = FileStore::open(path.clone());
        assert_eq!(s.get("isAudioEnabled"), None);

        // The next write replaces the corrupt file.
        s.set("isAudioEnabled", "true").unwrap();
        let s = FileStore::open(path);
        assert_eq!(s.get("isAudioEnabled").as_deref(), Some("true"));
    }
}
