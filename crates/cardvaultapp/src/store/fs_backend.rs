use super::backend::StorageBackend;
use crate::error::{CardError, Result};
use crate::model::{CardId, CardRecord};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::warn;
use uuid::Uuid;

pub const DEFAULT_MIRROR_FILE: &str = "cards-backup.json";
const RECORDS_DIR: &str = "cards";

pub struct FsBackend {
    root: PathBuf,
    mirror_file: String,
}

impl FsBackend {
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            mirror_file: DEFAULT_MIRROR_FILE.to_string(),
        }
    }

    pub fn with_mirror_file(mut self, name: &str) -> Self {
        if !name.trim().is_empty() {
            self.mirror_file = name.to_string();
        }
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn records_dir(&self) -> PathBuf {
        self.root.join(RECORDS_DIR)
    }

    pub fn mirror_path(&self) -> PathBuf {
        self.root.join(&self.mirror_file)
    }

    pub fn record_path(&self, id: &CardId) -> PathBuf {
        self.records_dir().join(record_filename(id))
    }

    fn ensure_dir(&self, path: &Path) -> Result<()> {
        if !path.exists() {
            fs::create_dir_all(path).map_err(CardError::Io)?;
        }
        Ok(())
    }

    /// Write to a sibling tmp file, then rename over the target.
    fn write_atomic(&self, dir: &Path, target: &Path, content: &str) -> Result<()> {
        self.ensure_dir(dir)?;
        let tmp_path = dir.join(format!(".tmp-{}", Uuid::new_v4()));
        if let Err(e) = fs::write(&tmp_path, content) {
            let _ = fs::remove_file(&tmp_path);
            return Err(CardError::Io(e));
        }
        fs::rename(&tmp_path, target).map_err(CardError::Io)?;
        Ok(())
    }

    fn is_record_file(path: &Path) -> bool {
        path.is_file()
            && path
                .file_name()
                .and_then(|s| s.to_str())
                .is_some_and(|name| name.starts_with("card-") && name.ends_with(".json"))
    }
}

/// Ids are opaque strings, so anything outside `[A-Za-z0-9_-]` is escaped as `%XX`.
pub fn record_filename(id: &CardId) -> String {
    let mut escaped = String::with_capacity(id.as_str().len());
    for byte in id.as_str().bytes() {
        if byte.is_ascii_alphanumeric() || byte == b'-' || byte == b'_' {
            escaped.push(byte as char);
        } else {
            escaped.push_str(&format!("%{:02X}", byte));
        }
    }
    format!("card-{}.json", escaped)
}

impl StorageBackend for FsBackend {
    fn load_record(&self, id: &CardId) -> Result<Option<CardRecord>> {
        let path = self.record_path(id);
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(CardError::Io(e)),
        };
        let record: CardRecord =
            serde_json::from_str(&content).map_err(CardError::Serialization)?;
        Ok(Some(record))
    }

    fn save_record(&self, record: &CardRecord) -> Result<()> {
        let dir = self.records_dir();
        let content = serde_json::to_string_pretty(record).map_err(CardError::Serialization)?;
        self.write_atomic(&dir, &self.record_path(&record.id), &content)
    }

    fn remove_record(&self, id: &CardId) -> Result<bool> {
        match fs::remove_file(self.record_path(id)) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(CardError::Io(e)),
        }
    }

    fn load_all_records(&self) -> Result<Vec<CardRecord>> {
        let dir = self.records_dir();
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let mut records = Vec::new();
        for entry in fs::read_dir(&dir).map_err(CardError::Io)? {
            let path = entry.map_err(CardError::Io)?.path();
            if !Self::is_record_file(&path) {
                continue;
            }
            let content = fs::read_to_string(&path).map_err(CardError::Io)?;
            // An undecodable file is left in place; reconciliation can
            // rewrite it from the mirror.
            match serde_json::from_str::<CardRecord>(&content) {
                Ok(record) => records.push(record),
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "skipping unreadable card file")
                }
            }
        }
        Ok(records)
    }

    fn clear_records(&self) -> Result<()> {
        let dir = self.records_dir();
        if !dir.exists() {
            return Ok(());
        }
        for entry in fs::read_dir(&dir).map_err(CardError::Io)? {
            let path = entry.map_err(CardError::Io)?.path();
            if Self::is_record_file(&path) {
                fs::remove_file(path).map_err(CardError::Io)?;
            }
        }
        Ok(())
    }

    fn load_snapshot(&self) -> Result<Option<String>> {
        match fs::read_to_string(self.mirror_path()) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(CardError::Io(e)),
        }
    }

    fn save_snapshot(&self, text: &str) -> Result<()> {
        self.write_atomic(&self.root, &self.mirror_path(), text)
    }

    fn available(&self) -> bool {
        !self.root.exists() || self.root.is_dir()
    }

    fn location(&self) -> String {
        self.root.display().to_string()
    }
}
