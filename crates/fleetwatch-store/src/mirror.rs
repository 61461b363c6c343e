use crate::error::{Result, StoreError};
use fleetwatch_common::types::Notification;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Key the feed is persisted under.
pub const STORAGE_KEY: &str = "adminNotifications";

/// Durable copy of the notification feed.
///
/// `load` is called once when a store is opened; `save` receives the full
/// feed, newest first, after every mutation.
pub trait FeedMirror: Send {
    fn load(&self) -> Result<Vec<Notification>>;

    fn save(&mut self, notifications: &[Notification]) -> Result<()>;
}

/// Persists the feed as a JSON document of `key -> records`.
///
/// Other keys already present in the document are kept on save. A missing
/// file loads as an empty feed.
#[derive(Debug, Clone)]
pub struct JsonFileMirror {
    path: PathBuf,
    key: String,
}

impl JsonFileMirror {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_key(path, STORAGE_KEY)
    }

    pub fn with_key(path: impl Into<PathBuf>, key: &str) -> Self {
        Self {
            path: path.into(),
            key: key.to_string(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_document(&self) -> Result<Option<Map<String, Value>>> {
        let text = match std::fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        match serde_json::from_str::<Value>(&text)? {
            Value::Object(map) => Ok(Some(map)),
            other => Err(StoreError::Other(format!(
                "expected a JSON object in {}, found {}",
                self.path.display(),
                json_kind(&other)
            ))),
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

impl FeedMirror for JsonFileMirror {
    fn load(&self) -> Result<Vec<Notification>> {
        let Some(mut document) = self.read_document()? else {
            return Ok(Vec::new());
        };
        match document.remove(&self.key) {
            None | Some(Value::Null) => Ok(Vec::new()),
            Some(records) => Ok(serde_json::from_value(records)?),
        }
    }

    fn save(&mut self, notifications: &[Notification]) -> Result<()> {
        // An unreadable document is overwritten.
        let mut document = self.read_document().ok().flatten().unwrap_or_default();
        document.insert(self.key.clone(), serde_json::to_value(notifications)?);

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, serde_json::to_vec_pretty(&Value::Object(document))?)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

/// In-process mirror. Clones share the same records, so a caller can keep a
/// handle to inspect what the store wrote.
#[derive(Debug, Clone, Default)]
pub struct MemoryMirror {
    records: Arc<Mutex<Vec<Notification>>>,
}

impl MemoryMirror {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seeded(records: Vec<Notification>) -> Self {
        Self {
            records: Arc::new(Mutex::new(records)),
        }
    }

    pub fn snapshot(&self) -> Vec<Notification> {
        self.records
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

impl FeedMirror for MemoryMirror {
    fn load(&self) -> Result<Vec<Notification>> {
        Ok(self.snapshot())
    }

    fn save(&mut self, notifications: &[Notification]) -> Result<()> {
        let mut records = self.records.lock().unwrap_or_else(|e| e.into_inner());
        *records = notifications.to_vec();
        Ok(())
    }
}
