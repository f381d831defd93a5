//! JSON file backing the lookup cache

use crate::error::{LookupError, LookupResult};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info, warn};

/// Flat key/value store persisted as a single JSON object.
///
/// Every write reloads and rewrites the whole file. There is no locking:
/// concurrent writers race and the last one wins.
#[derive(Debug, Clone)]
pub struct CacheStore {
    path: PathBuf,
}

impl CacheStore {
    /// Create a store backed by `path`. The file is created on first write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Backing file location
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Get a cached value.
    ///
    /// Missing file, unparseable file, missing key, and non-string or empty
    /// values all read as absent.
    pub async fn read(&self, key: &str) -> LookupResult<Option<String>> {
        let Some(map) = self.load_lenient().await? else {
            return Ok(None);
        };

        match map.get(key) {
            Some(Value::String(value)) if !value.is_empty() => Ok(Some(value.clone())),
            _ => Ok(None),
        }
    }

    /// Store a value, rewriting the whole file
    pub async fn write(&self, key: &str, value: &str) -> LookupResult<()> {
        let mut map = self.load_strict().await?;
        map.insert(key.to_string(), Value::String(value.to_string()));

        self.ensure_parent_dir().await?;
        let content = serde_json::to_string_pretty(&Value::Object(map))?;
        fs::write(&self.path, content).await.map_err(|e| {
            LookupError::io(format!("writing cache file {}", self.path.display()), e)
        })?;

        info!("Cached {} in {}", key, self.path.display());
        Ok(())
    }

    /// All string entries, sorted by key
    pub async fn entries(&self) -> LookupResult<Vec<(String, String)>> {
        let map = self.load_strict().await?;
        let mut entries: Vec<(String, String)> = map
            .into_iter()
            .filter_map(|(key, value)| match value {
                Value::String(s) => Some((key, s)),
                _ => None,
            })
            .collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(entries)
    }

    async fn read_raw(&self) -> LookupResult<Option<String>> {
        if !self.path.exists() {
            debug!("Cache file {} does not exist", self.path.display());
            return Ok(None);
        }

        fs::read_to_string(&self.path)
            .await
            .map(Some)
            .map_err(|e| LookupError::io(format!("reading cache file {}", self.path.display()), e))
    }

    async fn load_lenient(&self) -> LookupResult<Option<Map<String, Value>>> {
        let Some(content) = self.read_raw().await? else {
            return Ok(None);
        };

        match serde_json::from_str::<Value>(&content) {
            Ok(Value::Object(map)) => Ok(Some(map)),
            Ok(_) => {
                warn!("Cache file {} is not a JSON object, ignoring", self.path.display());
                Ok(None)
            }
            Err(e) => {
                warn!("Cache file {} is unreadable, ignoring: {}", self.path.display(), e);
                Ok(None)
            }
        }
    }

    /// Like `load_lenient`, but refuses to treat a damaged file as empty so
    /// a write never silently discards existing content.
    async fn load_strict(&self) -> LookupResult<Map<String, Value>> {
        let Some(content) = self.read_raw().await? else {
            return Ok(Map::new());
        };

        match serde_json::from_str::<Value>(&content) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(other) => Err(LookupError::CacheCorrupt {
                path: self.path.clone(),
                reason: format!("top-level value is {}", json_type(&other)),
            }),
            Err(e) => Err(LookupError::CacheCorrupt {
                path: self.path.clone(),
                reason: e.to_string(),
            }),
        }
    }

    async fn ensure_parent_dir(&self) -> LookupResult<()> {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => {
                fs::create_dir_all(parent).await.map_err(|e| {
                    LookupError::io(format!("creating cache directory {}", parent.display()), e)
                })
            }
            _ => Ok(()),
        }
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
