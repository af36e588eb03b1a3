use crate::store::KeyValueStore;
use crate::{utils, Result};
use anyhow::Context;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use tracing::trace;

/// Keeps every key in one JSON object in a single file. Each batch rewrites the file through a
/// temporary file and a rename.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_document(&self) -> Result<Option<Map<String, Value>>> {
        if !utils::exists(&self.path).await? {
            return Ok(None);
        }
        let content = utils::read(&self.path).await?;
        let document = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse JSON file at {}", self.path.display()))?;
        Ok(Some(document))
    }
}

#[async_trait::async_trait]
impl KeyValueStore for JsonFileStore {
    async fn get(&mut self, key: &str) -> Result<Option<Value>> {
        trace!("get {key} from {}", self.path.display());
        Ok(self
            .read_document()
            .await?
            .and_then(|mut document| document.remove(key)))
    }

    async fn set_many(&mut self, entries: Vec<(String, Value)>) -> Result<()> {
        let mut document = self.read_document().await?.unwrap_or_default();
        for (key, value) in entries {
            trace!("set {key} in {}", self.path.display());
            document.insert(key, value);
        }
        let json = serde_json::to_string_pretty(&document)
            .context("Unable to serialize the budget document")?;
        utils::write_replace(&self.path, json).await
    }
}
