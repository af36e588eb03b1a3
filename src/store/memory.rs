//! Implements the `KeyValueStore` trait in memory.
//!
//! Note: this is compiled even in the "production" version of this app so that a `Budget` can be
//! embedded without touching the filesystem.

use crate::store::KeyValueStore;
use crate::Result;
use anyhow::bail;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;

/// A `KeyValueStore` held in memory. Clones share the same data, so a test can keep a handle
/// while a `Storage` owns another. Reads and writes can be made to fail on demand.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    data: Arc<Mutex<HashMap<String, Value>>>,
    fail_reads: Arc<AtomicBool>,
    fail_writes: Arc<AtomicBool>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// When `fail` is true every `get` returns an error.
    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// When `fail` is true every `set_many` returns an error and stores nothing.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// The keys currently stored, sorted.
    pub async fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.data.lock().await.keys().cloned().collect();
        keys.sort();
        keys
    }
}

#[async_trait::async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&mut self, key: &str) -> Result<Option<Value>> {
        if self.fail_reads.load(Ordering::SeqCst) {
            bail!("Reads from the memory store are failing");
        }
        Ok(self.data.lock().await.get(key).cloned())
    }

    async fn set_many(&mut self, entries: Vec<(String, Value)>) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            bail!("Writes to the memory store are failing");
        }
        self.data.lock().await.extend(entries);
        Ok(())
    }
}
