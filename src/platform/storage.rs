//! Durable key-value storage
//!
//! Browser builds persist to LocalStorage; tests and the native demo use an
//! in-memory map with the same semantics.

use std::collections::HashMap;

/// Minimal string key-value store
pub trait KeyValueStore {
    /// Read a value, `None` if absent or unreadable
    fn get(&self, key: &str) -> Option<String>;
    /// Write a value
    fn set(&mut self, key: &str, value: &str) -> anyhow::Result<()>;
}

/// In-memory store
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> anyhow::Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Window LocalStorage
#[cfg(target_arch = "wasm32")]
pub struct LocalStore {
    storage: web_sys::Storage,
}

#[cfg(target_arch = "wasm32")]
impl LocalStore {
    pub fn open() -> anyhow::Result<Self> {
        use anyhow::Context;

        let storage = web_sys::window()
            .context("no window")?
            .local_storage()
            .map_err(|e| anyhow::anyhow!("local storage unavailable: {:?}", e))?
            .context("local storage disabled")?;
        Ok(Self { storage })
    }
}

#[cfg(target_arch = "wasm32")]
impl KeyValueStore for LocalStore {
    fn get(&self, key: &str) -> Option<String> {
        self.storage.get_item(key).ok().flatten()
    }

    fn set(&mut self, key: &str, value: &str) -> anyhow::Result<()> {
        self.storage
            .set_item(key, value)
            .map_err(|e| anyhow::anyhow!("failed to write {}: {:?}", key, e))
    }
}
