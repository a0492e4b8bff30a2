//! Key/value storage abstraction.
//!
//! The [`KeyValueStore`] trait is the only thing the history store needs
//! from a storage backend: get, set, and remove one string value by key.
//! The durable SQLite backend lives in the `tonecheck` crate; the
//! [`memory::InMemoryStore`] here backs tests.
//!
//! Implementations must be `Send + Sync` to work with async runtimes.
//! A single call is atomic with respect to its key. Nothing stronger is
//! promised: a read followed by a write from two processes can interleave.

pub mod memory;

use anyhow::Result;
use async_trait::async_trait;

/// Abstract string key/value backend.
///
/// # Operations
///
/// | Method | Purpose |
/// |--------|---------|
/// | [`get`](KeyValueStore::get) | Read the value under a key, if any |
/// | [`set`](KeyValueStore::set) | Write (insert or overwrite) a value |
/// | [`remove`](KeyValueStore::remove) | Delete a key; absent keys are not an error |
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>>;

    async fn set(&self, key: &str, value: &str) -> Result<()>;

    async fn remove(&self, key: &str) -> Result<()>;
}
