//! In-memory storage backend.
//!
//! Thread-safe ordered key-value storage over a `BTreeMap`, suitable for
//! development and the test suites. Nothing is persisted.

use std::{
    collections::BTreeMap,
    sync::{Arc, RwLock},
};

use async_trait::async_trait;
use bytes::Bytes;

use crate::backend::{
    BackendSnafu, ByteRange, KeyValue, StorageBackend, StorageError, StorageResult,
};

/// In-memory [`StorageBackend`] implementation.
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    data: Arc<RwLock<BTreeMap<Vec<u8>, Vec<u8>>>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> StorageResult<std::sync::RwLockReadGuard<'_, BTreeMap<Vec<u8>, Vec<u8>>>> {
        self.data.read().map_err(|_| poisoned())
    }

    fn write(&self) -> StorageResult<std::sync::RwLockWriteGuard<'_, BTreeMap<Vec<u8>, Vec<u8>>>> {
        self.data.write().map_err(|_| poisoned())
    }
}

fn poisoned() -> StorageError {
    BackendSnafu { message: "memory backend lock poisoned" }.build()
}

#[async_trait]
impl StorageBackend for MemoryBackend {
    async fn get(&self, key: &[u8]) -> StorageResult<Option<Bytes>> {
        Ok(self.read()?.get(key).map(|value| Bytes::copy_from_slice(value)))
    }

    async fn set(&self, key: Vec<u8>, value: Vec<u8>) -> StorageResult<()> {
        self.write()?.insert(key, value);
        Ok(())
    }

    async fn delete(&self, key: &[u8]) -> StorageResult<()> {
        self.write()?.remove(key);
        Ok(())
    }

    async fn get_range(&self, range: ByteRange) -> StorageResult<Vec<KeyValue>> {
        Ok(self
            .read()?
            .range(range)
            .map(|(key, value)| KeyValue {
                key: Bytes::copy_from_slice(key),
                value: Bytes::copy_from_slice(value),
            })
            .collect())
    }

    async fn compare_and_swap(
        &self,
        key: &[u8],
        expected: Option<&[u8]>,
        new: Vec<u8>,
    ) -> StorageResult<()> {
        let mut data = self.write()?;
        let current = data.get(key).map(Vec::as_slice);
        if current != expected {
            return Err(StorageError::CasConflict);
        }
        data.insert(key.to_vec(), new);
        Ok(())
    }

    async fn health_check(&self) -> StorageResult<()> {
        self.read().map(|_| ())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_basic_operations() {
        let backend = MemoryBackend::new();

        // Set and get
        backend.set(b"key1".to_vec(), b"value1".to_vec()).await.unwrap();
        let value = backend.get(b"key1").await.unwrap();
        assert_eq!(value, Some(Bytes::from("value1")));

        // Delete
        backend.delete(b"key1").await.unwrap();
        let value = backend.get(b"key1").await.unwrap();
        assert_eq!(value, None);
    }

    #[tokio::test]
    async fn test_range_operations() {
        let backend = MemoryBackend::new();

        backend.set(b"a".to_vec(), b"1".to_vec()).await.unwrap();
        backend.set(b"b".to_vec(), b"2".to_vec()).await.unwrap();
        backend.set(b"c".to_vec(), b"3".to_vec()).await.unwrap();

        let range =
            backend.get_range(ByteRange::from_bounds(b"a".to_vec()..b"c".to_vec())).await.unwrap();
        assert_eq!(range.len(), 2);
        assert_eq!(range[0].key, Bytes::from("a"));
        assert_eq!(range[1].key, Bytes::from("b"));
    }

    #[tokio::test]
    async fn test_cas_create_then_conflict() {
        let backend = MemoryBackend::new();

        // Create from absent
        backend.compare_and_swap(b"k", None, b"v1".to_vec()).await.unwrap();

        // A second create from absent must conflict
        let err = backend.compare_and_swap(b"k", None, b"v2".to_vec()).await.unwrap_err();
        assert!(matches!(err, StorageError::CasConflict));

        // Value untouched by the failed swap
        assert_eq!(backend.get(b"k").await.unwrap(), Some(Bytes::from("v1")));
    }

    #[tokio::test]
    async fn test_cas_replace() {
        let backend = MemoryBackend::new();
        backend.set(b"k".to_vec(), b"old".to_vec()).await.unwrap();

        backend.compare_and_swap(b"k", Some(b"old"), b"new".to_vec()).await.unwrap();
        assert_eq!(backend.get(b"k").await.unwrap(), Some(Bytes::from("new")));

        // Stale expectation loses
        let err = backend.compare_and_swap(b"k", Some(b"old"), b"other".to_vec()).await.unwrap_err();
        assert!(matches!(err, StorageError::CasConflict));
    }

    #[tokio::test]
    async fn test_health_check() {
        let backend = MemoryBackend::new();
        assert!(backend.health_check().await.is_ok());
    }
}
