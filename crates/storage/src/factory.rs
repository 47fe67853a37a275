//! Backend selection.
//!
//! A single enum wraps the concrete backends so application code can hold
//! one value regardless of which store the deployment uses. The in-memory
//! backend is the only one wired in today; a persistent backend slots in as
//! another variant.

use async_trait::async_trait;
use bytes::Bytes;

use crate::{
    backend::{ByteRange, KeyValue, StorageBackend, StorageResult},
    memory::MemoryBackend,
};

/// Storage backend type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum StorageBackendType {
    /// In-memory storage (for development and testing)
    Memory,
}

/// Concrete storage backend.
#[derive(Debug, Clone)]
pub enum Backend {
    Memory(MemoryBackend),
}

impl Backend {
    /// Create a fresh in-memory backend.
    pub fn memory() -> Self {
        Self::Memory(MemoryBackend::new())
    }

    pub fn backend_type(&self) -> StorageBackendType {
        match self {
            Self::Memory(_) => StorageBackendType::Memory,
        }
    }
}

#[async_trait]
impl StorageBackend for Backend {
    async fn get(&self, key: &[u8]) -> StorageResult<Option<Bytes>> {
        match self {
            Self::Memory(backend) => backend.get(key).await,
        }
    }

    async fn set(&self, key: Vec<u8>, value: Vec<u8>) -> StorageResult<()> {
        match self {
            Self::Memory(backend) => backend.set(key, value).await,
        }
    }

    async fn delete(&self, key: &[u8]) -> StorageResult<()> {
        match self {
            Self::Memory(backend) => backend.delete(key).await,
        }
    }

    async fn get_range(&self, range: ByteRange) -> StorageResult<Vec<KeyValue>> {
        match self {
            Self::Memory(backend) => backend.get_range(range).await,
        }
    }

    async fn compare_and_swap(
        &self,
        key: &[u8],
        expected: Option<&[u8]>,
        new: Vec<u8>,
    ) -> StorageResult<()> {
        match self {
            Self::Memory(backend) => backend.compare_and_swap(key, expected, new).await,
        }
    }

    async fn health_check(&self) -> StorageResult<()> {
        match self {
            Self::Memory(backend) => backend.health_check().await,
        }
    }
}
