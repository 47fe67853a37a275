//! Core storage abstraction.
//!
//! # Types
//!
//! - [`StorageBackend`] - Trait for key-value storage operations
//! - [`StorageError`] - Canonical error types for storage operations
//! - [`StorageResult`] - Result type alias for storage operations
//! - [`KeyValue`] - Key-value pair for range query results

use std::ops::{Bound, RangeBounds};

use async_trait::async_trait;
use bytes::Bytes;
use snafu::Snafu;

/// Storage operation errors.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum StorageError {
    /// The stored value did not match the expected value in a
    /// compare-and-swap.
    #[snafu(display("compare-and-swap conflict on key"))]
    CasConflict,

    /// The backend rejected or failed the operation.
    #[snafu(display("storage backend error: {message}"))]
    Backend { message: String },
}

pub type StorageResult<T> = Result<T, StorageError>;

/// A key-value pair returned by range queries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyValue {
    pub key: Bytes,
    pub value: Bytes,
}

/// Resolved byte bounds for a range query.
///
/// Backends receive owned bounds so the trait stays object-safe; generic
/// `RangeBounds` parameters would make it ineligible for `dyn`.
#[derive(Debug, Clone)]
pub struct ByteRange {
    pub start: Bound<Vec<u8>>,
    pub end: Bound<Vec<u8>>,
}

impl ByteRange {
    pub fn from_bounds<R>(range: R) -> Self
    where
        R: RangeBounds<Vec<u8>>,
    {
        Self { start: range.start_bound().cloned(), end: range.end_bound().cloned() }
    }
}

impl RangeBounds<Vec<u8>> for ByteRange {
    fn start_bound(&self) -> Bound<&Vec<u8>> {
        self.start.as_ref()
    }

    fn end_bound(&self) -> Bound<&Vec<u8>> {
        self.end.as_ref()
    }
}

/// Key-value storage operations required by the identity repositories.
///
/// All account state lives behind this trait. [`compare_and_swap`] is the
/// primitive the lifecycle layer uses for conflict-free creates and
/// single-use secret consumption: create is a CAS from absent, and consuming
/// a token is a CAS from the exact record that still carries it.
///
/// [`compare_and_swap`]: StorageBackend::compare_and_swap
#[async_trait]
pub trait StorageBackend: Send + Sync {
    /// Get the value stored at `key`, if any.
    async fn get(&self, key: &[u8]) -> StorageResult<Option<Bytes>>;

    /// Unconditionally set `key` to `value`.
    async fn set(&self, key: Vec<u8>, value: Vec<u8>) -> StorageResult<()>;

    /// Delete `key` if present. Deleting an absent key is not an error.
    async fn delete(&self, key: &[u8]) -> StorageResult<()>;

    /// Return all pairs whose keys fall within `range`, in key order.
    async fn get_range(&self, range: ByteRange) -> StorageResult<Vec<KeyValue>>;

    /// Atomically replace the value at `key` with `new`, but only if the
    /// current value equals `expected` (`None` meaning absent).
    ///
    /// Fails with [`StorageError::CasConflict`] when the current value
    /// differs, leaving the stored value untouched.
    async fn compare_and_swap(
        &self,
        key: &[u8],
        expected: Option<&[u8]>,
        new: Vec<u8>,
    ) -> StorageResult<()>;

    /// Verify the backend is reachable and serving.
    async fn health_check(&self) -> StorageResult<()>;
}
