//! Persistence for account records.
//!
//! Both repositories store one JSON document per identity, keyed by
//! normalized email. Creates and conditional replacements go through the
//! storage backend's compare-and-swap so duplicate registration and
//! single-use secret consumption stay correct under concurrent requests.

pub mod admin;
pub mod member;

pub use admin::AdminRepository;
pub use member::MemberRepository;

use parish_storage::StorageError;
use parish_types::Error;
use serde::{Serialize, de::DeserializeOwned};

/// Range-end sentinel: '~' (0x7E) sorts after every character that can
/// appear in a normalized email, so `prefix:`..`prefix~` covers a
/// collection.
pub(crate) const RANGE_END: char = '~';

pub(crate) fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>, Error> {
    serde_json::to_vec(value).map_err(|e| Error::storage(format!("failed to encode record: {e}")))
}

pub(crate) fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, Error> {
    serde_json::from_slice(bytes)
        .map_err(|e| Error::storage(format!("failed to decode record: {e}")))
}

pub(crate) fn storage_error(e: StorageError) -> Error {
    Error::storage(e.to_string())
}
