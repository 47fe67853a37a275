#![deny(unsafe_code)]

pub mod backend;
pub mod factory;
pub mod memory;

pub use backend::{ByteRange, KeyValue, StorageBackend, StorageError, StorageResult};
pub use factory::{Backend, StorageBackendType};
pub use memory::MemoryBackend;
