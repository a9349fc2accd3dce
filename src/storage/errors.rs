use thiserror::Error;

/// Errors that can arise while reading or writing game state.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Wrapper around sled's error type.
    #[error("sled error: {0}")]
    Sled(#[from] sled::Error),

    /// Wrapper around bincode serialization and deserialization errors.
    #[error("serialization error: {0}")]
    Bincode(#[from] bincode::Error),

    /// Wrapper around IO errors (directory creation, etc.).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Post ids and usernames become key segments and may not contain the separator.
    #[error("invalid key segment: {0:?}")]
    InvalidKey(String),

    /// A lock guarding in-memory state was poisoned by a panicking writer.
    #[error("store lock poisoned")]
    Poisoned,
}
