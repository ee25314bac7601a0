#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("failed to create data directory: {0}")]
    DataDirCreation(std::io::Error),
    #[error("failed to read collection {collection}: {source}")]
    CollectionRead {
        collection: &'static str,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write collection {collection}: {source}")]
    CollectionWrite {
        collection: &'static str,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to serialize collection {collection}: {source}")]
    Serialization {
        collection: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to deserialize collection {collection}: {source}")]
    Deserialization {
        collection: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("store connection is closed")]
    Closed,
    #[error("collection {0} lock was poisoned by a panicking writer")]
    LockPoisoned(&'static str),
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;
