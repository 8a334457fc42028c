pub mod codec;
pub mod error;
pub mod path_cache;
pub mod persistence;

pub use error::{StorageError, StorageResult};
pub use path_cache::PathIdentityCache;
pub use persistence::{
    IndexPersistence, IndexSession, PATH_CACHE_FILENAME, deserialize, serialize,
};
