//! Durable key-value storage for Quill.
//!
//! A [`DurableStore`] is a persistent string-keyed store local to the client
//! device. It may be empty, or hold values written by an older release; the
//! store itself never interprets what it holds.
//!
//! # Backends
//!
//! - [`InMemoryStore`] -- `HashMap`-based store for tests and embedding
//! - [`FileStore`] -- single JSON document on disk, rewritten atomically

pub mod error;
pub mod file;
pub mod memory;
pub mod traits;

pub use error::{StoreError, StoreResult};
pub use file::FileStore;
pub use memory::InMemoryStore;
pub use traits::DurableStore;
