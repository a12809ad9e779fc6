//! Shared event, configuration, and error model types for modpipe.
//!
//! Pure data types used by both the engine and the plugin runtime. Kept in
//! their own crate so neither side drags the other's dependencies along.

pub mod config;
pub mod error;
pub mod event;

pub use config::{ConfigBlock, ConfigsById};
pub use error::DispatchError;
pub use event::{Event, FileEntry, Transaction, TransactionKeyValue};
