//! Storage implementations for different backends

#[cfg(feature = "file-storage")]
pub mod file;
pub mod in_memory;
pub mod local;

#[cfg(feature = "file-storage")]
pub use file::FileStorage;
pub use in_memory::InMemoryStorage;
pub use local::{DEFAULT_KEY, LocalInvoiceStore};
