//! Configuration loading and management

use crate::core::number::{DEFAULT_PREFIX, TimestampNumberGenerator};
use crate::core::store::InvoiceStore;
use crate::repository::{DEFAULT_NUMBER_ATTEMPTS, InvoiceRepository};
use crate::storage::{DEFAULT_KEY, InMemoryStorage, LocalInvoiceStore};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Where the invoice collection is persisted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// Process-local map, lost on exit
    #[default]
    Memory,
    /// One JSON file per key in `storage.path`
    File,
}

/// Persistence settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: StorageBackend,

    /// Directory of the file backend
    pub path: Option<PathBuf>,

    /// Key holding the collection
    pub key: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::Memory,
            path: None,
            key: DEFAULT_KEY.to_string(),
        }
    }
}

/// Invoice number generation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NumbersConfig {
    pub prefix: String,

    /// Attempts at finding a number not already in the collection
    pub max_attempts: u32,
}

impl Default for NumbersConfig {
    fn default() -> Self {
        Self {
            prefix: DEFAULT_PREFIX.to_string(),
            max_attempts: DEFAULT_NUMBER_ATTEMPTS,
        }
    }
}

/// Timers of the view controllers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    pub redirect_delay_ms: u64,
    pub success_banner_ms: u64,
}

impl UiConfig {
    pub fn redirect_delay(&self) -> Duration {
        Duration::from_millis(self.redirect_delay_ms)
    }

    pub fn success_banner(&self) -> Duration {
        Duration::from_millis(self.success_banner_ms)
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            redirect_delay_ms: 2000,
            success_banner_ms: 3000,
        }
    }
}

/// Log output settings, see [`crate::logging::init`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter used when `RUST_LOG` is not set
    pub level: String,
    pub ansi: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            ansi: true,
        }
    }
}

/// Complete application configuration; every section may be omitted
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub storage: StorageConfig,
    pub numbers: NumbersConfig,
    pub ui: UiConfig,
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        Ok(config)
    }

    /// Build the configured invoice store
    pub fn build_store(&self) -> Result<Arc<dyn InvoiceStore>> {
        let key = self.storage.key.clone();
        match self.storage.backend {
            StorageBackend::Memory => Ok(Arc::new(LocalInvoiceStore::with_key(
                InMemoryStorage::new(),
                key,
            ))),
            StorageBackend::File => self.build_file_store(key),
        }
    }

    #[cfg(feature = "file-storage")]
    fn build_file_store(&self, key: String) -> Result<Arc<dyn InvoiceStore>> {
        let Some(path) = &self.storage.path else {
            anyhow::bail!("storage.path is required for the file backend");
        };
        let storage = crate::storage::FileStorage::open(path)?;
        Ok(Arc::new(LocalInvoiceStore::with_key(storage, key)))
    }

    #[cfg(not(feature = "file-storage"))]
    fn build_file_store(&self, _key: String) -> Result<Arc<dyn InvoiceStore>> {
        anyhow::bail!("file backend requires the `file-storage` feature")
    }

    /// Repository over the configured store, with the configured numbering,
    /// not yet loaded
    pub fn build_repository(&self) -> Result<InvoiceRepository> {
        let store = self.build_store()?;
        Ok(InvoiceRepository::new(store)
            .with_number_generator(TimestampNumberGenerator::new(self.numbers.prefix.clone()))
            .with_max_number_attempts(self.numbers.max_attempts))
    }
}
