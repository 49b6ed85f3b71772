//! Macro-generated contract suites for storage backends.
//!
//! # Usage
//!
//! ```rust,ignore
//! #[macro_use]
//! mod storage_harness;
//!
//! use storage_harness::*;
//! use invoicer::storage::InMemoryStorage;
//!
//! key_value_storage_tests!(InMemoryStorage::new());
//! invoice_store_tests!(LocalInvoiceStore::new(InMemoryStorage::new()));
//! ```
//!
//! # Generated Tests
//!
//! ## `key_value_storage_tests!`
//! - `test_get_absent`: unknown key reads as `None`
//! - `test_set_then_get`: value written is read back verbatim
//! - `test_set_replaces`: second write replaces the first
//! - `test_remove`: removed key reads as `None`, removing twice is fine
//! - `test_keys_are_independent`: writes to one key leave others alone
//!
//! ## `invoice_store_tests!`
//! - `test_load_empty`: nothing stored loads as an empty collection
//! - `test_round_trip`: `load(save(C)) == C`
//! - `test_save_empty_replaces`: saving `[]` wipes the collection

/// Generate a `KeyValueStorage` conformance suite.
///
/// `$factory` is re-evaluated for each test.
#[macro_export]
macro_rules! key_value_storage_tests {
    ($factory:expr) => {
        mod key_value_storage_contract_tests {
            use super::*;
            use invoicer::core::store::KeyValueStorage;

            #[test]
            fn test_get_absent() {
                let storage = $factory;
                assert_eq!(storage.get_item("invoices").unwrap(), None);
            }

            #[test]
            fn test_set_then_get() {
                let storage = $factory;
                let blob = r#"[{"name":"Ünïcode ✓"}]"#;
                storage.set_item("invoices", blob).unwrap();
                assert_eq!(storage.get_item("invoices").unwrap().as_deref(), Some(blob));
            }

            #[test]
            fn test_set_replaces() {
                let storage = $factory;
                storage.set_item("invoices", "[1,2,3]").unwrap();
                storage.set_item("invoices", "[]").unwrap();
                assert_eq!(storage.get_item("invoices").unwrap().as_deref(), Some("[]"));
            }

            #[test]
            fn test_remove() {
                let storage = $factory;
                storage.set_item("invoices", "[]").unwrap();
                storage.remove_item("invoices").unwrap();
                assert_eq!(storage.get_item("invoices").unwrap(), None);
                storage.remove_item("invoices").unwrap();
            }

            #[test]
            fn test_keys_are_independent() {
                let storage = $factory;
                storage.set_item("invoices", "[]").unwrap();
                storage.set_item("archive", "[1]").unwrap();
                storage.remove_item("archive").unwrap();
                assert_eq!(storage.get_item("invoices").unwrap().as_deref(), Some("[]"));
            }
        }
    };
}

/// Generate an `InvoiceStore` conformance suite.
///
/// `$factory` is re-evaluated for each test and must start empty.
#[macro_export]
macro_rules! invoice_store_tests {
    ($factory:expr) => {
        mod invoice_store_contract_tests {
            use super::*;
            use invoicer::core::store::InvoiceStore;

            #[tokio::test]
            async fn test_load_empty() {
                let store = $factory;
                assert!(store.load().await.unwrap().is_empty());
            }

            #[tokio::test]
            async fn test_round_trip() {
                let store = $factory;
                let (repository, _) = seeded_repository().await;
                let invoices = repository.invoices().to_vec();

                store.save(&invoices).unwrap();
                assert_eq!(store.load().await.unwrap(), invoices);
            }

            #[tokio::test]
            async fn test_save_empty_replaces() {
                let store = $factory;
                let (repository, _) = seeded_repository().await;

                store.save(repository.invoices()).unwrap();
                store.save(&[]).unwrap();
                assert!(store.load().await.unwrap().is_empty());
            }
        }
    };
}
