//! RocketShoes cart library.
//!
//! A persistent shopping cart for the RocketShoes storefront. The
//! [`CartStore`] owns the cart, checks quantities against the remote
//! catalog, writes every change through a [`storage::KeyValueStore`] and
//! reports problems as user-facing notices instead of errors.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod config;
pub mod error;
pub mod notify;
pub mod storage;
pub mod store;

pub use catalog::{Catalog, CatalogClient, CatalogError};
pub use config::{CartConfig, CatalogConfig, ConfigError, LogFormat, StorageConfig};
pub use error::CartError;
pub use notify::{Notice, NoticeKind, Notifier, RecordingNotifier, TracingNotifier};
pub use storage::{FileStore, KeyValueStore, MemoryStore, StorageError};
pub use store::{CartOutcome, CartStore, UpdateItemAmount};
