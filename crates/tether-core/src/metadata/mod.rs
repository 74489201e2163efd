//! # Tether Core Metadata Store
//!
//! In-memory cache of parsed component declarations, keyed by the providing
//! bundle and its modification stamp. A provider whose stamp changed misses
//! the cache and is parsed again; stale entries are dropped with
//! [`ComponentMetadataStore::retain_current`].
pub mod store;

pub use store::{BundleKey, ComponentMetadataStore};
