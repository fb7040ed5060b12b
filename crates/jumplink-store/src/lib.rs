//! Short-link store service.
//!
//! This crate provides the [`LinkStore`] contract and the
//! [`LinkStoreService`] that drives a storage backend and a code generator.
//! Core types are re-exported from `jumplink_core`.

pub mod error;
pub mod service;
pub mod store;

pub use error::StoreError;
pub use jumplink_core::{LinkRecord, Page, ShortCode};
pub use service::{LinkStoreService, StoreSettings};
pub use store::LinkStore;
