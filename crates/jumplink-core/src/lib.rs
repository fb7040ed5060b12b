//! Core types and traits for the Jumplink short-link store.
//!
//! This crate provides the shared vocabulary used by the storage backends,
//! the code generators and the store service: the validated [`ShortCode`],
//! the stored [`LinkRecord`] and the [`Repository`] contract every backend
//! implements.

pub mod error;
pub mod repository;
pub mod shortcode;

pub use error::{CoreError, StorageError};
pub use repository::{LinkRecord, Page, ReadRepository, Repository};
pub use shortcode::ShortCode;
