//! # Scribe Core
//!
//! The domain layer of the Scribe blog service.
//! This crate contains the post model, the persistence port and the
//! `PostStore` service, with zero infrastructure dependencies.

pub mod domain;
pub mod error;
pub mod ports;
pub mod store;

pub use error::DomainError;
pub use store::PostStore;
