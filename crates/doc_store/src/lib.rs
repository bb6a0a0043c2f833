//! Document storage for StudyTrack.
//!
//! This crate provides the storage abstraction behind the API server.
//! Entities are persisted as JSON documents keyed by id; the concrete
//! engine lives behind the [`DocumentStore`] trait. The in-memory
//! implementation is the one the server runs with.

mod error;
mod memory;
mod traits;

pub use error::*;
pub use memory::*;
pub use traits::*;
