//! Core entity definitions for StudyTrack.
//!
//! This crate defines the persisted data types shared across the StudyTrack
//! application: users, projects, tasks, and chat messages, along with the
//! closed enums that constrain them.

mod chat;
mod project;
mod status;
mod task;
mod user;

pub use chat::*;
pub use project::*;
pub use status::*;
pub use task::*;
pub use user::*;
