//! # tally-tasks
//!
//! The task access service: identity-gated CRUD over per-user task records.
//!
//! Every operation takes the caller's identity explicitly and fails with
//! `NotSignedIn` before any store access when the caller is anonymous.
//! Ownership of existing records is enforced by the store filter itself —
//! update and remove match on `(id, user_id)` in one atomic statement, so a
//! foreign task yields an affected count of 0 rather than an error.

#![deny(unsafe_code)]

pub mod errors;
pub mod service;
pub mod types;

pub use errors::TaskError;
pub use service::TaskService;
pub use types::{Task, TaskDraft};
