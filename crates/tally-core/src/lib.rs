//! # tally-core
//!
//! Foundation types shared by every Tally crate: branded ID newtypes,
//! the per-request caller identity, and logging initialization.

#![deny(unsafe_code)]

pub mod identity;
pub mod ids;
pub mod logging;

pub use identity::{CallerIdentity, NotSignedIn};
pub use ids::{TaskId, UserId};
