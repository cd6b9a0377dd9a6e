//! # tally-store
//!
//! The persistent record store: an `r2d2`-pooled `SQLite` database with
//! embedded migrations and stateless repositories over the `users`,
//! `auth_tokens`, and `tasks` tables.
//!
//! Repositories expose exact-match filtered operations only. Ownership
//! filters (`id` + `user_id`) are folded directly into UPDATE/DELETE
//! statements so isolation is enforced by the statement itself, not by a
//! separate load-then-check step.

#![deny(unsafe_code)]

pub mod connection;
pub mod errors;
pub mod migrations;
pub mod repositories;

pub use connection::{ConnectionConfig, ConnectionPool, PooledConnection, new_file, new_in_memory};
pub use errors::{Result, StoreError};
pub use migrations::run_migrations;
