//! # tally-accounts
//!
//! The account access service: registration, login, profile updates, and
//! account deletion, plus the credential subsystem (password hashing and
//! opaque login tokens) and the verification-mailer seam.
//!
//! Profile and deletion operations take the caller's identity explicitly
//! and only ever target the caller's own record — the target ID comes from
//! the verified identity, never from caller-supplied input.

#![deny(unsafe_code)]

pub mod credentials;
pub mod errors;
pub mod mailer;
pub mod service;

pub use credentials::{Credentials, IssuedToken};
pub use errors::AccountError;
pub use mailer::{TracingMailer, VerificationMailer};
pub use service::{
    AccountService, LoginOutcome, ProfileUpdate, RegisterOutcome, RegisterParams,
};
