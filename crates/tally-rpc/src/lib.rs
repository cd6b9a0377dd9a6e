//! # tally-rpc
//!
//! RPC protocol layer, method registry, and handlers.
//!
//! The RPC surface:
//! - System: ping, getInfo
//! - Task: list, create, setChecked, remove
//! - Account: register, login, updateProfile, delete
//!
//! Requests carry an optional bearer token; the transport resolves it to a
//! [`tally_core::CallerIdentity`] and dispatch threads that identity into
//! every handler explicitly.

#![deny(unsafe_code)]

pub mod context;
pub mod errors;
pub mod handlers;
pub mod registry;
pub mod types;
pub mod validation;

pub use context::RpcContext;
pub use errors::RpcError;
pub use registry::{MethodHandler, MethodRegistry};
pub use types::{RpcErrorBody, RpcRequest, RpcResponse};
