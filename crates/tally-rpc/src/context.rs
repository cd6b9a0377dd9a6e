//! RPC dependency-injection context.

use std::sync::Arc;
use std::time::Instant;

use tally_accounts::AccountService;
use tally_store::{ConnectionPool, PooledConnection};

use crate::errors::RpcError;

/// Shared context passed to every RPC handler.
pub struct RpcContext {
    /// Record store connection pool.
    pub pool: ConnectionPool,
    /// Account access service.
    pub accounts: Arc<AccountService>,
    /// When the server started (for `system.getInfo`).
    pub start_time: Instant,
}

impl RpcContext {
    /// Borrow a pooled store connection.
    pub fn conn(&self) -> Result<PooledConnection, RpcError> {
        self.pool.get().map_err(|e| {
            tracing::error!(error = %e, "connection pool exhausted");
            RpcError::Internal {
                message: "internal error".into(),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::handlers::test_helpers::make_test_context;

    #[test]
    fn context_hands_out_connections() {
        let ctx = make_test_context();
        let conn = ctx.conn().unwrap();
        let one: i64 = conn.query_row("SELECT 1", [], |r| r.get(0)).unwrap();
        assert_eq!(one, 1);
    }

    #[test]
    fn context_schema_is_migrated() {
        let ctx = make_test_context();
        let conn = ctx.conn().unwrap();
        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'tasks'",
                [],
                |r| r.get(0),
            )
            .unwrap();
        assert_eq!(count, 1);
    }
}
