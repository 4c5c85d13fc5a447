//! Session-service verification performed before the key exchange
//! completes.

use std::future::Future;

use thiserror::Error;

#[derive(Debug, Error)]
#[error("{0}")]
pub struct SessionError(pub String);

/// Tells the session service that this account is joining the server
/// identified by `server_hash`.
pub trait SessionVerifier: Send + Sync {
    fn join_server(&self, server_hash: &str) -> impl Future<Output = Result<(), SessionError>> + Send;
}

/// Verifier for accounts without session credentials. Every join fails,
/// so servers that require authentication close the connection.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineSession;

impl SessionVerifier for OfflineSession {
    async fn join_server(&self, server_hash: &str) -> Result<(), SessionError> {
        Err(SessionError(format!(
            "no session credentials to join server {server_hash}"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn offline_join_fails() {
        let err = OfflineSession.join_server("-7c9d5b").await.unwrap_err();
        assert!(err.to_string().contains("-7c9d5b"));
    }
}
