//! Error types for the sync flow.

use thiserror::Error;

/// Errors that escape the sync flow.
///
/// Remote rejections and retry exhaustion never show up here; they are
/// normalized into `RemoteCallResult::Failure` slots of the report. The
/// one escaping case is a Marketplace A transport fault that the flow
/// does not model.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Marketplace A failed below the HTTP layer in an unmodeled way
    /// (timeout, TLS failure, success response with an unreadable body).
    /// Connection refusal is modeled and lands in the report instead.
    #[error("Marketplace A transport error: {0}")]
    MarketplaceATransport(String),
}

/// Result type for sync operations.
pub type Result<T> = std::result::Result<T, SyncError>;
