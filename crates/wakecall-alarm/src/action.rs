use async_trait::async_trait;
use thiserror::Error;

/// Failure of the wake-up side effect. Reported by the scheduler but never
/// retried: firing is one-shot and terminal regardless of the outcome.
#[derive(Debug, Error)]
pub enum WakeError {
    /// The notification request could not be sent (network, TLS, DNS).
    #[error("Wake-up request failed: {0}")]
    Request(String),

    /// The notification provider answered but refused the request.
    #[error("Wake-up request rejected: {0}")]
    Rejected(String),
}

/// The side effect invoked when the alarm fires — e.g. placing a phone call.
///
/// Supplied by the caller; the scheduler knows nothing about the payload or
/// protocol, only success or failure.
#[async_trait]
pub trait WakeAction: Send + Sync {
    async fn wake(&self) -> std::result::Result<(), WakeError>;
}
