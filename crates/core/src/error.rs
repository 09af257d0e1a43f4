use std::time::Duration;

/// Failures raised by the media bridge
///
/// A missing session or an unknown command are ordinary results, not errors.
#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    #[error("Media platform error: {0:#}")]
    Platform(#[from] anyhow::Error),

    #[error("Media platform did not respond within {0:?}")]
    Timeout(Duration),
}

pub type Result<T> = std::result::Result<T, BridgeError>;
