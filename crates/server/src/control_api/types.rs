/// Type definitions for the Control API

use serde::{Deserialize, Serialize};

/// Query string for GET /media
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MediaQuery {
    /// Transport command to send; absent means "report what is playing"
    pub action: Option<String>,
}

/// Error response for failures of the media platform itself
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub details: Option<String>,
}
