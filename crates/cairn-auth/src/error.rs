//! Error types for the cairn-auth crate.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Security service connection error: {0}")]
    Connection(String),

    #[error("Token request denied: {0}")]
    Denied(String),

    #[error("Security service error ({status}): {body}")]
    Service { status: u16, body: String },

    #[error("Malformed token response: {0}")]
    MalformedResponse(String),
}
