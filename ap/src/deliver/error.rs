//! Delivery error types

use thiserror::Error;

/// Errors from exporting or sending the generated documents
#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("Invalid email address: {0:?}")]
    InvalidAddress(String),

    #[error("SMTP not configured")]
    SmtpNotConfigured,

    #[error("Failed to build email: {0}")]
    Message(#[from] lettre::error::Error),

    #[error("Send failed: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),

    #[error("Milestone {number} ({title}) has an invalid due date: {due:?}")]
    InvalidDueDate { number: usize, title: String, due: String },

    #[error("Failed to write archive: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}
