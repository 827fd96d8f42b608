//! Error handling.

use std::error::Error as StdError;

use displaydoc::Display;

use crate::status::UploadStatus;

pub type PortalResult<T> = Result<T, PortalError>;

/// An error.
#[derive(Debug, Display, PartialEq, Eq)]
pub enum PortalError {
    /// Invalid visibility "{value}"
    InvalidVisibility { value: String },

    /// Upload status cannot move from {from} to {to}
    InvalidUploadTransition { from: UploadStatus, to: UploadStatus },

    /// Upload progress {progress} is outside of [0, 1]
    InvalidUploadProgress { progress: String },
}

impl PortalError {
    pub fn name(&self) -> &'static str {
        match self {
            Self::InvalidVisibility { .. } => "InvalidVisibility",
            Self::InvalidUploadTransition { .. } => "InvalidUploadTransition",
            Self::InvalidUploadProgress { .. } => "InvalidUploadProgress",
        }
    }
}

impl StdError for PortalError {}
