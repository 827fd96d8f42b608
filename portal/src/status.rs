//! Dataset processing status.
//!
//! A dataset goes through upload, validation and conversion before it
//! can be published. The server owns the upload half of the lifecycle:
//!
//! ```text
//! WAITING ──> UPLOADING ──> UPLOADED
//!    │            │
//!    └─────┬──────┘
//!          v
//!   CANCEL_PENDING ──> CANCELLED
//! ```
//!
//! Both WAITING and UPLOADING may also fall into FAILED. The ingestion
//! worker reports its progress along these edges only, and UPLOADED,
//! CANCELLED and FAILED accept no further report.
//!
//! Cancellation requests from users are not bound by the table. They
//! are accepted in every state except UPLOADED and move the dataset to
//! CANCEL_PENDING. A cancellation is only a request: the worker observes
//! CANCEL_PENDING, stops its work and records CANCELLED itself.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{PortalError, PortalResult};

/// The upload state of a dataset.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "database", derive(sea_orm::EnumIter, sea_orm::DeriveActiveEnum))]
#[cfg_attr(feature = "database", sea_orm(rs_type = "String", db_type = "Text"))]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UploadStatus {
    /// Waiting for the upload to start.
    #[cfg_attr(feature = "database", sea_orm(string_value = "WAITING"))]
    Waiting,

    /// The upload is in progress.
    ///
    /// This is the only state where `upload_progress` is meaningful.
    #[cfg_attr(feature = "database", sea_orm(string_value = "UPLOADING"))]
    Uploading,

    /// The upload completed.
    #[cfg_attr(feature = "database", sea_orm(string_value = "UPLOADED"))]
    Uploaded,

    /// A user asked for the upload to stop.
    #[cfg_attr(feature = "database", sea_orm(string_value = "CANCEL_PENDING"))]
    CancelPending,

    /// The worker stopped the upload after a cancellation request.
    #[cfg_attr(feature = "database", sea_orm(string_value = "CANCELLED"))]
    Cancelled,

    /// The upload failed.
    #[cfg_attr(feature = "database", sea_orm(string_value = "FAILED"))]
    Failed,
}

/// The validation state of a dataset.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "database", derive(sea_orm::EnumIter, sea_orm::DeriveActiveEnum))]
#[cfg_attr(feature = "database", sea_orm(rs_type = "String", db_type = "Text"))]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ValidationStatus {
    #[cfg_attr(feature = "database", sea_orm(string_value = "NA"))]
    Na,

    #[cfg_attr(feature = "database", sea_orm(string_value = "VALIDATING"))]
    Validating,

    #[cfg_attr(feature = "database", sea_orm(string_value = "VALID"))]
    Valid,

    #[cfg_attr(feature = "database", sea_orm(string_value = "INVALID"))]
    Invalid,
}

/// The state of one conversion target of a dataset.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "database", derive(sea_orm::EnumIter, sea_orm::DeriveActiveEnum))]
#[cfg_attr(feature = "database", sea_orm(rs_type = "String", db_type = "Text"))]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConversionStatus {
    #[cfg_attr(feature = "database", sea_orm(string_value = "NA"))]
    Na,

    #[cfg_attr(feature = "database", sea_orm(string_value = "CONVERTING"))]
    Converting,

    #[cfg_attr(feature = "database", sea_orm(string_value = "CONVERTED"))]
    Converted,

    #[cfg_attr(feature = "database", sea_orm(string_value = "UPLOADING"))]
    Uploading,

    #[cfg_attr(feature = "database", sea_orm(string_value = "UPLOADED"))]
    Uploaded,

    #[cfg_attr(feature = "database", sea_orm(string_value = "FAILED"))]
    Failed,
}

impl UploadStatus {
    /// Returns the canonical string representation.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Waiting => "WAITING",
            Self::Uploading => "UPLOADING",
            Self::Uploaded => "UPLOADED",
            Self::CancelPending => "CANCEL_PENDING",
            Self::Cancelled => "CANCELLED",
            Self::Failed => "FAILED",
        }
    }

    /// Returns whether a cancellation may be requested.
    ///
    /// Only a completed upload refuses. Requesting again while
    /// CANCEL_PENDING is a no-op that succeeds.
    pub const fn can_request_cancel(&self) -> bool {
        !matches!(self, Self::Uploaded)
    }

    /// Returns whether the worker may move the upload to `next`.
    pub const fn can_transition_to(&self, next: UploadStatus) -> bool {
        use UploadStatus::*;

        matches!(
            (self, next),
            (Waiting, Uploading | CancelPending | Failed)
                | (Uploading, Uploading | Uploaded | CancelPending | Failed)
                | (CancelPending, CancelPending | Cancelled)
        )
    }

    /// Checks a transition requested by the worker.
    pub fn check_transition(&self, next: UploadStatus) -> PortalResult<()> {
        if self.can_transition_to(next) {
            Ok(())
        } else {
            Err(PortalError::InvalidUploadTransition {
                from: *self,
                to: next,
            })
        }
    }
}

impl fmt::Display for UploadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validates an upload progress value.
pub fn validate_upload_progress(progress: f64) -> PortalResult<f64> {
    if (0.0..=1.0).contains(&progress) {
        Ok(progress)
    } else {
        Err(PortalError::InvalidUploadProgress {
            progress: progress.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [UploadStatus; 6] = [
        UploadStatus::Waiting,
        UploadStatus::Uploading,
        UploadStatus::Uploaded,
        UploadStatus::CancelPending,
        UploadStatus::Cancelled,
        UploadStatus::Failed,
    ];

    #[test]
    fn test_uploaded_is_terminal() {
        for next in ALL {
            assert_eq!(
                Err(PortalError::InvalidUploadTransition {
                    from: UploadStatus::Uploaded,
                    to: next,
                }),
                UploadStatus::Uploaded.check_transition(next),
            );
        }

        assert!(!UploadStatus::Uploaded.can_request_cancel());
    }

    #[test]
    fn test_happy_path() {
        assert!(UploadStatus::Waiting.can_transition_to(UploadStatus::Uploading));
        assert!(UploadStatus::Uploading.can_transition_to(UploadStatus::Uploading));
        assert!(UploadStatus::Uploading.can_transition_to(UploadStatus::Uploaded));

        assert!(!UploadStatus::Waiting.can_transition_to(UploadStatus::Uploaded));
        assert!(!UploadStatus::Uploading.can_transition_to(UploadStatus::Waiting));
    }

    #[test]
    fn test_cancellation() {
        assert!(UploadStatus::Waiting.can_request_cancel());
        assert!(UploadStatus::Uploading.can_request_cancel());
        assert!(UploadStatus::CancelPending.can_request_cancel());

        assert!(UploadStatus::CancelPending.can_transition_to(UploadStatus::Cancelled));
        assert!(!UploadStatus::CancelPending.can_transition_to(UploadStatus::Uploading));
        assert!(!UploadStatus::Cancelled.can_transition_to(UploadStatus::Uploading));
    }

    #[test]
    fn test_serde_names() {
        for status in ALL {
            let json = serde_json::to_string(&status).unwrap();
            assert_eq!(format!("\"{}\"", status.as_str()), json);
        }
    }

    #[test]
    fn test_upload_progress() {
        assert_eq!(Ok(0.0), validate_upload_progress(0.0));
        assert_eq!(Ok(1.0), validate_upload_progress(1.0));
        assert!(validate_upload_progress(1.5).is_err());
        assert!(validate_upload_progress(-0.1).is_err());
        assert!(validate_upload_progress(f64::NAN).is_err());
    }
}
