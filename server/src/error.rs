//! Error handling.

use std::error::Error as StdError;

use anyhow::Error as AnyError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use displaydoc::Display;
use serde::{Deserialize, Serialize};

use portal::error::PortalError;

pub type ServerResult<T> = Result<T, ServerError>;

/// An error.
#[derive(Debug, Display)]
pub enum ServerError {
    // Generic responses
    /// The URL you requested was not found.
    NotFound,

    /// Unauthorized.
    Unauthorized,

    /// You do not have permission to perform this action.
    Forbidden,

    /// The server encountered an internal error or misconfiguration.
    InternalServerError,

    // Specialized responses
    /// The requested dataset does not exist.
    NoSuchDataset,

    /// The requested asset does not exist.
    NoSuchAsset,

    /// The requested collection does not exist.
    NoSuchCollection,

    /// Dataset {dataset_id} has already been uploaded and cannot be cancelled.
    UploadComplete { dataset_id: String },

    /// The requested asset is currently unavailable.
    AssetUnavailable,

    /// Database error: {0}
    DatabaseError(AnyError),

    /// Storage error: {0}
    StorageError(AnyError),

    /// Access error: {0}
    AccessError(super::access::Error),

    /// General request error: {0}
    RequestError(AnyError),

    /// {0}
    PortalError(PortalError),
}

/// The JSON body of an error response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub code: u16,
    pub error: String,
    pub message: String,
}

impl ServerError {
    pub fn database_error(error: impl StdError + Send + Sync + 'static) -> Self {
        Self::DatabaseError(AnyError::new(error))
    }

    pub fn storage_error(error: impl StdError + Send + Sync + 'static) -> Self {
        Self::StorageError(AnyError::new(error))
    }

    fn name(&self) -> &'static str {
        match self {
            Self::NotFound => "NotFound",
            Self::Unauthorized => "Unauthorized",
            Self::Forbidden => "Forbidden",
            Self::InternalServerError => "InternalServerError",

            Self::NoSuchDataset => "NoSuchDataset",
            Self::NoSuchAsset => "NoSuchAsset",
            Self::NoSuchCollection => "NoSuchCollection",
            Self::UploadComplete { .. } => "UploadComplete",
            Self::AssetUnavailable => "AssetUnavailable",
            Self::DatabaseError(_) => "DatabaseError",
            Self::StorageError(_) => "StorageError",
            Self::AccessError(_) => "AccessError",
            Self::RequestError(_) => "RequestError",
            Self::PortalError(e) => e.name(),
        }
    }

    /// Returns a more restricted version of this error for a client that
    /// may not learn whether the resource exists.
    ///
    /// Missing resources and denied access become the same Forbidden
    /// response.
    pub fn into_no_discovery_permissions(self) -> Self {
        match self {
            Self::NoSuchDataset => Self::Forbidden,
            Self::NoSuchCollection => Self::Forbidden,
            Self::AccessError(_) => Self::Forbidden,

            _ => self,
        }
    }

    /// Returns a version of this error for clients.
    fn into_clients(self) -> Self {
        match self {
            Self::AccessError(_) => Self::Forbidden,

            Self::DatabaseError(_) => Self::InternalServerError,
            Self::StorageError(_) => Self::InternalServerError,

            _ => self,
        }
    }

    fn http_status_code(&self) -> StatusCode {
        match self {
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::InternalServerError => StatusCode::INTERNAL_SERVER_ERROR,

            Self::AccessError(_) => StatusCode::FORBIDDEN,
            Self::NoSuchDataset => StatusCode::NOT_FOUND,
            Self::NoSuchAsset => StatusCode::NOT_FOUND,
            Self::NoSuchCollection => StatusCode::NOT_FOUND,
            Self::UploadComplete { .. } => StatusCode::METHOD_NOT_ALLOWED,
            Self::RequestError(_) => StatusCode::BAD_REQUEST,
            Self::PortalError(PortalError::InvalidUploadTransition { .. }) => StatusCode::CONFLICT,
            Self::PortalError(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl StdError for ServerError {}

impl From<PortalError> for ServerError {
    fn from(error: PortalError) -> Self {
        Self::PortalError(error)
    }
}

impl From<super::access::Error> for ServerError {
    fn from(error: super::access::Error) -> Self {
        Self::AccessError(error)
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        if matches!(
            self,
            Self::DatabaseError(_) | Self::StorageError(_) | Self::InternalServerError
        ) {
            tracing::error!("{:?}", self);
        }

        let sanitized = self.into_clients();

        let status_code = sanitized.http_status_code();
        let error_response = ErrorResponse {
            code: status_code.as_u16(),
            message: sanitized.to_string(),
            error: sanitized.name().to_string(),
        };

        (status_code, Json(error_response)).into_response()
    }
}
