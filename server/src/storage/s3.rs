//! S3 remote files.

use std::time::Duration;

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_s3::{
    config::Builder as S3ConfigBuilder,
    config::{Credentials, Region},
    presigning::PresigningConfig,
    Client,
};
use derivative::Derivative;
use serde::Deserialize;

use super::{RemoteFile, StorageBackend};
use crate::error::{ServerError, ServerResult};

/// The S3 remote file storage backend.
#[derive(Debug)]
pub struct S3Backend {
    client: Client,
}

/// S3 remote file storage configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct S3StorageConfig {
    /// The AWS region.
    region: String,

    /// Custom S3 endpoint.
    ///
    /// Set this if you are using an S3-compatible object storage (e.g., Minio).
    endpoint: Option<String>,

    /// S3 credentials.
    ///
    /// If not specified, it's read from the `AWS_ACCESS_KEY_ID` and
    /// `AWS_SECRET_ACCESS_KEY` environment variables.
    credentials: Option<S3CredentialsConfig>,
}

/// S3 credential configuration.
#[derive(Clone, Derivative, Deserialize)]
#[derivative(Debug)]
#[serde(deny_unknown_fields)]
pub struct S3CredentialsConfig {
    /// Access key ID.
    #[serde(rename = "access-key-id")]
    access_key_id: String,

    /// Secret access key.
    #[serde(rename = "secret-access-key")]
    #[derivative(Debug = "ignore")]
    secret_access_key: String,
}

impl S3Backend {
    pub async fn new(config: S3StorageConfig) -> ServerResult<Self> {
        let shared_config = aws_config::load_defaults(BehaviorVersion::latest()).await;
        let mut builder = S3ConfigBuilder::from(&shared_config);

        if let Some(credentials) = &config.credentials {
            builder = builder.credentials_provider(Credentials::new(
                &credentials.access_key_id,
                &credentials.secret_access_key,
                None,
                None,
                "s3",
            ));
        }

        if let Some(endpoint) = &config.endpoint {
            builder = builder.endpoint_url(endpoint).force_path_style(true);
        }

        let s3_config = builder.region(Region::new(config.region.to_owned())).build();

        Ok(Self {
            client: Client::from_conf(s3_config),
        })
    }
}

#[async_trait]
impl StorageBackend for S3Backend {
    async fn object_size(&self, file: &RemoteFile) -> ServerResult<Option<u64>> {
        let head = self
            .client
            .head_object()
            .bucket(&file.bucket)
            .key(&file.key)
            .send()
            .await;

        match head {
            Ok(output) => {
                tracing::debug!("head_object -> {:?}", output);

                Ok(output
                    .content_length()
                    .and_then(|len| u64::try_from(len).ok()))
            }
            Err(e) => {
                if e.as_service_error()
                    .map(|e| e.is_not_found())
                    .unwrap_or(false)
                {
                    Ok(None)
                } else {
                    Err(ServerError::storage_error(e))
                }
            }
        }
    }

    async fn presigned_url(&self, file: &RemoteFile, ttl: Duration) -> ServerResult<String> {
        let presign_config =
            PresigningConfig::expires_in(ttl).map_err(ServerError::storage_error)?;

        let presigned = self
            .client
            .get_object()
            .bucket(&file.bucket)
            .key(&file.key)
            .presigned(presign_config)
            .await
            .map_err(ServerError::storage_error)?;

        Ok(presigned.uri().to_string())
    }
}
