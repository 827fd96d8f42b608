//! Remote file storage.
//!
//! Dataset artifacts live in an S3-compatible bucket. The server never
//! proxies file contents. It looks up object metadata and hands out
//! time-limited links that clients download from directly.

mod s3;

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use anyhow::anyhow;

use crate::error::{ServerError, ServerResult};

pub(crate) use self::s3::{S3Backend, S3StorageConfig};

/// Reference to a file in an S3-compatible storage bucket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteFile {
    /// Name of the bucket.
    pub bucket: String,

    /// Key of the file.
    pub key: String,
}

/// A storage backend.
#[async_trait::async_trait]
pub trait StorageBackend: Send + Sync + std::fmt::Debug {
    /// Returns the size of a file in bytes.
    ///
    /// Returns `None` if the file does not exist.
    async fn object_size(&self, file: &RemoteFile) -> ServerResult<Option<u64>>;

    /// Returns a link that can be used to download a file without
    /// credentials until `ttl` has passed.
    async fn presigned_url(&self, file: &RemoteFile, ttl: Duration) -> ServerResult<String>;
}

impl FromStr for RemoteFile {
    type Err = ServerError;

    /// Parses an URI of the form `s3://bucket/key`.
    fn from_str(uri: &str) -> ServerResult<Self> {
        let invalid = || ServerError::StorageError(anyhow!("Invalid S3 URI \"{}\"", uri));

        let path = uri.strip_prefix("s3://").ok_or_else(invalid)?;
        let (bucket, key) = path.split_once('/').ok_or_else(invalid)?;

        if bucket.is_empty() || key.is_empty() {
            return Err(invalid());
        }

        Ok(Self {
            bucket: bucket.to_owned(),
            key: key.to_owned(),
        })
    }
}

impl fmt::Display for RemoteFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "s3://{}/{}", self.bucket, self.key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_s3_uri() {
        let file: RemoteFile = "s3://bucket/path/to/local.h5ad".parse().unwrap();
        assert_eq!("bucket", file.bucket);
        assert_eq!("path/to/local.h5ad", file.key);
        assert_eq!("s3://bucket/path/to/local.h5ad", file.to_string());

        assert!("bucket/key".parse::<RemoteFile>().is_err());
        assert!("s3://bucket".parse::<RemoteFile>().is_err());
        assert!("s3://bucket/".parse::<RemoteFile>().is_err());
        assert!("s3:///key".parse::<RemoteFile>().is_err());
    }
}
