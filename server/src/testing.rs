//! Test fixtures.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use anyhow::anyhow;
use chrono::Utc;
use sea_orm::ActiveValue::Set;
use sea_orm::{ActiveModelTrait, ConnectOptions, Database, DatabaseConnection};

use crate::config::{load_config_from_str, Config};
use crate::database::datasets::{self, NewArtifact, NewDataset};
use crate::database::entity::collection::{self, CollectionModel};
use crate::database::entity::dataset::DatasetModel;
use crate::database::migration::{Migrator, MigratorTrait};
use crate::error::{ServerError, ServerResult};
use crate::status::ProcessingStatusSpec;
use crate::storage::{RemoteFile, StorageBackend};
use portal::collection::Visibility;
use portal::dataset::{ArtifactFileType, ArtifactType};
use portal::status::UploadStatus;
use portal_token::{decode_token_hs256_secret_base64, SignatureType, Token};

pub const OWNER: &str = "test_user_id";
pub const SOMEONE_ELSE: &str = "someone_else";

const TEST_SECRET: &str = "cG9ydGFsLXRlc3Qtc2VjcmV0";

pub fn test_config() -> Config {
    load_config_from_str(&format!(
        r#"
        presigned-url-ttl = "1h"

        [database]
        url = "sqlite::memory:"

        [storage]
        region = "us-west-2"

        [jwt.signing]
        token-hs256-secret-base64 = "{}"
        "#,
        TEST_SECRET
    ))
    .unwrap()
}

/// Returns a migrated in-memory database.
///
/// Every connection to an in-memory SQLite database sees a database of
/// its own, so the pool is limited to one connection.
pub async fn test_database() -> DatabaseConnection {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);

    let db = Database::connect(options).await.unwrap();
    Migrator::up(&db, None).await.unwrap();
    db
}

/// Returns a bearer token for a user.
pub fn bearer(user: &str) -> String {
    let exp = Utc::now() + chrono::Duration::hours(1);
    let mut token = Token::new(user.to_owned(), &exp).unwrap();
    token.set_profile(
        Some("Test User".to_owned()),
        Some("test@example.org".to_owned()),
    );

    let key = SignatureType::HS256(decode_token_hs256_secret_base64(TEST_SECRET).unwrap());
    format!("Bearer {}", token.encode(&key, &None, &None).unwrap())
}

/// Inserts a collection revision.
pub async fn insert_collection(
    db: &DatabaseConnection,
    id: &str,
    visibility: Visibility,
    owner: &str,
) -> CollectionModel {
    let now = Utc::now();
    collection::ActiveModel {
        id: Set(id.to_owned()),
        visibility: Set(visibility.as_str().to_owned()),
        owner: Set(owner.to_owned()),
        name: Set("Lung atlas".to_owned()),
        description: Set("Single-cell atlas of the human lung".to_owned()),
        contact_name: Set(None),
        contact_email: Set(None),
        data_submission_policy_version: Set("2.0".to_owned()),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(db)
    .await
    .unwrap()
}

/// Inserts a dataset with one H5AD artifact and the given upload state.
pub async fn insert_dataset(
    db: &DatabaseConnection,
    collection: &CollectionModel,
    upload_status: UploadStatus,
    upload_progress: f64,
) -> DatasetModel {
    let visibility = collection.visibility().unwrap();
    let new = NewDataset {
        name: "Alveolar cells".to_owned(),
        sex: vec!["female".to_owned()],
        artifacts: vec![NewArtifact {
            filename: "local.h5ad".to_owned(),
            filetype: ArtifactFileType::H5ad,
            artifact_type: ArtifactType::Original,
            user_submitted: true,
            s3_uri: "s3://bucket/datasets/local.h5ad".to_owned(),
        }],
        processing_status: Some(ProcessingStatusSpec {
            upload_status,
            upload_progress,
            ..Default::default()
        }),
        ..Default::default()
    };

    datasets::create_dataset(db, &collection.id, visibility, new)
        .await
        .unwrap()
}

/// A storage backend holding objects in memory.
#[derive(Debug, Default)]
pub struct FakeStorage {
    objects: Mutex<HashMap<String, u64>>,
    fail_presign: bool,
}

impl FakeStorage {
    pub fn with_object(self, uri: &str, size: u64) -> Self {
        self.objects.lock().unwrap().insert(uri.to_owned(), size);
        self
    }

    pub fn failing_presign(mut self) -> Self {
        self.fail_presign = true;
        self
    }
}

#[async_trait::async_trait]
impl StorageBackend for FakeStorage {
    async fn object_size(&self, file: &RemoteFile) -> ServerResult<Option<u64>> {
        Ok(self.objects.lock().unwrap().get(&file.to_string()).copied())
    }

    async fn presigned_url(&self, file: &RemoteFile, ttl: Duration) -> ServerResult<String> {
        if self.fail_presign {
            return Err(ServerError::StorageError(anyhow!("presigning is down")));
        }

        Ok(format!(
            "https://{}.s3.example.org/{}?expires={}",
            file.bucket,
            file.key,
            ttl.as_secs()
        ))
    }
}
