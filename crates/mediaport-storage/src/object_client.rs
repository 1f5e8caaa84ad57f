use std::time::Instant;

use futures::TryStreamExt;
use mediaport_core::models::sort_newest_first;
use mediaport_core::{
    ConnectionStatus, PathGenerator, StorageType, StoredObject, UploadResult, UploadableFile,
};
use object_store::aws::{AmazonS3, AmazonS3Builder};
use object_store::path::Path;
use object_store::Error as ObjectStoreError;
use object_store::{
    Attribute, AttributeValue, Attributes, ObjectStore, ObjectStoreExt, PutOptions, PutPayload,
    Result as ObjectResult,
};

use crate::traits::{format_error, StorageError, StorageResult};

/// Connection settings shared by every S3-compatible backend.
pub(crate) struct ObjectClientSettings {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub bucket: String,
    pub region: String,
    pub endpoint: Option<String>,
    /// Whether the endpoint already carries the bucket in its host name
    pub virtual_hosted: bool,
    /// Base URL public links are built from, without trailing `/`
    pub public_base_url: String,
}

/// Object-store client plus the key and URL conventions of one backend.
pub(crate) struct ObjectClient {
    store: AmazonS3,
    backend: StorageType,
    bucket: String,
    public_base_url: String,
    paths: PathGenerator,
}

impl ObjectClient {
    pub fn new(
        backend: StorageType,
        settings: ObjectClientSettings,
        paths: PathGenerator,
    ) -> StorageResult<Self> {
        let mut builder = AmazonS3Builder::new()
            .with_access_key_id(settings.access_key_id)
            .with_secret_access_key(settings.secret_access_key)
            .with_region(settings.region)
            .with_bucket_name(settings.bucket.clone());

        if let Some(endpoint) = settings.endpoint {
            let allow_http = endpoint.starts_with("http://");
            builder = builder
                .with_endpoint(endpoint)
                .with_allow_http(allow_http)
                .with_virtual_hosted_style_request(settings.virtual_hosted);
        }

        let store = builder.build().map_err(|e| {
            StorageError::BackendError(format_error(
                &format!("Failed to initialize {} client", backend.display_name()),
                e,
            ))
        })?;

        Ok(Self {
            store,
            backend,
            bucket: settings.bucket,
            public_base_url: settings.public_base_url.trim_end_matches('/').to_string(),
            paths,
        })
    }

    pub fn url_for(&self, key: &str) -> String {
        format!("{}/{}", self.public_base_url, key)
    }

    pub async fn upload(&self, file: &UploadableFile) -> StorageResult<UploadResult> {
        let key = self.paths.generate_path(&file.name);
        let location = Path::from(key.as_str());
        let start = Instant::now();

        let mut attributes = Attributes::new();
        attributes.insert(
            Attribute::ContentType,
            AttributeValue::from(file.mime_type.clone()),
        );
        let opts = PutOptions {
            attributes,
            ..Default::default()
        };

        let result: ObjectResult<_> = self
            .store
            .put_opts(&location, PutPayload::from(file.data.clone()), opts)
            .await;

        result.map_err(|e| {
            tracing::error!(
                error = %e,
                backend = %self.backend,
                bucket = %self.bucket,
                key = %key,
                size_bytes = file.size_bytes,
                duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                "Object upload failed"
            );
            StorageError::UploadFailed(e.to_string())
        })?;

        tracing::info!(
            backend = %self.backend,
            bucket = %self.bucket,
            key = %key,
            size_bytes = file.size_bytes,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Object upload successful"
        );

        Ok(UploadResult::new(self.url_for(&key), key))
    }

    pub async fn delete(&self, key: &str) -> StorageResult<()> {
        let start = Instant::now();
        let location = Path::from(key);

        match self.store.delete(&location).await {
            Ok(()) | Err(ObjectStoreError::NotFound { .. }) => {}
            Err(e) => {
                tracing::error!(
                    error = %e,
                    backend = %self.backend,
                    bucket = %self.bucket,
                    key = %key,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "Object delete failed"
                );
                return Err(StorageError::DeleteFailed(e.to_string()));
            }
        }

        tracing::info!(
            backend = %self.backend,
            bucket = %self.bucket,
            key = %key,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Object delete successful"
        );

        Ok(())
    }

    pub async fn list(&self, prefix: Option<&str>) -> StorageResult<Vec<StoredObject>> {
        let start = Instant::now();
        let prefix = prefix.map(str::trim).filter(|p| !p.is_empty());

        // object_store lists by path segment; narrow to the directory, then
        // filter on the raw string prefix
        let dir = prefix
            .and_then(|p| p.rsplit_once('/').map(|(dir, _)| dir))
            .filter(|d| !d.is_empty())
            .map(Path::from);

        let metas: Vec<_> = self
            .store
            .list(dir.as_ref())
            .try_collect()
            .await
            .map_err(|e| {
                tracing::error!(
                    error = %e,
                    backend = %self.backend,
                    bucket = %self.bucket,
                    "Object listing failed"
                );
                StorageError::ListFailed(e.to_string())
            })?;

        let mut objects: Vec<StoredObject> = metas
            .into_iter()
            .filter_map(|meta| {
                let key = meta.location.to_string();
                if let Some(p) = prefix {
                    if !key.starts_with(p) {
                        return None;
                    }
                }
                Some(StoredObject {
                    url: self.url_for(&key),
                    key,
                    last_modified: meta.last_modified,
                    size_bytes: meta.size,
                })
            })
            .collect();
        sort_newest_first(&mut objects);

        tracing::debug!(
            backend = %self.backend,
            bucket = %self.bucket,
            count = objects.len(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Object listing successful"
        );

        Ok(objects)
    }

    pub async fn test_connection(&self) -> ConnectionStatus {
        match self.store.list_with_delimiter(None).await {
            Ok(_) => ConnectionStatus::success(format!(
                "Connected to {} bucket {}",
                self.backend.display_name(),
                self.bucket
            )),
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    backend = %self.backend,
                    bucket = %self.bucket,
                    "Connection test failed"
                );
                ConnectionStatus::failure(format_error("Connection failed", e))
            }
        }
    }
}
