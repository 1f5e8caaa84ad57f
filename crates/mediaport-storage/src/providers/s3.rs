use async_trait::async_trait;
use mediaport_core::{
    ConnectionStatus, PathGenerator, StorageType, StoredObject, UploadResult, UploadableFile,
};
use serde::Deserialize;

use super::custom_domain_base;
use crate::object_client::{ObjectClient, ObjectClientSettings};
use crate::traits::{Storage, StorageResult};

/// Amazon S3 or S3-compatible provider settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct S3Config {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub bucket: String,
    pub region: String,
    /// Custom endpoint for S3-compatible providers
    /// (e.g. "http://localhost:9000" for MinIO)
    #[serde(default)]
    pub endpoint: Option<String>,
    #[serde(default)]
    pub custom_domain: Option<String>,
}

impl S3Config {
    /// Base of the public object URL
    ///
    /// For AWS S3, uses the standard format: https://{bucket}.s3.{region}.amazonaws.com
    /// For S3-compatible providers, uses path-style addressing on the endpoint
    pub fn public_base_url(&self) -> String {
        if let Some(domain) = &self.custom_domain {
            return custom_domain_base(domain);
        }
        match &self.endpoint {
            Some(endpoint) => format!("{}/{}", endpoint.trim_end_matches('/'), self.bucket),
            None => format!("https://{}.s3.{}.amazonaws.com", self.bucket, self.region),
        }
    }
}

/// S3 storage implementation
pub struct S3Storage {
    client: ObjectClient,
}

impl S3Storage {
    pub fn new(config: S3Config, paths: PathGenerator) -> StorageResult<Self> {
        let settings = ObjectClientSettings {
            public_base_url: config.public_base_url(),
            access_key_id: config.access_key_id,
            secret_access_key: config.secret_access_key,
            bucket: config.bucket,
            region: config.region,
            endpoint: config.endpoint,
            virtual_hosted: false,
        };
        let client = ObjectClient::new(StorageType::S3, settings, paths)?;
        Ok(Self { client })
    }

    pub fn url_for(&self, key: &str) -> String {
        self.client.url_for(key)
    }
}

#[async_trait]
impl Storage for S3Storage {
    async fn upload(&self, file: &UploadableFile) -> StorageResult<UploadResult> {
        self.client.upload(file).await
    }

    async fn delete(&self, key: &str) -> StorageResult<()> {
        self.client.delete(key).await
    }

    async fn list_objects(&self, prefix: Option<&str>) -> StorageResult<Vec<StoredObject>> {
        self.client.list(prefix).await
    }

    async fn test_connection(&self) -> ConnectionStatus {
        self.client.test_connection().await
    }

    fn backend_type(&self) -> StorageType {
        StorageType::S3
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mediaport_core::NameRule;

    fn config() -> S3Config {
        S3Config {
            access_key_id: "AKIA".to_string(),
            secret_access_key: "secret".to_string(),
            bucket: "media".to_string(),
            region: "us-east-1".to_string(),
            endpoint: None,
            custom_domain: None,
        }
    }

    #[test]
    fn test_default_aws_url() {
        let storage = S3Storage::new(config(), PathGenerator::new("", NameRule::Original)).unwrap();
        assert_eq!(
            storage.url_for("2024/03/05/cat.png"),
            "https://media.s3.us-east-1.amazonaws.com/2024/03/05/cat.png"
        );
    }

    #[test]
    fn test_custom_endpoint_uses_path_style() {
        let cfg = S3Config {
            endpoint: Some("http://localhost:9000/".to_string()),
            ..config()
        };
        assert_eq!(cfg.public_base_url(), "http://localhost:9000/media");
    }

    #[test]
    fn test_custom_domain_wins() {
        let cfg = S3Config {
            endpoint: Some("http://localhost:9000".to_string()),
            custom_domain: Some("cdn.example.com".to_string()),
            ..config()
        };
        assert_eq!(cfg.public_base_url(), "https://cdn.example.com");
    }

    #[test]
    fn test_backend_type() {
        let storage = S3Storage::new(config(), PathGenerator::new("", NameRule::Original)).unwrap();
        assert_eq!(storage.backend_type(), StorageType::S3);
    }
}
