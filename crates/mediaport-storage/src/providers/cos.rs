use async_trait::async_trait;
use mediaport_core::{
    ConnectionStatus, PathGenerator, StorageType, StoredObject, UploadResult, UploadableFile,
};
use serde::Deserialize;

use super::custom_domain_base;
use crate::object_client::{ObjectClient, ObjectClientSettings};
use crate::traits::{Storage, StorageResult};

/// Tencent COS provider settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CosConfig {
    pub secret_id: String,
    pub secret_key: String,
    /// Bucket name including the APPID suffix, e.g. `photos-1250000000`
    pub bucket: String,
    pub region: String,
    #[serde(default)]
    pub custom_domain: Option<String>,
}

impl CosConfig {
    pub fn endpoint(&self) -> String {
        format!("https://{}.cos.{}.myqcloud.com", self.bucket, self.region.trim())
    }

    pub fn public_base_url(&self) -> String {
        match &self.custom_domain {
            Some(domain) => custom_domain_base(domain),
            None => self.endpoint(),
        }
    }
}

/// Tencent COS storage, through the COS S3-compatible API
pub struct CosStorage {
    client: ObjectClient,
}

impl CosStorage {
    pub fn new(config: CosConfig, paths: PathGenerator) -> StorageResult<Self> {
        let settings = ObjectClientSettings {
            public_base_url: config.public_base_url(),
            endpoint: Some(config.endpoint()),
            region: config.region.trim().to_string(),
            access_key_id: config.secret_id,
            secret_access_key: config.secret_key,
            bucket: config.bucket,
            virtual_hosted: true,
        };
        let client = ObjectClient::new(StorageType::Cos, settings, paths)?;
        Ok(Self { client })
    }

    pub fn url_for(&self, key: &str) -> String {
        self.client.url_for(key)
    }
}

#[async_trait]
impl Storage for CosStorage {
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
        StorageType::Cos
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mediaport_core::NameRule;

    fn config() -> CosConfig {
        CosConfig {
            secret_id: "AKID".to_string(),
            secret_key: "secret".to_string(),
            bucket: "photos-1250000000".to_string(),
            region: "ap-guangzhou".to_string(),
            custom_domain: None,
        }
    }

    #[test]
    fn test_object_url() {
        let storage = CosStorage::new(config(), PathGenerator::new("", NameRule::Original)).unwrap();
        assert_eq!(
            storage.url_for("2024/03/05/a.png"),
            "https://photos-1250000000.cos.ap-guangzhou.myqcloud.com/2024/03/05/a.png"
        );
    }

    #[test]
    fn test_custom_domain_url() {
        let cfg = CosConfig {
            custom_domain: Some("cdn.example.com".to_string()),
            ..config()
        };
        assert_eq!(cfg.public_base_url(), "https://cdn.example.com");
        assert_eq!(cfg.endpoint(), "https://photos-1250000000.cos.ap-guangzhou.myqcloud.com");
    }
}
