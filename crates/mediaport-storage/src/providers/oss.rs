use async_trait::async_trait;
use mediaport_core::{
    ConnectionStatus, PathGenerator, StorageType, StoredObject, UploadResult, UploadableFile,
};
use serde::Deserialize;

use super::custom_domain_base;
use crate::object_client::{ObjectClient, ObjectClientSettings};
use crate::traits::{Storage, StorageResult};

/// Aliyun OSS provider settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OssConfig {
    pub access_key_id: String,
    pub access_key_secret: String,
    pub bucket: String,
    /// Region id, with or without the `oss-` prefix (`cn-hangzhou`, `oss-cn-hangzhou`)
    pub region: String,
    #[serde(default)]
    pub custom_domain: Option<String>,
}

impl OssConfig {
    pub fn region_id(&self) -> &str {
        let region = self.region.trim();
        region.strip_prefix("oss-").unwrap_or(region)
    }

    /// Virtual-hosted endpoint, with the bucket in the host name.
    pub fn endpoint(&self) -> String {
        format!("https://{}.oss-{}.aliyuncs.com", self.bucket, self.region_id())
    }

    pub fn public_base_url(&self) -> String {
        match &self.custom_domain {
            Some(domain) => custom_domain_base(domain),
            None => self.endpoint(),
        }
    }
}

/// Aliyun OSS storage, through the OSS S3-compatible API
pub struct OssStorage {
    client: ObjectClient,
}

impl OssStorage {
    pub fn new(config: OssConfig, paths: PathGenerator) -> StorageResult<Self> {
        let endpoint = config.endpoint();
        Self::with_endpoint(config, endpoint, paths)
    }

    /// Like [`OssStorage::new`] but sending requests to `endpoint`, which must
    /// already address the bucket.
    pub(crate) fn with_endpoint(
        config: OssConfig,
        endpoint: String,
        paths: PathGenerator,
    ) -> StorageResult<Self> {
        let settings = ObjectClientSettings {
            public_base_url: config.public_base_url(),
            endpoint: Some(endpoint),
            region: config.region_id().to_string(),
            access_key_id: config.access_key_id,
            secret_access_key: config.access_key_secret,
            bucket: config.bucket,
            virtual_hosted: true,
        };
        let client = ObjectClient::new(StorageType::Oss, settings, paths)?;
        Ok(Self { client })
    }

    pub fn url_for(&self, key: &str) -> String {
        self.client.url_for(key)
    }
}

#[async_trait]
impl Storage for OssStorage {
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
        StorageType::Oss
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mediaport_core::NameRule;
    use mockito::Server;

    fn config(region: &str) -> OssConfig {
        OssConfig {
            access_key_id: "LTAI".to_string(),
            access_key_secret: "secret".to_string(),
            bucket: "pics".to_string(),
            region: region.to_string(),
            custom_domain: None,
        }
    }

    #[test]
    fn test_region_prefix_is_optional() {
        assert_eq!(config("oss-cn-hangzhou").region_id(), "cn-hangzhou");
        assert_eq!(config("cn-hangzhou").region_id(), "cn-hangzhou");
        assert_eq!(
            config("oss-cn-hangzhou").endpoint(),
            "https://pics.oss-cn-hangzhou.aliyuncs.com"
        );
    }

    #[test]
    fn test_object_url() {
        let storage =
            OssStorage::new(config("cn-shanghai"), PathGenerator::new("", NameRule::Original))
                .unwrap();
        assert_eq!(
            storage.url_for("a/b.png"),
            "https://pics.oss-cn-shanghai.aliyuncs.com/a/b.png"
        );
    }

    #[test]
    fn test_custom_domain_url() {
        let cfg = OssConfig {
            custom_domain: Some("https://img.example.com/".to_string()),
            ..config("cn-shanghai")
        };
        assert_eq!(cfg.public_base_url(), "https://img.example.com");
    }

    #[tokio::test]
    async fn test_upload_path_omits_bucket() {
        let mut server = Server::new_async().await;
        let put = server
            .mock("PUT", "/2024/cat.png")
            .match_header("content-type", "image/png")
            .with_status(200)
            .with_header("ETag", "\"abc\"")
            .create_async()
            .await;
        let path_style = server
            .mock("PUT", "/pics/2024/cat.png")
            .expect(0)
            .create_async()
            .await;

        let storage = OssStorage::with_endpoint(
            config("oss-cn-hangzhou"),
            server.url(),
            PathGenerator::new("2024", NameRule::Original),
        )
        .unwrap();
        let file = UploadableFile::new("cat.png", "image/png", b"png".to_vec());
        let result = storage.upload(&file).await.unwrap();

        put.assert_async().await;
        path_style.assert_async().await;
        assert_eq!(result.key, "2024/cat.png");
        assert_eq!(
            result.url,
            "https://pics.oss-cn-hangzhou.aliyuncs.com/2024/cat.png"
        );
    }
}
