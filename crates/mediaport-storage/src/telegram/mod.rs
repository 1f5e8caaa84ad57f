//! Telegram bot relay storage.
//!
//! Files are sent to a chat through the Bot API and served back from the Bot
//! API file endpoint. The API has no listing and bots cannot delete files, so
//! every upload is also appended to a [`LocalIndex`]; `list_objects` reads that
//! index and `delete` only removes the index entry.

mod api;
mod endpoint;
mod errors;

use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use chrono::Utc;
use mediaport_core::models::sort_newest_first;
use mediaport_core::{
    ConnectionStatus, PathGenerator, StorageType, StoredObject, UploadResult, UploadableFile,
};
use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::index::{IndexRecord, IndexStore, LocalIndex, TELEGRAM_INDEX_NAMESPACE};
use crate::traits::{format_error, Storage, StorageError, StorageResult};
use api::{ApiResponse, BotUser, Message, RemoteFile};

pub use endpoint::SendMethod;
pub use errors::classify as classify_error;

const DEFAULT_API_HOST: &str = "https://api.telegram.org";
const FALLBACK_MIME_TYPE: &str = "application/octet-stream";

/// Telegram provider settings.
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TelegramConfig {
    pub bot_token: String,
    /// Numeric chat id or `@channelusername`
    pub chat_id: String,
    /// Replaces `api.telegram.org` (reverse proxy for restricted networks)
    #[serde(default)]
    pub proxy_domain: Option<String>,
}

impl Debug for TelegramConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("TelegramConfig")
            .field("chat_id", &self.chat_id)
            .field("proxy_domain", &self.proxy_domain)
            .finish()
    }
}

impl TelegramConfig {
    /// API host without trailing `/`. A proxy domain without a scheme gets `https://`.
    pub fn api_host(&self) -> String {
        match self
            .proxy_domain
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
        {
            Some(domain) if domain.starts_with("http://") || domain.starts_with("https://") => {
                domain.trim_end_matches('/').to_string()
            }
            Some(domain) => format!("https://{}", domain.trim_end_matches('/')),
            None => DEFAULT_API_HOST.to_string(),
        }
    }
}

/// Telegram storage implementation
pub struct TelegramStorage {
    http_client: reqwest::Client,
    config: TelegramConfig,
    api_host: String,
    paths: PathGenerator,
    index: LocalIndex,
}

impl Debug for TelegramStorage {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("TelegramStorage")
            .field("chat_id", &self.config.chat_id)
            .field("api_host", &self.api_host)
            .finish()
    }
}

impl TelegramStorage {
    pub fn new(
        config: TelegramConfig,
        paths: PathGenerator,
        index_store: Arc<dyn IndexStore>,
    ) -> StorageResult<Self> {
        let http_client = reqwest::Client::builder().build().map_err(|e| {
            StorageError::BackendError(format_error("Failed to create HTTP client", e))
        })?;

        Ok(Self {
            api_host: config.api_host(),
            http_client,
            config,
            paths,
            index: LocalIndex::new(index_store, TELEGRAM_INDEX_NAMESPACE),
        })
    }

    pub fn index(&self) -> &LocalIndex {
        &self.index
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.api_host, self.config.bot_token, method)
    }

    /// Public download URL of a file path returned by `getFile`
    pub fn file_url(&self, file_path: &str) -> String {
        format!(
            "{}/file/bot{}/{}",
            self.api_host,
            self.config.bot_token,
            file_path.trim_start_matches('/')
        )
    }

    /// Send a Bot API request and unwrap its `result`.
    ///
    /// Errors come back already classified. Transport errors are rendered
    /// without their URL since it embeds the bot token.
    async fn call<T: DeserializeOwned>(
        &self,
        method: &str,
        request: reqwest::RequestBuilder,
    ) -> Result<T, String> {
        let response = request
            .send()
            .await
            .map_err(|e| errors::classify(&e.without_url().to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| errors::classify(&e.without_url().to_string()))?;

        match serde_json::from_str::<ApiResponse<T>>(&body) {
            Ok(ApiResponse {
                ok: true,
                result: Some(result),
                ..
            }) if status.is_success() => Ok(result),
            Ok(parsed) => {
                tracing::debug!(
                    method = method,
                    status = %status,
                    error_code = ?parsed.error_code,
                    "Telegram API reported failure"
                );
                let description = parsed
                    .description
                    .unwrap_or_else(|| format!("{} returned no result ({})", method, status));
                Err(errors::classify(&description))
            }
            Err(_) if !status.is_success() => {
                Err(errors::classify(&format!("{}: {}", status, body.trim())))
            }
            Err(e) => Err(format_error(
                &format!("Unexpected {} response", method),
                e,
            )),
        }
    }

    async fn send_file(&self, file: &UploadableFile, method: SendMethod) -> Result<Message, String> {
        let part = Part::bytes(file.data.to_vec()).file_name(file.name.clone());
        let mime = if file.mime_type.trim().is_empty() {
            FALLBACK_MIME_TYPE
        } else {
            file.mime_type.as_str()
        };
        let part = match part.mime_str(mime) {
            Ok(part) => part,
            Err(_) => Part::bytes(file.data.to_vec())
                .file_name(file.name.clone())
                .mime_str(FALLBACK_MIME_TYPE)
                .map_err(|e| format_error("Invalid content type", e))?,
        };

        let form = Form::new()
            .text("chat_id", self.config.chat_id.clone())
            .part(method.field_name(), part);

        let request = self
            .http_client
            .post(self.method_url(method.api_method()))
            .multipart(form);
        self.call(method.api_method(), request).await
    }

    async fn resolve_file_path(&self, file_id: &str) -> Result<String, String> {
        let request = self
            .http_client
            .get(self.method_url("getFile"))
            .query(&[("file_id", file_id)]);
        let remote: RemoteFile = self.call("getFile", request).await?;
        remote
            .file_path
            .filter(|p| !p.is_empty())
            .ok_or_else(|| "Telegram did not return a file path".to_string())
    }
}

#[async_trait]
impl Storage for TelegramStorage {
    async fn upload(&self, file: &UploadableFile) -> StorageResult<UploadResult> {
        let key = self.paths.generate_path(&file.name);
        let method = SendMethod::select(&file.mime_type, &file.name);
        let start = Instant::now();

        let fail = |message: String| {
            tracing::error!(
                error = %message,
                chat_id = %self.config.chat_id,
                key = %key,
                method = method.api_method(),
                size_bytes = file.size_bytes,
                duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                "Telegram upload failed"
            );
            StorageError::UploadFailed(message)
        };

        let message = self.send_file(file, method).await.map_err(fail)?;
        let file_id = message
            .file()
            .map(|f| f.file_id.clone())
            .ok_or_else(|| fail("Telegram response contained no file".to_string()))?;
        let file_path = self.resolve_file_path(&file_id).await.map_err(fail)?;
        let url = self.file_url(&file_path);

        self.index
            .append(IndexRecord {
                key: key.clone(),
                url: url.clone(),
                file_id: file_id.clone(),
                file_path: file_path.clone(),
                last_modified: Utc::now(),
                size: file.size_bytes,
            })
            .await?;

        tracing::info!(
            chat_id = %self.config.chat_id,
            key = %key,
            method = method.api_method(),
            size_bytes = file.size_bytes,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Telegram upload successful"
        );

        Ok(UploadResult {
            url,
            key,
            remote_file_id: Some(file_id),
            remote_file_path: Some(file_path),
        })
    }

    async fn delete(&self, key: &str) -> StorageResult<()> {
        let removed = self.index.remove_by_key(key).await?;
        if removed {
            tracing::warn!(
                key = %key,
                "Telegram files cannot be deleted remotely; removed the local index entry only"
            );
        } else {
            tracing::debug!(key = %key, "No index entry to delete");
        }
        Ok(())
    }

    async fn list_objects(&self, prefix: Option<&str>) -> StorageResult<Vec<StoredObject>> {
        let prefix = prefix.filter(|p| !p.is_empty());
        let mut objects: Vec<StoredObject> = self
            .index
            .records()
            .await?
            .into_iter()
            .filter(|r| prefix.map_or(true, |p| r.key.starts_with(p)))
            .map(|r| StoredObject {
                key: r.key,
                url: r.url,
                last_modified: r.last_modified,
                size_bytes: r.size,
            })
            .collect();
        sort_newest_first(&mut objects);
        Ok(objects)
    }

    async fn test_connection(&self) -> ConnectionStatus {
        let request = self.http_client.get(self.method_url("getMe"));
        match self.call::<BotUser>("getMe", request).await {
            Ok(bot) => {
                let name = bot
                    .username
                    .map(|u| format!("@{}", u))
                    .unwrap_or(bot.first_name);
                ConnectionStatus::success(format!("Connected as {}", name))
            }
            Err(message) => {
                tracing::warn!(error = %message, "Telegram connection test failed");
                ConnectionStatus::failure(format_error("Connection failed", message))
            }
        }
    }

    fn backend_type(&self) -> StorageType {
        StorageType::Telegram
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::MemoryIndexStore;
    use mediaport_core::NameRule;

    fn config(proxy: Option<&str>) -> TelegramConfig {
        TelegramConfig {
            bot_token: "123:ABC".to_string(),
            chat_id: "-1001".to_string(),
            proxy_domain: proxy.map(str::to_string),
        }
    }

    fn storage(proxy: Option<&str>) -> TelegramStorage {
        TelegramStorage::new(
            config(proxy),
            PathGenerator::new("{year}", NameRule::Original),
            Arc::new(MemoryIndexStore::new()),
        )
        .unwrap()
    }

    #[test]
    fn test_default_host() {
        let storage = storage(None);
        assert_eq!(
            storage.method_url("getMe"),
            "https://api.telegram.org/bot123:ABC/getMe"
        );
        assert_eq!(
            storage.file_url("photos/file_1.jpg"),
            "https://api.telegram.org/file/bot123:ABC/photos/file_1.jpg"
        );
    }

    #[test]
    fn test_proxy_domain_replaces_host() {
        assert_eq!(config(Some("tg.example.com/")).api_host(), "https://tg.example.com");
        assert_eq!(config(Some("http://127.0.0.1:8081")).api_host(), "http://127.0.0.1:8081");
        assert_eq!(config(Some("  ")).api_host(), DEFAULT_API_HOST);
    }

    #[test]
    fn test_debug_hides_token() {
        let rendered = format!("{:?} {:?}", config(None), storage(None));
        assert!(!rendered.contains("ABC"));
    }
}
