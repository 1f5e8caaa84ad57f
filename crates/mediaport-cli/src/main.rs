//! Mediaport CLI: upload, list and manage media on a configured storage backend.
//!
//! The backend is picked with `--storage` or MEDIAPORT_STORAGE. Provider fields
//! come from MEDIAPORT_<FIELD> variables (MEDIAPORT_BOT_TOKEN, MEDIAPORT_BUCKET, ...).

use std::env;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{anyhow, bail, Context};
use clap::{Parser, Subcommand};
use mediaport_cli::{guess_mime_type, init_tracing};
use mediaport_core::{
    provider_config_from_env, validate_provider_config, ManagerConfig, StorageType,
    UploadableFile,
};
use mediaport_processing::FileManager;
use mediaport_storage::{FileIndexStore, Storage};
use serde::Serialize;

const DEFAULT_DATA_DIR: &str = ".mediaport";

#[derive(Parser)]
#[command(name = "mediaport", about = "Upload media to S3, OSS, COS or Telegram")]
struct Cli {
    /// Storage backend: s3, oss, cos or telegram (defaults to MEDIAPORT_STORAGE)
    #[arg(long, global = true)]
    storage: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate, compress and upload a file
    Upload {
        /// Path to the file to upload
        file: PathBuf,
        /// Mime type; guessed from the extension when omitted
        #[arg(long)]
        mime: Option<String>,
    },
    /// List stored objects, newest first
    List {
        /// Only keys starting with this prefix
        #[arg(long)]
        prefix: Option<String>,
    },
    /// Delete an object by key
    Delete {
        /// Storage key returned by upload
        key: String,
    },
    /// Check credentials and reachability without uploading
    Test,
    /// Validate the provider configuration read from the environment
    ValidateConfig,
    /// Print default settings and the naming-rule, output-format and storage catalogs
    Catalog,
}

fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    let out = serde_json::to_string_pretty(value).context("Serialize response")?;
    println!("{}", out);
    Ok(())
}

fn storage_tag(cli_value: Option<String>) -> anyhow::Result<String> {
    cli_value
        .or_else(|| env::var("MEDIAPORT_STORAGE").ok())
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| anyhow!("No storage selected. Pass --storage or set MEDIAPORT_STORAGE"))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();

    if let Commands::Catalog = cli.command {
        return print_json(&serde_json::json!({
            "defaults": FileManager::default_settings(),
            "nameRules": FileManager::name_rules(),
            "outputFormats": FileManager::output_formats(),
            "storages": FileManager::supported_storages(),
        }));
    }

    let tag = storage_tag(cli.storage)?;
    let kind: StorageType = tag.parse()?;
    let provider = provider_config_from_env(kind);

    if let Commands::ValidateConfig = cli.command {
        let validation = validate_provider_config(&tag, &provider);
        print_json(&validation)?;
        if !validation.is_valid {
            bail!(validation.message);
        }
        return Ok(());
    }

    let settings = ManagerConfig::from_env().context("Invalid MEDIAPORT_* settings")?;
    let data_dir = env::var("MEDIAPORT_DATA_DIR").unwrap_or_else(|_| DEFAULT_DATA_DIR.to_string());
    let manager = FileManager::new(settings, Arc::new(FileIndexStore::new(data_dir)))?;
    let storage = manager
        .create_storage(&tag, &provider)
        .map_err(|e| anyhow!(e.user_message()))?;

    match cli.command {
        Commands::Upload { file, mime } => {
            let data = tokio::fs::read(&file)
                .await
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let name = file
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .ok_or_else(|| anyhow!("Not a file path: {}", file.display()))?;
            let mime_type = mime.unwrap_or_else(|| guess_mime_type(&file).to_string());

            let result = manager
                .upload_file(&storage, UploadableFile::new(name, mime_type, data))
                .await
                .map_err(|e| anyhow!(e.user_message()))?;
            print_json(&result)?;
        }
        Commands::List { prefix } => {
            let objects = storage
                .list_objects(prefix.as_deref())
                .await
                .map_err(|e| anyhow!(e.user_message()))?;
            print_json(&objects)?;
        }
        Commands::Delete { key } => {
            storage
                .delete(&key)
                .await
                .map_err(|e| anyhow!(e.user_message()))?;
            print_json(&serde_json::json!({ "success": true, "key": key }))?;
        }
        Commands::Test => {
            let status = storage.test_connection().await;
            print_json(&status)?;
            if !status.ok {
                bail!(status.message);
            }
        }
        Commands::ValidateConfig | Commands::Catalog => {}
    }

    Ok(())
}
