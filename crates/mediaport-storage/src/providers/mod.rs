//! Object-storage adapters.
//!
//! S3, Aliyun OSS and Tencent COS all speak the S3 protocol, so each adapter
//! is a thin layer of addressing rules over the shared object-store client.

pub mod cos;
pub mod oss;
pub mod s3;

pub use cos::{CosConfig, CosStorage};
pub use oss::{OssConfig, OssStorage};
pub use s3::{S3Config, S3Storage};

/// Join a custom public domain and a key, adding `https://` when no scheme is given.
pub(crate) fn custom_domain_base(domain: &str) -> String {
    let domain = domain.trim().trim_end_matches('/');
    if domain.starts_with("http://") || domain.starts_with("https://") {
        domain.to_string()
    } else {
        format!("https://{}", domain)
    }
}
