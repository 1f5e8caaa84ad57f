//! Destination path synthesis.
//!
//! Every adapter derives its object key the same way: the date-expanded
//! upload path template, a slash, and a file name chosen by the naming rule.
//! The extension of the original name is always carried over, lower-cased.

use std::sync::LazyLock;

use chrono::{DateTime, Datelike, Local, TimeZone};
use rand::Rng;
use regex::Regex;

use crate::config::{ManagerConfig, NameRule};
use crate::models::{extension_of, file_name_of};

const RANDOM_NAME_LEN: usize = 8;
const RANDOM_CHARSET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";
const FALLBACK_BASE_NAME: &str = "file";

static UNSAFE_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-zA-Z0-9\-_.]").expect("valid regex"));
static DASH_RUNS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"-{2,}").expect("valid regex"));
static SLASH_RUNS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"/{2,}").expect("valid regex"));

/// Builds destination keys from a path template and a naming rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathGenerator {
    template: String,
    name_rule: NameRule,
}

impl PathGenerator {
    pub fn new(template: impl Into<String>, name_rule: NameRule) -> Self {
        Self {
            template: template.into(),
            name_rule,
        }
    }

    pub fn from_config(config: &ManagerConfig) -> Self {
        Self::new(config.upload_path_template.clone(), config.name_rule)
    }

    pub fn name_rule(&self) -> NameRule {
        self.name_rule
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    /// Destination key for `filename` using the current local date.
    pub fn generate_path(&self, filename: &str) -> String {
        self.generate_path_at(filename, Local::now())
    }

    /// Destination key for `filename` as if uploaded at `now`.
    pub fn generate_path_at<Tz: TimeZone>(&self, filename: &str, now: DateTime<Tz>) -> String {
        let dir = self.expand_template(&now);
        let name = self.file_name_at(filename, now.timestamp_millis());
        normalize_path(&format!("{}/{}", dir, name))
    }

    fn expand_template<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> String {
        self.template
            .replace("{year}", &now.year().to_string())
            .replace("{month}", &format!("{:02}", now.month()))
            .replace("{day}", &format!("{:02}", now.day()))
    }

    fn file_name_at(&self, filename: &str, epoch_millis: i64) -> String {
        let base = match self.name_rule {
            NameRule::Timestamp => epoch_millis.to_string(),
            NameRule::Random => random_token(),
            NameRule::Original => sanitize_base_name(base_name(filename)),
        };

        match extension_of(filename) {
            Some(ext) => format!("{}.{}", base, ext),
            None => base,
        }
    }
}

/// The name without its final `.extension`.
fn base_name(filename: &str) -> &str {
    // Drop any directory part a client may have sent
    let filename = file_name_of(filename);
    filename
        .rsplit_once('.')
        .map(|(base, _)| base)
        .unwrap_or(filename)
}

/// Replace characters outside `[a-zA-Z0-9-_.]` with `-`, collapse runs of `-`
/// and trim `-` from both ends.
pub fn sanitize_base_name(base: &str) -> String {
    let replaced = UNSAFE_CHARS.replace_all(base, "-");
    let collapsed = DASH_RUNS.replace_all(&replaced, "-");
    let trimmed = collapsed.trim_matches('-');
    if trimmed.is_empty() {
        FALLBACK_BASE_NAME.to_string()
    } else {
        trimmed.to_string()
    }
}

fn random_token() -> String {
    let mut rng = rand::rng();
    (0..RANDOM_NAME_LEN)
        .map(|_| RANDOM_CHARSET[rng.random_range(0..RANDOM_CHARSET.len())] as char)
        .collect()
}

/// Collapse repeated `/` and strip leading and trailing separators.
pub fn normalize_path(path: &str) -> String {
    SLASH_RUNS
        .replace_all(path, "/")
        .trim_matches('/')
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 9, 30, 0).unwrap()
    }

    #[test]
    fn test_template_expansion_zero_pads() {
        let generator = PathGenerator::new("{year}/{month}/{day}", NameRule::Original);
        let path = generator.generate_path_at("cat.png", at(2024, 3, 5));
        assert_eq!(path, "2024/03/05/cat.png");
    }

    #[test]
    fn test_original_name_is_sanitized() {
        let generator = PathGenerator::new("{year}/{month}/{day}", NameRule::Original);
        let path = generator.generate_path_at("My Photo!!.PNG", at(2024, 3, 5));
        assert_eq!(path, "2024/03/05/My-Photo.png");
    }

    #[test]
    fn test_original_rule_is_deterministic() {
        let generator = PathGenerator::new("uploads/{year}", NameRule::Original);
        let first = generator.generate_path_at("résumé final.PDF", at(2024, 1, 2));
        let second = generator.generate_path_at("résumé final.PDF", at(2024, 1, 2));
        assert_eq!(first, second);
        assert!(first.ends_with(".pdf"));
    }

    #[test]
    fn test_original_rule_keys_can_collide() {
        // Distinct uploads that sanitize to the same name share a key; no dedup happens.
        let generator = PathGenerator::new("{year}/{month}/{day}", NameRule::Original);
        let a = generator.generate_path_at("my photo.png", at(2024, 3, 5));
        let b = generator.generate_path_at("my?photo.PNG", at(2024, 3, 5));
        assert_eq!(a, b);
    }

    #[test]
    fn test_timestamp_rule_uses_epoch_millis() {
        let generator = PathGenerator::new("", NameRule::Timestamp);
        let now = at(2024, 3, 5);
        let path = generator.generate_path_at("clip.MP4", now);
        assert_eq!(path, format!("{}.mp4", now.timestamp_millis()));
    }

    #[test]
    fn test_random_rule_token_shape() {
        let generator = PathGenerator::new("r", NameRule::Random);
        let path = generator.generate_path_at("a.gif", at(2024, 3, 5));
        let name = path.strip_prefix("r/").unwrap();
        let (base, ext) = name.split_once('.').unwrap();
        assert_eq!(ext, "gif");
        assert_eq!(base.len(), 8);
        assert!(base
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit()));
    }

    #[test]
    fn test_path_is_normalized() {
        let generator = PathGenerator::new("//media//{year}/", NameRule::Original);
        let path = generator.generate_path_at("a.txt", at(2024, 3, 5));
        assert_eq!(path, "media/2024/a.txt");
    }

    #[test]
    fn test_name_without_extension() {
        let generator = PathGenerator::new("{year}", NameRule::Original);
        assert_eq!(generator.generate_path_at("LICENSE", at(2024, 3, 5)), "2024/LICENSE");
    }

    #[test]
    fn test_sanitize_falls_back_when_empty() {
        assert_eq!(sanitize_base_name("!!!"), "file");
        assert_eq!(sanitize_base_name("--a--b--"), "a-b");
        assert_eq!(sanitize_base_name("keep_this.too"), "keep_this.too");
    }

    #[test]
    fn test_base_name_drops_directories() {
        assert_eq!(base_name("dir/sub/pic.jpg"), "pic");
        assert_eq!(base_name("C:\\Users\\me\\pic.jpg"), "pic");
    }

    #[test]
    fn test_dotted_directory_is_not_an_extension() {
        let generator = PathGenerator::new("{year}", NameRule::Original);
        assert_eq!(generator.generate_path_at("photos.v2/IMG", at(2024, 3, 5)), "2024/IMG");
        assert_eq!(generator.generate_path_at("C:\\dir.v2\\pic", at(2024, 3, 5)), "2024/pic");
        assert_eq!(
            generator.generate_path_at("photos.v2/IMG.JPG", at(2024, 3, 5)),
            "2024/IMG.jpg"
        );
    }

    #[test]
    fn test_normalize_path() {
        assert_eq!(normalize_path("/a//b///c/"), "a/b/c");
        assert_eq!(normalize_path("a"), "a");
    }
}
