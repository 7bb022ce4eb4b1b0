// ⚙️ Configuration - JSON file, every field defaulted
//
// {
//   "locale": "czech",
//   "comment_marker": "!",
//   "registry_files": ["data/20220930_OB_554782_ADR.csv"],
//   "registry_encoding": "windows-1250",
//   "server": { "bind": "0.0.0.0:3000" }
// }

use crate::grammar::Locale;
use crate::ingest::SourceEncoding;
use anyhow::{Context as AnyhowContext, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Language of the validity lines
    pub locale: Locale,

    /// Lines starting with this character are comments / area markers
    pub comment_marker: char,

    /// Address-point exports loaded into the registry at startup
    pub registry_files: Vec<PathBuf>,

    pub registry_encoding: SourceEncoding,

    pub server: ServerConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            locale: Locale::English,
            comment_marker: '!',
            registry_files: Vec::new(),
            registry_encoding: SourceEncoding::Windows1250,
            server: ServerConfig::default(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            bind: "0.0.0.0:3000".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;

        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self> {
        serde_json::from_str(content).context("Failed to parse config JSON")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.locale, Locale::English);
        assert_eq!(config.comment_marker, '!');
        assert!(config.registry_files.is_empty());
        assert_eq!(config.registry_encoding, SourceEncoding::Windows1250);
        assert_eq!(config.server.bind, "0.0.0.0:3000");
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = AppConfig::from_json(r#"{ "locale": "czech", "server": {} }"#).unwrap();
        assert_eq!(config.locale, Locale::Czech);
        assert_eq!(config.comment_marker, '!');
        assert_eq!(config.server.bind, "0.0.0.0:3000");
    }

    #[test]
    fn test_full_json() {
        let config = AppConfig::from_json(
            r##"{
                "locale": "english",
                "comment_marker": "#",
                "registry_files": ["a.csv", "b.csv"],
                "registry_encoding": "utf-8",
                "server": { "bind": "127.0.0.1:8080" }
            }"##,
        )
        .unwrap();
        assert_eq!(config.comment_marker, '#');
        assert_eq!(config.registry_files, vec![PathBuf::from("a.csv"), PathBuf::from("b.csv")]);
        assert_eq!(config.registry_encoding, SourceEncoding::Utf8);
        assert_eq!(config.server.bind, "127.0.0.1:8080");
    }

    #[test]
    fn test_invalid_json() {
        let err = AppConfig::from_json("{ locale: ").unwrap_err();
        assert!(err.to_string().contains("Failed to parse config JSON"));
    }

    #[test]
    fn test_missing_file() {
        assert!(AppConfig::from_file("/nonexistent/address-validity.json").is_err());
    }
}
