//! Application configuration module / 애플리케이션 설정
//!
//! Manages configuration loaded from config.json in the working directory.
//! Creates a default config file on first run. Missing fields fall back to
//! their defaults so older files keep loading.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::search::SearchMode;

/// Application configuration / 애플리케이션 설정
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Remote data/AI service / 원격 서비스
    pub remote: RemoteConfig,
    /// Local persistence / 로컬 저장소
    pub storage: StorageConfig,
    /// Search and display / 검색 및 표시
    pub search: SearchConfig,
}

/// Remote service configuration / 원격 서비스 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteConfig {
    /// Base URL the `/api/...` paths are resolved against
    pub base_url: String,
    /// Timeout for data fetch/save requests (seconds)
    pub timeout_secs: u64,
    /// Timeout for AI requests, which run much longer (seconds)
    pub ask_timeout_secs: u64,
}

/// Local storage configuration / 로컬 저장소 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding the keyword cache and dataset backup
    pub data_dir: String,
}

/// Search configuration / 검색 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Characters shown per field in the result list
    pub preview_chars: usize,
    /// Entries of the current view sent to the AI service
    pub context_limit: usize,
    /// Recent keywords kept
    pub recent_capacity: usize,
    /// Initial mode, e.g. `question_or`
    pub default_mode: String,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8009".to_string(),
            timeout_secs: 30,
            ask_timeout_secs: 300,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: "data".to_string(),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            preview_chars: 100,
            context_limit: crate::remote::CONTEXT_LIMIT,
            recent_capacity: crate::keywords::DEFAULT_CAPACITY,
            default_mode: "question_or".to_string(),
        }
    }
}

impl AppConfig {
    /// Get the local data directory path / 데이터 디렉터리 경로
    pub fn get_data_dir(&self) -> PathBuf {
        PathBuf::from(&self.storage.data_dir)
    }

    /// Parsed initial search mode
    pub fn search_mode(&self) -> SearchMode {
        SearchMode::parse(&self.search.default_mode)
    }
}

/// Get the config file path / 설정 파일 경로
fn get_config_path() -> PathBuf {
    std::env::current_dir()
        .unwrap_or_else(|_| PathBuf::from("."))
        .join("config.json")
}

/// Load configuration from ./config.json, or create default if not exists
pub fn load_config() -> Result<AppConfig, String> {
    load_config_from(&get_config_path())
}

/// Load configuration from a specific file / 설정 파일 로드
pub fn load_config_from(config_path: &Path) -> Result<AppConfig, String> {
    if config_path.exists() {
        let content = std::fs::read_to_string(config_path)
            .map_err(|e| format!("Failed to read config file: {}", e))?;

        let config: AppConfig = serde_json::from_str(&content)
            .map_err(|e| format!("Failed to parse config file: {}", e))?;

        tracing::info!("Loaded configuration from {:?}", config_path);
        Ok(config)
    } else {
        let config = AppConfig::default();
        save_config_to(&config, config_path)?;
        tracing::info!("Created default configuration at {:?}", config_path);
        Ok(config)
    }
}

/// Save configuration to file / 설정 저장
pub fn save_config_to(config: &AppConfig, config_path: &Path) -> Result<(), String> {
    let content = serde_json::to_string_pretty(config)
        .map_err(|e| format!("Failed to serialize config: {}", e))?;

    std::fs::write(config_path, content)
        .map_err(|e| format!("Failed to write config file: {}", e))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::{Combinator, Field};
    use tempfile::TempDir;

    #[test]
    fn test_creates_default_on_first_run() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");

        let config = load_config_from(&path).unwrap();
        assert!(path.exists());
        assert_eq!(config.remote.base_url, "http://localhost:8009");
        assert_eq!(config.search.preview_chars, 100);
        assert_eq!(config.search.context_limit, 50);
        assert_eq!(config.search.recent_capacity, 10);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(
            &path,
            r#"{"remote": {"base_url": "http://10.0.0.5:8009"}, "search": {"default_mode": "answer_and"}}"#,
        )
        .unwrap();

        let config = load_config_from(&path).unwrap();
        assert_eq!(config.remote.base_url, "http://10.0.0.5:8009");
        assert_eq!(config.remote.ask_timeout_secs, 300);
        assert_eq!(config.get_data_dir(), PathBuf::from("data"));
        assert_eq!(config.search_mode(), SearchMode::new(Field::Answer, Combinator::And));
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();
        let err = load_config_from(&path).unwrap_err();
        assert!(err.starts_with("Failed to parse config file"));
    }
}
