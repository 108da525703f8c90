//! 配置
//!
//! TOML 格式，分为 `[planner]` 和 `[log]` 两节，缺省项取默认值。

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::core::error::ConfigError;

/// 支持的 EXPLAIN 输出格式
pub const EXPLAIN_FORMATS: &[&str] = &["row", "dot", "json"];

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct PlannerConfig {
    pub enable_profiling: bool,
    pub explain_format: String,
    /// 对象池初始容量
    pub object_pool_capacity: usize,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            enable_profiling: false,
            explain_format: "row".to_string(),
            object_pool_capacity: 64,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct LogConfig {
    pub level: String,
    pub dir: String,
    pub file: String,
    pub max_file_size: u64,
    pub max_files: usize,
    /// WARN 及以上同时输出到 stderr
    pub duplicate_to_stderr: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            dir: "logs".to_string(),
            file: "graphplan".to_string(),
            max_file_size: 100 * 1024 * 1024, // 100MB
            max_files: 5,
            duplicate_to_stderr: false,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    pub planner: PlannerConfig,
    pub log: LogConfig,
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !EXPLAIN_FORMATS.contains(&self.planner.explain_format.as_str()) {
            return Err(ConfigError::Invalid(format!(
                "不支持的 explain 格式: {}",
                self.planner.explain_format
            )));
        }
        if self.log.level.trim().is_empty() {
            return Err(ConfigError::Invalid("日志级别不能为空".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert!(!config.planner.enable_profiling);
        assert_eq!(config.planner.explain_format, "row");
        assert_eq!(config.log.max_files, 5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_load_save() {
        let temp_file = NamedTempFile::new().expect("Failed to create temporary file");

        let mut config = Config::default();
        config.planner.enable_profiling = true;
        config.planner.explain_format = "dot".to_string();
        config.save(temp_file.path()).expect("Failed to save config");

        let loaded = Config::load(temp_file.path()).expect("Failed to load config");
        assert_eq!(config, loaded);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let mut temp_file = NamedTempFile::new().expect("Failed to create temporary file");
        temp_file
            .write_all(b"[planner]\nenable_profiling = true\n")
            .expect("Failed to write config");

        let loaded = Config::load(temp_file.path()).expect("Failed to load config");
        assert!(loaded.planner.enable_profiling);
        assert_eq!(loaded.planner.object_pool_capacity, 64);
        assert_eq!(loaded.log, LogConfig::default());
    }

    #[test]
    fn test_invalid_format_rejected() {
        let mut temp_file = NamedTempFile::new().expect("Failed to create temporary file");
        temp_file
            .write_all(b"[planner]\nexplain_format = \"xml\"\n")
            .expect("Failed to write config");

        let err = Config::load(temp_file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_malformed_toml() {
        let mut temp_file = NamedTempFile::new().expect("Failed to create temporary file");
        temp_file
            .write_all(b"[planner\n")
            .expect("Failed to write config");

        assert!(matches!(
            Config::load(temp_file.path()),
            Err(ConfigError::Parse(_))
        ));
    }
}
