//! Configuration Types
//!
//! 定义所有配置结构体

use serde::Deserialize;
use std::path::PathBuf;

/// 应用主配置
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// 存储配置
    #[serde(default)]
    pub storage: StorageConfig,

    /// 构建配置
    #[serde(default)]
    pub build: BuildConfig,

    /// 日志配置
    #[serde(default)]
    pub log: LogConfig,
}

/// 存储配置
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// 翻译管线 JSON 所在目录（书目中的 source 相对于此目录）
    #[serde(default = "default_source_dir")]
    pub source_dir: PathBuf,

    /// 章节产物输出目录
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// 书目文件路径
    #[serde(default = "default_catalog_path")]
    pub catalog_path: PathBuf,
}

fn default_source_dir() -> PathBuf {
    PathBuf::from("data/sources")
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("data/books")
}

fn default_catalog_path() -> PathBuf {
    PathBuf::from("books.toml")
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            source_dir: default_source_dir(),
            output_dir: default_output_dir(),
            catalog_path: default_catalog_path(),
        }
    }
}

/// 构建配置
#[derive(Debug, Clone, Deserialize)]
pub struct BuildConfig {
    /// 同时构建的书籍数量上限
    #[serde(default = "default_max_concurrent")]
    pub max_concurrent: usize,

    /// 产物 JSON 是否格式化输出
    #[serde(default)]
    pub pretty_json: bool,

    /// 严格模式：存在任何诊断信息时以失败退出
    #[serde(default)]
    pub strict: bool,
}

fn default_max_concurrent() -> usize {
    4
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            max_concurrent: default_max_concurrent(),
            pretty_json: false,
            strict: false,
        }
    }
}

/// 日志配置
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// 日志级别
    #[serde(default = "default_log_level")]
    pub level: String,

    /// 是否启用 JSON 格式
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}
