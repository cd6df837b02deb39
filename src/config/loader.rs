//! Configuration Loader
//!
//! 实现多源配置加载与合并逻辑
//!
//! 优先级（从高到低）：
//! 1. 环境变量
//! 2. 配置文件（config.toml）
//! 3. 默认值

use config::{Config, ConfigError as ConfigCrateError, Environment, File};
use std::path::Path;
use thiserror::Error;

use super::types::AppConfig;

/// 配置加载错误
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

impl From<ConfigCrateError> for ConfigError {
    fn from(err: ConfigCrateError) -> Self {
        ConfigError::LoadError(err.to_string())
    }
}

/// 配置文件搜索路径
const CONFIG_FILE_NAMES: &[&str] = &["config", "config.local"];

/// 加载应用配置
///
/// 按优先级从高到低合并配置：
/// 1. 环境变量（前缀 `BIREADER_`，层级分隔符 `__`）
/// 2. 配置文件（config.toml 或 config.local.toml）
/// 3. 默认值
///
/// # 环境变量示例
/// - `BIREADER_STORAGE__OUTPUT_DIR=/srv/books`
/// - `BIREADER_BUILD__MAX_CONCURRENT=8`
/// - `BIREADER_BUILD__STRICT=true`
/// - `BIREADER_LOG__LEVEL=debug`
pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_config_from_path(None)
}

/// 从指定路径加载配置
///
/// # 参数
/// - `config_path` - 可选的配置文件路径，如果为 None 则使用默认搜索路径
pub fn load_config_from_path(config_path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let mut builder = Config::builder();

    // 1. 默认值（最低优先级）
    builder = builder
        .set_default("storage.source_dir", "data/sources")?
        .set_default("storage.output_dir", "data/books")?
        .set_default("storage.catalog_path", "books.toml")?
        .set_default("build.max_concurrent", 4)?
        .set_default("build.pretty_json", false)?
        .set_default("build.strict", false)?
        .set_default("log.level", "info")?
        .set_default("log.json", false)?;

    // 2. 配置文件
    if let Some(path) = config_path {
        builder = builder.add_source(File::from(path).required(true));
    } else {
        for name in CONFIG_FILE_NAMES {
            builder = builder.add_source(File::with_name(name).required(false));
        }
    }

    // 3. 环境变量（最高优先级）
    // 例如: BIREADER_BUILD__MAX_CONCURRENT=8
    builder = builder.add_source(
        Environment::with_prefix("BIREADER")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true),
    );

    let config = builder.build()?;

    let app_config: AppConfig = config.try_deserialize().map_err(|e| {
        ConfigError::ParseError(format!("Failed to deserialize config: {}", e))
    })?;

    validate_config(&app_config)?;

    Ok(app_config)
}

/// 验证配置有效性
fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    if config.build.max_concurrent == 0 {
        return Err(ConfigError::ValidationError(
            "build.max_concurrent cannot be 0".to_string(),
        ));
    }

    if config.storage.output_dir.as_os_str().is_empty() {
        return Err(ConfigError::ValidationError(
            "Output directory cannot be empty".to_string(),
        ));
    }

    if config.storage.catalog_path.as_os_str().is_empty() {
        return Err(ConfigError::ValidationError(
            "Catalog path cannot be empty".to_string(),
        ));
    }

    match config.log.level.to_ascii_lowercase().as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => {}
        other => {
            return Err(ConfigError::ValidationError(format!(
                "Unknown log level: {}",
                other
            )))
        }
    }

    Ok(())
}

/// 打印配置信息（用于启动时日志）
pub fn print_config(config: &AppConfig) {
    tracing::info!("=== Application Configuration ===");
    tracing::info!("Source Directory: {:?}", config.storage.source_dir);
    tracing::info!("Output Directory: {:?}", config.storage.output_dir);
    tracing::info!("Catalog: {:?}", config.storage.catalog_path);
    tracing::info!("Max Concurrent Builds: {}", config.build.max_concurrent);
    tracing::info!("Pretty JSON: {}", config.build.pretty_json);
    tracing::info!("Strict: {}", config.build.strict);
    tracing::info!("Log Level: {}", config.log.level);
    tracing::info!("=================================");
}
