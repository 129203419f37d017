//! 配置模块
//!
//! 配置来源依次为：配置文件（或默认值）、环境变量覆盖，最后统一校验。

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// API 基础地址的环境变量
pub const ENV_API_URL: &str = "PRODUCT_API_URL";
/// 页面标题的环境变量
pub const ENV_APP_TITLE: &str = "PRODUCT_APP_TITLE";

const CONFIG_PATHS: [&str; 2] = ["config.toml", "./config/config.toml"];

/// 客户端配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 目录服务配置
    pub api: ApiConfig,
    /// 界面配置
    pub ui: UiConfig,
    /// 日志配置
    pub logging: LoggingConfig,
}

/// 目录服务配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// 服务根地址，例如 `http://localhost:8080`
    pub base_url: String,
    /// 产品资源路径
    pub resource_path: String,
    /// 请求超时时间（秒），不设置则永不超时
    pub timeout_seconds: Option<u64>,
    /// 无法识别的列表响应是否视为错误
    pub strict_list_shape: bool,
}

/// 界面配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    pub title: String,
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// 日志文件目录
    pub log_path: PathBuf,
    /// 日志文件名前缀
    pub file_prefix: String,
    /// 是否启用控制台输出
    pub console_output: bool,
    /// 日志级别 (trace, debug, info, warn, error)
    pub level: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            resource_path: "/api/products".to_string(),
            timeout_seconds: None,
            strict_list_shape: false,
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            title: "Product CRUD".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_path: PathBuf::from("./logs"),
            file_prefix: "product-crud".to_string(),
            console_output: false,
            level: "info".to_string(),
        }
    }
}

impl ApiConfig {
    /// 产品资源的完整地址：`{base_url}{resource_path}`
    pub fn endpoint(&self) -> String {
        format!(
            "{}{}",
            self.base_url.trim_end_matches('/'),
            self.resource_path
        )
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_seconds.map(Duration::from_secs)
    }
}

impl Config {
    /// 读取并解析 TOML 配置文件，缺失的字段取默认值
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(toml::from_str(&content)?)
    }

    /// 把当前配置写成 TOML 文件，必要时创建父目录；
    /// 文件已存在且未指定 `overwrite` 时拒绝写入
    pub fn write_to<P: AsRef<Path>>(&self, path: P, overwrite: bool) -> Result<(), ConfigError> {
        let path = path.as_ref();
        if path.exists() && !overwrite {
            return Err(ConfigError::AlreadyExists(path.to_path_buf()));
        }

        let content = toml::to_string_pretty(self)?;
        let io_err = |source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        fs::write(path, content).map_err(io_err)
    }

    /// 用外部提供的值覆盖 API 地址和标题（空字符串视为未提供）
    pub fn apply_overrides(&mut self, api_url: Option<String>, title: Option<String>) {
        if let Some(url) = api_url.filter(|u| !u.trim().is_empty()) {
            self.api.base_url = url.trim().to_string();
        }
        if let Some(title) = title.filter(|t| !t.trim().is_empty()) {
            self.ui.title = title;
        }
    }

    /// 读取环境变量覆盖
    pub fn apply_env(&mut self) {
        self.apply_overrides(
            std::env::var(ENV_API_URL).ok(),
            std::env::var(ENV_APP_TITLE).ok(),
        );
    }

    /// 验证配置的有效性
    pub fn validate(&self) -> Result<(), ConfigError> {
        let base = url::Url::parse(&self.api.base_url).map_err(|e| {
            ConfigError::Validation(format!("无效的 API 地址 {}: {}", self.api.base_url, e))
        })?;
        if !matches!(base.scheme(), "http" | "https") {
            return Err(ConfigError::Validation(format!(
                "API 地址必须使用 http 或 https: {}",
                self.api.base_url
            )));
        }

        if !self.api.resource_path.starts_with('/') {
            return Err(ConfigError::Validation(format!(
                "资源路径必须以 / 开头: {}",
                self.api.resource_path
            )));
        }

        if self.api.timeout_seconds == Some(0) {
            return Err(ConfigError::Validation("超时时间必须大于0".to_string()));
        }

        if self.logging.file_prefix.is_empty() {
            return Err(ConfigError::Validation("日志文件前缀不能为空".to_string()));
        }

        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            return Err(ConfigError::Validation(format!(
                "无效的日志级别: {}，有效值: {:?}",
                self.logging.level, valid_levels
            )));
        }

        Ok(())
    }
}

/// 配置错误
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("无法访问配置文件 {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("配置文件格式错误: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("无法生成配置文件: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("配置文件已存在: {}（使用 --force 覆盖）", .0.display())]
    AlreadyExists(PathBuf),
    #[error("配置无效: {0}")]
    Validation(String),
}

/// 配置的实际来源
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigSource {
    File(PathBuf),
    Defaults,
}

/// 加载配置：显式路径优先，其次是默认搜索路径，找不到则使用默认值。
/// 之后应用环境变量覆盖并校验。
pub fn load_config(explicit: Option<&Path>) -> Result<(Config, ConfigSource), ConfigError> {
    let (mut config, source) = match explicit {
        Some(path) => (
            Config::load_from_file(path)?,
            ConfigSource::File(path.to_path_buf()),
        ),
        None => match CONFIG_PATHS.iter().map(Path::new).find(|p| p.exists()) {
            Some(path) => (
                Config::load_from_file(path)?,
                ConfigSource::File(path.to_path_buf()),
            ),
            None => (Config::default(), ConfigSource::Defaults),
        },
    };

    config.apply_env();
    config.validate()?;

    Ok((config, source))
}
