use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::warn;

use crate::error::ConfigError;
use crate::models::{BackoffStrategy, RetryPolicy};

/// 程序配置
///
/// 加载顺序：默认值 → TOML 配置文件 → 环境变量 → 命令行参数
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// 每个文件最多尝试的次数
    pub retry_limit: u32,
    /// 两次尝试之间的等待时间（毫秒）
    pub retry_backoff_ms: u64,
    /// 是否使用指数退避
    pub exponential_backoff: bool,
    /// soffice 可执行文件
    pub soffice_path: String,
    /// 输出日志文件
    pub output_log_file: Option<PathBuf>,
    /// JSON 转换报告
    pub report_file: Option<PathBuf>,
    /// 是否显示详细日志
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            retry_limit: 3,
            retry_backoff_ms: 1000,
            exponential_backoff: false,
            soffice_path: "soffice".to_string(),
            output_log_file: None,
            report_file: None,
            verbose_logging: false,
        }
    }
}

impl Config {
    /// 从默认值和环境变量加载
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env();
        config
    }

    /// 加载配置：可选 TOML 文件，再叠加环境变量
    pub fn load(config_file: Option<&Path>) -> Result<Self> {
        let mut config = match config_file {
            Some(path) => Self::from_toml_file(path)?,
            None => Self::default(),
        };
        config.apply_env();
        Ok(config)
    }

    /// 从 TOML 文件加载，缺失的字段使用默认值
    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("无法读取配置文件: {}", path.display()))?;
        let config = Self::from_toml_str(&content).map_err(|source| {
            ConfigError::TomlParseFailed {
                path: path.to_path_buf(),
                source,
            }
        })?;
        Ok(config)
    }

    fn from_toml_str(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// 用环境变量覆盖当前配置，无法解析的值只记录警告
    pub fn apply_env(&mut self) {
        self.apply_vars(|name| std::env::var(name).ok());
    }

    fn apply_vars(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(v) = parse_var(&lookup, "SHEET2PDF_RETRY_LIMIT") {
            self.retry_limit = v;
        }
        if let Some(v) = parse_var(&lookup, "SHEET2PDF_RETRY_BACKOFF_MS") {
            self.retry_backoff_ms = v;
        }
        if let Some(v) = parse_var(&lookup, "SHEET2PDF_EXPONENTIAL_BACKOFF") {
            self.exponential_backoff = v;
        }
        if let Some(v) = lookup("SHEET2PDF_SOFFICE") {
            self.soffice_path = v;
        }
        if let Some(v) = lookup("SHEET2PDF_LOG_FILE") {
            self.output_log_file = Some(PathBuf::from(v));
        }
        if let Some(v) = lookup("SHEET2PDF_REPORT_FILE") {
            self.report_file = Some(PathBuf::from(v));
        }
        if let Some(v) = parse_var(&lookup, "SHEET2PDF_VERBOSE") {
            self.verbose_logging = v;
        }
    }

    /// 根据配置构建重试策略
    pub fn retry_policy(&self) -> RetryPolicy {
        let strategy = if self.exponential_backoff {
            BackoffStrategy::Exponential
        } else {
            BackoffStrategy::Fixed
        };
        RetryPolicy::new(self.retry_limit, Duration::from_millis(self.retry_backoff_ms), strategy)
    }
}

fn parse_var<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> Option<T> {
    let raw = lookup(name)?;
    match raw.trim().parse() {
        Ok(v) => Some(v),
        Err(_) => {
            let err = ConfigError::EnvVarParseFailed {
                var_name: name.to_string(),
                value: raw,
                expected_type: std::any::type_name::<T>().to_string(),
            };
            warn!("⚠️ {}，使用原值", err);
            None
        }
    }
}
