use std::path::PathBuf;

use thiserror::Error;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 转换引擎相关错误
    #[error("引擎错误: {0}")]
    Engine(#[from] EngineError),
    /// 文件操作错误
    #[error("文件错误: {0}")]
    File(#[from] FileError),
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
}

/// 转换引擎错误
///
/// 打开、导出、关闭工作簿时的任何失败都归入此类，
/// 编排层把它们一律视为可重试的临时错误。
#[derive(Debug, Error)]
pub enum EngineError {
    /// 启动引擎失败
    #[error("无法启动转换引擎 ({program}): {source}")]
    LaunchFailed {
        program: String,
        #[source]
        source: std::io::Error,
    },
    /// 打开工作簿失败
    #[error("无法打开工作簿 {}: {reason}", .path.display())]
    OpenFailed { path: PathBuf, reason: String },
    /// 导出 PDF 失败
    #[error("导出 PDF 失败 ({}): {reason}", .source_path.display())]
    ExportFailed { source_path: PathBuf, reason: String },
    /// 引擎进程异常退出
    #[error("引擎进程退出码异常 ({}): {status}, stderr: {stderr}", .source_path.display())]
    ProcessFailed {
        source_path: PathBuf,
        status: String,
        stderr: String,
    },
    /// 句柄未打开或已关闭
    #[error("无效的工作簿句柄: #{0}")]
    UnknownHandle(u64),
    /// 会话已经释放
    #[error("引擎会话已关闭")]
    SessionClosed,
    /// 引擎内部 I/O 错误
    #[error("引擎 I/O 错误: {0}")]
    Io(#[from] std::io::Error),
}

/// 文件操作错误
#[derive(Debug, Error)]
pub enum FileError {
    /// 路径没有可用的文件名
    #[error("无法从路径中取得文件名: {}", .path.display())]
    InvalidFileName { path: PathBuf },
    /// 重命名失败
    #[error("重命名失败 ({} -> {}): {reason}", .from.display(), .to.display())]
    RenameFailed {
        from: PathBuf,
        to: PathBuf,
        reason: String,
    },
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// TOML 解析失败
    #[error("TOML 解析失败 ({}): {source}", .path.display())]
    TomlParseFailed {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    /// 环境变量解析失败
    #[error("环境变量 {var_name} 解析失败: 值 '{value}' 无法转换为 {expected_type}")]
    EnvVarParseFailed {
        var_name: String,
        value: String,
        expected_type: String,
    },
}

// ========== 便捷构造函数 ==========

impl EngineError {
    /// 创建导出失败错误
    pub fn export_failed(source_path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        EngineError::ExportFailed {
            source_path: source_path.into(),
            reason: reason.into(),
        }
    }

    /// 创建打开失败错误
    pub fn open_failed(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        EngineError::OpenFailed {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

impl FileError {
    /// 创建重命名失败错误
    pub fn rename_failed(
        from: impl Into<PathBuf>,
        to: impl Into<PathBuf>,
        reason: impl Into<String>,
    ) -> Self {
        FileError::RenameFailed {
            from: from.into(),
            to: to.into(),
            reason: reason.into(),
        }
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_error_converts_into_app_error() {
        let err: AppError = EngineError::SessionClosed.into();
        assert!(matches!(err, AppError::Engine(EngineError::SessionClosed)));
        assert_eq!(err.to_string(), "引擎错误: 引擎会话已关闭");
    }

    #[test]
    fn test_rename_failed_message_contains_both_paths() {
        let err = FileError::rename_failed("/out/a%20b.pdf", "/out/a b.pdf", "已存在");
        let msg = err.to_string();
        assert!(msg.contains("/out/a%20b.pdf"));
        assert!(msg.contains("/out/a b.pdf"));
    }
}
