//! 单文件转换流程 - 流程层
//!
//! 核心职责：定义"一个文件"的完整处理流程
//!
//! 流程顺序：
//! 1. 推导输出路径
//! 2. 尽力解除源文件只读
//! 3. 打开 → 导出 → 不保存关闭，失败后等待并重试
//! 4. 重试用尽后记录失败

use std::path::Path;

use tokio::time::sleep;
use tracing::debug;

use crate::error::EngineError;
use crate::infrastructure::{ExportFormat, SpreadsheetEngine};
use crate::models::{ConversionStatus, FileConversionResult, RetryPolicy};
use crate::services::{derive_output_path, ensure_writable, log_info, log_warn, EventSink};
use crate::workflow::cancellation::CancellationFlag;

/// 单文件转换流程
///
/// - 不持有引擎，由编排层借入
/// - 只处理单个文件
/// - 在每次尝试前检查取消标志
pub struct FileFlow<'a> {
    retry: RetryPolicy,
    cancel: &'a CancellationFlag,
    sink: &'a dyn EventSink,
}

impl<'a> FileFlow<'a> {
    pub fn new(retry: RetryPolicy, cancel: &'a CancellationFlag, sink: &'a dyn EventSink) -> Self {
        Self {
            retry,
            cancel,
            sink,
        }
    }

    /// 转换一个文件
    ///
    /// `index` 从 1 开始，仅用于日志。
    pub async fn run<E: SpreadsheetEngine + ?Sized>(
        &self,
        engine: &mut E,
        source: &Path,
        output_dir: &Path,
        index: usize,
        total: usize,
    ) -> FileConversionResult {
        log_info(
            self.sink,
            format!("[{}/{}] 📄 开始转换: {}", index, total, source.display()),
        );

        let output = match derive_output_path(source, output_dir) {
            Ok(path) => path,
            Err(e) => {
                log_warn(self.sink, format!("[{}/{}] ❌ {}", index, total, e));
                return FileConversionResult {
                    source: source.to_path_buf(),
                    output: None,
                    status: ConversionStatus::Failed,
                    attempts: 0,
                    last_error: Some(e.to_string()),
                };
            }
        };

        match ensure_writable(source).await {
            Ok(true) => debug!("已解除只读: {}", source.display()),
            Ok(false) => {}
            Err(e) => log_warn(
                self.sink,
                format!("[{}/{}] ⚠️ 无法修改文件权限 {}: {}", index, total, source.display(), e),
            ),
        }

        let limit = self.retry.limit();
        let mut attempts = 0;
        let mut last_error = None;

        while attempts < limit {
            if self.cancel.is_cancelled() {
                log_info(
                    self.sink,
                    format!("[{}/{}] 🛑 已取消，停止重试: {}", index, total, source.display()),
                );
                return FileConversionResult {
                    source: source.to_path_buf(),
                    output: Some(output),
                    status: ConversionStatus::SkippedCancelled,
                    attempts,
                    last_error,
                };
            }

            attempts += 1;
            match convert_once(engine, source, &output).await {
                Ok(()) => {
                    log_info(
                        self.sink,
                        format!("[{}/{}] ✓ 已生成: {}", index, total, output.display()),
                    );
                    return FileConversionResult {
                        source: source.to_path_buf(),
                        output: Some(output),
                        status: ConversionStatus::Succeeded,
                        attempts,
                        last_error: None,
                    };
                }
                Err(e) => {
                    log_warn(
                        self.sink,
                        format!(
                            "[{}/{}] 第 {}/{} 次尝试失败 {}: {}",
                            index,
                            total,
                            attempts,
                            limit,
                            source.display(),
                            e
                        ),
                    );
                    last_error = Some(e.to_string());
                    // 已取消时不再等待，下一轮开头直接退出
                    if attempts < limit && !self.cancel.is_cancelled() {
                        sleep(self.retry.delay_after(attempts)).await;
                    }
                }
            }
        }

        // 最后一次尝试期间收到取消：不计为失败
        let status = if self.cancel.is_cancelled() {
            ConversionStatus::SkippedCancelled
        } else {
            log_warn(
                self.sink,
                format!(
                    "[{}/{}] ❌ 转换失败，已尝试 {} 次: {}",
                    index,
                    total,
                    attempts,
                    source.display()
                ),
            );
            ConversionStatus::Failed
        };

        FileConversionResult {
            source: source.to_path_buf(),
            output: Some(output),
            status,
            attempts,
            last_error,
        }
    }
}

/// 一次完整的打开 → 导出 → 关闭
///
/// 导出失败时仍然关闭工作簿，关闭错误只记录。
async fn convert_once<E: SpreadsheetEngine + ?Sized>(
    engine: &mut E,
    source: &Path,
    output: &Path,
) -> Result<(), EngineError> {
    let handle = engine.open(source).await?;

    if let Err(e) = engine
        .export(&handle, ExportFormat::FixedLayout, output)
        .await
    {
        if let Err(close_err) = engine.close(handle, false).await {
            debug!("导出失败后关闭工作簿出错: {}", close_err);
        }
        return Err(e);
    }

    engine.close(handle, false).await
}
