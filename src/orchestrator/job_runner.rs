//! 任务编排器 - 编排层
//!
//! ## 职责
//!
//! 1. **独占引擎会话**：任务开始时持有，所有文件复用，结束时只释放一次
//! 2. **顺序处理**：按输入顺序逐个委托 `FileFlow`
//! 3. **协作式取消**：开始每个文件前检查取消标志
//! 4. **进度汇报**：单调不减，结束时强制 100
//! 5. **文件名整理**：无论完成还是取消，都对已生成的 PDF 执行
//! 6. **终止事件**：每个任务恰好一次

use std::path::PathBuf;

use tokio::task::JoinHandle;

use crate::infrastructure::SpreadsheetEngine;
use crate::models::{
    CompletionStatus, ConversionJob, ConversionStatus, FileConversionResult, JobReport,
};
use crate::services::{derive_output_path, finalize_outputs, log_info, log_warn, EventSink};
use crate::workflow::{CancellationFlag, FileFlow, ProgressTracker};

/// 转换任务编排器
pub struct Orchestrator<E> {
    engine: E,
    sink: Box<dyn EventSink>,
    cancel: CancellationFlag,
}

impl<E: SpreadsheetEngine> Orchestrator<E> {
    /// 创建编排器，接管引擎会话
    pub fn new(engine: E, sink: impl EventSink + 'static) -> Self {
        Self::with_cancel_flag(engine, sink, CancellationFlag::new())
    }

    /// 使用调用方提供的取消标志
    pub fn with_cancel_flag(
        engine: E,
        sink: impl EventSink + 'static,
        cancel: CancellationFlag,
    ) -> Self {
        Self {
            engine,
            sink: Box::new(sink),
            cancel,
        }
    }

    /// 取消句柄，可以交给任意线程 / 任务
    pub fn cancel_handle(&self) -> CancellationFlag {
        self.cancel.clone()
    }

    /// 请求取消
    pub fn request_cancel(&self) {
        self.cancel.request_cancel();
    }

    /// 执行任务，返回每个文件的结果
    pub async fn run(mut self, job: ConversionJob) -> JobReport {
        let total = job.total_files();
        let sink = self.sink.as_ref();

        log_info(
            sink,
            format!(
                "🚀 开始转换 {} 个文件 -> {} (每个文件最多尝试 {} 次)",
                total,
                job.output_dir().display(),
                job.retry_limit()
            ),
        );

        let flow = FileFlow::new(*job.retry_policy(), &self.cancel, sink);
        let mut progress = ProgressTracker::new(total);
        let mut results: Vec<FileConversionResult> = Vec::with_capacity(total);
        let mut outputs: Vec<PathBuf> = Vec::new();

        for (idx, source) in job.files().iter().enumerate() {
            if self.cancel.is_cancelled() {
                let remaining = &job.files()[idx..];
                log_info(
                    sink,
                    format!("🛑 转换已取消，剩余 {} 个文件未处理", remaining.len()),
                );
                results.extend(remaining.iter().map(|f| FileConversionResult {
                    source: f.clone(),
                    output: derive_output_path(f, job.output_dir()).ok(),
                    status: ConversionStatus::SkippedCancelled,
                    attempts: 0,
                    last_error: None,
                }));
                break;
            }

            let result = flow
                .run(&mut self.engine, source, job.output_dir(), idx + 1, total)
                .await;

            if result.succeeded() {
                if let Some(output) = &result.output {
                    outputs.push(output.clone());
                }
            }
            results.push(result);

            if !self.cancel.is_cancelled() {
                sink.on_progress(progress.advance());
            }
        }

        // 引擎会话在所有退出路径上只释放一次
        match self.engine.quit().await {
            Ok(()) => tracing::debug!("引擎会话已释放"),
            Err(e) => log_warn(sink, format!("⚠️ 关闭引擎会话失败: {}", e)),
        }

        let renames = finalize_outputs(&outputs, sink).await;

        let status = if self.cancel.is_cancelled() {
            CompletionStatus::Cancelled
        } else {
            CompletionStatus::AllProcessed
        };

        log_info(sink, format!("🏁 {}", status));
        sink.on_progress(progress.complete());
        sink.on_complete(status);

        JobReport {
            status,
            results,
            renames,
        }
    }
}

impl<E: SpreadsheetEngine + 'static> Orchestrator<E> {
    /// 在后台任务中执行，展示层保持响应
    pub fn spawn(self, job: ConversionJob) -> JoinHandle<JobReport> {
        tokio::spawn(self.run(job))
    }
}
