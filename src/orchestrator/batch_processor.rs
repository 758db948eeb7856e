//! 批量转换应用 - 编排层
//!
//! ## 职责
//!
//! 本模块是整个应用的入口，负责资源管理和展示。
//!
//! ## 核心功能
//!
//! 1. **应用初始化**：启动日志、启动 LibreOffice 引擎会话
//! 2. **后台执行**：把任务交给 `Orchestrator` 在后台任务中运行
//! 3. **事件展示**：消费进度和终止事件
//! 4. **取消**：Ctrl-C 转换为取消请求
//! 5. **全局统计**：输出统计信息，按需写入 JSON 报告

use std::path::PathBuf;

use anyhow::{Context, Result};
use futures::StreamExt;
use tracing::{info, warn};

use crate::config::Config;
use crate::infrastructure::{LibreOfficeConfig, LibreOfficeEngine, SpreadsheetEngine};
use crate::models::{ConversionJob, JobReport};
use crate::orchestrator::job_runner::Orchestrator;
use crate::services::{event_channel, ConversionEvent, EventStream, ReportWriter};
use crate::utils::logging::{log_startup, print_final_stats};
use crate::workflow::CancellationFlag;

/// 应用主结构
pub struct App<E = LibreOfficeEngine> {
    config: Config,
    engine: E,
}

impl App<LibreOfficeEngine> {
    /// 初始化应用
    pub async fn initialize(config: Config) -> Result<Self> {
        log_startup(&config);

        // 启动引擎会话
        let engine = LibreOfficeEngine::launch(LibreOfficeConfig {
            soffice_path: PathBuf::from(&config.soffice_path),
        })
        .await
        .context("无法启动 LibreOffice，请确认已安装或通过 --soffice 指定路径")?;

        Ok(Self { config, engine })
    }
}

impl<E: SpreadsheetEngine + 'static> App<E> {
    /// 使用已有引擎创建应用
    pub fn with_engine(config: Config, engine: E) -> Self {
        Self { config, engine }
    }

    /// 运行任务直到结束或取消
    pub async fn run(self, job: ConversionJob) -> Result<JobReport> {
        if job.files().is_empty() {
            warn!("⚠️ 没有找到待转换的表格文件");
        }

        tokio::fs::create_dir_all(job.output_dir())
            .await
            .with_context(|| format!("无法创建输出目录: {}", job.output_dir().display()))?;

        let (sink, events) = event_channel();
        let orchestrator = Orchestrator::new(self.engine, sink);
        let cancel = orchestrator.cancel_handle();
        let handle = orchestrator.spawn(job);

        pump_events(events, cancel).await;

        let report = handle.await.context("转换任务异常退出")?;

        if let Some(path) = &self.config.report_file {
            let writer = ReportWriter::with_path(path);
            writer.write(&report).await?;
            info!("📝 报告已写入: {}", writer.path().display());
        }

        print_final_stats(&report, self.config.output_log_file.as_deref());

        Ok(report)
    }
}

/// 消费事件流，直到后台任务结束
///
/// 日志行已经由核心写入 tracing，这里只展示进度和终止状态。
async fn pump_events(mut events: EventStream, cancel: CancellationFlag) {
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);
    let mut cancel_requested = false;

    loop {
        tokio::select! {
            event = events.next() => match event {
                Some(ConversionEvent::Progress(percent)) => log_progress(percent),
                Some(ConversionEvent::Completed(status)) => info!("📣 {}", status),
                Some(ConversionEvent::Log(_)) => {}
                None => break,
            },
            signal = &mut ctrl_c, if !cancel_requested => {
                cancel_requested = true;
                match signal {
                    Ok(()) => {
                        warn!("🛑 收到 Ctrl-C，当前文件完成后停止...");
                        cancel.request_cancel();
                    }
                    Err(e) => warn!("无法监听 Ctrl-C: {}", e),
                }
            }
        }
    }
}

fn log_progress(percent: u8) {
    let filled = usize::from(percent) / 5;
    info!(
        "📊 进度: [{}{}] {}%",
        "█".repeat(filled),
        "░".repeat(20 - filled),
        percent
    );
}
