//! # sheet2pdf
//!
//! 通过外部表格程序（无头 LibreOffice）批量把 `.xls` / `.xlsx` 转换为 PDF。
//!
//! ## 架构设计
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 持有稀缺资源（引擎会话），只暴露能力
//! - `SpreadsheetEngine` - 打开 / 导出 / 关闭 / 退出
//! - `LibreOfficeEngine` - 基于 soffice 的实现
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"
//! - 输出命名、权限调整、文件名整理、事件输出、报告写入
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一个文件"的完整处理流程（带重试和取消）
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/job_runner` - 任务编排器
//! - `orchestrator/batch_processor` - 应用入口
//!
//! ## 示例
//!
//! ```no_run
//! # use sheet2pdf::{event_channel, ConversionJob, LibreOfficeConfig, LibreOfficeEngine, Orchestrator};
//! # async fn example() -> anyhow::Result<()> {
//! let engine = LibreOfficeEngine::launch(LibreOfficeConfig::default()).await?;
//! let (sink, _events) = event_channel();
//! let orchestrator = Orchestrator::new(engine, sink);
//! let cancel = orchestrator.cancel_handle();
//!
//! let job = ConversionJob::new(vec!["Budget.xls".into()], "out");
//! let handle = orchestrator.spawn(job);
//! // 任意线程都可以调用 cancel.request_cancel()
//! let report = handle.await?;
//! println!("{} / {} 成功", report.succeeded(), report.total());
//! # let _ = cancel;
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod infrastructure;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use config::Config;
pub use error::{AppError, AppResult, ConfigError, EngineError, FileError};
pub use infrastructure::{
    ExportFormat, LibreOfficeConfig, LibreOfficeEngine, SpreadsheetEngine, WorkbookHandle,
};
pub use models::{
    BackoffStrategy, CompletionStatus, ConversionJob, ConversionStatus, FileConversionResult,
    JobReport, RenameOutcome, RetryPolicy,
};
pub use orchestrator::{App, Orchestrator};
pub use services::{event_channel, ChannelSink, ConversionEvent, EventSink, EventStream};
pub use workflow::CancellationFlag;
