//! 编排层（Orchestration Layer）
//!
//! ## 模块划分
//!
//! ### `job_runner` - 任务编排器
//! - 独占引擎会话，按顺序处理每个文件
//! - 检查取消标志，汇报进度
//! - 结束时释放引擎、整理文件名、发出终止事件
//!
//! ### `batch_processor` - 应用入口
//! - 初始化日志和引擎
//! - 在后台运行编排器，消费事件
//! - 输出统计信息和报告
//!
//! ## 层次关系
//!
//! ```text
//! batch_processor (App，展示 + 资源初始化)
//!     ↓
//! job_runner (处理 Vec<文件>)
//!     ↓
//! workflow::FileFlow (处理单个文件)
//!     ↓
//! services (能力层：命名 / 权限 / 文件名整理 / 事件)
//!     ↓
//! infrastructure (基础设施：SpreadsheetEngine)
//! ```

pub mod batch_processor;
pub mod job_runner;

pub use batch_processor::App;
pub use job_runner::Orchestrator;
