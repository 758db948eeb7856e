//! 基础设施层
//!
//! 持有稀缺资源（外部转换引擎会话），只暴露"打开 / 导出 / 关闭 / 退出"能力。

pub mod engine;
pub mod libreoffice;

pub use engine::{ExportFormat, SpreadsheetEngine, WorkbookHandle};
pub use libreoffice::{LibreOfficeConfig, LibreOfficeEngine};
