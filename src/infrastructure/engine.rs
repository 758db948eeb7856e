//! 转换引擎接口 - 基础设施层
//!
//! 外部表格程序被视为一个有状态的自动化服务：
//! 打开工作簿 → 导出固定版式文档 → 不保存关闭 → 退出会话。

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::error::EngineError;

/// 导出格式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// 固定版式（PDF）
    FixedLayout,
}

/// 已打开的工作簿
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkbookHandle {
    id: u64,
    source: PathBuf,
}

impl WorkbookHandle {
    pub fn new(id: u64, source: impl Into<PathBuf>) -> Self {
        Self {
            id,
            source: source.into(),
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn source(&self) -> &Path {
        &self.source
    }
}

/// 表格转换引擎
///
/// 一个实例就是一个自动化会话：任务开始时创建，
/// 所有文件复用，任务结束时调用一次 `quit`。
#[async_trait]
pub trait SpreadsheetEngine: Send {
    /// 打开工作簿
    async fn open(&mut self, path: &Path) -> Result<WorkbookHandle, EngineError>;

    /// 把已打开的工作簿导出到 `destination`
    async fn export(
        &mut self,
        handle: &WorkbookHandle,
        format: ExportFormat,
        destination: &Path,
    ) -> Result<(), EngineError>;

    /// 关闭工作簿
    async fn close(&mut self, handle: WorkbookHandle, save_changes: bool)
        -> Result<(), EngineError>;

    /// 结束会话，释放引擎
    async fn quit(&mut self) -> Result<(), EngineError>;
}

#[async_trait]
impl<E: SpreadsheetEngine + ?Sized> SpreadsheetEngine for Box<E> {
    async fn open(&mut self, path: &Path) -> Result<WorkbookHandle, EngineError> {
        (**self).open(path).await
    }

    async fn export(
        &mut self,
        handle: &WorkbookHandle,
        format: ExportFormat,
        destination: &Path,
    ) -> Result<(), EngineError> {
        (**self).export(handle, format, destination).await
    }

    async fn close(
        &mut self,
        handle: WorkbookHandle,
        save_changes: bool,
    ) -> Result<(), EngineError> {
        (**self).close(handle, save_changes).await
    }

    async fn quit(&mut self) -> Result<(), EngineError> {
        (**self).quit().await
    }
}
