//! 集成测试公共工具：按文件名脚本化的假引擎

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use sheet2pdf::{
    CancellationFlag, ConversionEvent, EngineError, ExportFormat, SpreadsheetEngine,
    WorkbookHandle,
};

/// 某个文件的导出行为
#[derive(Clone)]
pub enum Behavior {
    /// 写出一个假的 PDF
    Succeed,
    /// 每次导出都失败
    AlwaysFail,
    /// 导出失败，同时请求取消（模拟用户在重试过程中点了取消）
    FailAndCancel(CancellationFlag),
}

/// 引擎调用记录
#[derive(Default)]
pub struct EngineLog {
    pub opened: Vec<PathBuf>,
    pub closed: usize,
    pub quits: usize,
}

pub struct ScriptedEngine {
    behaviors: HashMap<String, Behavior>,
    log: Arc<Mutex<EngineLog>>,
    next_id: u64,
}

impl ScriptedEngine {
    pub fn new() -> (Self, Arc<Mutex<EngineLog>>) {
        let log = Arc::new(Mutex::new(EngineLog::default()));
        (
            Self {
                behaviors: HashMap::new(),
                log: log.clone(),
                next_id: 1,
            },
            log,
        )
    }

    /// 按源文件名设置行为，未设置的文件默认成功
    pub fn with(mut self, file_name: &str, behavior: Behavior) -> Self {
        self.behaviors.insert(file_name.to_string(), behavior);
        self
    }

    fn behavior_for(&self, path: &Path) -> Behavior {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        self.behaviors.get(&name).cloned().unwrap_or(Behavior::Succeed)
    }
}

#[async_trait]
impl SpreadsheetEngine for ScriptedEngine {
    async fn open(&mut self, path: &Path) -> Result<WorkbookHandle, EngineError> {
        self.log.lock().unwrap().opened.push(path.to_path_buf());
        let id = self.next_id;
        self.next_id += 1;
        Ok(WorkbookHandle::new(id, path))
    }

    async fn export(
        &mut self,
        handle: &WorkbookHandle,
        format: ExportFormat,
        destination: &Path,
    ) -> Result<(), EngineError> {
        assert_eq!(format, ExportFormat::FixedLayout);
        match self.behavior_for(handle.source()) {
            Behavior::Succeed => {
                std::fs::write(destination, b"%PDF-1.4")?;
                Ok(())
            }
            Behavior::AlwaysFail => Err(EngineError::export_failed(handle.source(), "模拟导出失败")),
            Behavior::FailAndCancel(flag) => {
                flag.request_cancel();
                Err(EngineError::export_failed(handle.source(), "模拟导出失败"))
            }
        }
    }

    async fn close(&mut self, _handle: WorkbookHandle, save_changes: bool) -> Result<(), EngineError> {
        assert!(!save_changes, "源文件不应被保存");
        self.log.lock().unwrap().closed += 1;
        Ok(())
    }

    async fn quit(&mut self) -> Result<(), EngineError> {
        self.log.lock().unwrap().quits += 1;
        Ok(())
    }
}

/// 在临时目录中创建输入文件
pub fn touch_inputs(dir: &Path, names: &[&str]) -> Vec<PathBuf> {
    names
        .iter()
        .map(|name| {
            let path = dir.join(name);
            std::fs::write(&path, b"fake workbook").unwrap();
            path
        })
        .collect()
}

/// 取出所有进度值
pub fn progress_values(events: &[ConversionEvent]) -> Vec<u8> {
    events
        .iter()
        .filter_map(|e| match e {
            ConversionEvent::Progress(p) => Some(*p),
            _ => None,
        })
        .collect()
}

/// 取出所有日志行
pub fn log_lines(events: &[ConversionEvent]) -> Vec<String> {
    events
        .iter()
        .filter_map(|e| match e {
            ConversionEvent::Log(l) => Some(l.clone()),
            _ => None,
        })
        .collect()
}

/// 取出终止事件
pub fn completions(events: &[ConversionEvent]) -> Vec<String> {
    events
        .iter()
        .filter_map(|e| match e {
            ConversionEvent::Completed(status) => Some(status.message().to_string()),
            _ => None,
        })
        .collect()
}
