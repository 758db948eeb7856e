use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use tempfile::TempDir;
use tokio::fs;
use tokio::process::Command;
use tracing::{debug, error, info, warn};

use crate::error::EngineError;
use crate::infrastructure::engine::{ExportFormat, SpreadsheetEngine, WorkbookHandle};

/// LibreOffice 引擎配置
#[derive(Debug, Clone)]
pub struct LibreOfficeConfig {
    /// soffice 可执行文件
    pub soffice_path: PathBuf,
}

impl Default for LibreOfficeConfig {
    fn default() -> Self {
        Self {
            soffice_path: PathBuf::from("soffice"),
        }
    }
}

/// 无头 LibreOffice 转换引擎
///
/// 每个实例使用独立的用户配置目录，避免和桌面上正在运行的
/// LibreOffice 抢同一个 profile 锁。配置目录在 `quit` 时删除。
pub struct LibreOfficeEngine {
    config: LibreOfficeConfig,
    profile: Option<TempDir>,
    open_handles: HashMap<u64, PathBuf>,
    next_id: u64,
}

impl LibreOfficeEngine {
    /// 启动引擎会话
    pub async fn launch(config: LibreOfficeConfig) -> Result<Self, EngineError> {
        info!("🚀 启动无头 LibreOffice 引擎...");
        debug!("soffice: {}", config.soffice_path.display());

        let output = Command::new(&config.soffice_path)
            .arg("--version")
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|source| {
                error!("启动 soffice 失败: {}", source);
                EngineError::LaunchFailed {
                    program: config.soffice_path.display().to_string(),
                    source,
                }
            })?;
        debug!(
            "soffice 版本: {}",
            String::from_utf8_lossy(&output.stdout).trim()
        );

        let profile = tempfile::Builder::new()
            .prefix("sheet2pdf-profile-")
            .tempdir()?;
        fs::create_dir_all(profile.path().join("staging")).await?;

        info!("✅ 引擎会话已就绪，配置目录: {}", profile.path().display());

        Ok(Self {
            config,
            profile: Some(profile),
            open_handles: HashMap::new(),
            next_id: 1,
        })
    }

    fn profile_dir(&self) -> Result<&Path, EngineError> {
        self.profile
            .as_ref()
            .map(TempDir::path)
            .ok_or(EngineError::SessionClosed)
    }

    fn open_source(&self, handle: &WorkbookHandle) -> Result<&Path, EngineError> {
        self.open_handles
            .get(&handle.id())
            .map(PathBuf::as_path)
            .ok_or(EngineError::UnknownHandle(handle.id()))
    }

    async fn run_convert(&self, source: &Path, staging: &Path) -> Result<PathBuf, EngineError> {
        let profile_url = file_url(self.profile_dir()?);

        let output = Command::new(&self.config.soffice_path)
            .arg(format!("-env:UserInstallation={}", profile_url))
            .args(["--headless", "--norestore", "--convert-to", "pdf", "--outdir"])
            .arg(staging)
            .arg(source)
            .stdin(Stdio::null())
            .output()
            .await?;

        if !output.status.success() {
            return Err(EngineError::ProcessFailed {
                source_path: source.to_path_buf(),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        // soffice 只替换最后一个扩展名：archive.2024.xlsx -> archive.2024.pdf
        let stem = source
            .file_stem()
            .ok_or_else(|| EngineError::export_failed(source, "源文件没有文件名"))?;
        let mut staged_name = stem.to_os_string();
        staged_name.push(".pdf");
        let staged = staging.join(staged_name);

        if !fs::try_exists(&staged).await? {
            return Err(EngineError::export_failed(
                source,
                format!("未生成输出文件 {}", staged.display()),
            ));
        }

        Ok(staged)
    }
}

#[async_trait]
impl SpreadsheetEngine for LibreOfficeEngine {
    async fn open(&mut self, path: &Path) -> Result<WorkbookHandle, EngineError> {
        self.profile_dir()?;

        let metadata = fs::metadata(path)
            .await
            .map_err(|e| EngineError::open_failed(path, e.to_string()))?;
        if !metadata.is_file() {
            return Err(EngineError::open_failed(path, "不是普通文件"));
        }

        let id = self.next_id;
        self.next_id += 1;
        self.open_handles.insert(id, path.to_path_buf());
        debug!("打开工作簿 #{}: {}", id, path.display());

        Ok(WorkbookHandle::new(id, path))
    }

    async fn export(
        &mut self,
        handle: &WorkbookHandle,
        format: ExportFormat,
        destination: &Path,
    ) -> Result<(), EngineError> {
        let source = self.open_source(handle)?.to_path_buf();
        debug!(
            "导出工作簿 #{} ({:?}) -> {}",
            handle.id(),
            format,
            destination.display()
        );

        // 每次导出使用独立的暂存目录，soffice 按源文件名命名输出
        let staging = self.profile_dir()?.join("staging").join(handle.id().to_string());
        fs::create_dir_all(&staging).await?;

        let result = match self.run_convert(&source, &staging).await {
            Ok(staged) => move_file(&staged, destination).await,
            Err(e) => Err(e),
        };

        if let Err(e) = fs::remove_dir_all(&staging).await {
            debug!("清理暂存目录失败 {}: {}", staging.display(), e);
        }

        result
    }

    async fn close(
        &mut self,
        handle: WorkbookHandle,
        save_changes: bool,
    ) -> Result<(), EngineError> {
        if save_changes {
            warn!("引擎不会修改源文件，忽略保存请求: {}", handle.source().display());
        }
        self.open_handles
            .remove(&handle.id())
            .map(|_| ())
            .ok_or(EngineError::UnknownHandle(handle.id()))
    }

    async fn quit(&mut self) -> Result<(), EngineError> {
        if !self.open_handles.is_empty() {
            warn!("仍有 {} 个工作簿未关闭，随会话一起释放", self.open_handles.len());
            self.open_handles.clear();
        }

        match self.profile.take() {
            Some(profile) => {
                let path = profile.path().to_path_buf();
                profile.close()?;
                info!("🔌 引擎会话已关闭: {}", path.display());
            }
            None => debug!("引擎会话已经关闭"),
        }
        Ok(())
    }
}

/// 移动文件，跨文件系统时退化为复制后删除
async fn move_file(from: &Path, to: &Path) -> Result<(), EngineError> {
    if fs::rename(from, to).await.is_ok() {
        return Ok(());
    }
    fs::copy(from, to).await?;
    fs::remove_file(from).await?;
    Ok(())
}

/// 把本地路径转换为 `file://` URL
fn file_url(path: &Path) -> String {
    let raw = path.to_string_lossy().replace('\\', "/");
    if raw.starts_with('/') {
        format!("file://{}", raw)
    } else {
        format!("file:///{}", raw)
    }
}
