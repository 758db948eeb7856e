use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;
use tokio::fs;

use crate::models::job::{BackoffStrategy, ConversionJob, DEFAULT_RETRY_LIMIT};

/// 任务清单（TOML）
///
/// ```toml
/// files = ["reports/q1.xlsx", "reports/q2.xls"]
/// output_dir = "pdf"
/// retry_limit = 2
/// ```
///
/// 相对路径按清单文件所在目录解析。
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct JobManifest {
    pub files: Vec<PathBuf>,
    pub output_dir: PathBuf,
    pub retry_limit: Option<u32>,
    pub retry_backoff_ms: Option<u64>,
    #[serde(default)]
    pub exponential_backoff: bool,
}

impl JobManifest {
    /// 转换为任务，相对路径基于 `base_dir`
    pub fn into_job(self, base_dir: &Path) -> ConversionJob {
        let files = self
            .files
            .into_iter()
            .map(|f| resolve(base_dir, f))
            .collect();
        let strategy = if self.exponential_backoff {
            BackoffStrategy::Exponential
        } else {
            BackoffStrategy::Fixed
        };
        let job = ConversionJob::new(files, resolve(base_dir, self.output_dir))
            .with_retry_limit(self.retry_limit.unwrap_or(DEFAULT_RETRY_LIMIT));
        let delay = self
            .retry_backoff_ms
            .map(Duration::from_millis)
            .unwrap_or(job.retry_policy().base_delay());
        job.with_backoff(delay, strategy)
    }
}

fn resolve(base_dir: &Path, path: PathBuf) -> PathBuf {
    if path.is_absolute() {
        path
    } else {
        base_dir.join(path)
    }
}

/// 从 TOML 清单文件加载转换任务
pub async fn load_job_manifest(manifest_path: &Path) -> Result<ConversionJob> {
    let content = fs::read_to_string(manifest_path)
        .await
        .with_context(|| format!("无法读取任务清单: {}", manifest_path.display()))?;

    let manifest: JobManifest = toml::from_str(&content)
        .with_context(|| format!("无法解析任务清单: {}", manifest_path.display()))?;

    let base_dir = manifest_path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_default();

    tracing::info!(
        "成功加载任务清单: {} 个文件 -> {}",
        manifest.files.len(),
        manifest.output_dir.display()
    );

    Ok(manifest.into_job(&base_dir))
}

/// 是否为 `.xls` / `.xlsx` 文件
pub fn is_spreadsheet(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|s| s.to_str()),
        Some("xls") | Some("xlsx")
    )
}

/// 展开输入路径：文件原样保留，目录扫描其中的表格文件（不递归，按文件名排序）
pub async fn expand_inputs(inputs: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for input in inputs {
        let metadata = fs::metadata(input)
            .await
            .with_context(|| format!("输入路径不存在: {}", input.display()))?;

        if !metadata.is_dir() {
            files.push(input.clone());
            continue;
        }

        let mut found = Vec::new();
        let mut entries = fs::read_dir(input)
            .await
            .with_context(|| format!("无法读取文件夹: {}", input.display()))?;

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if is_spreadsheet(&path) && entry.file_type().await?.is_file() {
                found.push(path);
            }
        }

        if found.is_empty() {
            tracing::warn!("在文件夹 {} 中没有找到表格文件", input.display());
        } else {
            tracing::info!("📁 {} 中找到 {} 个表格文件", input.display(), found.len());
        }

        found.sort();
        files.extend(found);
    }

    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_expand_inputs_scans_directories_in_order() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.xlsx", "a.xls", "notes.txt", "c.pdf"] {
            std::fs::write(dir.path().join(name), b"x").unwrap();
        }
        std::fs::create_dir(dir.path().join("nested.xlsx")).unwrap();
        let loose = dir.path().join("notes.txt");

        let files = expand_inputs(&[dir.path().to_path_buf(), loose.clone()])
            .await
            .unwrap();

        assert_eq!(
            files,
            vec![dir.path().join("a.xls"), dir.path().join("b.xlsx"), loose]
        );
    }

    #[tokio::test]
    async fn test_expand_inputs_rejects_missing_path() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.xlsx");
        assert!(expand_inputs(&[missing]).await.is_err());
    }

    #[tokio::test]
    async fn test_load_manifest_resolves_relative_paths() {
        let dir = tempfile::tempdir().unwrap();
        let manifest = dir.path().join("job.toml");
        std::fs::write(
            &manifest,
            r#"
files = ["in/a.xlsx", "/abs/b.xls"]
output_dir = "out"
retry_limit = 2
retry_backoff_ms = 10
exponential_backoff = true
"#,
        )
        .unwrap();

        let job = load_job_manifest(&manifest).await.unwrap();
        assert_eq!(
            job.files(),
            &[dir.path().join("in/a.xlsx"), PathBuf::from("/abs/b.xls")]
        );
        assert_eq!(job.output_dir(), dir.path().join("out"));
        assert_eq!(job.retry_limit(), 2);
        assert_eq!(job.retry_policy().base_delay(), Duration::from_millis(10));
        assert_eq!(job.retry_policy().strategy(), BackoffStrategy::Exponential);
    }

    #[test]
    fn test_is_spreadsheet_is_case_sensitive() {
        assert!(is_spreadsheet(Path::new("a.xls")));
        assert!(is_spreadsheet(Path::new("a.xlsx")));
        assert!(!is_spreadsheet(Path::new("a.XLSX")));
        assert!(!is_spreadsheet(Path::new("a.csv")));
    }
}
