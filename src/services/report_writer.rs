//! 报告写入服务 - 业务能力层
//!
//! 只负责把任务报告写成 JSON 文件

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::debug;

use crate::models::JobReport;

/// 报告写入服务
pub struct ReportWriter {
    report_path: PathBuf,
}

impl ReportWriter {
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            report_path: path.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.report_path
    }

    /// 写入报告（覆盖已有文件）
    pub async fn write(&self, report: &JobReport) -> Result<()> {
        let json = serde_json::to_string_pretty(report).context("序列化转换报告失败")?;
        debug!(
            "写入报告: {} ({} 条结果)",
            self.report_path.display(),
            report.results.len()
        );
        if let Some(parent) = self.report_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("无法创建报告目录: {}", parent.display()))?;
        }
        tokio::fs::write(&self.report_path, json)
            .await
            .with_context(|| format!("无法写入报告: {}", self.report_path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CompletionStatus, ConversionStatus, FileConversionResult};

    #[tokio::test]
    async fn test_report_is_written_as_json() {
        let dir = tempfile::tempdir().unwrap();
        let writer = ReportWriter::with_path(dir.path().join("report.json"));
        let report = JobReport {
            status: CompletionStatus::Cancelled,
            results: vec![FileConversionResult {
                source: PathBuf::from("a.xlsx"),
                output: None,
                status: ConversionStatus::SkippedCancelled,
                attempts: 0,
                last_error: None,
            }],
            renames: Vec::new(),
        };

        writer.write(&report).await.unwrap();

        let text = std::fs::read_to_string(writer.path()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["status"], "cancelled");
        assert_eq!(value["results"][0]["status"], "skipped_cancelled");
    }

    #[tokio::test]
    async fn test_missing_report_directories_are_created() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reports").join("run1").join("report.json");
        let writer = ReportWriter::with_path(&path);
        let report = JobReport {
            status: CompletionStatus::AllProcessed,
            results: Vec::new(),
            renames: Vec::new(),
        };

        writer.write(&report).await.unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["status"], "all_processed");
    }
}
