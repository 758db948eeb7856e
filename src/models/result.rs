//! 转换结果模型

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

/// 单个文件的最终状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversionStatus {
    /// 转换成功
    Succeeded,
    /// 重试次数用尽仍失败
    Failed,
    /// 因取消而未完成
    SkippedCancelled,
}

/// 单个输入文件的转换结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileConversionResult {
    /// 源文件
    pub source: PathBuf,
    /// 推导出的 PDF 路径（文件名无效时为空）
    pub output: Option<PathBuf>,
    pub status: ConversionStatus,
    /// 实际尝试次数
    pub attempts: u32,
    /// 最后一次错误
    pub last_error: Option<String>,
}

impl FileConversionResult {
    pub fn succeeded(&self) -> bool {
        self.status == ConversionStatus::Succeeded
    }
}

/// 任务结束状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CompletionStatus {
    AllProcessed,
    Cancelled,
}

impl CompletionStatus {
    /// 终止事件携带的固定文案
    pub fn message(&self) -> &'static str {
        match self {
            CompletionStatus::AllProcessed => "All files processed.",
            CompletionStatus::Cancelled => "Conversion cancelled.",
        }
    }
}

impl fmt::Display for CompletionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// 文件名整理的结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RenameOutcome {
    /// 文件名不含 `%20`，无需处理
    Unchanged { path: PathBuf },
    /// 已重命名
    Renamed { from: PathBuf, to: PathBuf },
    /// 文件已不在预期位置
    NotFound { path: PathBuf },
    /// 重命名失败，保留原名
    Failed { path: PathBuf, error: String },
}

/// 一次任务的完整报告
#[derive(Debug, Clone, Serialize)]
pub struct JobReport {
    pub status: CompletionStatus,
    /// 按输入顺序排列，每个输入文件一条
    pub results: Vec<FileConversionResult>,
    pub renames: Vec<RenameOutcome>,
}

impl JobReport {
    pub fn count(&self, status: ConversionStatus) -> usize {
        self.results.iter().filter(|r| r.status == status).count()
    }

    pub fn succeeded(&self) -> usize {
        self.count(ConversionStatus::Succeeded)
    }

    pub fn failed(&self) -> usize {
        self.count(ConversionStatus::Failed)
    }

    pub fn skipped(&self) -> usize {
        self.count(ConversionStatus::SkippedCancelled)
    }

    pub fn total(&self) -> usize {
        self.results.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_completion_messages_are_literal() {
        assert_eq!(CompletionStatus::AllProcessed.message(), "All files processed.");
        assert_eq!(CompletionStatus::Cancelled.to_string(), "Conversion cancelled.");
    }

    #[test]
    fn test_report_counts_and_json_shape() {
        let report = JobReport {
            status: CompletionStatus::AllProcessed,
            results: vec![
                FileConversionResult {
                    source: PathBuf::from("a.xlsx"),
                    output: Some(PathBuf::from("/out/a.pdf")),
                    status: ConversionStatus::Succeeded,
                    attempts: 1,
                    last_error: None,
                },
                FileConversionResult {
                    source: PathBuf::from("b.xls"),
                    output: Some(PathBuf::from("/out/b.pdf")),
                    status: ConversionStatus::Failed,
                    attempts: 3,
                    last_error: Some("boom".to_string()),
                },
            ],
            renames: vec![RenameOutcome::Unchanged {
                path: PathBuf::from("/out/a.pdf"),
            }],
        };
        assert_eq!(report.succeeded(), 1);
        assert_eq!(report.failed(), 1);
        assert_eq!(report.skipped(), 0);

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["status"], "all_processed");
        assert_eq!(json["results"][1]["status"], "failed");
        assert_eq!(json["renames"][0]["kind"], "unchanged");
    }
}
