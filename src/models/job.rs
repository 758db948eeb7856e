//! 转换任务模型
//!
//! `ConversionJob` 在任务开始后不可变，由编排器独占持有。

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// 默认的每文件尝试次数
pub const DEFAULT_RETRY_LIMIT: u32 = 3;

/// 默认的重试间隔
pub const DEFAULT_RETRY_BACKOFF: Duration = Duration::from_secs(1);

/// 退避策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackoffStrategy {
    /// 每次等待相同的时间
    #[default]
    Fixed,
    /// 每次失败后等待时间翻倍
    Exponential,
}

/// 重试策略
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    limit: u32,
    base_delay: Duration,
    strategy: BackoffStrategy,
}

impl RetryPolicy {
    /// 创建重试策略，尝试次数至少为 1
    pub fn new(limit: u32, base_delay: Duration, strategy: BackoffStrategy) -> Self {
        Self {
            limit: limit.max(1),
            base_delay,
            strategy,
        }
    }

    /// 最多尝试次数
    pub fn limit(&self) -> u32 {
        self.limit
    }

    pub fn base_delay(&self) -> Duration {
        self.base_delay
    }

    pub fn strategy(&self) -> BackoffStrategy {
        self.strategy
    }

    /// 第 `attempt` 次（从 1 开始）失败后需要等待的时间
    pub fn delay_after(&self, attempt: u32) -> Duration {
        match self.strategy {
            BackoffStrategy::Fixed => self.base_delay,
            BackoffStrategy::Exponential => {
                let shift = attempt.saturating_sub(1).min(16);
                self.base_delay.saturating_mul(1u32 << shift)
            }
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_RETRY_LIMIT, DEFAULT_RETRY_BACKOFF, BackoffStrategy::Fixed)
    }
}

/// 一次批量转换请求
#[derive(Debug, Clone)]
pub struct ConversionJob {
    files: Vec<PathBuf>,
    output_dir: PathBuf,
    retry: RetryPolicy,
}

impl ConversionJob {
    /// 创建任务，使用默认重试策略（3 次，间隔 1 秒）
    pub fn new(files: Vec<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            files,
            output_dir: output_dir.into(),
            retry: RetryPolicy::default(),
        }
    }

    /// 设置每个文件的最多尝试次数（小于 1 时按 1 处理）
    pub fn with_retry_limit(mut self, limit: u32) -> Self {
        self.retry = RetryPolicy::new(limit, self.retry.base_delay, self.retry.strategy);
        self
    }

    /// 设置重试间隔
    pub fn with_backoff(mut self, delay: Duration, strategy: BackoffStrategy) -> Self {
        self.retry = RetryPolicy::new(self.retry.limit, delay, strategy);
        self
    }

    /// 整体替换重试策略
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }

    pub fn retry_limit(&self) -> u32 {
        self.retry.limit
    }

    pub fn total_files(&self) -> usize {
        self.files.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_defaults() {
        let job = ConversionJob::new(vec![PathBuf::from("a.xlsx")], "/out");
        assert_eq!(job.retry_limit(), 3);
        assert_eq!(job.retry_policy().base_delay(), Duration::from_secs(1));
        assert_eq!(job.output_dir(), Path::new("/out"));
        assert_eq!(job.total_files(), 1);
    }

    #[test]
    fn test_zero_retry_limit_is_raised_to_one() {
        let job = ConversionJob::new(Vec::new(), "/out").with_retry_limit(0);
        assert_eq!(job.retry_limit(), 1);
    }

    #[test]
    fn test_fixed_and_exponential_delays() {
        let fixed = RetryPolicy::new(3, Duration::from_millis(100), BackoffStrategy::Fixed);
        assert_eq!(fixed.delay_after(1), Duration::from_millis(100));
        assert_eq!(fixed.delay_after(3), Duration::from_millis(100));

        let exp = RetryPolicy::new(3, Duration::from_millis(100), BackoffStrategy::Exponential);
        assert_eq!(exp.delay_after(1), Duration::from_millis(100));
        assert_eq!(exp.delay_after(2), Duration::from_millis(200));
        assert_eq!(exp.delay_after(4), Duration::from_millis(800));
    }

    #[test]
    fn test_builders_keep_other_settings() {
        let job = ConversionJob::new(Vec::new(), "/out")
            .with_retry_limit(5)
            .with_backoff(Duration::ZERO, BackoffStrategy::Exponential);
        assert_eq!(job.retry_limit(), 5);
        assert_eq!(job.retry_policy().strategy(), BackoffStrategy::Exponential);
        assert_eq!(job.retry_policy().base_delay(), Duration::ZERO);
    }
}
