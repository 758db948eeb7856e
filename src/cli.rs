use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Parser;

use crate::config::Config;
use crate::models::{expand_inputs, load_job_manifest, ConversionJob};

/// 命令行参数
#[derive(Parser, Debug)]
#[command(
    name = "sheet2pdf",
    about = "通过无头 LibreOffice 批量把 .xls/.xlsx 转换为 PDF"
)]
pub struct Args {
    /// 输入文件或目录（目录中的 .xls/.xlsx 会被展开）
    pub inputs: Vec<PathBuf>,

    /// 输出目录
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// TOML 任务清单，代替位置参数和 --output-dir（重试设置以清单为准）
    #[arg(long, value_name = "PATH", conflicts_with_all = ["inputs", "output_dir"])]
    pub manifest: Option<PathBuf>,

    /// TOML 配置文件
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// 每个文件最多尝试的次数
    #[arg(long)]
    pub retry_limit: Option<u32>,

    /// 重试间隔（毫秒）
    #[arg(long, value_name = "MS")]
    pub retry_backoff_ms: Option<u64>,

    /// 使用指数退避
    #[arg(long)]
    pub exponential_backoff: bool,

    /// soffice 可执行文件路径
    #[arg(long, value_name = "PATH")]
    pub soffice: Option<String>,

    /// 把 JSON 报告写到指定文件
    #[arg(long, value_name = "PATH")]
    pub report: Option<PathBuf>,

    /// 同时写入文本日志文件
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// 显示详细日志
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// 加载配置并叠加命令行参数
    pub fn load_config(&self) -> Result<Config> {
        let mut config = Config::load(self.config.as_deref())?;
        self.apply_to(&mut config);
        Ok(config)
    }

    /// 命令行参数优先级最高
    pub fn apply_to(&self, config: &mut Config) {
        if let Some(limit) = self.retry_limit {
            config.retry_limit = limit;
        }
        if let Some(ms) = self.retry_backoff_ms {
            config.retry_backoff_ms = ms;
        }
        if self.exponential_backoff {
            config.exponential_backoff = true;
        }
        if let Some(soffice) = &self.soffice {
            config.soffice_path = soffice.clone();
        }
        if let Some(report) = &self.report {
            config.report_file = Some(report.clone());
        }
        if let Some(log_file) = &self.log_file {
            config.output_log_file = Some(log_file.clone());
        }
        if self.verbose {
            config.verbose_logging = true;
        }
    }

    /// 根据参数构建转换任务
    pub async fn build_job(&self, config: &Config) -> Result<ConversionJob> {
        if let Some(manifest) = &self.manifest {
            return load_job_manifest(manifest).await;
        }

        let Some(output_dir) = &self.output_dir else {
            bail!("缺少输出目录，请使用 --output-dir 或 --manifest");
        };
        if self.inputs.is_empty() {
            bail!("没有输入文件");
        }

        let files = expand_inputs(&self.inputs).await?;
        Ok(ConversionJob::new(files, output_dir.clone()).with_retry_policy(config.retry_policy()))
    }
}
