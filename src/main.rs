use anyhow::Result;
use clap::Parser;
use sheet2pdf::cli::Args;
use sheet2pdf::utils::logging;
use sheet2pdf::App;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // 加载配置
    let config = args.load_config()?;

    // 初始化日志
    logging::init(&config)?;

    // 构建任务
    let job = args.build_job(&config).await?;

    // 初始化并运行应用
    App::initialize(config).await?.run(job).await?;

    Ok(())
}
