use anyhow::{Context, Result};
use clap::Parser;
use exam_evaluator::{logger, App, Config, JobStatus};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::error;

/// 命令行参数（优先级高于配置文件和环境变量）
#[derive(Parser, Debug)]
#[command(name = "exam-evaluator")]
#[command(version)]
#[command(about = "多 worker 并行评阅考试作答", long_about = None)]
struct Args {
    /// 输入文档路径
    input: PathBuf,

    /// 输出文档路径
    output: PathBuf,

    /// worker 数量
    #[arg(short = 'n', long)]
    workers: Option<usize>,

    /// 严格解析：输入文档有问题时直接失败
    #[arg(long)]
    strict: bool,

    /// 屏障超时（毫秒）
    #[arg(long)]
    barrier_timeout_ms: Option<u64>,

    /// 成绩报告输出路径
    #[arg(long)]
    report: Option<PathBuf>,

    /// TOML 配置文件
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// 显示详细日志
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    let config = load_config(&args);
    logger::init(config.as_ref().map_or(args.verbose, |c| c.verbose_logging));

    let outcome = match config {
        Ok(config) => run(config, &args).await,
        Err(e) => Err(e),
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("❌ 评分作业失败 (状态: {}): {:#}", JobStatus::Failed, e);
            ExitCode::FAILURE
        }
    }
}

/// 默认值 → 配置文件 → 环境变量 → 命令行
fn load_config(args: &Args) -> Result<Config> {
    let base = match &args.config {
        Some(path) => Config::from_toml_file(path)?,
        None => Config::default(),
    };
    let mut config = base.merge_env().context("读取环境变量配置失败")?;

    if let Some(workers) = args.workers {
        config.worker_count = workers;
    }
    if let Some(timeout) = args.barrier_timeout_ms {
        config.barrier_timeout_ms = timeout;
    }
    config.strict_decode |= args.strict;
    config.verbose_logging |= args.verbose;

    Ok(config)
}

async fn run(config: Config, args: &Args) -> Result<()> {
    let app = App::initialize(config)?;

    let summary = app
        .run(&args.input, &args.output, args.report.as_deref())
        .await
        .with_context(|| format!("处理 {} 失败", args.input.display()))?;

    tracing::info!("✅ 作业 {} 状态: {}", summary.job_id, summary.status);
    tracing::debug!("作业摘要: {}", serde_json::to_string(&summary)?);
    Ok(())
}
