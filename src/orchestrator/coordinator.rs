//! 协调者 - 编排层
//!
//! ## 职责
//!
//! 一次评分作业的完整生命周期：
//!
//! 1. **加载**：读取并解析输入文档
//! 2. **分发（scatter）**：按分片计划把分片一次性交给各 worker，自己作为 rank 0 处理第一个分片
//! 3. **收集（gather）**：在同一个截止时间前等待所有 worker 上报，这是唯一的同步屏障
//! 4. **汇总**：交给 `Aggregator` 恢复顺序并生成元数据
//! 5. **输出**：原子写入结果文档（以及可选的成绩报告）
//!
//! worker 的传输方式由 `ShardDispatcher` 决定，协调者只依赖"一次发送分片、一次收到上报"这一约定。

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value as JsonValue;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::oneshot;
use tokio::time::Instant;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::models::loaders::{load_input_document, stage_json, write_json_atomic};
use crate::models::result::EvaluationDocument;
use crate::models::task::EvaluationTask;
use crate::models::timestamp;
use crate::orchestrator::aggregator::Aggregator;
use crate::orchestrator::partitioner;
use crate::services::{PointsLedger, ScoreReport};
use crate::utils::logging;
use crate::workflow::{run_worker, WorkerCtx, WorkerReport};

/// 把分片交给一个 worker，返回接收其唯一一次上报的通道
///
/// worker 未上报就丢弃发送端，协调者会将其视为不可用。
pub trait ShardDispatcher: Send + Sync {
    fn dispatch(&self, ctx: WorkerCtx, shard: Vec<EvaluationTask>) -> oneshot::Receiver<WorkerReport>;
}

/// 本地 worker：每个分片在 tokio 的阻塞线程池上独立处理
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalDispatcher;

impl ShardDispatcher for LocalDispatcher {
    fn dispatch(&self, ctx: WorkerCtx, shard: Vec<EvaluationTask>) -> oneshot::Receiver<WorkerReport> {
        let (tx, rx) = oneshot::channel();
        tokio::task::spawn_blocking(move || {
            let results = run_worker(shard, &ctx);
            if tx.send(WorkerReport::new(&ctx, results)).is_err() {
                warn!("{} 协调者已不再等待，结果被丢弃", ctx);
            }
        });
        rx
    }
}

/// 作业状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Completed,
    Failed,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Completed => "completed",
            JobStatus::Failed => "failed",
        }
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 作业摘要
///
/// 只有成功的作业才会生成摘要，失败的作业以错误返回。
#[derive(Debug, Clone, Serialize)]
pub struct JobSummary {
    pub job_id: Uuid,
    pub status: JobStatus,
    pub worker_count: usize,
    pub processed_tasks: usize,
    pub correct_answers: usize,
    pub skipped_tasks: usize,
    #[serde(with = "timestamp")]
    pub start_time: DateTime<Utc>,
    #[serde(with = "timestamp")]
    pub end_time: DateTime<Utc>,
    pub execution_time_seconds: f64,
    /// 输入文档中的 job_metadata（原样）
    pub input_metadata: Option<JsonValue>,
}

/// 已分发、等待上报的 worker
struct PendingWorker {
    ctx: WorkerCtx,
    shard_len: usize,
    receiver: oneshot::Receiver<WorkerReport>,
}

/// 应用主结构
pub struct App {
    config: Config,
    dispatcher: Arc<dyn ShardDispatcher>,
}

impl App {
    /// 初始化应用（使用本地 worker）
    pub fn initialize(config: Config) -> AppResult<Self> {
        Self::with_dispatcher(config, Arc::new(LocalDispatcher))
    }

    /// 使用自定义的分发方式初始化
    pub fn with_dispatcher(config: Config, dispatcher: Arc<dyn ShardDispatcher>) -> AppResult<Self> {
        config.validate()?;
        Ok(Self { config, dispatcher })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// 运行一次完整的评分作业
    ///
    /// 任何环节失败都不会在 `output` 留下文档。
    pub async fn run(
        &self,
        input: &Path,
        output: &Path,
        report: Option<&Path>,
    ) -> AppResult<JobSummary> {
        let job_id = Uuid::new_v4();
        let start_time = Utc::now();
        logging::log_startup(&job_id, self.config.worker_count, input, output);

        let decoded = load_input_document(input, self.config.strict_decode).await?;
        logging::log_tasks_loaded(decoded.tasks.len(), decoded.skipped);

        let ledger = report.map(|_| PointsLedger::from_tasks(&decoded.tasks));

        let document = self.evaluate_tasks(decoded.tasks).await?;

        match (report, ledger) {
            (Some(path), Some(ledger)) => {
                let score_report = ScoreReport::build(&ledger, &document.evaluation_results);
                self.write_with_report(output, &document, path, &score_report)
                    .await?;
            }
            _ => write_json_atomic(output, &document, self.config.pretty_output).await?,
        }

        let end_time = Utc::now();
        let summary = JobSummary {
            job_id,
            status: JobStatus::Completed,
            worker_count: self.config.worker_count,
            processed_tasks: document.job_metadata.processed_tasks,
            correct_answers: document
                .evaluation_results
                .iter()
                .filter(|r| r.is_correct)
                .count(),
            skipped_tasks: decoded.skipped,
            start_time,
            end_time,
            execution_time_seconds: (end_time - start_time).num_milliseconds() as f64 / 1000.0,
            input_metadata: decoded.job_metadata,
        };

        logging::print_final_stats(
            summary.processed_tasks,
            summary.correct_answers,
            summary.worker_count,
            summary.execution_time_seconds,
            output,
        );

        Ok(summary)
    }

    /// 结果文档和成绩报告都写入临时文件成功后才依次重命名
    async fn write_with_report(
        &self,
        output: &Path,
        document: &EvaluationDocument,
        report_path: &Path,
        score_report: &ScoreReport,
    ) -> AppResult<()> {
        let pretty = self.config.pretty_output;
        let staged_output = stage_json(output, document, pretty).await?;
        let staged_report = match stage_json(report_path, score_report, pretty).await {
            Ok(staged) => staged,
            Err(e) => {
                staged_output.discard().await;
                return Err(e);
            }
        };

        staged_output.commit().await?;
        if let Err(e) = staged_report.commit().await {
            error!(
                "❌ 结果文档已写入 {}，但成绩报告写入失败",
                output.display()
            );
            return Err(e);
        }
        info!("📝 成绩报告已保存至: {}", report_path.display());
        Ok(())
    }

    /// 核心流程：分片 → 分发 → rank 0 自己处理 → 屏障 → 汇总
    pub async fn evaluate_tasks(&self, tasks: Vec<EvaluationTask>) -> AppResult<EvaluationDocument> {
        let worker_count = self.config.worker_count;
        let bounds = partitioner::shard_bounds(tasks.len(), worker_count)?;
        logging::log_shard_plan(&bounds);

        let mut shards = partitioner::partition(tasks, worker_count)?.into_iter();
        let own_shard = shards.next().unwrap_or_default();

        // scatter：rank 0 之外的分片全部先发出去
        let pending: Vec<PendingWorker> = shards
            .enumerate()
            .map(|(i, shard)| {
                let rank = i + 1;
                let ctx = WorkerCtx::new(rank, worker_count, bounds[rank].start);
                PendingWorker {
                    ctx,
                    shard_len: shard.len(),
                    receiver: self.dispatcher.dispatch(ctx, shard),
                }
            })
            .collect();

        let own_ctx = WorkerCtx::new(0, worker_count, 0);
        let own_results = run_worker(own_shard, &own_ctx);
        logging::log_worker_complete(&own_ctx, own_results.len());

        let mut reports = Vec::with_capacity(worker_count);
        reports.push(WorkerReport::new(&own_ctx, own_results));
        reports.extend(self.gather(pending).await?);

        Aggregator::new(bounds).aggregate(reports)
    }

    /// gather：所有 worker 共用一个截止时间
    async fn gather(&self, pending: Vec<PendingWorker>) -> AppResult<Vec<WorkerReport>> {
        let timeout = self.config.barrier_timeout();
        let deadline = Instant::now() + timeout;

        let waits = pending.into_iter().map(|worker| async move {
            let outcome = tokio::time::timeout_at(deadline, worker.receiver).await;
            (worker.ctx, worker.shard_len, outcome)
        });
        let outcomes = futures::future::join_all(waits).await;

        let mut reports = Vec::with_capacity(outcomes.len());
        for (ctx, shard_len, outcome) in outcomes {
            let reason = match outcome {
                Ok(Ok(report)) => {
                    logging::log_worker_complete(&ctx, report.results.len());
                    reports.push(report);
                    continue;
                }
                Ok(Err(_)) => "通道已关闭，worker 未上报".to_string(),
                Err(_) => format!("超过屏障超时 {:?}", timeout),
            };

            if shard_len == 0 {
                warn!("{} ⚠️ {}（空分片，忽略）", ctx, reason);
                continue;
            }

            error!("{} ❌ {}", ctx, reason);
            return Err(AppError::worker_unavailable(ctx.rank, shard_len, reason));
        }

        Ok(reports)
    }
}
