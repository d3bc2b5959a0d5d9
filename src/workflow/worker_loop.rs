//! worker 循环 - 流程层
//!
//! 顺序处理一个分片：判分 → 记录判分时刻 → 标记 rank。
//! 输出顺序与分片顺序一致，同一 worker 内时间戳单调不减。

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use crate::models::result::EvaluationResult;
use crate::models::task::EvaluationTask;
use crate::services::evaluator;
use crate::workflow::worker_ctx::WorkerCtx;

/// worker 一次性上报给协调者的结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerReport {
    pub rank: usize,
    /// 分片在全局任务列表中的起始位置
    pub offset: usize,
    pub results: Vec<EvaluationResult>,
}

impl WorkerReport {
    pub fn new(ctx: &WorkerCtx, results: Vec<EvaluationResult>) -> Self {
        Self {
            rank: ctx.rank,
            offset: ctx.offset,
            results,
        }
    }
}

/// 处理一个分片
///
/// `shard[i]` 产生 `results[i]`。空分片直接返回空列表。
pub fn run_worker(shard: Vec<EvaluationTask>, ctx: &WorkerCtx) -> Vec<EvaluationResult> {
    if shard.is_empty() {
        debug!("{} 分片为空", ctx);
        return Vec::new();
    }

    debug!("{} 开始处理 {} 个任务", ctx, shard.len());

    let mut results = Vec::with_capacity(shard.len());
    let mut last_time: Option<DateTime<Utc>> = None;

    for task in shard {
        if !task.question_type.is_recognized() {
            warn!(
                "{} ⚠️ 作答 {} 的题型 '{}' 无法识别，按错误处理",
                ctx, task.response_id, task.question_type
            );
        }

        let verdict = evaluator::evaluate(&task);

        // 墙钟回拨时沿用上一个时间戳
        let now = Utc::now();
        let evaluation_time = match last_time {
            Some(last) if now < last => last,
            _ => now,
        };
        last_time = Some(evaluation_time);

        results.push(EvaluationResult {
            response_id: task.response_id,
            session_id: task.session_id,
            question_id: task.question_id,
            is_correct: verdict.is_correct,
            points_earned: verdict.points_earned,
            evaluation_time,
            processed_by_rank: ctx.rank,
        });
    }

    debug!("{} 完成 {} 个任务", ctx, results.len());
    results
}
