/// 日志工具模块
///
/// 一次评分作业的运行日志：启动、任务加载、分片计划、worker 完成、最终统计。
use std::ops::Range;
use std::path::Path;
use tracing::info;
use uuid::Uuid;

use crate::workflow::WorkerCtx;

/// 记录程序启动信息
pub fn log_startup(job_id: &Uuid, worker_count: usize, input: &Path, output: &Path) {
    info!("{}", "=".repeat(60));
    info!("🚀 评分作业启动 - 多 worker 并行模式");
    info!("🆔 作业ID: {}", job_id);
    info!("📊 worker 数量: {}", worker_count);
    info!("📥 输入: {}", input.display());
    info!("📤 输出: {}", output.display());
    info!("{}", "=".repeat(60));
}

/// 记录任务加载信息
pub fn log_tasks_loaded(total: usize, skipped: usize) {
    info!("✓ 载入 {} 个待评分任务", total);
    if skipped > 0 {
        info!("⚠️ 另有 {} 个任务无法解析，已跳过", skipped);
    }
}

/// 记录分片计划
pub fn log_shard_plan(bounds: &[Range<usize>]) {
    info!("📦 分片计划: {} 个分片", bounds.len());
    for (rank, range) in bounds.iter().enumerate() {
        if range.is_empty() {
            info!("   rank {}: 空分片", rank);
        } else {
            info!(
                "   rank {}: 任务 {}-{} (共 {} 个)",
                rank,
                range.start + 1,
                range.end,
                range.len()
            );
        }
    }
}

/// 记录 worker 上报
pub fn log_worker_complete(ctx: &WorkerCtx, result_count: usize) {
    info!("{} ✓ 已上报 {} 条结果", ctx, result_count);
}

/// 打印最终统计信息
pub fn print_final_stats(
    processed: usize,
    correct: usize,
    worker_count: usize,
    execution_time_seconds: f64,
    output: &Path,
) {
    info!("\n{}", "=".repeat(60));
    info!("📊 评分完成统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("✅ 已评分: {} (判对 {})", processed, correct);
    info!("🧮 worker 数量: {}", worker_count);
    info!("⏱️ 耗时: {:.3} 秒", execution_time_seconds);
    info!("{}", "=".repeat(60));
    info!("\n结果已保存至: {}", output.display());
}
