//! 结果汇总器
//!
//! 协调者在屏障之后调用：按 rank 升序拼接各 worker 的结果，恢复输入顺序，
//! 并生成作业元数据。任何缺口都是致命错误，不会产出不完整的文档。

use chrono::Utc;
use std::ops::Range;
use tracing::debug;

use crate::error::{AppError, AppResult, WorkerError};
use crate::models::result::{EvaluationDocument, JobMetadata};
use crate::workflow::WorkerReport;

/// 结果汇总器，持有本次运行的分片计划
#[derive(Debug, Clone)]
pub struct Aggregator {
    bounds: Vec<Range<usize>>,
}

impl Aggregator {
    /// `bounds[rank]` 为该 rank 的全局下标范围（见 `partitioner::shard_bounds`）
    pub fn new(bounds: Vec<Range<usize>>) -> Self {
        Self { bounds }
    }

    pub fn total_workers(&self) -> usize {
        self.bounds.len()
    }

    /// 汇总所有 worker 的上报
    ///
    /// 上报的到达顺序无关紧要。分到非空分片却没有上报的 rank 返回 `WorkerUnavailable`。
    pub fn aggregate(&self, reports: Vec<WorkerReport>) -> AppResult<EvaluationDocument> {
        let total_workers = self.total_workers();
        let mut slots: Vec<Option<WorkerReport>> = vec![None; total_workers];

        for report in reports {
            let rank = report.rank;
            let slot = slots.get_mut(rank).ok_or(WorkerError::RankOutOfRange {
                rank,
                total_workers,
            })?;
            if slot.is_some() {
                return Err(WorkerError::DuplicateReport { rank }.into());
            }
            *slot = Some(report);
        }

        let expected_total = self.bounds.last().map_or(0, |r| r.end);
        let mut evaluation_results = Vec::with_capacity(expected_total);

        for (rank, (slot, range)) in slots.into_iter().zip(&self.bounds).enumerate() {
            let Some(report) = slot else {
                if range.is_empty() {
                    continue;
                }
                return Err(AppError::worker_unavailable(rank, range.len(), "未收到上报"));
            };

            if report.results.len() != range.len() {
                return Err(WorkerError::IncompleteReport {
                    rank,
                    reported: report.results.len(),
                    expected: range.len(),
                }
                .into());
            }
            if report.offset != range.start || evaluation_results.len() != range.start {
                return Err(WorkerError::OffsetMismatch {
                    rank,
                    offset: report.offset,
                    expected: evaluation_results.len(),
                }
                .into());
            }

            evaluation_results.extend(report.results);
        }

        // 完成时间不早于任何一条结果的判分时间
        let latest = evaluation_results.iter().map(|r| r.evaluation_time).max();
        let now = Utc::now();
        let completion_time = latest.map_or(now, |latest| latest.max(now));

        debug!(
            "汇总完成: {} 条结果, {} 个 worker",
            evaluation_results.len(),
            total_workers
        );

        Ok(EvaluationDocument {
            job_metadata: JobMetadata::new(evaluation_results.len(), total_workers, completion_time),
            evaluation_results,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::result::EvaluationResult;
    use crate::orchestrator::partitioner::shard_bounds;
    use chrono::Duration;

    fn result(id: &str, rank: usize) -> EvaluationResult {
        EvaluationResult {
            response_id: id.to_string(),
            session_id: "s".to_string(),
            question_id: "q".to_string(),
            is_correct: false,
            points_earned: 0,
            evaluation_time: Utc::now(),
            processed_by_rank: rank,
        }
    }

    fn report(rank: usize, offset: usize, ids: &[&str]) -> WorkerReport {
        WorkerReport {
            rank,
            offset,
            results: ids.iter().map(|id| result(id, rank)).collect(),
        }
    }

    fn ids(doc: &EvaluationDocument) -> Vec<&str> {
        doc.evaluation_results
            .iter()
            .map(|r| r.response_id.as_str())
            .collect()
    }

    #[test]
    fn test_order_restored_regardless_of_arrival() {
        let aggregator = Aggregator::new(shard_bounds(5, 2).unwrap());
        let reports = vec![
            report(1, 3, &["r3", "r4"]),
            report(0, 0, &["r0", "r1", "r2"]),
        ];

        let doc = aggregator.aggregate(reports).unwrap();

        assert_eq!(ids(&doc), vec!["r0", "r1", "r2", "r3", "r4"]);
        assert_eq!(doc.job_metadata.processed_tasks, 5);
        assert_eq!(doc.job_metadata.processes_used, 2);
        assert!(!doc.job_metadata.simulation);
    }

    #[test]
    fn test_missing_non_empty_rank_is_fatal() {
        let aggregator = Aggregator::new(shard_bounds(5, 2).unwrap());
        let err = aggregator
            .aggregate(vec![report(0, 0, &["r0", "r1", "r2"])])
            .unwrap_err();
        assert!(err.is_worker_unavailable());
    }

    #[test]
    fn test_missing_empty_rank_is_fine() {
        let aggregator = Aggregator::new(shard_bounds(1, 3).unwrap());
        let doc = aggregator.aggregate(vec![report(0, 0, &["r0"])]).unwrap();
        assert_eq!(doc.job_metadata.processed_tasks, 1);
        assert_eq!(doc.job_metadata.processes_used, 3);
    }

    #[test]
    fn test_incomplete_report() {
        let aggregator = Aggregator::new(shard_bounds(4, 2).unwrap());
        let err = aggregator
            .aggregate(vec![report(0, 0, &["r0", "r1"]), report(1, 2, &["r2"])])
            .unwrap_err();
        assert!(matches!(
            err,
            AppError::Worker(WorkerError::IncompleteReport {
                rank: 1,
                reported: 1,
                expected: 2
            })
        ));
    }

    #[test]
    fn test_duplicate_and_out_of_range() {
        let aggregator = Aggregator::new(shard_bounds(2, 2).unwrap());
        let dup = aggregator
            .aggregate(vec![report(0, 0, &["a"]), report(0, 0, &["a"])])
            .unwrap_err();
        assert!(matches!(dup, AppError::Worker(WorkerError::DuplicateReport { rank: 0 })));

        let out = aggregator.aggregate(vec![report(5, 0, &[])]).unwrap_err();
        assert!(matches!(
            out,
            AppError::Worker(WorkerError::RankOutOfRange { rank: 5, .. })
        ));
    }

    #[test]
    fn test_offset_mismatch() {
        let aggregator = Aggregator::new(shard_bounds(2, 2).unwrap());
        let err = aggregator
            .aggregate(vec![report(0, 0, &["a"]), report(1, 0, &["b"])])
            .unwrap_err();
        assert!(matches!(err, AppError::Worker(WorkerError::OffsetMismatch { rank: 1, .. })));
    }

    #[test]
    fn test_completion_not_before_latest_evaluation() {
        let aggregator = Aggregator::new(shard_bounds(1, 1).unwrap());
        let mut future = report(0, 0, &["a"]);
        future.results[0].evaluation_time = Utc::now() + Duration::hours(1);
        let latest = future.results[0].evaluation_time;

        let doc = aggregator.aggregate(vec![future]).unwrap();
        assert!(doc.job_metadata.completion_time >= latest);
    }

    #[test]
    fn test_empty_run() {
        let aggregator = Aggregator::new(shard_bounds(0, 4).unwrap());
        let doc = aggregator.aggregate(Vec::new()).unwrap();
        assert_eq!(doc.job_metadata.processed_tasks, 0);
        assert!(doc.evaluation_results.is_empty());
    }
}
