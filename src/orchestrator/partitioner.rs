//! 分片器
//!
//! 把任务列表切成 `worker_count` 个连续分片。只看长度，不看内容：
//! 各分片大小相差不超过 1，前 `len % worker_count` 个分片多分一个。

use crate::error::{AppResult, ConfigError};
use crate::models::task::EvaluationTask;
use std::ops::Range;

/// 每个 rank 负责的全局下标范围
pub fn shard_bounds(len: usize, worker_count: usize) -> AppResult<Vec<Range<usize>>> {
    ensure_workers(worker_count)?;

    let base = len / worker_count;
    let extra = len % worker_count;

    let mut bounds = Vec::with_capacity(worker_count);
    let mut start = 0;
    for rank in 0..worker_count {
        let size = base + usize::from(rank < extra);
        bounds.push(start..start + size);
        start += size;
    }
    Ok(bounds)
}

/// 全局下标 → (rank, 分片内下标)
///
/// 下标越界时返回 `None`。
pub fn locate(index: usize, len: usize, worker_count: usize) -> AppResult<Option<(usize, usize)>> {
    ensure_workers(worker_count)?;
    if index >= len {
        return Ok(None);
    }

    let base = len / worker_count;
    let extra = len % worker_count;
    // 前 extra 个分片大小为 base + 1
    let big_span = extra * (base + 1);

    let located = if index < big_span {
        (index / (base + 1), index % (base + 1))
    } else {
        let rest = index - big_span;
        (extra + rest / base, rest % base)
    };
    Ok(Some(located))
}

/// 切分任务列表，任务所有权移交给各分片
pub fn partition(
    tasks: Vec<EvaluationTask>,
    worker_count: usize,
) -> AppResult<Vec<Vec<EvaluationTask>>> {
    let bounds = shard_bounds(tasks.len(), worker_count)?;

    let mut remaining = tasks.into_iter();
    let shards: Vec<Vec<EvaluationTask>> = bounds
        .iter()
        .map(|range| remaining.by_ref().take(range.len()).collect::<Vec<_>>())
        .collect();
    Ok(shards)
}

fn ensure_workers(worker_count: usize) -> AppResult<()> {
    if worker_count == 0 {
        return Err(ConfigError::InvalidWorkerCount { worker_count }.into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;

    fn tasks(n: usize) -> Vec<EvaluationTask> {
        (0..n)
            .map(|i| EvaluationTask {
                response_id: format!("r{}", i),
                ..Default::default()
            })
            .collect()
    }

    #[test]
    fn test_concat_reproduces_input() {
        for len in 0..25 {
            for workers in 1..8 {
                let input = tasks(len);
                let shards = partition(input.clone(), workers).unwrap();

                assert_eq!(shards.len(), workers);
                let concat: Vec<_> = shards.iter().flatten().cloned().collect();
                assert_eq!(concat, input);

                let sizes: Vec<_> = shards.iter().map(Vec::len).collect();
                let max = *sizes.iter().max().unwrap();
                let min = *sizes.iter().min().unwrap();
                assert!(max - min <= 1, "len={} workers={} sizes={:?}", len, workers, sizes);
                // 多出来的任务分给靠前的分片
                assert!(sizes.windows(2).all(|w| w[0] >= w[1]));
            }
        }
    }

    #[test]
    fn test_five_over_two() {
        let bounds = shard_bounds(5, 2).unwrap();
        assert_eq!(bounds, vec![0..3, 3..5]);
    }

    #[test]
    fn test_more_workers_than_tasks() {
        let shards = partition(tasks(2), 4).unwrap();
        let sizes: Vec<_> = shards.iter().map(Vec::len).collect();
        assert_eq!(sizes, vec![1, 1, 0, 0]);
    }

    #[test]
    fn test_empty_input_gives_empty_shards() {
        let shards = partition(Vec::new(), 3).unwrap();
        assert_eq!(shards.len(), 3);
        assert!(shards.iter().all(Vec::is_empty));
    }

    #[test]
    fn test_zero_workers_is_config_error() {
        assert!(matches!(
            partition(tasks(3), 0),
            Err(AppError::Config(ConfigError::InvalidWorkerCount { worker_count: 0 }))
        ));
        assert!(shard_bounds(3, 0).is_err());
        assert!(locate(0, 3, 0).is_err());
    }

    #[test]
    fn test_locate_matches_bounds() {
        for len in 0..30 {
            for workers in 1..9 {
                let bounds = shard_bounds(len, workers).unwrap();
                for index in 0..len {
                    let (rank, local) = locate(index, len, workers).unwrap().unwrap();
                    assert_eq!(bounds[rank].start + local, index);
                    assert!(bounds[rank].contains(&index));
                }
                assert_eq!(locate(len, len, workers).unwrap(), None);
            }
        }
    }
}
