//! worker 上下文
//!
//! 封装"我是第几个 worker、负责从哪里开始的分片"这一信息，
//! 以参数形式传入，不使用全局状态。

use std::fmt::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkerCtx {
    /// 当前 worker 的 rank（0 为协调者）
    pub rank: usize,
    /// worker 总数
    pub total_workers: usize,
    /// 分片在全局任务列表中的起始位置
    pub offset: usize,
}

impl WorkerCtx {
    pub fn new(rank: usize, total_workers: usize, offset: usize) -> Self {
        Self {
            rank,
            total_workers,
            offset,
        }
    }
}

impl Display for WorkerCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[worker rank#{}/{}]", self.rank, self.total_workers)
    }
}
