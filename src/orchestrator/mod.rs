//! 编排层（Orchestration Layer）
//!
//! ## 模块划分
//!
//! ### `partitioner` - 分片器
//! - 只根据任务数量和 worker 数量切分连续分片
//!
//! ### `aggregator` - 结果汇总器
//! - 按 rank 升序恢复全局顺序
//! - 生成作业元数据，发现缺口即失败
//!
//! ### `coordinator` - 协调者
//! - 管理一次作业的生命周期（加载、分发、屏障、汇总、输出）
//! - 自己作为 rank 0 处理第一个分片
//!
//! ## 层次关系
//!
//! ```text
//! coordinator (处理 Vec<EvaluationTask>)
//!     ↓ partitioner
//! workflow::run_worker (处理一个分片)
//!     ↓
//! services::evaluator (处理单个任务)
//!     ↑ aggregator (收集 Vec<WorkerReport>)
//! ```

pub mod aggregator;
pub mod coordinator;
pub mod partitioner;

pub use aggregator::Aggregator;
pub use coordinator::{App, JobStatus, JobSummary, LocalDispatcher, ShardDispatcher};
pub use partitioner::{locate, partition, shard_bounds};
