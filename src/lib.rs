//! # Exam Evaluator
//!
//! 并行批量评阅考试作答，输出与输入顺序一致的结果文档
//!
//! ## 架构设计
//!
//! ### ① 数据层（Models）
//! - `models/` - 任务、结果、输出文档，以及 JSON 文档适配器
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"，只处理单个任务
//! - `evaluator` - 判分能力（纯函数）
//! - `score_report` - 成绩汇总能力
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一个分片"的处理流程
//! - `WorkerCtx` - 上下文封装（rank + worker 总数 + 分片起点）
//! - `run_worker` - 顺序判分并标记 rank 和判分时刻
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/partitioner` - 分片
//! - `orchestrator/coordinator` - 分发与屏障
//! - `orchestrator/aggregator` - 汇总与排序
//!
//! ## 模块结构

pub mod config;
pub mod error;
pub mod logger;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use config::Config;
pub use error::{AppError, AppResult};
pub use models::{EvaluationDocument, EvaluationResult, EvaluationTask, JobMetadata, QuestionType};
pub use orchestrator::{App, JobStatus, JobSummary, ShardDispatcher};
pub use services::{evaluate, Verdict};
pub use workflow::{run_worker, WorkerCtx, WorkerReport};
