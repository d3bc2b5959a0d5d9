use crate::models::timestamp;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 单个任务的判分结果
///
/// 三个 id 字段从源任务原样复制。创建后不再修改。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub response_id: String,
    pub session_id: String,
    pub question_id: String,
    pub is_correct: bool,
    pub points_earned: i64,
    /// 判分结论产生的时刻
    #[serde(with = "timestamp")]
    pub evaluation_time: DateTime<Utc>,
    pub processed_by_rank: usize,
}

/// 输出文档中的作业元数据
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobMetadata {
    /// 等于 `evaluation_results` 的长度
    pub processed_tasks: usize,
    pub simulation: bool,
    pub processes_used: usize,
    #[serde(with = "timestamp")]
    pub completion_time: DateTime<Utc>,
}

impl JobMetadata {
    pub fn new(processed_tasks: usize, processes_used: usize, completion_time: DateTime<Utc>) -> Self {
        Self {
            processed_tasks,
            simulation: false,
            processes_used,
            completion_time,
        }
    }
}

/// 最终输出文档
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationDocument {
    pub job_metadata: JobMetadata,
    pub evaluation_results: Vec<EvaluationResult>,
}
