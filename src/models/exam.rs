//! 考试业务侧的记录：考生作答与题目

use crate::models::task::QuestionType;
use serde::{Deserialize, Serialize};

/// 考生的一条作答
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicantResponse {
    pub id: String,
    pub session_id: String,
    pub question_id: String,
    pub answer: String,
}

/// 题目（含标准答案与分值）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionRecord {
    pub id: String,
    pub question_type: QuestionType,
    pub correct_answer: String,
    pub points: i64,
    #[serde(default)]
    pub options: Vec<String>,
}
