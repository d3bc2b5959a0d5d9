//! 成绩汇总服务
//!
//! 按 session 统计得分，并生成整场考试的分数分布。

use crate::models::result::EvaluationResult;
use crate::models::task::EvaluationTask;
use serde::Serialize;
use std::collections::BTreeMap;

/// 每个 session 的满分统计，需要在任务被分片移交之前记录
///
/// 分数按输入原样信任，累加时饱和到 `i64` 边界。
#[derive(Debug, Clone, Default)]
pub struct PointsLedger {
    possible: BTreeMap<String, i64>,
}

impl PointsLedger {
    pub fn from_tasks(tasks: &[EvaluationTask]) -> Self {
        let mut possible = BTreeMap::new();
        for task in tasks {
            let total = possible.entry(task.session_id.clone()).or_insert(0i64);
            *total = total.saturating_add(task.points);
        }
        Self { possible }
    }

    pub fn possible_points(&self, session_id: &str) -> i64 {
        self.possible.get(session_id).copied().unwrap_or(0)
    }
}

/// 单个 session 的成绩
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionScore {
    pub session_id: String,
    pub total_questions: usize,
    pub correct_answers: usize,
    pub points_earned: i64,
    pub points_possible: i64,
    /// 百分制得分，满分为 0 时记 0
    pub score_percentage: f64,
}

/// 整场考试的成绩报告
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreReport {
    pub sessions: Vec<SessionScore>,
    pub average_score: f64,
    pub highest_score: f64,
    pub lowest_score: f64,
    /// 十分一档，例如 "80-89"
    pub score_distribution: BTreeMap<String, usize>,
}

impl ScoreReport {
    pub fn build(ledger: &PointsLedger, results: &[EvaluationResult]) -> Self {
        let mut per_session: BTreeMap<&str, (usize, usize, i64)> = BTreeMap::new();
        for result in results {
            let entry = per_session
                .entry(result.session_id.as_str())
                .or_insert((0, 0, 0));
            entry.0 += 1;
            if result.is_correct {
                entry.1 += 1;
            }
            entry.2 = entry.2.saturating_add(result.points_earned);
        }

        let sessions: Vec<SessionScore> = per_session
            .into_iter()
            .map(|(session_id, (total_questions, correct_answers, points_earned))| {
                let points_possible = ledger.possible_points(session_id);
                let score_percentage = if points_possible > 0 {
                    points_earned as f64 / points_possible as f64 * 100.0
                } else {
                    0.0
                };
                SessionScore {
                    session_id: session_id.to_string(),
                    total_questions,
                    correct_answers,
                    points_earned,
                    points_possible,
                    score_percentage,
                }
            })
            .collect();

        let mut score_distribution = BTreeMap::new();
        for session in &sessions {
            *score_distribution
                .entry(bucket_label(session.score_percentage))
                .or_insert(0) += 1;
        }

        let scores: Vec<f64> = sessions.iter().map(|s| s.score_percentage).collect();
        let (average_score, highest_score, lowest_score) = if scores.is_empty() {
            (0.0, 0.0, 0.0)
        } else {
            (
                scores.iter().sum::<f64>() / scores.len() as f64,
                scores.iter().copied().fold(f64::MIN, f64::max),
                scores.iter().copied().fold(f64::MAX, f64::min),
            )
        };

        Self {
            sessions,
            average_score,
            highest_score,
            lowest_score,
            score_distribution,
        }
    }
}

fn bucket_label(score: f64) -> String {
    let low = (score / 10.0).floor() as i64 * 10;
    format!("{}-{}", low, low + 9)
}
