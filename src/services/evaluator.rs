//! 判分服务 - 业务能力层
//!
//! 只负责"判断一道题对不对"，不关心分片、rank 和时间戳。
//! 纯函数：无 IO、无共享状态，可在多个 worker 中并发调用。

use crate::models::task::{EvaluationTask, QuestionType};

/// 判分结论
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Verdict {
    pub is_correct: bool,
    pub points_earned: i64,
}

/// 答案归一化：去掉首尾 ASCII 空格并转为 ASCII 小写
pub fn normalize_answer(answer: &str) -> String {
    answer.trim_matches(' ').to_ascii_lowercase()
}

/// 判分
///
/// 可识别题型按归一化后的字符串精确比较；未知题型一律判错（fail-closed）。
/// 判对得满分，判错得 0 分，没有部分得分。
pub fn evaluate(task: &EvaluationTask) -> Verdict {
    let is_correct = match task.question_type {
        QuestionType::MultipleChoice | QuestionType::TrueFalse | QuestionType::ShortAnswer => {
            normalize_answer(&task.applicant_answer) == normalize_answer(&task.correct_answer)
        }
        QuestionType::Other(_) => false,
    };

    Verdict {
        is_correct,
        points_earned: if is_correct { task.points } else { 0 },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(applicant: &str, correct: &str, question_type: &str, points: i64) -> EvaluationTask {
        EvaluationTask {
            response_id: "r".to_string(),
            applicant_answer: applicant.to_string(),
            correct_answer: correct.to_string(),
            question_type: QuestionType::parse(question_type),
            points,
            ..Default::default()
        }
    }

    #[test]
    fn test_case_and_space_insensitive() {
        let verdict = evaluate(&task(" Paris ", "paris", "short_answer", 5));
        assert_eq!(
            verdict,
            Verdict {
                is_correct: true,
                points_earned: 5
            }
        );
    }

    #[test]
    fn test_unknown_type_fails_closed() {
        let verdict = evaluate(&task("same", "same", "essay", 10));
        assert!(!verdict.is_correct);
        assert_eq!(verdict.points_earned, 0);

        assert!(!evaluate(&task("a", "a", "", 3)).is_correct);
    }

    #[test]
    fn test_only_ascii_space_trimmed() {
        // 制表符和换行不属于被去除的字符
        assert!(!evaluate(&task("b\t", "b", "multiple_choice", 1)).is_correct);
        assert!(!evaluate(&task("\nb", "b", "multiple_choice", 1)).is_correct);
        assert!(evaluate(&task("   B   ", "b", "multiple_choice", 1)).is_correct);
    }

    #[test]
    fn test_inner_spaces_significant() {
        assert!(!evaluate(&task("new york", "newyork", "short_answer", 2)).is_correct);
    }

    #[test]
    fn test_non_ascii_not_folded() {
        assert!(!evaluate(&task("É", "é", "short_answer", 2)).is_correct);
        assert!(evaluate(&task("北京", " 北京 ", "short_answer", 2)).is_correct);
    }

    #[test]
    fn test_points_bound_and_idempotent() {
        let cases = [
            task("true", "TRUE", "true_false", 7),
            task("true", "false", "true_false", 7),
            task("x", "x", "essay", 7),
            task("", "", "short_answer", 0),
            task("a", "a", "multiple_choice", -3),
        ];

        for t in &cases {
            let first = evaluate(t);
            assert_eq!(first, evaluate(t));
            assert!(first.points_earned == 0 || first.points_earned == t.points);
            if t.points >= 0 {
                assert!((0..=t.points).contains(&first.points_earned));
            }
        }
    }

    #[test]
    fn test_negative_points_trusted() {
        assert_eq!(evaluate(&task("a", "a", "multiple_choice", -3)).points_earned, -3);
    }
}
