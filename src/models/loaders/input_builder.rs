//! 由作答 + 题目组装输入文档

use crate::models::exam::{ApplicantResponse, QuestionRecord};
use crate::models::task::EvaluationTask;
use crate::models::timestamp;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value as JsonValue};
use std::collections::HashMap;
use tracing::warn;

/// 输入文档
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputDocument {
    pub job_metadata: JsonValue,
    pub evaluation_tasks: Vec<EvaluationTask>,
}

/// 按 question_id 关联作答和题目，生成输入文档
///
/// 找不到对应题目的作答会被跳过。任务顺序与 `responses` 一致。
pub fn build_input_document(
    responses: &[ApplicantResponse],
    questions: &[QuestionRecord],
) -> InputDocument {
    let question_map: HashMap<&str, &QuestionRecord> =
        questions.iter().map(|q| (q.id.as_str(), q)).collect();

    let evaluation_tasks: Vec<EvaluationTask> = responses
        .iter()
        .filter_map(|response| {
            let Some(question) = question_map.get(response.question_id.as_str()) else {
                warn!(
                    "⚠️ 作答 {} 对应的题目 {} 不存在，已跳过",
                    response.id, response.question_id
                );
                return None;
            };
            Some(EvaluationTask {
                response_id: response.id.clone(),
                session_id: response.session_id.clone(),
                question_id: response.question_id.clone(),
                applicant_answer: response.answer.clone(),
                correct_answer: question.correct_answer.clone(),
                question_type: question.question_type.clone(),
                points: question.points,
                options: question.options.clone(),
            })
        })
        .collect();

    InputDocument {
        job_metadata: json!({
            "total_tasks": evaluation_tasks.len(),
            "total_responses": responses.len(),
            "total_questions": questions.len(),
            "timestamp": timestamp::format(&Utc::now()),
        }),
        evaluation_tasks,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::loaders::json_loader::{decode_input, encode_document};
    use crate::models::task::QuestionType;

    fn response(id: &str, question_id: &str, answer: &str) -> ApplicantResponse {
        ApplicantResponse {
            id: id.to_string(),
            session_id: "s1".to_string(),
            question_id: question_id.to_string(),
            answer: answer.to_string(),
        }
    }

    fn question(id: &str, correct: &str, points: i64) -> QuestionRecord {
        QuestionRecord {
            id: id.to_string(),
            question_type: QuestionType::MultipleChoice,
            correct_answer: correct.to_string(),
            points,
            options: vec!["A".to_string(), "B".to_string()],
        }
    }

    #[test]
    fn test_build_joins_and_skips_unknown() {
        let responses = vec![
            response("r1", "q1", "A"),
            response("r2", "q-missing", "B"),
            response("r3", "q2", "B"),
        ];
        let questions = vec![question("q1", "A", 3), question("q2", "A", 4)];

        let doc = build_input_document(&responses, &questions);

        let ids: Vec<_> = doc
            .evaluation_tasks
            .iter()
            .map(|t| t.response_id.as_str())
            .collect();
        assert_eq!(ids, vec!["r1", "r3"]);
        assert_eq!(doc.evaluation_tasks[1].points, 4);
        assert_eq!(doc.job_metadata["total_tasks"], 2);
        assert_eq!(doc.job_metadata["total_responses"], 3);
        assert_eq!(doc.job_metadata["total_questions"], 2);
    }

    #[test]
    fn test_built_document_decodes() {
        let doc = build_input_document(&[response("r1", "q1", "A")], &[question("q1", "A", 3)]);
        let json = encode_document(&doc, false).unwrap();

        let decoded = decode_input(&json, true).unwrap();
        assert_eq!(decoded.tasks, doc.evaluation_tasks);
        assert!(decoded.job_metadata.is_some());
    }
}
