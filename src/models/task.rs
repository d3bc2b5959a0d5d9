use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// 题型
///
/// 无法识别的题型原样保留在 `Other` 中，判分时一律按错误处理。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum QuestionType {
    /// 单选题
    MultipleChoice,
    /// 判断题
    TrueFalse,
    /// 简答题
    ShortAnswer,
    /// 其他题型（包括空字符串）
    Other(String),
}

impl QuestionType {
    /// 从线上格式解析（精确匹配）
    pub fn parse(s: &str) -> Self {
        match s {
            "multiple_choice" => QuestionType::MultipleChoice,
            "true_false" => QuestionType::TrueFalse,
            "short_answer" => QuestionType::ShortAnswer,
            other => QuestionType::Other(other.to_string()),
        }
    }

    /// 线上格式名称
    pub fn as_str(&self) -> &str {
        match self {
            QuestionType::MultipleChoice => "multiple_choice",
            QuestionType::TrueFalse => "true_false",
            QuestionType::ShortAnswer => "short_answer",
            QuestionType::Other(s) => s,
        }
    }

    /// 是否为支持自动判分的题型
    pub fn is_recognized(&self) -> bool {
        !matches!(self, QuestionType::Other(_))
    }
}

impl Default for QuestionType {
    fn default() -> Self {
        QuestionType::Other(String::new())
    }
}

impl From<String> for QuestionType {
    fn from(s: String) -> Self {
        Self::parse(&s)
    }
}

impl From<QuestionType> for String {
    fn from(t: QuestionType) -> Self {
        t.as_str().to_string()
    }
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 一个待判分的作答
///
/// 缺失字段和 `null` 都按空字符串 / 0 / 空列表处理。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluationTask {
    #[serde(deserialize_with = "null_as_default")]
    pub response_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub session_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub question_id: String,
    /// 未作答时常见为 `null`，按空答案判分
    #[serde(deserialize_with = "null_as_default")]
    pub applicant_answer: String,
    #[serde(deserialize_with = "null_as_default")]
    pub correct_answer: String,
    #[serde(deserialize_with = "null_as_default")]
    pub question_type: QuestionType,
    /// 满分，按输入原样信任（负数不校验）
    #[serde(deserialize_with = "null_as_default")]
    pub points: i64,
    /// 选项，当前不参与判分
    #[serde(deserialize_with = "null_as_default")]
    pub options: Vec<String>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
