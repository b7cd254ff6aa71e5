use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct QuizQuestion {
    pub id: i64,
    pub question_text: String,
    #[serde(default)]
    pub question_type: QuizQuestionType,
    #[serde(default)]
    pub options: Vec<String>,
    #[serde(default = "default_points")]
    pub points: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

fn default_points() -> f64 {
    1.0
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QuizQuestionType {
    #[default]
    MultipleChoice,
    TrueFalse,
    ShortAnswer,
    #[serde(other)]
    Other,
}

impl QuizQuestion {
    /// Free-text questions take any string; the rest pick from `options`.
    pub fn is_free_text(&self) -> bool {
        matches!(self.question_type, QuizQuestionType::ShortAnswer) || self.options.is_empty()
    }
}
