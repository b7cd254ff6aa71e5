use serde::{Deserialize, Serialize};

use crate::models::domain::quiz_question::QuizQuestion;

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Quiz {
    pub id: i64,
    pub module_id: Option<i64>,
    pub title: String,
    pub description: Option<String>,
    pub passing_score: f64,
    pub time_limit_minutes: Option<u32>,
    pub questions: Vec<QuizQuestion>,
}

impl Quiz {
    /// `None` means the quiz is untimed. A zero limit is treated the same way.
    pub fn time_limit_seconds(&self) -> Option<u64> {
        self.time_limit_minutes
            .filter(|minutes| *minutes > 0)
            .map(|minutes| u64::from(minutes) * 60)
    }

    pub fn question_count(&self) -> usize {
        self.questions.len()
    }
}

#[cfg(test)]
impl Quiz {
    pub fn test_quiz(question_count: usize, time_limit_minutes: Option<u32>) -> Self {
        use crate::models::domain::quiz_question::QuizQuestionType;

        let questions = (1..=question_count as i64)
            .map(|id| QuizQuestion {
                id,
                question_text: format!("Question {}", id),
                question_type: QuizQuestionType::MultipleChoice,
                options: vec!["A".to_string(), "B".to_string()],
                points: 1.0,
                explanation: None,
            })
            .collect();

        Quiz {
            id: 42,
            module_id: Some(3),
            title: "Safety basics".to_string(),
            description: None,
            passing_score: 70.0,
            time_limit_minutes,
            questions,
        }
    }
}
