use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};

use crate::{
    errors::{AppError, AppResult},
    models::domain::{quiz_question::QuizQuestion, Quiz},
    models::dto::request::QuestionAnswerInput,
};

/// In-memory state of one attempt at a quiz.
#[derive(Clone, Debug, PartialEq)]
pub struct QuizAttempt {
    pub quiz_id: i64,
    pub ordered_questions: Vec<QuizQuestion>,
    answers_by_question_id: HashMap<i64, String>,
    flagged_question_ids: HashSet<i64>,
    current_question_index: usize,
    remaining_seconds: Option<u64>,
    pub started_at: DateTime<Utc>,
    pub last_saved_at: Option<DateTime<Utc>>,
}

impl QuizAttempt {
    pub fn new(quiz: &Quiz, started_at: DateTime<Utc>) -> Self {
        let answers_by_question_id = quiz
            .questions
            .iter()
            .map(|q| (q.id, String::new()))
            .collect();

        Self {
            quiz_id: quiz.id,
            ordered_questions: quiz.questions.clone(),
            answers_by_question_id,
            flagged_question_ids: HashSet::new(),
            current_question_index: 0,
            remaining_seconds: quiz.time_limit_seconds(),
            started_at,
            last_saved_at: None,
        }
    }

    pub fn question_count(&self) -> usize {
        self.ordered_questions.len()
    }

    pub fn answer(&self, question_id: i64) -> Option<&str> {
        self.answers_by_question_id.get(&question_id).map(String::as_str)
    }

    pub fn answers(&self) -> &HashMap<i64, String> {
        &self.answers_by_question_id
    }

    pub fn set_answer(&mut self, question_id: i64, value: impl Into<String>) -> AppResult<()> {
        let slot = self
            .answers_by_question_id
            .get_mut(&question_id)
            .ok_or_else(|| {
                AppError::ValidationError(format!(
                    "Question {} is not part of quiz {}",
                    question_id, self.quiz_id
                ))
            })?;
        *slot = value.into();
        Ok(())
    }

    /// Returns whether the question is flagged after the toggle.
    pub fn toggle_flag(&mut self, question_id: i64) -> bool {
        if self.flagged_question_ids.remove(&question_id) {
            false
        } else {
            self.flagged_question_ids.insert(question_id);
            true
        }
    }

    pub fn is_flagged(&self, question_id: i64) -> bool {
        self.flagged_question_ids.contains(&question_id)
    }

    pub fn flagged_question_ids(&self) -> &HashSet<i64> {
        &self.flagged_question_ids
    }

    pub fn current_question_index(&self) -> usize {
        self.current_question_index
    }

    pub fn current_question(&self) -> Option<&QuizQuestion> {
        self.ordered_questions.get(self.current_question_index)
    }

    /// Out-of-range indices leave the position unchanged.
    pub fn go_to(&mut self, index: usize) -> bool {
        if index < self.question_count() {
            self.current_question_index = index;
            true
        } else {
            false
        }
    }

    pub fn next(&mut self) -> bool {
        self.go_to(self.current_question_index + 1)
    }

    pub fn previous(&mut self) -> bool {
        match self.current_question_index.checked_sub(1) {
            Some(index) => self.go_to(index),
            None => false,
        }
    }

    pub fn remaining_seconds(&self) -> Option<u64> {
        self.remaining_seconds
    }

    pub fn is_timed(&self) -> bool {
        self.remaining_seconds.is_some()
    }

    /// Counts down one second. Returns the new remaining time, or `None` for
    /// untimed attempts. Never goes below zero.
    pub fn count_down(&mut self) -> Option<u64> {
        let remaining = self.remaining_seconds.as_mut()?;
        *remaining = remaining.saturating_sub(1);
        Some(*remaining)
    }

    pub fn answered_count(&self) -> usize {
        self.answers_by_question_id
            .values()
            .filter(|answer| !answer.is_empty())
            .count()
    }

    pub fn unanswered_count(&self) -> usize {
        self.question_count() - self.answered_count()
    }

    /// Completion ratio in `[0.0, 1.0]`; an empty quiz counts as complete.
    pub fn progress(&self) -> f64 {
        if self.question_count() == 0 {
            return 1.0;
        }
        self.answered_count() as f64 / self.question_count() as f64
    }

    /// One entry per question in quiz order; unanswered ones are sent as `""`.
    pub fn submission_answers(&self) -> Vec<QuestionAnswerInput> {
        self.ordered_questions
            .iter()
            .map(|q| QuestionAnswerInput {
                question_id: q.id,
                answer: self.answer(q.id).unwrap_or_default().to_string(),
            })
            .collect()
    }
}
