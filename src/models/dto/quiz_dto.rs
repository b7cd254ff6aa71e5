use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::domain::quiz_result::{AwardedBadge, QuizResult};
use crate::models::domain::{Quiz, QuizQuestion};

/// Quiz as returned by `GET /quizzes/:id`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct QuizDto {
	pub id: i64,
	#[serde(default)]
	pub module_id: Option<i64>,
	pub title: String,
	#[serde(default)]
	pub description: Option<String>,
	pub passing_score: f64,
	#[serde(default)]
	pub time_limit: Option<u32>,
	#[serde(default)]
	pub is_active: Option<bool>,
	#[serde(default)]
	pub questions: Option<Vec<QuizQuestion>>,
}

impl From<Quiz> for QuizDto {
	fn from(quiz: Quiz) -> Self {
		QuizDto {
			id: quiz.id,
			module_id: quiz.module_id,
			title: quiz.title,
			description: quiz.description,
			passing_score: quiz.passing_score,
			time_limit: quiz.time_limit_minutes,
			is_active: Some(true),
			questions: Some(quiz.questions),
		}
	}
}

impl TryFrom<QuizDto> for Quiz {
	type Error = AppError;

	fn try_from(dto: QuizDto) -> Result<Self, Self::Error> {
		if !(0.0..=100.0).contains(&dto.passing_score) {
			return Err(AppError::ValidationError(format!(
				"passing_score must be between 0 and 100, got {}",
				dto.passing_score
			)));
		}

		let questions = dto.questions.unwrap_or_default();
		let mut seen = HashSet::with_capacity(questions.len());
		for question in &questions {
			if !seen.insert(question.id) {
				return Err(AppError::ValidationError(format!(
					"Quiz {} lists question {} more than once",
					dto.id, question.id
				)));
			}
		}

		Ok(Quiz {
			id: dto.id,
			module_id: dto.module_id,
			title: dto.title,
			description: dto.description,
			passing_score: dto.passing_score,
			time_limit_minutes: dto.time_limit,
			questions,
		})
	}
}

/// Result body of `POST /quizzes/:id/submit`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct QuizResultDto {
	pub score: f64,
	pub max_score: f64,
	#[serde(default)]
	pub percentage: Option<f64>,
	#[serde(default)]
	pub passed: Option<bool>,
	#[serde(default)]
	pub points_awarded: Option<i64>,
	#[serde(default)]
	pub badges_awarded: Option<Vec<serde_json::Value>>,
}

impl QuizResultDto {
	/// Server-reported `percentage`/`passed` win; missing ones are derived locally.
	pub fn into_result(self, passing_score: f64) -> QuizResult {
		let percentage = self
			.percentage
			.unwrap_or_else(|| QuizResult::percentage_of(self.score, self.max_score));
		let passed = self
			.passed
			.unwrap_or_else(|| QuizResult::meets_passing_score(percentage, passing_score));

		QuizResult {
			score: self.score,
			max_score: self.max_score,
			percentage,
			passed,
			points_awarded: self.points_awarded.unwrap_or(0),
			badges_awarded: self
				.badges_awarded
				.unwrap_or_default()
				.iter()
				.filter_map(AwardedBadge::from_value)
				.collect(),
		}
	}
}
