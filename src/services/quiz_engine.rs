use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::{
    errors::{AppError, AppResult},
    models::domain::{quiz_question::QuizQuestion, Quiz, QuizAttempt, QuizResult},
    repositories::QuizRepository,
    services::notification_bus::NotificationBus,
};

#[derive(Clone, Debug, PartialEq)]
pub enum QuizPhase {
    Loading,
    InProgress { confirming_partial_submit: bool },
    Submitting,
    Completed(QuizResult),
}

#[derive(Clone, Debug, PartialEq)]
pub enum SubmitOutcome {
    /// Unanswered questions remain; nothing was sent.
    ConfirmationRequired { unanswered: usize },
    Completed(QuizResult),
}

#[derive(Clone, Debug)]
pub enum TickOutcome {
    /// Not running a timed attempt, or the clock already reached zero.
    Idle,
    Counted { remaining_seconds: u64 },
    Submitted(QuizResult),
    SubmitFailed(AppError),
}

/// Runs a single quiz attempt from load to result.
pub struct QuizEngine {
    repository: Arc<dyn QuizRepository>,
    bus: NotificationBus,
    quiz: Option<Quiz>,
    attempt: Option<QuizAttempt>,
    phase: QuizPhase,
    auto_submitted: bool,
}

impl QuizEngine {
    pub fn new(repository: Arc<dyn QuizRepository>, bus: NotificationBus) -> Self {
        Self {
            repository,
            bus,
            quiz: None,
            attempt: None,
            phase: QuizPhase::Loading,
            auto_submitted: false,
        }
    }

    pub async fn load(&mut self, quiz_id: i64) -> AppResult<()> {
        let quiz = self.repository.get_quiz(quiz_id).await.map_err(|e| {
            log::warn!("Failed to load quiz {}: {}", quiz_id, e);
            AppError::QuizLoad(e.to_string())
        })?;

        log::info!(
            "Starting quiz {} ({} questions, time limit {:?} min)",
            quiz.id,
            quiz.question_count(),
            quiz.time_limit_minutes
        );
        self.start_attempt(quiz);
        Ok(())
    }

    fn start_attempt(&mut self, quiz: Quiz) {
        self.attempt = Some(QuizAttempt::new(&quiz, Utc::now()));
        self.quiz = Some(quiz);
        self.phase = QuizPhase::InProgress {
            confirming_partial_submit: false,
        };
        self.auto_submitted = false;
    }

    pub fn set_answer(&mut self, question_id: i64, value: impl Into<String>) -> AppResult<()> {
        self.attempt_mut()?.set_answer(question_id, value)
    }

    /// Returns whether the question is flagged afterwards.
    pub fn toggle_flag(&mut self, question_id: i64) -> AppResult<bool> {
        let attempt = self.attempt_mut()?;
        if attempt.answer(question_id).is_none() {
            return Err(AppError::ValidationError(format!(
                "Question {} is not part of quiz {}",
                question_id, attempt.quiz_id
            )));
        }
        Ok(attempt.toggle_flag(question_id))
    }

    pub fn go_to(&mut self, index: usize) -> bool {
        self.attempt_mut().is_ok_and(|a| a.go_to(index))
    }

    pub fn next(&mut self) -> bool {
        self.attempt_mut().is_ok_and(|a| a.next())
    }

    pub fn previous(&mut self) -> bool {
        self.attempt_mut().is_ok_and(|a| a.previous())
    }

    /// One second of the countdown. Reaching zero submits the attempt, once.
    pub async fn tick(&mut self) -> TickOutcome {
        let Ok(attempt) = self.attempt_mut() else {
            return TickOutcome::Idle;
        };
        match attempt.remaining_seconds() {
            None | Some(0) => return TickOutcome::Idle,
            Some(_) => {}
        }

        let remaining_seconds = attempt.count_down().unwrap_or(0);
        if remaining_seconds > 0 || self.auto_submitted {
            return TickOutcome::Counted { remaining_seconds };
        }

        log::info!("Time is up, submitting quiz");
        self.auto_submitted = true;
        match self.submit(true).await {
            Ok(SubmitOutcome::Completed(result)) => TickOutcome::Submitted(result),
            Ok(SubmitOutcome::ConfirmationRequired { .. }) => TickOutcome::Counted { remaining_seconds },
            Err(e) => TickOutcome::SubmitFailed(e),
        }
    }

    /// Submits the attempt.
    ///
    /// Without `forced`, unanswered questions put the engine into the
    /// confirmation state and nothing is sent. A failed request returns the
    /// engine to `InProgress` with every answer kept.
    pub async fn submit(&mut self, forced: bool) -> AppResult<SubmitOutcome> {
        let unanswered = self.attempt_mut()?.unanswered_count();
        if !forced && unanswered > 0 {
            self.phase = QuizPhase::InProgress {
                confirming_partial_submit: true,
            };
            return Ok(SubmitOutcome::ConfirmationRequired { unanswered });
        }

        let (quiz_id, passing_score, answers) = match (&self.quiz, &self.attempt) {
            (Some(quiz), Some(attempt)) => {
                (quiz.id, quiz.passing_score, attempt.submission_answers())
            }
            _ => return Err(AppError::InvalidState("No quiz loaded".to_string())),
        };

        self.phase = QuizPhase::Submitting;
        match self.repository.submit(quiz_id, answers).await {
            Ok(dto) => {
                let result = dto.into_result(passing_score);
                log::info!(
                    "Quiz {} submitted: {}% (passed: {})",
                    quiz_id,
                    result.percentage,
                    result.passed
                );
                if result.passed {
                    self.bus.success("Quiz Passed", &result.summary());
                } else {
                    self.bus.error("Quiz Failed", &result.summary());
                }
                self.phase = QuizPhase::Completed(result.clone());
                Ok(SubmitOutcome::Completed(result))
            }
            Err(e) => {
                log::error!("Failed to submit quiz {}: {}", quiz_id, e);
                let message = if e.is_retryable() {
                    format!("{}. Your answers were kept, please try again.", e)
                } else {
                    e.to_string()
                };
                self.bus.error("Submission Failed", &message);
                self.phase = QuizPhase::InProgress {
                    confirming_partial_submit: false,
                };
                Err(e)
            }
        }
    }

    /// Leaves the partial-submit confirmation. Returns whether it was showing.
    pub fn cancel_submit(&mut self) -> bool {
        match self.phase {
            QuizPhase::InProgress {
                confirming_partial_submit: true,
            } => {
                self.phase = QuizPhase::InProgress {
                    confirming_partial_submit: false,
                };
                true
            }
            _ => false,
        }
    }

    /// Starts over after a failed result, with a fresh timer.
    pub fn retake(&mut self) -> AppResult<()> {
        match (&self.phase, &self.quiz) {
            (QuizPhase::Completed(result), Some(quiz)) if !result.passed => {
                let quiz = quiz.clone();
                log::info!("Retaking quiz {}", quiz.id);
                self.start_attempt(quiz);
                Ok(())
            }
            (QuizPhase::Completed(_), _) => Err(AppError::InvalidState(
                "A passed quiz cannot be retaken".to_string(),
            )),
            _ => Err(AppError::InvalidState(
                "Only a completed quiz can be retaken".to_string(),
            )),
        }
    }

    /// Advisory auto-save marker. Nothing is sent to the server.
    pub fn mark_saved(&mut self, now: DateTime<Utc>) -> AppResult<()> {
        self.attempt_mut()?.last_saved_at = Some(now);
        Ok(())
    }

    pub fn phase(&self) -> &QuizPhase {
        &self.phase
    }

    pub fn is_in_progress(&self) -> bool {
        matches!(self.phase, QuizPhase::InProgress { .. })
    }

    pub fn is_confirming(&self) -> bool {
        matches!(
            self.phase,
            QuizPhase::InProgress {
                confirming_partial_submit: true
            }
        )
    }

    pub fn quiz(&self) -> Option<&Quiz> {
        self.quiz.as_ref()
    }

    pub fn attempt(&self) -> Option<&QuizAttempt> {
        self.attempt.as_ref()
    }

    pub fn result(&self) -> Option<&QuizResult> {
        match &self.phase {
            QuizPhase::Completed(result) => Some(result),
            _ => None,
        }
    }

    pub fn current_question(&self) -> Option<&QuizQuestion> {
        self.attempt.as_ref()?.current_question()
    }

    pub fn answered_count(&self) -> usize {
        self.attempt.as_ref().map_or(0, QuizAttempt::answered_count)
    }

    pub fn unanswered_count(&self) -> usize {
        self.attempt.as_ref().map_or(0, QuizAttempt::unanswered_count)
    }

    pub fn progress(&self) -> f64 {
        self.attempt.as_ref().map_or(0.0, QuizAttempt::progress)
    }

    pub fn remaining_seconds(&self) -> Option<u64> {
        self.attempt.as_ref()?.remaining_seconds()
    }

    fn attempt_mut(&mut self) -> AppResult<&mut QuizAttempt> {
        if !self.is_in_progress() {
            return Err(AppError::InvalidState(format!(
                "Quiz is not in progress ({})",
                self.phase_name()
            )));
        }
        self.attempt
            .as_mut()
            .ok_or_else(|| AppError::InvalidState("No quiz loaded".to_string()))
    }

    fn phase_name(&self) -> &'static str {
        match self.phase {
            QuizPhase::Loading => "loading",
            QuizPhase::InProgress { .. } => "in progress",
            QuizPhase::Submitting => "submitting",
            QuizPhase::Completed(_) => "completed",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        models::{
            domain::notification::ToastKind,
            dto::quiz_dto::QuizResultDto,
        },
        repositories::quiz_repository::MockQuizRepository,
    };

    fn result_dto(score: f64, max_score: f64) -> QuizResultDto {
        QuizResultDto {
            score,
            max_score,
            percentage: None,
            passed: None,
            points_awarded: Some(10),
            badges_awarded: None,
        }
    }

    fn repository_for(quiz: Quiz) -> MockQuizRepository {
        let mut repository = MockQuizRepository::new();
        repository
            .expect_get_quiz()
            .returning(move |_| Ok(quiz.clone()));
        repository
    }

    async fn loaded_engine(repository: MockQuizRepository) -> (QuizEngine, NotificationBus) {
        let bus = NotificationBus::default();
        let mut engine = QuizEngine::new(Arc::new(repository), bus.clone());
        engine.load(42).await.unwrap();
        (engine, bus)
    }

    #[tokio::test]
    async fn test_load_failure_stays_loading() {
        let mut repository = MockQuizRepository::new();
        repository
            .expect_get_quiz()
            .returning(|_| Err(AppError::NotFound("Endpoint not found: /quizzes/42".to_string())));

        let mut engine = QuizEngine::new(Arc::new(repository), NotificationBus::default());
        assert!(matches!(engine.load(42).await, Err(AppError::QuizLoad(_))));
        assert_eq!(engine.phase(), &QuizPhase::Loading);
        assert!(matches!(
            engine.set_answer(1, "A"),
            Err(AppError::InvalidState(_))
        ));
    }

    #[tokio::test]
    async fn test_set_answer_overwrites_and_is_idempotent() {
        let (mut engine, _) = loaded_engine(repository_for(Quiz::test_quiz(3, None))).await;

        engine.set_answer(2, "A").unwrap();
        engine.set_answer(2, "A").unwrap();
        assert_eq!(engine.answered_count(), 1);

        engine.set_answer(2, "B").unwrap();
        let attempt = engine.attempt().unwrap();
        assert_eq!(attempt.answer(2), Some("B"));
        assert_eq!(attempt.answers().len(), 3);

        assert!(matches!(
            engine.set_answer(99, "A"),
            Err(AppError::ValidationError(_))
        ));
    }

    #[tokio::test]
    async fn test_flags_and_navigation() {
        let (mut engine, _) = loaded_engine(repository_for(Quiz::test_quiz(3, None))).await;

        assert!(engine.toggle_flag(1).unwrap());
        assert!(!engine.toggle_flag(1).unwrap());
        assert!(engine.toggle_flag(99).is_err());

        assert!(!engine.previous());
        assert!(engine.next());
        assert!(engine.go_to(2));
        assert!(!engine.next());
        assert!(!engine.go_to(3));
        assert_eq!(engine.current_question().map(|q| q.id), Some(3));
    }

    #[tokio::test]
    async fn test_partial_submit_requires_confirmation() {
        let mut repository = repository_for(Quiz::test_quiz(3, None));
        repository.expect_submit().never();

        let (mut engine, _) = loaded_engine(repository).await;
        engine.set_answer(1, "A").unwrap();

        let outcome = engine.submit(false).await.unwrap();
        assert_eq!(outcome, SubmitOutcome::ConfirmationRequired { unanswered: 2 });
        assert!(engine.is_confirming());

        assert!(engine.cancel_submit());
        assert!(!engine.is_confirming());
        assert!(!engine.cancel_submit());
    }

    #[tokio::test]
    async fn test_forced_submit_sends_every_question_in_order() {
        let mut repository = repository_for(Quiz::test_quiz(3, None));
        repository
            .expect_submit()
            .withf(|quiz_id, answers| {
                *quiz_id == 42
                    && answers.iter().map(|a| a.question_id).collect::<Vec<_>>() == vec![1, 2, 3]
                    && answers[1].answer == "B"
                    && answers[0].answer.is_empty()
            })
            .times(1)
            .returning(|_, _| Ok(result_dto(1.0, 3.0)));

        let (mut engine, bus) = loaded_engine(repository).await;
        engine.set_answer(2, "B").unwrap();

        match engine.submit(true).await.unwrap() {
            SubmitOutcome::Completed(result) => assert!(!result.passed),
            other => panic!("unexpected outcome: {:?}", other),
        }
        let toasts = bus.toasts();
        assert_eq!(toasts[0].kind, ToastKind::Error);
        assert_eq!(toasts[0].title, "Quiz Failed");
    }

    #[tokio::test]
    async fn test_complete_submit_passes_at_exact_threshold() {
        let mut repository = repository_for(Quiz::test_quiz(10, None));
        repository
            .expect_submit()
            .returning(|_, _| Ok(result_dto(7.0, 10.0)));

        let (mut engine, bus) = loaded_engine(repository).await;
        for id in 1..=10 {
            engine.set_answer(id, "A").unwrap();
        }

        let outcome = engine.submit(false).await.unwrap();
        assert!(matches!(outcome, SubmitOutcome::Completed(ref r) if r.passed));
        assert_eq!(engine.result().map(|r| r.points_awarded), Some(10));
        assert_eq!(bus.toasts()[0].title, "Quiz Passed");
        assert!(engine.retake().is_err());
    }

    #[tokio::test]
    async fn test_failed_submission_keeps_answers() {
        let mut repository = repository_for(Quiz::test_quiz(2, None));
        repository
            .expect_submit()
            .returning(|_, _| Err(AppError::NetworkError("offline".to_string())));

        let (mut engine, bus) = loaded_engine(repository).await;
        engine.set_answer(1, "A").unwrap();
        engine.set_answer(2, "B").unwrap();

        assert!(engine.submit(false).await.is_err());
        assert!(engine.is_in_progress());
        assert_eq!(engine.answered_count(), 2);
        let toast = &bus.toasts()[0];
        assert_eq!(toast.kind, ToastKind::Error);
        assert!(toast.message.ends_with("please try again."));
    }

    #[tokio::test]
    async fn test_rejected_submission_does_not_invite_retry() {
        let mut repository = repository_for(Quiz::test_quiz(1, None));
        repository.expect_submit().returning(|_, _| {
            Err(AppError::ApiError {
                status: 400,
                message: "Quiz is closed".to_string(),
            })
        });

        let (mut engine, bus) = loaded_engine(repository).await;
        engine.set_answer(1, "A").unwrap();

        assert!(engine.submit(false).await.is_err());
        assert_eq!(
            bus.toasts()[0].message,
            "Request failed with status 400: Quiz is closed"
        );
    }

    #[tokio::test]
    async fn test_timer_expiry_submits_once() {
        let mut repository = repository_for(Quiz::test_quiz(2, Some(1)));
        repository
            .expect_submit()
            .times(1)
            .returning(|_, _| Ok(result_dto(0.0, 2.0)));

        let (mut engine, _) = loaded_engine(repository).await;
        assert_eq!(engine.remaining_seconds(), Some(60));

        for _ in 0..59 {
            assert!(matches!(engine.tick().await, TickOutcome::Counted { .. }));
        }
        assert!(matches!(engine.tick().await, TickOutcome::Submitted(_)));
        assert!(matches!(engine.phase(), QuizPhase::Completed(_)));
        assert!(matches!(engine.tick().await, TickOutcome::Idle));
    }

    #[tokio::test]
    async fn test_timer_expiry_after_failed_submit_does_not_retry() {
        let mut repository = repository_for(Quiz::test_quiz(1, Some(1)));
        repository
            .expect_submit()
            .times(1)
            .returning(|_, _| Err(AppError::Timeout));

        let (mut engine, _) = loaded_engine(repository).await;
        for _ in 0..59 {
            engine.tick().await;
        }
        let last = engine.tick().await;

        assert!(matches!(last, TickOutcome::SubmitFailed(AppError::Timeout)));
        assert!(engine.is_in_progress());
        assert_eq!(engine.remaining_seconds(), Some(0));
        assert!(matches!(engine.tick().await, TickOutcome::Idle));
    }

    #[tokio::test]
    async fn test_untimed_quiz_never_counts() {
        let (mut engine, _) = loaded_engine(repository_for(Quiz::test_quiz(2, Some(0)))).await;
        assert_eq!(engine.remaining_seconds(), None);
        assert!(matches!(engine.tick().await, TickOutcome::Idle));
    }

    #[tokio::test]
    async fn test_retake_after_failure_resets_attempt() {
        let mut repository = repository_for(Quiz::test_quiz(2, Some(5)));
        repository
            .expect_submit()
            .returning(|_, _| Ok(result_dto(0.0, 2.0)));

        let (mut engine, _) = loaded_engine(repository).await;
        engine.set_answer(1, "A").unwrap();
        engine.tick().await;
        engine.submit(true).await.unwrap();

        assert!(engine.mark_saved(Utc::now()).is_err());
        engine.retake().unwrap();

        assert!(engine.is_in_progress());
        assert_eq!(engine.answered_count(), 0);
        assert_eq!(engine.remaining_seconds(), Some(300));

        let now = Utc::now();
        engine.mark_saved(now).unwrap();
        assert_eq!(engine.attempt().unwrap().last_saved_at, Some(now));
    }
}
