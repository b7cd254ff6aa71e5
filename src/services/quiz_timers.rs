use std::{sync::Arc, time::Duration};

use chrono::Utc;
use tokio::sync::Mutex;

use crate::{
    errors::AppResult,
    services::{
        quiz_engine::{QuizEngine, TickOutcome},
        scheduled_task::{ScheduledTask, Tick},
    },
};

pub type SharedQuizEngine = Arc<Mutex<QuizEngine>>;

/// A quiz attempt together with the timers driving it. Dropping it stops the timers.
pub struct QuizRun {
    engine: SharedQuizEngine,
    tick_period: Duration,
    autosave_period: Duration,
    countdown: ScheduledTask,
    autosave: ScheduledTask,
}

impl QuizRun {
    /// Starts the countdown and autosave timers for a loaded engine.
    pub fn start(engine: QuizEngine, tick_period: Duration, autosave_period: Duration) -> Self {
        let engine: SharedQuizEngine = Arc::new(Mutex::new(engine));
        Self {
            countdown: spawn_countdown(engine.clone(), tick_period),
            autosave: spawn_autosave(engine.clone(), autosave_period),
            engine,
            tick_period,
            autosave_period,
        }
    }

    pub fn engine(&self) -> &SharedQuizEngine {
        &self.engine
    }

    pub fn countdown(&self) -> &ScheduledTask {
        &self.countdown
    }

    pub fn autosave(&self) -> &ScheduledTask {
        &self.autosave
    }

    /// Retakes a failed attempt. Both timers stopped when the attempt
    /// completed, so fresh ones replace them.
    pub async fn retake(&mut self) -> AppResult<()> {
        self.engine.lock().await.retake()?;
        self.countdown = spawn_countdown(self.engine.clone(), self.tick_period);
        self.autosave = spawn_autosave(self.engine.clone(), self.autosave_period);
        Ok(())
    }
}

/// Drives [`QuizEngine::tick`] every `period` (one second in production).
/// Stops on its own once the attempt is no longer counting down.
pub fn spawn_countdown(engine: SharedQuizEngine, period: Duration) -> ScheduledTask {
    ScheduledTask::every("quiz-countdown", period, move || {
        let engine = Arc::clone(&engine);
        async move {
            let mut engine = engine.lock().await;
            if let TickOutcome::SubmitFailed(e) = engine.tick().await {
                log::warn!("Automatic submission failed: {}", e);
            }
            if engine.is_in_progress() && engine.remaining_seconds().is_some_and(|r| r > 0) {
                Tick::Continue
            } else {
                Tick::Stop
            }
        }
    })
}

/// Marks the attempt as saved every `period` while it is in progress.
pub fn spawn_autosave(engine: SharedQuizEngine, period: Duration) -> ScheduledTask {
    ScheduledTask::every("quiz-autosave", period, move || {
        let engine = Arc::clone(&engine);
        async move {
            let mut engine = engine.lock().await;
            match engine.mark_saved(Utc::now()) {
                Ok(()) => {
                    log::debug!("Quiz progress auto-saved");
                    Tick::Continue
                }
                Err(_) => Tick::Stop,
            }
        }
    })
}
