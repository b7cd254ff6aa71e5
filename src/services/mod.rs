pub mod auth_session;
pub mod learner_service;
pub mod module_access_service;
pub mod notification_bus;
pub mod notification_feed;
pub mod quiz_engine;
pub mod quiz_timers;
pub mod scheduled_task;

pub use auth_session::{AuthSession, LoginOutcome, SessionState};
pub use learner_service::{LearnerDashboard, LearnerService};
pub use module_access_service::ModuleAccessService;
pub use notification_bus::{NotificationBus, NotifyMessages, ToastSettings};
pub use notification_feed::SystemNotificationFeed;
pub use quiz_engine::{QuizEngine, QuizPhase, SubmitOutcome, TickOutcome};
pub use quiz_timers::{spawn_autosave, spawn_countdown, QuizRun, SharedQuizEngine};
pub use scheduled_task::{ScheduledTask, Tick};
