pub mod auth_repository;
pub mod learner_repository;
pub mod module_repository;
pub mod notification_repository;
pub mod quiz_repository;

pub use auth_repository::{AuthRepository, HttpAuthRepository};
pub use learner_repository::{HttpLearnerRepository, LearnerRepository};
pub use module_repository::{HttpModuleRepository, ModuleRepository};
pub use notification_repository::{HttpNotificationRepository, NotificationRepository};
pub use quiz_repository::{HttpQuizRepository, QuizRepository};
