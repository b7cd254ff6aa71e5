pub mod learner;
pub mod module;
pub mod notification;
pub mod quiz;
pub mod quiz_attempt;
pub mod quiz_question;
pub mod quiz_result;
pub mod session;
pub mod user;
pub use module::{Module, ModuleAccess};
pub use quiz::Quiz;
pub use quiz_attempt::QuizAttempt;
pub use quiz_question::QuizQuestion;
pub use quiz_result::QuizResult;
pub use session::Session;
pub use user::{User, UserRole};
