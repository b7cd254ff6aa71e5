use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::RwLock;

use lms_client::{
    api::{MemoryTokenStore, SessionTokens, TokenStore},
    auth::{AppRoute, RoutePolicy},
    errors::{AppError, AppResult},
    models::{
        domain::{
            notification::SystemNotification,
            quiz_question::{QuizQuestion, QuizQuestionType},
            Quiz, UserRole,
        },
        dto::{
            quiz_dto::QuizResultDto,
            request::{LoginRequest, QuestionAnswerInput, RegisterData, RegisterRequest},
            response::{LoginResponse, RegisterResponse, UserDto},
        },
    },
    repositories::{AuthRepository, NotificationRepository, QuizRepository},
    services::{
        AuthSession, NotificationBus, QuizEngine, QuizPhase, SubmitOutcome,
        SystemNotificationFeed, ToastSettings,
    },
};

fn question(id: i64) -> QuizQuestion {
    QuizQuestion {
        id,
        question_text: format!("Question {}", id),
        question_type: QuizQuestionType::MultipleChoice,
        options: vec!["A".to_string(), "B".to_string(), "C".to_string()],
        points: 1.0,
        explanation: None,
    }
}

fn quiz(id: i64, question_count: i64, passing_score: f64) -> Quiz {
    Quiz {
        id,
        module_id: Some(id * 100),
        title: format!("Quiz {}", id),
        description: None,
        passing_score,
        time_limit_minutes: Some(5),
        questions: (1..=question_count).map(question).collect(),
    }
}

/// Grades submissions against an answer key, one point per correct answer.
struct InMemoryQuizRepository {
    quizzes: Arc<RwLock<HashMap<i64, Quiz>>>,
    answer_keys: Arc<RwLock<HashMap<i64, HashMap<i64, String>>>>,
    submissions: Arc<RwLock<Vec<(i64, Vec<QuestionAnswerInput>)>>>,
}

impl InMemoryQuizRepository {
    fn new() -> Self {
        Self {
            quizzes: Arc::new(RwLock::new(HashMap::new())),
            answer_keys: Arc::new(RwLock::new(HashMap::new())),
            submissions: Arc::new(RwLock::new(Vec::new())),
        }
    }

    async fn insert(&self, quiz: Quiz, key: &[(i64, &str)]) {
        let key = key.iter().map(|(id, a)| (*id, a.to_string())).collect();
        self.answer_keys.write().await.insert(quiz.id, key);
        self.quizzes.write().await.insert(quiz.id, quiz);
    }
}

#[async_trait]
impl QuizRepository for InMemoryQuizRepository {
    async fn get_quiz(&self, quiz_id: i64) -> AppResult<Quiz> {
        self.quizzes
            .read()
            .await
            .get(&quiz_id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("Quiz {} not found", quiz_id)))
    }

    async fn submit(&self, quiz_id: i64, answers: Vec<QuestionAnswerInput>) -> AppResult<QuizResultDto> {
        let keys = self.answer_keys.read().await;
        let key = keys
            .get(&quiz_id)
            .ok_or_else(|| AppError::NotFound(format!("Quiz {} not found", quiz_id)))?;

        let score = answers
            .iter()
            .filter(|a| key.get(&a.question_id) == Some(&a.answer))
            .count() as f64;
        self.submissions.write().await.push((quiz_id, answers));

        Ok(QuizResultDto {
            score,
            max_score: key.len() as f64,
            percentage: None,
            passed: None,
            points_awarded: Some(score as i64 * 10),
            badges_awarded: None,
        })
    }
}

/// Accounts keyed by email. Passwords are stored in clear for the test.
struct InMemoryAuthRepository {
    accounts: Arc<RwLock<HashMap<String, (String, UserDto)>>>,
    signed_in: Arc<RwLock<Option<String>>>,
    next_id: Arc<RwLock<i64>>,
}

impl InMemoryAuthRepository {
    fn new() -> Self {
        Self {
            accounts: Arc::new(RwLock::new(HashMap::new())),
            signed_in: Arc::new(RwLock::new(None)),
            next_id: Arc::new(RwLock::new(1)),
        }
    }

    async fn create_account(&self, email: &str, password: &str, role: &str) -> UserDto {
        let mut next_id = self.next_id.write().await;
        let user = UserDto {
            id: Some(*next_id),
            email: Some(email.to_string()),
            first_name: Some("Casey".to_string()),
            last_name: Some("Learner".to_string()),
            role: Some(role.to_string()),
            ..UserDto::default()
        };
        *next_id += 1;
        self.accounts
            .write()
            .await
            .insert(email.to_string(), (password.to_string(), user.clone()));
        user
    }
}

#[async_trait]
impl AuthRepository for InMemoryAuthRepository {
    async fn login(&self, request: &LoginRequest) -> AppResult<LoginResponse> {
        let accounts = self.accounts.read().await;
        match accounts.get(&request.email) {
            Some((password, user)) if *password == request.password => {
                *self.signed_in.write().await = Some(request.email.clone());
                Ok(LoginResponse {
                    success: Some(true),
                    message: None,
                    token: Some(format!("token-{}", request.email)),
                    refresh_token: Some("refresh".to_string()),
                    user: Some(user.clone()),
                })
            }
            _ => Ok(LoginResponse {
                success: Some(false),
                message: Some("Invalid email or password".to_string()),
                token: None,
                refresh_token: None,
                user: None,
            }),
        }
    }

    async fn register(&self, request: &RegisterRequest) -> AppResult<RegisterResponse> {
        if self.accounts.read().await.contains_key(&request.email) {
            return Err(AppError::ApiError {
                status: 409,
                message: "Email already registered".to_string(),
            });
        }
        let user = self
            .create_account(&request.email, &request.password, &request.role)
            .await;
        *self.signed_in.write().await = Some(request.email.clone());
        Ok(RegisterResponse {
            token: Some(format!("token-{}", request.email)),
            refresh_token: None,
            user: Some(user),
        })
    }

    async fn logout(&self) -> AppResult<()> {
        *self.signed_in.write().await = None;
        Ok(())
    }

    async fn profile(&self) -> AppResult<UserDto> {
        let signed_in = self.signed_in.read().await;
        let email = signed_in.as_ref().ok_or(AppError::SessionExpired)?;
        self.accounts
            .read()
            .await
            .get(email)
            .map(|(_, user)| user.clone())
            .ok_or(AppError::SessionExpired)
    }
}

struct InMemoryNotificationRepository {
    notifications: Arc<RwLock<Vec<SystemNotification>>>,
}

impl InMemoryNotificationRepository {
    fn with(notifications: Vec<SystemNotification>) -> Self {
        Self {
            notifications: Arc::new(RwLock::new(notifications)),
        }
    }
}

#[async_trait]
impl NotificationRepository for InMemoryNotificationRepository {
    async fn list(&self) -> AppResult<Vec<SystemNotification>> {
        let mut list = self.notifications.read().await.clone();
        list.sort_by_key(|n| n.is_read);
        Ok(list)
    }

    async fn mark_read(&self, notification_ids: Vec<i64>) -> AppResult<()> {
        let mut notifications = self.notifications.write().await;
        for n in notifications.iter_mut().filter(|n| notification_ids.contains(&n.id)) {
            n.is_read = true;
        }
        Ok(())
    }

    async fn mark_all_read(&self) -> AppResult<()> {
        self.notifications
            .write()
            .await
            .iter_mut()
            .for_each(|n| n.is_read = true);
        Ok(())
    }
}

fn notification(id: i64, is_read: bool) -> SystemNotification {
    SystemNotification {
        id,
        title: format!("Notice {}", id),
        message: "A module was assigned to you".to_string(),
        is_read,
        created_at: None,
        action_url: None,
    }
}

fn bus() -> NotificationBus {
    NotificationBus::new(ToastSettings::default())
}

#[tokio::test]
async fn test_quiz_contract_full_marks_pass() {
    let repository = Arc::new(InMemoryQuizRepository::new());
    repository
        .insert(quiz(1, 3, 70.0), &[(1, "A"), (2, "B"), (3, "C")])
        .await;
    let bus = bus();

    let mut engine = QuizEngine::new(repository.clone(), bus.clone());
    engine.load(1).await.unwrap();
    engine.set_answer(1, "A").unwrap();
    engine.set_answer(2, "B").unwrap();
    engine.set_answer(3, "C").unwrap();

    let outcome = engine.submit(false).await.unwrap();
    let SubmitOutcome::Completed(result) = outcome else {
        panic!("expected a completed submission, got {:?}", outcome);
    };
    assert!(result.passed);
    assert_eq!(result.percentage, 100.0);
    assert_eq!(result.points_awarded, 30);
    assert_eq!(bus.toasts()[0].title, "Quiz Passed");
}

#[tokio::test]
async fn test_quiz_contract_partial_submit_sends_empty_answers() {
    let repository = Arc::new(InMemoryQuizRepository::new());
    repository
        .insert(quiz(2, 4, 50.0), &[(1, "A"), (2, "A"), (3, "A"), (4, "A")])
        .await;

    let mut engine = QuizEngine::new(repository.clone(), bus());
    engine.load(2).await.unwrap();
    engine.set_answer(1, "A").unwrap();
    engine.set_answer(3, "A").unwrap();

    assert_eq!(
        engine.submit(false).await.unwrap(),
        SubmitOutcome::ConfirmationRequired { unanswered: 2 }
    );
    assert!(repository.submissions.read().await.is_empty());

    engine.submit(true).await.unwrap();
    let submissions = repository.submissions.read().await;
    let (quiz_id, answers) = &submissions[0];
    assert_eq!(*quiz_id, 2);
    let sent: Vec<(i64, &str)> = answers.iter().map(|a| (a.question_id, a.answer.as_str())).collect();
    assert_eq!(sent, vec![(1, "A"), (2, ""), (3, "A"), (4, "")]);

    // 2 of 4 meets a 50% passing score exactly
    assert!(engine.result().unwrap().passed);
}

#[tokio::test]
async fn test_quiz_contract_failed_attempt_can_be_retaken() {
    let repository = Arc::new(InMemoryQuizRepository::new());
    repository.insert(quiz(3, 2, 80.0), &[(1, "A"), (2, "A")]).await;

    let mut engine = QuizEngine::new(repository.clone(), bus());
    engine.load(3).await.unwrap();
    engine.set_answer(1, "A").unwrap();
    engine.set_answer(2, "C").unwrap();
    engine.submit(false).await.unwrap();
    assert!(!engine.result().unwrap().passed);

    engine.retake().unwrap();
    assert!(engine.is_in_progress());
    assert_eq!(engine.answered_count(), 0);
    assert_eq!(engine.remaining_seconds(), Some(300));

    engine.set_answer(1, "A").unwrap();
    engine.set_answer(2, "A").unwrap();
    engine.submit(false).await.unwrap();
    assert!(engine.result().unwrap().passed);
    assert!(engine.retake().is_err());
    assert_eq!(repository.submissions.read().await.len(), 2);
}

#[tokio::test]
async fn test_quiz_contract_missing_quiz_is_a_load_error() {
    let mut engine = QuizEngine::new(Arc::new(InMemoryQuizRepository::new()), bus());
    let result = engine.load(404).await;

    assert!(matches!(result, Err(AppError::QuizLoad(_))));
    assert_eq!(engine.phase(), &QuizPhase::Loading);
}

fn auth_session(repository: Arc<InMemoryAuthRepository>, store: Arc<MemoryTokenStore>) -> AuthSession {
    AuthSession::new(
        repository,
        Arc::new(SessionTokens::new(store)),
        RoutePolicy::default(),
    )
}

#[tokio::test]
async fn test_auth_contract_login_persists_and_restores() {
    let repository = Arc::new(InMemoryAuthRepository::new());
    repository.create_account("trainer@example.com", "secret1", "TRAINER").await;
    let store = Arc::new(MemoryTokenStore::new());

    let session = auth_session(repository.clone(), store.clone());
    let outcome = session.login("trainer@example.com", "secret1").await.unwrap();
    assert_eq!(outcome.session.role, UserRole::Trainer);
    assert_eq!(outcome.redirect_target, AppRoute::TrainerDashboard);
    assert_eq!(
        store.load().unwrap().auth_token.as_deref(),
        Some("token-trainer@example.com")
    );

    // A fresh process restores the same identity from the store.
    let restored = auth_session(repository, store).initialize().await.unwrap();
    assert_eq!(restored.email, "trainer@example.com");
    assert_eq!(restored.role, UserRole::Trainer);
}

#[tokio::test]
async fn test_auth_contract_wrong_password_is_rejected() {
    let repository = Arc::new(InMemoryAuthRepository::new());
    repository.create_account("user@example.com", "secret1", "user").await;
    let store = Arc::new(MemoryTokenStore::new());
    let session = auth_session(repository, store.clone());

    let result = session.login("user@example.com", "nope").await;
    assert!(matches!(result, Err(AppError::Unauthorized(ref m)) if m == "Invalid email or password"));
    assert!(!session.is_authenticated().await);
    assert!(store.load().unwrap().is_empty());
}

#[tokio::test]
async fn test_auth_contract_register_then_logout() {
    let repository = Arc::new(InMemoryAuthRepository::new());
    let store = Arc::new(MemoryTokenStore::new());
    let session = auth_session(repository.clone(), store.clone());

    let outcome = session
        .register(RegisterData {
            email: "new@example.com".to_string(),
            password: "secret1".to_string(),
            first_name: "New".to_string(),
            last_name: "Learner".to_string(),
            role: "user".to_string(),
            ..RegisterData::default()
        })
        .await
        .unwrap();
    assert_eq!(outcome.redirect_target, AppRoute::LearnerDashboard);
    assert_eq!(session.resolve(AppRoute::AdminUsers).await, AppRoute::LearnerDashboard);

    session.logout().await;
    assert!(!session.is_authenticated().await);
    assert!(store.load().unwrap().is_empty());
    assert!(repository.signed_in.read().await.is_none());
    assert_eq!(session.resolve(AppRoute::Profile).await, AppRoute::Login);
}

#[tokio::test]
async fn test_auth_contract_refresh_after_server_logout_signs_out() {
    let repository = Arc::new(InMemoryAuthRepository::new());
    repository.create_account("user@example.com", "secret1", "user").await;
    let session = auth_session(repository.clone(), Arc::new(MemoryTokenStore::new()));
    session.login("user@example.com", "secret1").await.unwrap();

    *repository.signed_in.write().await = None;

    assert!(matches!(session.refresh().await, Err(AppError::SessionExpired)));
    assert!(!session.is_authenticated().await);
}

#[tokio::test]
async fn test_notification_contract_mark_read_round_trip() {
    let repository = Arc::new(InMemoryNotificationRepository::with(vec![
        notification(1, true),
        notification(2, false),
        notification(3, false),
    ]));
    let feed = SystemNotificationFeed::new(repository.clone(), bus());

    let list = feed.poll().await;
    assert_eq!(list.iter().map(|n| n.id).collect::<Vec<_>>(), vec![2, 3, 1]);
    assert_eq!(feed.unread_count().await, 2);

    assert!(feed.mark_read(2).await);
    assert_eq!(feed.unread_count().await, 1);
    feed.poll().await;
    assert_eq!(feed.unread_count().await, 1);

    assert!(feed.mark_all_read().await);
    feed.poll().await;
    assert_eq!(feed.unread_count().await, 0);
    assert!(repository.notifications.read().await.iter().all(|n| n.is_read));
}
