use std::sync::Arc;

use crate::{
    api::{ApiClient, FileTokenStore, SessionTokens, TokenStore},
    config::Config,
    errors::{AppError, AppResult},
    repositories::{
        HttpAuthRepository, HttpLearnerRepository, HttpModuleRepository,
        HttpNotificationRepository, HttpQuizRepository, QuizRepository,
    },
    services::{
        AuthSession, LearnerService, ModuleAccessService, NotificationBus, QuizEngine, QuizRun,
        ScheduledTask, SystemNotificationFeed, ToastSettings,
    },
};

/// Composition root: every long-lived component of the client, wired from [`Config`].
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub tokens: Arc<SessionTokens>,
    pub bus: NotificationBus,
    pub auth: Arc<AuthSession>,
    pub module_access: Arc<ModuleAccessService>,
    pub notifications: Arc<SystemNotificationFeed>,
    pub learner: Arc<LearnerService>,
    quiz_repository: Arc<dyn QuizRepository>,
}

impl AppState {
    pub fn new(config: Config) -> AppResult<Self> {
        let store = Arc::new(FileTokenStore::new(config.token_store_path.clone()));
        Self::with_token_store(config, store)
    }

    pub fn with_token_store(config: Config, store: Arc<dyn TokenStore>) -> AppResult<Self> {
        let tokens = Arc::new(SessionTokens::new(store));
        let api = ApiClient::new(&config.api_base_url, config.request_timeout(), tokens.clone())?;
        let bus = NotificationBus::new(ToastSettings::from(&config));

        let auth = Arc::new(AuthSession::new(
            Arc::new(HttpAuthRepository::new(api.clone())),
            tokens.clone(),
            config.route_policy,
        ));
        let module_access = Arc::new(ModuleAccessService::new(
            Arc::new(HttpModuleRepository::new(api.clone())),
            bus.clone(),
        ));
        let notifications = Arc::new(SystemNotificationFeed::new(
            Arc::new(HttpNotificationRepository::new(api.clone())),
            bus.clone(),
        ));
        let learner = Arc::new(LearnerService::new(Arc::new(HttpLearnerRepository::new(
            api.clone(),
        ))));

        log::info!("Client configured for {}", config.api_base_url);

        Ok(Self {
            config: Arc::new(config),
            tokens,
            bus,
            auth,
            module_access,
            notifications,
            learner,
            quiz_repository: Arc::new(HttpQuizRepository::new(api)),
        })
    }

    pub fn quiz_engine(&self) -> QuizEngine {
        QuizEngine::new(self.quiz_repository.clone(), self.bus.clone())
    }

    /// Loads a quiz, checks that its module is open, and starts its timers.
    pub async fn start_quiz(&self, quiz_id: i64) -> AppResult<QuizRun> {
        let mut engine = self.quiz_engine();
        engine.load(quiz_id).await?;

        if let Some(module_id) = engine.quiz().and_then(|q| q.module_id) {
            if !self.module_access.check(module_id).await.has_access {
                return Err(AppError::Unauthorized(format!(
                    "Module {} has incomplete prerequisites",
                    module_id
                )));
            }
        }

        Ok(QuizRun::start(
            engine,
            std::time::Duration::from_secs(1),
            self.config.autosave_interval(),
        ))
    }

    pub fn start_notification_polling(&self) -> ScheduledTask {
        self.notifications
            .spawn_polling(self.config.notification_poll_interval())
    }
}
