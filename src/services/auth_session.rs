use std::sync::Arc;

use chrono::Utc;
use secrecy::{ExposeSecret, SecretString};
use tokio::sync::{RwLock, RwLockReadGuard};
use validator::Validate;

use crate::{
    api::SessionTokens,
    auth::{
        access_gate::{self, RoutePolicy},
        claims::token_expiry,
        roles::{self, RoleRequirement},
        routes::AppRoute,
    },
    errors::{AppError, AppResult},
    models::{
        domain::{user::UserUpdate, Session, User, UserRole},
        dto::{
            request::{LoginRequest, RegisterData, RegisterRequest},
            response::UserDto,
        },
    },
    repositories::AuthRepository,
};

#[derive(Clone, Debug, Default)]
pub enum SessionState {
    #[default]
    Uninitialized,
    Anonymous,
    Authenticated(Session),
}

impl SessionState {
    pub fn session(&self) -> Option<&Session> {
        match self {
            SessionState::Authenticated(session) => Some(session),
            _ => None,
        }
    }
}

#[derive(Clone, Debug)]
pub struct LoginOutcome {
    pub session: Session,
    pub redirect_target: AppRoute,
}

/// Owns the current identity and its token lifecycle.
pub struct AuthSession {
    repository: Arc<dyn AuthRepository>,
    tokens: Arc<SessionTokens>,
    policy: RoutePolicy,
    state: RwLock<SessionState>,
}

impl AuthSession {
    pub fn new(
        repository: Arc<dyn AuthRepository>,
        tokens: Arc<SessionTokens>,
        policy: RoutePolicy,
    ) -> Self {
        Self {
            repository,
            tokens,
            policy,
            state: RwLock::new(SessionState::Uninitialized),
        }
    }

    /// Restores a persisted session. Never fails: anything that prevents
    /// restoring the session leaves the client anonymous with no stored tokens.
    pub async fn initialize(&self) -> Option<Session> {
        match self.restore().await {
            Ok(Some(session)) => {
                log::info!("Session restored for user {}", session.user_id);
                *self.state.write().await = SessionState::Authenticated(session.clone());
                Some(session)
            }
            Ok(None) => {
                log::debug!("No persisted session found");
                *self.state.write().await = SessionState::Anonymous;
                None
            }
            Err(e) => {
                log::warn!("Could not restore session, continuing anonymously: {}", e);
                self.tokens.clear();
                *self.state.write().await = SessionState::Anonymous;
                None
            }
        }
    }

    async fn restore(&self) -> AppResult<Option<Session>> {
        if !self.tokens.restore()? {
            return Ok(None);
        }

        let expired_locally = self
            .tokens
            .access_token()
            .and_then(|token| token_expiry(token.expose_secret()))
            .is_some_and(|exp| exp <= Utc::now());
        if expired_locally && !self.tokens.has_refresh_token() {
            return Err(AppError::SessionExpired);
        }

        let user = User::try_from(self.repository.profile().await?)?;
        self.session_for(user).map(Some)
    }

    pub async fn login(&self, email: &str, password: &str) -> AppResult<LoginOutcome> {
        let request = LoginRequest::new(email, password);
        request.validate()?;

        let response = self.repository.login(&request).await?;
        if response.success == Some(false) {
            let message = response.message.unwrap_or_else(|| "Login failed".to_string());
            log::info!("Login rejected for {}: {}", request.email, message);
            return Err(AppError::Unauthorized(message));
        }

        self.establish(response.token, response.refresh_token, response.user)
            .await
    }

    pub async fn register(&self, data: RegisterData) -> AppResult<LoginOutcome> {
        let request = RegisterRequest::from(data);
        request.validate()?;

        let response = self.repository.register(&request).await?;
        self.establish(response.token, response.refresh_token, response.user)
            .await
    }

    async fn establish(
        &self,
        token: Option<String>,
        refresh_token: Option<String>,
        user: Option<UserDto>,
    ) -> AppResult<LoginOutcome> {
        let token = token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| AppError::ValidationError("Response did not include a token".to_string()))?;
        let user = user
            .ok_or_else(|| AppError::ValidationError("Response did not include user data".to_string()))
            .and_then(User::try_from)?;

        self.tokens.set(&token, refresh_token.as_deref());
        let session = Session::new(user, SecretString::from(token));
        *self.state.write().await = SessionState::Authenticated(session.clone());

        log::info!("Signed in as {} ({})", session.email, session.role);
        Ok(LoginOutcome {
            redirect_target: AppRoute::landing_for(session.role),
            session,
        })
    }

    /// Best-effort server logout followed by unconditional local teardown.
    pub async fn logout(&self) {
        if self.tokens.access_token().is_some() {
            if let Err(e) = self.repository.logout().await {
                log::warn!("Server logout failed, clearing local session anyway: {}", e);
            }
        }
        self.tokens.clear();
        *self.state.write().await = SessionState::Anonymous;
        log::info!("Signed out");
    }

    /// Re-reads the profile. An expired session signs the user out.
    pub async fn refresh(&self) -> AppResult<Session> {
        let profile = match self.repository.profile().await {
            Ok(profile) => profile,
            Err(AppError::SessionExpired) => {
                log::info!("Session expired during refresh");
                self.logout().await;
                return Err(AppError::SessionExpired);
            }
            Err(e) => return Err(e),
        };

        let session = self.session_for(User::try_from(profile)?)?;
        *self.state.write().await = SessionState::Authenticated(session.clone());
        Ok(session)
    }

    pub async fn update_user(&self, update: UserUpdate) -> AppResult<Session> {
        let mut state = self.state.write().await;
        self.end_if_orphaned(&mut state);
        let current = roles::require_session(state.session())?;

        let mut user = current.user.clone();
        user.apply(update);
        let session = Session::new(user, current.token.clone());
        *state = SessionState::Authenticated(session.clone());
        Ok(session)
    }

    pub async fn state(&self) -> SessionState {
        self.current_state().await.clone()
    }

    pub async fn current_session(&self) -> Option<Session> {
        self.current_state().await.session().cloned()
    }

    pub async fn is_authenticated(&self) -> bool {
        matches!(*self.current_state().await, SessionState::Authenticated(_))
    }

    pub async fn role(&self) -> Option<UserRole> {
        self.current_state().await.session().map(|s| s.role)
    }

    pub async fn has_role(&self, requirement: impl Into<RoleRequirement>) -> bool {
        roles::has_role(self.current_state().await.session(), &requirement.into())
    }

    pub async fn can_access(&self, required: UserRole) -> bool {
        roles::can_access(self.current_state().await.session(), required)
    }

    /// Where a navigation attempt to `route` actually lands.
    pub async fn resolve(&self, route: AppRoute) -> AppRoute {
        access_gate::resolve(route, self.current_state().await.session(), self.policy)
    }

    /// Reads the state, first ending a session whose tokens were cleared
    /// underneath it (the API client does so on an unrecoverable 401).
    async fn current_state(&self) -> RwLockReadGuard<'_, SessionState> {
        {
            let state = self.state.read().await;
            if !self.is_orphaned(&state) {
                return state;
            }
        }
        let mut state = self.state.write().await;
        self.end_if_orphaned(&mut state);
        state.downgrade()
    }

    fn is_orphaned(&self, state: &SessionState) -> bool {
        matches!(state, SessionState::Authenticated(_)) && self.tokens.access_token().is_none()
    }

    fn end_if_orphaned(&self, state: &mut SessionState) {
        if self.is_orphaned(state) {
            log::info!("Session tokens were revoked, signing out locally");
            *state = SessionState::Anonymous;
        }
    }

    fn session_for(&self, user: User) -> AppResult<Session> {
        let token = self.tokens.access_token().ok_or(AppError::SessionExpired)?;
        Ok(Session::new(user, token))
    }
}
