use lms_client::{
    app_state::AppState, config::Config, errors::AppResult, services::SessionState,
};

#[tokio::main]
async fn main() -> AppResult<()> {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::from_env();
    if let Err(e) = config.validate_for_production() {
        log::warn!("{}", e);
    }

    let state = AppState::new(config)?;

    match state.auth.initialize().await {
        Some(session) => {
            log::info!(
                "Signed in as {} ({}), landing on {}",
                session.user.full_name(),
                session.role,
                state.auth.resolve(lms_client::auth::AppRoute::Dashboard).await
            );

            let notifications = state.notifications.poll().await;
            log::info!(
                "{} notifications, {} unread",
                notifications.len(),
                state.notifications.unread_count().await
            );
        }
        None => {
            if matches!(state.auth.state().await, SessionState::Anonymous) {
                log::info!("No active session; sign in to continue");
            }
        }
    }

    for toast in state.bus.toasts() {
        log::info!("[{:?}] {}: {}", toast.kind, toast.title, toast.message);
    }

    Ok(())
}
