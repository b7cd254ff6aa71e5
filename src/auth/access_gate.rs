use std::str::FromStr;

use serde_json::Value;

use crate::{
    auth::routes::AppRoute,
    errors::AppError,
    models::domain::{
        module::{CompletionStatus, PrerequisiteStatus},
        ModuleAccess, Session, UserRole,
    },
};

/// How a route's required role is compared with the session role.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RoutePolicy {
    /// The role must match exactly, except that admin passes every guard.
    #[default]
    ExactOrAdmin,
    /// Any role at or above the required level passes.
    Hierarchy,
}

impl RoutePolicy {
    pub fn permits(&self, role: UserRole, required: UserRole) -> bool {
        match self {
            RoutePolicy::ExactOrAdmin => role == required || role == UserRole::Admin,
            RoutePolicy::Hierarchy => role.can_access(required),
        }
    }
}

impl FromStr for RoutePolicy {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "exact_or_admin" | "exact" => Ok(RoutePolicy::ExactOrAdmin),
            "hierarchy" => Ok(RoutePolicy::Hierarchy),
            other => Err(AppError::ValidationError(format!(
                "Unknown route policy '{}'",
                other
            ))),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RouteDecision {
    Allow,
    RedirectToLogin,
    RedirectToUnauthorized,
}

pub fn route_decision(
    session: Option<&Session>,
    required: Option<UserRole>,
    policy: RoutePolicy,
) -> RouteDecision {
    match (session, required) {
        (None, _) => RouteDecision::RedirectToLogin,
        (Some(_), None) => RouteDecision::Allow,
        (Some(session), Some(required)) if policy.permits(session.role, required) => {
            RouteDecision::Allow
        }
        (Some(_), Some(_)) => RouteDecision::RedirectToUnauthorized,
    }
}

/// Final destination for a navigation attempt.
///
/// Public routes are always reachable. `/dashboard` is role-neutral and is
/// replaced by the landing page of the session's role, which is also where a
/// session lacking the required role ends up.
pub fn resolve(route: AppRoute, session: Option<&Session>, policy: RoutePolicy) -> AppRoute {
    if route.is_public() {
        return route;
    }

    let route = match (route, session) {
        (AppRoute::Dashboard, Some(session)) => AppRoute::landing_for(session.role),
        _ => route,
    };

    match route_decision(session, route.required_role(), policy) {
        RouteDecision::Allow => route,
        RouteDecision::RedirectToLogin => AppRoute::Login,
        RouteDecision::RedirectToUnauthorized => {
            session.map_or(AppRoute::Login, |s| AppRoute::landing_for(s.role))
        }
    }
}

/// Reads the access verdict the server attached to a module payload.
///
/// Anything other than a boolean `access` field means the module stays
/// locked with no prerequisites and zero completion.
pub fn module_decision(payload: Option<&Value>) -> ModuleAccess {
    let Some(payload) = payload else {
        return ModuleAccess::locked();
    };

    match payload.get("access").and_then(Value::as_bool) {
        Some(false) => ModuleAccess {
            has_access: false,
            incomplete_prerequisites: prerequisites_of(payload),
            completion_status: CompletionStatus::default(),
        },
        Some(true) => ModuleAccess {
            has_access: true,
            incomplete_prerequisites: Vec::new(),
            completion_status: payload
                .get("completion_status")
                .and_then(|v| serde_json::from_value(v.clone()).ok())
                .unwrap_or_default(),
        },
        None => {
            log::debug!("Module payload carries no boolean 'access' flag, treating as locked");
            ModuleAccess::locked()
        }
    }
}

fn prerequisites_of(payload: &Value) -> Vec<PrerequisiteStatus> {
    payload
        .get("incomplete_prerequisites")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(|item| serde_json::from_value(item.clone()).ok())
                .collect()
        })
        .unwrap_or_default()
}
