use std::fmt;

use crate::models::domain::UserRole;

/// Every screen the client can navigate to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AppRoute {
    Home,
    Login,
    Register,
    Dashboard,
    LearnerDashboard,
    Modules,
    ModuleDetail(i64),
    Quiz(i64),
    Assignments,
    Leaderboard,
    Certificates,
    OfflineContent,
    TrainerDashboard,
    TrainerModules,
    TrainerModuleNew,
    TrainerModuleEdit(i64),
    TrainerLearners,
    TrainerAssignments,
    TrainerReports,
    AdminDashboard,
    AdminUsers,
    AdminModules,
    AdminAnalytics,
    Profile,
    Settings,
}

impl AppRoute {
    pub fn path(&self) -> String {
        match self {
            AppRoute::Home => "/".to_string(),
            AppRoute::Login => "/login".to_string(),
            AppRoute::Register => "/register".to_string(),
            AppRoute::Dashboard => "/dashboard".to_string(),
            AppRoute::LearnerDashboard => "/learner/dashboard".to_string(),
            AppRoute::Modules => "/modules".to_string(),
            AppRoute::ModuleDetail(id) => format!("/modules/{}", id),
            AppRoute::Quiz(id) => format!("/quiz/{}", id),
            AppRoute::Assignments => "/assignments".to_string(),
            AppRoute::Leaderboard => "/leaderboard".to_string(),
            AppRoute::Certificates => "/certificates".to_string(),
            AppRoute::OfflineContent => "/offline".to_string(),
            AppRoute::TrainerDashboard => "/trainer/dashboard".to_string(),
            AppRoute::TrainerModules => "/trainer/modules".to_string(),
            AppRoute::TrainerModuleNew => "/trainer/modules/new".to_string(),
            AppRoute::TrainerModuleEdit(id) => format!("/trainer/modules/{}/edit", id),
            AppRoute::TrainerLearners => "/trainer/learners".to_string(),
            AppRoute::TrainerAssignments => "/trainer/assignments".to_string(),
            AppRoute::TrainerReports => "/trainer/reports".to_string(),
            AppRoute::AdminDashboard => "/admin/dashboard".to_string(),
            AppRoute::AdminUsers => "/admin/users".to_string(),
            AppRoute::AdminModules => "/admin/modules".to_string(),
            AppRoute::AdminAnalytics => "/admin/analytics".to_string(),
            AppRoute::Profile => "/profile".to_string(),
            AppRoute::Settings => "/settings".to_string(),
        }
    }

    /// Unknown paths fall back to the landing page.
    pub fn parse(path: &str) -> Self {
        let segments: Vec<&str> = path.trim_matches('/').split('/').collect();
        let id = |s: &str| s.parse::<i64>().ok();

        match segments.as_slice() {
            ["login"] => AppRoute::Login,
            ["register"] => AppRoute::Register,
            ["dashboard"] => AppRoute::Dashboard,
            ["learner", "dashboard"] => AppRoute::LearnerDashboard,
            ["modules"] => AppRoute::Modules,
            ["modules", raw] => id(raw).map(AppRoute::ModuleDetail).unwrap_or(AppRoute::Home),
            ["quiz", raw] => id(raw).map(AppRoute::Quiz).unwrap_or(AppRoute::Home),
            ["assignments"] => AppRoute::Assignments,
            ["leaderboard"] => AppRoute::Leaderboard,
            ["certificates"] => AppRoute::Certificates,
            ["offline"] => AppRoute::OfflineContent,
            ["trainer", "dashboard"] => AppRoute::TrainerDashboard,
            ["trainer", "modules"] => AppRoute::TrainerModules,
            ["trainer", "modules", "new"] => AppRoute::TrainerModuleNew,
            ["trainer", "modules", raw, "edit"] => {
                id(raw).map(AppRoute::TrainerModuleEdit).unwrap_or(AppRoute::Home)
            }
            ["trainer", "learners"] => AppRoute::TrainerLearners,
            ["trainer", "assignments"] => AppRoute::TrainerAssignments,
            ["trainer", "reports"] => AppRoute::TrainerReports,
            ["admin", "dashboard"] => AppRoute::AdminDashboard,
            ["admin", "users"] => AppRoute::AdminUsers,
            ["admin", "modules"] => AppRoute::AdminModules,
            ["admin", "analytics"] => AppRoute::AdminAnalytics,
            ["profile"] => AppRoute::Profile,
            ["settings"] => AppRoute::Settings,
            _ => AppRoute::Home,
        }
    }

    /// `None` for public routes and for routes any signed-in user may open.
    pub fn required_role(&self) -> Option<UserRole> {
        match self {
            AppRoute::LearnerDashboard
            | AppRoute::Modules
            | AppRoute::ModuleDetail(_)
            | AppRoute::Quiz(_)
            | AppRoute::Assignments
            | AppRoute::Leaderboard
            | AppRoute::Certificates
            | AppRoute::OfflineContent => Some(UserRole::User),
            AppRoute::TrainerDashboard
            | AppRoute::TrainerModules
            | AppRoute::TrainerModuleNew
            | AppRoute::TrainerModuleEdit(_)
            | AppRoute::TrainerLearners
            | AppRoute::TrainerAssignments
            | AppRoute::TrainerReports => Some(UserRole::Trainer),
            AppRoute::AdminDashboard
            | AppRoute::AdminUsers
            | AppRoute::AdminModules
            | AppRoute::AdminAnalytics => Some(UserRole::Admin),
            _ => None,
        }
    }

    pub fn is_public(&self) -> bool {
        matches!(self, AppRoute::Home | AppRoute::Login | AppRoute::Register)
    }

    pub fn landing_for(role: UserRole) -> Self {
        match role {
            UserRole::Admin => AppRoute::AdminDashboard,
            UserRole::Trainer => AppRoute::TrainerDashboard,
            UserRole::User => AppRoute::LearnerDashboard,
        }
    }
}

impl fmt::Display for AppRoute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}
