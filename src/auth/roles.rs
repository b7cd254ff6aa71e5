use crate::{
    errors::{AppError, AppResult},
    models::domain::{Session, UserRole},
};

/// One role or a set of acceptable roles, matched exactly.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RoleRequirement {
    One(UserRole),
    Any(Vec<UserRole>),
}

impl RoleRequirement {
    pub fn matches(&self, role: UserRole) -> bool {
        match self {
            RoleRequirement::One(required) => *required == role,
            RoleRequirement::Any(roles) => roles.contains(&role),
        }
    }
}

impl From<UserRole> for RoleRequirement {
    fn from(role: UserRole) -> Self {
        RoleRequirement::One(role)
    }
}

impl From<Vec<UserRole>> for RoleRequirement {
    fn from(roles: Vec<UserRole>) -> Self {
        RoleRequirement::Any(roles)
    }
}

impl<const N: usize> From<[UserRole; N]> for RoleRequirement {
    fn from(roles: [UserRole; N]) -> Self {
        RoleRequirement::Any(roles.to_vec())
    }
}

/// Exact membership; no hierarchy is applied.
pub fn has_role(session: Option<&Session>, requirement: &RoleRequirement) -> bool {
    session.is_some_and(|s| requirement.matches(s.role))
}

/// Hierarchical check: admin > trainer > user.
pub fn can_access(session: Option<&Session>, required: UserRole) -> bool {
    session.is_some_and(|s| s.role.can_access(required))
}

pub fn require_session(session: Option<&Session>) -> AppResult<&Session> {
    session.ok_or_else(|| AppError::Unauthorized("Authentication required".to_string()))
}
