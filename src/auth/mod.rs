pub mod access_gate;
pub mod claims;
pub mod roles;
pub mod routes;

pub use access_gate::{module_decision, resolve, route_decision, RouteDecision, RoutePolicy};
pub use claims::{read_claims, token_expiry, TokenClaims};
pub use roles::{can_access, has_role, require_session, RoleRequirement};
pub use routes::AppRoute;
