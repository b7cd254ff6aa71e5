use std::sync::Arc;

use crate::{
    auth::access_gate::module_decision,
    models::domain::ModuleAccess,
    repositories::ModuleRepository,
    services::notification_bus::NotificationBus,
};

pub struct ModuleAccessService {
    repository: Arc<dyn ModuleRepository>,
    bus: NotificationBus,
}

impl ModuleAccessService {
    pub fn new(repository: Arc<dyn ModuleRepository>, bus: NotificationBus) -> Self {
        Self { repository, bus }
    }

    /// Fetches the module and reads the server's access verdict. Never fails:
    /// a failed fetch leaves the module locked and shows an error toast.
    pub async fn check(&self, module_id: i64) -> ModuleAccess {
        match self.repository.get_module(module_id).await {
            Ok(payload) => {
                let access = module_decision(Some(&payload));
                log::debug!(
                    "Module {} access: {} ({} prerequisites outstanding)",
                    module_id,
                    access.has_access,
                    access.incomplete_prerequisites.len()
                );
                access
            }
            Err(e) => {
                log::warn!("Failed to check access for module {}: {}", module_id, e);
                self.bus.error("Failed to check module access", &e.to_string());
                ModuleAccess::locked()
            }
        }
    }
}
