use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Module {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub difficulty_level: String,
    #[serde(default)]
    pub estimated_duration: u32,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default)]
    pub completion_percentage: Option<f64>,
}

fn default_active() -> bool {
    true
}

/// Whether the current user may enter a module, and what is still missing if not.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ModuleAccess {
    pub has_access: bool,
    pub incomplete_prerequisites: Vec<PrerequisiteStatus>,
    pub completion_status: CompletionStatus,
}

impl ModuleAccess {
    pub fn locked() -> Self {
        Self::default()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct PrerequisiteStatus {
    pub id: i64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content_completed: u32,
    #[serde(default)]
    pub content_count: u32,
    #[serde(default)]
    pub quiz_passed: bool,
    #[serde(default)]
    pub quiz_count: u32,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct CompletionStatus {
    #[serde(default)]
    pub is_completed: bool,
    #[serde(default)]
    pub content_completed: u32,
    #[serde(default)]
    pub content_count: u32,
    #[serde(default)]
    pub quiz_passed: bool,
    #[serde(default)]
    pub quiz_count: u32,
}
