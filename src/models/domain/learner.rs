use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct ProgressSummary {
    pub total_modules: u32,
    pub completed_modules: u32,
    pub completion_percentage: f64,
    pub total_points: i64,
    pub badges_count: u32,
    #[serde(default)]
    pub recent_activity: Vec<RecentActivity>,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct RecentActivity {
    pub content_id: i64,
    pub content_title: String,
    pub module_title: String,
    pub status: String,
    pub last_accessed: String,
    #[serde(default)]
    pub score: Option<f64>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct LeaderboardEntry {
    pub user_id: i64,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub profile_picture: Option<String>,
    pub total_points: i64,
    pub badges_count: u32,
    pub modules_completed: u32,
    #[serde(default)]
    pub rank: Option<u32>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AssignmentType {
    Individual,
    Department,
    All,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Assignment {
    pub id: i64,
    pub module_id: i64,
    pub assigned_by: i64,
    pub assignment_type: AssignmentType,
    #[serde(default)]
    pub due_date: Option<String>,
    #[serde(default)]
    pub is_mandatory: bool,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub module_title: Option<String>,
    #[serde(default)]
    pub completion_percentage: Option<f64>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Badge {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub earned_at: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CertificateKind {
    Module,
    Quiz,
}

impl fmt::Display for CertificateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CertificateKind::Module => write!(f, "module"),
            CertificateKind::Quiz => write!(f, "quiz"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Certificate {
    pub id: i64,
    pub certificate_type: CertificateKind,
    pub item_id: i64,
    pub certificate_id: String,
    pub generated_at: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub download_url: Option<String>,
}

/// Certificate file as served by the API. The bytes are never inspected.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CertificateBlob {
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct OfflineContent {
    pub id: i64,
    pub title: String,
    pub content_type: String,
    pub size: u64,
    #[serde(default)]
    pub file_path: Option<String>,
    #[serde(default)]
    pub downloaded_at: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct ContentDownload {
    pub download_url: String,
}
