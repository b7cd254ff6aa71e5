use async_trait::async_trait;

use crate::{
    api::ApiClient,
    errors::AppResult,
    models::domain::learner::{
        Assignment, Badge, Certificate, CertificateBlob, CertificateKind, ContentDownload,
        LeaderboardEntry, OfflineContent, ProgressSummary,
    },
};

/// Read-side calls behind the learner dashboards.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LearnerRepository: Send + Sync {
    async fn progress_summary(&self) -> AppResult<ProgressSummary>;
    async fn leaderboard(&self) -> AppResult<Vec<LeaderboardEntry>>;
    async fn assignments(&self) -> AppResult<Vec<Assignment>>;
    async fn earned_badges(&self) -> AppResult<Vec<Badge>>;
    async fn certificate_history(&self) -> AppResult<Vec<Certificate>>;
    async fn preview_certificate(&self, kind: CertificateKind, item_id: i64) -> AppResult<CertificateBlob>;
    async fn download_certificate(&self, kind: CertificateKind, item_id: i64) -> AppResult<CertificateBlob>;
    async fn offline_content(&self) -> AppResult<Vec<OfflineContent>>;
    async fn download_content(&self, content_id: i64) -> AppResult<ContentDownload>;
}

pub struct HttpLearnerRepository {
    api: ApiClient,
}

impl HttpLearnerRepository {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

#[async_trait]
impl LearnerRepository for HttpLearnerRepository {
    async fn progress_summary(&self) -> AppResult<ProgressSummary> {
        self.api.get("/progress/summary").await
    }

    async fn leaderboard(&self) -> AppResult<Vec<LeaderboardEntry>> {
        self.api.get("/leaderboard").await
    }

    async fn assignments(&self) -> AppResult<Vec<Assignment>> {
        self.api.get("/assignments").await
    }

    async fn earned_badges(&self) -> AppResult<Vec<Badge>> {
        self.api.get("/badges/earned").await
    }

    async fn certificate_history(&self) -> AppResult<Vec<Certificate>> {
        self.api.get("/user/certificates/history").await
    }

    async fn preview_certificate(&self, kind: CertificateKind, item_id: i64) -> AppResult<CertificateBlob> {
        self.api
            .get_bytes(&format!("/user/certificates/preview/{}/{}", kind, item_id))
            .await
    }

    async fn download_certificate(&self, kind: CertificateKind, item_id: i64) -> AppResult<CertificateBlob> {
        self.api
            .get_bytes(&format!("/user/certificates/download/{}/{}", kind, item_id))
            .await
    }

    async fn offline_content(&self) -> AppResult<Vec<OfflineContent>> {
        self.api.get("/offline-content").await
    }

    async fn download_content(&self, content_id: i64) -> AppResult<ContentDownload> {
        self.api
            .post(&format!("/content/{}/download", content_id), &serde_json::json!({}))
            .await
    }
}
