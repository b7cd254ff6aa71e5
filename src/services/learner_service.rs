use std::sync::Arc;

use crate::{
    errors::AppResult,
    models::domain::learner::{
        Assignment, Badge, Certificate, CertificateBlob, CertificateKind, ContentDownload,
        LeaderboardEntry, OfflineContent, ProgressSummary,
    },
    repositories::LearnerRepository,
};

/// Everything the learner dashboard shows on first paint.
#[derive(Clone, Debug, PartialEq)]
pub struct LearnerDashboard {
    pub summary: ProgressSummary,
    pub assignments: Vec<Assignment>,
    pub badges: Vec<Badge>,
    pub leaderboard: Vec<LeaderboardEntry>,
}

impl LearnerDashboard {
    /// Assignments the learner has not finished yet, mandatory ones first.
    pub fn open_assignments(&self) -> Vec<&Assignment> {
        let mut open: Vec<&Assignment> = self
            .assignments
            .iter()
            .filter(|a| a.completion_percentage.unwrap_or(0.0) < 100.0)
            .collect();
        open.sort_by_key(|a| !a.is_mandatory);
        open
    }
}

pub struct LearnerService {
    repository: Arc<dyn LearnerRepository>,
}

impl LearnerService {
    pub fn new(repository: Arc<dyn LearnerRepository>) -> Self {
        Self { repository }
    }

    /// Fetches the dashboard sections concurrently; the first failure wins.
    pub async fn dashboard(&self) -> AppResult<LearnerDashboard> {
        let (summary, assignments, badges, leaderboard) = futures::try_join!(
            self.repository.progress_summary(),
            self.repository.assignments(),
            self.repository.earned_badges(),
            self.repository.leaderboard(),
        )?;

        Ok(LearnerDashboard {
            summary,
            assignments,
            badges,
            leaderboard,
        })
    }

    pub async fn certificates(&self) -> AppResult<Vec<Certificate>> {
        self.repository.certificate_history().await
    }

    pub async fn preview_certificate(&self, kind: CertificateKind, item_id: i64) -> AppResult<CertificateBlob> {
        self.repository.preview_certificate(kind, item_id).await
    }

    pub async fn download_certificate(&self, kind: CertificateKind, item_id: i64) -> AppResult<CertificateBlob> {
        self.repository.download_certificate(kind, item_id).await
    }

    pub async fn offline_content(&self) -> AppResult<Vec<OfflineContent>> {
        self.repository.offline_content().await
    }

    pub async fn download_content(&self, content_id: i64) -> AppResult<ContentDownload> {
        self.repository.download_content(content_id).await
    }
}
