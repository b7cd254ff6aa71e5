use async_trait::async_trait;

use crate::{
    api::ApiClient,
    errors::AppResult,
    models::{
        domain::Quiz,
        dto::{
            quiz_dto::{QuizDto, QuizResultDto},
            request::{QuestionAnswerInput, SubmitQuizRequest},
        },
    },
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QuizRepository: Send + Sync {
    async fn get_quiz(&self, quiz_id: i64) -> AppResult<Quiz>;
    async fn submit(&self, quiz_id: i64, answers: Vec<QuestionAnswerInput>) -> AppResult<QuizResultDto>;
}

pub struct HttpQuizRepository {
    api: ApiClient,
}

impl HttpQuizRepository {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

#[async_trait]
impl QuizRepository for HttpQuizRepository {
    async fn get_quiz(&self, quiz_id: i64) -> AppResult<Quiz> {
        let dto: QuizDto = self.api.get(&format!("/quizzes/{}", quiz_id)).await?;
        Quiz::try_from(dto)
    }

    async fn submit(&self, quiz_id: i64, answers: Vec<QuestionAnswerInput>) -> AppResult<QuizResultDto> {
        self.api
            .post(
                &format!("/quizzes/{}/submit", quiz_id),
                &SubmitQuizRequest { answers },
            )
            .await
    }
}
