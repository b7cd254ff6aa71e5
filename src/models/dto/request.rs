use serde::Serialize;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

impl LoginRequest {
    pub fn new(email: &str, password: &str) -> Self {
        Self {
            email: email.trim().to_string(),
            password: password.to_string(),
        }
    }
}

/// Registration form as entered by the user.
#[derive(Debug, Clone, Default)]
pub struct RegisterData {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub role: String,
    pub employer_id: Option<i64>,
    pub department_id: Option<i64>,
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Serialize, Validate)]
pub struct RegisterRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,

    #[validate(length(min = 1, max = 100))]
    pub first_name: String,

    #[validate(length(min = 1, max = 100))]
    pub last_name: String,

    #[validate(length(min = 1))]
    pub role: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub employer_id: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub department_id: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

impl From<RegisterData> for RegisterRequest {
    fn from(data: RegisterData) -> Self {
        RegisterRequest {
            email: data.email.trim().to_string(),
            password: data.password,
            first_name: data.first_name.trim().to_string(),
            last_name: data.last_name.trim().to_string(),
            role: data.role.trim().to_lowercase(),
            employer_id: data.employer_id,
            department_id: data.department_id,
            phone: data.phone,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RefreshTokenRequest {
    pub refresh_token: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuestionAnswerInput {
    pub question_id: i64,
    pub answer: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SubmitQuizRequest {
    pub answers: Vec<QuestionAnswerInput>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MarkNotificationsReadRequest {
    pub notification_ids: Vec<i64>,
}
