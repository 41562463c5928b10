use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// A study companion configured by a user. Creation counts against the
/// lifetime companion limit.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Companion {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub subject: String,
    pub topic: String,
    pub created_at: DateTime<Utc>,
}

/// A mock-interview session. Creation counts against the monthly interview
/// limit.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct InterviewSession {
    pub id: Uuid,
    pub user_id: Uuid,
    pub role: String,
    pub level: String,
    pub created_at: DateTime<Utc>,
}

/// An interactive story session. Creation counts against the monthly story
/// limit.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct StorySession {
    pub id: Uuid,
    pub user_id: Uuid,
    pub theme: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateCompanionRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be between 1 and 100 characters"))]
    pub name: String,
    #[validate(length(min = 1, max = 100, message = "Subject must be between 1 and 100 characters"))]
    pub subject: String,
    #[validate(length(min = 1, max = 200, message = "Topic must be between 1 and 200 characters"))]
    pub topic: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct StartInterviewRequest {
    #[validate(length(min = 1, max = 100, message = "Role must be between 1 and 100 characters"))]
    pub role: String,
    #[validate(length(min = 1, max = 50, message = "Level must be between 1 and 50 characters"))]
    pub level: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct StartStoryRequest {
    #[validate(length(min = 1, max = 200, message = "Theme must be between 1 and 200 characters"))]
    pub theme: String,
}
