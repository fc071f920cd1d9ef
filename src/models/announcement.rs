use crate::entities::announcement_entity;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
pub struct AnnouncementCreateRequest {
    /// Target member id; null broadcasts to everyone
    pub member_id: Option<i64>,
    pub title: String,
    pub message: String,
    pub start_date: DateTime<Utc>,
    /// Null keeps the announcement active indefinitely
    pub end_date: Option<DateTime<Utc>>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AnnouncementResponse {
    pub id: i64,
    pub member_id: Option<i64>,
    pub title: String,
    pub message: String,
    pub start_date: DateTime<Utc>,
    pub end_date: Option<DateTime<Utc>>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<announcement_entity::Model> for AnnouncementResponse {
    fn from(a: announcement_entity::Model) -> Self {
        Self {
            id: a.id,
            member_id: a.member_id,
            title: a.title,
            message: a.message,
            start_date: a.start_date,
            end_date: a.end_date,
            is_active: a.is_active,
            created_at: a.created_at,
            updated_at: a.updated_at,
        }
    }
}
