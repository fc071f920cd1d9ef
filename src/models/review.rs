use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
pub struct ReviewCreateRequest {
    pub book_id: i64,
    #[schema(example = 4, minimum = 1, maximum = 5)]
    pub rating: i32,
    pub comment: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ReviewUpdateRequest {
    #[schema(example = 4, minimum = 1, maximum = 5)]
    pub rating: i32,
    pub comment: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ReviewResponse {
    pub id: i64,
    pub member_id: i64,
    pub member_name: String,
    pub book_id: i64,
    pub book_title: String,
    pub rating: i32,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}
