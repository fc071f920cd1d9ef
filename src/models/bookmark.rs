use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct BookmarkResponse {
    pub book_id: i64,
    pub title: String,
    pub author: String,
    pub price: Decimal,
    pub images: Vec<String>,
}
