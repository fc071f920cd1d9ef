use crate::entities::book_entity;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
pub struct BookCreateRequest {
    pub title: String,
    pub author: String,
    pub isbn: String,
    pub language: String,
    pub format: String,
    #[schema(example = "24.99")]
    pub price: Decimal,
    pub stock: i32,
    pub genre_id: i64,
    #[schema(example = "2021-06-15")]
    pub publication_date: NaiveDate,
    #[serde(default)]
    pub is_physical_access: bool,
    #[serde(default)]
    pub is_on_sale: bool,
    #[serde(default)]
    pub discount_percentage: Option<Decimal>,
    #[serde(default)]
    pub discount_start: Option<DateTime<Utc>>,
    #[serde(default)]
    pub discount_end: Option<DateTime<Utc>>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub publisher: String,
    #[serde(default)]
    pub book_type: String,
    #[serde(default)]
    pub is_exclusive_edition: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BookResponse {
    pub id: i64,
    pub title: String,
    pub author: String,
    pub isbn: String,
    pub language: String,
    pub format: String,
    pub price: Decimal,
    pub stock: i32,
    pub genre_id: i64,
    pub genre_name: String,
    pub publication_date: NaiveDate,
    pub is_physical_access: bool,
    pub is_on_sale: bool,
    pub discount_percentage: Decimal,
    pub discount_start: Option<DateTime<Utc>>,
    pub discount_end: Option<DateTime<Utc>>,
    pub description: String,
    pub publisher: String,
    pub book_type: String,
    pub is_exclusive_edition: bool,
    pub average_rating: Decimal,
    pub total_sold: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub images: Vec<String>,
}

impl BookResponse {
    pub fn from_parts(book: book_entity::Model, genre_name: String, images: Vec<String>) -> Self {
        Self {
            id: book.id,
            title: book.title,
            author: book.author,
            isbn: book.isbn,
            language: book.language,
            format: book.format,
            price: book.price,
            stock: book.stock,
            genre_id: book.genre_id,
            genre_name,
            publication_date: book.publication_date,
            is_physical_access: book.is_physical_access,
            is_on_sale: book.is_on_sale,
            discount_percentage: book.discount_percentage,
            discount_start: book.discount_start,
            discount_end: book.discount_end,
            description: book.description,
            publisher: book.publisher,
            book_type: book.book_type,
            is_exclusive_edition: book.is_exclusive_edition,
            average_rating: book.average_rating,
            total_sold: book.total_sold,
            created_at: book.created_at,
            updated_at: book.updated_at,
            images,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct GenreCreateRequest {
    pub name: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct GenreResponse {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BookImageResponse {
    pub id: i64,
    pub url: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct BookFilterQuery {
    pub search: Option<String>,
    pub genre_id: Option<i64>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub sort: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    PriceAsc,
    PriceDesc,
    TitleAsc,
    TitleDesc,
}

impl SortKey {
    /// Unrecognized keys are a no-op: the caller keeps the default order.
    pub fn parse(key: &str) -> Option<Self> {
        match key {
            "price_asc" => Some(SortKey::PriceAsc),
            "price_desc" => Some(SortKey::PriceDesc),
            "title_asc" => Some(SortKey::TitleAsc),
            "title_desc" => Some(SortKey::TitleDesc),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_key_parse() {
        assert_eq!(SortKey::parse("price_asc"), Some(SortKey::PriceAsc));
        assert_eq!(SortKey::parse("price_desc"), Some(SortKey::PriceDesc));
        assert_eq!(SortKey::parse("title_asc"), Some(SortKey::TitleAsc));
        assert_eq!(SortKey::parse("title_desc"), Some(SortKey::TitleDesc));
    }

    #[test]
    fn test_unrecognized_sort_key_is_none() {
        assert_eq!(SortKey::parse("rating"), None);
        assert_eq!(SortKey::parse(""), None);
        assert_eq!(SortKey::parse("PRICE_ASC"), None);
    }
}
