use crate::entities::{
    book_entity as books, member_entity as members, review_entity as reviews,
};
use crate::error::{AppError, AppResult};
use crate::models::*;
use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    IntoActiveModel, ModelTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use std::collections::HashMap;

#[derive(Clone)]
pub struct ReviewService {
    pool: DatabaseConnection,
}

/// Arithmetic mean rounded to 2 decimal places, 0 when no reviews remain.
fn average_rating(ratings: &[i32]) -> Decimal {
    if ratings.is_empty() {
        return Decimal::ZERO;
    }
    let sum: i64 = ratings.iter().map(|r| i64::from(*r)).sum();
    (Decimal::from(sum) / Decimal::from(ratings.len() as i64)).round_dp(2)
}

impl ReviewService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    pub async fn create_review(
        &self,
        member_id: i64,
        request: ReviewCreateRequest,
    ) -> AppResult<ReviewResponse> {
        validate_rating(request.rating)?;

        books::Entity::find_by_id(request.book_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Book not found".to_string()))?;

        let already_exists = reviews::Entity::find()
            .filter(reviews::Column::MemberId.eq(member_id))
            .filter(reviews::Column::BookId.eq(request.book_id))
            .one(&self.pool)
            .await?
            .is_some();
        if already_exists {
            return Err(AppError::Conflict(
                "You have already reviewed this book".to_string(),
            ));
        }

        let txn = self.pool.begin().await?;

        let now = Utc::now();
        let review = reviews::ActiveModel {
            member_id: Set(member_id),
            book_id: Set(request.book_id),
            rating: Set(request.rating),
            comment: Set(request.comment),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        self.recompute_average_rating(&txn, request.book_id).await?;
        txn.commit().await?;

        self.build_response(review).await
    }

    pub async fn update_review(
        &self,
        member_id: i64,
        id: i64,
        request: ReviewUpdateRequest,
    ) -> AppResult<ReviewResponse> {
        validate_rating(request.rating)?;

        let review = reviews::Entity::find_by_id(id)
            .filter(reviews::Column::MemberId.eq(member_id))
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Review not found or not yours".to_string()))?;

        let book_id = review.book_id;
        let txn = self.pool.begin().await?;

        let mut model = review.into_active_model();
        model.rating = Set(request.rating);
        model.comment = Set(request.comment);
        model.updated_at = Set(Utc::now());
        let review = model.update(&txn).await?;

        self.recompute_average_rating(&txn, book_id).await?;
        txn.commit().await?;

        self.build_response(review).await
    }

    pub async fn delete_review(&self, member_id: i64, id: i64) -> AppResult<()> {
        let review = reviews::Entity::find_by_id(id)
            .filter(reviews::Column::MemberId.eq(member_id))
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Review not found or not yours".to_string()))?;

        let book_id = review.book_id;
        let txn = self.pool.begin().await?;

        review.delete(&txn).await?;
        self.recompute_average_rating(&txn, book_id).await?;
        txn.commit().await?;

        Ok(())
    }

    pub async fn reviews_for_book(&self, book_id: i64) -> AppResult<Vec<ReviewResponse>> {
        books::Entity::find_by_id(book_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Book not found".to_string()))?;

        let models = reviews::Entity::find()
            .filter(reviews::Column::BookId.eq(book_id))
            .order_by_desc(reviews::Column::CreatedAt)
            .all(&self.pool)
            .await?;
        self.build_responses(models).await
    }

    pub async fn my_reviews(&self, member_id: i64) -> AppResult<Vec<ReviewResponse>> {
        let models = reviews::Entity::find()
            .filter(reviews::Column::MemberId.eq(member_id))
            .order_by_desc(reviews::Column::CreatedAt)
            .all(&self.pool)
            .await?;
        self.build_responses(models).await
    }

    pub async fn get_review(&self, id: i64) -> AppResult<ReviewResponse> {
        let review = reviews::Entity::find_by_id(id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Review not found".to_string()))?;
        self.build_response(review).await
    }

    // full re-scan; fine at this catalog's scale
    async fn recompute_average_rating<C: ConnectionTrait>(
        &self,
        conn: &C,
        book_id: i64,
    ) -> AppResult<()> {
        let ratings: Vec<i32> = reviews::Entity::find()
            .filter(reviews::Column::BookId.eq(book_id))
            .all(conn)
            .await?
            .into_iter()
            .map(|r| r.rating)
            .collect();

        let Some(book) = books::Entity::find_by_id(book_id).one(conn).await? else {
            return Ok(());
        };

        let mut model = book.into_active_model();
        model.average_rating = Set(average_rating(&ratings));
        model.update(conn).await?;

        Ok(())
    }

    async fn build_response(&self, review: reviews::Model) -> AppResult<ReviewResponse> {
        let mut responses = self.build_responses(vec![review]).await?;
        Ok(responses.remove(0))
    }

    async fn build_responses(
        &self,
        models: Vec<reviews::Model>,
    ) -> AppResult<Vec<ReviewResponse>> {
        if models.is_empty() {
            return Ok(Vec::new());
        }

        let member_ids: Vec<i64> = models.iter().map(|r| r.member_id).collect();
        let member_names: HashMap<i64, String> = members::Entity::find()
            .filter(members::Column::Id.is_in(member_ids))
            .all(&self.pool)
            .await?
            .into_iter()
            .map(|m| (m.id, m.name))
            .collect();

        let book_ids: Vec<i64> = models.iter().map(|r| r.book_id).collect();
        let book_titles: HashMap<i64, String> = books::Entity::find()
            .filter(books::Column::Id.is_in(book_ids))
            .all(&self.pool)
            .await?
            .into_iter()
            .map(|b| (b.id, b.title))
            .collect();

        Ok(models
            .into_iter()
            .map(|review| ReviewResponse {
                id: review.id,
                member_id: review.member_id,
                member_name: member_names
                    .get(&review.member_id)
                    .cloned()
                    .unwrap_or_else(|| "Unknown".to_string()),
                book_id: review.book_id,
                book_title: book_titles
                    .get(&review.book_id)
                    .cloned()
                    .unwrap_or_else(|| "Unknown".to_string()),
                rating: review.rating,
                comment: review.comment,
                created_at: review.created_at,
            })
            .collect())
    }
}

fn validate_rating(rating: i32) -> AppResult<()> {
    if !(1..=5).contains(&rating) {
        return Err(AppError::ValidationError(
            "Rating must be between 1 and 5".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_average_rating_mean_rounded_to_two_places() {
        assert_eq!(average_rating(&[5, 4]), Decimal::new(450, 2));
        assert_eq!(average_rating(&[5, 4, 4]), Decimal::new(433, 2));
        assert_eq!(average_rating(&[1, 2, 2]), Decimal::new(167, 2));
        assert_eq!(average_rating(&[3]), Decimal::from(3));
    }

    #[test]
    fn test_average_rating_empty_resets_to_zero() {
        assert_eq!(average_rating(&[]), Decimal::ZERO);
    }

    #[test]
    fn test_validate_rating_bounds() {
        assert!(validate_rating(1).is_ok());
        assert!(validate_rating(5).is_ok());
        assert!(validate_rating(0).is_err());
        assert!(validate_rating(6).is_err());
    }
}
