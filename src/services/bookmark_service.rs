use crate::entities::{
    book_entity as books, book_image_entity as book_images, bookmark_entity as bookmarks,
};
use crate::error::{AppError, AppResult};
use crate::models::*;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, QueryFilter,
    QueryOrder, Set,
};
use std::collections::HashMap;

#[derive(Clone)]
pub struct BookmarkService {
    pool: DatabaseConnection,
}

impl BookmarkService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    pub async fn list_bookmarks(&self, member_id: i64) -> AppResult<Vec<BookmarkResponse>> {
        let models = bookmarks::Entity::find()
            .filter(bookmarks::Column::MemberId.eq(member_id))
            .order_by_desc(bookmarks::Column::CreatedAt)
            .all(&self.pool)
            .await?;
        if models.is_empty() {
            return Ok(Vec::new());
        }

        let book_ids: Vec<i64> = models.iter().map(|b| b.book_id).collect();
        let book_map: HashMap<i64, books::Model> = books::Entity::find()
            .filter(books::Column::Id.is_in(book_ids.clone()))
            .all(&self.pool)
            .await?
            .into_iter()
            .map(|b| (b.id, b))
            .collect();

        let mut images_by_book: HashMap<i64, Vec<String>> = HashMap::new();
        for image in book_images::Entity::find()
            .filter(book_images::Column::BookId.is_in(book_ids))
            .all(&self.pool)
            .await?
        {
            images_by_book
                .entry(image.book_id)
                .or_default()
                .push(image.url);
        }

        Ok(models
            .into_iter()
            .filter_map(|bookmark| {
                let book = book_map.get(&bookmark.book_id)?;
                Some(BookmarkResponse {
                    book_id: book.id,
                    title: book.title.clone(),
                    author: book.author.clone(),
                    price: book.price,
                    images: images_by_book.remove(&book.id).unwrap_or_default(),
                })
            })
            .collect())
    }

    pub async fn add_bookmark(&self, member_id: i64, book_id: i64) -> AppResult<()> {
        books::Entity::find_by_id(book_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Book not found".to_string()))?;

        let already_exists = bookmarks::Entity::find()
            .filter(bookmarks::Column::MemberId.eq(member_id))
            .filter(bookmarks::Column::BookId.eq(book_id))
            .one(&self.pool)
            .await?
            .is_some();
        if already_exists {
            return Err(AppError::Conflict("Already bookmarked".to_string()));
        }

        bookmarks::ActiveModel {
            member_id: Set(member_id),
            book_id: Set(book_id),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn remove_bookmark(&self, member_id: i64, book_id: i64) -> AppResult<()> {
        let bookmark = bookmarks::Entity::find()
            .filter(bookmarks::Column::MemberId.eq(member_id))
            .filter(bookmarks::Column::BookId.eq(book_id))
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Bookmark not found".to_string()))?;

        bookmark.delete(&self.pool).await?;
        Ok(())
    }
}
