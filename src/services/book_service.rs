use crate::config::UploadsConfig;
use crate::entities::{
    book_entity as books, book_image_entity as book_images, genre_entity as genres,
};
use crate::error::{AppError, AppResult};
use crate::models::*;
use crate::utils::delete_image_file;
use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, IntoActiveModel,
    ModelTrait, QueryFilter, QueryOrder, Set,
};
use std::collections::HashMap;

#[derive(Clone)]
pub struct BookService {
    pool: DatabaseConnection,
    uploads: UploadsConfig,
}

impl BookService {
    pub fn new(pool: DatabaseConnection, uploads: UploadsConfig) -> Self {
        Self { pool, uploads }
    }

    pub async fn list_books(&self) -> AppResult<Vec<BookResponse>> {
        let models = books::Entity::find().all(&self.pool).await?;
        self.to_responses(models).await
    }

    pub async fn get_book(&self, id: i64) -> AppResult<BookResponse> {
        let book = books::Entity::find_by_id(id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Book not found".to_string()))?;

        let mut responses = self.to_responses(vec![book]).await?;
        Ok(responses.remove(0))
    }

    pub async fn filter_books(&self, query: &BookFilterQuery) -> AppResult<Vec<BookResponse>> {
        let mut find = books::Entity::find();

        if let Some(search) = &query.search
            && !search.trim().is_empty()
        {
            find = find.filter(
                Condition::any()
                    .add(books::Column::Title.contains(search))
                    .add(books::Column::Author.contains(search)),
            );
        }
        if let Some(genre_id) = query.genre_id {
            find = find.filter(books::Column::GenreId.eq(genre_id));
        }
        if let Some(min_price) = query.min_price {
            find = find.filter(books::Column::Price.gte(min_price));
        }
        if let Some(max_price) = query.max_price {
            find = find.filter(books::Column::Price.lte(max_price));
        }
        // unrecognized sort keys keep the default order
        if let Some(sort) = &query.sort
            && let Some(key) = SortKey::parse(sort)
        {
            find = match key {
                SortKey::PriceAsc => find.order_by_asc(books::Column::Price),
                SortKey::PriceDesc => find.order_by_desc(books::Column::Price),
                SortKey::TitleAsc => find.order_by_asc(books::Column::Title),
                SortKey::TitleDesc => find.order_by_desc(books::Column::Title),
            };
        }

        let models = find.all(&self.pool).await?;
        self.to_responses(models).await
    }

    pub async fn create_book(
        &self,
        admin_id: i64,
        request: BookCreateRequest,
    ) -> AppResult<BookResponse> {
        self.ensure_genre_exists(request.genre_id).await?;

        if request.price < Decimal::ZERO {
            return Err(AppError::ValidationError(
                "Price must not be negative".to_string(),
            ));
        }
        if request.stock < 0 {
            return Err(AppError::ValidationError(
                "Stock must not be negative".to_string(),
            ));
        }

        let now = Utc::now();
        let book = books::ActiveModel {
            admin_id: Set(admin_id),
            genre_id: Set(request.genre_id),
            title: Set(request.title),
            author: Set(request.author),
            isbn: Set(request.isbn),
            language: Set(request.language),
            format: Set(request.format),
            price: Set(request.price),
            stock: Set(request.stock),
            publication_date: Set(request.publication_date),
            is_physical_access: Set(request.is_physical_access),
            is_on_sale: Set(request.is_on_sale),
            discount_percentage: Set(request.discount_percentage.unwrap_or(Decimal::ZERO)),
            discount_start: Set(request.discount_start),
            discount_end: Set(request.discount_end),
            description: Set(request.description),
            publisher: Set(request.publisher),
            book_type: Set(request.book_type),
            is_exclusive_edition: Set(request.is_exclusive_edition),
            average_rating: Set(Decimal::ZERO),
            total_sold: Set(0),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.pool)
        .await?;

        self.get_book(book.id).await
    }

    pub async fn update_book(&self, id: i64, request: BookCreateRequest) -> AppResult<BookResponse> {
        self.ensure_genre_exists(request.genre_id).await?;

        if request.price < Decimal::ZERO {
            return Err(AppError::ValidationError(
                "Price must not be negative".to_string(),
            ));
        }
        if request.stock < 0 {
            return Err(AppError::ValidationError(
                "Stock must not be negative".to_string(),
            ));
        }

        let mut model = books::Entity::find_by_id(id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Book not found".to_string()))?
            .into_active_model();

        model.genre_id = Set(request.genre_id);
        model.title = Set(request.title);
        model.author = Set(request.author);
        model.isbn = Set(request.isbn);
        model.language = Set(request.language);
        model.format = Set(request.format);
        model.price = Set(request.price);
        model.stock = Set(request.stock);
        model.publication_date = Set(request.publication_date);
        model.is_physical_access = Set(request.is_physical_access);
        model.is_on_sale = Set(request.is_on_sale);
        model.discount_percentage = Set(request.discount_percentage.unwrap_or(Decimal::ZERO));
        model.discount_start = Set(request.discount_start);
        model.discount_end = Set(request.discount_end);
        model.description = Set(request.description);
        model.publisher = Set(request.publisher);
        model.book_type = Set(request.book_type);
        model.is_exclusive_edition = Set(request.is_exclusive_edition);
        model.updated_at = Set(Utc::now());

        let book = model.update(&self.pool).await?;
        self.get_book(book.id).await
    }

    pub async fn delete_book(&self, id: i64) -> AppResult<()> {
        let book = books::Entity::find_by_id(id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Book not found".to_string()))?;

        let images = book_images::Entity::find()
            .filter(book_images::Column::BookId.eq(id))
            .all(&self.pool)
            .await?;

        // image rows cascade with the book; stored files go separately
        book.delete(&self.pool).await?;
        for image in images {
            delete_image_file(&self.uploads, &image.url).await;
        }

        Ok(())
    }

    pub async fn add_images(&self, book_id: i64, urls: Vec<String>) -> AppResult<Vec<BookImageResponse>> {
        books::Entity::find_by_id(book_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Book not found".to_string()))?;

        let mut responses = Vec::with_capacity(urls.len());
        for url in urls {
            let image = book_images::ActiveModel {
                book_id: Set(book_id),
                url: Set(url),
                ..Default::default()
            }
            .insert(&self.pool)
            .await?;
            responses.push(BookImageResponse {
                id: image.id,
                url: image.url,
            });
        }

        Ok(responses)
    }

    pub async fn delete_image(&self, book_id: i64, image_id: i64) -> AppResult<()> {
        let image = book_images::Entity::find_by_id(image_id)
            .filter(book_images::Column::BookId.eq(book_id))
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Book image not found".to_string()))?;

        let url = image.url.clone();
        image.delete(&self.pool).await?;
        delete_image_file(&self.uploads, &url).await;

        Ok(())
    }

    // ===== genres =====

    pub async fn list_genres(&self) -> AppResult<Vec<GenreResponse>> {
        let models = genres::Entity::find()
            .order_by_asc(genres::Column::Name)
            .all(&self.pool)
            .await?;
        Ok(models
            .into_iter()
            .map(|g| GenreResponse {
                id: g.id,
                name: g.name,
            })
            .collect())
    }

    pub async fn get_genre(&self, id: i64) -> AppResult<GenreResponse> {
        let genre = genres::Entity::find_by_id(id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Genre not found".to_string()))?;
        Ok(GenreResponse {
            id: genre.id,
            name: genre.name,
        })
    }

    pub async fn create_genre(&self, request: GenreCreateRequest) -> AppResult<GenreResponse> {
        let name = request.name.trim().to_string();
        if name.is_empty() {
            return Err(AppError::ValidationError(
                "Genre name is required".to_string(),
            ));
        }

        let taken = genres::Entity::find()
            .filter(genres::Column::Name.eq(&name))
            .one(&self.pool)
            .await?
            .is_some();
        if taken {
            return Err(AppError::Conflict("Genre already exists".to_string()));
        }

        let genre = genres::ActiveModel {
            name: Set(name),
            ..Default::default()
        }
        .insert(&self.pool)
        .await?;

        Ok(GenreResponse {
            id: genre.id,
            name: genre.name,
        })
    }

    pub async fn update_genre(&self, id: i64, request: GenreCreateRequest) -> AppResult<GenreResponse> {
        let name = request.name.trim().to_string();
        if name.is_empty() {
            return Err(AppError::ValidationError(
                "Genre name is required".to_string(),
            ));
        }

        let mut model = genres::Entity::find_by_id(id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Genre not found".to_string()))?
            .into_active_model();
        model.name = Set(name);

        let genre = model.update(&self.pool).await?;
        Ok(GenreResponse {
            id: genre.id,
            name: genre.name,
        })
    }

    pub async fn delete_genre(&self, id: i64) -> AppResult<()> {
        let genre = genres::Entity::find_by_id(id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Genre not found".to_string()))?;

        genre.delete(&self.pool).await?;
        Ok(())
    }

    // ===== helpers =====

    async fn ensure_genre_exists(&self, genre_id: i64) -> AppResult<()> {
        genres::Entity::find_by_id(genre_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::ValidationError("Invalid genre ID".to_string()))?;
        Ok(())
    }

    async fn to_responses(&self, models: Vec<books::Model>) -> AppResult<Vec<BookResponse>> {
        if models.is_empty() {
            return Ok(Vec::new());
        }

        let genre_names: HashMap<i64, String> = genres::Entity::find()
            .all(&self.pool)
            .await?
            .into_iter()
            .map(|g| (g.id, g.name))
            .collect();

        let ids: Vec<i64> = models.iter().map(|b| b.id).collect();
        let mut images_by_book: HashMap<i64, Vec<String>> = HashMap::new();
        for image in book_images::Entity::find()
            .filter(book_images::Column::BookId.is_in(ids))
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
            .map(|book| {
                let genre_name = genre_names.get(&book.genre_id).cloned().unwrap_or_default();
                let images = images_by_book.remove(&book.id).unwrap_or_default();
                BookResponse::from_parts(book, genre_name, images)
            })
            .collect())
    }
}
