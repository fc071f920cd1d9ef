use crate::config::Config;
use crate::middlewares::auth_user;
use crate::models::*;
use crate::services::BookService;
use crate::utils::save_book_images;
use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, ResponseError, Result, web};
use serde_json::json;

#[utoipa::path(
    get,
    path = "/books",
    tag = "book",
    responses(
        (status = 200, description = "All books", body = [BookResponse])
    )
)]
pub async fn get_books(book_service: web::Data<BookService>) -> Result<HttpResponse> {
    match book_service.list_books().await {
        Ok(books) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "message": "Books retrieved successfully",
            "data": books
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/books/filter",
    tag = "book",
    params(
        ("search" = Option<String>, Query, description = "Substring match on title or author"),
        ("genre_id" = Option<i64>, Query, description = "Genre filter"),
        ("min_price" = Option<String>, Query, description = "Lower price bound"),
        ("max_price" = Option<String>, Query, description = "Upper price bound"),
        ("sort" = Option<String>, Query, description = "price_asc | price_desc | title_asc | title_desc")
    ),
    responses(
        (status = 200, description = "Filtered books", body = [BookResponse])
    )
)]
pub async fn filter_books(
    book_service: web::Data<BookService>,
    query: web::Query<BookFilterQuery>,
) -> Result<HttpResponse> {
    match book_service.filter_books(&query).await {
        Ok(books) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": books
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/books/{id}",
    tag = "book",
    params(("id" = i64, Path, description = "Book id")),
    responses(
        (status = 200, description = "Book detail", body = BookResponse),
        (status = 404, description = "Book not found")
    )
)]
pub async fn get_book(
    book_service: web::Data<BookService>,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    match book_service.get_book(path.into_inner()).await {
        Ok(book) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "message": "Book retrieved successfully",
            "data": book
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/books",
    tag = "book",
    request_body = BookCreateRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Book created", body = BookResponse),
        (status = 403, description = "Not an admin")
    )
)]
pub async fn create_book(
    book_service: web::Data<BookService>,
    req: HttpRequest,
    request: web::Json<BookCreateRequest>,
) -> Result<HttpResponse> {
    let admin_id = match auth_user(&req).and_then(|user| user.require_admin()) {
        Ok(id) => id,
        Err(e) => return Ok(e.error_response()),
    };

    match book_service.create_book(admin_id, request.into_inner()).await {
        Ok(book) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "message": "Book created successfully",
            "data": book
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/books/{id}",
    tag = "book",
    params(("id" = i64, Path, description = "Book id")),
    request_body = BookCreateRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Book updated", body = BookResponse),
        (status = 404, description = "Book not found")
    )
)]
pub async fn update_book(
    book_service: web::Data<BookService>,
    req: HttpRequest,
    path: web::Path<i64>,
    request: web::Json<BookCreateRequest>,
) -> Result<HttpResponse> {
    if let Err(e) = auth_user(&req).and_then(|user| user.require_admin()) {
        return Ok(e.error_response());
    }

    match book_service
        .update_book(path.into_inner(), request.into_inner())
        .await
    {
        Ok(book) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "message": "Book updated successfully",
            "data": book
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    delete,
    path = "/books/{id}",
    tag = "book",
    params(("id" = i64, Path, description = "Book id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Book deleted"),
        (status = 404, description = "Book not found")
    )
)]
pub async fn delete_book(
    book_service: web::Data<BookService>,
    req: HttpRequest,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    if let Err(e) = auth_user(&req).and_then(|user| user.require_admin()) {
        return Ok(e.error_response());
    }

    match book_service.delete_book(path.into_inner()).await {
        Ok(()) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "message": "Book deleted successfully"
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/books/{id}/images",
    tag = "book",
    params(("id" = i64, Path, description = "Book id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Images uploaded"),
        (status = 400, description = "Invalid upload"),
        (status = 404, description = "Book not found")
    )
)]
pub async fn upload_book_images(
    book_service: web::Data<BookService>,
    config: web::Data<Config>,
    req: HttpRequest,
    path: web::Path<i64>,
    mut payload: Multipart,
) -> Result<HttpResponse> {
    if let Err(e) = auth_user(&req).and_then(|user| user.require_admin()) {
        return Ok(e.error_response());
    }

    let saved = match save_book_images(&config.uploads, &mut payload).await {
        Ok(saved) => saved,
        Err(e) => return Ok(e.error_response()),
    };

    let urls = saved.into_iter().map(|image| image.url).collect();
    match book_service.add_images(path.into_inner(), urls).await {
        Ok(images) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "message": "Images uploaded successfully",
            "data": images
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    delete,
    path = "/books/{id}/images/{image_id}",
    tag = "book",
    params(
        ("id" = i64, Path, description = "Book id"),
        ("image_id" = i64, Path, description = "Image id")
    ),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Image deleted"),
        (status = 404, description = "Image not found")
    )
)]
pub async fn delete_book_image(
    book_service: web::Data<BookService>,
    req: HttpRequest,
    path: web::Path<(i64, i64)>,
) -> Result<HttpResponse> {
    if let Err(e) = auth_user(&req).and_then(|user| user.require_admin()) {
        return Ok(e.error_response());
    }

    let (book_id, image_id) = path.into_inner();
    match book_service.delete_image(book_id, image_id).await {
        Ok(()) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "message": "Image deleted successfully"
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

// ===== genres =====

#[utoipa::path(
    get,
    path = "/books/genres",
    tag = "genre",
    responses((status = 200, description = "All genres", body = [GenreResponse]))
)]
pub async fn get_genres(book_service: web::Data<BookService>) -> Result<HttpResponse> {
    match book_service.list_genres().await {
        Ok(genres) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "message": "Genres retrieved successfully",
            "data": genres
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/books/genres/{id}",
    tag = "genre",
    params(("id" = i64, Path, description = "Genre id")),
    responses(
        (status = 200, description = "Genre", body = GenreResponse),
        (status = 404, description = "Genre not found")
    )
)]
pub async fn get_genre(
    book_service: web::Data<BookService>,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    match book_service.get_genre(path.into_inner()).await {
        Ok(genre) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": genre
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/books/genres",
    tag = "genre",
    request_body = GenreCreateRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Genre created", body = GenreResponse),
        (status = 409, description = "Genre already exists")
    )
)]
pub async fn create_genre(
    book_service: web::Data<BookService>,
    req: HttpRequest,
    request: web::Json<GenreCreateRequest>,
) -> Result<HttpResponse> {
    if let Err(e) = auth_user(&req).and_then(|user| user.require_admin()) {
        return Ok(e.error_response());
    }

    match book_service.create_genre(request.into_inner()).await {
        Ok(genre) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "message": "Genre created successfully",
            "data": genre
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/books/genres/{id}",
    tag = "genre",
    params(("id" = i64, Path, description = "Genre id")),
    request_body = GenreCreateRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Genre updated", body = GenreResponse),
        (status = 404, description = "Genre not found")
    )
)]
pub async fn update_genre(
    book_service: web::Data<BookService>,
    req: HttpRequest,
    path: web::Path<i64>,
    request: web::Json<GenreCreateRequest>,
) -> Result<HttpResponse> {
    if let Err(e) = auth_user(&req).and_then(|user| user.require_admin()) {
        return Ok(e.error_response());
    }

    match book_service
        .update_genre(path.into_inner(), request.into_inner())
        .await
    {
        Ok(genre) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "message": "Genre updated successfully",
            "data": genre
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    delete,
    path = "/books/genres/{id}",
    tag = "genre",
    params(("id" = i64, Path, description = "Genre id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Genre deleted"),
        (status = 404, description = "Genre not found")
    )
)]
pub async fn delete_genre(
    book_service: web::Data<BookService>,
    req: HttpRequest,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    if let Err(e) = auth_user(&req).and_then(|user| user.require_admin()) {
        return Ok(e.error_response());
    }

    match book_service.delete_genre(path.into_inner()).await {
        Ok(()) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "message": "Genre deleted successfully"
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn book_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/books")
            .route("", web::get().to(get_books))
            .route("", web::post().to(create_book))
            .route("/filter", web::get().to(filter_books))
            .route("/genres", web::get().to(get_genres))
            .route("/genres", web::post().to(create_genre))
            .route("/genres/{id}", web::get().to(get_genre))
            .route("/genres/{id}", web::put().to(update_genre))
            .route("/genres/{id}", web::delete().to(delete_genre))
            .route("/{id}", web::get().to(get_book))
            .route("/{id}", web::put().to(update_book))
            .route("/{id}", web::delete().to(delete_book))
            .route("/{id}/images", web::post().to(upload_book_images))
            .route("/{id}/images/{image_id}", web::delete().to(delete_book_image)),
    );
}
