use crate::middlewares::auth_user;
use crate::models::*;
use crate::services::ReviewService;
use actix_web::{HttpRequest, HttpResponse, ResponseError, Result, web};
use serde_json::json;

#[utoipa::path(
    post,
    path = "/reviews",
    tag = "review",
    request_body = ReviewCreateRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Review submitted", body = ReviewResponse),
        (status = 404, description = "Book not found"),
        (status = 409, description = "Already reviewed this book")
    )
)]
pub async fn create_review(
    review_service: web::Data<ReviewService>,
    req: HttpRequest,
    request: web::Json<ReviewCreateRequest>,
) -> Result<HttpResponse> {
    let member_id = match auth_user(&req).and_then(|user| user.require_member()) {
        Ok(id) => id,
        Err(e) => return Ok(e.error_response()),
    };

    match review_service
        .create_review(member_id, request.into_inner())
        .await
    {
        Ok(review) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "message": "Review submitted successfully",
            "data": review
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/reviews/{id}",
    tag = "review",
    params(("id" = i64, Path, description = "Review id")),
    request_body = ReviewUpdateRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Review updated", body = ReviewResponse),
        (status = 404, description = "Review not found or not yours")
    )
)]
pub async fn update_review(
    review_service: web::Data<ReviewService>,
    req: HttpRequest,
    path: web::Path<i64>,
    request: web::Json<ReviewUpdateRequest>,
) -> Result<HttpResponse> {
    let member_id = match auth_user(&req).and_then(|user| user.require_member()) {
        Ok(id) => id,
        Err(e) => return Ok(e.error_response()),
    };

    match review_service
        .update_review(member_id, path.into_inner(), request.into_inner())
        .await
    {
        Ok(review) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "message": "Review updated successfully",
            "data": review
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    delete,
    path = "/reviews/{id}",
    tag = "review",
    params(("id" = i64, Path, description = "Review id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Review deleted"),
        (status = 404, description = "Review not found or not yours")
    )
)]
pub async fn delete_review(
    review_service: web::Data<ReviewService>,
    req: HttpRequest,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    let member_id = match auth_user(&req).and_then(|user| user.require_member()) {
        Ok(id) => id,
        Err(e) => return Ok(e.error_response()),
    };

    match review_service
        .delete_review(member_id, path.into_inner())
        .await
    {
        Ok(()) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "message": "Review deleted"
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/reviews/book/{book_id}",
    tag = "review",
    params(("book_id" = i64, Path, description = "Book id")),
    responses(
        (status = 200, description = "Reviews for a book", body = [ReviewResponse]),
        (status = 404, description = "Book not found")
    )
)]
pub async fn reviews_for_book(
    review_service: web::Data<ReviewService>,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    match review_service.reviews_for_book(path.into_inner()).await {
        Ok(reviews) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": reviews
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/reviews/my",
    tag = "review",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Caller's reviews", body = [ReviewResponse]),
        (status = 403, description = "Not a member")
    )
)]
pub async fn my_reviews(
    review_service: web::Data<ReviewService>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    let member_id = match auth_user(&req).and_then(|user| user.require_member()) {
        Ok(id) => id,
        Err(e) => return Ok(e.error_response()),
    };

    match review_service.my_reviews(member_id).await {
        Ok(reviews) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": reviews
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/reviews/{id}",
    tag = "review",
    params(("id" = i64, Path, description = "Review id")),
    responses(
        (status = 200, description = "Review detail", body = ReviewResponse),
        (status = 404, description = "Review not found")
    )
)]
pub async fn get_review(
    review_service: web::Data<ReviewService>,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    match review_service.get_review(path.into_inner()).await {
        Ok(review) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": review
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn review_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/reviews")
            .route("", web::post().to(create_review))
            .route("/book/{book_id}", web::get().to(reviews_for_book))
            .route("/my", web::get().to(my_reviews))
            .route("/{id}", web::get().to(get_review))
            .route("/{id}", web::put().to(update_review))
            .route("/{id}", web::delete().to(delete_review)),
    );
}
