use crate::middlewares::auth_user;
use crate::models::*;
use crate::services::BookmarkService;
use actix_web::{HttpRequest, HttpResponse, ResponseError, Result, web};
use serde_json::json;

#[utoipa::path(
    get,
    path = "/bookmarks",
    tag = "bookmark",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Caller's bookmarks", body = [BookmarkResponse]),
        (status = 403, description = "Not a member")
    )
)]
pub async fn get_bookmarks(
    bookmark_service: web::Data<BookmarkService>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    let member_id = match auth_user(&req).and_then(|user| user.require_member()) {
        Ok(id) => id,
        Err(e) => return Ok(e.error_response()),
    };

    match bookmark_service.list_bookmarks(member_id).await {
        Ok(bookmarks) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "message": "Bookmarks retrieved successfully",
            "data": bookmarks
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/bookmarks/{book_id}",
    tag = "bookmark",
    params(("book_id" = i64, Path, description = "Book id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Bookmark added"),
        (status = 404, description = "Book not found"),
        (status = 409, description = "Already bookmarked")
    )
)]
pub async fn add_bookmark(
    bookmark_service: web::Data<BookmarkService>,
    req: HttpRequest,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    let member_id = match auth_user(&req).and_then(|user| user.require_member()) {
        Ok(id) => id,
        Err(e) => return Ok(e.error_response()),
    };

    match bookmark_service
        .add_bookmark(member_id, path.into_inner())
        .await
    {
        Ok(()) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "message": "Book bookmarked"
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    delete,
    path = "/bookmarks/{book_id}",
    tag = "bookmark",
    params(("book_id" = i64, Path, description = "Book id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Bookmark removed"),
        (status = 404, description = "Bookmark not found")
    )
)]
pub async fn remove_bookmark(
    bookmark_service: web::Data<BookmarkService>,
    req: HttpRequest,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    let member_id = match auth_user(&req).and_then(|user| user.require_member()) {
        Ok(id) => id,
        Err(e) => return Ok(e.error_response()),
    };

    match bookmark_service
        .remove_bookmark(member_id, path.into_inner())
        .await
    {
        Ok(()) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "message": "Bookmark removed"
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn bookmark_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/bookmarks")
            .route("", web::get().to(get_bookmarks))
            .route("/{book_id}", web::post().to(add_bookmark))
            .route("/{book_id}", web::delete().to(remove_bookmark)),
    );
}
