use crate::middlewares::auth_user;
use crate::models::*;
use crate::services::AnnouncementService;
use actix_web::{HttpRequest, HttpResponse, ResponseError, Result, web};
use serde_json::json;

#[utoipa::path(
    post,
    path = "/announcements",
    tag = "announcement",
    request_body = AnnouncementCreateRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Announcement created", body = AnnouncementResponse),
        (status = 403, description = "Not an admin")
    )
)]
pub async fn create_announcement(
    announcement_service: web::Data<AnnouncementService>,
    req: HttpRequest,
    request: web::Json<AnnouncementCreateRequest>,
) -> Result<HttpResponse> {
    if let Err(e) = auth_user(&req).and_then(|user| user.require_admin()) {
        return Ok(e.error_response());
    }

    match announcement_service
        .create_announcement(request.into_inner())
        .await
    {
        Ok(announcement) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "message": "Announcement created successfully",
            "data": announcement
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/announcements/my",
    tag = "announcement",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Announcements visible to the caller", body = [AnnouncementResponse])
    )
)]
pub async fn my_announcements(
    announcement_service: web::Data<AnnouncementService>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    let user = match auth_user(&req) {
        Ok(user) => user,
        Err(e) => return Ok(e.error_response()),
    };

    match announcement_service.visible_for_member(user.id).await {
        Ok(announcements) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "message": "Fetched latest announcements",
            "data": announcements
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/announcements",
    tag = "announcement",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All announcements", body = [AnnouncementResponse]),
        (status = 403, description = "Not an admin")
    )
)]
pub async fn get_all_announcements(
    announcement_service: web::Data<AnnouncementService>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    if let Err(e) = auth_user(&req).and_then(|user| user.require_admin()) {
        return Ok(e.error_response());
    }

    match announcement_service.list_all().await {
        Ok(announcements) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": announcements
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/announcements/public",
    tag = "announcement",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Public broadcasts", body = [AnnouncementResponse]),
        (status = 403, description = "Not an admin")
    )
)]
pub async fn get_public_announcements(
    announcement_service: web::Data<AnnouncementService>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    if let Err(e) = auth_user(&req).and_then(|user| user.require_admin()) {
        return Ok(e.error_response());
    }

    match announcement_service.list_public().await {
        Ok(announcements) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": announcements
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/announcements/{id}",
    tag = "announcement",
    params(("id" = i64, Path, description = "Announcement id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Announcement detail", body = AnnouncementResponse),
        (status = 404, description = "Announcement not found")
    )
)]
pub async fn get_announcement(
    announcement_service: web::Data<AnnouncementService>,
    req: HttpRequest,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    if let Err(e) = auth_user(&req) {
        return Ok(e.error_response());
    }

    match announcement_service
        .get_announcement(path.into_inner())
        .await
    {
        Ok(announcement) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": announcement
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/announcements/{id}",
    tag = "announcement",
    params(("id" = i64, Path, description = "Announcement id")),
    request_body = AnnouncementCreateRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Announcement updated", body = AnnouncementResponse),
        (status = 404, description = "Announcement not found")
    )
)]
pub async fn update_announcement(
    announcement_service: web::Data<AnnouncementService>,
    req: HttpRequest,
    path: web::Path<i64>,
    request: web::Json<AnnouncementCreateRequest>,
) -> Result<HttpResponse> {
    if let Err(e) = auth_user(&req).and_then(|user| user.require_admin()) {
        return Ok(e.error_response());
    }

    match announcement_service
        .update_announcement(path.into_inner(), request.into_inner())
        .await
    {
        Ok(announcement) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "message": "Announcement updated successfully",
            "data": announcement
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    delete,
    path = "/announcements/{id}",
    tag = "announcement",
    params(("id" = i64, Path, description = "Announcement id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Announcement deleted"),
        (status = 404, description = "Announcement not found")
    )
)]
pub async fn delete_announcement(
    announcement_service: web::Data<AnnouncementService>,
    req: HttpRequest,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    if let Err(e) = auth_user(&req).and_then(|user| user.require_admin()) {
        return Ok(e.error_response());
    }

    match announcement_service
        .delete_announcement(path.into_inner())
        .await
    {
        Ok(()) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "message": "Announcement deleted successfully"
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn announcement_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/announcements")
            .route("", web::post().to(create_announcement))
            .route("", web::get().to(get_all_announcements))
            .route("/my", web::get().to(my_announcements))
            .route("/public", web::get().to(get_public_announcements))
            .route("/{id}", web::get().to(get_announcement))
            .route("/{id}", web::put().to(update_announcement))
            .route("/{id}", web::delete().to(delete_announcement)),
    );
}
