use crate::middlewares::auth_user;
use crate::models::*;
use crate::services::AccountService;
use actix_web::{HttpRequest, HttpResponse, ResponseError, Result, web};
use serde_json::json;

#[utoipa::path(
    post,
    path = "/account/signup",
    tag = "account",
    request_body = SignupRequest,
    responses(
        (status = 200, description = "Member registered", body = AuthResponse),
        (status = 400, description = "Invalid input"),
        (status = 409, description = "Email or username already taken")
    )
)]
pub async fn signup(
    account_service: web::Data<AccountService>,
    request: web::Json<SignupRequest>,
) -> Result<HttpResponse> {
    match account_service.signup(request.into_inner()).await {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/account/admin/register",
    tag = "account",
    request_body = AdminRegisterRequest,
    responses(
        (status = 200, description = "Admin registered", body = AuthResponse),
        (status = 409, description = "Email already taken")
    )
)]
pub async fn register_admin(
    account_service: web::Data<AccountService>,
    request: web::Json<AdminRegisterRequest>,
) -> Result<HttpResponse> {
    match account_service.register_admin(request.into_inner()).await {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/account/login",
    tag = "account",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in", body = AuthResponse),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    account_service: web::Data<AccountService>,
    request: web::Json<LoginRequest>,
) -> Result<HttpResponse> {
    match account_service.login(request.into_inner()).await {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/account/forgot",
    tag = "account",
    request_body = ForgotPasswordRequest,
    responses(
        (status = 200, description = "Reset code sent"),
        (status = 404, description = "Email not found")
    )
)]
pub async fn forgot_password(
    account_service: web::Data<AccountService>,
    request: web::Json<ForgotPasswordRequest>,
) -> Result<HttpResponse> {
    match account_service.forgot_password(request.into_inner()).await {
        Ok(()) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "message": "Reset code sent. Please check your email."
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/account/refresh",
    tag = "account",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Tokens refreshed", body = AuthResponse),
        (status = 401, description = "Invalid refresh token")
    )
)]
pub async fn refresh(
    account_service: web::Data<AccountService>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    let token = req
        .headers()
        .get("Authorization")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "));

    let Some(token) = token else {
        return Ok(HttpResponse::Unauthorized().json(json!({
            "success": false,
            "error": {
                "code": "INVALID_TOKEN_FORMAT",
                "message": "Missing or malformed Authorization header"
            }
        })));
    };

    match account_service.refresh(token).await {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/account/profile",
    tag = "account",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Caller profile"),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn get_profile(
    account_service: web::Data<AccountService>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    let user = match auth_user(&req) {
        Ok(user) => user,
        Err(e) => return Ok(e.error_response()),
    };

    match account_service.get_profile(user.id, user.role).await {
        Ok(profile) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": { "user": profile }
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/account/profile",
    tag = "account",
    request_body = UpdateProfileRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Profile updated"),
        (status = 403, description = "Not a member")
    )
)]
pub async fn update_profile(
    account_service: web::Data<AccountService>,
    req: HttpRequest,
    request: web::Json<UpdateProfileRequest>,
) -> Result<HttpResponse> {
    let member_id = match auth_user(&req).and_then(|user| user.require_member()) {
        Ok(id) => id,
        Err(e) => return Ok(e.error_response()),
    };

    match account_service
        .update_profile(member_id, request.into_inner())
        .await
    {
        Ok(profile) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": { "user": profile }
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn account_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/account")
            .route("/signup", web::post().to(signup))
            .route("/admin/register", web::post().to(register_admin))
            .route("/login", web::post().to(login))
            .route("/forgot", web::post().to(forgot_password))
            .route("/refresh", web::post().to(refresh))
            .route("/profile", web::get().to(get_profile))
            .route("/profile", web::put().to(update_profile)),
    );
}
