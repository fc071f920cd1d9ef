use crate::middlewares::auth_user;
use crate::models::*;
use crate::services::CartService;
use actix_web::{HttpRequest, HttpResponse, ResponseError, Result, web};
use serde_json::json;

#[utoipa::path(
    get,
    path = "/cart",
    tag = "cart",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current cart", body = CartResponse),
        (status = 403, description = "Not a member")
    )
)]
pub async fn get_cart(
    cart_service: web::Data<CartService>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    let member_id = match auth_user(&req).and_then(|user| user.require_member()) {
        Ok(id) => id,
        Err(e) => return Ok(e.error_response()),
    };

    match cart_service.get_cart(member_id).await {
        Ok(cart) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": { "cart": cart }
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/cart/add",
    tag = "cart",
    request_body = AddToCartRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Item added"),
        (status = 400, description = "Quantity exceeds stock"),
        (status = 404, description = "Book not found")
    )
)]
pub async fn add_to_cart(
    cart_service: web::Data<CartService>,
    req: HttpRequest,
    request: web::Json<AddToCartRequest>,
) -> Result<HttpResponse> {
    let member_id = match auth_user(&req).and_then(|user| user.require_member()) {
        Ok(id) => id,
        Err(e) => return Ok(e.error_response()),
    };

    match cart_service.add_to_cart(member_id, request.into_inner()).await {
        Ok(()) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "message": "Item added to cart"
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/cart/update/{book_id}",
    tag = "cart",
    params(("book_id" = i64, Path, description = "Book id")),
    request_body = UpdateCartRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Quantity updated"),
        (status = 404, description = "Item not in cart")
    )
)]
pub async fn update_quantity(
    cart_service: web::Data<CartService>,
    req: HttpRequest,
    path: web::Path<i64>,
    request: web::Json<UpdateCartRequest>,
) -> Result<HttpResponse> {
    let member_id = match auth_user(&req).and_then(|user| user.require_member()) {
        Ok(id) => id,
        Err(e) => return Ok(e.error_response()),
    };

    match cart_service
        .update_quantity(member_id, path.into_inner(), request.into_inner())
        .await
    {
        Ok(()) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "message": "Quantity updated"
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    delete,
    path = "/cart/remove/{book_id}",
    tag = "cart",
    params(("book_id" = i64, Path, description = "Book id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Item removed"),
        (status = 404, description = "Item not in cart")
    )
)]
pub async fn remove_item(
    cart_service: web::Data<CartService>,
    req: HttpRequest,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    let member_id = match auth_user(&req).and_then(|user| user.require_member()) {
        Ok(id) => id,
        Err(e) => return Ok(e.error_response()),
    };

    match cart_service.remove_item(member_id, path.into_inner()).await {
        Ok(()) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "message": "Item removed from cart"
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    delete,
    path = "/cart/clear",
    tag = "cart",
    security(("bearer_auth" = [])),
    responses((status = 200, description = "Cart cleared"))
)]
pub async fn clear_cart(
    cart_service: web::Data<CartService>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    let member_id = match auth_user(&req).and_then(|user| user.require_member()) {
        Ok(id) => id,
        Err(e) => return Ok(e.error_response()),
    };

    match cart_service.clear_cart(member_id).await {
        Ok(()) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "message": "Cart cleared"
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn cart_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/cart")
            .route("", web::get().to(get_cart))
            .route("/add", web::post().to(add_to_cart))
            .route("/update/{book_id}", web::put().to(update_quantity))
            .route("/remove/{book_id}", web::delete().to(remove_item))
            .route("/clear", web::delete().to(clear_cart)),
    );
}
