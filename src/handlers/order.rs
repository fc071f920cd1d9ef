use crate::middlewares::auth_user;
use crate::models::*;
use crate::services::OrderService;
use actix_web::{HttpRequest, HttpResponse, ResponseError, Result, web};
use serde_json::json;

#[utoipa::path(
    post,
    path = "/orders",
    tag = "order",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Order placed", body = OrderResponse),
        (status = 400, description = "Empty cart or insufficient stock"),
        (status = 403, description = "Not a member")
    )
)]
pub async fn create_order(
    order_service: web::Data<OrderService>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    let member_id = match auth_user(&req).and_then(|user| user.require_member()) {
        Ok(id) => id,
        Err(e) => return Ok(e.error_response()),
    };

    match order_service.place_order(member_id).await {
        Ok(order) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "message": "Order placed successfully",
            "data": order
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/orders",
    tag = "order",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All orders", body = [OrderResponse]),
        (status = 403, description = "Not an admin")
    )
)]
pub async fn get_all_orders(
    order_service: web::Data<OrderService>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    if let Err(e) = auth_user(&req).and_then(|user| user.require_admin()) {
        return Ok(e.error_response());
    }

    match order_service.list_all().await {
        Ok(orders) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": orders
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/orders/my",
    tag = "order",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Caller's orders", body = [OrderResponse]),
        (status = 403, description = "Not a member")
    )
)]
pub async fn get_my_orders(
    order_service: web::Data<OrderService>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    let member_id = match auth_user(&req).and_then(|user| user.require_member()) {
        Ok(id) => id,
        Err(e) => return Ok(e.error_response()),
    };

    match order_service.list_mine(member_id).await {
        Ok(orders) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": orders
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/orders/{id}",
    tag = "order",
    params(("id" = i64, Path, description = "Order id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Order detail", body = OrderResponse),
        (status = 404, description = "Order not found")
    )
)]
pub async fn get_order(
    order_service: web::Data<OrderService>,
    req: HttpRequest,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    if let Err(e) = auth_user(&req) {
        return Ok(e.error_response());
    }

    match order_service.get_order(path.into_inner()).await {
        Ok(order) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": order
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/orders/{id}/status",
    tag = "order",
    params(("id" = i64, Path, description = "Order id")),
    request_body = OrderStatusUpdateRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Status updated", body = OrderResponse),
        (status = 400, description = "Transition not allowed"),
        (status = 403, description = "Not staff")
    )
)]
pub async fn update_status(
    order_service: web::Data<OrderService>,
    req: HttpRequest,
    path: web::Path<i64>,
    request: web::Json<OrderStatusUpdateRequest>,
) -> Result<HttpResponse> {
    if let Err(e) = auth_user(&req).and_then(|user| user.require_staff()) {
        return Ok(e.error_response());
    }

    match order_service
        .update_status(path.into_inner(), request.into_inner())
        .await
    {
        Ok(order) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": order
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/orders/{id}/cancel",
    tag = "order",
    params(("id" = i64, Path, description = "Order id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Order cancelled", body = OrderResponse),
        (status = 400, description = "Order is not pending"),
        (status = 404, description = "Order not found or not yours")
    )
)]
pub async fn cancel_order(
    order_service: web::Data<OrderService>,
    req: HttpRequest,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    let member_id = match auth_user(&req).and_then(|user| user.require_member()) {
        Ok(id) => id,
        Err(e) => return Ok(e.error_response()),
    };

    match order_service.cancel_order(member_id, path.into_inner()).await {
        Ok(order) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "message": "Order cancelled",
            "data": order
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/orders/claim/{code}",
    tag = "order",
    params(("code" = String, Path, description = "Claim code")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Order claimed", body = OrderResponse),
        (status = 400, description = "Order is not pending"),
        (status = 404, description = "No order with that code")
    )
)]
pub async fn claim_order(
    order_service: web::Data<OrderService>,
    req: HttpRequest,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    if let Err(e) = auth_user(&req).and_then(|user| user.require_staff()) {
        return Ok(e.error_response());
    }

    match order_service.claim_by_code(&path.into_inner()).await {
        Ok(order) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "message": "Order claimed",
            "data": order
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    delete,
    path = "/orders/{id}",
    tag = "order",
    params(("id" = i64, Path, description = "Order id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Order deleted", body = OrderResponse),
        (status = 404, description = "Order not found")
    )
)]
pub async fn delete_order(
    order_service: web::Data<OrderService>,
    req: HttpRequest,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    if let Err(e) = auth_user(&req).and_then(|user| user.require_admin()) {
        return Ok(e.error_response());
    }

    match order_service.delete_order(path.into_inner()).await {
        Ok(order) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "message": "Order deleted",
            "data": order
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn order_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/orders")
            .route("", web::post().to(create_order))
            .route("", web::get().to(get_all_orders))
            .route("/my", web::get().to(get_my_orders))
            .route("/claim/{code}", web::put().to(claim_order))
            .route("/{id}", web::get().to(get_order))
            .route("/{id}", web::delete().to(delete_order))
            .route("/{id}/status", web::put().to(update_status))
            .route("/{id}/cancel", web::put().to(cancel_order)),
    );
}
