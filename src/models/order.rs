use crate::entities::OrderStatus;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderItemResponse {
    pub book_id: i64,
    pub title: String,
    pub image: Option<String>,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub discount_applied: Decimal,
    pub line_total: Decimal,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderResponse {
    pub id: i64,
    pub member_id: i64,
    pub claim_code: String,
    pub total_price: Decimal,
    pub discount_amount: Decimal,
    pub applied_discounts: String,
    pub order_status: OrderStatus,
    pub is_paid: bool,
    pub order_date: DateTime<Utc>,
    pub pickup_deadline: DateTime<Utc>,
    pub cancelled_at: Option<DateTime<Utc>>,
    pub fulfillment_method: String,
    pub items: Vec<OrderItemResponse>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct OrderStatusUpdateRequest {
    pub order_status: OrderStatus,
    pub is_paid: Option<bool>,
}
