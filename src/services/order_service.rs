use crate::entities::{
    OrderStatus, book_entity as books, book_image_entity as book_images, cart_entity as carts,
    cart_item_entity as cart_items, member_entity as members, order_entity as orders,
    order_item_entity as order_items,
};
use crate::error::{AppError, AppResult};
use crate::external::Mailer;
use crate::models::*;
use crate::services::pricing;
use crate::utils::generate_claim_code;
use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, ModelTrait,
    PaginatorTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use std::collections::HashMap;

const PICKUP_DEADLINE_DAYS: i64 = 7;
const CLAIM_CODE_ATTEMPTS: u32 = 5;

#[derive(Clone)]
pub struct OrderService {
    pool: DatabaseConnection,
    mailer: Mailer,
}

impl OrderService {
    pub fn new(pool: DatabaseConnection, mailer: Mailer) -> Self {
        Self { pool, mailer }
    }

    /// Converts the member's cart into an order. Everything up to the commit
    /// runs in one transaction; an error on any line leaves no partial order.
    pub async fn place_order(&self, member_id: i64) -> AppResult<OrderResponse> {
        let txn = self.pool.begin().await?;

        let cart = carts::Entity::find()
            .filter(carts::Column::MemberId.eq(member_id))
            .one(&txn)
            .await?
            .ok_or(AppError::EmptyCart)?;

        let items = cart_items::Entity::find()
            .filter(cart_items::Column::CartId.eq(cart.id))
            .all(&txn)
            .await?;
        if items.is_empty() {
            return Err(AppError::EmptyCart);
        }

        // validate stock up front so the error names the offending book
        let mut lines: Vec<(books::Model, i32)> = Vec::with_capacity(items.len());
        for item in &items {
            let book = books::Entity::find_by_id(item.book_id)
                .one(&txn)
                .await?
                .ok_or_else(|| {
                    AppError::NotFound(format!("Book with ID {} not found", item.book_id))
                })?;

            if book.stock < item.quantity {
                return Err(AppError::InsufficientStock {
                    title: book.title,
                    available: book.stock,
                    requested: item.quantity,
                });
            }

            lines.push((book, item.quantity));
        }

        // conditional decrement; a concurrent order racing us past the check
        // above shows up as zero affected rows here
        for (book, quantity) in &lines {
            let result = books::Entity::update_many()
                .col_expr(
                    books::Column::Stock,
                    Expr::col(books::Column::Stock).sub(*quantity),
                )
                .col_expr(
                    books::Column::TotalSold,
                    Expr::col(books::Column::TotalSold).add(i64::from(*quantity)),
                )
                .filter(books::Column::Id.eq(book.id))
                .filter(books::Column::Stock.gte(*quantity))
                .exec(&txn)
                .await?;

            if result.rows_affected == 0 {
                return Err(AppError::InsufficientStock {
                    title: book.title.clone(),
                    available: book.stock,
                    requested: *quantity,
                });
            }
        }

        let completed_orders = orders::Entity::find()
            .filter(orders::Column::MemberId.eq(member_id))
            .filter(orders::Column::OrderStatus.eq(OrderStatus::Completed))
            .count(&txn)
            .await?;

        let priced = pricing::price_order(
            &lines
                .iter()
                .map(|(book, quantity)| (book.price, *quantity))
                .collect::<Vec<_>>(),
            completed_orders,
        );

        let claim_code = self.allocate_claim_code(&txn).await?;

        let now = Utc::now();
        let order = orders::ActiveModel {
            member_id: Set(member_id),
            total_price: Set(priced.total),
            discount_amount: Set(priced.discount_amount),
            applied_discounts: Set(priced.discount_tags()),
            order_status: Set(OrderStatus::Pending),
            is_paid: Set(false),
            claim_code: Set(claim_code),
            order_date: Set(now),
            pickup_deadline: Set(now + Duration::days(PICKUP_DEADLINE_DAYS)),
            cancelled_at: Set(None),
            fulfillment_method: Set("pickup".to_string()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        for (book, quantity) in &lines {
            order_items::ActiveModel {
                order_id: Set(order.id),
                book_id: Set(book.id),
                quantity: Set(*quantity),
                unit_price: Set(book.price),
                discount_applied: Set(Decimal::ZERO),
                line_total: Set(pricing::line_total(book.price, *quantity)),
                created_at: Set(now),
                updated_at: Set(now),
                ..Default::default()
            }
            .insert(&txn)
            .await?;
        }

        // the cart is consumed, not merely emptied
        cart_items::Entity::delete_many()
            .filter(cart_items::Column::CartId.eq(cart.id))
            .exec(&txn)
            .await?;
        cart.delete(&txn).await?;

        txn.commit().await?;

        let response = self.build_order_response(order).await?;
        self.notify_placed(member_id, &response).await;

        Ok(response)
    }

    pub async fn list_all(&self) -> AppResult<Vec<OrderResponse>> {
        let models = orders::Entity::find()
            .order_by_desc(orders::Column::CreatedAt)
            .all(&self.pool)
            .await?;
        self.build_order_responses(models).await
    }

    pub async fn list_mine(&self, member_id: i64) -> AppResult<Vec<OrderResponse>> {
        let models = orders::Entity::find()
            .filter(orders::Column::MemberId.eq(member_id))
            .order_by_desc(orders::Column::CreatedAt)
            .all(&self.pool)
            .await?;
        self.build_order_responses(models).await
    }

    pub async fn get_order(&self, id: i64) -> AppResult<OrderResponse> {
        let order = orders::Entity::find_by_id(id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Order not found".to_string()))?;
        self.build_order_response(order).await
    }

    /// Staff status correction, held to the same transition table as the
    /// dedicated cancel/claim flows.
    pub async fn update_status(
        &self,
        id: i64,
        request: OrderStatusUpdateRequest,
    ) -> AppResult<OrderResponse> {
        let order = orders::Entity::find_by_id(id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Order not found".to_string()))?;

        if !order.order_status.can_transition_to(request.order_status) {
            return Err(AppError::InvalidTransition(format!(
                "Cannot change order status from {} to {}",
                order.order_status, request.order_status
            )));
        }

        let member_id = order.member_id;
        let mut model = order.into_active_model();
        model.order_status = Set(request.order_status);
        if let Some(is_paid) = request.is_paid {
            model.is_paid = Set(is_paid);
        }
        model.updated_at = Set(Utc::now());

        let order = model.update(&self.pool).await?;
        let response = self.build_order_response(order).await?;

        if request.order_status == OrderStatus::Completed {
            self.notify_dispatched(member_id, &response).await;
        }

        Ok(response)
    }

    pub async fn cancel_order(&self, member_id: i64, id: i64) -> AppResult<OrderResponse> {
        let order = orders::Entity::find_by_id(id)
            .filter(orders::Column::MemberId.eq(member_id))
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Order not found or not yours".to_string()))?;

        if order.order_status != OrderStatus::Pending {
            return Err(AppError::InvalidTransition(
                "Only pending orders can be cancelled".to_string(),
            ));
        }

        let now = Utc::now();
        let mut model = order.into_active_model();
        model.order_status = Set(OrderStatus::Cancelled);
        model.cancelled_at = Set(Some(now));
        model.updated_at = Set(now);

        let order = model.update(&self.pool).await?;
        let response = self.build_order_response(order).await?;
        self.notify_cancelled(member_id, &response).await;

        Ok(response)
    }

    pub async fn claim_by_code(&self, code: &str) -> AppResult<OrderResponse> {
        if code.trim().is_empty() {
            return Err(AppError::ValidationError(
                "Claim code is required".to_string(),
            ));
        }

        let order = orders::Entity::find()
            .filter(orders::Column::ClaimCode.eq(code))
            .one(&self.pool)
            .await?
            .ok_or_else(|| {
                AppError::NotFound("No order found with the provided claim code".to_string())
            })?;

        if order.order_status != OrderStatus::Pending {
            return Err(AppError::InvalidTransition(
                "Only pending orders can be claimed".to_string(),
            ));
        }

        let mut model = order.into_active_model();
        model.order_status = Set(OrderStatus::Claimed);
        model.is_paid = Set(true);
        model.updated_at = Set(Utc::now());

        let order = model.update(&self.pool).await?;
        self.build_order_response(order).await
    }

    pub async fn delete_order(&self, id: i64) -> AppResult<OrderResponse> {
        let order = orders::Entity::find_by_id(id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Order not found".to_string()))?;

        let response = self.build_order_response(order.clone()).await?;
        // line items cascade with the order
        order.delete(&self.pool).await?;

        Ok(response)
    }

    // ===== helpers =====

    async fn allocate_claim_code(
        &self,
        txn: &sea_orm::DatabaseTransaction,
    ) -> AppResult<String> {
        for _ in 0..CLAIM_CODE_ATTEMPTS {
            let code = generate_claim_code();
            let collision = orders::Entity::find()
                .filter(orders::Column::ClaimCode.eq(&code))
                .one(txn)
                .await?
                .is_some();
            if !collision {
                return Ok(code);
            }
        }

        Err(AppError::InternalError(
            "Failed to allocate a unique claim code".to_string(),
        ))
    }

    async fn build_order_response(&self, order: orders::Model) -> AppResult<OrderResponse> {
        let mut responses = self.build_order_responses(vec![order]).await?;
        Ok(responses.remove(0))
    }

    async fn build_order_responses(
        &self,
        models: Vec<orders::Model>,
    ) -> AppResult<Vec<OrderResponse>> {
        if models.is_empty() {
            return Ok(Vec::new());
        }

        let order_ids: Vec<i64> = models.iter().map(|o| o.id).collect();
        let items = order_items::Entity::find()
            .filter(order_items::Column::OrderId.is_in(order_ids))
            .all(&self.pool)
            .await?;

        let book_ids: Vec<i64> = items.iter().map(|i| i.book_id).collect();
        let titles: HashMap<i64, String> = books::Entity::find()
            .filter(books::Column::Id.is_in(book_ids.clone()))
            .all(&self.pool)
            .await?
            .into_iter()
            .map(|b| (b.id, b.title))
            .collect();

        let mut cover_by_book: HashMap<i64, String> = HashMap::new();
        for image in book_images::Entity::find()
            .filter(book_images::Column::BookId.is_in(book_ids))
            .all(&self.pool)
            .await?
        {
            cover_by_book.entry(image.book_id).or_insert(image.url);
        }

        let mut items_by_order: HashMap<i64, Vec<OrderItemResponse>> = HashMap::new();
        for item in items {
            items_by_order
                .entry(item.order_id)
                .or_default()
                .push(OrderItemResponse {
                    book_id: item.book_id,
                    title: titles
                        .get(&item.book_id)
                        .cloned()
                        .unwrap_or_else(|| "Unknown".to_string()),
                    image: cover_by_book.get(&item.book_id).cloned(),
                    quantity: item.quantity,
                    unit_price: item.unit_price,
                    discount_applied: item.discount_applied,
                    line_total: item.line_total,
                });
        }

        Ok(models
            .into_iter()
            .map(|order| OrderResponse {
                items: items_by_order.remove(&order.id).unwrap_or_default(),
                id: order.id,
                member_id: order.member_id,
                claim_code: order.claim_code,
                total_price: order.total_price,
                discount_amount: order.discount_amount,
                applied_discounts: order.applied_discounts,
                order_status: order.order_status,
                is_paid: order.is_paid,
                order_date: order.order_date,
                pickup_deadline: order.pickup_deadline,
                cancelled_at: order.cancelled_at,
                fulfillment_method: order.fulfillment_method,
            })
            .collect())
    }

    async fn member_contact(&self, member_id: i64) -> Option<(String, String)> {
        match members::Entity::find_by_id(member_id).one(&self.pool).await {
            Ok(Some(member)) => Some((member.email, member.name)),
            Ok(None) => None,
            Err(e) => {
                log::warn!("Failed to look up member {member_id} for email: {e}");
                None
            }
        }
    }

    async fn notify_placed(&self, member_id: i64, order: &OrderResponse) {
        if let Some((email, name)) = self.member_contact(member_id).await
            && let Err(e) = self.mailer.send_order_placed(&email, &name, order).await
        {
            log::warn!("Failed to send order confirmation for order {}: {e}", order.id);
        }
    }

    async fn notify_dispatched(&self, member_id: i64, order: &OrderResponse) {
        if let Some((email, name)) = self.member_contact(member_id).await
            && let Err(e) = self.mailer.send_order_dispatched(&email, &name, order).await
        {
            log::warn!("Failed to send dispatch email for order {}: {e}", order.id);
        }
    }

    async fn notify_cancelled(&self, member_id: i64, order: &OrderResponse) {
        if let Some((email, name)) = self.member_contact(member_id).await
            && let Err(e) = self
                .mailer
                .send_order_cancelled(&email, &name, &order.claim_code)
                .await
        {
            log::warn!("Failed to send cancellation email for order {}: {e}", order.id);
        }
    }
}
