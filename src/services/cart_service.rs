use crate::entities::{
    book_entity as books, book_image_entity as book_images, cart_entity as carts,
    cart_item_entity as cart_items,
};
use crate::error::{AppError, AppResult};
use crate::models::*;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, ModelTrait,
    QueryFilter, Set,
};
use std::collections::HashMap;

#[derive(Clone)]
pub struct CartService {
    pool: DatabaseConnection,
}

impl CartService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    pub async fn get_cart(&self, member_id: i64) -> AppResult<CartResponse> {
        let Some(cart) = carts::Entity::find()
            .filter(carts::Column::MemberId.eq(member_id))
            .one(&self.pool)
            .await?
        else {
            return Ok(CartResponse { items: Vec::new() });
        };

        let items = cart_items::Entity::find()
            .filter(cart_items::Column::CartId.eq(cart.id))
            .all(&self.pool)
            .await?;
        if items.is_empty() {
            return Ok(CartResponse { items: Vec::new() });
        }

        let book_ids: Vec<i64> = items.iter().map(|i| i.book_id).collect();
        let book_map: HashMap<i64, books::Model> = books::Entity::find()
            .filter(books::Column::Id.is_in(book_ids.clone()))
            .all(&self.pool)
            .await?
            .into_iter()
            .map(|b| (b.id, b))
            .collect();

        let mut images_by_book: HashMap<i64, Vec<String>> = HashMap::new();
        for image in book_images::Entity::find()
            .filter(book_images::Column::BookId.is_in(book_ids))
            .all(&self.pool)
            .await?
        {
            images_by_book
                .entry(image.book_id)
                .or_default()
                .push(image.url);
        }

        let items = items
            .into_iter()
            .filter_map(|item| {
                let book = book_map.get(&item.book_id)?;
                Some(CartItemResponse {
                    book_id: book.id,
                    title: book.title.clone(),
                    price: book.price,
                    quantity: item.quantity,
                    images: images_by_book.remove(&book.id).unwrap_or_default(),
                })
            })
            .collect();

        Ok(CartResponse { items })
    }

    pub async fn add_to_cart(&self, member_id: i64, request: AddToCartRequest) -> AppResult<()> {
        if request.quantity < 1 {
            return Err(AppError::ValidationError(
                "Quantity must be at least 1".to_string(),
            ));
        }

        let book = books::Entity::find_by_id(request.book_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Book not found".to_string()))?;

        if book.stock < request.quantity {
            return Err(AppError::InsufficientStock {
                title: book.title,
                available: book.stock,
                requested: request.quantity,
            });
        }

        let now = Utc::now();

        // lazily create the member's cart on first add
        let cart = match carts::Entity::find()
            .filter(carts::Column::MemberId.eq(member_id))
            .one(&self.pool)
            .await?
        {
            Some(cart) => cart,
            None => {
                carts::ActiveModel {
                    member_id: Set(member_id),
                    created_at: Set(now),
                    updated_at: Set(now),
                    ..Default::default()
                }
                .insert(&self.pool)
                .await?
            }
        };

        let existing = cart_items::Entity::find()
            .filter(cart_items::Column::CartId.eq(cart.id))
            .filter(cart_items::Column::BookId.eq(request.book_id))
            .one(&self.pool)
            .await?;

        match existing {
            Some(item) => {
                let new_quantity = item.quantity + request.quantity;
                if new_quantity > book.stock {
                    return Err(AppError::InsufficientStock {
                        title: book.title,
                        available: book.stock,
                        requested: new_quantity,
                    });
                }
                let mut model = item.into_active_model();
                model.quantity = Set(new_quantity);
                model.updated_at = Set(now);
                model.update(&self.pool).await?;
            }
            None => {
                cart_items::ActiveModel {
                    cart_id: Set(cart.id),
                    book_id: Set(request.book_id),
                    quantity: Set(request.quantity),
                    date_added: Set(now),
                    updated_at: Set(now),
                    ..Default::default()
                }
                .insert(&self.pool)
                .await?;
            }
        }

        let mut cart_model = cart.into_active_model();
        cart_model.updated_at = Set(now);
        cart_model.update(&self.pool).await?;

        Ok(())
    }

    pub async fn update_quantity(
        &self,
        member_id: i64,
        book_id: i64,
        request: UpdateCartRequest,
    ) -> AppResult<()> {
        if request.quantity < 1 {
            return Err(AppError::ValidationError(
                "Quantity must be at least 1".to_string(),
            ));
        }

        let (item, book) = self.find_member_item(member_id, book_id).await?;

        if book.stock < request.quantity {
            return Err(AppError::InsufficientStock {
                title: book.title,
                available: book.stock,
                requested: request.quantity,
            });
        }

        let mut model = item.into_active_model();
        model.quantity = Set(request.quantity);
        model.updated_at = Set(Utc::now());
        model.update(&self.pool).await?;

        Ok(())
    }

    pub async fn remove_item(&self, member_id: i64, book_id: i64) -> AppResult<()> {
        let (item, _) = self.find_member_item(member_id, book_id).await?;
        item.delete(&self.pool).await?;
        Ok(())
    }

    pub async fn clear_cart(&self, member_id: i64) -> AppResult<()> {
        let Some(cart) = carts::Entity::find()
            .filter(carts::Column::MemberId.eq(member_id))
            .one(&self.pool)
            .await?
        else {
            return Ok(());
        };

        cart_items::Entity::delete_many()
            .filter(cart_items::Column::CartId.eq(cart.id))
            .exec(&self.pool)
            .await?;

        Ok(())
    }

    async fn find_member_item(
        &self,
        member_id: i64,
        book_id: i64,
    ) -> AppResult<(cart_items::Model, books::Model)> {
        let cart = carts::Entity::find()
            .filter(carts::Column::MemberId.eq(member_id))
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Item not found in cart".to_string()))?;

        let item = cart_items::Entity::find()
            .filter(cart_items::Column::CartId.eq(cart.id))
            .filter(cart_items::Column::BookId.eq(book_id))
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Item not found in cart".to_string()))?;

        let book = books::Entity::find_by_id(item.book_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Book not found".to_string()))?;

        Ok((item, book))
    }
}
