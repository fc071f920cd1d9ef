use crate::entities::{announcement_entity as announcements, member_entity as members};
use crate::error::{AppError, AppResult};
use crate::external::PushService;
use crate::models::*;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, IntoActiveModel,
    ModelTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};
use serde_json::json;

const LATEST_VISIBLE: u64 = 5;

#[derive(Clone)]
pub struct AnnouncementService {
    pool: DatabaseConnection,
    push_service: PushService,
}

impl AnnouncementService {
    pub fn new(pool: DatabaseConnection, push_service: PushService) -> Self {
        Self { pool, push_service }
    }

    pub async fn create_announcement(
        &self,
        request: AnnouncementCreateRequest,
    ) -> AppResult<AnnouncementResponse> {
        if request.title.trim().is_empty() || request.message.trim().is_empty() {
            return Err(AppError::ValidationError(
                "Title and message are required".to_string(),
            ));
        }

        if let Some(member_id) = request.member_id {
            members::Entity::find_by_id(member_id)
                .one(&self.pool)
                .await?
                .ok_or_else(|| AppError::NotFound("Target member not found".to_string()))?;
        }

        let now = Utc::now();
        let model = announcements::ActiveModel {
            member_id: Set(request.member_id),
            title: Set(request.title),
            message: Set(request.message),
            start_date: Set(request.start_date),
            end_date: Set(request.end_date),
            is_active: Set(request.is_active),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.pool)
        .await?;

        self.broadcast(&model).await;

        Ok(model.into())
    }

    /// Visible to a member: active, scoped to them or unscoped, and the
    /// current instant inside [start, end] with a null end unbounded.
    pub async fn visible_for_member(&self, member_id: i64) -> AppResult<Vec<AnnouncementResponse>> {
        let now = Utc::now();
        let models = announcements::Entity::find()
            .filter(announcements::Column::IsActive.eq(true))
            .filter(
                Condition::any()
                    .add(announcements::Column::MemberId.is_null())
                    .add(announcements::Column::MemberId.eq(member_id)),
            )
            .filter(announcements::Column::StartDate.lte(now))
            .filter(
                Condition::any()
                    .add(announcements::Column::EndDate.is_null())
                    .add(announcements::Column::EndDate.gte(now)),
            )
            .order_by_desc(announcements::Column::CreatedAt)
            .limit(LATEST_VISIBLE)
            .all(&self.pool)
            .await?;

        Ok(models.into_iter().map(Into::into).collect())
    }

    pub async fn list_all(&self) -> AppResult<Vec<AnnouncementResponse>> {
        let models = announcements::Entity::find()
            .order_by_desc(announcements::Column::CreatedAt)
            .all(&self.pool)
            .await?;
        Ok(models.into_iter().map(Into::into).collect())
    }

    pub async fn list_public(&self) -> AppResult<Vec<AnnouncementResponse>> {
        let models = announcements::Entity::find()
            .filter(announcements::Column::MemberId.is_null())
            .order_by_desc(announcements::Column::CreatedAt)
            .all(&self.pool)
            .await?;
        Ok(models.into_iter().map(Into::into).collect())
    }

    pub async fn get_announcement(&self, id: i64) -> AppResult<AnnouncementResponse> {
        let model = announcements::Entity::find_by_id(id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Announcement not found".to_string()))?;
        Ok(model.into())
    }

    pub async fn update_announcement(
        &self,
        id: i64,
        request: AnnouncementCreateRequest,
    ) -> AppResult<AnnouncementResponse> {
        if request.title.trim().is_empty() || request.message.trim().is_empty() {
            return Err(AppError::ValidationError(
                "Title and message are required".to_string(),
            ));
        }

        let mut model = announcements::Entity::find_by_id(id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Announcement not found".to_string()))?
            .into_active_model();

        model.title = Set(request.title);
        model.message = Set(request.message);
        model.start_date = Set(request.start_date);
        model.end_date = Set(request.end_date);
        model.is_active = Set(request.is_active);
        model.updated_at = Set(Utc::now());

        let model = model.update(&self.pool).await?;
        Ok(model.into())
    }

    pub async fn delete_announcement(&self, id: i64) -> AppResult<()> {
        let model = announcements::Entity::find_by_id(id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Announcement not found".to_string()))?;

        model.delete(&self.pool).await?;
        Ok(())
    }

    async fn broadcast(&self, model: &announcements::Model) {
        let channel = PushService::announcement_channel(model.member_id);
        let audience = match model.member_id {
            Some(id) => format!("user.{id}"),
            None => "public".to_string(),
        };
        let payload = json!({
            "id": model.id,
            "title": model.title,
            "message": model.message,
            "start_date": model.start_date,
            "end_date": model.end_date,
            "is_active": model.is_active,
            "audience": audience,
        });

        if let Err(e) = self
            .push_service
            .trigger(&channel, "NewAnnouncement", &payload)
            .await
        {
            log::warn!("Failed to push announcement {} to {channel}: {e}", model.id);
        }
    }
}
