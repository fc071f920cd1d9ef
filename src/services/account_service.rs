use crate::entities::{AdminRole, admin_entity as admins, member_entity as members};
use crate::error::{AppError, AppResult};
use crate::external::Mailer;
use crate::models::*;
use crate::utils::{
    JwtService, Role, generate_reset_code, hash_password, validate_email, validate_password,
    verify_password,
};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, QueryFilter,
    Set,
};
use uuid::Uuid;

#[derive(Clone)]
pub struct AccountService {
    pool: DatabaseConnection,
    jwt_service: JwtService,
    mailer: Mailer,
}

impl AccountService {
    pub fn new(pool: DatabaseConnection, jwt_service: JwtService, mailer: Mailer) -> Self {
        Self {
            pool,
            jwt_service,
            mailer,
        }
    }

    pub async fn signup(&self, request: SignupRequest) -> AppResult<AuthResponse> {
        if request.role.to_lowercase() != "member" {
            return Err(AppError::ValidationError(
                "Only 'member' registration is allowed from this route".to_string(),
            ));
        }

        validate_email(&request.email)?;
        validate_password(&request.password)?;

        let email_taken = members::Entity::find()
            .filter(members::Column::Email.eq(&request.email))
            .one(&self.pool)
            .await?
            .is_some();
        if email_taken {
            return Err(AppError::Conflict(
                "Member email already exists".to_string(),
            ));
        }

        let username_taken = members::Entity::find()
            .filter(members::Column::Username.eq(&request.username))
            .one(&self.pool)
            .await?
            .is_some();
        if username_taken {
            return Err(AppError::Conflict("Username already taken".to_string()));
        }

        let now = Utc::now();
        let member = members::ActiveModel {
            name: Set(request.name),
            username: Set(request.username),
            email: Set(request.email),
            password_hash: Set(hash_password(&request.password)?),
            phone: Set(request.phone),
            gender: Set(request.gender),
            date_of_birth: Set(request.date_of_birth),
            membership_id: Set(Uuid::new_v4().to_string()),
            membership_status: Set("active".to_string()),
            date_of_registration: Set(now),
            last_login: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.pool)
        .await?;

        self.build_auth_response(member.id, Role::Member, UserProfile::Member(member.into()))
    }

    pub async fn register_admin(&self, request: AdminRegisterRequest) -> AppResult<AuthResponse> {
        validate_email(&request.email)?;
        validate_password(&request.password)?;

        let email_taken = admins::Entity::find()
            .filter(admins::Column::Email.eq(&request.email))
            .one(&self.pool)
            .await?
            .is_some();
        if email_taken {
            return Err(AppError::Conflict("Admin email already exists".to_string()));
        }

        let now = Utc::now();
        let admin = admins::ActiveModel {
            name: Set(request.name),
            email: Set(request.email),
            password_hash: Set(hash_password(&request.password)?),
            phone: Set(request.phone),
            role: Set(AdminRole::Admin),
            last_login: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.pool)
        .await?;

        self.build_auth_response(admin.id, Role::Admin, UserProfile::Admin(admin.into()))
    }

    pub async fn login(&self, request: LoginRequest) -> AppResult<AuthResponse> {
        match request.role.to_lowercase().as_str() {
            "member" => {
                let member = members::Entity::find()
                    .filter(members::Column::Email.eq(&request.email))
                    .one(&self.pool)
                    .await?
                    .ok_or_else(|| {
                        AppError::AuthError("Invalid email or password".to_string())
                    })?;

                if !verify_password(&request.password, &member.password_hash)? {
                    return Err(AppError::AuthError(
                        "Invalid email or password".to_string(),
                    ));
                }

                let now = Utc::now();
                let mut model = member.into_active_model();
                model.last_login = Set(Some(now));
                model.updated_at = Set(now);
                let member = model.update(&self.pool).await?;

                self.build_auth_response(
                    member.id,
                    Role::Member,
                    UserProfile::Member(member.into()),
                )
            }
            "admin" => {
                let admin = admins::Entity::find()
                    .filter(admins::Column::Email.eq(&request.email))
                    .one(&self.pool)
                    .await?
                    .ok_or_else(|| {
                        AppError::AuthError("Invalid email or password".to_string())
                    })?;

                if !verify_password(&request.password, &admin.password_hash)? {
                    return Err(AppError::AuthError(
                        "Invalid email or password".to_string(),
                    ));
                }

                let now = Utc::now();
                let mut model = admin.into_active_model();
                model.last_login = Set(Some(now));
                model.updated_at = Set(now);
                let admin = model.update(&self.pool).await?;

                self.build_auth_response(admin.id, Role::Admin, UserProfile::Admin(admin.into()))
            }
            _ => Err(AppError::ValidationError(
                "Invalid role. Must be 'admin' or 'member'".to_string(),
            )),
        }
    }

    pub async fn refresh(&self, refresh_token: &str) -> AppResult<AuthResponse> {
        let claims = self.jwt_service.verify_refresh_token(refresh_token)?;
        let user_id: i64 = claims
            .sub
            .parse()
            .map_err(|_| AppError::AuthError("Invalid token subject".to_string()))?;

        let profile = self.get_profile(user_id, claims.role).await?;
        self.build_auth_response(user_id, claims.role, profile)
    }

    pub async fn get_profile(&self, user_id: i64, role: Role) -> AppResult<UserProfile> {
        match role {
            Role::Member => {
                let member = members::Entity::find_by_id(user_id)
                    .one(&self.pool)
                    .await?
                    .ok_or_else(|| AppError::NotFound("Member not found".to_string()))?;
                Ok(UserProfile::Member(member.into()))
            }
            Role::Admin | Role::Staff => {
                let admin = admins::Entity::find_by_id(user_id)
                    .one(&self.pool)
                    .await?
                    .ok_or_else(|| AppError::NotFound("Admin not found".to_string()))?;
                Ok(UserProfile::Admin(admin.into()))
            }
        }
    }

    pub async fn update_profile(
        &self,
        member_id: i64,
        request: UpdateProfileRequest,
    ) -> AppResult<MemberResponse> {
        if request.name.is_none()
            && request.phone.is_none()
            && request.gender.is_none()
            && request.date_of_birth.is_none()
        {
            return Err(AppError::ValidationError("No fields to update".to_string()));
        }

        let mut model = members::Entity::find_by_id(member_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Member not found".to_string()))?
            .into_active_model();

        if let Some(name) = request.name {
            model.name = Set(name);
        }
        if let Some(phone) = request.phone {
            model.phone = Set(phone);
        }
        if let Some(gender) = request.gender {
            model.gender = Set(gender);
        }
        if let Some(date_of_birth) = request.date_of_birth {
            model.date_of_birth = Set(Some(date_of_birth));
        }
        model.updated_at = Set(Utc::now());

        let member = model.update(&self.pool).await?;
        Ok(member.into())
    }

    pub async fn forgot_password(&self, request: ForgotPasswordRequest) -> AppResult<()> {
        let member = members::Entity::find()
            .filter(members::Column::Email.eq(&request.email))
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Email not found".to_string()))?;

        let code = generate_reset_code();
        self.mailer.send_password_reset(&member.email, &code).await?;

        Ok(())
    }

    fn build_auth_response(
        &self,
        user_id: i64,
        role: Role,
        user: UserProfile,
    ) -> AppResult<AuthResponse> {
        Ok(AuthResponse {
            user,
            access_token: self.jwt_service.generate_access_token(user_id, role)?,
            refresh_token: self.jwt_service.generate_refresh_token(user_id, role)?,
            expires_in: self.jwt_service.get_access_token_expires_in(),
        })
    }
}
