use crate::entities::{AdminRole, admin_entity, member_entity};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
pub struct SignupRequest {
    #[schema(example = "Jane Doe")]
    pub name: String,
    #[schema(example = "janedoe")]
    pub username: String,
    #[schema(example = "jane@example.com")]
    pub email: String,
    #[schema(example = "Password123")]
    pub password: String,
    #[schema(example = "+9779812345678")]
    pub phone: String,
    #[schema(example = "female")]
    pub gender: String,
    #[schema(example = "1990-01-01")]
    pub date_of_birth: Option<NaiveDate>,
    /// Only "member" registration is allowed from this route
    #[schema(example = "member")]
    pub role: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct AdminRegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub phone: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    #[schema(example = "jane@example.com")]
    pub email: String,
    #[schema(example = "Password123")]
    pub password: String,
    /// "member" or "admin"
    #[schema(example = "member")]
    pub role: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub gender: Option<String>,
    #[schema(example = "1990-01-01")]
    pub date_of_birth: Option<NaiveDate>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MemberResponse {
    pub id: i64,
    pub name: String,
    pub username: String,
    pub email: String,
    pub phone: String,
    pub gender: String,
    pub date_of_birth: Option<NaiveDate>,
    pub membership_id: String,
    pub membership_status: String,
    pub date_of_registration: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub role: String,
}

impl From<member_entity::Model> for MemberResponse {
    fn from(m: member_entity::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            username: m.username,
            email: m.email,
            phone: m.phone,
            gender: m.gender,
            date_of_birth: m.date_of_birth,
            membership_id: m.membership_id,
            membership_status: m.membership_status,
            date_of_registration: m.date_of_registration,
            last_login: m.last_login,
            created_at: m.created_at,
            updated_at: m.updated_at,
            role: "member".to_string(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AdminResponse {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub role: AdminRole,
    pub last_login: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<admin_entity::Model> for AdminResponse {
    fn from(a: admin_entity::Model) -> Self {
        Self {
            id: a.id,
            name: a.name,
            email: a.email,
            phone: a.phone,
            role: a.role,
            last_login: a.last_login,
            created_at: a.created_at,
            updated_at: a.updated_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(untagged)]
pub enum UserProfile {
    Member(MemberResponse),
    Admin(AdminResponse),
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AuthResponse {
    pub user: UserProfile,
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: i64,
}
