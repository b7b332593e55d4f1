//! Request handlers

pub mod auth;
pub mod collaboration;
pub mod comments;
pub mod health;
pub mod ideas;
pub mod likes;
pub mod meetings;
pub mod moderation;
pub mod profile;
pub mod submissions;

use odrlab_common::db::models::User;
use serde::Serialize;
use uuid::Uuid;

/// Full profile shape returned by auth and profile endpoints
#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: String,
    pub phone: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub institution: Option<String>,
    pub highest_education: Option<String>,
    pub usage_note: Option<String>,
    pub created_at: String,
}

impl From<&User> for ProfileResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role.clone(),
            phone: user.phone.clone(),
            city: user.city.clone(),
            country: user.country.clone(),
            institution: user.institution.clone(),
            highest_education: user.highest_education.clone(),
            usage_note: user.usage_note.clone(),
            created_at: user.created_at.to_rfc3339(),
        }
    }
}
