//! User entity

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Account role enum
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Innovator,
    Mentor,
    Admin,
    Other,
}

impl From<String> for UserRole {
    fn from(s: String) -> Self {
        match s.as_str() {
            "innovator" => UserRole::Innovator,
            "mentor" => UserRole::Mentor,
            "admin" => UserRole::Admin,
            _ => UserRole::Other,
        }
    }
}

impl From<UserRole> for String {
    fn from(role: UserRole) -> Self {
        match role {
            UserRole::Innovator => "innovator".to_string(),
            UserRole::Mentor => "mentor".to_string(),
            UserRole::Admin => "admin".to_string(),
            UserRole::Other => "other".to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    #[sea_orm(column_type = "Text")]
    pub name: String,

    #[sea_orm(column_type = "Text", unique)]
    pub email: String,

    /// Argon2 hash, never the plaintext
    #[sea_orm(column_type = "Text")]
    #[serde(skip_serializing)]
    pub password_hash: String,

    #[sea_orm(column_type = "Text")]
    pub role: String,

    #[sea_orm(column_type = "Text", nullable)]
    pub phone: Option<String>,

    #[sea_orm(column_type = "Text", nullable)]
    pub city: Option<String>,

    #[sea_orm(column_type = "Text", nullable)]
    pub country: Option<String>,

    #[sea_orm(column_type = "Text", nullable)]
    pub institution: Option<String>,

    #[sea_orm(column_type = "Text", nullable)]
    pub highest_education: Option<String>,

    #[sea_orm(column_type = "Text", nullable)]
    pub usage_note: Option<String>,

    pub created_at: DateTimeWithTimeZone,
}

impl Model {
    /// Get the account role as an enum
    pub fn user_role(&self) -> UserRole {
        UserRole::from(self.role.clone())
    }

    /// Check for the admin role
    pub fn is_admin(&self) -> bool {
        self.user_role() == UserRole::Admin
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::idea::Entity")]
    Ideas,

    #[sea_orm(has_many = "super::idea_submission::Entity")]
    Submissions,

    #[sea_orm(has_many = "super::comment::Entity")]
    Comments,

    #[sea_orm(has_many = "super::like::Entity")]
    Likes,
}

impl Related<super::idea::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Ideas.def()
    }
}

impl Related<super::comment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Comments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_roundtrip() {
        for role in [
            UserRole::Innovator,
            UserRole::Mentor,
            UserRole::Admin,
            UserRole::Other,
        ] {
            assert_eq!(UserRole::from(String::from(role)), role);
        }
    }

    #[test]
    fn test_unknown_role_maps_to_other() {
        assert_eq!(UserRole::from("faculty".to_string()), UserRole::Other);
    }
}
