//! Published idea entity

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "ideas")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    #[sea_orm(column_type = "Text")]
    pub title: String,

    #[sea_orm(column_type = "Text", nullable)]
    pub caption: Option<String>,

    #[sea_orm(column_type = "Text")]
    pub description: String,

    #[sea_orm(column_type = "Text", nullable)]
    pub odr_experience: Option<String>,

    pub owner_id: Uuid,

    /// Only approved ideas are visible through public read paths
    pub approved: bool,

    pub reviewed_by: Option<Uuid>,

    pub reviewed_at: Option<DateTimeWithTimeZone>,

    pub created_at: DateTimeWithTimeZone,

    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::OwnerId",
        to = "super::user::Column::Id"
    )]
    Owner,

    #[sea_orm(has_many = "super::comment::Entity", on_delete = "Cascade")]
    Comments,

    #[sea_orm(has_many = "super::like::Entity", on_delete = "Cascade")]
    Likes,

    #[sea_orm(has_many = "super::collaborator::Entity", on_delete = "Cascade")]
    Collaborators,

    #[sea_orm(has_many = "super::mentor::Entity", on_delete = "Cascade")]
    Mentors,

    #[sea_orm(has_many = "super::meeting_log::Entity", on_delete = "Cascade")]
    MeetingLogs,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Owner.def()
    }
}

impl Related<super::comment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Comments.def()
    }
}

impl Related<super::meeting_log::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MeetingLogs.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
