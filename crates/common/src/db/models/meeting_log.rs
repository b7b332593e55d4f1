//! Meeting log entity
//!
//! A scheduled or ad hoc video session tied to an idea. The room name is
//! the binding between this record and the provider-side room; join tokens
//! are derived from it.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "meeting_logs")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    pub idea_id: Uuid,

    #[sea_orm(column_type = "Text")]
    pub room_name: String,

    pub scheduled_by: Uuid,

    pub scheduled_at: Option<DateTimeWithTimeZone>,

    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::idea::Entity",
        from = "Column::IdeaId",
        to = "super::idea::Column::Id"
    )]
    Idea,

    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::ScheduledBy",
        to = "super::user::Column::Id"
    )]
    ScheduledBy,
}

impl Related<super::idea::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Idea.def()
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ScheduledBy.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
