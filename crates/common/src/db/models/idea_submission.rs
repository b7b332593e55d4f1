//! Pending idea submission entity
//!
//! Submissions are the moderation queue. An approved submission is retained
//! as an audit record next to the published idea it produced.

use crate::moderation::ReviewState;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "idea_submissions")]
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

    pub reviewed: bool,

    pub approved: bool,

    pub rejected: bool,

    #[sea_orm(column_type = "Text", nullable)]
    pub rejection_reason: Option<String>,

    pub reviewed_by: Option<Uuid>,

    pub reviewed_at: Option<DateTimeWithTimeZone>,

    pub created_at: DateTimeWithTimeZone,
}

impl Model {
    /// Get the derived moderation state
    pub fn review_state(&self) -> ReviewState {
        ReviewState::of(self.reviewed, self.approved, self.rejected)
    }

    /// Check whether a moderation decision has been recorded
    pub fn is_reviewed(&self) -> bool {
        self.review_state() != ReviewState::Pending
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::OwnerId",
        to = "super::user::Column::Id"
    )]
    Owner,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Owner.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
