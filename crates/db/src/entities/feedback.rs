//! Feedback entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A message submitted by a reader. Never updated after insert.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "feedback")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    pub name: String,

    /// Stored lowercased.
    pub email: String,

    #[sea_orm(column_type = "Text")]
    pub message: String,

    pub expect_reply: bool,

    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
