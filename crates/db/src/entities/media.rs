//! Media entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// An image or video referenced by guides.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "media")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    #[sea_orm(column_type = "Text")]
    pub url: String,

    pub alt: Option<String>,

    pub created_at: DateTimeWithTimeZone,

    pub updated_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::guide_media_link::Entity")]
    GuideMediaLink,
}

impl Related<super::guide_media_link::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::GuideMediaLink.def()
    }
}

impl Related<super::user_guide::Entity> for Entity {
    fn to() -> RelationDef {
        super::guide_media_link::Relation::UserGuide.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::guide_media_link::Relation::Media.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
