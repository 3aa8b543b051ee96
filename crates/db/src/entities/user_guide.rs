//! User guide entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A help article with a structured block body.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user_guide")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    pub title: String,

    /// Unique across guides.
    #[sea_orm(unique)]
    pub slug: String,

    /// Block document, `{"blocks": [...]}`. Shape is enforced on write.
    #[sea_orm(column_type = "JsonBinary")]
    pub body: Json,

    /// Minutes, 1..=300.
    pub estimated_read_time: i32,

    pub created_at: DateTimeWithTimeZone,

    pub updated_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::guide_category_link::Entity")]
    GuideCategoryLink,
    #[sea_orm(has_many = "super::guide_media_link::Entity")]
    GuideMediaLink,
}

impl Related<super::guide_category_link::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::GuideCategoryLink.def()
    }
}

impl Related<super::guide_media_link::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::GuideMediaLink.def()
    }
}

impl Related<super::category::Entity> for Entity {
    fn to() -> RelationDef {
        super::guide_category_link::Relation::Category.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::guide_category_link::Relation::UserGuide.def().rev())
    }
}

impl Related<super::media::Entity> for Entity {
    fn to() -> RelationDef {
        super::guide_media_link::Relation::Media.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::guide_media_link::Relation::UserGuide.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
