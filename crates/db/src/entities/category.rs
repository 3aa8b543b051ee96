//! Category entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A grouping of guides, addressed publicly by slug.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "category")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    pub name: String,

    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,

    /// Unique across categories.
    #[sea_orm(unique)]
    pub slug: String,

    pub created_at: DateTimeWithTimeZone,

    pub updated_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::guide_category_link::Entity")]
    GuideCategoryLink,
}

impl Related<super::guide_category_link::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::GuideCategoryLink.def()
    }
}

impl Related<super::user_guide::Entity> for Entity {
    fn to() -> RelationDef {
        super::guide_category_link::Relation::UserGuide.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::guide_category_link::Relation::Category.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
