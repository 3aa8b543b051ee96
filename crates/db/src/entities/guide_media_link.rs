//! Guide/media association entity.

use sea_orm::entity::prelude::*;

/// One media-in-guide association. Identified only by the id pair.
#[derive(Clone, Debug, PartialEq, Eq, Hash, DeriveEntityModel)]
#[sea_orm(table_name = "guide_media_link")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub guide_id: Uuid,

    #[sea_orm(primary_key, auto_increment = false)]
    pub media_id: Uuid,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user_guide::Entity",
        from = "Column::GuideId",
        to = "super::user_guide::Column::Id"
    )]
    UserGuide,
    #[sea_orm(
        belongs_to = "super::media::Entity",
        from = "Column::MediaId",
        to = "super::media::Column::Id"
    )]
    Media,
}

impl Related<super::user_guide::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::UserGuide.def()
    }
}

impl Related<super::media::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Media.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
