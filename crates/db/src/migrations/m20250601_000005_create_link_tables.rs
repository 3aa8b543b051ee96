//! Create guide_category_link and guide_media_link tables migration.
//!
//! Foreign keys are declared without `ON DELETE CASCADE`; association rows
//! are removed explicitly by the repositories before the referenced row.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(GuideCategoryLink::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(GuideCategoryLink::GuideId).uuid().not_null())
                    .col(ColumnDef::new(GuideCategoryLink::CategoryId).uuid().not_null())
                    .primary_key(
                        Index::create()
                            .col(GuideCategoryLink::GuideId)
                            .col(GuideCategoryLink::CategoryId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_guide_category_link_guide")
                            .from(GuideCategoryLink::Table, GuideCategoryLink::GuideId)
                            .to(UserGuide::Table, UserGuide::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_guide_category_link_category")
                            .from(GuideCategoryLink::Table, GuideCategoryLink::CategoryId)
                            .to(Category::Table, Category::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: category_id (for listing guides in a category)
        manager
            .create_index(
                Index::create()
                    .name("idx_guide_category_link_category_id")
                    .table(GuideCategoryLink::Table)
                    .col(GuideCategoryLink::CategoryId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(GuideMediaLink::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(GuideMediaLink::GuideId).uuid().not_null())
                    .col(ColumnDef::new(GuideMediaLink::MediaId).uuid().not_null())
                    .primary_key(
                        Index::create()
                            .col(GuideMediaLink::GuideId)
                            .col(GuideMediaLink::MediaId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_guide_media_link_guide")
                            .from(GuideMediaLink::Table, GuideMediaLink::GuideId)
                            .to(UserGuide::Table, UserGuide::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_guide_media_link_media")
                            .from(GuideMediaLink::Table, GuideMediaLink::MediaId)
                            .to(Media::Table, Media::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: media_id (for finding which guides use a media item)
        manager
            .create_index(
                Index::create()
                    .name("idx_guide_media_link_media_id")
                    .table(GuideMediaLink::Table)
                    .col(GuideMediaLink::MediaId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(GuideMediaLink::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(GuideCategoryLink::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum GuideCategoryLink {
    Table,
    GuideId,
    CategoryId,
}

#[derive(Iden)]
enum GuideMediaLink {
    Table,
    GuideId,
    MediaId,
}

#[derive(Iden)]
enum UserGuide {
    Table,
    Id,
}

#[derive(Iden)]
enum Category {
    Table,
    Id,
}

#[derive(Iden)]
enum Media {
    Table,
    Id,
}
