//! Create user_guide table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(UserGuide::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(UserGuide::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(UserGuide::Title).string_len(200).not_null())
                    .col(ColumnDef::new(UserGuide::Slug).string_len(100).not_null())
                    .col(ColumnDef::new(UserGuide::Body).json_binary().not_null())
                    .col(
                        ColumnDef::new(UserGuide::EstimatedReadTime)
                            .integer()
                            .not_null()
                            .check(Expr::col(UserGuide::EstimatedReadTime).gt(0)),
                    )
                    .col(
                        ColumnDef::new(UserGuide::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(UserGuide::UpdatedAt).timestamp_with_time_zone())
                    .to_owned(),
            )
            .await?;

        // Unique index: slug
        manager
            .create_index(
                Index::create()
                    .name("idx_user_guide_slug")
                    .table(UserGuide::Table)
                    .col(UserGuide::Slug)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(UserGuide::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum UserGuide {
    Table,
    Id,
    Title,
    Slug,
    Body,
    EstimatedReadTime,
    CreatedAt,
    UpdatedAt,
}
