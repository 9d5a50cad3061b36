//! Create publication table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Publication::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Publication::Id)
                            .string_len(36)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Publication::AuthorId).string_len(36).not_null())
                    .col(ColumnDef::new(Publication::Content).text().not_null())
                    .col(ColumnDef::new(Publication::Type).string_len(32).not_null())
                    .col(
                        ColumnDef::new(Publication::Visibility)
                            .string_len(16)
                            .not_null()
                            .default("public"),
                    )
                    .col(
                        ColumnDef::new(Publication::LikesCount)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Publication::CommentsCount)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Publication::SharesCount)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Publication::Metadata).json_binary())
                    .col(
                        ColumnDef::new(Publication::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Publication::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Publication::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_publication_author")
                            .from(Publication::Table, Publication::AuthorId)
                            .to(UserProfile::Table, UserProfile::UserId)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Composite index: (author_id, id) for author feeds
        manager
            .create_index(
                Index::create()
                    .name("idx_publication_author_id_id")
                    .table(Publication::Table)
                    .col(Publication::AuthorId)
                    .col(Publication::Id)
                    .to_owned(),
            )
            .await?;

        // Index: visibility + created_at (for the public slice of the feed)
        manager
            .create_index(
                Index::create()
                    .name("idx_publication_visibility_created_at")
                    .table(Publication::Table)
                    .col(Publication::Visibility)
                    .col(Publication::CreatedAt)
                    .to_owned(),
            )
            .await?;

        // Partial index matching the feed's exact sort over active rows.
        manager
            .get_connection()
            .execute_unprepared(
                r"
                CREATE INDEX IF NOT EXISTS idx_publication_feed
                ON publication (created_at DESC, id ASC)
                WHERE is_active = true;
                ",
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Publication::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Publication {
    Table,
    Id,
    AuthorId,
    Content,
    Type,
    Visibility,
    LikesCount,
    CommentsCount,
    SharesCount,
    Metadata,
    IsActive,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum UserProfile {
    Table,
    UserId,
}
