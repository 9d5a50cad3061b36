//! Create reaction table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Reaction::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Reaction::Id)
                            .string_len(36)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Reaction::UserId).string_len(36).not_null())
                    .col(
                        ColumnDef::new(Reaction::SubjectType)
                            .string_len(16)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Reaction::SubjectId).string_len(36).not_null())
                    .col(
                        ColumnDef::new(Reaction::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_reaction_user")
                            .from(Reaction::Table, Reaction::UserId)
                            .to(UserProfile::Table, UserProfile::UserId)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Unique index: one reaction per user per subject.
        // No foreign key on the subject: comments live outside this service.
        manager
            .create_index(
                Index::create()
                    .name("idx_reaction_user_subject")
                    .table(Reaction::Table)
                    .col(Reaction::UserId)
                    .col(Reaction::SubjectType)
                    .col(Reaction::SubjectId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Index: (subject_type, subject_id) for listing and counting
        manager
            .create_index(
                Index::create()
                    .name("idx_reaction_subject")
                    .table(Reaction::Table)
                    .col(Reaction::SubjectType)
                    .col(Reaction::SubjectId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Reaction::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Reaction {
    Table,
    Id,
    UserId,
    SubjectType,
    SubjectId,
    CreatedAt,
}

#[derive(Iden)]
enum UserProfile {
    Table,
    UserId,
}
