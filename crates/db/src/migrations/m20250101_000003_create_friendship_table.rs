//! Create friendship table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Friendship::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Friendship::Id)
                            .string_len(36)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Friendship::RequesterId)
                            .string_len(36)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Friendship::AddresseeId)
                            .string_len(36)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Friendship::Status)
                            .string_len(16)
                            .not_null()
                            .default("pending"),
                    )
                    .col(
                        ColumnDef::new(Friendship::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Friendship::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_friendship_requester")
                            .from(Friendship::Table, Friendship::RequesterId)
                            .to(UserProfile::Table, UserProfile::UserId)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_friendship_addressee")
                            .from(Friendship::Table, Friendship::AddresseeId)
                            .to(UserProfile::Table, UserProfile::UserId)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // One edge per unordered pair, regardless of who sent the request.
        manager
            .get_connection()
            .execute_unprepared(
                r"
                CREATE UNIQUE INDEX IF NOT EXISTS idx_friendship_pair
                ON friendship (LEAST(requester_id, addressee_id), GREATEST(requester_id, addressee_id));
                ",
            )
            .await?;

        // Index: requester_id (for listing sent requests and friend sets)
        manager
            .create_index(
                Index::create()
                    .name("idx_friendship_requester_id")
                    .table(Friendship::Table)
                    .col(Friendship::RequesterId)
                    .to_owned(),
            )
            .await?;

        // Index: addressee_id + status (for incoming pending requests)
        manager
            .create_index(
                Index::create()
                    .name("idx_friendship_addressee_status")
                    .table(Friendship::Table)
                    .col(Friendship::AddresseeId)
                    .col(Friendship::Status)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Friendship::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Friendship {
    Table,
    Id,
    RequesterId,
    AddresseeId,
    Status,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum UserProfile {
    Table,
    UserId,
}
