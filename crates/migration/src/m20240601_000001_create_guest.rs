//! Create `guest` table.
//!
//! One row per confirmed attendee. `name_key` holds the trimmed, lowercased
//! name used for case-insensitive lookups.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Guest::Table)
                    .if_not_exists()
                    .col(uuid(Guest::Id).primary_key())
                    .col(string_len(Guest::Name, 255).not_null())
                    .col(string_len(Guest::NameKey, 255).not_null())
                    .col(timestamp_with_time_zone(Guest::ConfirmedAt).not_null())
                    .col(
                        ColumnDef::new(Guest::UpdatedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Guest::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Guest { Table, Id, Name, NameKey, ConfirmedAt, UpdatedAt }
