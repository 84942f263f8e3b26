use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Not unique: an admin rename may leave two rows sharing a name.
        manager
            .create_index(
                Index::create()
                    .name("idx_guest_name_key")
                    .table(Guest::Table)
                    .col(Guest::NameKey)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_guest_name_key").table(Guest::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Guest { Table, NameKey }
