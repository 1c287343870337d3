use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Artist::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Artist::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Artist::ArtistId)
                            .string_len(100)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Artist::ArtistName)
                            .string_len(500)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Artist::ExternalUrl)
                            .text()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_artist_artist_id")
                    .table(Artist::Table)
                    .col(Artist::ArtistId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Artist::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Artist {
    Table,
    Id,
    ArtistId,
    ArtistName,
    ExternalUrl,
}
