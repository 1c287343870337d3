use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Album::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Album::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Album::AlbumId)
                            .string_len(100)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Album::AlbumName)
                            .string_len(500)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Album::AlbumReleaseDate)
                            .date(),
                    )
                    .col(
                        ColumnDef::new(Album::AlbumTotalTracks)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Album::AlbumUrl)
                            .text()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // Loads append, so album_id is indexed but not unique
        manager
            .create_index(
                Index::create()
                    .name("idx_album_album_id")
                    .table(Album::Table)
                    .col(Album::AlbumId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Album::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Album {
    Table,
    Id,
    AlbumId,
    AlbumName,
    AlbumReleaseDate,
    AlbumTotalTracks,
    AlbumUrl,
}
