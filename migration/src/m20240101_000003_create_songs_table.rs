use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Songs::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Songs::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Songs::SongId)
                            .string_len(100)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Songs::SongName)
                            .string_len(500)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Songs::SongDuration)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Songs::SongUrl)
                            .text()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Songs::SongPopularity)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Songs::SongAdded)
                            .date()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Songs::AlbumId)
                            .string_len(100)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Songs::ArtistId)
                            .string_len(100)
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_songs_song_id")
                    .table(Songs::Table)
                    .col(Songs::SongId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_songs_album_id")
                    .table(Songs::Table)
                    .col(Songs::AlbumId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Songs::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Songs {
    Table,
    Id,
    SongId,
    SongName,
    SongDuration,
    SongUrl,
    SongPopularity,
    SongAdded,
    AlbumId,
    ArtistId,
}
