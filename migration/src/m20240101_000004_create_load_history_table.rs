use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(LoadHistory::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(LoadHistory::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(LoadHistory::PipeName)
                            .string_len(50)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(LoadHistory::FilePath)
                            .text()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(LoadHistory::Checksum)
                            .string_len(64)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(LoadHistory::RowCount)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(LoadHistory::LoadedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // One history row per file and pipe
        manager
            .create_index(
                Index::create()
                    .name("idx_load_history_pipe_file")
                    .table(LoadHistory::Table)
                    .col(LoadHistory::PipeName)
                    .col(LoadHistory::FilePath)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(LoadHistory::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum LoadHistory {
    Table,
    Id,
    PipeName,
    FilePath,
    Checksum,
    RowCount,
    LoadedAt,
}
