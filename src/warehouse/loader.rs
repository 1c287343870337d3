use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, EntityTrait,
    QueryFilter, QuerySelect, Set, TransactionTrait,
};
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::collections::HashSet;
use std::sync::Arc;

use super::pipe::{default_pipes, CopyPipe};
use crate::db::entities::{album, artist, load_history, song};
use crate::error::Result;
use crate::records::{codec, AlbumRecord, ArtistRecord, RecordKind, SongRecord};
use crate::storage::ObjectStore;

/// Rows per INSERT; keeps the songs table under SQLite's 999 bind limit.
const INSERT_BATCH: usize = 100;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LoadReport {
    pub files_loaded: usize,
    pub files_skipped: usize,
    pub rows_loaded: usize,
}

impl LoadReport {
    fn merge(&mut self, other: LoadReport) {
        self.files_loaded += other.files_loaded;
        self.files_skipped += other.files_skipped;
        self.rows_loaded += other.rows_loaded;
    }
}

pub struct Loader {
    db: DatabaseConnection,
    store: Arc<dyn ObjectStore>,
    pipes: Vec<CopyPipe>,
}

impl Loader {
    pub fn new(db: DatabaseConnection, store: Arc<dyn ObjectStore>) -> Result<Self> {
        Ok(Self::with_pipes(db, store, default_pipes()?))
    }

    pub fn with_pipes(
        db: DatabaseConnection,
        store: Arc<dyn ObjectStore>,
        pipes: Vec<CopyPipe>,
    ) -> Self {
        Self { db, store, pipes }
    }

    pub fn pipes(&self) -> &[CopyPipe] {
        &self.pipes
    }

    /// Truncate every destination table, then load all staged files.
    ///
    /// Each pipe runs in its own transaction, so a failed file leaves that
    /// table as it was before the call.
    pub async fn initial_load(&self) -> Result<LoadReport> {
        let mut report = LoadReport::default();

        for pipe in &self.pipes {
            let keys = self.staged_files(pipe).await?;
            let txn = self.db.begin().await?;

            truncate(&txn, pipe.kind).await?;
            load_history::Entity::delete_many()
                .filter(load_history::Column::PipeName.eq(pipe.name.as_str()))
                .exec(&txn)
                .await?;
            tracing::info!("Truncated {} for initial load of {}", pipe.table(), pipe.name);

            let mut pipe_report = LoadReport::default();
            for key in &keys {
                pipe_report.rows_loaded += self.load_file(&txn, pipe, key).await?;
                pipe_report.files_loaded += 1;
            }

            txn.commit().await?;
            tracing::info!(
                "{} loaded {} files ({} rows)",
                pipe.name,
                pipe_report.files_loaded,
                pipe_report.rows_loaded
            );
            report.merge(pipe_report);
        }

        Ok(report)
    }

    /// Load staged files no pipe has loaded yet. Appends only.
    pub async fn ingest_new(&self) -> Result<LoadReport> {
        let mut report = LoadReport::default();

        for pipe in &self.pipes {
            let keys = self.staged_files(pipe).await?;
            let loaded: HashSet<String> = load_history::Entity::find()
                .select_only()
                .column(load_history::Column::FilePath)
                .filter(load_history::Column::PipeName.eq(pipe.name.as_str()))
                .into_tuple::<String>()
                .all(&self.db)
                .await?
                .into_iter()
                .collect();

            let (done, pending): (Vec<_>, Vec<_>) =
                keys.into_iter().partition(|key| loaded.contains(key));
            let mut pipe_report = LoadReport {
                files_skipped: done.len(),
                ..Default::default()
            };

            if pending.is_empty() {
                tracing::debug!("{}: nothing new to ingest", pipe.name);
                report.merge(pipe_report);
                continue;
            }

            let txn = self.db.begin().await?;
            for key in &pending {
                pipe_report.rows_loaded += self.load_file(&txn, pipe, key).await?;
                pipe_report.files_loaded += 1;
            }
            txn.commit().await?;

            tracing::info!(
                "{} ingested {} new files ({} rows), skipped {}",
                pipe.name,
                pipe_report.files_loaded,
                pipe_report.rows_loaded,
                pipe_report.files_skipped
            );
            report.merge(pipe_report);
        }

        Ok(report)
    }

    async fn staged_files(&self, pipe: &CopyPipe) -> Result<Vec<String>> {
        Ok(self
            .store
            .list(&pipe.stage_prefix)
            .await?
            .into_iter()
            .filter(|key| pipe.matches(key))
            .collect())
    }

    async fn load_file(
        &self,
        txn: &DatabaseTransaction,
        pipe: &CopyPipe,
        key: &str,
    ) -> Result<usize> {
        let bytes = self.store.get(key).await?;
        let checksum = format!("{:x}", Sha256::digest(&bytes));

        let rows = match pipe.kind {
            RecordKind::Album => {
                let records: Vec<AlbumRecord> = codec::decode(key, &bytes)?;
                insert_batched(txn, records.into_iter().map(album::ActiveModel::from)).await?
            }
            RecordKind::Artist => {
                let records: Vec<ArtistRecord> = codec::decode(key, &bytes)?;
                insert_batched(txn, records.into_iter().map(artist::ActiveModel::from)).await?
            }
            RecordKind::Song => {
                let records: Vec<SongRecord> = codec::decode(key, &bytes)?;
                insert_batched(txn, records.into_iter().map(song::ActiveModel::from)).await?
            }
        };

        load_history::ActiveModel {
            pipe_name: Set(pipe.name.clone()),
            file_path: Set(key.to_string()),
            checksum: Set(checksum),
            row_count: Set(i32::try_from(rows).unwrap_or(i32::MAX)),
            loaded_at: Set(Utc::now().into()),
            ..Default::default()
        }
        .insert(txn)
        .await?;

        tracing::debug!("{} loaded {} rows from {}", pipe.name, rows, key);
        Ok(rows)
    }
}

async fn truncate(txn: &DatabaseTransaction, kind: RecordKind) -> Result<()> {
    match kind {
        RecordKind::Album => album::Entity::delete_many().exec(txn).await?,
        RecordKind::Artist => artist::Entity::delete_many().exec(txn).await?,
        RecordKind::Song => song::Entity::delete_many().exec(txn).await?,
    };
    Ok(())
}

async fn insert_batched<A, I>(txn: &DatabaseTransaction, models: I) -> Result<usize>
where
    A: ActiveModelTrait + Send + 'static,
    I: IntoIterator<Item = A>,
    I::IntoIter: Send,
{
    let mut models = models.into_iter().peekable();
    let mut inserted = 0;

    while models.peek().is_some() {
        let batch: Vec<A> = models.by_ref().take(INSERT_BATCH).collect();
        inserted += batch.len();
        <A::Entity as EntityTrait>::insert_many(batch).exec(txn).await?;
    }

    Ok(inserted)
}
