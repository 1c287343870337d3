use serde::Serialize;

use crate::{
    error::{AppError, Result},
    records::{PlaylistTracksPage, RecordKind, RecordSet},
    storage::{layout, ObjectStore},
};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TransformReport {
    pub processed: Vec<String>,
    pub albums: usize,
    pub artists: usize,
    pub songs: usize,
}

/// Transform every pending raw object.
///
/// Outputs are written before the raw object is renamed to `processed/`, and
/// the rename is the only step that removes it from the pending prefix. The
/// first failure aborts the run; objects finished before it stay finished.
pub async fn run_transform(store: &dyn ObjectStore) -> Result<TransformReport> {
    let pending: Vec<String> = store
        .list(layout::RAW_PENDING_PREFIX)
        .await?
        .into_iter()
        .filter(|key| key.ends_with(".json"))
        .collect();

    if pending.is_empty() {
        tracing::info!("No pending raw objects to transform");
        return Ok(TransformReport::default());
    }
    tracing::info!("Transforming {} pending raw objects", pending.len());

    let mut report = TransformReport::default();
    for key in pending {
        let records = transform_object(store, &key).await?;

        match store.rename(&key, &layout::processed_key(&key)).await {
            Ok(()) => {}
            Err(AppError::NotFound(_)) => {
                // another run moved it after we read it; its outputs match ours
                tracing::warn!("{} was already moved to processed", key);
                continue;
            }
            Err(e) => return Err(e),
        }

        report.albums += records.albums.len();
        report.artists += records.artists.len();
        report.songs += records.songs.len();
        report.processed.push(key);
    }

    tracing::info!(
        "Transformed {} objects: {} albums, {} artists, {} songs",
        report.processed.len(),
        report.albums,
        report.artists,
        report.songs
    );
    Ok(report)
}

async fn transform_object(store: &dyn ObjectStore, key: &str) -> Result<RecordSet> {
    let bytes = store.get(key).await?;
    let page = PlaylistTracksPage::from_slice(&bytes).map_err(|source| AppError::Parse {
        key: key.to_string(),
        source,
    })?;
    let records = RecordSet::from_page(&page).map_err(|source| AppError::Parse {
        key: key.to_string(),
        source,
    })?;

    for kind in RecordKind::ALL {
        let output = layout::transformed_key(kind, key);
        store.put(&output, &records.encode(kind)?).await?;
        tracing::debug!("Wrote {} {:?} records to {}", records.len(kind), kind, output);
    }

    Ok(records)
}
