//! Delimited-text encoding of record sets.
//!
//! Comma separated, header row always present (even for an empty set), quotes
//! only where a field needs them. Header names are the warehouse column names.

use csv::{QuoteStyle, ReaderBuilder, WriterBuilder};
use serde::{de::DeserializeOwned, Serialize};

use super::{AlbumRecord, ArtistRecord, SongRecord};
use crate::error::{AppError, Result};

pub trait Tabular: Serialize + DeserializeOwned {
    const COLUMNS: &'static [&'static str];
}

impl Tabular for AlbumRecord {
    const COLUMNS: &'static [&'static str] = &[
        "album_id",
        "album_name",
        "album_release_date",
        "album_total_tracks",
        "album_url",
    ];
}

impl Tabular for ArtistRecord {
    const COLUMNS: &'static [&'static str] = &["artist_id", "artist_name", "external_url"];
}

impl Tabular for SongRecord {
    const COLUMNS: &'static [&'static str] = &[
        "song_id",
        "song_name",
        "song_duration",
        "song_url",
        "song_popularity",
        "song_added",
        "album_id",
        "artist_id",
    ];
}

pub fn encode<T: Tabular>(records: &[T]) -> std::result::Result<Vec<u8>, csv::Error> {
    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .quote_style(QuoteStyle::Necessary)
        .from_writer(Vec::new());

    writer.write_record(T::COLUMNS)?;
    for record in records {
        writer.serialize(record)?;
    }

    writer
        .into_inner()
        .map_err(|e| csv::Error::from(e.into_error()))
}

/// Decode a CSV object back into typed records, coercing each column to its
/// declared type. `key` only labels errors.
pub fn decode<T: Tabular>(key: &str, bytes: &[u8]) -> Result<Vec<T>> {
    let mut reader = ReaderBuilder::new().has_headers(true).from_reader(bytes);

    let headers = reader.headers()?.clone();
    if headers.iter().ne(T::COLUMNS.iter().copied()) {
        return Err(AppError::Coercion {
            key: key.to_string(),
            line: 1,
            message: format!(
                "expected header {:?}, found {:?}",
                T::COLUMNS,
                headers.iter().collect::<Vec<_>>()
            ),
        });
    }

    reader
        .deserialize()
        .map(|row| {
            row.map_err(|e| AppError::Coercion {
                key: key.to_string(),
                line: e.position().map(|p| p.line()).unwrap_or(0),
                message: e.to_string(),
            })
        })
        .collect()
}
