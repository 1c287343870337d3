use chrono::{DateTime, Utc};

use crate::records::RecordKind;

pub const RAW_PENDING_PREFIX: &str = "raw_data/to_processed";
pub const RAW_PROCESSED_PREFIX: &str = "raw_data/processed";
pub const TRANSFORMED_PREFIX: &str = "transformed_data";

const RAW_FILE_PREFIX: &str = "raw_";

/// UTC timestamp safe to embed in object names.
pub fn timestamp_token(ts: DateTime<Utc>) -> String {
    ts.format("%Y-%m-%dT%H-%M-%S%.6fZ").to_string()
}

pub fn raw_object_key(captured_at: DateTime<Utc>) -> String {
    format!(
        "{}/{}{}.json",
        RAW_PENDING_PREFIX,
        RAW_FILE_PREFIX,
        timestamp_token(captured_at)
    )
}

pub fn file_name(key: &str) -> &str {
    key.rsplit('/').next().unwrap_or(key)
}

/// Where a pending raw object goes once transformed.
pub fn processed_key(pending_key: &str) -> String {
    format!("{}/{}", RAW_PROCESSED_PREFIX, file_name(pending_key))
}

/// The timestamp part of a raw object's name, or its whole stem for objects
/// that were not named by the extractor.
pub fn raw_token(raw_key: &str) -> &str {
    let name = file_name(raw_key);
    let stem = name.strip_suffix(".json").unwrap_or(name);
    stem.strip_prefix(RAW_FILE_PREFIX).unwrap_or(stem)
}

pub fn transformed_prefix(kind: RecordKind) -> String {
    format!("{}/{}", TRANSFORMED_PREFIX, kind.dir())
}

/// Output key for one dataset of a raw object. Derived from the raw object's
/// token, so transforming the same object twice overwrites its outputs.
pub fn transformed_key(kind: RecordKind, raw_key: &str) -> String {
    format!(
        "{}/{}_{}.csv",
        transformed_prefix(kind),
        kind.file_stem(),
        raw_token(raw_key)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_raw_object_key() {
        let ts = Utc.with_ymd_and_hms(2024, 5, 1, 8, 30, 0).unwrap();
        assert_eq!(
            raw_object_key(ts),
            "raw_data/to_processed/raw_2024-05-01T08-30-00.000000Z.json"
        );
    }

    #[test]
    fn test_processed_key_keeps_file_name() {
        assert_eq!(
            processed_key("raw_data/to_processed/raw_x.json"),
            "raw_data/processed/raw_x.json"
        );
    }

    #[test]
    fn test_transformed_keys() {
        let raw = "raw_data/to_processed/raw_2024-05-01T08-30-00.000000Z.json";
        assert_eq!(
            transformed_key(RecordKind::Song, raw),
            "transformed_data/songs_data/songs_transformed_2024-05-01T08-30-00.000000Z.csv"
        );
        assert_eq!(
            transformed_key(RecordKind::Album, raw),
            "transformed_data/album_data/album_transformed_2024-05-01T08-30-00.000000Z.csv"
        );
        assert_eq!(
            transformed_key(RecordKind::Artist, "raw_data/to_processed/manual.json"),
            "transformed_data/artist_data/artist_transformed_manual.csv"
        );
    }
}
