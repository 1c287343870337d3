use sea_orm::entity::prelude::*;
use sea_orm::Set;
use serde::{Deserialize, Serialize};

use crate::records::SongRecord;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "songs")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub song_id: String,
    pub song_name: String,
    pub song_duration: i32,
    pub song_url: String,
    pub song_popularity: i32,
    pub song_added: Date,
    pub album_id: String,
    pub artist_id: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<SongRecord> for ActiveModel {
    /// `song_added` is a DATE column; the time of day is dropped.
    fn from(record: SongRecord) -> Self {
        Self {
            song_id: Set(record.song_id),
            song_name: Set(record.name),
            song_duration: Set(record.duration_ms),
            song_url: Set(record.url),
            song_popularity: Set(record.popularity),
            song_added: Set(record.added_at.date_naive()),
            album_id: Set(record.album_id),
            artist_id: Set(record.artist_id),
            ..Default::default()
        }
    }
}
