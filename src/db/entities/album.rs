use sea_orm::entity::prelude::*;
use sea_orm::Set;
use serde::{Deserialize, Serialize};

use crate::records::AlbumRecord;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "album")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub album_id: String,
    pub album_name: String,
    pub album_release_date: Option<Date>,
    pub album_total_tracks: i32,
    pub album_url: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<AlbumRecord> for ActiveModel {
    fn from(record: AlbumRecord) -> Self {
        Self {
            album_id: Set(record.album_id),
            album_name: Set(record.name),
            album_release_date: Set(record.release_date),
            album_total_tracks: Set(record.total_tracks),
            album_url: Set(record.url),
            ..Default::default()
        }
    }
}
