use sea_orm::entity::prelude::*;
use sea_orm::Set;
use serde::{Deserialize, Serialize};

use crate::records::ArtistRecord;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "artist")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub artist_id: String,
    pub artist_name: String,
    pub external_url: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<ArtistRecord> for ActiveModel {
    fn from(record: ArtistRecord) -> Self {
        Self {
            artist_id: Set(record.artist_id),
            artist_name: Set(record.name),
            external_url: Set(record.external_url),
            ..Default::default()
        }
    }
}
