use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// One row per file a copy pipe has loaded.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "load_history")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub pipe_name: String,
    pub file_path: String,
    pub checksum: String,
    pub row_count: i32,
    pub loaded_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
