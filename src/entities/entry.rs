//! Entry entity, the single record kind held by the SQLite store.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::entry::Entry;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "entries")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub uuid: Uuid,
    #[sea_orm(indexed)]
    pub created_at: DateTimeUtc,
    pub is_enabled: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Entry for Model {
    type Id = Uuid;

    fn new(created_at: DateTimeUtc) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            created_at,
            is_enabled: false,
        }
    }

    fn id(&self) -> Uuid {
        self.uuid
    }

    fn created_at(&self) -> DateTimeUtc {
        self.created_at
    }

    fn is_enabled(&self) -> bool {
        self.is_enabled
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.is_enabled = enabled;
    }
}
