//! TodoItem model
//!
//! Rows live in the `Todos` table. Field names on the wire are `id`, `name`
//! and `isComplete`; the database column for the flag uses the same casing.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "Todos")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    #[sea_orm(column_name = "isComplete")]
    pub is_complete: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Request body for create and replace
///
/// Every field is optional on the wire. A missing `id` (or `0`) on create
/// lets the database assign one; missing `name`/`isComplete` take their
/// zero values.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoPayload {
    #[serde(default)]
    pub id: Option<i32>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub is_complete: bool,
}

impl TodoPayload {
    pub fn new(name: impl Into<String>, is_complete: bool) -> Self {
        Self {
            id: None,
            name: name.into(),
            is_complete,
        }
    }

    pub fn with_id(mut self, id: i32) -> Self {
        self.id = Some(id);
        self
    }

    /// Caller-chosen key, if any. Zero means "unset".
    pub fn requested_id(&self) -> Option<i32> {
        self.id.filter(|id| *id != 0)
    }
}
