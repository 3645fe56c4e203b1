//! Persistent collection of to-do items
//!
//! A thin layer over the `Todos` table. Every write is a single statement
//! committed before the call returns; nothing is cached.

use kit::{DbConnection, FrameworkError, HttpResponse};
use sea_orm::{ActiveModelTrait, ActiveValue, DbErr, EntityTrait, QueryOrder};
use thiserror::Error;

use crate::models::todo_item::{self, ActiveModel, Entity as TodoItem};
use crate::models::TodoPayload;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("todo item {0} not found")]
    NotFound(i32),

    #[error("storage error: {0}")]
    Storage(#[from] DbErr),
}

impl From<StoreError> for FrameworkError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(_) => FrameworkError::model_not_found("TodoItem"),
            StoreError::Storage(e) => FrameworkError::from(e),
        }
    }
}

/// `NotFound` becomes a bare 404; storage failures keep the framework's JSON error body
impl From<StoreError> for HttpResponse {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(_) => HttpResponse::empty(404),
            other => FrameworkError::from(other).into(),
        }
    }
}

/// What `replace` does when no record has the given id
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UpdateMissing {
    /// Succeed without writing anything
    #[default]
    Ignore,
    /// Report `StoreError::NotFound`
    NotFound,
}

#[derive(Clone)]
pub struct TodoStore {
    db: DbConnection,
    update_missing: UpdateMissing,
}

impl TodoStore {
    pub fn new(db: DbConnection) -> Self {
        Self {
            db,
            update_missing: UpdateMissing::default(),
        }
    }

    pub fn with_update_missing(mut self, policy: UpdateMissing) -> Self {
        self.update_missing = policy;
        self
    }

    pub fn update_missing(&self) -> UpdateMissing {
        self.update_missing
    }

    /// Every record, ordered by id
    pub async fn list_all(&self) -> Result<Vec<todo_item::Model>, StoreError> {
        Ok(TodoItem::find()
            .order_by_asc(todo_item::Column::Id)
            .all(self.db.inner())
            .await?)
    }

    pub async fn get(&self, id: i32) -> Result<Option<todo_item::Model>, StoreError> {
        Ok(TodoItem::find_by_id(id).one(self.db.inner()).await?)
    }

    /// Persist a new record and return it with its id filled in
    ///
    /// A non-zero `payload.id` is used as the key as given; a clash with an
    /// existing record surfaces as `StoreError::Storage`.
    pub async fn insert(&self, payload: TodoPayload) -> Result<todo_item::Model, StoreError> {
        let id = match payload.requested_id() {
            Some(id) => ActiveValue::Set(id),
            None => ActiveValue::NotSet,
        };

        let item = ActiveModel {
            id,
            name: ActiveValue::Set(payload.name),
            is_complete: ActiveValue::Set(payload.is_complete),
        }
        .insert(self.db.inner())
        .await?;

        tracing::debug!(id = item.id, "todo item inserted");
        Ok(item)
    }

    /// Overwrite every field of the record with the given id
    pub async fn replace(&self, id: i32, payload: TodoPayload) -> Result<(), StoreError> {
        let item = ActiveModel {
            id: ActiveValue::Unchanged(id),
            name: ActiveValue::Set(payload.name),
            is_complete: ActiveValue::Set(payload.is_complete),
        };

        match item.update(self.db.inner()).await {
            Ok(_) => Ok(()),
            Err(DbErr::RecordNotUpdated) => match self.update_missing {
                UpdateMissing::Ignore => {
                    tracing::debug!(id, "update of missing todo item ignored");
                    Ok(())
                }
                UpdateMissing::NotFound => Err(StoreError::NotFound(id)),
            },
            Err(e) => Err(e.into()),
        }
    }

    pub async fn delete(&self, id: i32) -> Result<(), StoreError> {
        let result = TodoItem::delete_by_id(id).exec(self.db.inner()).await?;
        if result.rows_affected == 0 {
            return Err(StoreError::NotFound(id));
        }
        Ok(())
    }
}
