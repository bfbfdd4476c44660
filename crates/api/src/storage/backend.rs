// Storage backend abstraction
// Decision: Use enum dispatch for simplicity over trait objects
//
// StorageBackend works with either PostgreSQL (production) or the in-memory
// store from memorylane-core (dev mode), and exposes both through EventStore.

use async_trait::async_trait;
use memorylane_core::{
    EventStore, EventUpdate, InMemoryEventStore, NewTimelineEvent, TimelineError, TimelineEvent,
};
use std::sync::Arc;
use uuid::Uuid;

use super::models::EventRow;
use super::repositories::Database;

/// Storage backend that can be either PostgreSQL or in-memory
#[derive(Clone)]
pub enum StorageBackend {
    /// PostgreSQL database (production)
    Postgres(Database),
    /// In-memory store (dev mode)
    InMemory(Arc<InMemoryEventStore>),
}

impl StorageBackend {
    /// Connect to PostgreSQL and apply migrations
    pub async fn postgres(database_url: &str) -> anyhow::Result<Self> {
        let db = Database::from_url(database_url).await?;
        db.migrate().await?;
        Ok(Self::Postgres(db))
    }

    /// Create an in-memory storage backend
    pub fn in_memory() -> Self {
        Self::InMemory(Arc::new(InMemoryEventStore::new()))
    }

    /// Check if this is dev mode (in-memory)
    pub fn is_dev_mode(&self) -> bool {
        matches!(self, Self::InMemory(_))
    }
}

fn storage_error(e: anyhow::Error) -> TimelineError {
    TimelineError::storage(e.to_string())
}

fn into_event(row: EventRow) -> memorylane_core::Result<TimelineEvent> {
    row.into_event().map_err(storage_error)
}

#[async_trait]
impl EventStore for StorageBackend {
    async fn create_event(&self, input: NewTimelineEvent) -> memorylane_core::Result<TimelineEvent> {
        match self {
            Self::Postgres(db) => into_event(db.create_event(input).await.map_err(storage_error)?),
            Self::InMemory(db) => db.create_event(input).await,
        }
    }

    async fn get_event(&self, id: Uuid) -> memorylane_core::Result<Option<TimelineEvent>> {
        match self {
            Self::Postgres(db) => db
                .get_event(id)
                .await
                .map_err(storage_error)?
                .map(into_event)
                .transpose(),
            Self::InMemory(db) => db.get_event(id).await,
        }
    }

    async fn list_events(&self, timeline_id: &str) -> memorylane_core::Result<Vec<TimelineEvent>> {
        match self {
            Self::Postgres(db) => db
                .list_events(timeline_id)
                .await
                .map_err(storage_error)?
                .into_iter()
                .map(into_event)
                .collect(),
            Self::InMemory(db) => db.list_events(timeline_id).await,
        }
    }

    async fn update_event(
        &self,
        id: Uuid,
        update: EventUpdate,
    ) -> memorylane_core::Result<Option<TimelineEvent>> {
        match self {
            Self::Postgres(db) => db
                .update_event(id, update)
                .await
                .map_err(storage_error)?
                .map(into_event)
                .transpose(),
            Self::InMemory(db) => db.update_event(id, update).await,
        }
    }

    async fn delete_event(&self, id: Uuid) -> memorylane_core::Result<bool> {
        match self {
            Self::Postgres(db) => db.delete_event(id).await.map_err(storage_error),
            Self::InMemory(db) => db.delete_event(id).await,
        }
    }
}
