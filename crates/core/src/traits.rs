// Core traits for pluggable backends
//
// These traits keep the timeline service independent of its collaborators:
// - In-memory implementations for dev mode and testing
// - Database implementations for production
// - HTTP implementations for the completion provider

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Result;
use crate::timeline_event::{EventUpdate, MediaItem, NewTimelineEvent, TimelineEvent};

// ============================================================================
// EventStore - For persisting timeline events
// ============================================================================

/// Trait for storing and retrieving timeline events
///
/// `list_events` must return events in insertion order; milestone prompts
/// are built from that order.
#[async_trait]
pub trait EventStore: Send + Sync {
    /// Persist a new event, assigning its id and timestamps
    async fn create_event(&self, input: NewTimelineEvent) -> Result<TimelineEvent>;

    /// Get an event by id
    async fn get_event(&self, id: Uuid) -> Result<Option<TimelineEvent>>;

    /// All events of a timeline, oldest first
    async fn list_events(&self, timeline_id: &str) -> Result<Vec<TimelineEvent>>;

    /// Apply an update, returning the new record or None if absent
    async fn update_event(&self, id: Uuid, update: EventUpdate) -> Result<Option<TimelineEvent>>;

    /// Delete an event, returning whether it existed
    async fn delete_event(&self, id: Uuid) -> Result<bool>;
}

// ============================================================================
// MediaStore - For persisting uploaded files
// ============================================================================

/// A file received from a client, not yet stored
#[derive(Debug, Clone)]
pub struct MediaUpload {
    /// Client-side file name, if the client sent one
    pub file_name: Option<String>,
    /// Declared content type
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

/// Trait for storing uploaded media and producing a retrievable reference
#[async_trait]
pub trait MediaStore: Send + Sync {
    async fn store(&self, upload: MediaUpload) -> Result<MediaItem>;

    /// Delete a previously stored item. Missing files are not an error.
    async fn remove(&self, item: &MediaItem) -> Result<()>;

    /// Store several uploads, preserving order.
    ///
    /// All or nothing: if one upload fails, the ones already stored are removed.
    async fn store_all(&self, uploads: Vec<MediaUpload>) -> Result<Vec<MediaItem>> {
        let mut items = Vec::with_capacity(uploads.len());
        for upload in uploads {
            match self.store(upload).await {
                Ok(item) => items.push(item),
                Err(e) => {
                    self.remove_all(&items).await;
                    return Err(e);
                }
            }
        }
        Ok(items)
    }

    /// Best-effort removal of stored items; failures are logged, not returned
    async fn remove_all(&self, items: &[MediaItem]) {
        for item in items {
            if let Err(e) = self.remove(item).await {
                tracing::warn!(url = %item.url, error = %e, "Failed to remove orphaned upload");
            }
        }
    }
}

// ============================================================================
// MilestoneSuggester - For generating milestone titles
// ============================================================================

/// Trait for producing a free-text milestone suggestion from event titles
#[async_trait]
pub trait MilestoneSuggester: Send + Sync {
    /// Return a single suggestion, already trimmed
    async fn suggest(&self, titles: &[String]) -> Result<String>;
}
