// In-memory implementations for dev mode and testing
//
// Decision: Use parking_lot for thread-safe access, never held across .await
// Decision: Event IDs generated via uuid v7 (time-ordered)
//
// All data is lost on restart.

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::{Mutex, RwLock};
use std::collections::VecDeque;
use uuid::Uuid;

use crate::error::{Result, TimelineError};
use crate::timeline_event::{EventUpdate, NewTimelineEvent, TimelineEvent};
use crate::traits::{EventStore, MilestoneSuggester};

// ============================================================================
// InMemoryEventStore - Stores events in memory
// ============================================================================

/// In-memory event store
///
/// Events are kept in a Vec so listing naturally follows insertion order.
#[derive(Debug, Default)]
pub struct InMemoryEventStore {
    events: RwLock<Vec<TimelineEvent>>,
}

impl InMemoryEventStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of stored events across all timelines
    pub fn len(&self) -> usize {
        self.events.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.read().is_empty()
    }
}

#[async_trait]
impl EventStore for InMemoryEventStore {
    async fn create_event(&self, input: NewTimelineEvent) -> Result<TimelineEvent> {
        let now = Utc::now();
        let event = TimelineEvent {
            id: Uuid::now_v7(),
            title: input.title,
            description: input.description,
            date: input.date,
            media: input.media,
            privacy: input.privacy,
            suggested: input.suggested,
            timeline_id: input.timeline_id,
            created_at: now,
            updated_at: now,
        };
        self.events.write().push(event.clone());
        Ok(event)
    }

    async fn get_event(&self, id: Uuid) -> Result<Option<TimelineEvent>> {
        Ok(self.events.read().iter().find(|e| e.id == id).cloned())
    }

    async fn list_events(&self, timeline_id: &str) -> Result<Vec<TimelineEvent>> {
        Ok(self
            .events
            .read()
            .iter()
            .filter(|e| e.timeline_id == timeline_id)
            .cloned()
            .collect())
    }

    async fn update_event(&self, id: Uuid, update: EventUpdate) -> Result<Option<TimelineEvent>> {
        let mut events = self.events.write();
        if let Some(event) = events.iter_mut().find(|e| e.id == id) {
            update.apply_to(event, Utc::now());
            return Ok(Some(event.clone()));
        }
        Ok(None)
    }

    async fn delete_event(&self, id: Uuid) -> Result<bool> {
        let mut events = self.events.write();
        let before = events.len();
        events.retain(|e| e.id != id);
        Ok(events.len() != before)
    }
}

// ============================================================================
// ScriptedSuggester - Replays canned suggestions
// ============================================================================

/// Suggester that replays scripted replies and records every request
///
/// Once the script is exhausted it keeps returning the fallback reply.
#[derive(Debug)]
pub struct ScriptedSuggester {
    script: Mutex<VecDeque<std::result::Result<String, String>>>,
    fallback: std::result::Result<String, String>,
    calls: Mutex<Vec<Vec<String>>>,
}

impl ScriptedSuggester {
    /// Always answer with the same suggestion
    pub fn always(reply: impl Into<String>) -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            fallback: Ok(reply.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Always fail with the given provider message
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            fallback: Err(message.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Queue a reply to be returned before the fallback
    pub fn then(self, reply: std::result::Result<&str, &str>) -> Self {
        self.script
            .lock()
            .push_back(reply.map(str::to_string).map_err(str::to_string));
        self
    }

    /// Titles passed to each call, in call order
    pub fn calls(&self) -> Vec<Vec<String>> {
        self.calls.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }
}

#[async_trait]
impl MilestoneSuggester for ScriptedSuggester {
    async fn suggest(&self, titles: &[String]) -> Result<String> {
        self.calls.lock().push(titles.to_vec());
        let reply = self
            .script
            .lock()
            .pop_front()
            .unwrap_or_else(|| self.fallback.clone());
        reply
            .map(|text| text.trim().to_string())
            .map_err(TimelineError::suggestion)
    }
}
