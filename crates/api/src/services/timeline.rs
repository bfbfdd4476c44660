// Timeline service: event CRUD plus the milestone suggestion phase

use chrono::Utc;
use memorylane_core::{
    generate_timeline_id, milestone_titles, suggested_event, validation::validate_update,
    EventDraft, EventStore, MediaStore, MediaUpload, MilestoneSuggester, MilestoneTrigger,
    NewTimelineEvent, Result, TimelineEvent,
};
use std::sync::Arc;
use tracing::Instrument;
use uuid::Uuid;

/// What happened to the suggestion phase of a create
#[derive(Debug, Clone, PartialEq)]
pub enum MilestoneOutcome {
    /// The trigger did not fire
    NotTriggered,
    /// A suggested event was stored
    Suggested(TimelineEvent),
    /// The trigger fired but no event was stored
    Failed(String),
}

/// Result of a create: the primary event is always durable
#[derive(Debug, Clone)]
pub struct CreatedEvent {
    pub event: TimelineEvent,
    pub timeline_id: String,
    pub milestone: MilestoneOutcome,
}

/// Raw fields of an update request
#[derive(Debug, Clone, Default)]
pub struct EventChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub date: Option<String>,
    pub privacy: Option<String>,
}

pub struct TimelineService {
    events: Arc<dyn EventStore>,
    media: Arc<dyn MediaStore>,
    suggester: Arc<dyn MilestoneSuggester>,
    trigger: MilestoneTrigger,
}

impl TimelineService {
    pub fn new(
        events: Arc<dyn EventStore>,
        media: Arc<dyn MediaStore>,
        suggester: Arc<dyn MilestoneSuggester>,
        trigger: MilestoneTrigger,
    ) -> Self {
        Self {
            events,
            media,
            suggester,
            trigger,
        }
    }

    /// Validate, store uploads, save the event, then run the suggestion phase
    pub async fn create_event(
        &self,
        draft: EventDraft,
        uploads: Vec<MediaUpload>,
    ) -> Result<CreatedEvent> {
        // Nothing touches disk until the request is known to be valid
        let valid = draft.validate()?;
        let timeline_id = valid.timeline_id.unwrap_or_else(generate_timeline_id);

        let span = tracing::info_span!(
            "timeline.create_event",
            timeline_id = %timeline_id,
            media = uploads.len(),
            event_id = tracing::field::Empty,
        );

        let input = NewTimelineEvent {
            timeline_id,
            title: valid.title,
            description: valid.description,
            date: valid.date,
            media: Vec::new(),
            privacy: valid.privacy,
            suggested: false,
        };

        self.create_inner(input, uploads).instrument(span).await
    }

    async fn create_inner(
        &self,
        mut input: NewTimelineEvent,
        uploads: Vec<MediaUpload>,
    ) -> Result<CreatedEvent> {
        input.media = self.media.store_all(uploads).await?;
        let timeline_id = input.timeline_id.clone();
        let media = input.media.clone();

        let event = match self.events.create_event(input).await {
            Ok(event) => event,
            Err(e) => {
                // No event references the uploads, so they would be orphaned
                self.media.remove_all(&media).await;
                return Err(e);
            }
        };
        tracing::Span::current().record("event_id", event.id.to_string().as_str());
        tracing::info!("Event added");

        let milestone = self.suggest_milestone(&timeline_id).await;

        Ok(CreatedEvent {
            event,
            timeline_id,
            milestone,
        })
    }

    /// Suggestion phase. Never fails the create; problems become `Failed`.
    async fn suggest_milestone(&self, timeline_id: &str) -> MilestoneOutcome {
        match self.try_suggest_milestone(timeline_id).await {
            Ok(Some(event)) => {
                tracing::info!(suggestion = %event.title, "Milestone suggested");
                MilestoneOutcome::Suggested(event)
            }
            Ok(None) => MilestoneOutcome::NotTriggered,
            Err(reason) => {
                tracing::warn!(error = %reason, "Milestone suggestion failed");
                MilestoneOutcome::Failed(reason)
            }
        }
    }

    async fn try_suggest_milestone(
        &self,
        timeline_id: &str,
    ) -> std::result::Result<Option<TimelineEvent>, String> {
        let events = self
            .events
            .list_events(timeline_id)
            .await
            .map_err(|e| e.to_string())?;

        if !self.trigger.should_suggest(&events) {
            return Ok(None);
        }

        let titles = milestone_titles(&events);
        tracing::debug!(titles = titles.len(), policy = %self.trigger.policy, "Requesting milestone");

        let suggestion = self
            .suggester
            .suggest(&titles)
            .await
            .map_err(|e| e.to_string())?;

        let new_event = suggested_event(timeline_id, &suggestion, Utc::now())
            .ok_or_else(|| "empty suggestion".to_string())?;

        self.events
            .create_event(new_event)
            .await
            .map(Some)
            .map_err(|e| e.to_string())
    }

    /// All events of a timeline, oldest first
    pub async fn list_events(&self, timeline_id: &str) -> Result<Vec<TimelineEvent>> {
        self.events.list_events(timeline_id).await
    }

    pub async fn get_event(&self, id: Uuid) -> Result<Option<TimelineEvent>> {
        self.events.get_event(id).await
    }

    /// Apply supplied fields. Unknown or malformed ids yield `None`.
    pub async fn update_event(
        &self,
        id: &str,
        changes: EventChanges,
    ) -> Result<Option<TimelineEvent>> {
        let update = validate_update(
            changes.title.as_deref(),
            changes.description.as_deref(),
            changes.date.as_deref(),
            changes.privacy.as_deref(),
        )?;

        let Ok(id) = Uuid::parse_str(id) else {
            tracing::debug!(id, "Update for malformed event id");
            return Ok(None);
        };

        if update.is_empty() {
            return self.events.get_event(id).await;
        }

        let updated = self.events.update_event(id, update).await?;
        if updated.is_some() {
            tracing::info!(event_id = %id, "Event updated");
        }
        Ok(updated)
    }

    /// Delete an event, returning whether it existed
    pub async fn delete_event(&self, id: &str) -> Result<bool> {
        let Ok(id) = Uuid::parse_str(id) else {
            tracing::debug!(id, "Delete for malformed event id");
            return Ok(false);
        };

        let deleted = self.events.delete_event(id).await?;
        if deleted {
            tracing::info!(event_id = %id, "Event deleted");
        }
        Ok(deleted)
    }
}
