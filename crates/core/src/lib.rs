// Memory Lane core
//
// DB-agnostic domain model for memory timelines:
// - TimelineEvent and its media attachments
// - Input validation with a typed ValidationError
// - The milestone trigger policy and suggestion prompt
// - Traits (EventStore, MediaStore, MilestoneSuggester) for pluggable backends
// - In-memory implementations for dev mode and tests

pub mod error;
pub mod memory;
pub mod milestone;
pub mod telemetry;
pub mod timeline_event;
pub mod timeline_id;
pub mod traits;
pub mod validation;

// Re-exports for convenience
pub use error::{Result, TimelineError};
pub use memory::{InMemoryEventStore, ScriptedSuggester};
pub use milestone::{
    build_milestone_prompt, milestone_titles, suggested_event, MilestonePolicy, MilestoneTrigger,
    DEFAULT_MILESTONE_THRESHOLD, MILESTONE_MAX_TOKENS, SUGGESTED_EVENT_DESCRIPTION,
};
pub use timeline_event::{
    EventUpdate, MediaItem, MediaKind, NewTimelineEvent, Privacy, TimelineEvent,
};
pub use timeline_id::{generate_timeline_id, TIMELINE_ID_LEN};
pub use traits::{EventStore, MediaStore, MediaUpload, MilestoneSuggester};
pub use validation::{EventDraft, ValidEventDraft, ValidationError};
