// Database models (internal, may differ from public DTOs)

use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use memorylane_core::{MediaItem, Privacy, TimelineEvent};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, FromRow)]
pub struct EventRow {
    pub id: Uuid,
    pub timeline_id: String,
    pub title: String,
    pub description: Option<String>,
    pub date: DateTime<Utc>,
    pub media: Json<Vec<MediaItem>>,
    pub privacy: String,
    pub suggested: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl EventRow {
    pub fn into_event(self) -> Result<TimelineEvent> {
        let privacy: Privacy = self
            .privacy
            .parse()
            .map_err(|e| anyhow!("event {} has corrupt privacy: {}", self.id, e))?;

        Ok(TimelineEvent {
            id: self.id,
            title: self.title,
            description: self.description,
            date: self.date,
            media: self.media.0,
            privacy,
            suggested: self.suggested,
            timeline_id: self.timeline_id,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}
