// Timeline event domain types
//
// A timeline is the set of events sharing a timeline_id. Events carry
// optional photo/video attachments and may be created by the milestone
// suggester rather than by a client.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

use crate::validation::ValidationError;

/// Who may see an event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum Privacy {
    #[default]
    Private,
    Friends,
    Public,
}

impl Privacy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Privacy::Private => "private",
            Privacy::Friends => "friends",
            Privacy::Public => "public",
        }
    }
}

impl fmt::Display for Privacy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Privacy {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "private" => Ok(Privacy::Private),
            "friends" => Ok(Privacy::Friends),
            "public" => Ok(Privacy::Public),
            _ => Err(ValidationError::InvalidPrivacy(s.to_string())),
        }
    }
}

/// Kind of an attached media file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Photo,
    Video,
}

impl MediaKind {
    /// Classify an upload by its content type. Anything that is not
    /// `video/*` is treated as a photo.
    pub fn from_content_type(content_type: Option<&str>) -> Self {
        match content_type {
            Some(ct) if ct.trim_start().starts_with("video") => MediaKind::Video,
            _ => MediaKind::Photo,
        }
    }
}

/// A stored attachment reference
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct MediaItem {
    #[serde(rename = "type")]
    pub kind: MediaKind,
    /// URL path under which the file is served
    #[cfg_attr(feature = "openapi", schema(example = "/uploads/1718000000000-beach.jpg"))]
    pub url: String,
}

/// A dated entry on a timeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct TimelineEvent {
    pub id: Uuid,
    #[cfg_attr(feature = "openapi", schema(example = "Graduation"))]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub media: Vec<MediaItem>,
    #[serde(default)]
    pub privacy: Privacy,
    /// True only for events inserted by the milestone suggester
    #[serde(default)]
    pub suggested: bool,
    #[cfg_attr(feature = "openapi", schema(example = "abc12345"))]
    pub timeline_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for persisting a new event
#[derive(Debug, Clone, PartialEq)]
pub struct NewTimelineEvent {
    pub timeline_id: String,
    pub title: String,
    pub description: Option<String>,
    pub date: DateTime<Utc>,
    pub media: Vec<MediaItem>,
    pub privacy: Privacy,
    pub suggested: bool,
}

/// Field replacement for an existing event.
///
/// Absent fields keep their stored value. Media, timeline and the
/// `suggested` flag are not updatable.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub date: Option<DateTime<Utc>>,
    pub privacy: Option<Privacy>,
}

impl EventUpdate {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.date.is_none()
            && self.privacy.is_none()
    }

    /// Apply the update in place, bumping `updated_at`
    pub fn apply_to(&self, event: &mut TimelineEvent, now: DateTime<Utc>) {
        if let Some(title) = &self.title {
            event.title = title.clone();
        }
        if let Some(description) = &self.description {
            event.description = Some(description.clone());
        }
        if let Some(date) = self.date {
            event.date = date;
        }
        if let Some(privacy) = self.privacy {
            event.privacy = privacy;
        }
        event.updated_at = now;
    }
}
