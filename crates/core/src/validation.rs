// Input validation for timeline events
//
// Clients submit loosely-typed form fields. Everything is checked here before
// anything is written, so a rejected request never leaves a partial event or
// orphaned upload behind.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use thiserror::Error;

use crate::timeline_event::{EventUpdate, Privacy};

// =============================================================================
// Input Size Limits
// =============================================================================

/// Maximum size for an event title.
pub const MAX_TITLE_BYTES: usize = 2 * 1024; // 2 KB

/// Maximum size for an event description.
pub const MAX_DESCRIPTION_BYTES: usize = 10 * 1024; // 10 KB

/// Maximum length of a client-supplied timeline identifier.
pub const MAX_TIMELINE_ID_LEN: usize = 64;

/// Reasons a client request is rejected
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("title is required")]
    MissingTitle,

    #[error("title exceeds {} bytes", MAX_TITLE_BYTES)]
    TitleTooLong,

    #[error("description exceeds {} bytes", MAX_DESCRIPTION_BYTES)]
    DescriptionTooLong,

    #[error("date is required")]
    MissingDate,

    #[error("invalid date: {0:?}")]
    InvalidDate(String),

    #[error("invalid privacy: {0:?} (expected private, friends or public)")]
    InvalidPrivacy(String),

    #[error("invalid timelineId: {0:?}")]
    InvalidTimelineId(String),
}

// =============================================================================
// Field Validation
// =============================================================================

/// Validate a required title
pub fn validate_title(title: Option<&str>) -> Result<String, ValidationError> {
    let title = title.ok_or(ValidationError::MissingTitle)?;
    if title.trim().is_empty() {
        return Err(ValidationError::MissingTitle);
    }
    if title.len() > MAX_TITLE_BYTES {
        tracing::warn!(
            "Event title exceeds limit: {} bytes (max: {})",
            title.len(),
            MAX_TITLE_BYTES
        );
        return Err(ValidationError::TitleTooLong);
    }
    Ok(title.to_string())
}

/// Validate an optional description
pub fn validate_description(description: Option<&str>) -> Result<(), ValidationError> {
    if let Some(desc) = description {
        if desc.len() > MAX_DESCRIPTION_BYTES {
            tracing::warn!(
                "Event description exceeds limit: {} bytes (max: {})",
                desc.len(),
                MAX_DESCRIPTION_BYTES
            );
            return Err(ValidationError::DescriptionTooLong);
        }
    }
    Ok(())
}

/// Parse an event date.
///
/// Accepts RFC 3339 (`2024-06-01T10:00:00Z`), a naive date-time
/// (`2024-06-01T10:00[:00]`, read as UTC) or a plain date (`2024-06-01`,
/// read as UTC midnight).
pub fn parse_event_date(raw: &str) -> Result<DateTime<Utc>, ValidationError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(ValidationError::MissingDate);
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Ok(Utc.from_utc_datetime(&naive));
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
        .ok_or_else(|| ValidationError::InvalidDate(raw.to_string()))
}

/// Parse privacy, defaulting to private when absent or blank
pub fn parse_privacy(raw: Option<&str>) -> Result<Privacy, ValidationError> {
    match raw {
        Some(value) if !value.trim().is_empty() => value.parse(),
        _ => Ok(Privacy::default()),
    }
}

/// Normalize a client-supplied timeline id.
///
/// Returns `None` when the client did not pick one (absent or blank), in
/// which case a fresh identifier is generated by the caller.
pub fn normalize_timeline_id(raw: Option<&str>) -> Result<Option<String>, ValidationError> {
    let Some(raw) = raw else {
        return Ok(None);
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    if trimmed.len() > MAX_TIMELINE_ID_LEN
        || trimmed.contains('/')
        || trimmed.chars().any(char::is_whitespace)
    {
        return Err(ValidationError::InvalidTimelineId(raw.to_string()));
    }
    Ok(Some(trimmed.to_string()))
}

// =============================================================================
// Request Validation
// =============================================================================

/// Raw fields of an event creation request
#[derive(Debug, Clone, Default)]
pub struct EventDraft {
    pub title: Option<String>,
    pub description: Option<String>,
    pub date: Option<String>,
    pub privacy: Option<String>,
    pub timeline_id: Option<String>,
}

/// Creation request after validation
#[derive(Debug, Clone, PartialEq)]
pub struct ValidEventDraft {
    pub title: String,
    pub description: Option<String>,
    pub date: DateTime<Utc>,
    pub privacy: Privacy,
    pub timeline_id: Option<String>,
}

impl EventDraft {
    pub fn validate(&self) -> Result<ValidEventDraft, ValidationError> {
        let title = validate_title(self.title.as_deref())?;
        validate_description(self.description.as_deref())?;
        let date = match self.date.as_deref() {
            Some(raw) => parse_event_date(raw)?,
            None => return Err(ValidationError::MissingDate),
        };
        let privacy = parse_privacy(self.privacy.as_deref())?;
        let timeline_id = normalize_timeline_id(self.timeline_id.as_deref())?;

        Ok(ValidEventDraft {
            title,
            description: self.description.clone(),
            date,
            privacy,
            timeline_id,
        })
    }
}

/// Validate the supplied fields of an update request
pub fn validate_update(
    title: Option<&str>,
    description: Option<&str>,
    date: Option<&str>,
    privacy: Option<&str>,
) -> Result<EventUpdate, ValidationError> {
    let title = match title {
        Some(title) => Some(validate_title(Some(title))?),
        None => None,
    };
    validate_description(description)?;
    let date = match date {
        Some(raw) if raw.trim().is_empty() => {
            return Err(ValidationError::InvalidDate(raw.to_string()))
        }
        Some(raw) => Some(parse_event_date(raw)?),
        None => None,
    };
    let privacy = match privacy {
        Some(raw) => Some(raw.parse()?),
        None => None,
    };

    Ok(EventUpdate {
        title,
        description: description.map(str::to_string),
        date,
        privacy,
    })
}
