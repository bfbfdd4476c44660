// Timeline event HTTP routes

use axum::{
    extract::{multipart::Field, Multipart, Path, State},
    routing::{get, post},
    Json, Router,
};
use memorylane_core::{EventDraft, MediaUpload, TimelineEvent};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use super::common::{api_error, ApiError, ErrorResponse, MessageResponse};
use crate::services::{CreatedEvent, EventChanges, MilestoneOutcome, TimelineService};

/// Multipart field carrying uploaded files
pub const MEDIA_FIELD: &str = "media";

/// Multipart form accepted by `POST /events` (documentation only)
#[allow(dead_code)]
#[derive(Debug, ToSchema)]
#[schema(rename_all = "camelCase")]
pub struct CreateEventForm {
    #[schema(example = "Graduation")]
    pub title: String,
    pub description: Option<String>,
    /// RFC 3339 timestamp, `YYYY-MM-DDTHH:MM[:SS]` or `YYYY-MM-DD`
    #[schema(example = "2024-06-01")]
    pub date: String,
    /// `private` (default), `friends` or `public`
    #[schema(example = "private")]
    pub privacy: Option<String>,
    /// Existing timeline to append to; a new one is generated when omitted
    #[schema(example = "abc12345")]
    pub timeline_id: Option<String>,
    /// Photos or videos
    #[schema(value_type = Vec<String>)]
    pub media: Vec<Vec<u8>>,
}

/// Outcome of the milestone phase of a create
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum MilestoneReport {
    /// A suggested event was added to the timeline
    Suggested { event: TimelineEvent },
    /// The trigger fired but the suggestion could not be produced or stored
    Failed { error: String },
}

/// Response to `POST /events`
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateEventResponse {
    #[schema(example = "Event added")]
    pub message: String,
    #[schema(example = "abc12345")]
    pub timeline_id: String,
    /// Present only when the milestone trigger fired
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub milestone: Option<MilestoneReport>,
}

impl From<CreatedEvent> for CreateEventResponse {
    fn from(created: CreatedEvent) -> Self {
        let milestone = match created.milestone {
            MilestoneOutcome::NotTriggered => None,
            MilestoneOutcome::Suggested(event) => Some(MilestoneReport::Suggested { event }),
            MilestoneOutcome::Failed(error) => Some(MilestoneReport::Failed { error }),
        };
        Self {
            message: "Event added".to_string(),
            timeline_id: created.timeline_id,
            milestone,
        }
    }
}

/// Request to update an event. Only provided fields are changed.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UpdateEventRequest {
    #[schema(example = "Road Trip")]
    pub title: Option<String>,
    pub description: Option<String>,
    #[schema(example = "2024-06-02")]
    pub date: Option<String>,
    #[schema(example = "friends")]
    pub privacy: Option<String>,
}

impl From<UpdateEventRequest> for EventChanges {
    fn from(req: UpdateEventRequest) -> Self {
        Self {
            title: req.title,
            description: req.description,
            date: req.date,
            privacy: req.privacy,
        }
    }
}

/// App state for event routes
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<TimelineService>,
}

impl AppState {
    pub fn new(service: Arc<TimelineService>) -> Self {
        Self { service }
    }
}

/// Create event routes
///
/// `GET /events/:id` takes a timeline id while `PUT` and `DELETE` take an
/// event id; axum needs one parameter name per path segment.
pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/events", post(create_event))
        .route(
            "/events/:id",
            get(list_events).put(update_event).delete(delete_event),
        )
        .with_state(state)
}

/// POST /events - Add an event, optionally with media
#[utoipa::path(
    post,
    path = "/events",
    request_body(content = CreateEventForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Event added", body = CreateEventResponse),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "events"
)]
pub async fn create_event(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<CreateEventResponse>, ApiError> {
    let (draft, uploads) = read_event_form(multipart).await?;

    let created = state
        .service
        .create_event(draft, uploads)
        .await
        .map_err(|e| api_error("add event", e))?;

    Ok(Json(created.into()))
}

/// GET /events/{id} - List a timeline's events, oldest first
#[utoipa::path(
    get,
    path = "/events/{id}",
    params(("id" = String, Path, description = "Timeline id")),
    responses(
        (status = 200, description = "Events of the timeline, empty when unknown", body = Vec<TimelineEvent>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "events"
)]
pub async fn list_events(
    State(state): State<AppState>,
    Path(timeline_id): Path<String>,
) -> Result<Json<Vec<TimelineEvent>>, ApiError> {
    let events = state
        .service
        .list_events(&timeline_id)
        .await
        .map_err(|e| api_error("fetch events", e))?;

    Ok(Json(events))
}

/// PUT /events/{id} - Update an event
#[utoipa::path(
    put,
    path = "/events/{id}",
    params(("id" = String, Path, description = "Event id")),
    request_body = UpdateEventRequest,
    responses(
        (status = 200, description = "Updated event, or null when not found", body = Option<TimelineEvent>),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "events"
)]
pub async fn update_event(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<UpdateEventRequest>,
) -> Result<Json<Option<TimelineEvent>>, ApiError> {
    let event = state
        .service
        .update_event(&id, req.into())
        .await
        .map_err(|e| api_error("update event", e))?;

    Ok(Json(event))
}

/// DELETE /events/{id} - Delete an event
#[utoipa::path(
    delete,
    path = "/events/{id}",
    params(("id" = String, Path, description = "Event id")),
    responses(
        (status = 200, description = "Event deleted (also when it did not exist)", body = MessageResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "events"
)]
pub async fn delete_event(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    state
        .service
        .delete_event(&id)
        .await
        .map_err(|e| api_error("delete event", e))?;

    Ok(Json(MessageResponse::new("Event deleted")))
}

// ============================================
// Multipart parsing
// ============================================

fn multipart_error(e: axum::extract::multipart::MultipartError) -> ApiError {
    tracing::debug!(error = %e, "Malformed multipart body");
    ErrorResponse::new(e.body_text()).into_response(e.status())
}

async fn field_text(field: Field<'_>) -> Result<String, ApiError> {
    field.text().await.map_err(multipart_error)
}

/// Split the form into text fields and file uploads
async fn read_event_form(
    mut multipart: Multipart,
) -> Result<(EventDraft, Vec<MediaUpload>), ApiError> {
    let mut draft = EventDraft::default();
    let mut uploads = Vec::new();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            MEDIA_FIELD => {
                let file_name = field.file_name().map(str::to_string);
                let content_type = field.content_type().map(str::to_string);
                let bytes = field.bytes().await.map_err(multipart_error)?;

                // Browsers send an empty part when no file was picked
                if bytes.is_empty() && file_name.as_deref().unwrap_or_default().is_empty() {
                    continue;
                }

                uploads.push(MediaUpload {
                    file_name,
                    content_type,
                    bytes: bytes.to_vec(),
                });
            }
            "title" => draft.title = Some(field_text(field).await?),
            "description" => draft.description = Some(field_text(field).await?),
            "date" => draft.date = Some(field_text(field).await?),
            "privacy" => draft.privacy = Some(field_text(field).await?),
            "timelineId" => draft.timeline_id = Some(field_text(field).await?),
            other => {
                tracing::debug!(field = other, "Ignoring unknown form field");
            }
        }
    }

    Ok((draft, uploads))
}
