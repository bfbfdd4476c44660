// OpenAPI document served by Swagger UI

use memorylane_core::{MediaItem, MediaKind, Privacy, TimelineEvent};
use utoipa::OpenApi;

use crate::api;

#[derive(OpenApi)]
#[openapi(
    paths(
        api::events::create_event,
        api::events::list_events,
        api::events::update_event,
        api::events::delete_event,
    ),
    components(
        schemas(
            TimelineEvent, MediaItem, MediaKind, Privacy,
            api::events::CreateEventForm,
            api::events::CreateEventResponse,
            api::events::MilestoneReport,
            api::events::UpdateEventRequest,
            api::common::ErrorResponse,
            api::common::MessageResponse,
        )
    ),
    tags(
        (name = "events", description = "Timeline event management endpoints"),
    ),
    info(
        title = "Memory Lane API",
        description = "Shared memory timelines with AI milestone suggestions",
    )
)]
pub struct ApiDoc;
