// Services layer for business logic
// Services own validation and the milestone flow, calling storage through traits

pub mod timeline;

pub use timeline::{CreatedEvent, EventChanges, MilestoneOutcome, TimelineService};
