// Milestone trigger policy
//
// After an event is saved the whole timeline is re-read and handed to a
// MilestoneTrigger. When it fires, the titles are sent to a
// MilestoneSuggester and the reply is stored as a suggested event.

use chrono::{DateTime, Utc};
use std::fmt;
use std::str::FromStr;

use crate::timeline_event::{NewTimelineEvent, Privacy, TimelineEvent};

/// Description given to every suggested event
pub const SUGGESTED_EVENT_DESCRIPTION: &str = "AI Suggested Event";

/// Number of events a timeline needs before suggestions start
pub const DEFAULT_MILESTONE_THRESHOLD: usize = 3;

/// Completion budget for a single suggestion
pub const MILESTONE_MAX_TOKENS: u32 = 50;

const PROMPT_PREFIX: &str = "Suggest a memorable milestone based on these events: ";

/// When a timeline should receive a suggestion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MilestonePolicy {
    /// Suggest after every new event once the timeline holds `threshold`
    /// events, suggested ones included
    #[default]
    EveryEvent,
    /// Suggest once, when the client-created events first reach `threshold`
    OncePerTimeline,
}

impl fmt::Display for MilestonePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MilestonePolicy::EveryEvent => f.write_str("every_event"),
            MilestonePolicy::OncePerTimeline => f.write_str("once_per_timeline"),
        }
    }
}

impl FromStr for MilestonePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "every_event" => Ok(MilestonePolicy::EveryEvent),
            "once_per_timeline" | "once" => Ok(MilestonePolicy::OncePerTimeline),
            other => Err(format!(
                "unknown milestone policy '{}' (expected every_event or once_per_timeline)",
                other
            )),
        }
    }
}

/// Decides whether a timeline gets a new milestone suggestion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MilestoneTrigger {
    pub policy: MilestonePolicy,
    pub threshold: usize,
}

impl Default for MilestoneTrigger {
    fn default() -> Self {
        Self {
            policy: MilestonePolicy::default(),
            threshold: DEFAULT_MILESTONE_THRESHOLD,
        }
    }
}

impl MilestoneTrigger {
    pub fn new(policy: MilestonePolicy, threshold: usize) -> Self {
        Self { policy, threshold }
    }

    /// Evaluate the trigger against the full, freshly re-read timeline
    pub fn should_suggest(&self, events: &[TimelineEvent]) -> bool {
        match self.policy {
            MilestonePolicy::EveryEvent => events.len() >= self.threshold,
            MilestonePolicy::OncePerTimeline => {
                let mut client_events = 0;
                for event in events {
                    if event.suggested {
                        return false;
                    }
                    client_events += 1;
                }
                client_events >= self.threshold
            }
        }
    }
}

/// Titles in repository order, suggested events included
pub fn milestone_titles(events: &[TimelineEvent]) -> Vec<String> {
    events.iter().map(|e| e.title.clone()).collect()
}

/// Build the completion prompt for a list of titles
pub fn build_milestone_prompt(titles: &[String]) -> String {
    format!("{}{}", PROMPT_PREFIX, titles.join(", "))
}

/// Turn a raw completion into the event to store.
///
/// Returns `None` when the completion is blank after trimming.
pub fn suggested_event(
    timeline_id: &str,
    suggestion: &str,
    now: DateTime<Utc>,
) -> Option<NewTimelineEvent> {
    let title = suggestion.trim();
    if title.is_empty() {
        return None;
    }
    Some(NewTimelineEvent {
        timeline_id: timeline_id.to_string(),
        title: title.to_string(),
        description: Some(SUGGESTED_EVENT_DESCRIPTION.to_string()),
        date: now,
        media: Vec::new(),
        privacy: Privacy::Private,
        suggested: true,
    })
}
