// OpenAI Completion Provider
//
// This crate provides an OpenAI-compatible text completion client. It
// implements the MilestoneSuggester trait from memorylane-core, so the
// timeline service can ask for milestone suggestions without knowing which
// provider answers.

mod provider;
mod types;


pub use provider::{
    CompletionConfig, OpenAiCompletionClient, SuggestionError, DEFAULT_API_BASE,
    DEFAULT_COMPLETION_MODEL, DEFAULT_TIMEOUT_SECS,
};
pub use types::{CompletionChoice, CompletionRequest, CompletionResponse, CompletionUsage};

// Re-export core trait for convenience
pub use memorylane_core::MilestoneSuggester;
