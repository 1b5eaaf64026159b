//! Narrative insight generation on top of the metrics engine.

mod generator;
pub mod prompts;
pub mod provider;
pub mod views;

pub use generator::{
    InsightGenerator, DISABLED_INSIGHT, DISABLED_SUMMARY, FAILED_DESCRIPTION, FAILED_INSIGHT,
    FAILED_SUMMARY, MISSING_DESCRIPTION,
};
pub use prompts::IndicatorDetail;
pub use provider::{CompletionRequest, OpenAiChatClient, ProviderError, TextGenerator};
pub use views::{ActionPlan, Drivers, SegmentDescription, Topic};
