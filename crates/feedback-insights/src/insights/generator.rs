use std::sync::Arc;

use serde::de::DeserializeOwned;
use tracing::{error, warn};

use super::prompts::{self, IndicatorDetail};
use super::provider::{CompletionRequest, ProviderError, TextGenerator};
use super::views::{
    ActionPlan, ActionPlansEnvelope, DescriptionEnvelope, Drivers, SegmentDescription, Topic,
    TopicsEnvelope,
};
use crate::metrics::{MetricsResult, Segments};

pub const DISABLED_SUMMARY: &str = "Insights are not configured (missing OPENAI_API_KEY).";
pub const DISABLED_INSIGHT: &str = "Insights are not configured.";
pub const FAILED_SUMMARY: &str = "The executive summary could not be generated.";
pub const FAILED_INSIGHT: &str = "The insight could not be generated.";
pub const MISSING_DESCRIPTION: &str = "No description available.";
pub const FAILED_DESCRIPTION: &str = "The segment description could not be generated.";

/// Turns metrics and comments into narrative.
///
/// Provider failures never surface as errors: text operations fall back to a
/// fixed sentence and structured operations to empty collections.
#[derive(Clone, Default)]
pub struct InsightGenerator {
    provider: Option<Arc<dyn TextGenerator>>,
}

impl std::fmt::Debug for InsightGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InsightGenerator")
            .field("enabled", &self.is_enabled())
            .finish()
    }
}

impl InsightGenerator {
    pub fn new(provider: Arc<dyn TextGenerator>) -> Self {
        Self {
            provider: Some(provider),
        }
    }

    pub fn disabled() -> Self {
        Self { provider: None }
    }

    pub fn is_enabled(&self) -> bool {
        self.provider.is_some()
    }

    pub async fn executive_summary(&self, metrics: &MetricsResult, comments: &[String]) -> String {
        let Some(provider) = &self.provider else {
            return DISABLED_SUMMARY.to_string();
        };

        let request = CompletionRequest::text(prompts::executive_summary(metrics, comments));
        match provider.complete(request).await {
            Ok(text) => text,
            Err(err) => {
                error!(error = %err, "executive summary generation failed");
                FAILED_SUMMARY.to_string()
            }
        }
    }

    pub async fn indicator_insight(
        &self,
        detail: IndicatorDetail<'_>,
        comments: &[String],
    ) -> String {
        let Some(provider) = &self.provider else {
            return DISABLED_INSIGHT.to_string();
        };

        let request = CompletionRequest::text(prompts::indicator_insight(detail, comments));
        match provider.complete(request).await {
            Ok(text) => text,
            Err(err) => {
                error!(indicator = detail.name(), error = %err, "indicator insight failed");
                FAILED_INSIGHT.to_string()
            }
        }
    }

    pub async fn drivers(&self, comments: &[String]) -> Drivers {
        self.generate_json::<Drivers>(prompts::drivers(comments))
            .await
            .unwrap_or_default()
    }

    pub async fn topics(&self, comments: &[String]) -> Vec<Topic> {
        self.generate_json::<TopicsEnvelope>(prompts::topics(comments))
            .await
            .map(|envelope| envelope.topics)
            .unwrap_or_default()
    }

    pub async fn action_plans(
        &self,
        metrics: &MetricsResult,
        comments: &[String],
    ) -> Vec<ActionPlan> {
        self.generate_json::<ActionPlansEnvelope>(prompts::action_plans(metrics, comments))
            .await
            .map(|envelope| envelope.action_plans)
            .unwrap_or_default()
    }

    /// One description per segment, in segment key order.
    pub async fn segment_descriptions(&self, segments: &Segments) -> Vec<SegmentDescription> {
        let mut descriptions = Vec::with_capacity(segments.len());
        for (key, segment) in segments {
            let description = match self
                .generate_json::<DescriptionEnvelope>(prompts::segment_description(*key, segment))
                .await
            {
                Some(DescriptionEnvelope {
                    description: Some(text),
                }) if !text.trim().is_empty() => text,
                Some(_) => MISSING_DESCRIPTION.to_string(),
                None => FAILED_DESCRIPTION.to_string(),
            };

            descriptions.push(SegmentDescription {
                key: *key,
                segment: prompts::segment_title(*key),
                description,
            });
        }
        descriptions
    }

    async fn generate_json<T: DeserializeOwned>(&self, prompt: String) -> Option<T> {
        let Some(provider) = &self.provider else {
            warn!("text generation provider not configured");
            return None;
        };

        let result = provider
            .complete(CompletionRequest::json(prompt))
            .await
            .and_then(|raw| serde_json::from_str::<T>(&raw).map_err(ProviderError::from));

        match result {
            Ok(value) => Some(value),
            Err(err) => {
                error!(error = %err, "structured insight generation failed");
                None
            }
        }
    }
}
