use crate::metrics::{CesResult, CsatResult, MetricsResult, NpsResult, Segment, SegmentKey};

pub(crate) const SUMMARY_COMMENT_WINDOW: usize = 15;
pub(crate) const INDICATOR_COMMENT_WINDOW: usize = 15;
pub(crate) const DRIVER_COMMENT_WINDOW: usize = 30;
pub(crate) const TOPIC_COMMENT_WINDOW: usize = 40;
pub(crate) const ACTION_PLAN_COMMENT_WINDOW: usize = 20;

/// One indicator and its numbers, for focused narrative.
#[derive(Debug, Clone, Copy)]
pub enum IndicatorDetail<'a> {
    Nps(&'a NpsResult),
    Csat(&'a CsatResult),
    Ces(&'a CesResult),
}

impl IndicatorDetail<'_> {
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Nps(_) => "NPS",
            Self::Csat(_) => "CSAT",
            Self::Ces(_) => "CES",
        }
    }

    fn describe(&self) -> String {
        match self {
            Self::Nps(nps) => format!(
                "Score: {} (Promoters: {}, Neutrals: {}, Detractors: {})",
                nps.score, nps.promoters, nps.neutrals, nps.detractors
            ),
            Self::Csat(csat) => format!(
                "Satisfaction percentage: {}% (Satisfied: {}, Neutral: {}, Unsatisfied: {}). \
                 IMPORTANT: do not confuse the average rating ({} / 5) with the satisfaction \
                 percentage ({}%).",
                csat.percentage,
                csat.satisfied,
                csat.neutral,
                csat.unsatisfied,
                csat.score,
                csat.percentage
            ),
            Self::Ces(ces) => format!(
                "Average effort: {} / 5, where 1 is very easy and 5 is very hard, so lower is \
                 better (Low effort: {}, Medium: {}, High: {})",
                ces.score, ces.low_effort, ces.medium_effort, ces.high_effort
            ),
        }
    }
}

/// Renders the first `limit` comments as a JSON array literal.
fn comment_window(comments: &[String], limit: usize) -> String {
    let window = &comments[..comments.len().min(limit)];
    serde_json::to_string(window).unwrap_or_else(|_| "[]".to_string())
}

fn metrics_context(metrics: &MetricsResult) -> String {
    let MetricsResult { nps, csat, ces, .. } = metrics;
    format!(
        "Current metrics:\n\
         - NPS score: {} (Promoters: {}, Neutrals: {}, Detractors: {})\n\
         - CSAT: {}% satisfaction (Satisfied: {}, Neutral: {}, Unsatisfied: {})\n\
         - Average CES: {} / 5 (1 is easy, 5 is very hard)",
        nps.score,
        nps.promoters,
        nps.neutrals,
        nps.detractors,
        csat.percentage,
        csat.satisfied,
        csat.neutral,
        csat.unsatisfied,
        ces.score
    )
}

pub(crate) fn executive_summary(metrics: &MetricsResult, comments: &[String]) -> String {
    format!(
        "{}\nBased on these figures and the following customer comments: {}, write a \
         professional, critical executive summary of the current situation. It must be a \
         single short paragraph (at most 3 sentences), direct and business focused.",
        metrics_context(metrics),
        comment_window(comments, SUMMARY_COMMENT_WINDOW)
    )
}

pub(crate) fn indicator_insight(detail: IndicatorDetail<'_>, comments: &[String]) -> String {
    format!(
        "Analyze this {} indicator: {}. Related comments: {}. Produce a single, very concise \
         strategic insight explaining the root cause behind the number.",
        detail.name(),
        detail.describe(),
        comment_window(comments, INDICATOR_COMMENT_WINDOW)
    )
}

pub(crate) fn drivers(comments: &[String]) -> String {
    format!(
        "Analyze these comments: {}.\nExtract the top 3 positive_drivers and the top 3 \
         negative_drivers.\nJSON format: {{\"positive_drivers\": [string], \
         \"negative_drivers\": [string]}}",
        comment_window(comments, DRIVER_COMMENT_WINDOW)
    )
}

pub(crate) fn topics(comments: &[String]) -> String {
    format!(
        "Analyze the following comments: {}.\nIdentify recurring topics and count the \
         approximate number of mentions.\nJSON format: {{\"topics\": [{{\"topic\": string, \
         \"mentions\": integer}}]}}",
        comment_window(comments, TOPIC_COMMENT_WINDOW)
    )
}

pub(crate) fn action_plans(metrics: &MetricsResult, comments: &[String]) -> String {
    format!(
        "{}\nBased on these metrics and these comments ({}), propose prioritized action \
         plans.\nJSON format: {{\"action_plans\": [{{\"priority\": \"High|Medium|Low\", \
         \"issue\": string, \"recommendation\": string, \"expected_impact\": string}}]}}",
        metrics_context(metrics),
        comment_window(comments, ACTION_PLAN_COMMENT_WINDOW)
    )
}

/// Title-cased segment name, e.g. `High Effort Detractors`.
pub(crate) fn segment_title(key: SegmentKey) -> String {
    key.slug()
        .split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

pub(crate) fn segment_description(key: SegmentKey, segment: &Segment) -> String {
    format!(
        "Describe the customer profile of the '{}' segment using this feedback context: {}. \
         Return JSON as {{\"description\": string}}",
        segment_title(key),
        comment_window(&segment.sample_comments, segment.sample_comments.len())
    )
}
