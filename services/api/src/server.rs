use crate::cli::ServeArgs;
use crate::infra::{AppState, FeedbackStore};
use crate::routes::with_feedback_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use feedback_insights::analytics::AnalyticsService;
use feedback_insights::config::AppConfig;
use feedback_insights::error::AppError;
use feedback_insights::insights::{InsightGenerator, OpenAiChatClient};
use feedback_insights::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::{info, warn};

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let store = Arc::new(FeedbackStore::open(&config.store)?);
    let insights = match OpenAiChatClient::from_config(&config.insights)? {
        Some(client) => InsightGenerator::new(Arc::new(client)),
        None => {
            warn!("OPENAI_API_KEY not set; narrative insights will use fallback text");
            InsightGenerator::disabled()
        }
    };
    let analytics_service = Arc::new(AnalyticsService::new(store.clone(), Arc::new(insights)));

    let app = with_feedback_routes(analytics_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        store = store.kind(),
        insights = config.insights.enabled(),
        "feedback insights service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
