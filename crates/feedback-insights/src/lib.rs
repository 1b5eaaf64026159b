pub mod analytics;
pub mod config;
pub mod error;
pub mod feedback;
pub mod insights;
pub mod metrics;
pub mod telemetry;
