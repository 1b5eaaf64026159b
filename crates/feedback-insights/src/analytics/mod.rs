//! Request orchestration: repository -> metrics engine -> insight generator.

pub mod router;
pub mod service;
pub mod views;

#[cfg(test)]
mod tests;

pub use router::analytics_router;
pub use service::{segment_share, AnalyticsError, AnalyticsService};
pub use views::{parse_date, PeriodQuery};
