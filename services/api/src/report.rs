use crate::infra::FeedbackStore;
use chrono::NaiveDate;
use clap::Args;
use feedback_insights::analytics::{parse_date, segment_share, AnalyticsService};
use feedback_insights::config::{AppConfig, ConfigError, StoreConfig};
use feedback_insights::error::AppError;
use feedback_insights::feedback::{ingest_path, period_label, DateRange, FeedbackRepository};
use feedback_insights::insights::InsightGenerator;
use feedback_insights::metrics::{compute_all, MetricsResult};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct IngestArgs {
    /// Dataset to load (.json array or .csv with id,date,nps,csat,ces,comment columns)
    pub(crate) file: PathBuf,
    /// Store file to write into (defaults to FEEDBACK_STORE_PATH)
    #[arg(long)]
    pub(crate) store: Option<PathBuf>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct ReportArgs {
    /// First day of the period (YYYY-MM-DD, inclusive)
    #[arg(long, value_parser = parse_date)]
    pub(crate) start_date: Option<NaiveDate>,
    /// Last day of the period (YYYY-MM-DD, inclusive)
    #[arg(long, value_parser = parse_date)]
    pub(crate) end_date: Option<NaiveDate>,
    /// Print the raw metrics as JSON instead of a summary
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Debug, Serialize)]
struct PeriodReport {
    period: String,
    records: usize,
    metrics: MetricsResult,
}

pub(crate) fn run_ingest(args: IngestArgs) -> Result<(), AppError> {
    let IngestArgs { file, store } = args;

    let path = match store {
        Some(path) => path,
        None => AppConfig::load()?
            .store
            .path
            .ok_or(ConfigError::MissingStorePath)?,
    };

    let store = FeedbackStore::open(&StoreConfig { path: Some(path) })?;
    let summary = ingest_path(&file, &store)?;
    println!(
        "Ingested {} new and {} replaced feedback records from {}",
        summary.inserted,
        summary.replaced,
        file.display()
    );
    Ok(())
}

pub(crate) fn run_report(args: ReportArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let store = FeedbackStore::open(&config.store)?;
    let report = build_report(store, DateRange::new(args.start_date, args.end_date))?;

    if args.json {
        match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{json}"),
            Err(err) => println!("Report payload unavailable: {err}"),
        }
    } else {
        render_report(&report);
    }
    Ok(())
}

fn build_report<R>(repository: R, range: DateRange) -> Result<PeriodReport, AppError>
where
    R: FeedbackRepository + 'static,
{
    let service = AnalyticsService::new(
        Arc::new(repository),
        Arc::new(InsightGenerator::disabled()),
    );
    let records = service.records(&range)?;

    Ok(PeriodReport {
        period: period_label(&records).unwrap_or_default(),
        records: records.len(),
        metrics: compute_all(&records),
    })
}

fn render_report(report: &PeriodReport) {
    let MetricsResult {
        nps,
        csat,
        ces,
        segments,
    } = &report.metrics;

    println!("Feedback report");
    println!("Period: {} ({} responses)", report.period, report.records);

    println!("\nNPS: {}", nps.score);
    println!(
        "- promoters {}, neutrals {}, detractors {}",
        nps.promoters, nps.neutrals, nps.detractors
    );

    println!(
        "\nCSAT: {:.2}% satisfied (average rating {:.2} / 5)",
        csat.percentage, csat.score
    );
    println!(
        "- satisfied {}, neutral {}, unsatisfied {}",
        csat.satisfied, csat.neutral, csat.unsatisfied
    );

    println!("\nCES: {:.2} (lower is easier)", ces.score);
    println!(
        "- low effort {}, medium effort {}, high effort {}",
        ces.low_effort, ces.medium_effort, ces.high_effort
    );

    println!("\nSegments");
    for segment in segments.values() {
        println!(
            "- {}: {} ({}%)",
            segment.label,
            segment.count,
            segment_share(segment.count, report.records)
        );
        for comment in &segment.sample_comments {
            println!("    \"{}\"", comment);
        }
    }
}
