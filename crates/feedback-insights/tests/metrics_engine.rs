use chrono::NaiveDate;
use feedback_insights::feedback::{
    ingest_path, DateRange, FeedbackId, FeedbackRecord, FeedbackRepository,
    JsonFileFeedbackRepository,
};
use feedback_insights::metrics::{
    calculate_ces, calculate_csat, calculate_nps, compute_all, identify_segments, SegmentKey,
};

fn day(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, day).expect("valid March date")
}

fn response(n: usize, nps: u8, csat: u8, ces: u8) -> FeedbackRecord {
    FeedbackRecord {
        id: FeedbackId(format!("resp-{n}")),
        date: day(1 + (n as u32 % 28)),
        nps,
        csat,
        ces,
        comment: Some(format!("response {n}")),
    }
}

/// A deterministic spread covering every score combination once.
fn survey_grid() -> Vec<FeedbackRecord> {
    let mut records = Vec::new();
    for nps in 0..=10u8 {
        for csat in 1..=5u8 {
            for ces in 1..=5u8 {
                records.push(response(records.len(), nps, csat, ces));
            }
        }
    }
    records
}

#[test]
fn nps_for_a_promoter_heavy_sample() {
    let records: Vec<_> = [9, 9, 9, 9, 9, 7, 7, 7, 6, 6]
        .into_iter()
        .enumerate()
        .map(|(n, nps)| response(n, nps, 3, 3))
        .collect();

    let nps = calculate_nps(&records);
    assert_eq!((nps.promoters, nps.neutrals, nps.detractors), (5, 3, 2));
    assert_eq!(nps.total, 10);
    assert_eq!(nps.score, 30);
}

#[test]
fn csat_score_and_percentage_stay_distinct() {
    let records: Vec<_> = [5, 4, 3, 2]
        .into_iter()
        .enumerate()
        .map(|(n, csat)| response(n, 8, csat, 3))
        .collect();

    let csat = calculate_csat(&records);
    assert_eq!((csat.satisfied, csat.neutral, csat.unsatisfied), (2, 1, 1));
    assert_eq!(csat.score, 3.5);
    assert_eq!(csat.percentage, 50.0);
}

#[test]
fn ces_spread_over_each_effort_level() {
    let records: Vec<_> = [1, 3, 5]
        .into_iter()
        .enumerate()
        .map(|(n, ces)| response(n, 8, 4, ces))
        .collect();

    let ces = calculate_ces(&records);
    assert_eq!(
        (ces.low_effort, ces.medium_effort, ces.high_effort),
        (1, 1, 1)
    );
    assert_eq!(ces.score, 3.0);
}

#[test]
fn empty_input_yields_zeroed_metrics_and_no_segments() {
    let result = compute_all(&[]);

    assert_eq!(result.nps.total, 0);
    assert_eq!(result.nps.score, 0);
    assert_eq!(result.csat.total, 0);
    assert_eq!(result.csat.score, 0.0);
    assert_eq!(result.csat.percentage, 0.0);
    assert_eq!(result.ces.total, 0);
    assert_eq!(result.ces.score, 0.0);
    assert!(result.segments.is_empty());
}

#[test]
fn unhappy_high_effort_response_is_a_detractor_segment_member() {
    let segments = identify_segments(&[response(0, 3, 2, 5)]);

    assert_eq!(segments[&SegmentKey::HighEffortDetractors].count, 1);
    assert_eq!(segments[&SegmentKey::LowEffortPromoters].count, 0);
}

#[test]
fn distributions_partition_every_record() {
    let records = survey_grid();
    let result = compute_all(&records);
    let total = records.len();

    assert_eq!(
        result.nps.promoters + result.nps.neutrals + result.nps.detractors,
        total
    );
    assert_eq!(
        result.csat.satisfied + result.csat.neutral + result.csat.unsatisfied,
        total
    );
    assert_eq!(
        result.ces.low_effort + result.ces.medium_effort + result.ces.high_effort,
        total
    );

    assert!((-100..=100).contains(&result.nps.score));
    assert!((0.0..=100.0).contains(&result.csat.percentage));
    assert!((1.0..=5.0).contains(&result.csat.score));
    assert!((1.0..=5.0).contains(&result.ces.score));
    assert!(result.segments.values().all(|segment| segment.count <= total));
    assert_eq!(result.segments.len(), 2);
}

#[test]
fn extreme_samples_hit_the_score_bounds() {
    let promoters: Vec<_> = (0..4).map(|n| response(n, 10, 5, 1)).collect();
    let detractors: Vec<_> = (0..4).map(|n| response(n, 0, 1, 5)).collect();

    assert_eq!(calculate_nps(&promoters).score, 100);
    assert_eq!(calculate_nps(&detractors).score, -100);
    assert_eq!(calculate_csat(&promoters).percentage, 100.0);
    assert_eq!(calculate_csat(&detractors).score, 1.0);
}

#[test]
fn repeated_runs_are_identical() {
    let records = survey_grid();
    assert_eq!(compute_all(&records), compute_all(&records));
}

#[test]
fn ingested_csv_feeds_the_engine_through_a_json_store() {
    let dir = tempfile::tempdir().expect("temp dir");
    let dataset = dir.path().join("march.csv");
    std::fs::write(
        &dataset,
        "id,date,nps,csat,ces,comment\n\
         1,2025-03-02,10,5,1,Fast checkout\n\
         2,2025-03-05,4,2,5,Support never called back\n\
         3,2025-03-09,8,4,3,\n\
         4,2025-04-01,9,5,2,Next month\n",
    )
    .expect("write dataset");

    let store_path = dir.path().join("store").join("feedback.json");
    let store = JsonFileFeedbackRepository::open(&store_path).expect("open store");
    let summary = ingest_path(&dataset, &store).expect("ingest");
    assert_eq!(summary.inserted, 4);

    let reopened = JsonFileFeedbackRepository::open(&store_path).expect("reopen store");
    let march = reopened
        .list(&DateRange::new(Some(day(1)), Some(day(31))))
        .expect("list March");
    assert_eq!(march.len(), 3);
    assert_eq!(march[2].comment, None);

    let result = compute_all(&march);
    assert_eq!(result.nps.score, 0);
    assert_eq!(result.csat.score, 3.67);
    assert_eq!(result.ces.score, 3.0);
    assert_eq!(
        result.segments[&SegmentKey::HighEffortDetractors].sample_comments,
        vec!["Support never called back".to_string()]
    );
}
