use chrono::{DateTime, TimeZone, Utc};
use star_trend::chart::star_figure;
use star_trend::parser::load_resources;
use star_trend::trend::{CheckpointPlan, RatingScale, star_trend};
use std::path::Path;

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 30, 0, 0, 0).unwrap()
}

#[test]
fn test_full_pipeline() {
    let scale = RatingScale::default();
    let resources = load_resources(Path::new("tests/fixtures/snapshots.csv"), &scale)
        .expect("Failed to load snapshots");
    assert_eq!(resources.len(), 4);

    let plan = CheckpointPlan::months_by_weeks(6, 2);
    let series = star_trend(&resources, &plan, &scale, now()).unwrap();

    assert_eq!(series.points.len(), 13);

    // 2024-01-14: dc terms at 3 stars, skos at 4
    let first = &series.points[0];
    assert_eq!(first.population, 2);
    assert_eq!(first.histogram.count(3), 1);
    assert_eq!(first.histogram.count(4), 1);
    assert_eq!(first.average, 3.5);

    // now: dc 4, skos 4, foaf 2, prov 0
    let last = series.points.last().unwrap();
    assert_eq!(last.population, 4);
    assert_eq!(last.histogram.count(0), 1);
    assert_eq!(last.histogram.count(2), 1);
    assert_eq!(last.histogram.count(4), 2);
    assert_eq!(last.average, 2.5);

    let populations = series.populations();
    assert!(populations.windows(2).all(|w| w[0] <= w[1]));
    assert!(populations.iter().all(|&p| p <= resources.len()));
    for point in &series.points {
        assert!(point.population == 0 || (0.0..=4.0).contains(&point.average));
    }

    let figure = star_figure(&series);
    assert_eq!(figure.layout.yaxis.range, Some([0, 54]));
}

#[test]
fn test_pipeline_is_idempotent() {
    let scale = RatingScale::default();
    let resources = load_resources(Path::new("tests/fixtures/snapshots.csv"), &scale).unwrap();
    let plan = CheckpointPlan::months_by_weeks(6, 2);

    assert_eq!(
        star_trend(&resources, &plan, &scale, now()).unwrap(),
        star_trend(&resources, &plan, &scale, now()).unwrap()
    );
}

#[test]
fn test_before_any_snapshot_everything_is_zero() {
    let scale = RatingScale::default();
    let resources = load_resources(Path::new("tests/fixtures/snapshots.csv"), &scale).unwrap();
    let long_ago = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();

    let series = star_trend(
        &resources,
        &CheckpointPlan::months_by_weeks(1, 1),
        &scale,
        long_ago,
    )
    .unwrap();

    assert_eq!(series.populations(), vec![0; 5]);
    assert_eq!(series.averages(), vec![0.0; 5]);
}
