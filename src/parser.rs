//! Loading of ontology snapshot histories from CSV or JSON files.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::debug;

use crate::trend::{RatingScale, Resource, Snapshot};

/// One row of snapshot input: an ontology's star rating at a version.
#[derive(Debug, Clone, Deserialize)]
pub struct SnapshotRecord {
    pub ontology: String,
    pub version: DateTime<Utc>,
    pub stars: u8,
}

/// Reads CSV records with the header `ontology,version,stars`.
pub fn parse_csv<R: Read>(reader: R) -> Result<Vec<SnapshotRecord>> {
    let mut rdr = csv::Reader::from_reader(reader);
    let mut records = Vec::new();

    for (row, result) in rdr.deserialize().enumerate() {
        let record: SnapshotRecord = result.with_context(|| format!("invalid CSV row {}", row + 1))?;
        records.push(record);
    }

    Ok(records)
}

/// Reads a JSON array of records.
pub fn parse_json<R: Read>(reader: R) -> Result<Vec<SnapshotRecord>> {
    Ok(serde_json::from_reader(reader)?)
}

/// Groups records by ontology, validating every rating against `scale`.
///
/// Resources come back ordered by ontology key.
pub fn into_resources(
    records: Vec<SnapshotRecord>,
    scale: &RatingScale,
) -> Result<Vec<Resource<DateTime<Utc>>>> {
    let mut grouped: BTreeMap<String, Vec<Snapshot<DateTime<Utc>>>> = BTreeMap::new();

    for record in records {
        let snapshot = Snapshot::new(record.version, record.stars, scale)
            .with_context(|| format!("ontology '{}'", record.ontology))?;
        grouped.entry(record.ontology).or_default().push(snapshot);
    }

    grouped
        .into_iter()
        .map(|(ontology, snapshots)| Resource::new(ontology, snapshots).map_err(anyhow::Error::from))
        .collect()
}

/// Loads resources from `path`; `.json` files are read as JSON, anything else as CSV.
#[tracing::instrument(skip(path, scale), fields(path = %path.display()))]
pub fn load_resources(path: &Path, scale: &RatingScale) -> Result<Vec<Resource<DateTime<Utc>>>> {
    let file = File::open(path).with_context(|| format!("cannot open {}", path.display()))?;

    let records = match path.extension().and_then(|e| e.to_str()) {
        Some("json") => parse_json(file)?,
        _ => parse_csv(file)?,
    };
    debug!(records = records.len(), "Snapshot records read");

    into_resources(records, scale)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TrendError;

    const CSV: &str = "\
ontology,version,stars
http://example.org/b,2024-02-01T00:00:00Z,3
http://example.org/a,2024-01-01T00:00:00Z,1
http://example.org/a,2024-03-01T00:00:00Z,4
";

    #[test]
    fn test_parse_csv() {
        let records = parse_csv(CSV.as_bytes()).unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].ontology, "http://example.org/b");
        assert_eq!(records[0].stars, 3);
    }

    #[test]
    fn test_parse_json() {
        let json = r#"[{"ontology":"x","version":"2024-01-01T00:00:00Z","stars":2}]"#;
        let records = parse_json(json.as_bytes()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].stars, 2);
    }

    #[test]
    fn test_into_resources_groups_by_ontology() {
        let records = parse_csv(CSV.as_bytes()).unwrap();
        let resources = into_resources(records, &RatingScale::default()).unwrap();

        assert_eq!(resources.len(), 2);
        assert_eq!(resources[0].key(), "http://example.org/a");
        assert_eq!(resources[0].snapshots().len(), 2);
        assert_eq!(resources[0].snapshots()[1].rating(), 4);
        assert_eq!(resources[1].key(), "http://example.org/b");
    }

    #[test]
    fn test_out_of_range_rating_fails_load() {
        let csv = "ontology,version,stars\nx,2024-01-01T00:00:00Z,7\n";
        let records = parse_csv(csv.as_bytes()).unwrap();
        let err = into_resources(records, &RatingScale::default()).unwrap_err();

        assert!(matches!(
            err.downcast_ref::<TrendError>(),
            Some(TrendError::RatingOutOfRange { rating: 7, .. })
        ));
    }

    #[test]
    fn test_duplicate_version_fails_load() {
        let csv = "ontology,version,stars\nx,2024-01-01T00:00:00Z,1\nx,2024-01-01T00:00:00Z,2\n";
        let records = parse_csv(csv.as_bytes()).unwrap();
        let err = into_resources(records, &RatingScale::default()).unwrap_err();

        assert!(matches!(
            err.downcast_ref::<TrendError>(),
            Some(TrendError::DuplicateVersion { .. })
        ));
    }

    #[test]
    fn test_malformed_csv_row_is_an_error() {
        let csv = "ontology,version,stars\nx,not-a-date,1\n";
        assert!(parse_csv(csv.as_bytes()).is_err());
    }
}
