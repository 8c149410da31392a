//! Output formatting for computed star trends.
//!
//! Supports debug logging, JSON and CSV encoding, and gzip compression of
//! encoded bodies.

use anyhow::Result;
use flate2::Compression;
use flate2::write::GzEncoder;
use serde::Serialize;
use std::fmt::{Debug, Display};
use std::io::Write;
use tracing::debug;

use crate::trend::Series;

pub const SERIES_FILE_NAME: &str = "stars_series.json";
pub const SERIES_CSV_FILE_NAME: &str = "stars_series.csv";

/// Logs a series using Rust's debug pretty-print format.
pub fn print_pretty<V: Debug>(series: &Series<V>) {
    debug!("{:#?}", series);
}

/// Pretty JSON encoding of any serializable value.
pub fn to_json_bytes(value: &impl Serialize) -> Result<Vec<u8>> {
    Ok(serde_json::to_vec_pretty(value)?)
}

/// One CSV row per checkpoint: `checkpoint,population,average,stars_<level>...`.
pub fn series_csv<V: Display>(series: &Series<V>) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    let mut header = vec![
        "checkpoint".to_string(),
        "population".to_string(),
        "average".to_string(),
    ];
    header.extend(series.scale.levels().iter().map(|level| format!("stars_{level}")));
    writer.write_record(&header)?;

    for point in &series.points {
        let mut row = vec![
            point.checkpoint.to_string(),
            point.population.to_string(),
            point.average.to_string(),
        ];
        row.extend(series.scale.levels().iter().map(|&level| point.histogram.count(level).to_string()));
        writer.write_record(&row)?;
    }

    writer.flush()?;
    Ok(writer.into_inner().map_err(|e| e.into_error())?)
}

/// Optionally gzip-compresses `body`, returning it with the matching file name.
pub fn encode_body(name: &str, body: Vec<u8>, gzip: bool) -> Result<(String, Vec<u8>)> {
    if !gzip {
        return Ok((name.to_string(), body));
    }

    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(&body)?;
    let compressed = encoder.finish()?;
    debug!(name, raw = body.len(), compressed = compressed.len(), "Body compressed");

    Ok((format!("{name}.gz"), compressed))
}
