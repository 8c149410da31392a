//! Stacked star distribution chart, described as a plotly-compatible figure.
//!
//! Only the figure description is produced here; drawing it is left to
//! whatever plotly front end loads the JSON.

use serde::Serialize;

use crate::trend::Series;

/// Headroom added above the latest population on the count axis.
/// Archivo assumes the number of ontologies never decreases.
pub const POPULATION_HEADROOM: usize = 50;

pub const CHART_FILE_NAME: &str = "stars_over_time.json";

/// Colors from the best rated level down to the worst.
const PALETTE: [&str; 5] = [
    "rgb(34, 139, 34)",
    "rgb(124, 252, 0)",
    "rgb(255, 215, 0)",
    "rgb(255, 165, 0)",
    "rgb(255, 0, 0)",
];

#[derive(Debug, Serialize)]
pub struct Figure<V> {
    pub data: Vec<Trace<V>>,
    pub layout: Layout,
}

#[derive(Debug, Serialize)]
pub struct Trace<V> {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub x: Vec<V>,
    pub y: Vec<f64>,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stackgroup: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub yaxis: Option<&'static str>,
    pub line: Line,
}

#[derive(Debug, Serialize)]
pub struct Line {
    pub width: f64,
    pub color: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dash: Option<&'static str>,
}

#[derive(Debug, Serialize)]
pub struct Layout {
    pub title: Title,
    pub yaxis: Axis,
    pub yaxis2: Axis,
    pub legend: Legend,
}

#[derive(Debug, Serialize)]
pub struct Title {
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct Axis {
    pub title: Title,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<[usize; 2]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub anchor: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overlaying: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub side: Option<&'static str>,
}

#[derive(Debug, Serialize)]
pub struct Legend {
    pub yanchor: &'static str,
    pub x: f64,
    pub xanchor: &'static str,
    pub y: f64,
}

/// `level` filled stars padded with empty ones up to `max`.
pub fn star_label(level: u8, max: u8) -> String {
    let filled = "★".repeat(level as usize);
    let empty = "☆".repeat(max.saturating_sub(level) as usize);
    format!("{filled}{empty}")
}

fn level_color(rank: usize, levels: usize) -> &'static str {
    let last = PALETTE.len() - 1;
    let index = if levels <= 1 {
        0
    } else {
        rank * last / (levels - 1)
    };
    PALETTE[index.min(last)]
}

/// Builds the stacked level traces, the total population and the average.
pub fn star_figure<V: Clone>(series: &Series<V>) -> Figure<V> {
    let x: Vec<V> = series.checkpoints().cloned().collect();
    let levels = series.scale.levels();
    let max = series.scale.max();
    let mut data = Vec::with_capacity(levels.len() + 2);

    // best level at the bottom of the stack
    for (rank, &level) in levels.iter().rev().enumerate() {
        data.push(Trace {
            kind: "scatter",
            x: x.clone(),
            y: series
                .level_counts(level)
                .into_iter()
                .map(|c| c as f64)
                .collect(),
            name: star_label(level, max),
            stackgroup: Some("one"),
            yaxis: None,
            line: Line {
                width: 0.5,
                color: level_color(rank, levels.len()).to_string(),
                dash: None,
            },
        });
    }

    data.push(Trace {
        kind: "scatter",
        x: x.clone(),
        y: series.populations().into_iter().map(|p| p as f64).collect(),
        name: "Total discovered ontologies".to_string(),
        stackgroup: None,
        yaxis: None,
        line: Line {
            width: 1.0,
            color: "rgb(0, 0, 0)".to_string(),
            dash: None,
        },
    });

    data.push(Trace {
        kind: "scatter",
        x,
        y: series.averages(),
        name: "Average Stars".to_string(),
        stackgroup: None,
        yaxis: Some("y2"),
        line: Line {
            width: 1.0,
            color: "rgb(0, 64, 255)".to_string(),
            dash: Some("dash"),
        },
    });

    Figure {
        data,
        layout: Layout {
            title: Title {
                text: "Archivo Stars Distribution".to_string(),
            },
            yaxis: Axis {
                title: Title {
                    text: "Number of ontologies".to_string(),
                },
                range: Some([0, series.latest_population() + POPULATION_HEADROOM]),
                anchor: None,
                overlaying: None,
                side: None,
            },
            yaxis2: Axis {
                title: Title {
                    text: "Average Stars".to_string(),
                },
                range: None,
                anchor: Some("x"),
                overlaying: Some("y"),
                side: Some("right"),
            },
            legend: Legend {
                yanchor: "top",
                x: 1.35,
                xanchor: "right",
                y: 0.99,
            },
        },
    }
}
