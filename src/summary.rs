//! Turns the flat record list into the series the charts plot.
//! Failed runs carry no meaningful time and are left out.

use crate::params::*;
use crate::record::RunRecord;
use serde::Serialize;

/// Points of one mode, x is the grid shape label.
#[derive(Clone, Debug, PartialEq)]
pub struct Series {
    pub mode: MemoryMode,
    pub points: Vec<(GridShape, f64)>,
}

/// Mean execution time of one (mode, grid shape) pair.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AverageRow {
    #[serde(rename = "Mode")]
    pub mode: MemoryMode,

    #[serde(rename = "Grid Shape")]
    pub grid_shape: GridShape,

    #[serde(rename = "Mean Execution Time")]
    pub mean: f64,

    #[serde(rename = "Samples")]
    pub samples: usize,
}

/// The distinct values present in a record list, in order of first
/// appearance. For a complete sweep this is the configured order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Axes {
    pub images: Vec<String>,
    pub block_sizes: Vec<u32>,
    pub grid_shapes: Vec<GridShape>,
    pub modes: Vec<MemoryMode>,
}

impl AverageRow {
    pub const COLUMNS: [&'static str; 4] =
        ["Mode", "Grid Shape", "Mean Execution Time", "Samples"];
}

fn push_new<T: PartialEq>(values: &mut Vec<T>, value: T) {
    if !values.contains(&value) {
        values.push(value);
    }
}

impl Axes {
    pub fn from_records(records: &[RunRecord]) -> Self {
        let mut axes = Axes::default();
        for r in records {
            if !axes.images.contains(&r.image) {
                axes.images.push(r.image.clone());
            }
            push_new(&mut axes.block_sizes, r.block_size);
            push_new(&mut axes.grid_shapes, r.grid_shape);
            push_new(&mut axes.modes, r.mode);
        }
        axes
    }
}

/// One series per mode for a single image and block size.
/// Points keep the order in which the records appear.
pub fn image_block_series(
    records: &[RunRecord],
    image: &str,
    block_size: u32,
    modes: &[MemoryMode],
) -> Vec<Series> {
    modes
        .iter()
        .map(|&mode| Series {
            mode,
            points: records
                .iter()
                .filter(|r| {
                    r.success
                        && r.mode == mode
                        && r.block_size == block_size
                        && r.image == image
                })
                .map(|r| (r.grid_shape, r.execution_time))
                .collect(),
        })
        .collect()
}

/// Averages over every image and block size, grouped by mode and
/// grid shape. Grid shapes follow the sweep order; pairs without a
/// single successful run are omitted.
pub fn averages(records: &[RunRecord], axes: &Axes) -> Vec<AverageRow> {
    let mut rows = Vec::new();
    for &mode in &axes.modes {
        for &grid_shape in &axes.grid_shapes {
            let (sum, samples) = records
                .iter()
                .filter(|r| {
                    r.success && r.mode == mode && r.grid_shape == grid_shape
                })
                .fold((0.0, 0), |(s, n), r| (s + r.execution_time, n + 1));
            if samples > 0 {
                rows.push(AverageRow {
                    mode,
                    grid_shape,
                    mean: sum / samples as f64,
                    samples,
                });
            }
        }
    }
    rows
}

pub fn average_series(
    rows: &[AverageRow],
    modes: &[MemoryMode],
) -> Vec<Series> {
    modes
        .iter()
        .map(|&mode| Series {
            mode,
            points: rows
                .iter()
                .filter(|r| r.mode == mode)
                .map(|r| (r.grid_shape, r.mean))
                .collect(),
        })
        .collect()
}
