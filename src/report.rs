use crate::chart::*;
use crate::error::*;
use crate::layout::Layout;
use crate::params::*;
use crate::record::RunRecord;
use crate::summary::*;
use crate::table;
use image::Rgb;
use std::path::PathBuf;

/// Global is blue with circles, Shared orange with squares.
pub fn mode_style(mode: MemoryMode) -> (Rgb<u8>, Marker) {
    let (color, marker) = match mode {
        MemoryMode::Global => (colorous::CATEGORY10[0], Marker::Circle),
        MemoryMode::Shared => (colorous::CATEGORY10[1], Marker::Square),
    };
    (Rgb(color.as_array()), marker)
}

/// Categories are the grid shapes, series points are placed by
/// looking their shape up in `grid_shapes`.
pub fn series_chart<F: Fn(MemoryMode) -> String>(
    title: &str,
    grid_shapes: &[GridShape],
    series: &[Series],
    label: F,
) -> LineChart {
    let categories = grid_shapes.iter().map(|g| g.label()).collect();
    let mut chart = LineChart::new(title, categories);
    for s in series {
        let (color, marker) = mode_style(s.mode);
        chart.add_series(ChartSeries {
            label: label(s.mode),
            color,
            marker,
            points: s
                .points
                .iter()
                .filter_map(|(grid, v)| {
                    grid_shapes.iter().position(|g| g == grid).map(|i| (i, *v))
                })
                .collect(),
        });
    }
    chart
}

/// Chart names only keep the file stem, so `a.png` and `a.jpg` collide.
fn check_stems(images: &[String]) -> Result<()> {
    for (i, first) in images.iter().enumerate() {
        let stem = file_stem(first);
        if let Some(second) =
            images[i + 1..].iter().find(|other| file_stem(other) == stem)
        {
            return Err(Error::ChartCollision {
                first: first.clone(),
                second: second.clone(),
            });
        }
    }
    Ok(())
}

/// Write the averages table and every chart, returns the chart paths.
pub fn write_report(
    records: &[RunRecord],
    layout: &Layout,
) -> Result<Vec<PathBuf>> {
    profiling::scope!("report::write");
    let axes = Axes::from_records(records);
    check_stems(&axes.images)?;
    let mut written = Vec::new();

    for image in &axes.images {
        for &block_size in &axes.block_sizes {
            let series =
                image_block_series(records, image, block_size, &axes.modes);
            let title = format!(
                "Performance Comparison for {image} - Block Size {block_size}"
            );
            let label =
                |mode: MemoryMode| format!("{mode} - Block Size {block_size}");
            let chart = series_chart(&title, &axes.grid_shapes, &series, label);
            let path = layout.chart_path(image, block_size);
            chart.save(&path)?;
            written.push(path);
        }
    }

    let rows = averages(records, &axes);
    table::write_averages(&rows, &layout.average_table_path())?;

    let series = average_series(&rows, &axes.modes);
    let chart = series_chart(
        "Average Performance Comparison Across All Images",
        &axes.grid_shapes,
        &series,
        |mode| format!("{mode} (Average)"),
    );
    let path = layout.average_chart_path();
    chart.save(&path)?;
    written.push(path);

    Ok(written)
}
