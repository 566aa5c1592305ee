//! Line charts rendered straight to PNG.

mod canvas;
pub mod font;

pub use canvas::*;

use crate::error::*;
use image::{Rgb, RgbImage};
use std::path::Path;

const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
const BLACK: Rgb<u8> = Rgb([0, 0, 0]);
const GRID: Rgb<u8> = Rgb([225, 225, 225]);
const LEGEND_BORDER: Rgb<u8> = Rgb([190, 190, 190]);

const TEXT_SCALE: u32 = 2;
const MARKER_RADIUS: i64 = 5;
const LINE_THICKNESS: i64 = 2;
const Y_TICKS: usize = 5;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Marker {
    Circle,
    Square,
}

/// One line of the chart, points are (category index, value).
#[derive(Clone, Debug)]
pub struct ChartSeries {
    pub label: String,
    pub color: Rgb<u8>,
    pub marker: Marker,
    pub points: Vec<(usize, f64)>,
}

/// Pixel bounds of the plotting area, inclusive.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PlotArea {
    pub left: i64,
    pub top: i64,
    pub right: i64,
    pub bottom: i64,
}

/// Categorical x axis, linear y axis starting at zero.
#[derive(Clone, Debug)]
pub struct LineChart {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub legend_title: String,
    pub categories: Vec<String>,
    pub series: Vec<ChartSeries>,
    pub width: u32,
    pub height: u32,
}

impl LineChart {
    pub fn new(title: &str, categories: Vec<String>) -> Self {
        LineChart {
            title: title.to_string(),
            x_label: "Grid Shape".to_string(),
            y_label: "Execution Time (s)".to_string(),
            legend_title: "Mode".to_string(),
            categories,
            series: Vec::new(),
            width: 1000,
            height: 600,
        }
    }

    pub fn add_series(&mut self, series: ChartSeries) {
        self.series.push(series);
    }

    pub fn plot_area(&self) -> PlotArea {
        PlotArea {
            left: 110,
            top: 70,
            right: self.width as i64 - 30,
            bottom: self.height as i64 - 80,
        }
    }

    /// Top of the y axis, a little above the largest value.
    pub fn y_max(&self) -> f64 {
        let max = self
            .series
            .iter()
            .flat_map(|s| s.points.iter().map(|p| p.1))
            .filter(|v| v.is_finite())
            .fold(0.0, f64::max);
        if max > 0.0 {
            max * 1.1
        } else {
            1.0
        }
    }

    pub fn category_x(&self, category: usize) -> i64 {
        let area = self.plot_area();
        let n = self.categories.len().max(1) as i64;
        let width = area.right - area.left;
        area.left + (2 * category as i64 + 1) * width / (2 * n)
    }

    pub fn value_y(&self, value: f64) -> i64 {
        let area = self.plot_area();
        let fraction = (value / self.y_max()).clamp(0.0, 1.0);
        let height = (area.bottom - area.top) as f64;
        area.bottom - (fraction * height).round() as i64
    }

    pub fn render(&self) -> RgbImage {
        profiling::scope!("chart::render");
        let mut canvas = Canvas::new(self.width, self.height, WHITE);
        let area = self.plot_area();
        let glyph_h = (font::GLYPH_HEIGHT * TEXT_SCALE) as i64;

        let center = self.width as i64 / 2;
        canvas.text_centered(center, 20, &self.title, TEXT_SCALE, BLACK);
        let y_label_top = area.top - glyph_h - 14;
        canvas.text(20, y_label_top, &self.y_label, TEXT_SCALE, BLACK);

        // Horizontal grid and y tick labels
        let y_max = self.y_max();
        for i in 0..=Y_TICKS {
            let value = y_max * i as f64 / Y_TICKS as f64;
            let y = self.value_y(value);
            if i > 0 {
                canvas.line(area.left + 1, y, area.right, y, 1, GRID);
            }
            canvas.line(area.left - 6, y, area.left, y, 1, BLACK);
            canvas.text_right(
                area.left - 12,
                y - glyph_h / 2,
                &format!("{value:.3}"),
                TEXT_SCALE,
                BLACK,
            );
        }

        // Category ticks and labels
        for (i, category) in self.categories.iter().enumerate() {
            let x = self.category_x(i);
            canvas.line(x, area.bottom, x, area.bottom + 6, 1, BLACK);
            let top = area.bottom + 14;
            canvas.text_centered(x, top, category, TEXT_SCALE, BLACK);
        }
        canvas.text_centered(
            (area.left + area.right) / 2,
            area.bottom + 14 + glyph_h + 18,
            &self.x_label,
            TEXT_SCALE,
            BLACK,
        );

        let (l, t, r, b) = (area.left, area.top, area.right, area.bottom);
        canvas.line(l, t, l, b, LINE_THICKNESS, BLACK);
        canvas.line(l, b, r, b, LINE_THICKNESS, BLACK);

        for series in &self.series {
            let pixels: Vec<(i64, i64)> = series
                .points
                .iter()
                .filter(|(_, v)| v.is_finite())
                .map(|&(c, v)| (self.category_x(c), self.value_y(v)))
                .collect();
            for pair in pixels.windows(2) {
                let ((x0, y0), (x1, y1)) = (pair[0], pair[1]);
                canvas.line(x0, y0, x1, y1, LINE_THICKNESS, series.color);
            }
            for &(x, y) in &pixels {
                draw_marker(&mut canvas, x, y, series.marker, series.color);
            }
        }

        self.draw_legend(&mut canvas, area);
        canvas.into_image()
    }

    /// Upper left corner of the plotting area.
    fn draw_legend(&self, canvas: &mut Canvas, area: PlotArea) {
        if self.series.is_empty() {
            return;
        }
        let glyph_h = (font::GLYPH_HEIGHT * TEXT_SCALE) as i64;
        let row = glyph_h + 10;
        let sample = 30;
        let label_w = self
            .series
            .iter()
            .map(|s| font::text_width(&s.label, TEXT_SCALE))
            .chain(std::iter::once(font::text_width(
                &self.legend_title,
                TEXT_SCALE,
            )))
            .max()
            .unwrap_or(0) as i64;

        let x0 = area.left + 12;
        let y0 = area.top + 12;
        let x1 = x0 + 10 + sample + 10 + label_w + 10;
        let y1 = y0 + 8 + row * (self.series.len() as i64 + 1);
        canvas.fill_rect(x0, y0, x1, y1, WHITE);
        canvas.stroke_rect(x0, y0, x1, y1, LEGEND_BORDER);
        let title = &self.legend_title;
        canvas.text_centered((x0 + x1) / 2, y0 + 8, title, TEXT_SCALE, BLACK);

        for (i, series) in self.series.iter().enumerate() {
            let top = y0 + 8 + row * (i as i64 + 1);
            let mid = top + glyph_h / 2;
            let (start, color) = (x0 + 10, series.color);
            canvas.line(start, mid, start + sample, mid, LINE_THICKNESS, color);
            draw_marker(canvas, start + sample / 2, mid, series.marker, color);
            let label = &series.label;
            canvas.text(start + sample + 10, top, label, TEXT_SCALE, BLACK);
        }
    }

    pub fn save<P: AsRef<Path>>(&self, path: &P) -> Result<()> {
        let path = path.as_ref();
        log::info!("Writing: {path:?}");
        self.render().save(path).map_err(|source| Error::Chart {
            path: path.to_path_buf(),
            source,
        })
    }
}

fn draw_marker(
    canvas: &mut Canvas,
    x: i64,
    y: i64,
    marker: Marker,
    color: Rgb<u8>,
) {
    match marker {
        Marker::Circle => canvas.fill_circle(x, y, MARKER_RADIUS, color),
        Marker::Square => canvas.fill_rect(
            x - MARKER_RADIUS,
            y - MARKER_RADIUS,
            x + MARKER_RADIUS,
            y + MARKER_RADIUS,
            color,
        ),
    }
}

#[cfg(test)]
mod unit_tests {
    use super::*;

    const BLUE: Rgb<u8> = Rgb([31, 119, 180]);

    fn chart() -> LineChart {
        let mut chart = LineChart::new(
            "Test",
            vec!["10x10".to_string(), "20x10".to_string(), "40x40".to_string()],
        );
        chart.add_series(ChartSeries {
            label: "Global".to_string(),
            color: BLUE,
            marker: Marker::Circle,
            points: vec![(0, 1.0), (2, 2.0)],
        });
        chart
    }

    #[test]
    fn y_axis_range() {
        let c = chart();
        assert!((c.y_max() - 2.2).abs() < 1e-12);
        assert_eq!(c.value_y(0.0), c.plot_area().bottom);
        assert_eq!(c.value_y(c.y_max()), c.plot_area().top);

        let empty = LineChart::new("Empty", vec![]);
        assert_eq!(empty.y_max(), 1.0);
    }

    #[test]
    fn categories_are_evenly_spaced() {
        let c = chart();
        let area = c.plot_area();
        let xs: Vec<i64> = (0..3).map(|i| c.category_x(i)).collect();
        assert!(xs[0] > area.left && xs[2] < area.right);
        assert!(((xs[1] - xs[0]) - (xs[2] - xs[1])).abs() <= 1);
    }

    #[test]
    fn markers_land_on_points() {
        let c = chart();
        let img = c.render();
        assert_eq!(img.dimensions(), (1000, 600));
        for &(category, value) in &c.series[0].points {
            let (x, y) = (c.category_x(category), c.value_y(value));
            assert_eq!(*img.get_pixel(x as u32, y as u32), BLUE);
        }
        // Nothing drawn where the missing middle point would be
        let (x, y) = (c.category_x(1), c.value_y(0.2));
        assert_ne!(*img.get_pixel(x as u32, y as u32), BLUE);
    }

    #[test]
    fn png_written() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chart.png");
        chart().save(&path).unwrap();
        assert_eq!(image::image_dimensions(&path).unwrap(), (1000, 600));
    }

    #[test]
    fn unwritable_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing_dir").join("chart.png");
        assert!(matches!(chart().save(&path), Err(Error::Chart { .. })));
    }
}
