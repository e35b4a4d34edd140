//! # Comparison Chart
//!
//! Renders an SVG with two panels: grouped bars of average/minimum/maximum
//! latency per retrieval kind, and a box plot of the raw latencies.
//!
//! Drawing is compiled in only with the `charts` cargo feature.
//! [`CHARTS_AVAILABLE`] reports whether it was, so callers decide up front
//! whether to render instead of discovering it through an error.

use anyhow::Result;
use std::path::Path;

use crate::metrics::RetrievalKind;
use crate::results::BenchmarkResult;

/// Whether chart rendering was compiled in
pub const CHARTS_AVAILABLE: bool = cfg!(feature = "charts");

/// One bar group / box in the chart
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSeries {
    pub label: String,
    pub kind: RetrievalKind,
    pub synthetic: bool,
    pub avg_latency_ms: f64,
    pub min_latency_ms: f64,
    pub max_latency_ms: f64,
    pub latencies_ms: Vec<f64>,
}

/// Series to plot: real P2P data if any, otherwise demo figures, then centralized
pub fn comparison_series(result: &BenchmarkResult) -> Vec<ChartSeries> {
    let mut series = Vec::new();

    if let Some(stats) = result.summary_for(RetrievalKind::P2p) {
        series.push(ChartSeries {
            label: RetrievalKind::P2p.to_string(),
            kind: RetrievalKind::P2p,
            synthetic: false,
            avg_latency_ms: stats.avg_latency_ms,
            min_latency_ms: stats.min_latency_ms,
            max_latency_ms: stats.max_latency_ms,
            latencies_ms: latencies(result, RetrievalKind::P2p),
        });
    } else if let Some(demo) = &result.demo_p2p {
        series.push(ChartSeries {
            label: "P2P (demo)".to_string(),
            kind: RetrievalKind::P2p,
            synthetic: true,
            avg_latency_ms: demo.avg_latency_ms,
            min_latency_ms: demo.min_latency_ms,
            max_latency_ms: demo.max_latency_ms,
            latencies_ms: demo.latencies_ms.clone(),
        });
    }

    if let Some(stats) = result.summary_for(RetrievalKind::Centralized) {
        series.push(ChartSeries {
            label: RetrievalKind::Centralized.to_string(),
            kind: RetrievalKind::Centralized,
            synthetic: false,
            avg_latency_ms: stats.avg_latency_ms,
            min_latency_ms: stats.min_latency_ms,
            max_latency_ms: stats.max_latency_ms,
            latencies_ms: latencies(result, RetrievalKind::Centralized),
        });
    }

    series
}

fn latencies(result: &BenchmarkResult, kind: RetrievalKind) -> Vec<f64> {
    result
        .samples(kind)
        .iter()
        .filter(|s| s.is_success())
        .map(|s| s.latency_ms())
        .collect()
}

/// Render the comparison chart for `result` to `path`
#[cfg(feature = "charts")]
pub fn render_comparison_chart(result: &BenchmarkResult, path: &Path) -> Result<()> {
    let series = comparison_series(result);
    if series.is_empty() {
        anyhow::bail!("Nothing to chart: no successful samples");
    }
    plot::draw(&series, path)
}

/// Render the comparison chart for `result` to `path`
#[cfg(not(feature = "charts"))]
pub fn render_comparison_chart(_result: &BenchmarkResult, _path: &Path) -> Result<()> {
    anyhow::bail!("Chart rendering is not available: built without the `charts` feature")
}

#[cfg(feature = "charts")]
mod plot {
    use super::ChartSeries;
    use crate::metrics::RetrievalKind;
    use anyhow::Result;
    use plotters::coord::Shift;
    use plotters::prelude::*;
    use std::path::Path;

    const P2P_COLOR: RGBColor = RGBColor(0x4C, 0xAF, 0x50);
    const CENTRAL_COLOR: RGBColor = RGBColor(0x21, 0x96, 0xF3);
    const CATEGORIES: [&str; 3] = ["Average", "Minimum", "Maximum"];
    const BAR_WIDTH: f64 = 0.35;

    type Area<'a> = DrawingArea<SVGBackend<'a>, Shift>;

    fn color_of(series: &ChartSeries) -> RGBColor {
        match series.kind {
            RetrievalKind::P2p => P2P_COLOR,
            RetrievalKind::Centralized => CENTRAL_COLOR,
        }
    }

    pub(super) fn draw(series: &[ChartSeries], path: &Path) -> Result<()> {
        let root = SVGBackend::new(path, (1400, 600)).into_drawing_area();
        root.fill(&WHITE)?;
        let root = root.titled(
            "CodeVault: P2P vs Centralized Performance Comparison",
            ("sans-serif", 24.0),
        )?;

        let (left, right) = root.split_horizontally(700);
        draw_latency_bars(&left, series)?;
        draw_distribution(&right, series)?;

        root.present()?;
        Ok(())
    }

    fn draw_latency_bars(area: &Area<'_>, series: &[ChartSeries]) -> Result<()> {
        let y_max = series
            .iter()
            .map(|s| s.max_latency_ms)
            .fold(1.0f64, f64::max)
            * 1.15;

        let mut chart = ChartBuilder::on(area)
            .caption("Download Latency Comparison", ("sans-serif", 20))
            .margin(15)
            .x_label_area_size(40)
            .y_label_area_size(60)
            .build_cartesian_2d(-0.5f64..2.5f64, 0f64..y_max)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(3)
            .x_label_formatter(&|x| category_label(*x))
            .x_desc("Metric")
            .y_desc("Latency (ms)")
            .draw()?;

        let groups = series.len() as f64;
        for (idx, s) in series.iter().enumerate() {
            let color = color_of(s);
            let offset = (idx as f64 - (groups - 1.0) / 2.0) * BAR_WIDTH;
            let values = [s.avg_latency_ms, s.min_latency_ms, s.max_latency_ms];
            let fill = if s.synthetic {
                color.mix(0.45).filled()
            } else {
                color.filled()
            };

            chart
                .draw_series(values.iter().enumerate().map(|(i, &v)| {
                    let x0 = i as f64 + offset - BAR_WIDTH / 2.0;
                    Rectangle::new([(x0, 0.0), (x0 + BAR_WIDTH, v)], fill)
                }))?
                .label(s.label.clone())
                .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], fill));

            chart.draw_series(values.iter().enumerate().map(|(i, &v)| {
                let x0 = i as f64 + offset - BAR_WIDTH / 2.0;
                Rectangle::new([(x0, 0.0), (x0 + BAR_WIDTH, v)], BLACK.stroke_width(1))
            }))?;

            chart.draw_series(values.iter().enumerate().map(|(i, &v)| {
                Text::new(
                    format!("{:.1}", v),
                    (i as f64 + offset - BAR_WIDTH / 4.0, v + y_max * 0.02),
                    ("sans-serif", 12.0),
                )
            }))?;
        }

        chart
            .configure_series_labels()
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()?;
        Ok(())
    }

    fn draw_distribution(area: &Area<'_>, series: &[ChartSeries]) -> Result<()> {
        let plotted: Vec<&ChartSeries> =
            series.iter().filter(|s| !s.latencies_ms.is_empty()).collect();
        let labels: Vec<&str> = plotted.iter().map(|s| s.label.as_str()).collect();

        let y_max = plotted
            .iter()
            .flat_map(|s| s.latencies_ms.iter().copied())
            .fold(1.0f64, f64::max)
            * 1.1;

        let mut chart = ChartBuilder::on(area)
            .caption("Latency Distribution", ("sans-serif", 20))
            .margin(15)
            .x_label_area_size(40)
            .y_label_area_size(60)
            .build_cartesian_2d(labels[..].into_segmented(), 0f32..y_max as f32)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .y_desc("Latency (ms)")
            .draw()?;

        for (s, label) in plotted.iter().zip(labels.iter()) {
            let quartiles = Quartiles::new(&s.latencies_ms);
            let color = color_of(s);
            chart.draw_series(std::iter::once(
                Boxplot::new_vertical(SegmentValue::CenterOf(label), &quartiles)
                    .width(60)
                    .whisker_width(0.5)
                    .style(color.stroke_width(2)),
            ))?;
        }
        Ok(())
    }

    fn category_label(x: f64) -> String {
        let nearest = x.round();
        if (x - nearest).abs() > 1e-6 || nearest < 0.0 {
            return String::new();
        }
        CATEGORIES
            .get(nearest as usize)
            .map(|c| c.to_string())
            .unwrap_or_default()
    }

}
