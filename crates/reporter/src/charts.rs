use crate::error::ReportError;
use analytics::SentimentAnalysis;
use core_types::{Classification, Side};
use plotters::coord::ranged1d::SegmentValue;
use plotters::prelude::*;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use std::collections::BTreeMap;
use std::fmt::Display;
use std::path::Path;

const FONT: &str = "sans-serif";

/// Per-classification colours, from fear (dark) to greed (bright).
const VIRIDIS: [RGBColor; 5] = [
    RGBColor(68, 1, 84),
    RGBColor(59, 82, 139),
    RGBColor(33, 145, 140),
    RGBColor(94, 201, 98),
    RGBColor(253, 231, 37),
];

const MAGMA: [RGBColor; 5] = [
    RGBColor(28, 16, 68),
    RGBColor(114, 31, 129),
    RGBColor(183, 55, 121),
    RGBColor(241, 96, 93),
    RGBColor(254, 176, 120),
];

const BUY_COLOR: RGBColor = RGBColor(59, 76, 192);
const SELL_COLOR: RGBColor = RGBColor(180, 4, 38);

/// A single bar chart with one bar per classification.
pub struct BarChart<'a> {
    pub title: &'a str,
    pub y_label: &'a str,
    pub size: (u32, u32),
    pub palette: &'a [RGBColor; 5],
}

fn render_error<E: Display>(path: &Path) -> impl Fn(E) -> ReportError + '_ {
    move |e| ReportError::Chart {
        path: path.to_path_buf(),
        message: e.to_string(),
    }
}

fn to_f64(value: Decimal) -> f64 {
    value.to_f64().unwrap_or(0.0)
}

/// Value range with headroom, always including zero.
fn y_range(values: impl IntoIterator<Item = f64>) -> std::ops::Range<f64> {
    let (min, max) = values
        .into_iter()
        .fold((0.0_f64, 0.0_f64), |(lo, hi), v| (lo.min(v), hi.max(v)));
    if min == max {
        return 0.0..1.0;
    }
    let pad = (max - min) * 0.1;
    (if min < 0.0 { min - pad } else { 0.0 })..(max + pad)
}

fn label_of(labels: &[String], value: &SegmentValue<i32>) -> String {
    match value {
        SegmentValue::CenterOf(i) | SegmentValue::Exact(i) => usize::try_from(*i)
            .ok()
            .and_then(|i| labels.get(i))
            .cloned()
            .unwrap_or_default(),
        SegmentValue::Last => String::new(),
    }
}

impl BarChart<'_> {
    /// Renders `values` to an SVG file at `path`, replacing any existing file.
    pub fn render(&self, path: &Path, values: &BTreeMap<Classification, Decimal>) -> Result<(), ReportError> {
        let err = render_error(path);
        let labels: Vec<String> = values.keys().map(|c| c.to_string()).collect();
        let bars: Vec<(usize, Classification, f64)> = values
            .iter()
            .enumerate()
            .map(|(i, (c, v))| (i, *c, to_f64(*v)))
            .collect();

        let root = SVGBackend::new(path, self.size).into_drawing_area();
        root.fill(&WHITE).map_err(&err)?;

        let mut chart = ChartBuilder::on(&root)
            .caption(self.title, (FONT, 24))
            .margin(20)
            .x_label_area_size(50)
            .y_label_area_size(70)
            .build_cartesian_2d(
                (0..labels.len() as i32).into_segmented(),
                y_range(bars.iter().map(|(_, _, v)| *v)),
            )
            .map_err(&err)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_desc("Market Sentiment")
            .y_desc(self.y_label)
            .x_labels(labels.len())
            .x_label_formatter(&|v| label_of(&labels, v))
            .axis_desc_style((FONT, 16))
            .draw()
            .map_err(&err)?;

        chart
            .draw_series(bars.iter().map(|&(i, classification, value)| {
                let i = i as i32;
                let color = self.palette[classification as usize];
                let mut bar = Rectangle::new(
                    [(SegmentValue::Exact(i), 0.0), (SegmentValue::Exact(i + 1), value)],
                    color.filled(),
                );
                bar.set_margin(0, 0, 12, 12);
                bar
            }))
            .map_err(&err)?;

        root.present().map_err(&err)?;
        Ok(())
    }
}

/// Profit rate by classification.
pub fn profit_rate_chart(size: (u32, u32)) -> BarChart<'static> {
    BarChart {
        title: "Profit Rate by Market Sentiment",
        y_label: "Profit Rate (%)",
        size,
        palette: &VIRIDIS,
    }
}

/// Average position size by classification.
pub fn average_size_chart(size: (u32, u32)) -> BarChart<'static> {
    BarChart {
        title: "Average Trade Size by Market Sentiment",
        y_label: "Average Trade Size (USD)",
        size,
        palette: &MAGMA,
    }
}

fn side_color(side: Side) -> RGBColor {
    match side {
        Side::Buy => BUY_COLOR,
        Side::Sell => SELL_COLOR,
    }
}

/// Stacked bars of trade counts per side, one stack per classification.
pub fn render_side_distribution(
    path: &Path,
    size: (u32, u32),
    analysis: &SentimentAnalysis,
) -> Result<(), ReportError> {
    let err = render_error(path);
    let distribution = &analysis.side_distribution;
    let classes: Vec<Classification> = analysis.classifications().collect();
    let labels: Vec<String> = classes.iter().map(|c| c.to_string()).collect();
    let tallest = classes
        .iter()
        .map(|&c| distribution.row_total(c))
        .max()
        .unwrap_or(0) as f64;

    let root = SVGBackend::new(path, size).into_drawing_area();
    root.fill(&WHITE).map_err(&err)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Trade Side Distribution by Market Sentiment", (FONT, 24))
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(70)
        .build_cartesian_2d((0..labels.len() as i32).into_segmented(), y_range([tallest]))
        .map_err(&err)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_desc("Market Sentiment")
        .y_desc("Number of Trades")
        .x_labels(labels.len())
        .x_label_formatter(&|v| label_of(&labels, v))
        .axis_desc_style((FONT, 16))
        .draw()
        .map_err(&err)?;

    // Each side is one series stacked on the cumulative height of the sides before it.
    let mut base = vec![0.0_f64; classes.len()];
    for &side in &distribution.sides {
        let color = side_color(side);
        let segments: Vec<_> = classes
            .iter()
            .enumerate()
            .map(|(i, &classification)| {
                let bottom = base[i];
                let top = bottom + distribution.count(classification, side) as f64;
                base[i] = top;
                let i = i as i32;
                let mut segment = Rectangle::new(
                    [(SegmentValue::Exact(i), bottom), (SegmentValue::Exact(i + 1), top)],
                    color.filled(),
                );
                segment.set_margin(0, 0, 12, 12);
                segment
            })
            .collect();

        chart
            .draw_series(segments)
            .map_err(&err)?
            .label(side.as_str())
            .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 12, y + 5)], color.filled()));
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()
        .map_err(&err)?;

    root.present().map_err(&err)?;
    Ok(())
}
