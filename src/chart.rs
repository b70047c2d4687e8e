//! Chart model for the temperature line chart.
//!
//! [`ChartSpec`] is everything the chart widget needs, derived from a
//! [`DailySeries`]. [`ChartSlot`] owns the one live chart and replaces it
//! when a new series revision arrives.

use ratatui::style::Color;

use crate::state::DailySeries;

/// Curve tension for the smoothed lines (0 draws straight segments)
pub const LINE_TENSION: f64 = 0.4;

/// Interpolated points drawn between two neighbouring days
pub const SAMPLES_PER_SEGMENT: usize = 8;

/// Which aggregate a dataset plots
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SeriesKind {
    Max,
    Min,
    Mean,
}

impl SeriesKind {
    pub const ALL: [SeriesKind; 3] = [SeriesKind::Max, SeriesKind::Min, SeriesKind::Mean];

    pub fn label(self) -> &'static str {
        match self {
            SeriesKind::Max => "Max Temp",
            SeriesKind::Min => "Min Temp",
            SeriesKind::Mean => "Mean Temp",
        }
    }

    pub fn color(self) -> Color {
        match self {
            SeriesKind::Max => Color::Rgb(255, 99, 132),
            SeriesKind::Min => Color::Rgb(54, 162, 235),
            SeriesKind::Mean => Color::Rgb(255, 206, 86),
        }
    }

    fn values(self, series: &DailySeries) -> &[Option<f64>] {
        match self {
            SeriesKind::Max => &series.temperature_2m_max,
            SeriesKind::Min => &series.temperature_2m_min,
            SeriesKind::Mean => &series.temperature_2m_mean,
        }
    }
}

/// One line of the chart
#[derive(Clone, Debug, PartialEq)]
pub struct ChartDataset {
    pub kind: SeriesKind,
    /// Raw values, one per label
    pub values: Vec<Option<f64>>,
    /// Smoothed polylines; a missing value splits the line
    pub segments: Vec<Vec<(f64, f64)>>,
}

impl ChartDataset {
    fn build(kind: SeriesKind, values: &[Option<f64>], tension: f64) -> Self {
        Self {
            kind,
            values: values.to_vec(),
            segments: split_runs(values)
                .into_iter()
                .map(|run| smooth(&run, tension, SAMPLES_PER_SEGMENT))
                .collect(),
        }
    }

    pub fn label(&self) -> &'static str {
        self.kind.label()
    }

    pub fn color(&self) -> Color {
        self.kind.color()
    }
}

/// A line chart: x labels plus three datasets over the same days
#[derive(Clone, Debug, PartialEq)]
pub struct ChartSpec {
    pub labels: Vec<String>,
    pub datasets: Vec<ChartDataset>,
    pub tension: f64,
    pub tooltips: bool,
    pub y_bounds: [f64; 2],
}

impl ChartSpec {
    pub fn from_series(series: &DailySeries) -> Self {
        let datasets: Vec<ChartDataset> = SeriesKind::ALL
            .into_iter()
            .map(|kind| ChartDataset::build(kind, kind.values(series), LINE_TENSION))
            .collect();
        let y_bounds = y_bounds(&datasets);
        Self {
            labels: series.time.clone(),
            datasets,
            tension: LINE_TENSION,
            tooltips: true,
            y_bounds,
        }
    }

    pub fn x_bounds(&self) -> [f64; 2] {
        [0.0, self.labels.len().saturating_sub(1).max(1) as f64]
    }

    pub fn has_points(&self) -> bool {
        self.datasets.iter().any(|d| !d.segments.is_empty())
    }
}

/// Split values into runs of consecutive present points, keyed by day index.
fn split_runs(values: &[Option<f64>]) -> Vec<Vec<(f64, f64)>> {
    let mut runs = Vec::new();
    let mut current = Vec::new();
    for (i, value) in values.iter().enumerate() {
        match value {
            Some(v) if v.is_finite() => current.push((i as f64, *v)),
            _ => {
                if !current.is_empty() {
                    runs.push(std::mem::take(&mut current));
                }
            }
        }
    }
    if !current.is_empty() {
        runs.push(current);
    }
    runs
}

/// Bezier control points around `cur`, scaled by distance to each neighbour.
fn control_points(
    prev: (f64, f64),
    cur: (f64, f64),
    next: (f64, f64),
    tension: f64,
) -> ((f64, f64), (f64, f64)) {
    let d01 = ((cur.0 - prev.0).powi(2) + (cur.1 - prev.1).powi(2)).sqrt();
    let d12 = ((next.0 - cur.0).powi(2) + (next.1 - cur.1).powi(2)).sqrt();
    let total = d01 + d12;
    let (s01, s12) = if total > 0.0 {
        (d01 / total, d12 / total)
    } else {
        (0.0, 0.0)
    };
    let fa = tension * s01;
    let fb = tension * s12;
    let dx = next.0 - prev.0;
    let dy = next.1 - prev.1;
    (
        (cur.0 - fa * dx, cur.1 - fa * dy),
        (cur.0 + fb * dx, cur.1 + fb * dy),
    )
}

fn bezier(p0: (f64, f64), c0: (f64, f64), c1: (f64, f64), p1: (f64, f64), t: f64) -> (f64, f64) {
    let u = 1.0 - t;
    let a = u * u * u;
    let b = 3.0 * u * u * t;
    let c = 3.0 * u * t * t;
    let d = t * t * t;
    (
        a * p0.0 + b * c0.0 + c * c1.0 + d * p1.0,
        a * p0.1 + b * c0.1 + c * c1.1 + d * p1.1,
    )
}

/// Smooth a polyline with cubic Bezier segments. Every input point is kept
/// and `samples` points are inserted between each neighbouring pair.
pub fn smooth(points: &[(f64, f64)], tension: f64, samples: usize) -> Vec<(f64, f64)> {
    if points.len() < 3 || tension <= 0.0 || samples == 0 {
        return points.to_vec();
    }

    let last = points.len() - 1;
    let controls: Vec<_> = (0..points.len())
        .map(|i| {
            let prev = points[i.saturating_sub(1)];
            let next = points[(i + 1).min(last)];
            control_points(prev, points[i], next, tension)
        })
        .collect();

    let mut out = Vec::with_capacity(points.len() + last * samples);
    for i in 0..last {
        let (p0, p1) = (points[i], points[i + 1]);
        out.push(p0);
        for step in 1..=samples {
            let t = step as f64 / (samples + 1) as f64;
            out.push(bezier(p0, controls[i].1, controls[i + 1].0, p1, t));
        }
    }
    out.push(points[last]);
    out
}

fn y_bounds(datasets: &[ChartDataset]) -> [f64; 2] {
    let (lo, hi) = datasets
        .iter()
        .flat_map(|d| d.segments.iter().flatten())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &(_, y)| {
            (lo.min(y), hi.max(y))
        });
    if !lo.is_finite() || !hi.is_finite() {
        return [0.0, 1.0];
    }
    let pad = ((hi - lo) * 0.1).max(1.0);
    [(lo - pad).floor(), (hi + pad).ceil()]
}

#[derive(Debug)]
struct LiveChart {
    revision: u64,
    spec: ChartSpec,
}

/// Owner of the single live chart.
///
/// The live chart is destroyed before its replacement is created, so there
/// is never more than one.
#[derive(Debug, Default)]
pub struct ChartSlot {
    live: Option<LiveChart>,
    created: u64,
    destroyed: u64,
}

impl ChartSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the live chart match `series` at `revision`.
    pub fn sync(&mut self, revision: u64, series: Option<&DailySeries>) -> Option<&ChartSpec> {
        let stale = match (&self.live, series) {
            (Some(live), Some(_)) => live.revision != revision,
            (Some(_), None) => true,
            (None, _) => false,
        };
        if stale {
            self.destroy();
        }
        if self.live.is_none() {
            if let Some(series) = series {
                self.live = Some(LiveChart {
                    revision,
                    spec: ChartSpec::from_series(series),
                });
                self.created += 1;
            }
        }
        self.current()
    }

    pub fn current(&self) -> Option<&ChartSpec> {
        self.live.as_ref().map(|live| &live.spec)
    }

    pub fn destroy(&mut self) {
        if self.live.take().is_some() {
            self.destroyed += 1;
        }
    }

    pub fn created(&self) -> u64 {
        self.created
    }

    pub fn destroyed(&self) -> u64 {
        self.destroyed
    }

    pub fn live_count(&self) -> u64 {
        self.created - self.destroyed
    }
}
