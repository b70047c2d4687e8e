use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{Axis, Block, BorderType, Borders, Chart, Dataset, GraphType, Paragraph},
};

use super::Component;
use crate::action::Action;
use crate::chart::ChartSpec;
use crate::state::{DailySeries, format_temperature};

pub struct TemperatureChart;

pub struct TemperatureChartProps<'a> {
    pub spec: &'a ChartSpec,
    pub series: &'a DailySeries,
    pub selected: usize,
    pub is_focused: bool,
}

/// Tooltip for the day under the cursor
pub fn tooltip_line(series: &DailySeries, selected: usize) -> Line<'static> {
    let Some(day) = series.day(selected) else {
        return Line::default();
    };
    let mut spans = vec![Span::styled(
        day.date.to_string(),
        Style::default().add_modifier(Modifier::BOLD),
    )];
    for (kind, value) in crate::chart::SeriesKind::ALL
        .into_iter()
        .zip([day.max, day.min, day.mean])
    {
        spans.push(Span::styled("  │  ", Style::default().fg(Color::DarkGray)));
        spans.push(Span::styled(
            format!("{} {}", kind.label(), format_temperature(value)),
            Style::default().fg(kind.color()),
        ));
    }
    Line::from(spans)
}

fn x_labels(labels: &[String]) -> Vec<Span<'static>> {
    match labels {
        [] => Vec::new(),
        [only] => vec![Span::raw(only.clone())],
        [first, last] => vec![Span::raw(first.clone()), Span::raw(last.clone())],
        [first, .., last] => vec![
            Span::raw(first.clone()),
            Span::raw(labels[labels.len() / 2].clone()),
            Span::raw(last.clone()),
        ],
    }
}

fn y_labels(bounds: [f64; 2]) -> Vec<Span<'static>> {
    let mid = (bounds[0] + bounds[1]) / 2.0;
    [bounds[0], mid, bounds[1]]
        .into_iter()
        .map(|v| Span::raw(format!("{v:.0}°")))
        .collect()
}

impl Component<Action> for TemperatureChart {
    type Props<'a> = TemperatureChartProps<'a>;

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let border = if props.is_focused {
            Style::default().fg(Color::Rgb(96, 165, 250))
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(border)
            .title("Daily Temperature (°C)");
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let chunks = Layout::vertical([
            Constraint::Length(1), // Tooltip
            Constraint::Min(1),    // Plot
        ])
        .split(inner);

        if props.spec.tooltips {
            frame.render_widget(
                Paragraph::new(tooltip_line(props.series, props.selected))
                    .alignment(Alignment::Center),
                chunks[0],
            );
        }

        let spec = props.spec;
        let cursor_x = props.selected as f64;
        let cursor = [(cursor_x, spec.y_bounds[0]), (cursor_x, spec.y_bounds[1])];

        let mut datasets = Vec::new();
        if !spec.labels.is_empty() {
            datasets.push(
                Dataset::default()
                    .marker(Marker::Braille)
                    .graph_type(GraphType::Line)
                    .style(Style::default().fg(Color::Rgb(70, 70, 80)))
                    .data(&cursor),
            );
        }
        for dataset in &spec.datasets {
            for (i, segment) in dataset.segments.iter().enumerate() {
                let graph_type = if segment.len() > 1 {
                    GraphType::Line
                } else {
                    GraphType::Scatter
                };
                let mut line = Dataset::default()
                    .marker(Marker::Braille)
                    .graph_type(graph_type)
                    .style(Style::default().fg(dataset.color()))
                    .data(segment);
                // Legend entry once per dataset
                if i == 0 {
                    line = line.name(dataset.label());
                }
                datasets.push(line);
            }
        }

        let chart = Chart::new(datasets)
            .x_axis(
                Axis::default()
                    .style(Style::default().fg(Color::Gray))
                    .bounds(spec.x_bounds())
                    .labels(x_labels(&spec.labels)),
            )
            .y_axis(
                Axis::default()
                    .style(Style::default().fg(Color::Gray))
                    .bounds(spec.y_bounds)
                    .labels(y_labels(spec.y_bounds)),
            )
            .hidden_legend_constraints((Constraint::Ratio(1, 2), Constraint::Ratio(1, 2)));
        frame.render_widget(chart, chunks[1]);
    }
}
