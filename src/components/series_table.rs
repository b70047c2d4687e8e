use ratatui::{
    Frame,
    layout::{Constraint, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, BorderType, Borders, Cell, Row, Table, TableState},
};

use super::Component;
use crate::action::Action;
use crate::state::{DailySeries, format_temperature};

pub const HEADERS: [&str; 4] = ["Date", "Max Temp (°C)", "Min Temp (°C)", "Mean Temp (°C)"];

const ROW_ALT_BG: Color = Color::Rgb(28, 30, 36);
const HEADER_BG: Color = Color::Rgb(79, 70, 229);

pub struct SeriesTable;

pub struct SeriesTableProps<'a> {
    pub series: &'a DailySeries,
    pub selected: usize,
    pub is_focused: bool,
}

/// Cell text per row, read by parallel index from the four sequences
pub fn table_rows(series: &DailySeries) -> Vec<[String; 4]> {
    series
        .days()
        .map(|day| {
            [
                day.date.to_string(),
                format_temperature(day.max),
                format_temperature(day.min),
                format_temperature(day.mean),
            ]
        })
        .collect()
}

impl Component<Action> for SeriesTable {
    type Props<'a> = SeriesTableProps<'a>;

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let header = Row::new(HEADERS.map(Cell::from)).style(
            Style::default()
                .fg(Color::White)
                .bg(HEADER_BG)
                .add_modifier(Modifier::BOLD),
        );

        let rows = table_rows(props.series)
            .into_iter()
            .enumerate()
            .map(|(i, cells)| {
                let row = Row::new(cells.map(Cell::from));
                if i % 2 == 1 {
                    row.style(Style::default().bg(ROW_ALT_BG))
                } else {
                    row
                }
            });

        let border = if props.is_focused {
            Style::default().fg(Color::Rgb(96, 165, 250))
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let table = Table::new(rows, [Constraint::Fill(1); 4])
            .header(header)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded)
                    .border_style(border),
            )
            .row_highlight_style(
                Style::default()
                    .bg(Color::Rgb(55, 65, 81))
                    .add_modifier(Modifier::BOLD),
            );

        let selected = (!props.series.is_empty()).then_some(props.selected);
        let mut table_state = TableState::default().with_selected(selected);
        frame.render_stateful_widget(table, area, &mut table_state);
    }
}
