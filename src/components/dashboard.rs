use crossterm::event::KeyCode;
use ratatui::{
    Frame,
    layout::{Constraint, Flex, Layout, Rect},
    style::{Color, Style, Stylize},
    text::{Line, Span},
    widgets::Paragraph,
};
use tui_dispatch::EventKind;
use tui_dispatch_components::{
    StatusBar, StatusBarHint, StatusBarProps, StatusBarSection, StatusBarStyle,
};

use super::title_banner::BANNER_OVERHEAD;
use super::{
    Component, InputForm, InputFormProps, SeriesTable, SeriesTableProps, TemperatureChart,
    TemperatureChartProps, TitleBanner, TitleBannerProps,
};
use crate::action::Action;
use crate::chart::ChartSlot;
use crate::state::{AppState, Focus};

/// Rows of the tallest FIGlet font in the banner stack
const BANNER_FONT_ROWS: u16 = 6;

/// Props for Dashboard - read-only view of state
pub struct DashboardProps<'a> {
    pub state: &'a AppState,
    pub is_focused: bool,
}

/// Form on top, chart and table below. Owns the live chart.
#[derive(Default)]
pub struct Dashboard {
    form: InputForm,
    slot: ChartSlot,
}

impl Dashboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn chart_slot(&self) -> &ChartSlot {
        &self.slot
    }

    fn handle_results_key(code: KeyCode) -> Option<Action> {
        match code {
            KeyCode::Left | KeyCode::Char('h') => Some(Action::ChartStep(-1)),
            KeyCode::Right | KeyCode::Char('l') => Some(Action::ChartStep(1)),
            KeyCode::Home => Some(Action::ChartSelectDay(0)),
            KeyCode::End => Some(Action::ChartSelectDay(usize::MAX)),
            KeyCode::Char('r') | KeyCode::F(5) | KeyCode::Enter => Some(Action::FormSubmit),
            KeyCode::Char('i') => Some(Action::FocusSet(Focus::Latitude)),
            KeyCode::Char('q') | KeyCode::Esc => Some(Action::Quit),
            _ => None,
        }
    }
}

impl Component<Action> for Dashboard {
    type Props<'a> = DashboardProps<'a>;

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = Action> {
        if !props.is_focused {
            return Vec::new();
        }
        let EventKind::Key(key) = event else {
            return Vec::new();
        };

        match key.code {
            KeyCode::Tab => return vec![Action::FocusNext],
            KeyCode::BackTab => return vec![Action::FocusPrev],
            _ => {}
        }

        let state = props.state;
        match state.focus.field() {
            Some(_) if key.code == KeyCode::Esc => vec![Action::FocusSet(Focus::Results)],
            Some(field) => self
                .form
                .handle_event(
                    event,
                    InputFormProps {
                        form: &state.form,
                        focused: Some(field),
                        notice: state.form_notice.as_deref(),
                        loading: state.loading,
                    },
                )
                .into_iter()
                .collect(),
            None => Self::handle_results_key(key.code).into_iter().collect(),
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: DashboardProps<'_>) {
        let state = props.state;
        let chunks = Layout::vertical([
            Constraint::Max(BANNER_FONT_ROWS + BANNER_OVERHEAD), // Title
            Constraint::Length(4),                                // Form
            Constraint::Min(6),                                   // Results
            Constraint::Length(1),                                // Help bar
        ])
        .split(area);

        let mut banner = TitleBanner;
        banner.render(
            frame,
            chunks[0],
            TitleBannerProps {
                subtitle: "Daily temperatures from Open-Meteo",
                is_animating: state.loading_anim_active(),
                tick_count: state.tick_count,
            },
        );

        self.form.render(
            frame,
            chunks[1],
            InputFormProps {
                form: &state.form,
                focused: if props.is_focused { state.focus.field() } else { None },
                notice: state.form_notice.as_deref(),
                loading: state.loading,
            },
        );

        self.render_results(frame, chunks[2], state, props.is_focused);

        let hints = if state.focus == Focus::Results {
            vec![
                StatusBarHint::new("←→", "day"),
                StatusBarHint::new("r", "refresh"),
                StatusBarHint::new("i", "edit"),
                StatusBarHint::new("tab", "focus"),
                StatusBarHint::new("q", "quit"),
            ]
        } else {
            vec![
                StatusBarHint::new("enter", "fetch"),
                StatusBarHint::new("↑↓", "date"),
                StatusBarHint::new("tab", "next field"),
                StatusBarHint::new("esc", "results"),
            ]
        };
        let mut status_bar = StatusBar::new();
        <StatusBar as Component<Action>>::render(
            &mut status_bar,
            frame,
            chunks[3],
            StatusBarProps {
                left: StatusBarSection::empty(),
                center: StatusBarSection::hints(&hints),
                right: StatusBarSection::empty(),
                style: StatusBarStyle::default(),
                is_focused: false,
            },
        );
    }
}

impl Dashboard {
    fn render_results(&mut self, frame: &mut Frame, area: Rect, state: &AppState, is_focused: bool) {
        let Some(chart) = self.slot.sync(state.series_revision, state.series.as_ref()) else {
            let message = if state.loading {
                Line::from(Span::styled("Loading...", Style::default().fg(Color::Gray)))
            } else {
                Line::from(vec![
                    Span::styled("Fill in the form and press ", Style::default().fg(Color::DarkGray)),
                    Span::styled("Enter", Style::default().fg(Color::Cyan).bold()),
                    Span::styled(" to fetch weather", Style::default().fg(Color::DarkGray)),
                ])
            };
            render_centered(frame, area, message);
            return;
        };

        let Some(series) = state.series.as_ref() else {
            return;
        };
        if series.is_empty() {
            render_centered(
                frame,
                area,
                Line::from(Span::styled(
                    "No days in the selected range",
                    Style::default().fg(Color::DarkGray),
                )),
            );
            return;
        }

        let results_focused = is_focused && state.focus == Focus::Results;
        let chunks = Layout::vertical([
            Constraint::Percentage(55), // Chart
            Constraint::Min(4),         // Table
        ])
        .split(area);

        let mut chart_view = TemperatureChart;
        chart_view.render(
            frame,
            chunks[0],
            TemperatureChartProps {
                spec: chart,
                series,
                selected: state.selected_day,
                is_focused: results_focused,
            },
        );

        let mut table = SeriesTable;
        table.render(
            frame,
            chunks[1],
            SeriesTableProps {
                series,
                selected: state.selected_day,
                is_focused: results_focused,
            },
        );
    }
}

fn render_centered(frame: &mut Frame, area: Rect, line: Line<'_>) {
    let [row] = Layout::vertical([Constraint::Length(1)])
        .flex(Flex::Center)
        .areas(area);
    frame.render_widget(Paragraph::new(line.centered()), row);
}
