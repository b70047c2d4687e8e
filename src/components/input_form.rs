use crossterm::event::KeyCode;
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
};
use tui_dispatch::EventKind;
use tui_dispatch_components::{BaseStyle, Padding, TextInput, TextInputProps, TextInputStyle};

use super::Component;
use crate::action::Action;
use crate::state::{FormField, FormInputs};

const ACCENT: Color = Color::Rgb(96, 165, 250);
const FIELD_BG: Color = Color::Rgb(30, 32, 40);
const TEXT_DIM: Color = Color::Rgb(140, 140, 150);

/// Input Collector: four text fields and the fetch button
pub struct InputForm {
    latitude: TextInput,
    longitude: TextInput,
    start_date: TextInput,
    end_date: TextInput,
}

pub struct InputFormProps<'a> {
    pub form: &'a FormInputs,
    /// Field holding the cursor, if any
    pub focused: Option<FormField>,
    pub notice: Option<&'a str>,
    pub loading: bool,
}

fn on_change(field: FormField) -> fn(String) -> Action {
    match field {
        FormField::Latitude => Action::FormLatitudeChange,
        FormField::Longitude => Action::FormLongitudeChange,
        FormField::StartDate => Action::FormStartDateChange,
        FormField::EndDate => Action::FormEndDateChange,
    }
}

fn submit_form(_: String) -> Action {
    Action::FormSubmit
}

fn placeholder(field: FormField) -> &'static str {
    match field {
        FormField::Latitude => "e.g. 52.52",
        FormField::Longitude => "e.g. 13.41",
        FormField::StartDate | FormField::EndDate => "YYYY-MM-DD",
    }
}

fn input_style() -> TextInputStyle {
    TextInputStyle {
        base: BaseStyle {
            border: None,
            padding: Padding::xy(1, 0),
            bg: Some(FIELD_BG),
            fg: None,
        },
        placeholder_style: Some(Style::default().fg(TEXT_DIM)),
        cursor_style: None,
    }
}

impl Default for InputForm {
    fn default() -> Self {
        Self {
            latitude: TextInput::new(),
            longitude: TextInput::new(),
            start_date: TextInput::new(),
            end_date: TextInput::new(),
        }
    }
}

impl InputForm {
    pub fn new() -> Self {
        Self::default()
    }

    fn input_mut(&mut self, field: FormField) -> &mut TextInput {
        match field {
            FormField::Latitude => &mut self.latitude,
            FormField::Longitude => &mut self.longitude,
            FormField::StartDate => &mut self.start_date,
            FormField::EndDate => &mut self.end_date,
        }
    }
}

impl Component<Action> for InputForm {
    type Props<'a> = InputFormProps<'a>;

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = Action> {
        let Some(field) = props.focused else {
            return Vec::new();
        };
        let EventKind::Key(key) = event else {
            return Vec::new();
        };

        match key.code {
            KeyCode::Enter => return vec![Action::FormSubmit],
            KeyCode::Up if field.is_date() => return vec![Action::FormDateStep(1)],
            KeyCode::Down if field.is_date() => return vec![Action::FormDateStep(-1)],
            _ => {}
        }

        let input_props = TextInputProps {
            value: props.form.value(field),
            placeholder: placeholder(field),
            is_focused: true,
            style: input_style(),
            on_change: on_change(field),
            on_submit: submit_form,
            on_cursor_move: Some(|_| Action::Render),
        };
        self.input_mut(field)
            .handle_event(event, input_props)
            .into_iter()
            .collect()
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let rows = Layout::vertical([
            Constraint::Length(3), // Fields
            Constraint::Length(1), // Button + notice
        ])
        .split(area);

        let columns = Layout::horizontal([Constraint::Fill(1); 4])
            .spacing(1)
            .split(rows[0]);

        for (field, column) in FormField::ALL.into_iter().zip(columns.iter()) {
            let is_focused = props.focused == Some(field);
            let border = if is_focused {
                Style::default().fg(ACCENT)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            let block = Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(border)
                .title(field.label());
            let inner = block.inner(*column);
            frame.render_widget(block, *column);

            let input_props = TextInputProps {
                value: props.form.value(field),
                placeholder: placeholder(field),
                is_focused,
                style: input_style(),
                on_change: on_change(field),
                on_submit: submit_form,
                on_cursor_move: Some(|_| Action::Render),
            };
            self.input_mut(field).render(frame, inner, input_props);
        }

        let mut spans = vec![Span::styled(
            " Fetch Weather ",
            Style::default()
                .fg(Color::White)
                .bg(Color::Rgb(79, 70, 229))
                .add_modifier(Modifier::BOLD),
        )];
        if props.loading {
            spans.push(Span::raw("  "));
            spans.push(Span::styled(
                "Loading...",
                Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
            ));
        }
        if let Some(notice) = props.notice {
            spans.push(Span::raw("  "));
            spans.push(Span::styled(
                notice.to_string(),
                Style::default().fg(Color::Rgb(250, 204, 21)),
            ));
        }
        frame.render_widget(Paragraph::new(Line::from(spans)), rows[1]);
    }
}
