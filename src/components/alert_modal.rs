use crossterm::event::KeyCode;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Flex, Layout, Rect},
    style::{Color, Style, Stylize},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
};
use tui_dispatch::EventKind;
use tui_dispatch_components::{
    BaseStyle, Modal, ModalBehavior, ModalProps, ModalStyle, Padding, centered_rect,
};

use super::Component;
use crate::action::Action;

pub const ERROR_ICON: &str = "\u{26a0}\u{fe0f}";

/// Modal failure notice; blocks the dashboard until dismissed
pub struct AlertModal {
    modal: Modal,
}

pub struct AlertModalProps<'a> {
    pub message: &'a str,
    pub is_focused: bool,
}

impl Default for AlertModal {
    fn default() -> Self {
        Self {
            modal: Modal::new(),
        }
    }
}

impl AlertModal {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Component<Action> for AlertModal {
    type Props<'a> = AlertModalProps<'a>;

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = Action> {
        if !props.is_focused {
            return None;
        }

        match event {
            EventKind::Key(key) => match key.code {
                KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ') => Some(Action::AlertDismiss),
                _ => None,
            },
            _ => None,
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        if area.width < 20 || area.height < 8 {
            return;
        }

        let modal_area = centered_rect(50, 9, area);
        let message = props.message;
        let mut render_content = |frame: &mut Frame, content_area: Rect| {
            let chunks = Layout::vertical([
                Constraint::Length(1), // icon + title
                Constraint::Length(1), // blank
                Constraint::Min(1),    // message
                Constraint::Length(1), // hint
            ])
            .flex(Flex::Center)
            .split(content_area);

            frame.render_widget(
                Paragraph::new(Line::from(vec![
                    Span::raw(ERROR_ICON),
                    Span::raw(" "),
                    Span::styled("Error", Style::default().fg(Color::Red).bold()),
                ]))
                .alignment(Alignment::Center),
                chunks[0],
            );
            frame.render_widget(
                Paragraph::new(message)
                    .style(Style::default().fg(Color::Rgb(230, 200, 200)))
                    .alignment(Alignment::Center)
                    .wrap(Wrap { trim: true }),
                chunks[2],
            );
            frame.render_widget(
                Paragraph::new(Line::from(vec![
                    Span::styled("Press ", Style::default().fg(Color::DarkGray)),
                    Span::styled("Enter", Style::default().fg(Color::Cyan).bold()),
                    Span::styled(" to dismiss", Style::default().fg(Color::DarkGray)),
                ]))
                .alignment(Alignment::Center),
                chunks[3],
            );
        };

        self.modal.render(
            frame,
            area,
            ModalProps {
                is_open: true,
                is_focused: props.is_focused,
                area: modal_area,
                style: ModalStyle {
                    base: BaseStyle {
                        bg: Some(Color::Rgb(45, 30, 35)),
                        padding: Padding::all(1),
                        border: None,
                        fg: None,
                    },
                    ..Default::default()
                },
                behavior: ModalBehavior::default(),
                on_close: || Action::AlertDismiss,
                render_content: &mut render_content,
            },
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::FAILURE_MESSAGE;
    use tui_dispatch::testing::*;

    #[test]
    fn test_enter_dismisses() {
        let mut component = AlertModal::new();
        let props = AlertModalProps {
            message: FAILURE_MESSAGE,
            is_focused: true,
        };

        let actions: Vec<_> = component
            .handle_event(&EventKind::Key(key("enter")), props)
            .into_iter()
            .collect();
        actions.assert_count(1);
        actions.assert_first(Action::AlertDismiss);
    }

    #[test]
    fn test_other_keys_are_swallowed() {
        let mut component = AlertModal::new();
        let props = AlertModalProps {
            message: FAILURE_MESSAGE,
            is_focused: true,
        };

        let actions: Vec<_> = component
            .handle_event(&EventKind::Key(key("r")), props)
            .into_iter()
            .collect();
        actions.assert_empty();
    }

    #[test]
    fn test_render_message() {
        let mut render = RenderHarness::new(100, 30);
        let mut component = AlertModal::new();

        let output = render.render_to_string_plain(|frame| {
            let props = AlertModalProps {
                message: FAILURE_MESSAGE,
                is_focused: true,
            };
            component.render(frame, frame.area(), props);
        });

        assert!(output.contains("Failed to fetch weather data"));
        assert!(output.contains("dismiss"));
    }
}
