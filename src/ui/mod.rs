mod fallback;
mod popup;
mod repo_detail;
mod repo_list;

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::action::InputMode;
use crate::app::{App, Screen};
use crate::modal::Modal;
use crate::route::Route;

pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(frame.area());

    render_header(frame, app, chunks[0]);

    match app.screen {
        Screen::List => repo_list::render(frame, app, chunks[1]),
        Screen::Detail => repo_detail::render(frame, app, chunks[1]),
        Screen::NotFound => fallback::render_not_found(frame, app, chunks[1]),
        Screen::Fault => fallback::render_fault(frame, app, chunks[1]),
    }

    render_status_bar(frame, app, chunks[2]);

    match &app.modal {
        Some(Modal::Create(form)) => popup::render_create(frame, form),
        Some(Modal::Update(form)) => popup::render_update(frame, form),
        Some(Modal::Delete(confirm)) => popup::render_confirm(
            frame,
            "Delete Repository",
            &format!(
                "Are you sure you want to delete the repository {}?",
                confirm.name
            ),
            confirm.submitting,
        ),
        None => {}
    }
}

/// Shorten to at most `max` characters, ending in "..." when cut.
pub(crate) fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let kept: String = text.chars().take(max.saturating_sub(3)).collect();
    format!("{}...", kept)
}

fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let title = match app.screen {
        Screen::List => format!("folio - {} - Repositories", app.account()),
        Screen::Detail => match &app.detail {
            Some(view) => format!(
                "folio - {} {}",
                app.account(),
                Route::Detail(view.name.clone())
            ),
            None => "folio - Repository".to_string(),
        },
        Screen::NotFound => "folio - Page Not Found".to_string(),
        Screen::Fault => "folio - Error".to_string(),
    };

    let header = Paragraph::new(Line::from(vec![Span::styled(
        title,
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    )]))
    .style(Style::default().bg(Color::DarkGray));

    frame.render_widget(header, area);
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let loading = match app.screen {
        Screen::List => app.listing.loading(),
        Screen::Detail => app.detail.as_ref().is_some_and(|v| v.loading),
        Screen::NotFound | Screen::Fault => false,
    };

    let status = if app.input_mode == InputMode::Command {
        Line::from(vec![
            Span::styled(":", Style::default().fg(Color::Yellow)),
            Span::raw(app.command_input.as_str()),
            Span::styled("_", Style::default().fg(Color::Yellow)),
        ])
    } else if let Some(notice) = &app.notice {
        let color = if notice.is_error {
            Color::Red
        } else {
            Color::Green
        };
        Line::from(vec![Span::styled(
            notice.message.as_str(),
            Style::default().fg(color),
        )])
    } else if loading {
        Line::from(vec![Span::styled(
            "Loading...",
            Style::default().fg(Color::Yellow),
        )])
    } else {
        let help = match app.screen {
            Screen::List => {
                "/: search | h/l: page | j/k: nav | Enter: open | c: create | o: profile | !: test error | :: go to | q: quit"
            }
            Screen::Detail => {
                if app.detail.as_ref().is_some_and(|v| v.can_mutate()) {
                    "u: update | d: delete | o: browser | y: copy url | r: refresh | q: back"
                } else {
                    "o: browser | y: copy url | r: refresh | :: go to | q: back"
                }
            }
            Screen::NotFound => "Enter: go to home | :: go to | q: back",
            Screen::Fault => "r: reload | q: quit",
        };
        Line::from(vec![Span::styled(help, Style::default().fg(Color::Gray))])
    };

    let status_bar = Paragraph::new(status).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(status_bar, area);
}
