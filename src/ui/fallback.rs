use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

use crate::app::App;

pub fn render_not_found(frame: &mut Frame, app: &App, area: Rect) {
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "404 - Page Not Found",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(format!("Nothing lives at {}", app.not_found_path)),
        Line::from(""),
        Line::from(Span::styled(
            "[Enter] Go to Home",
            Style::default().fg(Color::Blue),
        )),
    ];
    render_centered(frame, lines, area);
}

pub fn render_fault(frame: &mut Frame, app: &App, area: Rect) {
    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "Something went wrong.",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];
    if let Some(message) = &app.fault {
        lines.push(Line::from(Span::styled(
            message.as_str(),
            Style::default().fg(Color::Gray),
        )));
        lines.push(Line::from(""));
    }
    lines.push(Line::from(Span::styled(
        "[r] Reload",
        Style::default().fg(Color::Blue),
    )));
    render_centered(frame, lines, area);
}

fn render_centered(frame: &mut Frame, lines: Vec<Line>, area: Rect) {
    let paragraph = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}
