use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

use crate::modal::{CreateField, CreateForm, UpdateForm};

/// Render a centered confirmation popup: [y]es / [n]o
pub fn render_confirm(frame: &mut Frame, title: &str, message: &str, submitting: bool) {
    let area = centered_rect(60, 8, frame.area());
    frame.render_widget(Clear, area);

    let answer = if submitting {
        Line::from(Span::styled("Deleting...", Style::default().fg(Color::Yellow)))
    } else {
        Line::from(vec![
            Span::styled("[y]", Style::default().fg(Color::Green)),
            Span::raw("es  "),
            Span::styled("[n]", Style::default().fg(Color::Red)),
            Span::raw("o"),
        ])
    };

    let lines = vec![
        Line::from(""),
        Line::from(Span::raw(message)),
        Line::from(""),
        answer,
    ];

    let popup = Paragraph::new(lines)
        .block(titled_block(title))
        .wrap(Wrap { trim: true })
        .alignment(ratatui::layout::Alignment::Center);

    frame.render_widget(popup, area);
}

pub fn render_create(frame: &mut Frame, form: &CreateForm) {
    let fields = [
        ("Repository Name", form.name.as_str(), form.focus == CreateField::Name),
        (
            "Description",
            form.description.as_str(),
            form.focus == CreateField::Description,
        ),
    ];
    let action = if form.submitting { "Creating..." } else { "Create" };
    render_form(
        frame,
        "Create New Repository",
        None,
        &fields,
        form.error.as_deref(),
        action,
    );
}

pub fn render_update(frame: &mut Frame, form: &UpdateForm) {
    let fields = [("Description", form.description.as_str(), true)];
    let action = if form.submitting {
        "Saving..."
    } else {
        "Save Changes"
    };
    let name = format!("Name: {}", form.name);
    render_form(
        frame,
        "Update Repository",
        Some(&name),
        &fields,
        form.error.as_deref(),
        action,
    );
}

/// A popup with labelled single-line inputs; the focused one gets a cursor.
fn render_form(
    frame: &mut Frame,
    title: &str,
    subtitle: Option<&str>,
    fields: &[(&str, &str, bool)],
    error: Option<&str>,
    action: &str,
) {
    let height = (fields.len() * 2 + 7) as u16;
    let area = centered_rect(60, height, frame.area());
    frame.render_widget(Clear, area);

    let mut lines = Vec::new();
    if let Some(msg) = error {
        lines.push(Line::from(Span::styled(msg, Style::default().fg(Color::Red))));
    }
    if let Some(subtitle) = subtitle {
        lines.push(Line::from(subtitle));
    }
    for (label, value, focused) in fields {
        let label_style = if *focused {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };
        lines.push(Line::from(Span::styled(format!("{}:", label), label_style)));
        let mut input = vec![Span::raw("> "), Span::raw(*value)];
        if *focused {
            input.push(Span::styled("_", Style::default().fg(Color::Yellow)));
        }
        lines.push(Line::from(input));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled(
            format!("[Enter] {}", action),
            Style::default().fg(Color::Blue),
        ),
        Span::raw("  "),
        Span::styled("[Tab] next field  [Esc] cancel", Style::default().fg(Color::Gray)),
    ]));

    let popup = Paragraph::new(lines).block(titled_block(title));
    frame.render_widget(popup, area);
}

fn titled_block(title: &str) -> Block<'_> {
    Block::default().borders(Borders::ALL).title(Span::styled(
        format!(" {} ", title),
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    ))
}

/// Create a centered rect of the given size inside the outer rect
fn centered_rect(width: u16, height: u16, outer: Rect) -> Rect {
    let popup_width = width.min(outer.width);
    let popup_height = height.min(outer.height);

    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length((outer.height.saturating_sub(popup_height)) / 2),
            Constraint::Length(popup_height),
            Constraint::Min(0),
        ])
        .split(outer);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length((outer.width.saturating_sub(popup_width)) / 2),
            Constraint::Length(popup_width),
            Constraint::Min(0),
        ])
        .split(vertical[1]);

    horizontal[1]
}
