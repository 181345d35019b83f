use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap};
use ratatui::Frame;

use super::truncate;
use crate::action::InputMode;
use crate::app::App;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(area);

    render_intro(frame, app, chunks[0]);
    render_search(frame, app, chunks[1]);
    render_items(frame, app, chunks[2]);
    render_pagination(frame, app, chunks[3]);
}

fn render_intro(frame: &mut Frame, app: &App, area: Rect) {
    let lines = vec![
        Line::from(vec![
            Span::raw("Repositories of "),
            Span::styled(
                app.account(),
                Style::default().add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(Span::styled(
            "Note: only repositories created in this session can be updated or deleted.",
            Style::default().fg(Color::DarkGray),
        )),
    ];
    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), area);
}

fn render_search(frame: &mut Frame, app: &App, area: Rect) {
    let active = app.input_mode == InputMode::Search;
    let term = app.listing.search_term();

    let mut spans = Vec::new();
    if term.is_empty() && !active {
        spans.push(Span::styled(
            "Search repositories...",
            Style::default().fg(Color::DarkGray),
        ));
    } else {
        spans.push(Span::raw(term));
    }
    if active {
        spans.push(Span::styled("_", Style::default().fg(Color::Yellow)));
    }

    let border = if active {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    let search = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border)
            .title("Search"),
    );
    frame.render_widget(search, area);
}

fn render_items(frame: &mut Frame, app: &App, area: Rect) {
    let listing = &app.listing;
    let mut block = Block::default()
        .borders(Borders::ALL)
        .title(format!("Repositories ({})", listing.items().len()));

    // Items from the last good fetch stay on screen under the error.
    if let Some(err) = listing.last_error() {
        block = block.title_bottom(Line::from(Span::styled(
            format!(" Could not load repositories: {} ", err),
            Style::default().fg(Color::Red),
        )));
    }

    if listing.items().is_empty() {
        let message = if listing.loading() {
            "Loading..."
        } else if listing.last_error().is_some() {
            ""
        } else {
            listing
                .no_results_message()
                .unwrap_or("No repositories found")
        };
        let empty = Paragraph::new(message)
            .block(block)
            .wrap(Wrap { trim: true })
            .style(Style::default().fg(Color::Gray));
        frame.render_widget(empty, area);
        return;
    }

    let w = area.width.saturating_sub(2) as usize;
    let fixed = 38; // name(30) + marker(6) + spaces(2)
    let flex = w.saturating_sub(fixed).max(10);

    let items: Vec<ListItem> = listing
        .items()
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let style = if i == app.selected {
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };

            let marker = if item.is_new {
                Span::styled("[new] ", Style::default().fg(Color::Green))
            } else {
                Span::raw("      ")
            };

            let description = item
                .description()
                .map(|d| truncate(d, flex))
                .unwrap_or_default();

            ListItem::new(Line::from(vec![
                Span::styled(format!("{:<30}", truncate(item.name(), 30)), style),
                Span::raw(" "),
                marker,
                Span::raw(" "),
                Span::styled(description, Style::default().fg(Color::Gray)),
            ]))
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().bg(Color::DarkGray));

    let mut state = ListState::default();
    state.select(Some(app.selected));

    frame.render_stateful_widget(list, area, &mut state);
}

fn render_pagination(frame: &mut Frame, app: &App, area: Rect) {
    let listing = &app.listing;
    let enabled = Style::default().fg(Color::Blue);
    let disabled = Style::default().fg(Color::DarkGray);

    let prev_style = if listing.page() > 1 { enabled } else { disabled };
    let next_label = if listing.has_more() {
        "Next [l] >"
    } else {
        "First [l] >"
    };

    let footer = Paragraph::new(Line::from(vec![
        Span::styled("< [h] Prev", prev_style),
        Span::raw("   "),
        Span::styled(
            format!("Page {}", listing.page()),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw("   "),
        Span::styled(next_label, enabled),
    ]))
    .alignment(ratatui::layout::Alignment::Center);

    frame.render_widget(footer, area);
}
