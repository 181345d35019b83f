use chrono::{DateTime, Utc};
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

use crate::app::App;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let Some(view) = &app.detail else {
        return;
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" {} ", view.name));

    let Some(repo) = &view.detail else {
        let message = if view.loading {
            "Loading..."
        } else {
            "Repository details are unavailable."
        };
        let placeholder = Paragraph::new(message)
            .block(block)
            .style(Style::default().fg(Color::Gray));
        frame.render_widget(placeholder, area);
        return;
    };

    let label = Style::default().fg(Color::Cyan);
    let field = |name: &str, value: String| {
        Line::from(vec![
            Span::styled(format!("{}: ", name), label),
            Span::raw(value),
        ])
    };

    let mut lines = vec![
        Line::from(Span::styled(
            repo.name.clone(),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(
            repo.description
                .clone()
                .unwrap_or_else(|| "No description available.".to_string()),
        ),
        Line::from(""),
        field("Owner", repo.owner_login().to_string()),
        field("Stars", repo.stars.to_string()),
        field("Forks", repo.forks.to_string()),
        field("Open issues", repo.open_issues.to_string()),
        field(
            "Language",
            repo.language.clone().unwrap_or_else(|| "N/A".to_string()),
        ),
        field("Created", date(repo.created_at)),
        field("Last updated", date(repo.pushed_at)),
        field("URL", repo.html_url.clone()),
    ];

    if view.can_mutate() {
        lines.push(Line::from(""));
        lines.push(Line::from(vec![
            Span::styled("[u] Update Repository", Style::default().fg(Color::Blue)),
            Span::raw("  "),
            Span::styled("[d] Delete Repository", Style::default().fg(Color::Red)),
        ]));
    }

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false })
        .scroll((view.scroll_offset as u16, 0));

    frame.render_widget(paragraph, area);
}

fn date(value: Option<DateTime<Utc>>) -> String {
    value
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "N/A".to_string())
}
