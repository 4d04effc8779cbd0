//! Main dashboard layout

use chrono::Local;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use crate::alert::AlertState;
use crate::target::Target;

use super::{alerts, targets};

/// Render the whole dashboard
pub fn render(frame: &mut Frame, targets: &[Target]) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),  // Header
            Constraint::Min(0),     // Targets
            Constraint::Length(10), // Alerts
            Constraint::Length(3),  // Footer
        ])
        .split(frame.area());

    render_header(frame, chunks[0], targets);
    targets::render(frame, chunks[1], targets);
    alerts::render(frame, chunks[2], targets);
    render_footer(frame, chunks[3]);
}

fn render_header(frame: &mut Frame, area: Rect, targets: &[Target]) {
    let down = targets
        .iter()
        .filter(|target| target.alert_state() == AlertState::Down)
        .count();

    let mut text = vec![
        Span::styled(
            "Web Monitor",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!(" | {} websites", targets.len())),
    ];

    if down > 0 {
        text.push(Span::raw(" | "));
        text.push(Span::styled(
            format!("{down} down"),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ));
    }

    let header = Paragraph::new(Line::from(text)).block(Block::default().borders(Borders::ALL));
    frame.render_widget(header, area);
}

fn render_footer(frame: &mut Frame, area: Rect) {
    let footer = Paragraph::new(Line::from(vec![
        Span::raw("Updated: "),
        Span::styled(
            Local::now().format("%H:%M:%S").to_string(),
            Style::default().fg(Color::Cyan),
        ),
        Span::raw(" | Quit: "),
        Span::styled("Ctrl-C", Style::default().fg(Color::Yellow)),
    ]))
    .block(Block::default().borders(Borders::ALL));

    frame.render_widget(footer, area);
}
