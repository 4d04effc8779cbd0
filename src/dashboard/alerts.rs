//! Alert timeline

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
};

use crate::alert::{AlertEvent, AlertKind};
use crate::target::Target;

/// Render the alerts of every target, newest first
pub fn render(frame: &mut Frame, area: Rect, targets: &[Target]) {
    let mut events: Vec<&AlertEvent> = targets.iter().flat_map(Target::alerts).collect();

    if events.is_empty() {
        let message = Paragraph::new("No alerts yet")
            .block(Block::default().borders(Borders::ALL).title("Alerts"))
            .style(Style::default().fg(Color::Gray));

        frame.render_widget(message, area);
        return;
    }

    events.sort_by_key(|event| std::cmp::Reverse(event.timestamp));

    let items: Vec<ListItem> = events
        .iter()
        .map(|event| {
            let color = match event.kind {
                AlertKind::Down => Color::Red,
                AlertKind::Recover => Color::Green,
            };

            ListItem::new(Line::from(vec![
                Span::styled(
                    format!("[{}] ", event.timestamp.format("%H:%M:%S")),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::styled(
                    format!("{:<8}", event.kind.to_string()),
                    Style::default().fg(color).add_modifier(Modifier::BOLD),
                ),
                Span::raw(event.message.as_str()),
            ]))
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!("Alerts ({} total)", events.len())),
    );

    frame.render_widget(list, area);
}
