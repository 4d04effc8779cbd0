//! Per-target metric tables

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Row, Table},
};

use crate::alert::AlertState;
use crate::metrics::Metric;
use crate::target::Target;

pub fn render(frame: &mut Frame, area: Rect, targets: &[Target]) {
    if targets.is_empty() {
        let message = Paragraph::new("No website configured")
            .block(Block::default().borders(Borders::ALL).title("Websites"))
            .style(Style::default().fg(Color::Gray));

        frame.render_widget(message, area);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            targets
                .iter()
                .map(|_| Constraint::Ratio(1, targets.len() as u32)),
        )
        .split(area);

    for (target, chunk) in targets.iter().zip(chunks.iter()) {
        render_target(frame, *chunk, target);
    }
}

fn render_target(frame: &mut Frame, area: Rect, target: &Target) {
    let header = Row::new(std::iter::once("Timeframe").chain(Metric::all_columns()))
        .style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        );

    let rows: Vec<Row> = target
        .snapshots()
        .map(|(timeframe, snapshot)| {
            let values = match snapshot {
                Some(snapshot) => Metric::all_values(snapshot),
                None => Metric::all_columns().map(|_| "-".to_string()).collect(),
            };
            Row::new(std::iter::once(timeframe.label.clone()).chain(values))
        })
        .collect();

    let widths: Vec<Constraint> = std::iter::once(10)
        .chain(Metric::all_columns().map(|column| column.len() as u16 + 2))
        .map(Constraint::Length)
        .collect();

    let (status, color) = match target.alert_state() {
        AlertState::Recovered => ("up", Color::Green),
        AlertState::Down => ("down", Color::Red),
    };

    let title = Line::from(vec![
        Span::styled(format!("● {status} "), Style::default().fg(color)),
        Span::styled(
            target.url().to_string(),
            Style::default().fg(Color::Cyan),
        ),
        Span::raw(format!(" (every {}s)", target.interval().as_secs())),
    ]);

    let table = Table::new(rows, widths)
        .header(header)
        .block(Block::default().borders(Borders::ALL).title(title));

    frame.render_widget(table, area);
}
