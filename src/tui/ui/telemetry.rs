//! Bottom-right panel: simulator telemetry snapshots.

use ratatui::{prelude::*, widgets::*};

use crate::core::status::Status;

pub fn render(f: &mut Frame, area: Rect, status: &Status) {
    let block = Block::default()
        .title(" telemetry ")
        .borders(Borders::ALL)
        .border_type(BorderType::Plain);

    if !status.mock_mode {
        f.render_widget(
            Paragraph::new("hardware mode: telemetry comes from the device bridge").block(block),
            area,
        );
        return;
    }

    let lines: Vec<Line> = status
        .telemetry
        .iter()
        .map(|(name, snapshot)| {
            Line::from(vec![
                Span::styled(
                    format!(" {name:<13}"),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
                Span::raw(snapshot.clone()),
            ])
        })
        .collect();

    f.render_widget(Paragraph::new(lines).block(block), area);
}
