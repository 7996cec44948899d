//! Left panel: the session list with connection indicators.

use ratatui::{prelude::*, widgets::*};

use crate::{
    core::status::Status,
    tui::app::{App, Focus},
};

pub fn render(f: &mut Frame, area: Rect, app: &App, status: &Status) {
    let items: Vec<ListItem> = status
        .sessions
        .iter()
        .map(|v| {
            let marker = if v.connected { "●" } else { "×" };
            let style = if v.connected {
                Style::default().fg(Color::Green)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            ListItem::new(Line::from(vec![
                Span::styled(format!(" {marker} "), style),
                Span::raw(v.display_name.clone()),
                Span::styled(
                    format!("  rx {} tx {}", v.rx_count, v.tx_count),
                    Style::default().fg(Color::DarkGray),
                ),
            ]))
        })
        .collect();

    let mut block = Block::default()
        .title(" sessions ")
        .borders(Borders::ALL)
        .border_type(BorderType::Plain);
    if app.focus == Focus::Sessions {
        block = block.style(
            Style::default()
                .fg(Color::Rgb(0, 150, 0))
                .add_modifier(Modifier::BOLD),
        );
    }

    let list = List::new(items).block(block).highlight_style(
        Style::default()
            .bg(Color::Rgb(0, 100, 0))
            .fg(Color::White)
            .add_modifier(Modifier::BOLD),
    );

    let mut state = ListState::default();
    if !status.sessions.is_empty() {
        state.select(Some(app.selected.min(status.sessions.len() - 1)));
    }
    f.render_stateful_widget(list, area, &mut state);
}
