//! Right panel: the selected session's message log.

use ratatui::{prelude::*, widgets::*};
use unicode_width::UnicodeWidthStr;

use crate::{
    core::status::Status,
    session::MessageDirection,
    tui::app::{App, Focus},
};

pub fn render(f: &mut Frame, area: Rect, app: &App, status: &Status) {
    let mut block = Block::default()
        .title(" log ")
        .borders(Borders::ALL)
        .border_type(BorderType::Plain);
    if app.focus == Focus::Log {
        block = block.style(
            Style::default()
                .fg(Color::Rgb(0, 150, 0))
                .add_modifier(Modifier::BOLD),
        );
    }

    let inner_height = area.height.saturating_sub(2) as usize;
    let inner_width = area.width.saturating_sub(2) as usize;

    let Some(view) = status.sessions.get(app.selected) else {
        f.render_widget(
            Paragraph::new("no session selected").block(block),
            area,
        );
        return;
    };

    let total = view.records.len();
    let offset = if app.auto_scroll {
        total.saturating_sub(inner_height)
    } else {
        app.log_view_offset.min(total.saturating_sub(1))
    };

    let lines: Vec<Line> = view
        .records
        .iter()
        .skip(offset)
        .take(inner_height)
        .map(|record| {
            let (arrow, color) = match record.direction {
                MessageDirection::Rx => ("<-", Color::Cyan),
                MessageDirection::Tx => ("->", Color::Yellow),
            };
            let text = format!(
                "{} {} {} |{}|",
                record.when.format("%H:%M:%S%.3f"),
                arrow,
                record.payload_hex(),
                record.payload_ascii()
            );
            Line::styled(truncate_to_width(&text, inner_width), Style::default().fg(color))
        })
        .collect();

    let title = format!(" log ({total} records) ");
    f.render_widget(Paragraph::new(lines).block(block.title(title)), area);
}

/// Truncate on display-cell width so wide glyphs never overflow the panel.
fn truncate_to_width(text: &str, width: usize) -> String {
    if UnicodeWidthStr::width(text) <= width {
        return text.to_string();
    }
    let mut out = String::new();
    let mut used = 0usize;
    for c in text.chars() {
        let w = UnicodeWidthStr::width(c.to_string().as_str());
        if used + w + 1 > width {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncation_respects_display_width() {
        assert_eq!(truncate_to_width("abc", 10), "abc");
        let truncated = truncate_to_width("abcdefghij", 5);
        assert!(truncated.ends_with('…'));
        assert!(UnicodeWidthStr::width(truncated.as_str()) <= 5);
    }
}
