pub mod logs;
pub mod sessions;
pub mod telemetry;

use ratatui::{prelude::*, widgets::*};

use crate::{
    core::status::{read_status, Status},
    tui::app::{App, Focus},
};

pub fn render_ui(f: &mut Frame, app: &App) {
    let status = match read_status(|status| Ok(status.clone())) {
        Ok(status) => status,
        Err(err) => {
            log::error!("[TUI] failed to read status: {err:#}");
            return;
        }
    };

    let area = f.area();
    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // title
            Constraint::Min(0),
            Constraint::Length(3), // input line
            Constraint::Length(1), // bottom help
        ])
        .split(area);

    render_title(f, main_chunks[0], &status);

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(35), Constraint::Percentage(65)])
        .split(main_chunks[1]);

    sessions::render(f, chunks[0], app, &status);

    let right_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(6)])
        .split(chunks[1]);

    logs::render(f, right_chunks[0], app, &status);
    telemetry::render(f, right_chunks[1], &status);

    render_input_line(f, main_chunks[2], app);
    render_bottom(f, main_chunks[3], &status);
}

fn render_title(f: &mut Frame, area: Rect, status: &Status) {
    let mode = if status.mock_mode { "MOCK" } else { "HW" };
    let title = Paragraph::new(format!(" obsdeck equipment panel [{mode}]"))
        .style(
            Style::default()
                .fg(Color::Rgb(0, 150, 0))
                .add_modifier(Modifier::BOLD),
        )
        .block(Block::default().borders(Borders::NONE));
    f.render_widget(title, area);
}

fn render_input_line(f: &mut Frame, area: Rect, app: &App) {
    let mut block = Block::default().title(" send ").borders(Borders::ALL);
    if app.focus == Focus::Input {
        block = block.style(
            Style::default()
                .fg(Color::Rgb(0, 150, 0))
                .add_modifier(Modifier::BOLD),
        );
    }
    let text = if app.focus == Focus::Input {
        format!("{}_", app.input_buffer)
    } else {
        "press i to type, Enter to send (0x prefix for hex)".to_string()
    };
    f.render_widget(Paragraph::new(text).block(block), area);
}

fn render_bottom(f: &mut Frame, area: Rect, status: &Status) {
    // A transient error wins over the help line until the next one replaces it.
    let line = if let Some(err) = &status.error {
        Line::styled(
            format!(" {} {}", err.timestamp.format("%H:%M:%S"), err.message),
            Style::default().fg(Color::Red),
        )
    } else {
        Line::raw(" q quit  r rescan  c connect/disconnect  x clear  i send  e expose  m mock  Tab focus")
    };
    f.render_widget(Paragraph::new(line), area);
}
