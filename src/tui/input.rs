//! Key handling: maps key presses to app mutations and bus messages.

use anyhow::{anyhow, Result};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::{
    cli::actions::parse_payload,
    core::{
        bus::{Bus, UiToCore},
        status::read_status,
    },
    tui::app::{App, Focus},
};

pub fn handle_key(key: KeyEvent, app: &mut App, bus: &Bus) -> Result<()> {
    // Ctrl-C always quits, regardless of focus.
    if key.modifiers.contains(KeyModifiers::CONTROL) && matches!(key.code, KeyCode::Char('c')) {
        app.quit_requested = true;
        return Ok(());
    }

    if app.focus == Focus::Input {
        return handle_input_line(key, app, bus);
    }

    let (session_count, selected_id) = read_status(|status| {
        Ok((
            status.sessions.len(),
            status.sessions.get(app.selected).map(|v| v.id.clone()),
        ))
    })?;
    app.clamp_selection(session_count);

    match key.code {
        KeyCode::Char('q') => app.quit_requested = true,
        KeyCode::Char('r') => send(bus, UiToCore::RescanPorts)?,
        KeyCode::Char('m') => send(bus, UiToCore::ToggleMockMode)?,
        KeyCode::Char('c') => {
            if let Some(id) = selected_id {
                let connected = read_status(|status| {
                    Ok(status
                        .sessions
                        .iter()
                        .any(|v| v.id == id && v.connected))
                })?;
                if connected {
                    send(bus, UiToCore::Disconnect(id))?;
                } else {
                    send(bus, UiToCore::Connect(id))?;
                }
            }
        }
        KeyCode::Char('x') => {
            if let Some(id) = selected_id {
                send(bus, UiToCore::ClearLog(id))?;
            }
        }
        KeyCode::Char('e') => send(bus, UiToCore::StartExposure { seconds: 5.0 })?,
        KeyCode::Char('i') => app.focus = Focus::Input,
        KeyCode::Char('a') => app.auto_scroll = !app.auto_scroll,
        KeyCode::Tab => {
            app.focus = match app.focus {
                Focus::Sessions => Focus::Log,
                Focus::Log => Focus::Sessions,
                Focus::Input => Focus::Sessions,
            };
        }
        KeyCode::Up => match app.focus {
            Focus::Sessions => app.select_previous(),
            Focus::Log => {
                app.auto_scroll = false;
                app.log_view_offset = app.log_view_offset.saturating_sub(1);
            }
            Focus::Input => {}
        },
        KeyCode::Down => match app.focus {
            Focus::Sessions => app.select_next(session_count),
            Focus::Log => app.log_view_offset += 1,
            Focus::Input => {}
        },
        _ => {}
    }

    Ok(())
}

fn handle_input_line(key: KeyEvent, app: &mut App, bus: &Bus) -> Result<()> {
    match key.code {
        KeyCode::Esc => {
            app.input_buffer.clear();
            app.focus = Focus::Sessions;
        }
        KeyCode::Enter => {
            let raw = app.input_buffer.trim().to_string();
            app.input_buffer.clear();
            app.focus = Focus::Sessions;
            if raw.is_empty() {
                return Ok(());
            }
            let id = read_status(|status| {
                Ok(status.sessions.get(app.selected).map(|v| v.id.clone()))
            })?;
            if let Some(id) = id {
                match parse_payload(&raw) {
                    Ok(payload) => send(bus, UiToCore::Send { id, payload })?,
                    Err(err) => log::warn!("Bad payload: {err:#}"),
                }
            }
        }
        KeyCode::Backspace => {
            app.input_buffer.pop();
        }
        KeyCode::Char(c) => {
            app.input_buffer.push(c);
        }
        _ => {}
    }
    Ok(())
}

fn send(bus: &Bus, msg: UiToCore) -> Result<()> {
    bus.ui_tx.send(msg).map_err(|err| anyhow!(err))
}
