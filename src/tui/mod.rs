pub mod app;
pub mod input;
pub mod ui;

use anyhow::Result;
use clap::ArgMatches;
use parking_lot::RwLock;
use ratatui::{backend::CrosstermBackend, prelude::*};
use std::io::{self, Stdout};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crate::{
    core::{
        bus::{Bus, CoreToUi, UiToCore},
        persistence,
        runtime::{run_core_thread, CoreRuntimeConfig},
        status::{self, Status},
    },
    session::{SessionMode, SessionRegistry},
};
use app::App;

pub fn start(matches: &ArgMatches) -> Result<()> {
    log::info!("[TUI] obsdeck TUI starting...");

    let (mode, saved_configs) = persistence::load_panel_config()?;
    let mode = if matches.get_flag("mock") {
        SessionMode::Mock
    } else {
        mode
    };

    let mut registry = SessionRegistry::new(mode);
    registry.scan();
    for (id, config) in &saved_configs {
        // Sessions that are not present right now keep their saved config for
        // the next scan that finds them.
        let _ = registry.set_config(id, config.clone());
    }

    let status = Arc::new(RwLock::new(Status::default()));
    status::init_status(Arc::clone(&status))?;

    let (ui_tx, ui_rx) = flume::unbounded::<UiToCore>();
    let (core_tx, core_rx) = flume::unbounded::<CoreToUi>();
    let bus = Bus::new(core_rx, ui_tx);

    let status_clone = Arc::clone(&status);
    let core_handle = thread::spawn(move || {
        run_core_thread(
            ui_rx,
            core_tx,
            status_clone,
            CoreRuntimeConfig::default(),
            registry,
        )
    });

    // Setup terminal
    let mut stdout = io::stdout();
    crossterm::terminal::enable_raw_mode()?;
    crossterm::execute!(stdout, crossterm::terminal::EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(&mut stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, &bus);

    // Restore terminal
    let mut stdout = io::stdout();
    crossterm::execute!(stdout, crossterm::terminal::LeaveAlternateScreen)?;
    crossterm::terminal::disable_raw_mode()?;

    shutdown_core(&bus, core_handle)?;

    // Persist what the user ended up with.
    let configs = status
        .read()
        .sessions
        .iter()
        .map(|v| (v.id.clone(), v.config.clone()))
        .collect();
    let final_mode = if status.read().mock_mode {
        SessionMode::Mock
    } else {
        SessionMode::Hardware
    };
    persistence::save_panel_config(final_mode, &configs)?;

    res
}

/// Stop the core thread and wait for it. The quit message is sent here
/// unconditionally: when `run_app` bails out on a draw or input error the
/// core never saw a quit request, and joining without one would hang.
fn shutdown_core(bus: &Bus, handle: thread::JoinHandle<Result<()>>) -> Result<()> {
    let _ = bus.ui_tx.send(UiToCore::Quit);
    match handle.join() {
        Ok(result) => result,
        Err(_) => {
            log::error!("[TUI] core thread panicked");
            Ok(())
        }
    }
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<&mut Stdout>>, bus: &Bus) -> Result<()> {
    let mut app = App::default();

    loop {
        terminal.draw(|f| ui::render_ui(f, &app))?;

        // Poll for input
        if crossterm::event::poll(Duration::from_millis(100))? {
            let evt = match crossterm::event::read() {
                Ok(e) => e,
                Err(e) => {
                    log::error!("[TUI] input read error: {e}");
                    continue;
                }
            };

            if let crossterm::event::Event::Key(key) = evt {
                // Only handle the initial key press event so a single physical
                // key press maps to a single action.
                if key.kind != crossterm::event::KeyEventKind::Press {
                    continue;
                }
                input::handle_key(key, &mut app, bus)?;
            }
        }

        // Drain wakeups from the core thread.
        while let Ok(msg) = bus.core_rx.try_recv() {
            match msg {
                CoreToUi::Quit => return Ok(()),
                CoreToUi::Tick | CoreToUi::Refreshed | CoreToUi::Error => {}
            }
        }

        if app.quit_requested {
            bus.ui_tx.send(UiToCore::Quit)?;
            // Wait for the core to acknowledge so transports are torn down.
            loop {
                match bus.core_rx.recv_timeout(Duration::from_secs(5)) {
                    Ok(CoreToUi::Quit) | Err(_) => return Ok(()),
                    Ok(_) => {}
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shutdown_stops_core_without_prior_quit() {
        let (ui_tx, ui_rx) = flume::unbounded();
        let (core_tx, core_rx) = flume::unbounded();
        let bus = Bus::new(core_rx, ui_tx);

        let status = Arc::new(RwLock::new(Status::default()));
        let handle = thread::spawn(move || {
            run_core_thread(
                ui_rx,
                core_tx,
                status,
                CoreRuntimeConfig::default(),
                SessionRegistry::new(SessionMode::Mock),
            )
        });

        // The UI loop never ran, so no quit was requested yet.
        shutdown_core(&bus, handle).unwrap();
    }
}
