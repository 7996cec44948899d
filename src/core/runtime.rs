//! Core worker thread.
//!
//! Owns the session registry and the simulator bench, processes UI messages,
//! pumps transport events into session logs, and publishes status snapshots
//! for the frontends. All session mutation happens here; frontends only read
//! snapshots and talk back over the bus.

use anyhow::{anyhow, Result};
use chrono::Local;
use parking_lot::RwLock;
use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use crate::{
    core::{
        bus::{self, CoreToUi, UiToCore},
        status::{SessionView, Status},
    },
    session::{SessionMode, SessionRegistry},
    sim::SimulatorBench,
};

/// Configuration for the core runtime.
pub struct CoreRuntimeConfig {
    /// Interval between automatic port scans.
    pub scan_interval: Duration,
    /// Interval between simulator ticks.
    pub sim_tick_interval: Duration,
    /// Main loop sleep; bounds UI message latency.
    pub loop_interval: Duration,
}

impl Default for CoreRuntimeConfig {
    fn default() -> Self {
        Self {
            scan_interval: Duration::from_secs(30),
            sim_tick_interval: Duration::from_secs(1),
            loop_interval: Duration::from_millis(50),
        }
    }
}

/// Run the core thread until a `Quit` message arrives.
///
/// `status` is the same handle registered as the global status; it is passed
/// explicitly so the loop (and its tests) never depend on process-global state.
pub fn run_core_thread(
    ui_rx: flume::Receiver<UiToCore>,
    core_tx: flume::Sender<CoreToUi>,
    status: Arc<RwLock<Status>>,
    config: CoreRuntimeConfig,
    mut registry: SessionRegistry,
) -> Result<()> {
    let mut bench = SimulatorBench::default();
    let mut last_scan = Instant::now() - config.scan_interval;
    let mut last_sim_tick = Instant::now();

    registry.scan();
    publish_status(&status, &registry, &bench);

    loop {
        while let Ok(msg) = ui_rx.try_recv() {
            match msg {
                UiToCore::Quit => {
                    log::info!("Received quit signal");
                    registry.disconnect_all();
                    publish_status(&status, &registry, &bench);
                    core_tx
                        .send(CoreToUi::Quit)
                        .map_err(|err| anyhow!("Failed to send Quit to UI: {err}"))?;
                    return Ok(());
                }
                UiToCore::Refresh => {
                    bus::mark_refresh_complete();
                    publish_status(&status, &registry, &bench);
                    core_tx
                        .send(CoreToUi::Refreshed)
                        .map_err(|err| anyhow!("Failed to send Refreshed: {err}"))?;
                }
                UiToCore::RescanPorts => {
                    registry.scan();
                    last_scan = Instant::now();
                    status.write().last_scan = Some(Local::now());
                    publish_status(&status, &registry, &bench);
                    core_tx
                        .send(CoreToUi::Refreshed)
                        .map_err(|err| anyhow!("Failed to send Refreshed: {err}"))?;
                }
                UiToCore::Connect(id) => {
                    apply(&status, &core_tx, registry.connect(&id))?;
                    publish_status(&status, &registry, &bench);
                }
                UiToCore::Disconnect(id) => {
                    apply(&status, &core_tx, registry.disconnect(&id))?;
                    publish_status(&status, &registry, &bench);
                }
                UiToCore::Send { id, payload } => {
                    apply(&status, &core_tx, registry.send(&id, &payload))?;
                    publish_status(&status, &registry, &bench);
                }
                UiToCore::ClearLog(id) => {
                    apply(&status, &core_tx, registry.clear(&id))?;
                    publish_status(&status, &registry, &bench);
                }
                UiToCore::ToggleMockMode => {
                    let next = match registry.mode() {
                        SessionMode::Hardware => SessionMode::Mock,
                        SessionMode::Mock => SessionMode::Hardware,
                    };
                    let result = registry.set_mode(next).map(|()| registry.scan());
                    apply(&status, &core_tx, result)?;
                    publish_status(&status, &registry, &bench);
                }
                UiToCore::StartExposure { seconds } => {
                    bench.camera.start_exposure(seconds);
                    publish_status(&status, &registry, &bench);
                }
                UiToCore::SlewTo {
                    ra_hours,
                    dec_degrees,
                } => {
                    bench.telescope.slew_to(ra_hours, dec_degrees);
                    publish_status(&status, &registry, &bench);
                }
            }
        }

        // Inbound frames and transport failures.
        let errors = registry.pump_events();
        if !errors.is_empty() {
            let mut guard = status.write();
            for message in &errors {
                log::warn!("Transport error: {message}");
                guard.set_error(message.clone());
            }
            drop(guard);
            core_tx
                .send(CoreToUi::Error)
                .map_err(|err| anyhow!("Failed to send Error to UI: {err}"))?;
        }

        if last_sim_tick.elapsed() >= config.sim_tick_interval {
            if registry.mode() == SessionMode::Mock {
                bench.tick(Local::now());
            }
            last_sim_tick = Instant::now();
            publish_status(&status, &registry, &bench);
            core_tx
                .send(CoreToUi::Tick)
                .map_err(|err| anyhow!("Failed to send Tick: {err}"))?;
        } else if !errors.is_empty() {
            publish_status(&status, &registry, &bench);
        }

        if last_scan.elapsed() >= config.scan_interval {
            registry.scan();
            last_scan = Instant::now();
            status.write().last_scan = Some(Local::now());
            publish_status(&status, &registry, &bench);
        }

        std::thread::sleep(config.loop_interval);
    }
}

/// Record an operation failure as a transient notification; the operation has
/// already left state unchanged.
fn apply(
    status: &Arc<RwLock<Status>>,
    core_tx: &flume::Sender<CoreToUi>,
    result: Result<()>,
) -> Result<()> {
    if let Err(err) = result {
        log::warn!("Operation failed: {err:#}");
        status.write().set_error(format!("{err:#}"));
        core_tx
            .send(CoreToUi::Error)
            .map_err(|err| anyhow!("Failed to send Error to UI: {err}"))?;
    } else {
        core_tx
            .send(CoreToUi::Refreshed)
            .map_err(|err| anyhow!("Failed to send Refreshed to UI: {err}"))?;
    }
    Ok(())
}

fn publish_status(
    status: &Arc<RwLock<Status>>,
    registry: &SessionRegistry,
    bench: &SimulatorBench,
) {
    let sessions: Vec<SessionView> = registry
        .sessions()
        .map(|s| SessionView {
            id: s.id.clone(),
            display_name: s.display_name.clone(),
            connected: s.connected,
            config: s.config.clone(),
            records: s.log.records().to_vec(),
            rx_count: s.rx_count,
            tx_count: s.tx_count,
        })
        .collect();

    let mut guard = status.write();
    guard.sessions = sessions;
    guard.telemetry = bench.snapshots();
    guard.mock_mode = registry.mode() == SessionMode::Mock;
}
