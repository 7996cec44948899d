//! In-memory scripted device loop (mock mode).
//!
//! Mirrors the serial loop's command/event surface so the registry treats real
//! and mock transports identically.

use flume::{Receiver, Sender};
use std::{
    thread,
    time::{Duration, Instant},
};

use crate::{
    session::SerialSessionConfig,
    sim::MockDeviceScript,
    transport::{TransportCommand, TransportEvent, TransportHandle},
};

pub fn spawn(script: MockDeviceScript, cfg: SerialSessionConfig) -> TransportHandle {
    let (cmd_tx, cmd_rx) = flume::unbounded();
    let (evt_tx, evt_rx) = flume::unbounded();
    thread::spawn(move || run_loop(script, cmd_rx, evt_tx));
    TransportHandle {
        cmd_tx,
        evt_rx,
        current_cfg: cfg,
    }
}

fn run_loop(
    mut script: MockDeviceScript,
    cmd_rx: Receiver<TransportCommand>,
    evt_tx: Sender<TransportEvent>,
) {
    let mut last_telemetry = Instant::now();

    loop {
        while let Ok(cmd) = cmd_rx.try_recv() {
            match cmd {
                TransportCommand::Write(bytes) => {
                    let _ = evt_tx.send(TransportEvent::Sent(bytes.clone().into()));
                    if let Some(reply) = script.respond(&bytes) {
                        let _ = evt_tx.send(TransportEvent::Received(reply.into()));
                    }
                }
                TransportCommand::Reconfigure(new_cfg) => {
                    // Nothing to reopen; acknowledge so the UI settles.
                    let _ = evt_tx.send(TransportEvent::Reconfigured(new_cfg));
                }
                TransportCommand::Stop => {
                    let _ = evt_tx.send(TransportEvent::Stopped);
                    return;
                }
            }
        }

        if let Some(interval) = script.telemetry_interval() {
            if last_telemetry.elapsed() >= interval {
                if let Some(line) = script.next_telemetry() {
                    let _ = evt_tx.send(TransportEvent::Received(line.into()));
                }
                last_telemetry = Instant::now();
            }
        }

        thread::sleep(Duration::from_millis(2));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scripted_reply_round_trip() {
        let script = MockDeviceScript::command_table(vec![(
            b"AT".to_vec(),
            b"OK".to_vec(),
        )]);
        let handle = spawn(script, SerialSessionConfig::default());

        handle.write(b"AT".to_vec()).unwrap();

        let sent = handle
            .evt_rx
            .recv_timeout(Duration::from_secs(1))
            .expect("sent event");
        assert!(matches!(sent, TransportEvent::Sent(ref b) if b.as_ref() == b"AT"));

        let received = handle
            .evt_rx
            .recv_timeout(Duration::from_secs(1))
            .expect("received event");
        assert!(matches!(received, TransportEvent::Received(ref b) if b.as_ref() == b"OK"));

        handle.stop();
    }

    #[test]
    fn reconfigure_is_acknowledged() {
        let handle = spawn(MockDeviceScript::default(), SerialSessionConfig::default());
        let new_cfg = SerialSessionConfig {
            baud: 115200,
            ..Default::default()
        };
        handle.reconfigure(new_cfg).unwrap();

        let evt = handle
            .evt_rx
            .recv_timeout(Duration::from_secs(1))
            .expect("reconfigured event");
        assert!(matches!(evt, TransportEvent::Reconfigured(cfg) if cfg.baud == 115200));
        handle.stop();
    }

    #[test]
    fn stop_terminates_loop() {
        let handle = spawn(MockDeviceScript::default(), SerialSessionConfig::default());
        handle.stop();
        let mut saw_stopped = false;
        for _ in 0..10 {
            if let Ok(TransportEvent::Stopped) = handle.evt_rx.recv_timeout(Duration::from_secs(1))
            {
                saw_stopped = true;
                break;
            }
        }
        assert!(saw_stopped);
    }
}
