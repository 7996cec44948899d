//! Serial port I/O loop.
//!
//! Reads are assembled into frames using an inter-byte gap derived from the
//! line configuration; writes are flushed synchronously. The loop runs on its
//! own thread and must never be started on the UI thread.

use anyhow::Result;
use flume::{Receiver, Sender};
use std::{
    io::{Read, Write},
    sync::{Arc, Mutex},
    thread,
    time::{Duration, Instant},
};

use serialport::{DataBits, FlowControl as PortFlowControl, Parity, SerialPort, StopBits};

use crate::{
    session::{FlowControl, SerialParity, SerialSessionConfig},
    transport::{TransportCommand, TransportEvent, TransportHandle},
};

pub(crate) fn apply_builder(
    cfg: &SerialSessionConfig,
    b: serialport::SerialPortBuilder,
) -> serialport::SerialPortBuilder {
    let b = b.data_bits(match cfg.data_bits {
        5 => DataBits::Five,
        6 => DataBits::Six,
        7 => DataBits::Seven,
        _ => DataBits::Eight,
    });
    let b = b.stop_bits(match cfg.stop_bits {
        2 => StopBits::Two,
        _ => StopBits::One,
    });
    let b = b.parity(match cfg.parity {
        SerialParity::None => Parity::None,
        SerialParity::Odd => Parity::Odd,
        SerialParity::Even => Parity::Even,
    });
    b.flow_control(match cfg.flow_control {
        FlowControl::None => PortFlowControl::None,
        FlowControl::Software => PortFlowControl::Software,
        FlowControl::Hardware => PortFlowControl::Hardware,
    })
}

/// Open `port_name` with `initial` and spawn the I/O loop thread.
pub fn spawn(port_name: &str, initial: SerialSessionConfig) -> Result<TransportHandle> {
    let builder =
        serialport::new(port_name.to_string(), initial.baud).timeout(Duration::from_millis(200));
    let builder = apply_builder(&initial, builder);
    let handle = builder.open()?;
    let serial: Arc<Mutex<Box<dyn SerialPort + Send + 'static>>> = Arc::new(Mutex::new(handle));

    let (cmd_tx, cmd_rx) = flume::unbounded();
    let (evt_tx, evt_rx) = flume::unbounded();
    let serial_clone = Arc::clone(&serial);
    let port = port_name.to_string();
    let initial_cfg = initial.clone();
    thread::spawn(move || run_loop(serial_clone, port, initial_cfg, cmd_rx, evt_tx));

    Ok(TransportHandle {
        cmd_tx,
        evt_rx,
        current_cfg: initial,
    })
}

fn run_loop(
    serial: Arc<Mutex<Box<dyn SerialPort + Send + 'static>>>,
    port_name: String,
    initial: SerialSessionConfig,
    cmd_rx: Receiver<TransportCommand>,
    evt_tx: Sender<TransportEvent>,
) {
    let mut gap = compute_gap(&initial);
    let mut assembling: Vec<u8> = Vec::with_capacity(256);
    let mut last_byte: Option<Instant> = None;

    loop {
        while let Ok(cmd) = cmd_rx.try_recv() {
            match cmd {
                TransportCommand::Reconfigure(new_cfg) => {
                    if let Err(err) = reopen_serial(&serial, &port_name, &new_cfg) {
                        let _ = evt_tx
                            .send(TransportEvent::Error(format!("reconfigure failed: {err}")));
                    } else {
                        gap = compute_gap(&new_cfg);
                        let _ = evt_tx.send(TransportEvent::Reconfigured(new_cfg));
                    }
                }
                TransportCommand::Write(bytes) => {
                    let mut ok = false;
                    if let Ok(mut g) = serial.lock() {
                        if g.write_all(&bytes).is_ok() && g.flush().is_ok() {
                            ok = true;
                        }
                    }
                    if ok {
                        let _ = evt_tx.send(TransportEvent::Sent(bytes.into()));
                    } else {
                        let _ = evt_tx.send(TransportEvent::Error("write failed".to_string()));
                    }
                }
                TransportCommand::Stop => {
                    let _ = evt_tx.send(TransportEvent::Stopped);
                    return;
                }
            }
        }

        if let Some(t) = last_byte {
            if !assembling.is_empty() && t.elapsed() >= gap {
                finalize_buffer(&mut assembling, &evt_tx);
                last_byte = None;
            }
        }

        if let Ok(mut g) = serial.lock() {
            let mut buf = [0u8; 256];
            match g.read(&mut buf) {
                Ok(n) if n > 0 => {
                    assembling.extend_from_slice(&buf[..n]);
                    last_byte = Some(Instant::now());
                    if assembling.len() > 768 {
                        finalize_buffer(&mut assembling, &evt_tx);
                        last_byte = None;
                    }
                }
                Ok(_) => {}
                Err(e) if e.kind() == std::io::ErrorKind::TimedOut => {}
                Err(e) => {
                    let _ = evt_tx.send(TransportEvent::Error(format!("read error: {e}")));
                }
            }
        }

        thread::sleep(Duration::from_millis(2));
    }
}

fn finalize_buffer(buf: &mut Vec<u8>, evt_tx: &Sender<TransportEvent>) {
    if !buf.is_empty() {
        let _ = evt_tx.send(TransportEvent::Received(bytes::Bytes::from(buf.clone())));
        buf.clear();
    }
}

/// Inter-byte gap used to split the incoming byte stream into frames.
/// Roughly four character times, clamped to a sane range for slow/fast lines.
fn compute_gap(cfg: &SerialSessionConfig) -> Duration {
    let bits = 1.0
        + cfg.data_bits as f32
        + (if cfg.parity != SerialParity::None {
            1.0
        } else {
            0.0
        })
        + cfg.stop_bits as f32;
    let char_ms = (bits / cfg.baud as f32) * 1000.0;
    let gap_ms = (char_ms * 4.0).clamp(3.0, 50.0);
    Duration::from_millis(gap_ms as u64)
}

fn reopen_serial(
    shared: &Arc<Mutex<Box<dyn SerialPort + Send + 'static>>>,
    port: &str,
    cfg: &SerialSessionConfig,
) -> Result<()> {
    let builder = serialport::new(port, cfg.baud).timeout(Duration::from_millis(200));
    let builder = apply_builder(cfg, builder);
    let new_handle = builder.open()?;
    if let Ok(mut g) = shared.lock() {
        *g = new_handle;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gap_scales_with_baud() {
        let slow = SerialSessionConfig {
            baud: 1200,
            ..Default::default()
        };
        let fast = SerialSessionConfig {
            baud: 115200,
            ..Default::default()
        };
        assert!(compute_gap(&slow) > compute_gap(&fast));
        assert!(compute_gap(&fast) >= Duration::from_millis(3));
        assert!(compute_gap(&slow) <= Duration::from_millis(50));
    }
}
