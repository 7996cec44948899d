//! One-shot CLI actions (no TUI).

use anyhow::{bail, Context, Result};
use clap::ArgMatches;
use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    time::Duration,
};

use crate::{
    session::{scan, SerialParity, SerialSessionConfig, SessionMode},
    sim::MockDeviceScript,
    transport::{TransportEvent, TransportHandle},
};

/// Build a line configuration from CLI overrides on top of defaults.
pub fn config_from_matches(matches: &ArgMatches) -> Result<SerialSessionConfig> {
    let mut cfg = SerialSessionConfig::default();
    if let Some(baud) = matches.get_one::<String>("baud") {
        cfg.baud = baud.parse().context("Invalid --baud value")?;
    }
    if let Some(bits) = matches.get_one::<String>("data-bits") {
        let bits: u8 = bits.parse().context("Invalid --data-bits value")?;
        if !(5..=8).contains(&bits) {
            bail!("--data-bits must be 5-8");
        }
        cfg.data_bits = bits;
    }
    if let Some(bits) = matches.get_one::<String>("stop-bits") {
        let bits: u8 = bits.parse().context("Invalid --stop-bits value")?;
        if !(1..=2).contains(&bits) {
            bail!("--stop-bits must be 1 or 2");
        }
        cfg.stop_bits = bits;
    }
    if let Some(parity) = matches.get_one::<String>("parity") {
        cfg.parity = parity
            .parse::<SerialParity>()
            .map_err(|_| anyhow::anyhow!("Invalid --parity value: {parity}"))?;
    }
    Ok(cfg)
}

/// Parse a payload argument: `0x`-prefixed hex (spaces and colons allowed) or
/// plain text.
pub fn parse_payload(raw: &str) -> Result<Vec<u8>> {
    if let Some(hex) = raw.strip_prefix("0x").or_else(|| raw.strip_prefix("0X")) {
        let cleaned: String = hex.chars().filter(|c| !matches!(c, ' ' | ':')).collect();
        if cleaned.is_empty() || cleaned.len() % 2 != 0 {
            bail!("Hex payload must contain an even number of digits");
        }
        (0..cleaned.len())
            .step_by(2)
            .map(|i| {
                u8::from_str_radix(&cleaned[i..i + 2], 16)
                    .with_context(|| format!("Invalid hex byte at offset {i}"))
            })
            .collect()
    } else {
        Ok(raw.as_bytes().to_vec())
    }
}

/// Print discoverable ports, optionally as JSON.
pub fn list_ports(mode: SessionMode, json: bool) {
    let ports = scan::enumerate_ports(mode);
    if json {
        let list: Vec<serde_json::Value> = ports
            .iter()
            .map(|(name, ptype)| {
                serde_json::json!({
                    "port_name": name,
                    "port_type": ptype,
                })
            })
            .collect();
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::Value::Array(list))
                .unwrap_or_else(|_| "[]".to_string())
        );
    } else {
        for (name, ptype) in ports {
            println!("{name}\t{ptype}");
        }
    }
}

fn open_transport(
    port: &str,
    cfg: SerialSessionConfig,
    mode: SessionMode,
) -> Result<TransportHandle> {
    match mode {
        SessionMode::Hardware => TransportHandle::spawn_serial(port, cfg)
            .with_context(|| format!("Failed to open {port}")),
        SessionMode::Mock => Ok(TransportHandle::spawn_mock(
            MockDeviceScript::bench_device(),
            cfg,
        )),
    }
}

/// Write one payload, wait briefly for a reply, print it, and exit.
pub fn send_once(
    port: &str,
    payload: &[u8],
    cfg: SerialSessionConfig,
    mode: SessionMode,
) -> Result<()> {
    if payload.is_empty() {
        bail!("Refusing to send an empty payload");
    }
    let handle = open_transport(port, cfg, mode)?;
    handle.write(payload.to_vec())?;

    let deadline = std::time::Instant::now() + Duration::from_secs(2);
    while std::time::Instant::now() < deadline {
        match handle.evt_rx.recv_timeout(Duration::from_millis(200)) {
            Ok(TransportEvent::Received(bytes)) => {
                println!("{}", render_frame(&bytes));
                break;
            }
            Ok(TransportEvent::Error(message)) => {
                handle.stop();
                bail!("Transport error: {message}");
            }
            Ok(_) => {}
            Err(_) => {}
        }
    }

    handle.stop();
    Ok(())
}

/// Stream received frames to stdout until Ctrl-C.
pub fn listen(port: &str, cfg: SerialSessionConfig, mode: SessionMode) -> Result<()> {
    let handle = open_transport(port, cfg, mode)?;
    log::info!("Listening on {port}; Ctrl-C to stop");

    let running = Arc::new(AtomicBool::new(true));
    let running_clone = Arc::clone(&running);
    ctrlc::set_handler(move || {
        running_clone.store(false, Ordering::SeqCst);
    })
    .context("Failed to install Ctrl-C handler")?;

    while running.load(Ordering::SeqCst) {
        match handle.evt_rx.recv_timeout(Duration::from_millis(200)) {
            Ok(TransportEvent::Received(bytes)) => println!("{}", render_frame(&bytes)),
            Ok(TransportEvent::Error(message)) => log::warn!("Transport error: {message}"),
            Ok(TransportEvent::Stopped) => break,
            Ok(_) => {}
            Err(_) => {}
        }
    }

    handle.stop();
    Ok(())
}

fn render_frame(bytes: &[u8]) -> String {
    let hex = bytes
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect::<Vec<_>>()
        .join(" ");
    let ascii: String = bytes
        .iter()
        .map(|&b| {
            if (0x20..0x7f).contains(&b) {
                b as char
            } else {
                '.'
            }
        })
        .collect();
    format!("{hex} |{ascii}|")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_parses_text_and_hex() {
        assert_eq!(parse_payload("AT").unwrap(), b"AT".to_vec());
        assert_eq!(parse_payload("0x4154").unwrap(), vec![0x41, 0x54]);
        assert_eq!(parse_payload("0x41 54").unwrap(), vec![0x41, 0x54]);
        assert!(parse_payload("0x415").is_err());
        assert!(parse_payload("0xzz").is_err());
    }

    #[test]
    fn config_overrides_apply() {
        let matches = crate::cli::build_command()
            .try_get_matches_from([
                "obsdeck",
                "--baud",
                "115200",
                "--parity",
                "Even",
                "--stop-bits",
                "2",
            ])
            .unwrap();
        let cfg = config_from_matches(&matches).unwrap();
        assert_eq!(cfg.baud, 115200);
        assert_eq!(cfg.parity, SerialParity::Even);
        assert_eq!(cfg.stop_bits, 2);
    }

    #[test]
    fn bad_overrides_are_rejected() {
        let matches = crate::cli::build_command()
            .try_get_matches_from(["obsdeck", "--data-bits", "9"])
            .unwrap();
        assert!(config_from_matches(&matches).is_err());
    }

    #[test]
    fn send_once_against_mock_device() {
        let cfg = SerialSessionConfig::default();
        send_once("mock0", b"AT", cfg, SessionMode::Mock).unwrap();
    }

    #[test]
    fn frame_rendering_is_hex_plus_ascii() {
        assert_eq!(render_frame(&[0x4f, 0x4b, 0x0a]), "4f 4b 0a |OK.|");
    }
}
