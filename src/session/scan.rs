//! Port discovery and rescan merge policy.

use crate::session::SessionMode;

/// Identifiers handed out for mock-mode sessions when no hardware is present.
pub const MOCK_PORT_NAMES: [&str; 2] = ["mock0", "mock1"];

/// Return a sorted list of discoverable ports as (port_name, port_type_string).
///
/// In mock mode the fixed virtual ports are returned instead of touching the
/// OS port list at all.
pub fn enumerate_ports(mode: SessionMode) -> Vec<(String, String)> {
    match mode {
        SessionMode::Mock => MOCK_PORT_NAMES
            .iter()
            .map(|name| (name.to_string(), "Mock".to_string()))
            .collect(),
        SessionMode::Hardware => {
            let mut ports = serialport::available_ports().unwrap_or_default();
            ports.sort_by(|a, b| a.port_name.cmp(&b.port_name));
            ports
                .into_iter()
                .map(|p| (p.port_name, format!("{:?}", p.port_type)))
                .collect()
        }
    }
}

/// A lightweight snapshot of a previously-known session used for merge
/// decisions during a rescan.
#[derive(Debug, Clone)]
pub struct PreviousSession {
    pub id: String,
    pub connected: bool,
    pub has_config: bool,
    pub log_count: usize,
}

/// Merge enumerated ports with previously-known sessions.
///
/// Enumerated ports come first in enumeration order. Previously-known
/// sessions that disappeared from enumeration are preserved when they are
/// still connected, carry a customized line configuration, or carry message
/// history, so an unplugged adapter does not silently drop its log or the
/// config the user dialed in.
///
/// Returns (id, Some(port_type)) for enumerated ports and (id, None) for
/// preserved ones.
pub fn merge_enumeration(
    enumerated: &[(String, String)],
    previous: &[PreviousSession],
) -> Vec<(String, Option<String>)> {
    use std::collections::HashSet;

    let mut order: Vec<(String, Option<String>)> = Vec::new();
    let mut seen: HashSet<&str> = HashSet::new();

    for (name, ptype) in enumerated {
        seen.insert(name.as_str());
        order.push((name.clone(), Some(ptype.clone())));
    }

    for prev in previous {
        if seen.contains(prev.id.as_str()) {
            continue;
        }
        if prev.connected || prev.has_config || prev.log_count > 0 {
            order.push((prev.id.clone(), None));
        }
    }

    order
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mock_mode_enumerates_virtual_ports() {
        let ports = enumerate_ports(SessionMode::Mock);
        assert_eq!(ports.len(), MOCK_PORT_NAMES.len());
        assert_eq!(ports[0].0, "mock0");
    }

    #[test]
    fn merge_preserves_sessions_with_history() {
        let enumerated = vec![("ttyUSB0".to_string(), "Usb".to_string())];
        let previous = vec![
            PreviousSession {
                id: "ttyUSB1".to_string(),
                connected: false,
                has_config: false,
                log_count: 4,
            },
            PreviousSession {
                id: "ttyUSB2".to_string(),
                connected: false,
                has_config: false,
                log_count: 0,
            },
        ];

        let merged = merge_enumeration(&enumerated, &previous);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0], ("ttyUSB0".to_string(), Some("Usb".to_string())));
        assert_eq!(merged[1], ("ttyUSB1".to_string(), None));
    }

    #[test]
    fn merge_keeps_enumeration_order_for_known_ports() {
        let enumerated = vec![
            ("a".to_string(), "Usb".to_string()),
            ("b".to_string(), "Usb".to_string()),
        ];
        let previous = vec![PreviousSession {
            id: "a".to_string(),
            connected: true,
            has_config: false,
            log_count: 0,
        }];
        let merged = merge_enumeration(&enumerated, &previous);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].0, "a");
    }

    #[test]
    fn merge_preserves_configured_sessions() {
        let previous = vec![PreviousSession {
            id: "ttyUSB5".to_string(),
            connected: false,
            has_config: true,
            log_count: 0,
        }];
        let merged = merge_enumeration(&[], &previous);
        assert_eq!(merged, vec![("ttyUSB5".to_string(), None)]);
    }
}
