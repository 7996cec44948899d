//! Scripted serial device used by the mock transport.
//!
//! A command/response table plus an optional rotating feed of unsolicited
//! telemetry lines, enough to exercise the session screens without hardware.

use std::time::Duration;

#[derive(Debug, Clone, Default)]
pub struct MockDeviceScript {
    responses: Vec<(Vec<u8>, Vec<u8>)>,
    echo_unmatched: bool,
    telemetry_lines: Vec<Vec<u8>>,
    telemetry_interval: Option<Duration>,
    telemetry_index: usize,
}

impl MockDeviceScript {
    /// A script that answers from a fixed command table and stays silent on
    /// unknown commands.
    pub fn command_table(responses: Vec<(Vec<u8>, Vec<u8>)>) -> Self {
        Self {
            responses,
            ..Default::default()
        }
    }

    /// A script that echoes anything written to it.
    pub fn echo() -> Self {
        Self {
            echo_unmatched: true,
            ..Default::default()
        }
    }

    /// Attach a rotating telemetry feed emitted every `interval`.
    pub fn with_telemetry(mut self, lines: Vec<Vec<u8>>, interval: Duration) -> Self {
        self.telemetry_lines = lines;
        self.telemetry_interval = Some(interval);
        self
    }

    /// Default bench device: a handful of AT-style equipment queries plus a
    /// slow environment telemetry feed.
    pub fn bench_device() -> Self {
        Self::command_table(vec![
            (b"AT".to_vec(), b"OK".to_vec()),
            (b"ID?".to_vec(), b"OBSDECK-MOCK-1".to_vec()),
            (b"TEMP?".to_vec(), b"T=-9.8C".to_vec()),
            (b"STATUS?".to_vec(), b"READY".to_vec()),
        ])
        .with_telemetry(
            vec![
                b"ENV T=12.1C H=54%".to_vec(),
                b"ENV T=12.0C H=55%".to_vec(),
                b"ENV T=11.9C H=55%".to_vec(),
            ],
            Duration::from_secs(5),
        )
    }

    /// Look up the scripted reply for an inbound payload. Trailing CR/LF is
    /// ignored when matching so terminal-style input works unmodified.
    pub fn respond(&mut self, payload: &[u8]) -> Option<Vec<u8>> {
        let trimmed = trim_line_ending(payload);
        for (pattern, reply) in &self.responses {
            if trim_line_ending(pattern) == trimmed {
                return Some(reply.clone());
            }
        }
        if self.echo_unmatched {
            Some(payload.to_vec())
        } else {
            None
        }
    }

    pub fn telemetry_interval(&self) -> Option<Duration> {
        if self.telemetry_lines.is_empty() {
            None
        } else {
            self.telemetry_interval
        }
    }

    pub fn next_telemetry(&mut self) -> Option<Vec<u8>> {
        if self.telemetry_lines.is_empty() {
            return None;
        }
        let line = self.telemetry_lines[self.telemetry_index % self.telemetry_lines.len()].clone();
        self.telemetry_index += 1;
        Some(line)
    }
}

fn trim_line_ending(payload: &[u8]) -> &[u8] {
    let mut end = payload.len();
    while end > 0 && (payload[end - 1] == b'\r' || payload[end - 1] == b'\n') {
        end -= 1;
    }
    &payload[..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_table_matches_ignoring_crlf() {
        let mut script = MockDeviceScript::bench_device();
        assert_eq!(script.respond(b"AT\r\n"), Some(b"OK".to_vec()));
        assert_eq!(script.respond(b"ID?"), Some(b"OBSDECK-MOCK-1".to_vec()));
        assert_eq!(script.respond(b"NOPE"), None);
    }

    #[test]
    fn echo_script_returns_input() {
        let mut script = MockDeviceScript::echo();
        assert_eq!(script.respond(b"hello"), Some(b"hello".to_vec()));
    }

    #[test]
    fn telemetry_rotates() {
        let mut script = MockDeviceScript::bench_device();
        assert!(script.telemetry_interval().is_some());
        let a = script.next_telemetry().unwrap();
        let b = script.next_telemetry().unwrap();
        assert_ne!(a, b);
        let _ = script.next_telemetry().unwrap();
        let d = script.next_telemetry().unwrap();
        assert_eq!(a, d);
    }
}
