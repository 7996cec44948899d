//! Message history for a single session.
//!
//! Records are immutable once appended; the log is append-only apart from an
//! explicit `clear`. Ordering is arrival order within the owning session
//! (single writer, the core thread).

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::session::types::MessageDirection;

/// A single inbound or outbound message with its arrival timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageRecord {
    pub direction: MessageDirection,
    pub payload: Vec<u8>,
    pub when: DateTime<Local>,
}

impl MessageRecord {
    pub fn rx(payload: Vec<u8>) -> Self {
        Self {
            direction: MessageDirection::Rx,
            payload,
            when: Local::now(),
        }
    }

    pub fn tx(payload: Vec<u8>) -> Self {
        Self {
            direction: MessageDirection::Tx,
            payload,
            when: Local::now(),
        }
    }

    /// Render the payload as space-separated hex octets.
    pub fn payload_hex(&self) -> String {
        self.payload
            .iter()
            .map(|b| format!("{b:02x}"))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Render the payload as ASCII, substituting `.` for non-printable bytes.
    pub fn payload_ascii(&self) -> String {
        self.payload
            .iter()
            .map(|&b| {
                if (0x20..0x7f).contains(&b) {
                    b as char
                } else {
                    '.'
                }
            })
            .collect()
    }
}

/// A capacity-bounded buffer of message records. Oldest entries are trimmed
/// when the capacity is exceeded.
#[derive(Debug, Clone)]
pub struct MessageLog {
    records: Vec<MessageRecord>,
    max_records: usize,
}

impl MessageLog {
    pub fn new(max_records: usize) -> Self {
        Self {
            records: Vec::new(),
            max_records,
        }
    }

    pub fn push(&mut self, record: MessageRecord) {
        self.records.push(record);

        if self.records.len() > self.max_records {
            let excess = self.records.len() - self.max_records;
            self.records.drain(0..excess);
        }
    }

    pub fn records(&self) -> &[MessageRecord] {
        &self.records
    }

    pub fn last(&self) -> Option<&MessageRecord> {
        self.records.last()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }
}

impl Default for MessageLog {
    fn default() -> Self {
        Self::new(1000)
    }
}
