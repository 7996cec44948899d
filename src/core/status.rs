//! Global status shared between the core thread and UI frontends.
//!
//! The core thread publishes snapshots here after each cycle; presentation
//! code only ever reads. Access goes through the closure-based accessors so a
//! lock is never held across a render.

use anyhow::{anyhow, Result};
use chrono::{DateTime, Local};
use once_cell::sync::OnceCell;
use parking_lot::RwLock;
use std::sync::Arc;

use crate::session::{MessageRecord, SerialSessionConfig};

/// Transient error surfaced as a toast-style notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorInfo {
    pub message: String,
    pub timestamp: DateTime<Local>,
}

/// Read-only view of one session, published for rendering.
#[derive(Debug, Clone)]
pub struct SessionView {
    pub id: String,
    pub display_name: String,
    pub connected: bool,
    pub config: SerialSessionConfig,
    pub records: Vec<MessageRecord>,
    pub rx_count: u64,
    pub tx_count: u64,
}

#[derive(Debug, Clone, Default)]
pub struct Status {
    pub sessions: Vec<SessionView>,
    pub telemetry: Vec<(String, String)>,
    pub mock_mode: bool,
    pub last_scan: Option<DateTime<Local>>,
    pub error: Option<ErrorInfo>,
}

impl Status {
    pub fn set_error(&mut self, message: impl Into<String>) {
        self.error = Some(ErrorInfo {
            message: message.into(),
            timestamp: Local::now(),
        });
    }
}

/// Global status instance accessible via read_status and write_status
static STATUS: OnceCell<Arc<RwLock<Status>>> = OnceCell::new();

/// Initialize the global status instance. Called once at application startup;
/// a second call is an error.
pub fn init_status(status: Arc<RwLock<Status>>) -> Result<()> {
    STATUS
        .set(status)
        .map_err(|_| anyhow!("Status already initialized"))?;
    Ok(())
}

/// Initialize with a default status, ignoring an already-initialized global.
/// Convenient for tests and one-shot CLI paths.
pub fn init_status_default() {
    let _ = STATUS.set(Arc::new(RwLock::new(Status::default())));
}

/// Read-only accessor for `Status`.
///
/// The closure may borrow from `Status`; the returned value is cloned before
/// leaving so no lock guard escapes. Therefore `R: Clone` is required.
pub fn read_status<R, F>(f: F) -> Result<R>
where
    F: FnOnce(&Status) -> Result<R>,
    R: Clone,
{
    let status = STATUS
        .get()
        .ok_or_else(|| anyhow!("Status not initialized"))?;
    let guard = status.read();
    let val = f(&guard)?;
    Ok(val.clone())
}

/// Write accessor for `Status`. The closure may mutate status; use `Ok(())`
/// if no value is needed.
pub fn write_status<R, F>(mut f: F) -> Result<R>
where
    F: FnMut(&mut Status) -> Result<R>,
    R: Clone,
{
    let status = STATUS
        .get()
        .ok_or_else(|| anyhow!("Status not initialized"))?;
    let mut guard = status.write();
    let val = f(&mut guard)?;
    Ok(val.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accessors_round_trip() {
        init_status_default();
        write_status(|status| {
            status.mock_mode = true;
            status.set_error("boom");
            Ok(())
        })
        .unwrap();
        let (mock, error) =
            read_status(|status| Ok((status.mock_mode, status.error.clone()))).unwrap();
        assert!(mock);
        assert_eq!(error.unwrap().message, "boom");
    }
}
