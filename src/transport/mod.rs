pub mod mock;
pub mod serial;

use anyhow::Result;
use flume::{Receiver, Sender};

use crate::session::SerialSessionConfig;

/// Commands accepted by a running transport loop.
#[derive(Debug)]
pub enum TransportCommand {
    Write(Vec<u8>),
    Reconfigure(SerialSessionConfig),
    Stop,
}

/// Events emitted by a running transport loop.
#[derive(Debug, Clone)]
pub enum TransportEvent {
    Received(bytes::Bytes),
    Sent(bytes::Bytes),
    Reconfigured(SerialSessionConfig),
    Error(String),
    Stopped,
}

/// Handle to a transport loop running on a background thread.
///
/// Dropping the handle does not stop the loop; send [`TransportCommand::Stop`]
/// for a clean shutdown.
#[derive(Clone)]
pub struct TransportHandle {
    pub cmd_tx: Sender<TransportCommand>,
    pub evt_rx: Receiver<TransportEvent>,
    pub current_cfg: SerialSessionConfig,
}

impl std::fmt::Debug for TransportHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransportHandle")
            .field("current_cfg", &self.current_cfg)
            .finish_non_exhaustive()
    }
}

impl TransportHandle {
    /// Open a real serial port and spawn its I/O loop.
    pub fn spawn_serial(port_name: &str, initial: SerialSessionConfig) -> Result<Self> {
        serial::spawn(port_name, initial)
    }

    /// Spawn a scripted in-memory device (mock mode).
    pub fn spawn_mock(script: crate::sim::MockDeviceScript, cfg: SerialSessionConfig) -> Self {
        mock::spawn(script, cfg)
    }

    pub fn write(&self, payload: Vec<u8>) -> Result<()> {
        self.cmd_tx
            .send(TransportCommand::Write(payload))
            .map_err(|err| anyhow::anyhow!("Transport loop gone: {err}"))
    }

    /// Apply a new line configuration to the running loop. A serial transport
    /// reopens the port; the mock transport acknowledges without reopening.
    /// The loop answers with [`TransportEvent::Reconfigured`] on success.
    pub fn reconfigure(&self, cfg: SerialSessionConfig) -> Result<()> {
        self.cmd_tx
            .send(TransportCommand::Reconfigure(cfg))
            .map_err(|err| anyhow::anyhow!("Transport loop gone: {err}"))
    }

    pub fn stop(&self) {
        let _ = self.cmd_tx.send(TransportCommand::Stop);
    }
}
