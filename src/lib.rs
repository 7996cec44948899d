//! Obsdeck: control-panel and simulation tool for astronomical observation equipment
//!
//! This crate provides the core library for obsdeck. It exposes a programmatic
//! API used by the CLI and TUI frontends: the device/port session registry,
//! serial and mock transports, hardware simulators, clients for the external
//! device bridge and filesystem services, and artifact export helpers.
//!
//! The public modules re-export the main APIs for each domain (sessions,
//! transports, simulators, etc.). The internal boot/CLI helpers are placed in
//! hidden modules to keep implementation details out of the generated
//! documentation.

#[doc(hidden)]
pub mod boot;
pub mod bridge;
#[doc(hidden)]
pub mod cli;
pub mod core;
pub mod export;
pub mod files;
pub mod session;
pub mod sim;
pub mod transport;
#[doc(hidden)]
pub mod tui;

pub use session::{
    MessageDirection, MessageLog, MessageRecord, SerialSessionConfig, Session, SessionRegistry,
};
pub use sim::{
    CameraSimulator, FilterWheelSimulator, GuiderSimulator, Simulator, TelescopeSimulator,
};
pub use transport::{TransportCommand, TransportEvent, TransportHandle};
