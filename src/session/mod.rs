pub mod log;
pub mod registry;
pub mod scan;
pub mod types;

pub use log::{MessageLog, MessageRecord};
pub use registry::SessionRegistry;
pub use types::{
    FlowControl, MessageDirection, SerialParity, SerialSessionConfig, Session, SessionMode,
};
