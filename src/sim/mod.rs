//! Mock backend simulators.
//!
//! In-memory stand-ins for real hardware so the panel is exercisable without
//! devices attached. Outputs are randomized or linearly interpolated fake
//! telemetry; none of this sits on a production data path.

pub mod camera;
pub mod filter_wheel;
pub mod guider;
pub mod script;
pub mod telescope;

use chrono::{DateTime, Local};

pub use camera::{CameraSimulator, ExposureState, FrameDescriptor};
pub use filter_wheel::FilterWheelSimulator;
pub use guider::{GuideSample, GuiderSimulator};
pub use script::MockDeviceScript;
pub use telescope::{MountState, TelescopeSimulator};

/// A tick-driven simulator. The core loop calls `tick` at roughly 1 Hz and
/// renders `snapshot` in the telemetry panel.
pub trait Simulator {
    fn name(&self) -> &str;

    fn tick(&mut self, now: DateTime<Local>);

    /// Human-readable one-line telemetry summary.
    fn snapshot(&self) -> String;
}

/// The full bench of simulators backing mock mode.
#[derive(Debug, Default)]
pub struct SimulatorBench {
    pub camera: CameraSimulator,
    pub telescope: TelescopeSimulator,
    pub filter_wheel: FilterWheelSimulator,
    pub guider: GuiderSimulator,
}

impl SimulatorBench {
    pub fn tick(&mut self, now: DateTime<Local>) {
        self.camera.tick(now);
        self.telescope.tick(now);
        self.filter_wheel.tick(now);
        self.guider.tick(now);
    }

    pub fn snapshots(&self) -> Vec<(String, String)> {
        [
            &self.camera as &dyn Simulator,
            &self.telescope,
            &self.filter_wheel,
            &self.guider,
        ]
        .iter()
        .map(|s| (s.name().to_string(), s.snapshot()))
        .collect()
    }
}
