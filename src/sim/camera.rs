//! Camera simulator: cooler temperature drift plus exposure progression.

use chrono::{DateTime, Local};
use rand::Rng;

use crate::sim::Simulator;

/// Descriptor of a completed simulated frame.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameDescriptor {
    pub width: u32,
    pub height: u32,
    pub mean_adu: f64,
    pub finished_at: DateTime<Local>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExposureState {
    Idle,
    Exposing {
        total_secs: f64,
        elapsed_secs: f64,
    },
    Complete(FrameDescriptor),
}

#[derive(Debug)]
pub struct CameraSimulator {
    pub sensor_temp_c: f64,
    pub cooler_setpoint_c: f64,
    pub cooler_on: bool,
    pub exposure: ExposureState,
    width: u32,
    height: u32,
}

impl Default for CameraSimulator {
    fn default() -> Self {
        Self {
            sensor_temp_c: 18.0,
            cooler_setpoint_c: -10.0,
            cooler_on: false,
            exposure: ExposureState::Idle,
            width: 4144,
            height: 2822,
        }
    }
}

impl CameraSimulator {
    pub fn set_cooler(&mut self, on: bool, setpoint_c: f64) {
        self.cooler_on = on;
        self.cooler_setpoint_c = setpoint_c;
    }

    /// Begin a simulated exposure. Restarting while exposing abandons the
    /// in-flight frame, matching how a real driver treats a new start request.
    pub fn start_exposure(&mut self, seconds: f64) {
        self.exposure = ExposureState::Exposing {
            total_secs: seconds.max(0.1),
            elapsed_secs: 0.0,
        };
    }

    pub fn abort_exposure(&mut self) {
        self.exposure = ExposureState::Idle;
    }

    pub fn progress_percent(&self) -> f64 {
        match &self.exposure {
            ExposureState::Exposing {
                total_secs,
                elapsed_secs,
            } => (elapsed_secs / total_secs * 100.0).min(100.0),
            ExposureState::Complete(_) => 100.0,
            ExposureState::Idle => 0.0,
        }
    }
}

impl Simulator for CameraSimulator {
    fn name(&self) -> &str {
        "camera"
    }

    fn tick(&mut self, now: DateTime<Local>) {
        let mut rng = rand::rng();

        // Drift toward the setpoint when cooling, toward ambient otherwise,
        // with a little measurement noise on top.
        let target = if self.cooler_on {
            self.cooler_setpoint_c
        } else {
            18.0
        };
        let delta = (target - self.sensor_temp_c) * 0.2;
        self.sensor_temp_c += delta + rng.random_range(-0.05..0.05);

        let mut finished = false;
        if let ExposureState::Exposing {
            total_secs,
            elapsed_secs,
        } = &mut self.exposure
        {
            *elapsed_secs += 1.0;
            finished = *elapsed_secs >= *total_secs;
        }
        if finished {
            let mean_adu = rng.random_range(800.0..1200.0);
            self.exposure = ExposureState::Complete(FrameDescriptor {
                width: self.width,
                height: self.height,
                mean_adu,
                finished_at: now,
            });
        }
    }

    fn snapshot(&self) -> String {
        match &self.exposure {
            ExposureState::Idle => format!(
                "{:.1}°C cooler {} idle",
                self.sensor_temp_c,
                if self.cooler_on { "on" } else { "off" }
            ),
            ExposureState::Exposing { .. } => format!(
                "{:.1}°C exposing {:.0}%",
                self.sensor_temp_c,
                self.progress_percent()
            ),
            ExposureState::Complete(frame) => format!(
                "{:.1}°C frame {}x{} mean {:.0} ADU",
                self.sensor_temp_c, frame.width, frame.height, frame.mean_adu
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exposure_completes_after_duration() {
        let mut cam = CameraSimulator::default();
        cam.start_exposure(3.0);
        for _ in 0..3 {
            assert!(!matches!(cam.exposure, ExposureState::Complete(_)));
            cam.tick(Local::now());
        }
        assert!(matches!(cam.exposure, ExposureState::Complete(_)));
        assert_eq!(cam.progress_percent(), 100.0);
    }

    #[test]
    fn cooler_drifts_toward_setpoint() {
        let mut cam = CameraSimulator::default();
        cam.set_cooler(true, -10.0);
        let start = cam.sensor_temp_c;
        for _ in 0..30 {
            cam.tick(Local::now());
        }
        assert!(cam.sensor_temp_c < start);
        assert!((cam.sensor_temp_c - -10.0).abs() < 2.0);
    }

    #[test]
    fn abort_returns_to_idle() {
        let mut cam = CameraSimulator::default();
        cam.start_exposure(10.0);
        cam.tick(Local::now());
        cam.abort_exposure();
        assert_eq!(cam.exposure, ExposureState::Idle);
        assert_eq!(cam.progress_percent(), 0.0);
    }
}
