//! Telescope mount simulator: linear-interpolated slews toward a target.

use chrono::{DateTime, Local};

use crate::sim::Simulator;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MountState {
    Parked,
    Tracking,
    Slewing,
}

#[derive(Debug)]
pub struct TelescopeSimulator {
    pub ra_hours: f64,
    pub dec_degrees: f64,
    pub state: MountState,
    target_ra: f64,
    target_dec: f64,
    /// Degrees of movement per tick while slewing.
    slew_rate: f64,
}

impl Default for TelescopeSimulator {
    fn default() -> Self {
        Self {
            ra_hours: 0.0,
            dec_degrees: 90.0,
            state: MountState::Parked,
            target_ra: 0.0,
            target_dec: 90.0,
            slew_rate: 5.0,
        }
    }
}

impl TelescopeSimulator {
    pub fn slew_to(&mut self, ra_hours: f64, dec_degrees: f64) {
        self.target_ra = ra_hours.rem_euclid(24.0);
        self.target_dec = dec_degrees.clamp(-90.0, 90.0);
        self.state = MountState::Slewing;
    }

    pub fn park(&mut self) {
        self.target_ra = 0.0;
        self.target_dec = 90.0;
        self.state = MountState::Slewing;
    }

    /// Resume sidereal tracking at the current position.
    pub fn unpark(&mut self) {
        if self.state == MountState::Parked {
            self.state = MountState::Tracking;
        }
    }

    pub fn is_on_target(&self) -> bool {
        (self.ra_hours - self.target_ra).abs() < 1e-6
            && (self.dec_degrees - self.target_dec).abs() < 1e-6
    }

    fn step_axis(current: f64, target: f64, max_step: f64) -> f64 {
        let delta = target - current;
        if delta.abs() <= max_step {
            target
        } else {
            current + max_step * delta.signum()
        }
    }
}

impl Simulator for TelescopeSimulator {
    fn name(&self) -> &str {
        "telescope"
    }

    fn tick(&mut self, _now: DateTime<Local>) {
        if self.state != MountState::Slewing {
            return;
        }

        // RA is in hours; scale the per-tick step accordingly (15°/hour-angle).
        self.ra_hours = Self::step_axis(self.ra_hours, self.target_ra, self.slew_rate / 15.0);
        self.dec_degrees = Self::step_axis(self.dec_degrees, self.target_dec, self.slew_rate);

        if self.is_on_target() {
            self.state = if self.target_dec == 90.0 && self.target_ra == 0.0 {
                MountState::Parked
            } else {
                MountState::Tracking
            };
        }
    }

    fn snapshot(&self) -> String {
        let state = match self.state {
            MountState::Parked => "parked",
            MountState::Tracking => "tracking",
            MountState::Slewing => "slewing",
        };
        format!(
            "RA {:.3}h Dec {:+.2}° {}",
            self.ra_hours, self.dec_degrees, state
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slew_converges_then_tracks() {
        let mut mount = TelescopeSimulator::default();
        mount.slew_to(5.5, 22.0);
        assert_eq!(mount.state, MountState::Slewing);

        for _ in 0..100 {
            mount.tick(Local::now());
            if mount.state != MountState::Slewing {
                break;
            }
        }

        assert_eq!(mount.state, MountState::Tracking);
        assert!((mount.ra_hours - 5.5).abs() < 1e-6);
        assert!((mount.dec_degrees - 22.0).abs() < 1e-6);
    }

    #[test]
    fn park_returns_to_home() {
        let mut mount = TelescopeSimulator::default();
        mount.slew_to(12.0, -30.0);
        for _ in 0..100 {
            mount.tick(Local::now());
        }
        mount.park();
        for _ in 0..100 {
            mount.tick(Local::now());
        }
        assert_eq!(mount.state, MountState::Parked);
    }

    #[test]
    fn unpark_resumes_tracking_in_place() {
        let mut mount = TelescopeSimulator::default();
        assert_eq!(mount.state, MountState::Parked);

        mount.unpark();
        assert_eq!(mount.state, MountState::Tracking);
        assert_eq!(mount.ra_hours, 0.0);
        assert_eq!(mount.dec_degrees, 90.0);

        // A no-op unless parked.
        mount.slew_to(3.0, 10.0);
        mount.unpark();
        assert_eq!(mount.state, MountState::Slewing);
    }

    #[test]
    fn dec_is_clamped_to_poles() {
        let mut mount = TelescopeSimulator::default();
        mount.slew_to(0.0, 135.0);
        for _ in 0..100 {
            mount.tick(Local::now());
        }
        assert!(mount.dec_degrees <= 90.0);
    }
}
