//! Guider simulator: bounded random guide-star jitter with running RMS.

use chrono::{DateTime, Local};
use rand::Rng;

use crate::sim::Simulator;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GuideSample {
    pub dx_arcsec: f64,
    pub dy_arcsec: f64,
}

#[derive(Debug)]
pub struct GuiderSimulator {
    pub guiding: bool,
    pub offset: GuideSample,
    sum_sq: f64,
    samples: u64,
}

impl Default for GuiderSimulator {
    fn default() -> Self {
        Self {
            guiding: false,
            offset: GuideSample {
                dx_arcsec: 0.0,
                dy_arcsec: 0.0,
            },
            sum_sq: 0.0,
            samples: 0,
        }
    }
}

impl GuiderSimulator {
    pub fn start_guiding(&mut self) {
        self.guiding = true;
        self.sum_sq = 0.0;
        self.samples = 0;
    }

    pub fn stop_guiding(&mut self) {
        self.guiding = false;
    }

    /// Kick the star off-center, as a dither command would.
    pub fn dither(&mut self, amount_arcsec: f64) {
        self.offset.dx_arcsec += amount_arcsec;
        self.offset.dy_arcsec -= amount_arcsec;
    }

    pub fn rms_arcsec(&self) -> f64 {
        if self.samples == 0 {
            0.0
        } else {
            (self.sum_sq / self.samples as f64).sqrt()
        }
    }
}

impl Simulator for GuiderSimulator {
    fn name(&self) -> &str {
        "guider"
    }

    fn tick(&mut self, _now: DateTime<Local>) {
        if !self.guiding {
            return;
        }
        let mut rng = rand::rng();

        // Pull halfway back toward center, then jitter.
        self.offset.dx_arcsec = self.offset.dx_arcsec * 0.5 + rng.random_range(-0.3..0.3);
        self.offset.dy_arcsec = self.offset.dy_arcsec * 0.5 + rng.random_range(-0.3..0.3);

        let err = (self.offset.dx_arcsec.powi(2) + self.offset.dy_arcsec.powi(2)).sqrt();
        self.sum_sq += err * err;
        self.samples += 1;
    }

    fn snapshot(&self) -> String {
        if self.guiding {
            format!(
                "dx {:+.2}\" dy {:+.2}\" rms {:.2}\"",
                self.offset.dx_arcsec,
                self.offset.dy_arcsec,
                self.rms_arcsec()
            )
        } else {
            "idle".to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idle_guider_accumulates_nothing() {
        let mut guider = GuiderSimulator::default();
        for _ in 0..10 {
            guider.tick(Local::now());
        }
        assert_eq!(guider.rms_arcsec(), 0.0);
        assert_eq!(guider.offset.dx_arcsec, 0.0);
    }

    #[test]
    fn guiding_keeps_offsets_bounded() {
        let mut guider = GuiderSimulator::default();
        guider.start_guiding();
        for _ in 0..200 {
            guider.tick(Local::now());
        }
        assert!(guider.offset.dx_arcsec.abs() < 2.0);
        assert!(guider.offset.dy_arcsec.abs() < 2.0);
        assert!(guider.rms_arcsec() > 0.0);
    }

    #[test]
    fn dither_kicks_then_recovers() {
        let mut guider = GuiderSimulator::default();
        guider.start_guiding();
        guider.dither(3.0);
        assert!(guider.offset.dx_arcsec >= 3.0);
        for _ in 0..20 {
            guider.tick(Local::now());
        }
        assert!(guider.offset.dx_arcsec.abs() < 2.0);
    }
}
