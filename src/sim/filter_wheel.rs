//! Filter wheel simulator: one slot of travel per tick.

use chrono::{DateTime, Local};

use crate::sim::Simulator;

#[derive(Debug)]
pub struct FilterWheelSimulator {
    pub filters: Vec<String>,
    pub position: usize,
    target: usize,
}

impl Default for FilterWheelSimulator {
    fn default() -> Self {
        Self {
            filters: ["L", "R", "G", "B", "Ha", "OIII", "SII"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            position: 0,
            target: 0,
        }
    }
}

impl FilterWheelSimulator {
    pub fn move_to(&mut self, slot: usize) -> anyhow::Result<()> {
        if slot >= self.filters.len() {
            anyhow::bail!(
                "Filter slot {slot} out of range (wheel has {} slots)",
                self.filters.len()
            );
        }
        self.target = slot;
        Ok(())
    }

    pub fn is_moving(&self) -> bool {
        self.position != self.target
    }

    pub fn current_filter(&self) -> &str {
        &self.filters[self.position]
    }
}

impl Simulator for FilterWheelSimulator {
    fn name(&self) -> &str {
        "filter_wheel"
    }

    fn tick(&mut self, _now: DateTime<Local>) {
        if self.position < self.target {
            self.position += 1;
        } else if self.position > self.target {
            self.position -= 1;
        }
    }

    fn snapshot(&self) -> String {
        if self.is_moving() {
            format!("moving {} -> slot {}", self.current_filter(), self.target)
        } else {
            format!("slot {} ({})", self.position, self.current_filter())
        }
    }
}
