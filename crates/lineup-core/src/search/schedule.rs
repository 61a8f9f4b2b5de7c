// Linear cooling schedule for simulated annealing.

use serde::{Deserialize, Serialize};

use crate::error::OptimizerError;

/// Temperatures `start, start - step, start - 2*step, ...` while above `end`.
///
/// `end` itself is not visited, so the default schedule runs 4000 steps from
/// 1000.0 down to 0.25.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemperatureSchedule {
    pub start: f64,
    pub end: f64,
    pub step: f64,
}

/// Upper bound on the number of temperatures a schedule may visit.
pub const MAX_STEPS: u64 = 100_000_000;

impl Default for TemperatureSchedule {
    fn default() -> Self {
        TemperatureSchedule {
            start: 1000.0,
            end: 0.0,
            step: 0.25,
        }
    }
}

impl TemperatureSchedule {
    pub fn validate(&self) -> Result<(), OptimizerError> {
        for (field, val) in [
            ("temperature.start", self.start),
            ("temperature.end", self.end),
            ("temperature.step", self.step),
        ] {
            if !val.is_finite() {
                return Err(OptimizerError::config(field, format!("must be finite, got {val}")));
            }
        }
        if self.end < 0.0 {
            return Err(OptimizerError::config(
                "temperature.end",
                format!("must be >= 0, got {}", self.end),
            ));
        }
        if self.step <= 0.0 {
            return Err(OptimizerError::config(
                "temperature.step",
                format!("must be > 0, got {}", self.step),
            ));
        }
        if self.start < self.end {
            return Err(OptimizerError::config(
                "temperature.start",
                format!("must be >= end ({}), got {}", self.end, self.start),
            ));
        }
        let steps = (self.start - self.end) / self.step;
        if steps > MAX_STEPS as f64 {
            return Err(OptimizerError::config(
                "temperature.step",
                format!("schedule would run {steps:.0} steps, at most {MAX_STEPS} allowed"),
            ));
        }
        Ok(())
    }

    /// The temperatures visited, hottest first.
    ///
    /// Each value is computed from `start` directly so long schedules do not
    /// accumulate rounding error.
    pub fn temperatures(&self) -> impl Iterator<Item = f64> {
        let TemperatureSchedule { start, end, step } = *self;
        (0u64..)
            .map(move |k| start - k as f64 * step)
            .take_while(move |&t| t > end)
    }

    /// Number of annealing steps the schedule runs.
    pub fn len(&self) -> usize {
        self.temperatures().count()
    }

    pub fn is_empty(&self) -> bool {
        self.start <= self.end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_schedule_has_4000_steps() {
        let schedule = TemperatureSchedule::default();
        assert_eq!(schedule.len(), 4000);
        let temps: Vec<f64> = schedule.temperatures().collect();
        assert_eq!(temps[0], 1000.0);
        assert_eq!(temps[1], 999.75);
        assert_eq!(*temps.last().unwrap(), 0.25);
    }

    #[test]
    fn end_is_exclusive() {
        let schedule = TemperatureSchedule {
            start: 2.0,
            end: 1.0,
            step: 0.5,
        };
        let temps: Vec<f64> = schedule.temperatures().collect();
        assert_eq!(temps, vec![2.0, 1.5]);
    }

    #[test]
    fn start_equal_to_end_is_empty() {
        let schedule = TemperatureSchedule {
            start: 5.0,
            end: 5.0,
            step: 1.0,
        };
        assert!(schedule.is_empty());
        assert_eq!(schedule.len(), 0);
        assert!(schedule.validate().is_ok());
    }

    #[test]
    fn validate_rejects_bad_schedules() {
        let bad = [
            TemperatureSchedule { start: 10.0, end: 0.0, step: 0.0 },
            TemperatureSchedule { start: 10.0, end: 0.0, step: -1.0 },
            TemperatureSchedule { start: 1.0, end: 2.0, step: 0.5 },
            TemperatureSchedule { start: 10.0, end: -1.0, step: 0.5 },
            TemperatureSchedule { start: f64::INFINITY, end: 0.0, step: 0.5 },
            TemperatureSchedule { start: 10.0, end: 0.0, step: f64::NAN },
            TemperatureSchedule { start: 10.0, end: 0.0, step: 1e-300 },
        ];
        for schedule in bad {
            assert!(
                matches!(schedule.validate(), Err(OptimizerError::InvalidConfiguration { .. })),
                "{schedule:?} should be rejected"
            );
        }
    }

    #[test]
    fn overlong_schedule_rejected_on_step() {
        let schedule = TemperatureSchedule {
            start: 1e17,
            end: 0.0,
            step: 1.0,
        };
        match schedule.validate() {
            Err(OptimizerError::InvalidConfiguration { field, .. }) => {
                assert_eq!(field, "temperature.step")
            }
            other => panic!("expected InvalidConfiguration, got {other:?}"),
        }

        let at_bound = TemperatureSchedule {
            start: MAX_STEPS as f64,
            end: 0.0,
            step: 1.0,
        };
        assert!(at_bound.validate().is_ok());
    }
}
