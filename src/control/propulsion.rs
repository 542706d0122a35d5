use nalgebra::Vector3;

use crate::config::EngineConfig;
use crate::constants::{EXHAUST_VELOCITY, PLACEHOLDER_THRUST};
use crate::errors::SimulationError;
use crate::utils::interpolate::SampleTable;

#[derive(Debug, Clone, PartialEq)]
pub struct Engine {
    thrust_samples: SampleTable, // N against altitude in m
    thrust_limiter: f64,
    exhaust_speed: f64,
}

impl Engine {
    pub fn new(
        thrust_samples: SampleTable,
        thrust_limiter: f64,
        exhaust_speed: f64,
    ) -> Result<Self, SimulationError> {
        if !(0.0..=1.0).contains(&thrust_limiter) {
            return Err(SimulationError::ConfigurationError(format!(
                "Throttle limiter must be within [0, 1], got {}",
                thrust_limiter
            )));
        }
        if !(exhaust_speed > 0.0 && exhaust_speed.is_finite()) {
            return Err(SimulationError::ConfigurationError(format!(
                "Exhaust speed must be positive and finite, got {}",
                exhaust_speed
            )));
        }

        Ok(Engine {
            thrust_samples,
            thrust_limiter,
            exhaust_speed,
        })
    }

    pub fn from_config(config: &EngineConfig) -> Result<Self, SimulationError> {
        let thrust_samples = if config.altitudes.is_empty() && config.thrusts.is_empty() {
            SampleTable::constant(PLACEHOLDER_THRUST)
        } else {
            SampleTable::new(config.altitudes.clone(), config.thrusts.clone())?
        };
        Self::new(thrust_samples, config.throttle_limiter, config.exhaust_speed)
    }

    pub fn thrust_limiter(&self) -> f64 {
        self.thrust_limiter
    }

    pub fn set_thrust_limiter(&mut self, limiter: f64) -> Result<(), SimulationError> {
        if !(0.0..=1.0).contains(&limiter) {
            return Err(SimulationError::ConfigurationError(format!(
                "Throttle limiter must be within [0, 1], got {}",
                limiter
            )));
        }
        self.thrust_limiter = limiter;
        Ok(())
    }

    pub fn exhaust_speed(&self) -> f64 {
        self.exhaust_speed
    }

    pub fn thrust_samples(&self) -> &SampleTable {
        &self.thrust_samples
    }

    pub fn thrust_magnitude(&self, altitude: f64) -> f64 {
        self.thrust_samples.interpolate(altitude) * self.thrust_limiter
    }

    /// Thrust along `vel_unit_vec` for the given altitude.
    pub fn calc_curr_thrust_force(&self, altitude: f64, vel_unit_vec: &Vector3<f64>) -> Vector3<f64> {
        vel_unit_vec * self.thrust_magnitude(altitude)
    }

    /// Propellant consumed per second at `altitude`, kg/s.
    pub fn mass_flow_rate(&self, altitude: f64) -> f64 {
        self.thrust_magnitude(altitude) / self.exhaust_speed
    }
}

impl Default for Engine {
    fn default() -> Self {
        Engine {
            thrust_samples: SampleTable::constant(PLACEHOLDER_THRUST),
            thrust_limiter: 1.0,
            exhaust_speed: EXHAUST_VELOCITY,
        }
    }
}
