use nalgebra::Vector3;

use crate::config::BodyConfig;
use crate::constants::GRAVITATIONAL_CONSTANT;
use crate::errors::SimulationError;

/// A gravitating sphere. Immutable once built.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AstroBody {
    radius: f64,              // m
    radius_squared: f64,      // m²
    mass: f64,                // kg
    gravitational_param: f64, // m³/s², G * mass
    rotational_vel: f64,      // m/s
}

impl AstroBody {
    pub fn new(radius: f64, mass: f64, rotational_vel: f64) -> Result<Self, SimulationError> {
        if !(radius > 0.0 && radius.is_finite()) {
            return Err(SimulationError::ConfigurationError(format!(
                "Body radius must be positive and finite, got {}",
                radius
            )));
        }
        if !(mass > 0.0 && mass.is_finite()) {
            return Err(SimulationError::ConfigurationError(format!(
                "Body mass must be positive and finite, got {}",
                mass
            )));
        }
        if !rotational_vel.is_finite() {
            return Err(SimulationError::ConfigurationError(
                "Body rotational velocity must be finite".to_string(),
            ));
        }

        Ok(AstroBody {
            radius,
            radius_squared: radius * radius,
            mass,
            gravitational_param: GRAVITATIONAL_CONSTANT * mass,
            rotational_vel,
        })
    }

    pub fn from_config(config: &BodyConfig) -> Result<Self, SimulationError> {
        Self::new(config.radius, config.mass, config.rotational_vel)
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn radius_squared(&self) -> f64 {
        self.radius_squared
    }

    pub fn mass(&self) -> f64 {
        self.mass
    }

    pub fn gravitational_param(&self) -> f64 {
        self.gravitational_param
    }

    pub fn rotational_vel(&self) -> f64 {
        self.rotational_vel
    }

    /// Adds the gravitational acceleration at `pos` (body-centred) into `acc`.
    ///
    /// g = -mu / |pos|², applied along the unit vector of `pos`, so the
    /// contribution points back at the centre.
    pub fn calc_curr_gravity_force(
        &self,
        pos: &Vector3<f64>,
        acc: &mut Vector3<f64>,
    ) -> Result<(), SimulationError> {
        let pos_magnitude = pos.norm();
        if !(pos_magnitude > 0.0 && pos_magnitude.is_finite()) {
            return Err(SimulationError::DomainError(format!(
                "Gravity is undefined at position {:?}",
                pos.as_slice()
            )));
        }

        let pos_unit_vec = pos / pos_magnitude;
        let acc_gravity_mag = -self.gravitational_param / (pos_magnitude * pos_magnitude);
        *acc += pos_unit_vec * acc_gravity_mag;

        Ok(())
    }

    /// Height above the surface; negative below it.
    pub fn altitude(&self, pos: &Vector3<f64>) -> f64 {
        pos.norm() - self.radius
    }

    pub fn is_inside(&self, pos: &Vector3<f64>) -> bool {
        pos.norm_squared() < self.radius_squared
    }

    pub fn surface_gravity(&self) -> f64 {
        self.gravitational_param / self.radius_squared
    }
}
