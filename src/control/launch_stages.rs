use log::debug;
use nalgebra::Vector3;

use super::propulsion::Engine;
use crate::config::StageConfig;
use crate::constants::PROPELLANT_EPSILON;
use crate::errors::SimulationError;

#[derive(Debug, Clone, PartialEq)]
pub struct Stage {
    dry_mass: f64,   // kg, without propellant
    wet_mass: f64,   // kg, fully fuelled
    drag_coeff: f64, // carried for the drag model, not yet used
    area: f64,       // m², cross section
    curr_mass: f64,
    pub engine: Engine,
    pub is_active: bool,
}

impl Stage {
    pub fn new(
        dry_mass: f64,
        wet_mass: f64,
        drag_coeff: f64,
        area: f64,
        engine: Engine,
    ) -> Result<Self, SimulationError> {
        if !(dry_mass >= 0.0 && dry_mass.is_finite()) {
            return Err(SimulationError::ConfigurationError(format!(
                "Stage dry mass must be non-negative, got {}",
                dry_mass
            )));
        }
        if !(wet_mass >= dry_mass && wet_mass.is_finite()) {
            return Err(SimulationError::ConfigurationError(format!(
                "Stage wet mass {} is below dry mass {}",
                wet_mass, dry_mass
            )));
        }
        if !(drag_coeff >= 0.0 && drag_coeff.is_finite() && area >= 0.0 && area.is_finite()) {
            return Err(SimulationError::ConfigurationError(format!(
                "Stage drag coefficient and area must be non-negative and finite, got {} and {}",
                drag_coeff, area
            )));
        }

        Ok(Stage {
            dry_mass,
            wet_mass,
            drag_coeff,
            area,
            curr_mass: wet_mass,
            engine,
            is_active: true,
        })
    }

    pub fn from_config(config: &StageConfig) -> Result<Self, SimulationError> {
        let engine = Engine::from_config(&config.engine)?;
        let mut stage = Self::new(
            config.dry_mass,
            config.wet_mass,
            config.drag_coeff,
            config.area,
            engine,
        )?;
        if let Some(initial_mass) = config.initial_mass {
            stage
                .set_curr_mass(initial_mass)
                .map_err(|e| SimulationError::ConfigurationError(e.to_string()))?;
        }
        stage.is_active = config.active;
        Ok(stage)
    }

    pub fn activate(&mut self) {
        self.is_active = true;
        debug!("Stage activated ({:.1} kg propellant)", self.propellant_mass());
    }

    pub fn deactivate(&mut self) {
        self.is_active = false;
    }

    pub fn dry_mass(&self) -> f64 {
        self.dry_mass
    }

    pub fn wet_mass(&self) -> f64 {
        self.wet_mass
    }

    pub fn drag_coeff(&self) -> f64 {
        self.drag_coeff
    }

    pub fn area(&self) -> f64 {
        self.area
    }

    pub fn curr_mass(&self) -> f64 {
        self.curr_mass
    }

    pub fn set_curr_mass(&mut self, mass: f64) -> Result<(), SimulationError> {
        if !(mass >= self.dry_mass && mass <= self.wet_mass) {
            return Err(SimulationError::DomainError(format!(
                "Stage mass {} outside [{}, {}]",
                mass, self.dry_mass, self.wet_mass
            )));
        }
        self.curr_mass = mass;
        Ok(())
    }

    pub fn propellant_mass(&self) -> f64 {
        self.curr_mass - self.dry_mass
    }

    pub fn has_propellant(&self) -> bool {
        self.curr_mass > self.dry_mass + PROPELLANT_EPSILON
    }

    /// Engine thrust while propellant remains, zero once depleted.
    pub fn calc_curr_thrust_force(&self, altitude: f64, vel_unit_vec: &Vector3<f64>) -> Vector3<f64> {
        if self.has_propellant() {
            self.engine.calc_curr_thrust_force(altitude, vel_unit_vec)
        } else {
            Vector3::zeros()
        }
    }

    /// Burns propellant for `delta_time` seconds at `altitude`. Never drops below dry mass.
    /// Returns the mass actually consumed.
    pub fn burn(&mut self, altitude: f64, delta_time: f64) -> f64 {
        if !self.is_active || !self.has_propellant() {
            return 0.0;
        }

        let requested = self.engine.mass_flow_rate(altitude) * delta_time;
        let consumed = requested.min(self.propellant_mass()).max(0.0);
        self.curr_mass -= consumed;

        if !self.has_propellant() {
            debug!("Stage propellant depleted");
        }
        consumed
    }

    /// Back to fully fuelled.
    pub fn refuel(&mut self) {
        self.curr_mass = self.wet_mass;
    }
}
