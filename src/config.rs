use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::constants::{
    DEFAULT_VEHICLE_MASS, EARTH_MASS, EARTH_RADIUS, EARTH_ROTATIONAL_VELOCITY, EXHAUST_VELOCITY,
    IMPACT_TOLERANCE, MAX_IMPACT_REFINEMENTS, MAX_SIMULATION_TIME, TIME_STEP,
};
use crate::control::astro_body::AstroBody;
use crate::control::launch_stages::Stage;
use crate::errors::SimulationError;

/// Everything a run needs, shared by the body and the vehicle.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct SimulationConfig {
    pub body: BodyConfig,
    pub rocket: RocketConfig,
    pub stages: Vec<StageConfig>,
    pub integration: IntegrationConfig,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct BodyConfig {
    pub radius: f64,         // m
    pub mass: f64,           // kg
    pub rotational_vel: f64, // m/s
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct RocketConfig {
    pub payload_mass: f64,    // kg, everything that is not a stage
    pub position: [f64; 3],   // m, body-centred
    pub velocity: [f64; 3],   // m/s
    pub crash_freeze: CrashFreeze,
}

/// Which velocity/acceleration axes are zeroed when an impact is detected.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CrashFreeze {
    /// x and y only; z is left untouched.
    #[default]
    Planar,
    Full,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct StageConfig {
    pub dry_mass: f64,
    pub wet_mass: f64,
    pub drag_coeff: f64,
    pub area: f64,
    /// Starting mass, defaults to `wet_mass`.
    pub initial_mass: Option<f64>,
    pub active: bool,
    pub engine: EngineConfig,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct EngineConfig {
    /// Altitude samples (m). Empty means the placeholder thrust is used.
    pub altitudes: Vec<f64>,
    /// Thrust samples (N), one per altitude.
    pub thrusts: Vec<f64>,
    pub throttle_limiter: f64,
    pub exhaust_speed: f64,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct IntegrationConfig {
    pub time_step: f64,
    pub max_time: f64,
    pub impact_tolerance: f64,
    pub max_refinements: u32,
}

impl Default for BodyConfig {
    fn default() -> Self {
        BodyConfig {
            radius: EARTH_RADIUS,
            mass: EARTH_MASS,
            rotational_vel: EARTH_ROTATIONAL_VELOCITY,
        }
    }
}

impl Default for RocketConfig {
    fn default() -> Self {
        RocketConfig {
            payload_mass: DEFAULT_VEHICLE_MASS,
            position: [0.0, EARTH_RADIUS, 0.0],
            velocity: [10_000.0, 1_000.0, 0.0],
            crash_freeze: CrashFreeze::default(),
        }
    }
}

impl Default for StageConfig {
    fn default() -> Self {
        StageConfig {
            dry_mass: 100.0,
            wet_mass: 500.0,
            drag_coeff: 0.5,
            area: 1.0,
            initial_mass: None,
            active: true,
            engine: EngineConfig::default(),
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            altitudes: Vec::new(),
            thrusts: Vec::new(),
            throttle_limiter: 1.0,
            exhaust_speed: EXHAUST_VELOCITY,
        }
    }
}

impl Default for IntegrationConfig {
    fn default() -> Self {
        IntegrationConfig {
            time_step: TIME_STEP,
            max_time: MAX_SIMULATION_TIME,
            impact_tolerance: IMPACT_TOLERANCE,
            max_refinements: MAX_IMPACT_REFINEMENTS,
        }
    }
}

impl SimulationConfig {
    pub fn from_toml_str(source: &str) -> Result<Self, SimulationError> {
        let config: SimulationConfig = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, SimulationError> {
        let source = fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }

    /// Runs every construction-time check without keeping the results.
    pub fn validate(&self) -> Result<(), SimulationError> {
        AstroBody::from_config(&self.body)?;
        for stage in &self.stages {
            Stage::from_config(stage)?;
        }
        self.integration.validate()?;

        if self.rocket.position.iter().all(|c| *c == 0.0) {
            return Err(SimulationError::DomainError(
                "Initial position must not coincide with the body centre".to_string(),
            ));
        }
        if self
            .rocket
            .position
            .iter()
            .chain(self.rocket.velocity.iter())
            .any(|c| !c.is_finite())
        {
            return Err(SimulationError::ConfigurationError(
                "Initial position and velocity must be finite".to_string(),
            ));
        }
        if self.rocket.payload_mass < 0.0 {
            return Err(SimulationError::ConfigurationError(format!(
                "Payload mass must not be negative, got {}",
                self.rocket.payload_mass
            )));
        }
        Ok(())
    }
}

impl IntegrationConfig {
    pub fn validate(&self) -> Result<(), SimulationError> {
        if !(self.time_step > 0.0 && self.time_step.is_finite()) {
            return Err(SimulationError::ConfigurationError(format!(
                "Time step must be positive and finite, got {}",
                self.time_step
            )));
        }
        if !(self.max_time > 0.0 && self.max_time.is_finite()) {
            return Err(SimulationError::ConfigurationError(format!(
                "Maximum simulation time must be positive and finite, got {}",
                self.max_time
            )));
        }
        if !(self.impact_tolerance > 0.0 && self.impact_tolerance.is_finite()) {
            return Err(SimulationError::ConfigurationError(format!(
                "Impact tolerance must be positive and finite, got {}",
                self.impact_tolerance
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_matches_reference_run() {
        let config = SimulationConfig::default();
        assert_eq!(config.body.radius, 6_366_707.0195);
        assert_eq!(config.body.mass, 5.97219e24);
        assert_eq!(config.body.rotational_vel, 460.0);
        assert_eq!(config.rocket.payload_mass, 1000.0);
        assert_eq!(config.rocket.position, [0.0, 6_366_707.0195, 0.0]);
        assert_eq!(config.rocket.velocity, [10_000.0, 1_000.0, 0.0]);
        assert!(config.stages.is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_partial_toml_fills_defaults() {
        let config = SimulationConfig::from_toml_str(
            r#"
            [rocket]
            position = [6371000.0, 0.0, 0.0]
            velocity = [0.0, 0.0, 0.0]
            crash_freeze = "full"

            [[stages]]
            dry_mass = 200.0
            wet_mass = 800.0

            [stages.engine]
            altitudes = [0.0, 50000.0]
            thrusts = [15000.0, 18000.0]
            throttle_limiter = 0.8

            [integration]
            time_step = 0.05
            "#,
        )
        .unwrap();

        assert_eq!(config.body, BodyConfig::default());
        assert_eq!(config.rocket.crash_freeze, CrashFreeze::Full);
        assert_eq!(config.rocket.payload_mass, 1000.0);
        assert_eq!(config.stages.len(), 1);
        assert_eq!(config.stages[0].engine.thrusts, vec![15_000.0, 18_000.0]);
        assert_eq!(config.stages[0].engine.exhaust_speed, EXHAUST_VELOCITY);
        assert!(config.stages[0].active);
        assert_eq!(config.integration.time_step, 0.05);
        assert_eq!(config.integration.max_refinements, MAX_IMPACT_REFINEMENTS);
    }

    #[test]
    fn test_rejects_mismatched_engine_table() {
        let result = SimulationConfig::from_toml_str(
            r#"
            [[stages]]
            [stages.engine]
            altitudes = [0.0, 1000.0, 2000.0]
            thrusts = [1.0, 2.0]
            "#,
        );
        assert!(matches!(result, Err(SimulationError::ConfigurationError(_))));
    }

    #[test]
    fn test_rejects_origin_position() {
        let result = SimulationConfig::from_toml_str(
            r#"
            [rocket]
            position = [0.0, 0.0, 0.0]
            "#,
        );
        assert!(matches!(result, Err(SimulationError::DomainError(_))));
    }

    #[test]
    fn test_rejects_bad_integration_settings() {
        let mut config = SimulationConfig::default();
        config.integration.time_step = 0.0;
        assert!(matches!(
            config.validate(),
            Err(SimulationError::ConfigurationError(_))
        ));

        for max_time in [f64::INFINITY, f64::NAN, -1.0] {
            let mut config = SimulationConfig::default();
            config.integration.max_time = max_time;
            assert!(
                matches!(config.validate(), Err(SimulationError::ConfigurationError(_))),
                "max_time {} accepted",
                max_time
            );
        }
    }

    #[test]
    fn test_malformed_toml_is_a_parse_error() {
        let result = SimulationConfig::from_toml_str("[body\nradius = ");
        assert!(matches!(result, Err(SimulationError::Parse(_))));
    }
}
