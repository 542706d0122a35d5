use super::launch_stages::Stage;
use crate::config::StageConfig;
use crate::errors::SimulationError;

pub struct Structure {
    pub stages: Vec<Stage>, // Rocket stages
    pub payload_mass: f64,  // kg carried on top of the stages
}

impl Structure {
    pub fn new(stages: Vec<Stage>, payload_mass: f64) -> Self {
        Structure {
            stages,
            payload_mass,
        }
    }

    pub fn from_config(stages: &[StageConfig], payload_mass: f64) -> Result<Self, SimulationError> {
        let stages = stages
            .iter()
            .map(Stage::from_config)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Structure::new(stages, payload_mass))
    }

    pub fn get_total_mass(&self) -> f64 {
        let stages_mass: f64 = self.stages.iter().map(|stage| stage.curr_mass()).sum();
        stages_mass + self.payload_mass
    }

    pub fn get_total_propellant(&self) -> f64 {
        self.stages.iter().map(|stage| stage.propellant_mass()).sum()
    }

    pub fn active_stages(&self) -> impl Iterator<Item = &Stage> {
        self.stages.iter().filter(|stage| stage.is_active)
    }

    pub fn active_stages_mut(&mut self) -> impl Iterator<Item = &mut Stage> {
        self.stages.iter_mut().filter(|stage| stage.is_active)
    }

    pub fn stage_masses(&self) -> Vec<f64> {
        self.stages.iter().map(|stage| stage.curr_mass()).collect()
    }

    pub fn restore_stage_masses(&mut self, masses: &[f64]) -> Result<(), SimulationError> {
        if masses.len() != self.stages.len() {
            return Err(SimulationError::DomainError(format!(
                "Expected {} stage masses, got {}",
                self.stages.len(),
                masses.len()
            )));
        }
        for (stage, mass) in self.stages.iter_mut().zip(masses) {
            stage.set_curr_mass(*mass)?;
        }
        Ok(())
    }
}
