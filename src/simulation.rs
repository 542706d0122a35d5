use log::{debug, info, warn};

use crate::config::{IntegrationConfig, SimulationConfig};
use crate::control::rocket::Rocket;
use crate::errors::SimulationError;
use crate::telemetry_system::telemetry::{ShutdownReport, Telemetry};
use crate::trajectory_system::integrator::RungeKutta4;

/// Outcome of one scheduler tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepReport {
    pub time: f64,
    pub altitude: f64,
    pub time_to_go: f64,
    pub has_crashed: bool,
    pub refinements: u32,
}

/// Drives the rocket: derivative, integration, impact check, once per tick.
pub struct Simulation {
    pub rocket: Rocket,
    pub telemetry: Telemetry,
    integrator: RungeKutta4,
    settings: IntegrationConfig,
    time: f64,
    initialized: bool,
}

impl Simulation {
    pub fn new(rocket: Rocket, settings: IntegrationConfig) -> Result<Self, SimulationError> {
        settings.validate()?;
        Ok(Simulation {
            rocket,
            telemetry: Telemetry::new(),
            integrator: RungeKutta4::new(),
            settings,
            time: 0.0,
            initialized: false,
        })
    }

    pub fn from_config(config: &SimulationConfig) -> Result<Self, SimulationError> {
        config.validate()?;
        Self::new(Rocket::from_config(config)?, config.integration.clone())
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn settings(&self) -> &IntegrationConfig {
        &self.settings
    }

    pub fn initialize(&mut self) -> Result<(), SimulationError> {
        self.rocket.initialize()?;
        let time_to_go = self.rocket.impact(self.time);
        self.telemetry
            .collect_data(&self.rocket, self.time, time_to_go);
        self.initialized = true;
        info!(
            "Simulation initialized: dt = {} s, max time = {} s",
            self.settings.time_step, self.settings.max_time
        );
        Ok(())
    }

    /// Rewinds clock, vehicle and telemetry to the start.
    pub fn reset(&mut self) -> Result<(), SimulationError> {
        self.rocket.reset()?;
        self.telemetry = Telemetry::new();
        self.time = 0.0;
        self.initialized = false;
        Ok(())
    }

    /// Advances one time step. When the surface crossing falls inside the step
    /// the step is redone up to the estimated impact time until the search
    /// converges or the refinement budget runs out.
    pub fn step(&mut self) -> Result<StepReport, SimulationError> {
        if !self.initialized {
            self.initialize()?;
        }
        if self.rocket.has_crashed() {
            return Ok(self.report(0.0, 0));
        }

        let start = self.time;
        let delta_time = self.settings.time_step;
        let snapshot = self.rocket.snapshot();

        self.integrator.advance(&mut self.rocket, delta_time)?;
        self.time = start + delta_time;
        let mut time_to_go = self.rocket.impact(self.time);

        let mut refinements = 0;
        while !self.rocket.has_crashed() {
            let target = self.time + time_to_go;
            if !(target > start && target <= start + delta_time) {
                break;
            }
            if refinements >= self.settings.max_refinements {
                warn!(
                    "Impact search did not converge after {} refinements at t = {:.6} s",
                    refinements, self.time
                );
                break;
            }

            self.rocket.restore(&snapshot)?;
            self.integrator.advance(&mut self.rocket, target - start)?;
            self.time = target;
            time_to_go = self.rocket.impact(self.time);
            refinements += 1;
            debug!(
                "Refinement {}: t = {:.9} s, tgo = {:.9} s",
                refinements, self.time, time_to_go
            );
        }

        // a step that ends under the surface has crossed it regardless of the search
        if !self.rocket.has_crashed()
            && self.rocket.altitude() < -self.settings.impact_tolerance
        {
            warn!(
                "Below the surface at t = {:.6} s without a converged impact, landing",
                self.time
            );
            self.rocket.land(self.time);
            time_to_go = 0.0;
        }

        self.telemetry
            .collect_data(&self.rocket, self.time, time_to_go);
        Ok(self.report(time_to_go, refinements))
    }

    /// Steps until impact or the time limit, then terminates the rocket.
    pub fn run(&mut self) -> Result<ShutdownReport, SimulationError> {
        if !self.initialized {
            self.initialize()?;
        }

        while !self.rocket.has_crashed() && self.time < self.settings.max_time {
            self.step()?;
        }

        if !self.rocket.has_crashed() {
            info!("Time limit of {} s reached without impact", self.settings.max_time);
        }
        Ok(self.rocket.on_terminate(self.time))
    }

    fn report(&self, time_to_go: f64, refinements: u32) -> StepReport {
        StepReport {
            time: self.time,
            altitude: self.rocket.altitude(),
            time_to_go,
            has_crashed: self.rocket.has_crashed(),
            refinements,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{EARTH_RADIUS, UNBOUNDED_TIME_TO_GO};

    fn drop_config(height: f64) -> SimulationConfig {
        let mut config = SimulationConfig::default();
        config.rocket.position = [EARTH_RADIUS + height, 0.0, 0.0];
        config.rocket.velocity = [0.0, 0.0, 0.0];
        config.integration.time_step = 0.5;
        config.integration.max_time = 120.0;
        config
    }

    #[test]
    fn test_initialize_primes_impact_search() {
        let mut sim = Simulation::from_config(&drop_config(100.0)).unwrap();
        sim.initialize().unwrap();
        assert_eq!(sim.telemetry.samples.len(), 1);
        assert_eq!(sim.telemetry.samples[0].time_to_go, UNBOUNDED_TIME_TO_GO);
        assert_eq!(sim.time(), 0.0);
    }

    #[test]
    fn test_drop_ends_on_surface() {
        let mut sim = Simulation::from_config(&drop_config(100.0)).unwrap();
        let report = sim.run().unwrap();

        assert!(report.has_crashed);
        assert!((report.radius - EARTH_RADIUS).abs() <= 1e-3);
        // 100 m under ~9.8 m/s² takes about 4.5 s
        assert!(report.time > 4.4 && report.time < 4.6, "t = {}", report.time);
        assert_eq!(sim.telemetry.crash_time(), Some(report.time));
    }

    #[test]
    fn test_step_after_crash_does_nothing() {
        let mut sim = Simulation::from_config(&drop_config(10.0)).unwrap();
        sim.run().unwrap();
        let time = sim.time();
        let pos = sim.rocket.pos;

        let report = sim.step().unwrap();
        assert!(report.has_crashed);
        assert_eq!(report.time_to_go, 0.0);
        assert_eq!(sim.time(), time);
        assert_eq!(sim.rocket.pos, pos);
    }

    #[test]
    fn test_exhausted_refinements_still_land() {
        let mut config = drop_config(100.0);
        config.integration.max_refinements = 0;
        let mut sim = Simulation::from_config(&config).unwrap();
        let report = sim.run().unwrap();

        assert!(report.has_crashed);
        assert!(report.radius < EARTH_RADIUS);
        // lands on the first step boundary past the ~4.5 s crossing
        assert!(report.time > 4.4 && report.time < 5.1, "t = {}", report.time);
        assert_eq!(sim.telemetry.crash_time(), Some(report.time));
    }

    #[test]
    fn test_time_limit_without_impact() {
        let mut config = drop_config(1_000_000.0);
        config.integration.max_time = 5.0;
        let mut sim = Simulation::from_config(&config).unwrap();
        let report = sim.run().unwrap();

        assert!(!report.has_crashed);
        assert!(report.time >= 5.0);
        assert_eq!(sim.telemetry.crash_time(), None);
    }

    #[test]
    fn test_reset_allows_a_second_run() {
        let mut sim = Simulation::from_config(&drop_config(50.0)).unwrap();
        let first = sim.run().unwrap();

        sim.reset().unwrap();
        assert_eq!(sim.time(), 0.0);
        assert!(!sim.rocket.has_crashed());

        let second = sim.run().unwrap();
        assert!(second.has_crashed);
        assert_eq!(first.time, second.time);
        assert_eq!(first.pos, second.pos);
    }
}
