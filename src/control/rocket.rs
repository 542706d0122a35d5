use log::{debug, info};
use nalgebra::Vector3;

use super::{astro_body::AstroBody, structure::Structure};
use crate::config::{CrashFreeze, SimulationConfig};
use crate::constants::{MIN_THRUST_DIRECTION_SPEED, UNBOUNDED_TIME_TO_GO};
use crate::errors::SimulationError;
use crate::telemetry_system::telemetry::ShutdownReport;
use crate::trajectory_system::regula_falsi::{RegulaFalsi, Slope};

pub struct Rocket {
    pub pos: Vector3<f64>,    // m, body-centred
    pub vel: Vector3<f64>,    // m/s
    pub acc: Vector3<f64>,    // m/s², rebuilt by every state_deriv
    pub mass: f64,            // kg
    pub thrust: Vector3<f64>, // N, summed over active stages
    pub structure: Structure,
    body: AstroBody,
    rf: RegulaFalsi,
    crash_freeze: CrashFreeze,
    has_crashed: bool,
    initial: VehicleState,
}

#[derive(PartialEq, Debug, Clone, Copy)]
pub enum RocketState {
    Flying,
    Crashed,
}

/// Everything the integrator changes, so a step can be undone.
#[derive(Debug, Clone, PartialEq)]
pub struct VehicleState {
    pub pos: Vector3<f64>,
    pub vel: Vector3<f64>,
    pub acc: Vector3<f64>,
    pub mass: f64,
    pub stage_masses: Vec<f64>,
}

impl Rocket {
    pub fn new(
        body: AstroBody,
        structure: Structure,
        position: Vector3<f64>,
        velocity: Vector3<f64>,
        impact_tolerance: f64,
        crash_freeze: CrashFreeze,
    ) -> Result<Self, SimulationError> {
        if !(position.iter().all(|c| c.is_finite()) && velocity.iter().all(|c| c.is_finite())) {
            return Err(SimulationError::DomainError(format!(
                "Rocket state must be finite, got position {:?} and velocity {:?}",
                position, velocity
            )));
        }
        if position.norm() == 0.0 {
            return Err(SimulationError::DomainError(
                "Rocket cannot start at the body centre".to_string(),
            ));
        }
        if !(impact_tolerance > 0.0 && impact_tolerance.is_finite()) {
            return Err(SimulationError::DomainError(format!(
                "Impact tolerance must be positive and finite, got {}",
                impact_tolerance
            )));
        }

        let mass = structure.get_total_mass();
        if !(mass > 0.0) {
            return Err(SimulationError::DomainError(format!(
                "Rocket total mass must be positive, got {}",
                mass
            )));
        }

        let initial = VehicleState {
            pos: position,
            vel: velocity,
            acc: Vector3::zeros(),
            mass,
            stage_masses: structure.stage_masses(),
        };

        Ok(Rocket {
            pos: position,
            vel: velocity,
            acc: Vector3::zeros(),
            mass,
            thrust: Vector3::zeros(),
            structure,
            body,
            rf: RegulaFalsi::new(impact_tolerance, Slope::Decreasing),
            crash_freeze,
            has_crashed: false,
            initial,
        })
    }

    pub fn from_config(config: &SimulationConfig) -> Result<Self, SimulationError> {
        let body = AstroBody::from_config(&config.body)?;
        let structure = Structure::from_config(&config.stages, config.rocket.payload_mass)?;
        Rocket::new(
            body,
            structure,
            Vector3::from(config.rocket.position),
            Vector3::from(config.rocket.velocity),
            config.integration.impact_tolerance,
            config.rocket.crash_freeze,
        )
    }

    /// Evaluates the starting derivative so `acc` and `mass` are meaningful before the first step.
    pub fn initialize(&mut self) -> Result<(), SimulationError> {
        self.state_deriv()?;
        info!(
            "Rocket initialized: altitude {:.3} m, mass {:.3} kg, {} stage(s)",
            self.altitude(),
            self.mass,
            self.structure.stages.len()
        );
        Ok(())
    }

    /// Returns to the initial conditions with a clean impact search.
    pub fn reset(&mut self) -> Result<(), SimulationError> {
        let initial = self.initial.clone();
        self.restore(&initial)?;
        self.thrust = Vector3::zeros();
        self.has_crashed = false;
        self.rf.reset();
        info!("Rocket reset to initial conditions");
        Ok(())
    }

    pub fn on_terminate(&self, time: f64) -> ShutdownReport {
        let report = ShutdownReport {
            time,
            pos: self.pos,
            vel: self.vel,
            radius: self.dist_to_astrobody(),
            has_crashed: self.has_crashed,
        };
        info!("Rocket terminated at t = {:.3} s", time);
        report
    }

    pub fn state_deriv(&mut self) -> Result<(), SimulationError> {
        self.acc = Vector3::zeros();
        self.thrust = Vector3::zeros();

        self.mass = self.calc_curr_mass()?;
        self.body.calc_curr_gravity_force(&self.pos, &mut self.acc)?;

        let altitude = self.body.altitude(&self.pos);
        let direction = self.thrust_direction();
        for stage in self.structure.active_stages() {
            self.thrust += stage.calc_curr_thrust_force(altitude, &direction);
        }
        self.acc += self.thrust / self.mass;

        Ok(())
    }

    /// Acceleration at an arbitrary state; leaves the rocket at that state.
    pub fn derivative_at(
        &mut self,
        pos: Vector3<f64>,
        vel: Vector3<f64>,
    ) -> Result<Vector3<f64>, SimulationError> {
        self.pos = pos;
        self.vel = vel;
        self.state_deriv()?;
        Ok(self.acc)
    }

    pub fn calc_curr_mass(&self) -> Result<f64, SimulationError> {
        let mass = self.structure.get_total_mass();
        if !(mass > 0.0) {
            return Err(SimulationError::DomainError(format!(
                "Rocket total mass must be positive, got {}",
                mass
            )));
        }
        Ok(mass)
    }

    /// Burns every active stage for `delta_time` at the current altitude.
    pub fn burn_propellant(&mut self, delta_time: f64) -> f64 {
        let altitude = self.altitude();
        self.structure
            .active_stages_mut()
            .map(|stage| stage.burn(altitude, delta_time))
            .sum()
    }

    /// Time-to-go until the surface is reached, 0 at the moment of impact.
    pub fn impact(&mut self, now: f64) -> f64 {
        if self.has_crashed {
            return 0.0;
        }

        let error = self.dist_to_astrobody() - self.body.radius();
        match self.rf.feed(error, now) {
            Some(tgo) if tgo == 0.0 => {
                self.land(now);
                0.0
            }
            Some(tgo) => {
                debug!("Impact search: error {:.6} m, tgo {:.6} s", error, tgo);
                tgo
            }
            None => UNBOUNDED_TIME_TO_GO,
        }
    }

    /// Marks the rocket as crashed where it stands and applies the freeze policy.
    pub fn land(&mut self, now: f64) {
        let error = self.dist_to_astrobody() - self.body.radius();
        self.rf.reset();
        self.has_crashed = true;
        self.freeze();
        info!("Impact at t = {:.6} s, surface error {:.6} m", now, error);
    }

    pub fn snapshot(&self) -> VehicleState {
        VehicleState {
            pos: self.pos,
            vel: self.vel,
            acc: self.acc,
            mass: self.mass,
            stage_masses: self.structure.stage_masses(),
        }
    }

    pub fn restore(&mut self, state: &VehicleState) -> Result<(), SimulationError> {
        self.structure.restore_stage_masses(&state.stage_masses)?;
        self.pos = state.pos;
        self.vel = state.vel;
        self.acc = state.acc;
        self.mass = state.mass;
        Ok(())
    }

    pub fn has_crashed(&self) -> bool {
        self.has_crashed
    }

    pub fn state(&self) -> RocketState {
        if self.has_crashed {
            RocketState::Crashed
        } else {
            RocketState::Flying
        }
    }

    pub fn body(&self) -> &AstroBody {
        &self.body
    }

    pub fn crash_freeze(&self) -> CrashFreeze {
        self.crash_freeze
    }

    pub fn dist_to_astrobody(&self) -> f64 {
        self.pos.norm()
    }

    pub fn altitude(&self) -> f64 {
        self.body.altitude(&self.pos)
    }

    pub fn get_velocity_magnitude(&self) -> f64 {
        self.vel.norm()
    }

    pub fn get_acceleration_magnitude(&self) -> f64 {
        self.acc.norm()
    }

    // Along the velocity, or straight up when (nearly) at rest.
    fn thrust_direction(&self) -> Vector3<f64> {
        self.vel
            .try_normalize(MIN_THRUST_DIRECTION_SPEED)
            .unwrap_or_else(|| self.pos.normalize())
    }

    fn freeze(&mut self) {
        match self.crash_freeze {
            CrashFreeze::Planar => {
                self.vel.x = 0.0;
                self.vel.y = 0.0;
                self.acc.x = 0.0;
                self.acc.y = 0.0;
            }
            CrashFreeze::Full => {
                self.vel = Vector3::zeros();
                self.acc = Vector3::zeros();
            }
        }
    }
}
