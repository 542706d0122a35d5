use nalgebra::Vector3;

use crate::control::rocket::Rocket;
use crate::errors::SimulationError;

/// Fixed-step classic Runge-Kutta over the rocket's position and velocity.
///
/// Mass is held constant across the sub-stages; propellant is burned once
/// the step is accepted.
#[derive(Debug, Default, Clone, Copy)]
pub struct RungeKutta4;

impl RungeKutta4 {
    pub fn new() -> Self {
        RungeKutta4
    }

    pub fn advance(&self, rocket: &mut Rocket, delta_time: f64) -> Result<(), SimulationError> {
        if !(delta_time > 0.0 && delta_time.is_finite()) {
            return Err(SimulationError::DomainError(format!(
                "Integration step must be positive and finite, got {}",
                delta_time
            )));
        }

        let initial_state = (rocket.pos, rocket.vel);
        let k1 = Self::calculate_derivatives(rocket, initial_state)?;
        let k2 = Self::calculate_derivatives(
            rocket,
            (
                initial_state.0 + k1.0 * (delta_time / 2.0),
                initial_state.1 + k1.1 * (delta_time / 2.0),
            ),
        )?;
        let k3 = Self::calculate_derivatives(
            rocket,
            (
                initial_state.0 + k2.0 * (delta_time / 2.0),
                initial_state.1 + k2.1 * (delta_time / 2.0),
            ),
        )?;
        let k4 = Self::calculate_derivatives(
            rocket,
            (
                initial_state.0 + k3.0 * delta_time,
                initial_state.1 + k3.1 * delta_time,
            ),
        )?;

        rocket.pos =
            initial_state.0 + (k1.0 + 2.0 * k2.0 + 2.0 * k3.0 + k4.0) * (delta_time / 6.0);
        rocket.vel =
            initial_state.1 + (k1.1 + 2.0 * k2.1 + 2.0 * k3.1 + k4.1) * (delta_time / 6.0);

        rocket.burn_propellant(delta_time);

        // leave acc consistent with the accepted state
        rocket.state_deriv()
    }

    fn calculate_derivatives(
        rocket: &mut Rocket,
        state: (Vector3<f64>, Vector3<f64>),
    ) -> Result<(Vector3<f64>, Vector3<f64>), SimulationError> {
        let (position, velocity) = state;
        let acceleration = rocket.derivative_at(position, velocity)?;
        Ok((velocity, acceleration))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CrashFreeze;
    use crate::constants::{EARTH_MASS, EARTH_RADIUS};
    use crate::control::{astro_body::AstroBody, structure::Structure};
    use approx::assert_relative_eq;

    fn coasting_rocket(pos: Vector3<f64>, vel: Vector3<f64>) -> Rocket {
        let body = AstroBody::new(EARTH_RADIUS, EARTH_MASS, 0.0).unwrap();
        Rocket::new(
            body,
            Structure::new(Vec::new(), 1000.0),
            pos,
            vel,
            1e-3,
            CrashFreeze::Planar,
        )
        .unwrap()
    }

    #[test]
    fn test_rejects_non_positive_step() {
        let mut rocket = coasting_rocket(Vector3::new(EARTH_RADIUS, 0.0, 0.0), Vector3::zeros());
        assert!(RungeKutta4::new().advance(&mut rocket, 0.0).is_err());
        assert!(RungeKutta4::new().advance(&mut rocket, -1.0).is_err());
    }

    #[test]
    fn test_circular_orbit_keeps_radius() {
        let radius = EARTH_RADIUS + 400_000.0;
        let mu = 6.674e-11 * EARTH_MASS;
        let speed = (mu / radius).sqrt();
        let mut rocket = coasting_rocket(
            Vector3::new(radius, 0.0, 0.0),
            Vector3::new(0.0, speed, 0.0),
        );

        let integrator = RungeKutta4::new();
        for _ in 0..600 {
            integrator.advance(&mut rocket, 1.0).unwrap();
        }

        assert_relative_eq!(rocket.pos.norm(), radius, max_relative = 1e-6);
        assert_relative_eq!(rocket.vel.norm(), speed, max_relative = 1e-6);
        assert_eq!(rocket.pos.z, 0.0);
    }

    #[test]
    fn test_acceleration_matches_accepted_state() {
        let mut rocket = coasting_rocket(
            Vector3::new(EARTH_RADIUS + 1_000.0, 0.0, 0.0),
            Vector3::zeros(),
        );
        RungeKutta4::new().advance(&mut rocket, 0.5).unwrap();

        let mut expected = Vector3::zeros();
        rocket
            .body()
            .calc_curr_gravity_force(&rocket.pos, &mut expected)
            .unwrap();
        assert_relative_eq!(rocket.acc, expected, epsilon = 1e-12);
    }
}
