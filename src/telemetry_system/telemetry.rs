use std::fmt;

use nalgebra::Vector3;

use crate::control::rocket::Rocket;

/// Final vehicle state, reported once when the run ends.
#[derive(Debug, Clone, PartialEq)]
pub struct ShutdownReport {
    pub time: f64,
    pub pos: Vector3<f64>,
    pub vel: Vector3<f64>,
    pub radius: f64,
    pub has_crashed: bool,
}

impl fmt::Display for ShutdownReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "========================================")?;
        writeln!(f, "      Rocket State at Shutdown     ")?;
        writeln!(f, "t = {}", self.time)?;
        writeln!(
            f,
            "pos = [{:.9}, {:.9}, {:.9}]",
            self.pos.x, self.pos.y, self.pos.z
        )?;
        writeln!(
            f,
            "vel = [{:.9}, {:.9}, {:.9}]",
            self.vel.x, self.vel.y, self.vel.z
        )?;
        writeln!(f, "radius = {:.9}", self.radius)?;
        writeln!(f, "crashed = {}", self.has_crashed)?;
        write!(f, "========================================")
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlightSample {
    pub time: f64,
    pub altitude: f64,
    pub speed: f64,
    pub acceleration: f64,
    pub mass: f64,
    pub thrust: f64,
    pub time_to_go: f64,
}

pub struct Telemetry {
    pub samples: Vec<FlightSample>,
    max_velocity: f64,
    max_altitude: f64,
    min_mass: f64,
    max_acceleration: f64,
    crash_time: Option<f64>,
}

impl Default for Telemetry {
    fn default() -> Self {
        Self::new()
    }
}

impl Telemetry {
    pub fn new() -> Self {
        Telemetry {
            samples: Vec::new(),
            max_velocity: 0.0,
            max_altitude: f64::MIN,
            min_mass: f64::MAX,
            max_acceleration: 0.0,
            crash_time: None,
        }
    }

    pub fn format_time(elapsed_time: f64) -> String {
        if elapsed_time >= 3600.0 {
            let hours = (elapsed_time / 3600.0).floor();
            let minutes = ((elapsed_time % 3600.0) / 60.0).floor();
            let seconds = elapsed_time % 60.0;
            format!("{:.0}h {:.0}m {:.2}s", hours, minutes, seconds)
        } else if elapsed_time >= 60.0 {
            let minutes = (elapsed_time / 60.0).floor();
            let seconds = elapsed_time % 60.0;
            format!("{:.0}m {:.2}s", minutes, seconds)
        } else {
            format!("{:.2}s", elapsed_time)
        }
    }

    pub fn format_altitude(altitude: f64) -> String {
        if altitude.abs() >= 1000.0 {
            format!("{:.2} km", altitude / 1000.0)
        } else {
            format!("{:.2} m", altitude)
        }
    }

    pub fn collect_data(&mut self, rocket: &Rocket, time: f64, time_to_go: f64) {
        let sample = FlightSample {
            time,
            altitude: rocket.altitude(),
            speed: rocket.get_velocity_magnitude(),
            acceleration: rocket.get_acceleration_magnitude(),
            mass: rocket.mass,
            thrust: rocket.thrust.norm(),
            time_to_go,
        };

        self.max_velocity = self.max_velocity.max(sample.speed);
        self.max_altitude = self.max_altitude.max(sample.altitude);
        self.min_mass = self.min_mass.min(sample.mass);
        self.max_acceleration = self.max_acceleration.max(sample.acceleration);
        if rocket.has_crashed() && self.crash_time.is_none() {
            self.crash_time = Some(time);
        }

        self.samples.push(sample);
    }

    pub fn max_velocity(&self) -> f64 {
        self.max_velocity
    }

    pub fn max_altitude(&self) -> f64 {
        self.max_altitude
    }

    pub fn min_mass(&self) -> f64 {
        self.min_mass
    }

    pub fn max_acceleration(&self) -> f64 {
        self.max_acceleration
    }

    pub fn crash_time(&self) -> Option<f64> {
        self.crash_time
    }

    pub fn format_sample(sample: &FlightSample) -> String {
        let time_to_go = if sample.time_to_go.is_finite() {
            format!("{:.3} s", sample.time_to_go)
        } else {
            "n/a".to_string()
        };
        format!(
            "Time: {} | Altitude: {} | Speed: {:.2} m/s | Acceleration: {:.2} m/s² | \
             Mass: {:.2} kg | Thrust: {:.2} N | Time to impact: {}",
            Self::format_time(sample.time),
            Self::format_altitude(sample.altitude),
            sample.speed,
            sample.acceleration,
            sample.mass,
            sample.thrust,
            time_to_go
        )
    }

    pub fn log_lines(&self) -> Vec<String> {
        self.samples.iter().map(Self::format_sample).collect()
    }

    pub fn summary(&self) -> String {
        if self.samples.is_empty() {
            return "--- Simulation Summary ---\nNo samples recorded".to_string();
        }

        let mut lines = vec![
            "--- Simulation Summary ---".to_string(),
            format!("Samples: {}", self.samples.len()),
            format!("Max Velocity: {:.2} m/s", self.max_velocity),
            format!("Max Altitude: {}", Self::format_altitude(self.max_altitude)),
            format!("Min Mass: {:.2} kg", self.min_mass),
            format!("Max Acceleration: {:.2} m/s²", self.max_acceleration),
        ];
        match self.crash_time {
            Some(time) => lines.push(format!("Impact at: {}", Self::format_time(time))),
            None => lines.push("No impact".to_string()),
        }
        lines.join("\n")
    }
}
