pub mod config;
pub mod constants;
pub mod control;
pub mod errors;
pub mod simulation;
pub mod telemetry_system;
pub mod trajectory_system;
pub mod utils;

pub use config::{CrashFreeze, SimulationConfig, StageConfig};
pub use constants::*;
pub use control::astro_body::AstroBody;
pub use control::launch_stages::Stage;
pub use control::propulsion::Engine;
pub use control::rocket::{Rocket, RocketState, VehicleState};
pub use control::structure::Structure;
pub use errors::SimulationError;
pub use simulation::{Simulation, StepReport};

// Re-export commonly used items from trajectory_system
pub use trajectory_system::integrator::RungeKutta4;
pub use trajectory_system::regula_falsi::{RegulaFalsi, Slope};

// Re-export commonly used items from telemetry_system
pub use telemetry_system::telemetry::{ShutdownReport, Telemetry};

// Re-export commonly used utilities
pub use utils::interpolate::SampleTable;
