// Physical Constants
pub const GRAVITATIONAL_CONSTANT: f64 = 6.674e-11; // N⋅m²/kg²

// Launch body, a slightly small Earth
pub const EARTH_RADIUS: f64 = 6_366_707.0195; // meters
pub const EARTH_MASS: f64 = 5.97219e24; // kg
pub const EARTH_ROTATIONAL_VELOCITY: f64 = 460.0; // m/s

// Vehicle Constants
pub const DEFAULT_VEHICLE_MASS: f64 = 1000.0; // kg
pub const PROPELLANT_EPSILON: f64 = 0.0001; // kg, below this a stage counts as depleted
pub const PLACEHOLDER_THRUST: f64 = 12_000.0; // N, used while no thrust table is loaded

// Propulsion Constants
pub const EXHAUST_VELOCITY: f64 = 3000.0; // m/s (typical for liquid fuel rockets)

// Simulation Parameters
pub const TIME_STEP: f64 = 0.1; // s
pub const MAX_SIMULATION_TIME: f64 = 3600.0; // s
pub const IMPACT_TOLERANCE: f64 = 1e-3; // m
pub const MAX_IMPACT_REFINEMENTS: u32 = 20;

// Reported while the impact search has nothing to extrapolate from
pub const UNBOUNDED_TIME_TO_GO: f64 = f64::INFINITY;

// Below this speed the thrust direction falls back to local vertical
pub const MIN_THRUST_DIRECTION_SPEED: f64 = 1e-9; // m/s
