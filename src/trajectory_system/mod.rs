pub mod integrator;
pub mod regula_falsi;
