pub mod derivation;
pub mod telemetry;
