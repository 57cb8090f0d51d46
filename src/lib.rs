pub mod constants;
pub mod control;
pub mod errors;
pub mod telemetry_system;
pub mod trajectory_system;

pub use constants::*;
pub use control::drone_drop::{DropSimulation, Frame};
pub use control::events::{PhaseChange, PhaseListener, PhaseLog, TracingListener};
pub use control::runner::{run_drop, run_drop_with, Flight, SimConfig};
pub use errors::SimulationError;

// Re-export commonly used items from trajectory_system
pub use trajectory_system::kinematics::{advance, Phase, SimulationState, Transition};

// Re-export commonly used items from telemetry_system
pub use telemetry_system::derivation::{DerivationStep, WorkedSolution};
pub use telemetry_system::telemetry::{
    derive_telemetry, Telemetry, TelemetryRecorder, TelemetrySample,
};
