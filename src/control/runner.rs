use crate::constants::{MAX_SIMULATION_TIME, MAX_TICKS, TIME_STEP};
use crate::errors::SimulationError;
use crate::trajectory_system::kinematics::Phase;

use super::drone_drop::{DropSimulation, Frame};
use super::events::{PhaseChange, PhaseLog};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimConfig {
    pub dt: f64, // s
    pub max_time: f64, // s
}

impl SimConfig {
    pub fn validate(&self) -> Result<(), SimulationError> {
        if !self.dt.is_finite() || self.dt <= 0.0 {
            return Err(SimulationError::InitializationError(format!(
                "time step must be positive, got {}",
                self.dt
            )));
        }
        if !self.max_time.is_finite() || self.max_time <= 0.0 {
            return Err(SimulationError::InitializationError(format!(
                "max_time must be positive, got {}",
                self.max_time
            )));
        }
        if self.max_time / self.dt > MAX_TICKS as f64 {
            return Err(SimulationError::InitializationError(format!(
                "{}s at dt={} needs more than {} ticks",
                self.max_time, self.dt, MAX_TICKS
            )));
        }
        Ok(())
    }
}

impl Default for SimConfig {
    fn default() -> Self {
        SimConfig {
            dt: TIME_STEP,
            max_time: MAX_SIMULATION_TIME,
        }
    }
}

/// Recorded drop from `start` to impact. `frames[0]` is the state right after
/// `start`; every later frame follows one tick.
#[derive(Debug, Clone)]
pub struct Flight {
    pub frames: Vec<Frame>,
    pub changes: Vec<PhaseChange>,
}

impl Flight {
    pub fn ticks(&self) -> usize {
        self.frames.len().saturating_sub(1)
    }

    pub fn release(&self) -> Option<&PhaseChange> {
        self.changes.iter().find(|change| change.to == Phase::Dropped)
    }

    pub fn impact(&self) -> Option<&PhaseChange> {
        self.changes.iter().find(|change| change.to == Phase::Impact)
    }

    /// Last frame with the payload still in the air.
    pub fn last_airborne(&self) -> Option<&Frame> {
        self.frames
            .iter()
            .rev()
            .find(|frame| frame.phase == Phase::Dropped)
    }

    /// Payload speed on the last airborne frame.
    pub fn impact_speed(&self) -> Option<f64> {
        self.last_airborne().map(|frame| frame.telemetry.speed())
    }
}

/// Runs a fresh session until the payload lands, ticking at `config.dt`.
pub fn run_drop(config: &SimConfig) -> Result<Flight, SimulationError> {
    run_drop_with(DropSimulation::new(), config)
}

/// Like [`run_drop`] but with a caller-prepared session, which is reset first.
pub fn run_drop_with(
    mut simulation: DropSimulation,
    config: &SimConfig,
) -> Result<Flight, SimulationError> {
    config.validate()?;

    simulation.reset();
    let log = PhaseLog::new();
    simulation.subscribe(Box::new(log.clone()));
    simulation.start();

    let capacity = ((config.max_time / config.dt) as usize)
        .saturating_add(1)
        .min(100_000);
    let mut frames = Vec::with_capacity(capacity);
    frames.push(simulation.snapshot());

    while simulation.phase() != Phase::Impact {
        if simulation.elapsed() >= config.max_time {
            return Err(SimulationError::RunError(format!(
                "payload still airborne after {:.2}s in phase {}",
                simulation.elapsed(),
                simulation.phase()
            )));
        }

        simulation.tick(config.dt);
        simulation.state().check_invariants()?;
        frames.push(simulation.snapshot());
    }

    tracing::info!(
        ticks = frames.len() - 1,
        elapsed = simulation.elapsed(),
        "payload landed"
    );

    Ok(Flight {
        frames,
        changes: log.changes(),
    })
}
