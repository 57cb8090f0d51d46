use crate::constants::PhysicalConstants;
use crate::errors::SimulationError;
use crate::telemetry_system::telemetry::{derive_telemetry, Telemetry};
use crate::trajectory_system::kinematics::{advance, Phase, SimulationState, Transition};

use super::events::{PhaseChange, PhaseListener};

/// Everything a renderer needs for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    pub phase: Phase,
    pub elapsed: f64,
    pub drone_altitude: f64,
    pub payload_altitude: f64,
    pub telemetry: Telemetry,
}

/// One drone-drop session. Owns the simulation state; commands and ticks are
/// applied through `&mut self`, so a host sharing it across threads wraps it
/// in a mutex.
pub struct DropSimulation {
    state: SimulationState,
    constants: PhysicalConstants,
    elapsed: f64,
    listeners: Vec<Box<dyn PhaseListener>>,
}

impl DropSimulation {
    pub fn new() -> Self {
        DropSimulation {
            state: SimulationState::initial(),
            constants: PhysicalConstants::STANDARD,
            elapsed: 0.0,
            listeners: Vec::new(),
        }
    }

    pub fn with_constants(constants: PhysicalConstants) -> Result<Self, SimulationError> {
        constants.validate()?;
        Ok(DropSimulation {
            constants,
            ..Self::new()
        })
    }

    pub fn subscribe(&mut self, listener: Box<dyn PhaseListener>) {
        self.listeners.push(listener);
    }

    /// Begins the descent. Ignored unless the simulation is `Ready`.
    pub fn start(&mut self) -> Phase {
        if !self.state.phase.can_start() {
            tracing::debug!(phase = self.state.phase.label(), "start ignored");
            return self.state.phase;
        }

        self.state.phase = Phase::Descending;
        self.elapsed = 0.0;
        self.notify(Phase::Ready, Phase::Descending, self.state);
        self.state.phase
    }

    /// Puts the drone back at its starting altitude from any phase.
    pub fn reset(&mut self) -> Phase {
        let previous = self.state.phase;
        self.state = SimulationState::initial();
        self.elapsed = 0.0;
        if previous != Phase::Ready {
            self.notify(previous, Phase::Ready, self.state);
        }
        self.state.phase
    }

    pub fn tick(&mut self, dt: f64) -> Phase {
        if !dt.is_finite() || dt <= 0.0 {
            tracing::debug!(dt, "tick ignored: time step must be positive");
            return self.state.phase;
        }

        if self.state.phase.is_active() {
            self.elapsed += dt;
        }

        let transitions = advance(&mut self.state, &self.constants, dt);
        for Transition { from, to, snapshot } in transitions {
            self.notify(from, to, snapshot);
        }
        self.state.phase
    }

    fn notify(&mut self, from: Phase, to: Phase, snapshot: SimulationState) {
        let change = PhaseChange {
            from,
            to,
            elapsed: self.elapsed,
            telemetry: derive_telemetry(&snapshot, &self.constants),
        };
        tracing::info!(
            "Phase {} -> {} at {:.3}s (payload {:.2} m, {:.2} m/s)",
            from,
            to,
            change.elapsed,
            change.telemetry.height,
            change.telemetry.velocity
        );
        for listener in &mut self.listeners {
            listener.on_phase_change(&change);
        }
    }

    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    pub fn constants(&self) -> &PhysicalConstants {
        &self.constants
    }

    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    pub fn telemetry(&self) -> Telemetry {
        derive_telemetry(&self.state, &self.constants)
    }

    pub fn snapshot(&self) -> Frame {
        Frame {
            phase: self.state.phase,
            elapsed: self.elapsed,
            drone_altitude: self.state.drone_altitude,
            payload_altitude: self.state.payload_altitude,
            telemetry: self.telemetry(),
        }
    }
}

impl Default for DropSimulation {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::TIME_STEP;
    use crate::control::events::PhaseLog;
    use approx::assert_abs_diff_eq;
    use std::sync::{Arc, Mutex};

    fn run_to_impact(simulation: &mut DropSimulation) -> usize {
        let mut ticks = 0;
        while !simulation.phase().is_terminal() {
            simulation.tick(TIME_STEP);
            ticks += 1;
            assert!(ticks < 1_000, "payload never landed");
        }
        ticks
    }

    #[test]
    fn test_start_only_from_ready() {
        let mut simulation = DropSimulation::new();
        let log = PhaseLog::new();
        simulation.subscribe(Box::new(log.clone()));

        assert_eq!(simulation.start(), Phase::Descending);
        assert_eq!(simulation.start(), Phase::Descending);
        assert_eq!(log.phases(), vec![Phase::Descending]);

        run_to_impact(&mut simulation);
        let landed = *simulation.state();
        assert_eq!(simulation.start(), Phase::Impact);
        assert_eq!(*simulation.state(), landed);
    }

    #[test]
    fn test_notifies_every_transition() {
        let mut simulation = DropSimulation::new();
        let log = PhaseLog::new();
        simulation.subscribe(Box::new(log.clone()));

        simulation.start();
        run_to_impact(&mut simulation);
        simulation.reset();

        assert_eq!(
            log.phases(),
            vec![
                Phase::Descending,
                Phase::Dropped,
                Phase::Impact,
                Phase::Ready
            ]
        );
        let changes = log.changes();
        assert_eq!(changes[3].from, Phase::Impact);
        assert!(changes[1].elapsed < changes[2].elapsed);
    }

    #[test]
    fn test_release_notification_carries_textbook_energy() {
        let mut simulation = DropSimulation::new();
        let log = PhaseLog::new();
        simulation.subscribe(Box::new(log.clone()));

        simulation.start();
        run_to_impact(&mut simulation);

        let release = log.changes()[1];
        assert_eq!(release.to, Phase::Dropped);
        assert_abs_diff_eq!(release.telemetry.kinetic, 9.00, epsilon = 0.01);
        assert_abs_diff_eq!(release.telemetry.potential, 29.43, epsilon = 0.01);
        assert_abs_diff_eq!(release.telemetry.total, 38.43, epsilon = 0.01);
        assert_abs_diff_eq!(release.elapsed, 160.0 * TIME_STEP, epsilon = 1e-9);
    }

    #[test]
    fn test_long_tick_publishes_grounded_release() {
        let mut simulation = DropSimulation::new();
        let log = PhaseLog::new();
        simulation.subscribe(Box::new(log.clone()));

        simulation.start();
        assert_eq!(simulation.tick(4.0), Phase::Impact);

        let changes = log.changes();
        assert_eq!(changes.len(), 3);
        for change in &changes {
            assert!(change.telemetry.height >= 0.0);
            assert!(change.telemetry.potential >= 0.0);
            assert!(change.telemetry.total >= 0.0);
        }
        let release = changes[1];
        assert_eq!(release.to, Phase::Dropped);
        assert_eq!(release.telemetry.height, 0.0);
        assert_abs_diff_eq!(release.telemetry.total, 9.0, epsilon = 1e-12);
    }

    #[test]
    fn test_reset_restores_initial_values() {
        let mut simulation = DropSimulation::new();
        simulation.start();
        for _ in 0..170 {
            simulation.tick(TIME_STEP);
        }
        assert_eq!(simulation.phase(), Phase::Dropped);

        assert_eq!(simulation.reset(), Phase::Ready);
        assert_eq!(*simulation.state(), SimulationState::initial());
        assert_eq!(simulation.elapsed(), 0.0);
    }

    #[test]
    fn test_reset_from_ready_is_silent() {
        let mut simulation = DropSimulation::new();
        let log = PhaseLog::new();
        simulation.subscribe(Box::new(log.clone()));

        simulation.reset();
        assert!(log.changes().is_empty());
    }

    #[test]
    fn test_elapsed_only_counts_active_ticks() {
        let mut simulation = DropSimulation::new();
        for _ in 0..10 {
            simulation.tick(TIME_STEP);
        }
        assert_eq!(simulation.elapsed(), 0.0);

        simulation.start();
        simulation.tick(0.25);
        simulation.tick(-0.25);
        assert_abs_diff_eq!(simulation.elapsed(), 0.25, epsilon = 1e-12);
    }

    #[test]
    fn test_with_constants_validates() {
        let mut constants = PhysicalConstants::default();
        constants.descent_speed = -1.0;
        assert!(DropSimulation::with_constants(constants).is_err());

        constants.descent_speed = 6.0;
        let mut simulation = DropSimulation::with_constants(constants).unwrap();
        simulation.start();
        simulation.tick(0.5);
        assert_abs_diff_eq!(simulation.state().drone_altitude, 7.0, epsilon = 1e-12);
    }

    #[test]
    fn test_snapshot_mirrors_state() {
        let mut simulation = DropSimulation::new();
        simulation.start();
        simulation.tick(TIME_STEP);

        let frame = simulation.snapshot();
        assert_eq!(frame.phase, Phase::Descending);
        assert_eq!(frame.drone_altitude, simulation.state().drone_altitude);
        assert_eq!(frame.payload_altitude, simulation.state().payload_altitude);
        assert_eq!(frame.telemetry, simulation.telemetry());
    }

    #[test]
    fn test_shared_across_threads() {
        let shared = Arc::new(Mutex::new(DropSimulation::new()));
        shared.lock().unwrap().start();

        let worker = {
            let shared = Arc::clone(&shared);
            std::thread::spawn(move || {
                for _ in 0..60 {
                    shared.lock().unwrap().tick(TIME_STEP);
                }
            })
        };
        worker.join().unwrap();

        let simulation = shared.lock().unwrap();
        assert_eq!(simulation.phase(), Phase::Descending);
        assert_abs_diff_eq!(simulation.state().drone_altitude, 7.0, epsilon = 1e-9);
    }
}
