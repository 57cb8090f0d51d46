use std::sync::{Arc, Mutex};

use crate::telemetry_system::telemetry::Telemetry;
use crate::trajectory_system::kinematics::Phase;

/// Emitted every time the simulation changes phase.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhaseChange {
    pub from: Phase,
    pub to: Phase,
    /// Simulated seconds since `start`.
    pub elapsed: f64,
    /// Payload telemetry at the moment of the change.
    pub telemetry: Telemetry,
}

/// Receives phase-change notifications from a
/// [`DropSimulation`](crate::control::drone_drop::DropSimulation).
pub trait PhaseListener: Send {
    fn on_phase_change(&mut self, change: &PhaseChange);
}

/// Keeps every change it is handed. Cloning shares the underlying buffer so a
/// copy can be subscribed while the original is inspected.
#[derive(Clone, Default)]
pub struct PhaseLog {
    changes: Arc<Mutex<Vec<PhaseChange>>>,
}

impl PhaseLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn changes(&self) -> Vec<PhaseChange> {
        match self.changes.lock() {
            Ok(changes) => changes.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn phases(&self) -> Vec<Phase> {
        self.changes().iter().map(|change| change.to).collect()
    }
}

impl PhaseListener for PhaseLog {
    fn on_phase_change(&mut self, change: &PhaseChange) {
        match self.changes.lock() {
            Ok(mut changes) => changes.push(*change),
            Err(poisoned) => poisoned.into_inner().push(*change),
        }
    }
}

/// Logs each change through `tracing`.
pub struct TracingListener;

impl PhaseListener for TracingListener {
    fn on_phase_change(&mut self, change: &PhaseChange) {
        tracing::info!(
            from = change.from.label(),
            to = change.to.label(),
            elapsed = change.elapsed,
            height = change.telemetry.height,
            velocity = change.telemetry.velocity,
            total_energy = change.telemetry.total,
            "phase_change"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn change(from: Phase, to: Phase) -> PhaseChange {
        PhaseChange {
            from,
            to,
            elapsed: 0.0,
            telemetry: Telemetry {
                height: 9.5,
                velocity: 0.0,
                kinetic: 0.0,
                potential: 186.39,
                total: 186.39,
            },
        }
    }

    #[test]
    fn test_phase_log_shares_buffer_between_clones() {
        let log = PhaseLog::new();
        let mut subscribed = log.clone();

        subscribed.on_phase_change(&change(Phase::Ready, Phase::Descending));
        subscribed.on_phase_change(&change(Phase::Descending, Phase::Dropped));

        assert_eq!(log.phases(), vec![Phase::Descending, Phase::Dropped]);
        assert_eq!(log.changes()[0].from, Phase::Ready);
    }

    #[test]
    fn test_tracing_listener_accepts_changes() {
        let mut listener = TracingListener;
        listener.on_phase_change(&change(Phase::Dropped, Phase::Impact));
    }
}
