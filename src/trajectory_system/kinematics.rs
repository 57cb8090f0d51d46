use std::fmt;

use crate::constants::{
    PhysicalConstants, DRONE_CLIMB_RATE, GROUND_LEVEL, INITIAL_DRONE_ALTITUDE,
    INITIAL_PAYLOAD_ALTITUDE, PAYLOAD_OFFSET,
};
use crate::errors::SimulationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Ready,
    Descending,
    Dropped,
    Impact,
}

impl Phase {
    pub fn label(self) -> &'static str {
        match self {
            Phase::Ready => "READY",
            Phase::Descending => "DESCENDING",
            Phase::Dropped => "DROPPED",
            Phase::Impact => "IMPACT",
        }
    }

    /// Text of the primary control for this phase.
    pub fn control_label(self) -> &'static str {
        match self {
            Phase::Ready => "SIMULATE DROP",
            other => other.label(),
        }
    }

    pub fn can_start(self) -> bool {
        self == Phase::Ready
    }

    pub fn is_terminal(self) -> bool {
        self == Phase::Impact
    }

    /// Drone and payload are moving in this phase.
    pub fn is_active(self) -> bool {
        matches!(self, Phase::Descending | Phase::Dropped)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Vertical kinematic state of the drone and its payload. Altitudes in
/// meters, velocity in m/s with negative meaning downward.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationState {
    pub phase: Phase,
    pub drone_altitude: f64,
    pub payload_altitude: f64,
    pub payload_velocity: f64,
}

impl SimulationState {
    pub fn initial() -> Self {
        SimulationState {
            phase: Phase::Ready,
            drone_altitude: INITIAL_DRONE_ALTITUDE,
            payload_altitude: INITIAL_PAYLOAD_ALTITUDE,
            payload_velocity: 0.0,
        }
    }

    pub fn check_invariants(&self) -> Result<(), SimulationError> {
        let fields = [
            ("drone_altitude", self.drone_altitude),
            ("payload_altitude", self.payload_altitude),
            ("payload_velocity", self.payload_velocity),
        ];
        for (name, value) in fields {
            if !value.is_finite() {
                return Err(SimulationError::PhysicsError(format!(
                    "{} is not finite ({}) in phase {}",
                    name, value, self.phase
                )));
            }
        }

        if self.payload_altitude < GROUND_LEVEL {
            return Err(SimulationError::PhysicsError(format!(
                "payload below ground: {:.4} m in phase {}",
                self.payload_altitude, self.phase
            )));
        }

        if !self.phase.is_active() && self.payload_velocity != 0.0 {
            return Err(SimulationError::PhysicsError(format!(
                "payload moving at {:.4} m/s in phase {}",
                self.payload_velocity, self.phase
            )));
        }

        Ok(())
    }
}

impl Default for SimulationState {
    fn default() -> Self {
        Self::initial()
    }
}

/// A phase transition applied during one call to [`advance`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transition {
    pub from: Phase,
    pub to: Phase,
    /// State at the moment the threshold was crossed.
    pub snapshot: SimulationState,
}

/// Advances the state by one tick of `dt` seconds and returns the phase
/// transitions applied, in order.
///
/// The descent and free-fall rules are evaluated one after the other, so the
/// tick that releases the payload also integrates its first free-fall step,
/// and a large enough `dt` runs straight through to impact. A `dt` that is not
/// a positive finite number leaves the state untouched.
pub fn advance(
    state: &mut SimulationState,
    constants: &PhysicalConstants,
    dt: f64,
) -> Vec<Transition> {
    let mut transitions = Vec::new();
    if !dt.is_finite() || dt <= 0.0 {
        return transitions;
    }

    if state.phase == Phase::Descending {
        state.drone_altitude -= constants.descent_speed * dt;
        state.payload_altitude = state.drone_altitude - PAYLOAD_OFFSET;
        state.payload_velocity = -constants.descent_speed;

        if state.drone_altitude <= constants.release_altitude() {
            state.phase = Phase::Dropped;
            // A long tick can carry the hanging payload below ground before release.
            transitions.push(Transition {
                from: Phase::Descending,
                to: Phase::Dropped,
                snapshot: SimulationState {
                    payload_altitude: state.payload_altitude.max(GROUND_LEVEL),
                    ..*state
                },
            });
        }
    }

    if state.phase == Phase::Dropped {
        state.drone_altitude += DRONE_CLIMB_RATE * dt;
        state.payload_velocity -= constants.gravity * dt;
        state.payload_altitude += state.payload_velocity * dt;

        if state.payload_altitude <= GROUND_LEVEL {
            state.payload_altitude = GROUND_LEVEL;
            state.payload_velocity = 0.0;
            state.phase = Phase::Impact;
            transitions.push(Transition {
                from: Phase::Dropped,
                to: Phase::Impact,
                snapshot: *state,
            });
        }
    }

    transitions
}
