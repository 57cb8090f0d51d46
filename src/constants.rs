use crate::errors::SimulationError;

// Physical Constants
pub const GRAVITY: f64 = 9.81; // m/s²
pub const DRONE_MASS: f64 = 8.0; // kg (informational, not used by the dynamics)
pub const PAYLOAD_MASS: f64 = 2.0; // kg
pub const DESCENT_SPEED: f64 = 3.0; // m/s
pub const DROP_HEIGHT: f64 = 1.5; // m

// Scene Geometry
pub const INITIAL_DRONE_ALTITUDE: f64 = 10.0; // m
pub const PAYLOAD_OFFSET: f64 = 0.5; // m, payload hangs this far below the drone
pub const INITIAL_PAYLOAD_ALTITUDE: f64 = INITIAL_DRONE_ALTITUDE - PAYLOAD_OFFSET; // m
pub const DRONE_CLIMB_RATE: f64 = 2.0; // m/s after release, cosmetic only
pub const GROUND_LEVEL: f64 = 0.0; // m

// Simulation Parameters
pub const TIME_STEP: f64 = 1.0 / 60.0; // s
pub const MAX_SIMULATION_TIME: f64 = 30.0; // s
pub const MAX_TICKS: usize = 1_000_000;

/// The fixed physical parameters of the drop problem.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhysicalConstants {
    pub drone_mass: f64,
    pub payload_mass: f64,
    pub descent_speed: f64,
    pub drop_height: f64,
    pub gravity: f64,
}

impl PhysicalConstants {
    pub const STANDARD: PhysicalConstants = PhysicalConstants {
        drone_mass: DRONE_MASS,
        payload_mass: PAYLOAD_MASS,
        descent_speed: DESCENT_SPEED,
        drop_height: DROP_HEIGHT,
        gravity: GRAVITY,
    };

    /// Drone altitude at which the payload is released.
    pub fn release_altitude(&self) -> f64 {
        self.drop_height + PAYLOAD_OFFSET
    }

    pub fn validate(&self) -> Result<(), SimulationError> {
        let positive = [
            ("drone_mass", self.drone_mass),
            ("payload_mass", self.payload_mass),
            ("descent_speed", self.descent_speed),
            ("gravity", self.gravity),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(SimulationError::InitializationError(format!(
                    "{} must be positive and finite, got {}",
                    name, value
                )));
            }
        }

        if !self.drop_height.is_finite() || self.drop_height < 0.0 {
            return Err(SimulationError::InitializationError(format!(
                "drop_height must be non-negative and finite, got {}",
                self.drop_height
            )));
        }

        Ok(())
    }
}

impl Default for PhysicalConstants {
    fn default() -> Self {
        Self::STANDARD
    }
}
