use std::fmt;

use crate::constants::PhysicalConstants;

#[derive(Debug, Clone, PartialEq)]
pub struct DerivationStep {
    pub title: &'static str,
    pub formula: &'static str,
    pub substitution: String,
    pub result: f64, // J
}

/// Hand calculation of the payload's mechanical energy at the moment of
/// release, the answer the simulation is expected to reproduce.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorkedSolution {
    pub mass: f64, // kg
    pub initial_velocity: f64, // m/s, signed
    pub height: f64, // m
    pub gravity: f64, // m/s²
    pub kinetic: f64,
    pub potential: f64,
    pub total: f64,
}

impl WorkedSolution {
    pub fn from_constants(constants: &PhysicalConstants) -> Self {
        let mass = constants.payload_mass;
        let initial_velocity = -constants.descent_speed;
        let height = constants.drop_height;
        let kinetic = 0.5 * mass * initial_velocity * initial_velocity;
        let potential = mass * constants.gravity * height;

        WorkedSolution {
            mass,
            initial_velocity,
            height,
            gravity: constants.gravity,
            kinetic,
            potential,
            total: kinetic + potential,
        }
    }

    pub fn final_answer(&self) -> f64 {
        self.total
    }

    pub fn steps(&self) -> [DerivationStep; 3] {
        [
            DerivationStep {
                title: "1. Kinetic Energy (K0)",
                formula: "K = ½mv²",
                substitution: format!(
                    "= 0.5 * {:.1}kg * ({:.1}m/s)²",
                    self.mass, self.initial_velocity
                ),
                result: self.kinetic,
            },
            DerivationStep {
                title: "2. Potential Energy (U0)",
                formula: "U = mgh",
                substitution: format!(
                    "= {:.1}kg * {:.2}m/s² * {:.1}m",
                    self.mass, self.gravity, self.height
                ),
                result: self.potential,
            },
            DerivationStep {
                title: "3. Total Mechanical Energy",
                formula: "E = K + U",
                substitution: format!("= {:.2}J + {:.2}J", self.kinetic, self.potential),
                result: self.total,
            },
        ]
    }
}

impl fmt::Display for WorkedSolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Given Constants")?;
        writeln!(f, "  Payload Mass (m)       {:.1} kg", self.mass)?;
        writeln!(f, "  Initial Velocity (v0)  {:.1} m/s", self.initial_velocity)?;
        writeln!(f, "  Drop Height (h)        {:.1} m", self.height)?;
        writeln!(f)?;
        writeln!(f, "Kinematic Derivation")?;
        for step in self.steps() {
            writeln!(f, "  {}", step.title)?;
            writeln!(f, "    {}", step.formula)?;
            writeln!(f, "    {}", step.substitution)?;
            writeln!(f, "    = {:.2} J", step.result)?;
        }
        write!(f, "Final Answer: {:.2} J", self.final_answer())
    }
}
