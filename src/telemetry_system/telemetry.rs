use crate::constants::PhysicalConstants;
use crate::control::drone_drop::DropSimulation;
use crate::trajectory_system::kinematics::{Phase, SimulationState};

/// Payload quantities shown on the telemetry panel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Telemetry {
    pub height: f64, // m
    pub velocity: f64, // m/s, signed
    pub kinetic: f64, // J
    pub potential: f64, // J
    pub total: f64, // J
}

impl Telemetry {
    pub fn speed(&self) -> f64 {
        self.velocity.abs()
    }
}

pub fn derive_telemetry(state: &SimulationState, constants: &PhysicalConstants) -> Telemetry {
    let speed = state.payload_velocity.abs();
    let kinetic = 0.5 * constants.payload_mass * speed * speed;
    let potential = constants.payload_mass * constants.gravity * state.payload_altitude;

    Telemetry {
        height: state.payload_altitude,
        velocity: state.payload_velocity,
        kinetic,
        potential,
        total: kinetic + potential,
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TelemetrySample {
    pub elapsed: f64,
    pub phase: Phase,
    pub telemetry: Telemetry,
}

pub struct TelemetryRecorder {
    pub log: Vec<TelemetrySample>,
    max_speed: f64,
    max_kinetic: f64,
    phase_times: Vec<(Phase, f64)>,
}

impl TelemetryRecorder {
    pub fn new() -> Self {
        TelemetryRecorder {
            log: Vec::new(),
            max_speed: 0.0,
            max_kinetic: 0.0,
            phase_times: Vec::new(),
        }
    }

    pub fn format_time(elapsed_time: f64) -> String {
        if elapsed_time >= 60.0 {
            let minutes = (elapsed_time / 60.0).floor();
            let seconds = elapsed_time % 60.0;
            format!("{:.0}m {:.2}s", minutes, seconds)
        } else {
            format!("{:.2}s", elapsed_time)
        }
    }

    fn format_sample(sample: &TelemetrySample) -> String {
        let t = &sample.telemetry;
        format!(
            "Time: {} | Phase: {}\n\
                 Height: {:.2} m | Velocity: {:.2} m/s\n\
                 Kinetic: {:.1} J | Potential: {:.1} J | Total: {:.1} J",
            Self::format_time(sample.elapsed),
            sample.phase,
            t.height,
            t.velocity,
            t.kinetic,
            t.potential,
            t.total
        )
    }

    pub fn collect(&mut self, simulation: &DropSimulation) {
        let sample = TelemetrySample {
            elapsed: simulation.elapsed(),
            phase: simulation.phase(),
            telemetry: simulation.telemetry(),
        };

        if sample.telemetry.speed() > self.max_speed {
            self.max_speed = sample.telemetry.speed();
        }
        if sample.telemetry.kinetic > self.max_kinetic {
            self.max_kinetic = sample.telemetry.kinetic;
        }

        match self.phase_times.last() {
            Some((last_phase, _)) if *last_phase == sample.phase => {}
            _ => self.phase_times.push((sample.phase, sample.elapsed)),
        }

        self.log.push(sample);
    }

    pub fn max_speed(&self) -> f64 {
        self.max_speed
    }

    pub fn max_kinetic(&self) -> f64 {
        self.max_kinetic
    }

    pub fn phase_times(&self) -> &[(Phase, f64)] {
        &self.phase_times
    }

    /// Renders every `every`-th sample, always including the last one, then
    /// the run summary.
    pub fn report(&self, every: usize) -> String {
        let every = every.max(1);
        let mut out = String::from("--- Telemetry Data ---\n");
        let last = self.log.len().saturating_sub(1);
        for (i, sample) in self.log.iter().enumerate() {
            if i % every == 0 || i == last {
                out.push_str(&Self::format_sample(sample));
                out.push_str("\n\n");
            }
        }
        out.push_str("--- End of Telemetry ---\n");

        out.push_str("\n--- Simulation Summary ---\n");
        out.push_str(&format!("Samples: {}\n", self.log.len()));
        out.push_str(&format!("Max Speed: {:.2} m/s\n", self.max_speed));
        out.push_str(&format!("Max Kinetic Energy: {:.2} J\n", self.max_kinetic));

        out.push_str("\n--- Phase Transitions ---\n");
        for (phase, time) in &self.phase_times {
            out.push_str(&format!(
                "Phase {} reached at: {}\n",
                phase,
                Self::format_time(*time)
            ));
        }
        out
    }

    pub fn display_data(&self, every: usize) {
        println!("{}", self.report(every));
    }
}

impl Default for TelemetryRecorder {
    fn default() -> Self {
        Self::new()
    }
}
