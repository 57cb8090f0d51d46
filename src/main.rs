use drone_drop_simulation::*;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(LevelFilter::INFO)
        .init();

    let mut simulation = DropSimulation::new();
    simulation.subscribe(Box::new(TracingListener));

    let solution = WorkedSolution::from_constants(simulation.constants());
    println!("{}\n", solution);

    let mut telemetry = TelemetryRecorder::new();
    telemetry.collect(&simulation);

    simulation.start();

    while simulation.elapsed() < MAX_SIMULATION_TIME {
        simulation.tick(TIME_STEP);
        simulation.state().check_invariants()?;
        telemetry.collect(&simulation);

        if simulation.phase() == Phase::Impact {
            println!("Payload has landed. Ending simulation.");
            break;
        }
    }

    telemetry.display_data(15);

    if simulation.phase() != Phase::Impact {
        return Err(SimulationError::RunError(format!(
            "no impact after {:.2}s",
            simulation.elapsed()
        ))
        .into());
    }

    let landed_with = telemetry
        .log
        .iter()
        .rev()
        .find(|sample| sample.phase == Phase::Dropped)
        .map(|sample| sample.telemetry);
    if let Some(last) = landed_with {
        println!(
            "Energy just before impact: {:.2} J (expected {:.2} J)",
            last.total,
            solution.final_answer()
        );
    }

    Ok(())
}
