use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimulationError {
    #[error("Physics error: {0}")]
    PhysicsError(String),

    #[error("Initialization error: {0}")]
    InitializationError(String),

    #[error("Run error: {0}")]
    RunError(String),
}
