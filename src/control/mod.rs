pub mod drone_drop;
pub mod events;
pub mod runner;
