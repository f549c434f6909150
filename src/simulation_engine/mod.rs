// simulation_engine/mod.rs
pub mod client;
pub mod simulation;
