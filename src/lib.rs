pub mod communication;
pub mod config;
pub mod global_variables;
pub mod models;
pub mod simulation_engine;
