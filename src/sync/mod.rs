pub mod orchestrator;
pub mod scheduler;

pub use orchestrator::{CycleGate, run_cycle};
pub use scheduler::{Command, Dashboard};
