//! Tool-calling turns: one query in, one answer out.

pub mod runner;
pub mod state;
mod tooling;

pub use runner::{ToolCallingOrchestrator, TurnOutcome};
pub use state::TurnPhase;
