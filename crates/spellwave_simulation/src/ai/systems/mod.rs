//! AI systems (per-agent state machine driving)

pub mod fsm;

// Re-export all systems
pub use fsm::*;
