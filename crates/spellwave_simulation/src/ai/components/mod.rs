//! AI components

pub mod behavior;
pub mod state_machine;


// Re-export all components
pub use behavior::*;
pub use state_machine::*;
