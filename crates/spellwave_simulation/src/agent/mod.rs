//! Agent domain: враги, управляемые собственной state machine
//!
//! Содержит:
//! - Agent (target + ledger ссылки, non-owning)
//! - Misconfigured (маркер: агент без target, distance checks пропускаются)
//! - agent_bundle / spawn_agent (сборка entity из AgentTemplate)

pub mod components;

// Re-export all components
pub use components::*;
