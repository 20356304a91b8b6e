//! AI decision-making module
//!
//! Per-agent FSM: Patrol → Chase → Attack по дистанции до target.
//! Behaviors живут в фиксированной таблице внутри `StateMachine`,
//! переходы: "переключись на вариант X", без циклических ссылок.
//!
//! Порядок внутри шага симуляции:
//! 1. initialize_agents: Enter(Patrol) для новых агентов, проверка target
//! 2. tick_agents: Update активного behavior (в порядке спавна), касты → projectiles
//!
//! `exit_behavior_on_remove`: observer, Exit() при удалении агента.

use bevy::prelude::*;

use crate::{SimEventAppExt, SimSet, SimulationStep};

pub mod components;
pub mod events;
pub mod systems;

// Re-export основных типов
pub use components::*;
pub use events::*;
pub use systems::*;

/// AI Plugin
///
/// FSM системы идут в `SimSet::Agents`: сначала init новых агентов,
/// затем tick (между ними flush команд, чтобы `Misconfigured` уже стоял).
pub struct AIPlugin;

impl Plugin for AIPlugin {
    fn build(&self, app: &mut App) {
        app.add_sim_event::<BehaviorChanged>()
            .add_observer(exit_behavior_on_remove)
            .add_systems(
                SimulationStep,
                (initialize_agents, tick_agents).chain().in_set(SimSet::Agents),
            );
    }
}
