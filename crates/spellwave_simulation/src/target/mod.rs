//! Target domain: игрок, по которому работают агенты
//!
//! Содержит:
//! - Target (позиция read-only для агентов, Health, CombatStats ledger)
//! - Obstacle (блокирует projectiles)
//! - apply_target_hits (TakeDamage по TargetHit)

use bevy::prelude::*;

use crate::{SimEventAppExt, SimSet, SimulationStep};

pub mod components;
pub mod systems;

pub use components::*;
pub use systems::*;

pub struct TargetPlugin;

impl Plugin for TargetPlugin {
    fn build(&self, app: &mut App) {
        app.add_sim_event::<TargetHit>()
            .add_sim_event::<TargetDamaged>()
            .add_sim_event::<TargetDied>()
            .add_sim_event::<StatsChanged>();

        app.add_systems(
            SimulationStep,
            apply_target_hits
                .in_set(SimSet::Damage)
                .before(crate::combat::apply_agent_hits),
        );
    }
}
