//! Combat module: spell projectiles + agent damage/death
//!
//! ECS ответственность:
//! - Projectile: движение по прямой, коллизии (круг vs круг), lifetime
//! - Agent damage: Health, ledger (kills/damage), death notification
//! - Events: ProjectileFired, ProjectileDestroyed, AgentDamaged, AgentDied
//!
//! Урон по target (игроку) применяется в `crate::target`.

use bevy::prelude::*;

use crate::{SimEventAppExt, SimSet};
use crate::SimulationStep;

pub mod damage;
pub mod projectile;

// Tests (separate files with _tests suffix)
#[cfg(test)]
mod damage_tests;
#[cfg(test)]
mod projectile_tests;

// Re-export основных типов
pub use damage::{apply_agent_hits, take_damage, AgentDamaged, AgentDied, AgentHit, Dead, HitOutcome};
pub use projectile::{advance_projectiles, Projectile, ProjectileDestroyed, ProjectileEnd, ProjectileFired};

/// Combat Plugin
///
/// Регистрирует combat системы в `SimulationStep`.
///
/// Порядок выполнения:
/// 1. advance_projectiles: движение → коллизии → lifetime (SimSet::Projectiles)
/// 2. apply_agent_hits: AgentHit → Health → AgentDied (SimSet::Damage)
pub struct CombatPlugin;

impl Plugin for CombatPlugin {
    fn build(&self, app: &mut App) {
        // Регистрация событий
        app.add_sim_event::<ProjectileFired>()
            .add_sim_event::<ProjectileDestroyed>()
            .add_sim_event::<AgentHit>()
            .add_sim_event::<AgentDamaged>()
            .add_sim_event::<AgentDied>();

        app.add_systems(SimulationStep, advance_projectiles.in_set(SimSet::Projectiles))
            .add_systems(SimulationStep, apply_agent_hits.in_set(SimSet::Damage));
    }
}
