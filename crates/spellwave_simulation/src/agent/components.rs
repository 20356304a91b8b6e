//! Agent component + spawn helper.

use bevy::prelude::*;

use crate::ai::StateMachine;
use crate::components::{Body, Facing, Faction, Health, Position, SpawnOrder};
use crate::config::AgentTemplate;

/// Enemy agent.
///
/// Обе ссылки non-owning: target и ledger живут своей жизнью и могут исчезнуть
/// раньше агента.
#[derive(Component, Debug, Clone, Default)]
#[require(StateMachine, Facing, Position, Health)]
pub struct Agent {
    /// The single tracked opposing entity (distance checks, aiming)
    pub target: Option<Entity>,
    /// Entity carrying the kill/damage accounting (`CombatStats`), if any
    pub ledger: Option<Entity>,
}

impl Agent {
    pub fn new(target: Option<Entity>, ledger: Option<Entity>) -> Self {
        Self { target, ledger }
    }
}

/// Marker: agent failed initialization (no target). It never ticks.
#[derive(Component, Debug, Clone, Copy)]
pub struct Misconfigured;

/// Components of one agent built from a template.
///
/// Behaviors создаются здесь один раз; Patrol активируется при первом шаге
/// симуляции (`initialize_agents`).
pub fn agent_bundle(
    order: SpawnOrder,
    template: &AgentTemplate,
    position: Vec2,
    target: Option<Entity>,
    ledger: Option<Entity>,
) -> impl Bundle {
    (
        Agent::new(target, ledger),
        order,
        Position(position),
        Facing::default(),
        Health::new(template.agent.max_health),
        Body::new(template.agent.body_radius),
        Faction::Enemy,
        template.agent,
        template.projectile,
        StateMachine::default(),
    )
}

/// Spawns an agent from a template at `position`.
pub fn spawn_agent(
    commands: &mut Commands,
    order: SpawnOrder,
    template: &AgentTemplate,
    position: Vec2,
    target: Option<Entity>,
    ledger: Option<Entity>,
) -> Entity {
    commands
        .spawn(agent_bundle(order, template, position, target, ledger))
        .id()
}
