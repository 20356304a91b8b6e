//! FSM AI systems (initialization, per-tick update, teardown).

use bevy::prelude::*;

use crate::agent::{Agent, Misconfigured};
use crate::ai::{AgentContext, BehaviorChanged, BehaviorKind, CastRequest, StateMachine};
use crate::combat::{Dead, Projectile, ProjectileFired};
use crate::components::{Facing, Faction, Position, SpawnOrder};
use crate::config::{AgentTuning, ProjectileTuning};
use crate::error::ConfigError;
use crate::target::Target;
use crate::SimClock;

/// Система: инициализация новых агентов
///
/// Входим в Patrol. Если target отсутствует (или у него нет Position) -
/// логируем ConfigError и помечаем агента `Misconfigured`: он живёт, но не
/// тикает. Повторных попыток нет.
pub fn initialize_agents(
    mut commands: Commands,
    mut agents: Query<
        (Entity, &Agent, &mut StateMachine, &mut Position, &mut Facing, &AgentTuning),
        Added<Agent>,
    >,
    targets: Query<&Position, (With<Target>, Without<Agent>)>,
    mut changes: EventWriter<BehaviorChanged>,
) {
    for (entity, agent, mut machine, mut position, mut facing, tuning) in agents.iter_mut() {
        let mut casts = Vec::new();
        let mut ctx = AgentContext {
            agent: entity,
            position: &mut position.0,
            facing: &mut facing,
            target: None,
            tuning,
            dt: 0.0,
            casts: &mut casts,
        };

        if machine.set_active(BehaviorKind::Patrol, &mut ctx) {
            changes.write(BehaviorChanged {
                agent: entity,
                from: None,
                to: Some(BehaviorKind::Patrol),
            });
        }

        let has_target = agent.target.is_some_and(|target| targets.contains(target));
        if !has_target {
            crate::logger::log_error(&ConfigError::MissingTarget { agent: entity }.to_string());
            commands.entity(entity).insert(Misconfigured);
        }
    }
}

/// Система: per-tick update всех агентов
///
/// Порядок: по SpawnOrder (порядок спавна). Переход применяется синхронно
/// внутри update своего агента, без отложенной очереди. Касты Attack
/// превращаются в projectiles здесь же (через Commands).
pub fn tick_agents(
    mut commands: Commands,
    clock: Res<SimClock>,
    mut agents: Query<
        (
            Entity,
            &SpawnOrder,
            &Agent,
            &mut StateMachine,
            &mut Position,
            &mut Facing,
            &AgentTuning,
            &ProjectileTuning,
        ),
        (Without<Misconfigured>, Without<Dead>),
    >,
    targets: Query<&Position, (With<Target>, Without<Agent>)>,
    mut changes: EventWriter<BehaviorChanged>,
    mut fired: EventWriter<ProjectileFired>,
) {
    let dt = clock.delta();

    let mut ordered: Vec<_> = agents.iter_mut().collect();
    ordered.sort_by_key(|(_, order, ..)| **order);

    let mut casts: Vec<CastRequest> = Vec::new();

    for (entity, _, agent, mut machine, mut position, mut facing, tuning, spell) in ordered {
        // target мог исчезнуть (despawn снаружи): тогда просто стоим
        let target = agent
            .target
            .and_then(|target| targets.get(target).ok())
            .map(|position| position.0);

        casts.clear();
        let mut ctx = AgentContext {
            agent: entity,
            position: &mut position.0,
            facing: &mut facing,
            target,
            tuning,
            dt,
            casts: &mut casts,
        };

        if let Some(transition) = machine.tick(&mut ctx) {
            crate::logger::log(&format!(
                "AI: {:?} {} → {}",
                entity,
                transition.from.name(),
                transition.to.name()
            ));
            changes.write(BehaviorChanged {
                agent: entity,
                from: Some(transition.from),
                to: Some(transition.to),
            });
        }

        for cast in casts.iter() {
            let projectile = Projectile::aimed(entity, cast.origin, cast.aim, spell);
            let direction = projectile.direction();
            let id = commands
                .spawn((projectile, Position(cast.origin), Faction::Enemy))
                .id();

            fired.write(ProjectileFired {
                shooter: entity,
                projectile: id,
                origin: cast.origin,
                direction,
            });
        }
    }
}

/// Observer: StateMachine удаляется (despawn агента или ручной remove)
///
/// Активный behavior обязан получить Exit() до удаления, иначе окно атаки
/// останется открытым.
pub fn exit_behavior_on_remove(
    trigger: Trigger<OnRemove, StateMachine>,
    mut agents: Query<(&mut StateMachine, &mut Position, &mut Facing, &AgentTuning)>,
    mut changes: EventWriter<BehaviorChanged>,
) {
    let entity = trigger.target();
    let Ok((mut machine, mut position, mut facing, tuning)) = agents.get_mut(entity) else {
        return;
    };

    let mut casts = Vec::new();
    let mut ctx = AgentContext {
        agent: entity,
        position: &mut position.0,
        facing: &mut facing,
        target: None,
        tuning,
        dt: 0.0,
        casts: &mut casts,
    };

    if let Some(previous) = machine.shutdown(&mut ctx) {
        changes.write(BehaviorChanged {
            agent: entity,
            from: Some(previous),
            to: None,
        });
    }
}
