//! Tests for agent damage + death.

use bevy::prelude::*;

use crate::agent::agent_bundle;
use crate::ai::{BehaviorChanged, BehaviorKind};
use crate::combat::{take_damage, AgentDamaged, AgentDied, AgentHit, HitOutcome};
use crate::components::{Health, SpawnOrder};
use crate::config::{AgentTemplate, TargetTuning};
use crate::target::{target_bundle, CombatStats, StatsChanged};
use crate::{create_headless_app, step};

const DT: f32 = 0.1;

fn setup() -> (App, Entity) {
    let mut app = create_headless_app(7);
    let target = app.world_mut().spawn(target_bundle(&TargetTuning::default())).id();
    (app, target)
}

/// Агент далеко от target: стоит в Patrol, не стреляет.
fn spawn_idle_agent(app: &mut App, target: Entity, order: u64) -> Entity {
    app.world_mut()
        .spawn(agent_bundle(
            SpawnOrder(order),
            &AgentTemplate::default(),
            Vec2::new(20.0, 0.0),
            Some(target),
            Some(target),
        ))
        .id()
}

fn hit(app: &mut App, agent: Entity, amount: u32) {
    app.world_mut().send_event(AgentHit { agent, amount });
}

fn collect<E: Event + Clone>(app: &App) -> Vec<E> {
    app.world()
        .resource::<Events<E>>()
        .iter_current_update_events()
        .cloned()
        .collect()
}

#[test]
fn test_take_damage_outcomes() {
    let mut health = Health::new(3);

    assert_eq!(take_damage(&mut health, 1), HitOutcome::Damaged);
    assert_eq!(take_damage(&mut health, 5), HitOutcome::Killed);
    assert_eq!(health.current, 0);
    // Повторный урон по мёртвому
    assert_eq!(take_damage(&mut health, 1), HitOutcome::Ignored);
}

#[test]
fn test_damage_updates_health_and_ledger() {
    let (mut app, target) = setup();
    let agent = spawn_idle_agent(&mut app, target, 0);
    step(app.world_mut(), DT);

    hit(&mut app, agent, 1);
    hit(&mut app, agent, 1);
    step(app.world_mut(), DT);

    let health = app.world().get::<Health>(agent).expect("agent still alive");
    assert_eq!(health.current, 1);

    let stats = app.world().get::<CombatStats>(target).expect("ledger on target");
    assert_eq!(stats.damage_dealt, 2);
    assert_eq!(stats.enemies_defeated, 0);

    let damaged = collect::<AgentDamaged>(&app);
    assert_eq!(damaged.len(), 2);
    assert_eq!(damaged[1].remaining, 1);
    assert!((damaged[1].health_fraction - 1.0 / 3.0).abs() < 1e-6);

    assert!(collect::<AgentDied>(&app).is_empty());
}

#[test]
fn test_death_notifies_once_and_despawns() {
    let (mut app, target) = setup();
    let agent = spawn_idle_agent(&mut app, target, 0);
    step(app.world_mut(), DT);

    // Overkill + лишний удар в том же шаге
    hit(&mut app, agent, 5);
    hit(&mut app, agent, 1);
    step(app.world_mut(), DT);

    assert!(app.world().get_entity(agent).is_err(), "dead agent must be despawned");

    let died = collect::<AgentDied>(&app);
    assert_eq!(died.len(), 1);
    assert_eq!(died[0].agent, agent);
    assert_eq!(died[0].position, Vec2::new(20.0, 0.0));

    let stats = app.world().get::<CombatStats>(target).expect("ledger on target");
    assert_eq!(stats.enemies_defeated, 1);
    assert_eq!(stats.damage_dealt, 5);

    // add_damage + add_kill
    assert_eq!(collect::<StatsChanged>(&app).len(), 2);

    // Exit() активного behavior перед удалением
    let changes = collect::<BehaviorChanged>(&app);
    assert_eq!(
        changes.last(),
        Some(&BehaviorChanged {
            agent,
            from: Some(BehaviorKind::Patrol),
            to: None,
        })
    );
}

#[test]
fn test_death_trigger_reaches_entity_observer() {
    let (mut app, target) = setup();
    let agent = spawn_idle_agent(&mut app, target, 0);
    let bystander = spawn_idle_agent(&mut app, target, 1);

    #[derive(Resource, Default)]
    struct Deaths(Vec<Entity>);
    app.world_mut().init_resource::<Deaths>();
    app.world_mut()
        .entity_mut(agent)
        .observe(|trigger: Trigger<AgentDied>, mut deaths: ResMut<Deaths>| {
            deaths.0.push(trigger.event().agent);
        });

    step(app.world_mut(), DT);
    hit(&mut app, agent, 3);
    hit(&mut app, bystander, 1);
    step(app.world_mut(), DT);

    assert_eq!(app.world().resource::<Deaths>().0, vec![agent]);
    assert!(app.world().get_entity(bystander).is_ok());
}

#[test]
fn test_agent_without_ledger_still_dies() {
    let (mut app, target) = setup();
    let agent = app
        .world_mut()
        .spawn(agent_bundle(
            SpawnOrder(0),
            &AgentTemplate::default(),
            Vec2::new(20.0, 0.0),
            Some(target),
            None,
        ))
        .id();
    step(app.world_mut(), DT);

    hit(&mut app, agent, 3);
    step(app.world_mut(), DT);

    assert_eq!(collect::<AgentDied>(&app).len(), 1);
    assert!(collect::<StatsChanged>(&app).is_empty());
    let stats = app.world().get::<CombatStats>(target).expect("ledger on target");
    assert_eq!(*stats, CombatStats::new(3));
}
