//! Tests for spell projectiles.

use bevy::prelude::*;

use crate::combat::{Projectile, ProjectileDestroyed, ProjectileEnd};
use crate::components::{Body, Faction, Health, Position};
use crate::config::{ObstacleConfig, ProjectileTuning, TargetTuning};
use crate::target::{obstacle_bundle, target_bundle, TargetHit};
use crate::{create_headless_app, step, EventLog};

fn setup() -> (App, Entity) {
    let mut app = create_headless_app(3);
    let target = app.world_mut().spawn(target_bundle(&TargetTuning::default())).id();
    (app, target)
}

fn fire(app: &mut App, origin: Vec2, aim: Vec2, tuning: &ProjectileTuning) -> Entity {
    let projectile = Projectile::aimed(Entity::PLACEHOLDER, origin, aim, tuning);
    app.world_mut()
        .spawn((projectile, Position(origin), Faction::Enemy))
        .id()
}

/// Шаги + накопленные события полёта
#[derive(Default)]
struct Flight {
    destroyed: EventLog<ProjectileDestroyed>,
    hits: EventLog<TargetHit>,
}

impl Flight {
    fn step(&mut self, app: &mut App, dt: f32) {
        step(app.world_mut(), dt);
        self.destroyed.record(app.world());
        self.hits.record(app.world());
    }

    fn run(&mut self, app: &mut App, steps: usize, dt: f32) {
        for _ in 0..steps {
            self.step(app, dt);
        }
    }

    fn ends(&self) -> Vec<ProjectileEnd> {
        self.destroyed.entries().iter().map(|end| end.reason).collect()
    }
}

/// Сколько шагов `dt` живёт снаряд, летящий в пустоту
fn steps_until_expired(dt: f32) -> usize {
    let (mut app, _) = setup();
    let projectile = fire(
        &mut app,
        Vec2::new(0.0, 10.0),
        Vec2::new(0.0, 20.0),
        &ProjectileTuning::default(),
    );

    let mut flight = Flight::default();
    let mut steps = 0;
    while app.world().get_entity(projectile).is_ok() && steps < 1000 {
        flight.step(&mut app, dt);
        steps += 1;
    }

    assert_eq!(flight.ends(), vec![ProjectileEnd::Expired]);
    steps
}

#[test]
fn test_direction_fixed_at_spawn() {
    let tuning = ProjectileTuning::default();
    let projectile = Projectile::aimed(Entity::PLACEHOLDER, Vec2::ZERO, Vec2::new(3.0, 4.0), &tuning);

    assert!((projectile.direction() - Vec2::new(0.6, 0.8)).length() < 1e-6);
    assert_eq!(projectile.remaining_lifetime(), 3.0);

    // aim == origin → нулевое направление, снаряд стоит
    let idle = Projectile::aimed(Entity::PLACEHOLDER, Vec2::ONE, Vec2::ONE, &tuning);
    assert_eq!(idle.direction(), Vec2::ZERO);
}

#[test]
fn test_expires_once_at_lifetime() {
    let (mut app, _) = setup();
    // Летит от target, ни во что не попадает
    let projectile = fire(
        &mut app,
        Vec2::new(0.0, 10.0),
        Vec2::new(0.0, 20.0),
        &ProjectileTuning::default(),
    );
    let mut flight = Flight::default();

    flight.run(&mut app, 5, 0.5);
    assert!(app.world().get_entity(projectile).is_ok(), "alive before t=3.0");
    assert!(flight.destroyed.is_empty());

    flight.step(&mut app, 0.5);
    assert!(app.world().get_entity(projectile).is_err(), "gone at t=3.0");

    flight.run(&mut app, 3, 0.5);
    assert_eq!(flight.ends(), vec![ProjectileEnd::Expired]);
    assert!(flight.hits.is_empty());
}

#[test]
fn test_expiry_does_not_drift_with_small_steps() {
    // 0.1 и 1/60 не представимы точно в f32: сумма dt не должна опоздать на тик
    assert_eq!(steps_until_expired(0.1), 30);
    assert_eq!(steps_until_expired(1.0 / 60.0), 180);
}

#[test]
fn test_hits_target_exactly_once() {
    let (mut app, target) = setup();
    let projectile = fire(&mut app, Vec2::new(2.0, 0.0), Vec2::ZERO, &ProjectileTuning::default());
    let mut flight = Flight::default();

    flight.run(&mut app, 10, 0.1);

    assert!(app.world().get_entity(projectile).is_err());
    assert_eq!(flight.hits.len(), 1);

    let health = app.world().get::<Health>(target).expect("target stays in world");
    assert_eq!(health.current, 9);
    assert_eq!(flight.ends(), vec![ProjectileEnd::HitTarget]);
}

#[test]
fn test_obstacle_blocks_without_damage() {
    let (mut app, target) = setup();
    app.world_mut().spawn(obstacle_bundle(&ObstacleConfig {
        position: [1.0, 0.0],
        radius: 0.5,
    }));
    fire(&mut app, Vec2::new(3.0, 0.0), Vec2::ZERO, &ProjectileTuning::default());
    let mut flight = Flight::default();

    flight.run(&mut app, 10, 0.1);

    assert_eq!(flight.ends(), vec![ProjectileEnd::Blocked]);
    assert!(flight.hits.is_empty());
    assert_eq!(app.world().get::<Health>(target).map(|h| h.current), Some(10));
}

#[test]
fn test_same_faction_body_is_transparent() {
    let (mut app, target) = setup();
    // Другой враг на линии огня
    app.world_mut()
        .spawn((Position::new(1.0, 0.0), Body::new(0.5), Faction::Enemy));
    fire(&mut app, Vec2::new(3.0, 0.0), Vec2::ZERO, &ProjectileTuning::default());
    let mut flight = Flight::default();

    flight.run(&mut app, 10, 0.1);

    assert_eq!(flight.hits.len(), 1);
    assert_eq!(app.world().get::<Health>(target).map(|h| h.current), Some(9));
}

#[test]
fn test_hit_wins_over_expiry_on_same_tick() {
    let (mut app, _) = setup();
    let tuning = ProjectileTuning {
        lifetime: 0.3,
        ..default()
    };
    fire(&mut app, Vec2::new(2.0, 0.0), Vec2::ZERO, &tuning);
    let mut flight = Flight::default();

    flight.run(&mut app, 3, 0.1);

    assert_eq!(flight.ends(), vec![ProjectileEnd::HitTarget]);
    assert_eq!(flight.hits.len(), 1);
}

#[test]
fn test_collision_at_one_point_two_seconds() {
    let (mut app, target) = setup();
    // Касание (0.75 = 0.5 + 0.25) между 1.1s и 1.2s полёта
    let projectile = fire(&mut app, Vec2::new(6.6, 0.0), Vec2::ZERO, &ProjectileTuning::default());
    let mut flight = Flight::default();

    flight.run(&mut app, 11, 0.1);
    assert!(app.world().get_entity(projectile).is_ok());
    assert!(flight.hits.is_empty());

    flight.step(&mut app, 0.1);
    assert!(app.world().get_entity(projectile).is_err());
    assert_eq!(flight.hits.len(), 1);

    flight.run(&mut app, 30, 0.1);
    assert_eq!(flight.hits.len(), 1);
    assert_eq!(app.world().get::<Health>(target).map(|h| h.current), Some(9));
}

#[test]
fn test_fast_projectile_does_not_pass_through_target() {
    let (mut app, target) = setup();
    let tuning = ProjectileTuning {
        speed: 100.0,
        ..default()
    };
    // За один шаг 10 единиц: из 6.0 в -4.0, сквозь target
    fire(&mut app, Vec2::new(6.0, 0.0), Vec2::ZERO, &tuning);
    let mut flight = Flight::default();

    flight.step(&mut app, 0.1);

    assert_eq!(flight.ends(), vec![ProjectileEnd::HitTarget]);
    assert_eq!(flight.hits.len(), 1);
    assert_eq!(app.world().get::<Health>(target).map(|h| h.current), Some(9));

    // Остановлен в точке касания, а не за target
    let end = flight.destroyed.entries()[0].position;
    assert!((end - Vec2::new(0.75, 0.0)).length() < 1e-4, "end at {:?}", end);
}

#[test]
fn test_first_contact_along_step_wins() {
    let (mut app, target) = setup();
    app.world_mut().spawn(obstacle_bundle(&ObstacleConfig {
        position: [3.0, 0.0],
        radius: 0.5,
    }));
    let tuning = ProjectileTuning {
        speed: 100.0,
        ..default()
    };
    // Один шаг пересекает и стену, и target: стена ближе
    fire(&mut app, Vec2::new(6.0, 0.0), Vec2::ZERO, &tuning);
    let mut flight = Flight::default();

    flight.step(&mut app, 0.1);

    assert_eq!(flight.ends(), vec![ProjectileEnd::Blocked]);
    assert!(flight.hits.is_empty());
    assert_eq!(app.world().get::<Health>(target).map(|h| h.current), Some(10));
}
