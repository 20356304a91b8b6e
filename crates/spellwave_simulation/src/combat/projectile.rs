//! Spell projectiles
//!
//! Projectile это самостоятельная entity, после спавна ни от кого не зависит
//! (стрелявший агент может умереть раньше). Направление фиксируется один раз
//! при спавне (без homing). Уничтожается по первому из:
//! - попадание в target → урон ровно один раз
//! - столкновение с любым Body чужой фракции → без эффекта
//! - истечение lifetime
//!
//! Коллизия проверяется по отрезку движения за шаг (swept), так что быстрый
//! снаряд или большой dt не проскакивают сквозь target/стену. Побеждает
//! первый контакт вдоль отрезка.

use bevy::prelude::*;

use crate::components::{Body, Faction, Position};
use crate::config::ProjectileTuning;
use crate::target::{Target, TargetHit};
use crate::{SimClock, TIMER_EPSILON};

/// Projectile state.
#[derive(Component, Debug, Clone, PartialEq)]
pub struct Projectile {
    /// Кто выстрелил (только атрибуция, не владение)
    shooter: Entity,
    /// Unit direction, fixed at spawn
    direction: Vec2,
    speed: f32,
    damage: u32,
    remaining_lifetime: f32,
    radius: f32,
    /// Уже уничтожен в этом шаге (despawn отложен через Commands)
    spent: bool,
}

impl Projectile {
    /// Initialize toward `aim`: direction computed once, lifetime starts.
    ///
    /// Если `aim == origin`, направление нулевое: снаряд стоит и истекает по lifetime.
    pub fn aimed(shooter: Entity, origin: Vec2, aim: Vec2, tuning: &ProjectileTuning) -> Self {
        Self {
            shooter,
            direction: (aim - origin).normalize_or_zero(),
            speed: tuning.speed,
            damage: tuning.damage,
            remaining_lifetime: tuning.lifetime,
            radius: tuning.radius,
            spent: false,
        }
    }

    pub fn shooter(&self) -> Entity {
        self.shooter
    }

    pub fn direction(&self) -> Vec2 {
        self.direction
    }

    pub fn damage(&self) -> u32 {
        self.damage
    }

    pub fn remaining_lifetime(&self) -> f32 {
        self.remaining_lifetime
    }

    pub fn is_spent(&self) -> bool {
        self.spent
    }

    /// Moves along the fixed direction at constant speed.
    pub fn advance(&self, position: &mut Vec2, dt: f32) {
        *position += self.direction * self.speed * dt;
    }

    /// Counts the lifetime down; `true` once it is used up.
    pub fn tick_lifetime(&mut self, dt: f32) -> bool {
        self.remaining_lifetime -= dt;
        self.remaining_lifetime <= TIMER_EPSILON
    }

    /// Marks the projectile spent; returns `false` if it already was.
    pub fn consume(&mut self) -> bool {
        !std::mem::replace(&mut self.spent, true)
    }

    /// First contact with a body along the step `from → to`.
    ///
    /// Возвращает долю отрезка `0..=1` в момент касания, `None` если мимо.
    pub fn sweep(&self, from: Vec2, to: Vec2, other: Vec2, other_radius: f32) -> Option<f32> {
        let reach = self.radius + other_radius;
        let offset = from - other;
        let c = offset.length_squared() - reach * reach;
        if c <= 0.0 {
            return Some(0.0);
        }

        let path = to - from;
        let a = path.length_squared();
        if a <= f32::EPSILON {
            return None;
        }

        let b = offset.dot(path);
        let discriminant = b * b - a * c;
        if b >= 0.0 || discriminant < 0.0 {
            return None;
        }

        let t = (-b - discriminant.sqrt()) / a;
        (t <= 1.0).then_some(t)
    }
}

/// Why a projectile left the world.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectileEnd {
    HitTarget,
    Blocked,
    Expired,
}

/// Event: агент скастовал projectile (для SFX/VFX снаружи)
#[derive(Event, Debug, Clone, PartialEq)]
pub struct ProjectileFired {
    pub shooter: Entity,
    pub projectile: Entity,
    pub origin: Vec2,
    pub direction: Vec2,
}

/// Event: projectile уничтожен
#[derive(Event, Debug, Clone, PartialEq)]
pub struct ProjectileDestroyed {
    pub projectile: Entity,
    pub position: Vec2,
    pub reason: ProjectileEnd,
}

/// Система: движение, коллизии, lifetime
///
/// Порядок на projectile: move → collision → lifetime. Попадание и истечение
/// в одном шаге: засчитывается попадание.
pub fn advance_projectiles(
    mut commands: Commands,
    clock: Res<SimClock>,
    mut projectiles: Query<(Entity, &mut Projectile, &mut Position, &Faction)>,
    bodies: Query<(Entity, &Position, &Body, &Faction, Has<Target>), Without<Projectile>>,
    mut hits: EventWriter<TargetHit>,
    mut destroyed: EventWriter<ProjectileDestroyed>,
) {
    let dt = clock.delta();

    for (entity, mut projectile, mut position, faction) in projectiles.iter_mut() {
        if projectile.is_spent() {
            continue;
        }

        let from = position.0;
        projectile.advance(&mut position.0, dt);
        let to = position.0;

        // Ближайший контакт вдоль шага; при равенстве target важнее стены.
        // Своя фракция прозрачна (enemy vs enemy не блокирует)
        let mut contact: Option<(f32, Option<Entity>)> = None;
        for (body_entity, body_position, body, body_faction, is_target) in bodies.iter() {
            if body_faction == faction {
                continue;
            }
            let Some(t) = projectile.sweep(from, to, body_position.0, body.radius) else {
                continue;
            };
            let struck = is_target.then_some(body_entity);
            let closer = match contact {
                None => true,
                Some((best, best_target)) => t < best || (t == best && best_target.is_none() && struck.is_some()),
            };
            if closer {
                contact = Some((t, struck));
            }
        }

        let (struck_target, blocked) = match contact {
            Some((t, struck)) => {
                position.0 = from.lerp(to, t);
                (struck, struck.is_none())
            }
            None => (None, false),
        };

        let end = if let Some(target) = struck_target {
            hits.write(TargetHit {
                target,
                shooter: projectile.shooter(),
                projectile: entity,
                damage: projectile.damage(),
            });
            Some(ProjectileEnd::HitTarget)
        } else if blocked {
            Some(ProjectileEnd::Blocked)
        } else if projectile.tick_lifetime(dt) {
            Some(ProjectileEnd::Expired)
        } else {
            None
        };

        let Some(reason) = end else {
            continue;
        };

        if projectile.consume() {
            crate::logger::log(&format!("🎯 Projectile {:?} ended: {:?}", entity, reason));
            destroyed.write(ProjectileDestroyed {
                projectile: entity,
                position: position.0,
                reason,
            });
            commands.entity(entity).despawn();
        }
    }
}
