//! Target damage systems.

use bevy::prelude::*;

use crate::combat::{take_damage, HitOutcome};
use crate::components::Health;
use crate::target::{CombatStats, Target};

/// Event: projectile попал в target (урон ещё не применён)
#[derive(Event, Debug, Clone, PartialEq)]
pub struct TargetHit {
    pub target: Entity,
    pub shooter: Entity,
    pub projectile: Entity,
    pub damage: u32,
}

/// Event: target получил урон
#[derive(Event, Debug, Clone, PartialEq)]
pub struct TargetDamaged {
    pub target: Entity,
    pub amount: u32,
    pub remaining: u32,
}

/// Event: target умер (ровно один раз)
#[derive(Event, Debug, Clone, PartialEq)]
pub struct TargetDied {
    pub target: Entity,
}

/// Event: CombatStats изменились (для внешнего uploader/HUD)
#[derive(Event, Debug, Clone, PartialEq)]
pub struct StatsChanged {
    pub stats: CombatStats,
}

/// Система: применение TargetHit
///
/// Target не despawn'ится при смерти (это решает внешний game flow);
/// попадания после смерти игнорируются.
pub fn apply_target_hits(
    mut hits: EventReader<TargetHit>,
    mut targets: Query<&mut Health, With<Target>>,
    mut damaged: EventWriter<TargetDamaged>,
    mut died: EventWriter<TargetDied>,
) {
    for hit in hits.read() {
        let Ok(mut health) = targets.get_mut(hit.target) else {
            continue;
        };

        let outcome = take_damage(&mut health, hit.damage);
        if outcome == HitOutcome::Ignored {
            continue;
        }

        crate::logger::log(&format!(
            "🔥 Target {:?} hit by {:?} for {} (HP: {}/{})",
            hit.target, hit.shooter, hit.damage, health.current, health.max
        ));

        damaged.write(TargetDamaged {
            target: hit.target,
            amount: hit.damage,
            remaining: health.current,
        });

        if outcome == HitOutcome::Killed {
            crate::logger::log_warning(&format!("💀 Target {:?} is down", hit.target));
            died.write(TargetDied { target: hit.target });
        }
    }
}
