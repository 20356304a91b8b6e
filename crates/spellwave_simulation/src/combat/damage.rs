//! Agent damage + death
//!
//! Внешний атакующий (оружие игрока) шлёт `AgentHit`; здесь применяем урон,
//! уведомляем ledger (AddDamage / AddKill) и один раз объявляем смерть.

use bevy::prelude::*;

use crate::agent::Agent;
use crate::components::{Health, Position};
use crate::target::{CombatLedger, CombatStats, StatsChanged};

/// Request: damage an agent (TakeDamage).
#[derive(Event, Debug, Clone, PartialEq)]
pub struct AgentHit {
    pub agent: Entity,
    pub amount: u32,
}

/// Событие: агент получил урон
///
/// Для health bar / hit flash снаружи.
#[derive(Event, Debug, Clone, PartialEq)]
pub struct AgentDamaged {
    pub agent: Entity,
    pub amount: u32,
    pub remaining: u32,
    /// Normalized health after the hit
    pub health_fraction: f32,
}

/// Death notification: ровно один раз на агента.
///
/// Публикуется двумя путями: entity trigger на самом агенте (подписчики,
/// например WaveSpawner, цепляют observer к агенту) и обычный Event для
/// всех остальных.
#[derive(Event, Debug, Clone, PartialEq)]
pub struct AgentDied {
    pub agent: Entity,
    pub position: Vec2,
}

/// Компонент-маркер: агент мёртв (ждёт despawn в этом же шаге)
#[derive(Component, Debug)]
pub struct Dead;

/// Outcome of applying one hit to a health pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitOutcome {
    /// Уже мёртв: урон игнорируется
    Ignored,
    Damaged,
    Killed,
}

/// TakeDamage на голом Health: повторный урон после смерти игнорируется.
pub fn take_damage(health: &mut Health, amount: u32) -> HitOutcome {
    if !health.is_alive() {
        return HitOutcome::Ignored;
    }

    health.take_damage(amount);

    if health.is_alive() {
        HitOutcome::Damaged
    } else {
        HitOutcome::Killed
    }
}

/// Система: применение AgentHit
///
/// 1. Health -= amount (clamp 0), ledger.add_damage(amount)
/// 2. Если health == 0 → Die(): ledger.add_kill(), AgentDied (trigger + event), despawn
///
/// Despawn идёт через Commands; Exit() активного behavior вызывает
/// `exit_behavior_on_remove` observer.
pub fn apply_agent_hits(
    mut commands: Commands,
    mut hits: EventReader<AgentHit>,
    mut agents: Query<(&Agent, &mut Health, &Position), Without<Dead>>,
    mut ledgers: Query<&mut CombatStats>,
    mut damaged: EventWriter<AgentDamaged>,
    mut died: EventWriter<AgentDied>,
    mut stats_changed: EventWriter<StatsChanged>,
) {
    for hit in hits.read() {
        let Ok((agent, mut health, position)) = agents.get_mut(hit.agent) else {
            continue;
        };

        let outcome = take_damage(&mut health, hit.amount);
        if outcome == HitOutcome::Ignored {
            continue;
        }

        crate::logger::log(&format!(
            "💥 {:?} took {} damage (HP: {}/{})",
            hit.agent, hit.amount, health.current, health.max
        ));

        damaged.write(AgentDamaged {
            agent: hit.agent,
            amount: hit.amount,
            remaining: health.current,
            health_fraction: health.fraction(),
        });

        let mut ledger = agent.ledger.and_then(|ledger| ledgers.get_mut(ledger).ok());

        if let Some(stats) = ledger.as_mut() {
            stats.add_damage(hit.amount);
            stats_changed.write(StatsChanged { stats: **stats });
        }

        if outcome == HitOutcome::Killed {
            if let Some(stats) = ledger.as_mut() {
                stats.add_kill();
                stats_changed.write(StatsChanged { stats: **stats });
            }

            let event = AgentDied {
                agent: hit.agent,
                position: position.0,
            };

            commands.entity(hit.agent).insert(Dead);
            commands.trigger_targets(event.clone(), hit.agent);
            commands.entity(hit.agent).despawn();
            died.write(event);

            crate::logger::log_info(&format!("☠️ Agent {:?} died", hit.agent));
        }
    }
}
