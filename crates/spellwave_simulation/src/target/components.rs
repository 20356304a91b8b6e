//! Target (player) + obstacles + combat stats.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::components::{Body, Faction, Health, Position};
use crate::config::{ObstacleConfig, TargetTuning};

/// Компонент-маркер: единственная цель агентов (игрок)
///
/// Позиция для агентов read-only; пишет в target только TakeDamage.
#[derive(Component, Debug, Clone, Copy, Default)]
#[require(Position, Health, Body)]
pub struct Target;

/// Компонент-маркер: стена/ящик, блокирует projectiles
#[derive(Component, Debug, Clone, Copy, Default)]
#[require(Position, Body)]
pub struct Obstacle;

/// Kill/damage accounting collaborator.
///
/// Вызывается агентом: AddDamage на каждый полученный урон, AddKill на смерть.
pub trait CombatLedger {
    fn add_kill(&mut self);
    fn add_damage(&mut self, amount: u32);
}

/// Combat stats of one player.
///
/// Сериализуется в форму, которую ждёт внешний uploader:
/// `{ playerId, enemiesDefeated, damageDealt }`.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CombatStats {
    pub player_id: u32,
    pub enemies_defeated: u32,
    pub damage_dealt: u32,
}

impl CombatStats {
    pub fn new(player_id: u32) -> Self {
        Self {
            player_id,
            ..default()
        }
    }
}

impl CombatLedger for CombatStats {
    fn add_kill(&mut self) {
        self.enemies_defeated += 1;
    }

    fn add_damage(&mut self, amount: u32) {
        self.damage_dealt = self.damage_dealt.saturating_add(amount);
    }
}

/// Components of the target: health, body, stats ledger.
pub fn target_bundle(tuning: &TargetTuning) -> impl Bundle {
    (
        Target,
        Position(Vec2::from_array(tuning.position)),
        Health::new(tuning.health),
        Body::new(tuning.body_radius),
        Faction::Player,
        CombatStats::new(tuning.player_id),
    )
}

pub fn obstacle_bundle(config: &ObstacleConfig) -> impl Bundle {
    (
        Obstacle,
        Position(Vec2::from_array(config.position)),
        Body::new(config.radius),
        Faction::Environment,
    )
}
