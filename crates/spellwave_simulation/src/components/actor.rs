//! Базовые компоненты акторов: Health, Faction, Body

use bevy::prelude::*;

/// Здоровье
///
/// Инвариант: 0 ≤ current ≤ max (урон насыщается на нуле)
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Reflect)]
#[reflect(Component)]
pub struct Health {
    pub current: u32,
    pub max: u32,
}

impl Default for Health {
    fn default() -> Self {
        Self::new(3)
    }
}

impl Health {
    pub fn new(max: u32) -> Self {
        Self { current: max, max }
    }

    pub fn is_alive(&self) -> bool {
        self.current > 0
    }

    /// Applies damage and returns how much was actually removed.
    pub fn take_damage(&mut self, amount: u32) -> u32 {
        let applied = amount.min(self.current);
        self.current -= applied;
        applied
    }

    /// Normalized health for external health bars.
    pub fn fraction(&self) -> f32 {
        if self.max == 0 {
            return 0.0;
        }
        (self.current as f32 / self.max as f32).clamp(0.0, 1.0)
    }
}

/// Faction: projectiles pass through bodies of their own faction.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect)]
#[reflect(Component)]
pub enum Faction {
    /// Player side (the target)
    Player,
    /// Spawned agents and their spells
    Enemy,
    /// Walls, props
    Environment,
}

/// Blocking circle collider.
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub struct Body {
    pub radius: f32,
}

impl Body {
    pub fn new(radius: f32) -> Self {
        Self { radius }
    }
}

impl Default for Body {
    fn default() -> Self {
        Self { radius: 0.5 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_damage() {
        let mut health = Health::new(3);
        assert_eq!(health.current, 3);

        assert_eq!(health.take_damage(1), 1);
        assert_eq!(health.current, 2);
        assert!(health.is_alive());

        // Saturating: никогда не уходим в минус
        assert_eq!(health.take_damage(10), 2);
        assert_eq!(health.current, 0);
        assert!(!health.is_alive());

        assert_eq!(health.take_damage(1), 0);
        assert_eq!(health.current, 0);
    }

    #[test]
    fn test_health_fraction() {
        let mut health = Health::new(4);
        health.take_damage(1);
        assert_eq!(health.fraction(), 0.75);

        assert_eq!(Health { current: 0, max: 0 }.fraction(), 0.0);
    }
}
