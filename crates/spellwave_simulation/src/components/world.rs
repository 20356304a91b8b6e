//! World positioning компоненты: Position, Facing, SpawnOrder
//!
//! Мир двумерный (top-down). Позиция: единственный источник правды,
//! внешний рендер только читает её.

use bevy::prelude::*;

/// World position (2D).
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct Position(pub Vec2);

impl Position {
    pub fn new(x: f32, y: f32) -> Self {
        Self(Vec2::new(x, y))
    }

    pub fn distance(&self, other: Vec2) -> f32 {
        self.0.distance(other)
    }
}

/// Horizontal facing (sprite flip on the rendering side).
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Eq, Reflect)]
#[reflect(Component)]
pub enum Facing {
    Left,
    #[default]
    Right,
}

impl Facing {
    /// Face toward `target` from `from` (ties face right).
    pub fn toward(from: Vec2, target: Vec2) -> Self {
        if target.x < from.x {
            Facing::Left
        } else {
            Facing::Right
        }
    }

    pub fn sign(&self) -> f32 {
        match self {
            Facing::Left => -1.0,
            Facing::Right => 1.0,
        }
    }
}

/// Monotonic spawn index: agents tick in this order.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Reflect)]
#[reflect(Component)]
pub struct SpawnOrder(pub u64);

/// Resource: next spawn index.
#[derive(Resource, Debug, Default)]
pub struct SpawnCounter {
    next: u64,
}

impl SpawnCounter {
    pub fn next(&mut self) -> SpawnOrder {
        let order = SpawnOrder(self.next);
        self.next += 1;
        order
    }
}
