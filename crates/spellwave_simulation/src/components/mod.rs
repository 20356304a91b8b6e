//! ECS Components для игровых entity
//!
//! Организация по доменам:
//! - actor: здоровье, фракция, коллайдер (Health, Faction, Body)
//! - world: позиционирование (Position, Facing, SpawnOrder)

pub mod actor;
pub mod world;

// Re-exports для удобного импорта
pub use actor::*;
pub use world::*;
