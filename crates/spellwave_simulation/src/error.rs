//! Configuration errors
//!
//! Единственный класс ошибок в симуляции: всё локально и детерминировано,
//! retry не бывает. Ошибка фатальна только для затронутого агента/спавнера.

use bevy::prelude::Entity;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// Agent spawned without a target (or the target entity has no position)
    #[error("agent {agent:?} has no target to track")]
    MissingTarget { agent: Entity },

    /// Behavior table slot holds a behavior of the wrong kind
    #[error("behavior table slot for {kind:?} is not wired")]
    MissingBehavior { kind: crate::ai::BehaviorKind },

    #[error("wave spawner has no spawn points")]
    EmptySpawnPoints,

    #[error("wave spawner has no waves configured")]
    NoWaves,

    /// Wave references an enemy template that is not in the template table
    #[error("wave {wave_index} references unknown enemy template `{template}`")]
    MissingTemplate { wave_index: usize, template: String },

    #[error("scenario parse error: {0}")]
    Parse(#[from] toml::de::Error),
}
