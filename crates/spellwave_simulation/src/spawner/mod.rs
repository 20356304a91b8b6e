//! Spawner domain: волны агентов
//!
//! WaveSpawner держит счётчик живых агентов своей волны: следующий countdown
//! не тикает, пока кто-то из них жив.

use bevy::prelude::*;

use crate::{SimEventAppExt, SimSet, SimulationStep};

pub mod systems;
pub mod wave_spawner;


pub use systems::*;
pub use wave_spawner::*;

pub struct SpawnerPlugin;

impl Plugin for SpawnerPlugin {
    fn build(&self, app: &mut App) {
        app.add_sim_event::<WaveStarted>()
            .add_sim_event::<WaveCompleted>()
            .add_sim_event::<AgentSpawned>();

        app.add_systems(SimulationStep, tick_wave_spawners.in_set(SimSet::Spawning));
    }
}
