//! Wave spawner ECS glue: per-tick scheduling + death subscriptions.

use bevy::prelude::*;

use crate::agent::spawn_agent;
use crate::combat::AgentDied;
use crate::components::SpawnCounter;
use crate::config::WaveSpawnerConfig;
use crate::error::ConfigError;
use crate::spawner::WaveSpawner;
use crate::{DeterministicRng, SimClock};

/// Event: волна начала спавниться
#[derive(Event, Debug, Clone, PartialEq)]
pub struct WaveStarted {
    pub spawner: Entity,
    pub wave_index: usize,
    /// 1-based running wave number (не сбрасывается при wrap)
    pub wave_number: u32,
}

/// Event: все агенты волны заспавнены
#[derive(Event, Debug, Clone, PartialEq)]
pub struct WaveCompleted {
    pub spawner: Entity,
    pub wave_index: usize,
    pub next_wave_index: usize,
}

#[derive(Event, Debug, Clone, PartialEq)]
pub struct AgentSpawned {
    pub spawner: Entity,
    pub agent: Entity,
    pub wave_index: usize,
    pub position: Vec2,
}

/// Validates the config and spawns a spawner entity.
pub fn spawn_wave_spawner(
    commands: &mut Commands,
    config: WaveSpawnerConfig,
    target: Option<Entity>,
    ledger: Option<Entity>,
) -> Result<Entity, ConfigError> {
    let spawner = WaveSpawner::new(config)?.with_target(target, ledger);
    Ok(commands.spawn(spawner).id())
}

/// Система: шаг всех спавнеров
///
/// Каждый заспавненный агент сразу получает observer на AgentDied, который
/// уменьшает live count своего спавнера (синхронно, в тике смерти).
/// Observer живёт на агенте и уходит вместе с ним.
pub fn tick_wave_spawners(
    mut commands: Commands,
    clock: Res<SimClock>,
    mut rng: ResMut<DeterministicRng>,
    mut counter: ResMut<SpawnCounter>,
    mut spawners: Query<(Entity, &mut WaveSpawner)>,
    mut started: EventWriter<WaveStarted>,
    mut completed: EventWriter<WaveCompleted>,
    mut spawned: EventWriter<AgentSpawned>,
) {
    let dt = clock.delta();

    for (spawner_entity, mut spawner) in spawners.iter_mut() {
        let output = spawner.tick(dt, &mut rng.rng);

        if let Some(wave_index) = output.started {
            crate::logger::log_info(&format!(
                "🌊 Wave {} started (index {})",
                spawner.waves_started(),
                wave_index
            ));
            started.write(WaveStarted {
                spawner: spawner_entity,
                wave_index,
                wave_number: spawner.waves_started(),
            });
        }

        if let Some(request) = output.spawn {
            let agent = spawn_agent(
                &mut commands,
                counter.next(),
                &request.template,
                request.position,
                spawner.target(),
                spawner.ledger(),
            );

            commands.entity(agent).observe(
                move |_trigger: Trigger<AgentDied>, mut spawners: Query<&mut WaveSpawner>| {
                    if let Ok(mut spawner) = spawners.get_mut(spawner_entity) {
                        spawner.on_agent_died();
                    }
                },
            );

            crate::logger::log(&format!(
                "✨ Spawned {:?} at ({:.1}, {:.1}), alive: {}",
                agent,
                request.position.x,
                request.position.y,
                spawner.remaining_alive()
            ));
            spawned.write(AgentSpawned {
                spawner: spawner_entity,
                agent,
                wave_index: request.wave_index,
                position: request.position,
            });
        }

        if let Some((wave_index, next_wave_index)) = output.completed {
            crate::logger::log_info(&format!(
                "✅ Wave index {} fully spawned, next: {}",
                wave_index, next_wave_index
            ));
            completed.write(WaveCompleted {
                spawner: spawner_entity,
                wave_index,
                next_wave_index,
            });
        }
    }
}
