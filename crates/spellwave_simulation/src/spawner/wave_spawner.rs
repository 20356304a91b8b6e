//! WaveSpawner state machine (чистая логика, без ECS)
//!
//! Фазы:
//! - WaitingForClear: живые агенты есть → countdown заморожен
//! - Counting: countdown -= dt; на ≤ 0 (с допуском TIMER_EPSILON) стартует волна (в этом же тике)
//! - Spawning: по одному агенту на spawn_interval, первый сразу
//!
//! Live count растёт на каждый заспавненный агент и падает на каждое
//! уведомление о смерти (clamp 0).

use bevy::prelude::*;
use rand::Rng;

use crate::config::{AgentTemplate, WaveSpawnerConfig};
use crate::error::ConfigError;
use crate::TIMER_EPSILON;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpawnerPhase {
    WaitingForClear,
    Counting,
    Spawning,
}

/// One agent to instantiate this tick.
#[derive(Debug, Clone, PartialEq)]
pub struct SpawnRequest {
    pub wave_index: usize,
    pub position: Vec2,
    pub template: AgentTemplate,
}

/// What one spawner tick produced.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct SpawnerOutput {
    /// Wave index that started on this tick
    pub started: Option<usize>,
    pub spawn: Option<SpawnRequest>,
    /// (finished wave, next wave) when the spawn sequence completed
    pub completed: Option<(usize, usize)>,
}

#[derive(Component, Debug, Clone)]
pub struct WaveSpawner {
    waves: Vec<crate::config::Wave>,
    spawn_points: Vec<Vec2>,
    time_between_waves: f32,

    current_wave_index: usize,
    remaining_to_spawn: u32,
    remaining_alive: u32,
    countdown: f32,
    spawn_timer: f32,
    phase: SpawnerPhase,
    /// Сколько волн уже стартовало (для UI: "Wave N")
    waves_started: u32,

    target: Option<Entity>,
    ledger: Option<Entity>,
}

impl WaveSpawner {
    pub fn new(config: WaveSpawnerConfig) -> Result<Self, ConfigError> {
        if config.waves.is_empty() {
            return Err(ConfigError::NoWaves);
        }
        if config.spawn_points.is_empty() {
            return Err(ConfigError::EmptySpawnPoints);
        }

        Ok(Self {
            countdown: config.time_between_waves,
            waves: config.waves,
            spawn_points: config.spawn_points,
            time_between_waves: config.time_between_waves,
            current_wave_index: 0,
            remaining_to_spawn: 0,
            remaining_alive: 0,
            spawn_timer: 0.0,
            phase: SpawnerPhase::Counting,
            waves_started: 0,
            target: None,
            ledger: None,
        })
    }

    /// Target + ledger handed to every spawned agent.
    pub fn with_target(mut self, target: Option<Entity>, ledger: Option<Entity>) -> Self {
        self.target = target;
        self.ledger = ledger;
        self
    }

    pub fn phase(&self) -> SpawnerPhase {
        self.phase
    }

    pub fn current_wave_index(&self) -> usize {
        self.current_wave_index
    }

    pub fn remaining_to_spawn(&self) -> u32 {
        self.remaining_to_spawn
    }

    pub fn remaining_alive(&self) -> u32 {
        self.remaining_alive
    }

    pub fn countdown(&self) -> f32 {
        self.countdown
    }

    pub fn waves_started(&self) -> u32 {
        self.waves_started
    }

    pub fn target(&self) -> Option<Entity> {
        self.target
    }

    pub fn ledger(&self) -> Option<Entity> {
        self.ledger
    }

    /// Death notification from one of the spawned agents.
    pub fn on_agent_died(&mut self) {
        // Дубликаты/поздние уведомления не уводят счётчик в минус
        self.remaining_alive = self.remaining_alive.saturating_sub(1);
    }

    /// Advances the spawner by `dt`. Never spawns more than one agent per call.
    pub fn tick<R: Rng + ?Sized>(&mut self, dt: f32, rng: &mut R) -> SpawnerOutput {
        let mut output = SpawnerOutput::default();

        if self.phase == SpawnerPhase::WaitingForClear {
            if self.remaining_alive > 0 {
                return output;
            }
            self.phase = SpawnerPhase::Counting;
        }

        match self.phase {
            SpawnerPhase::Counting => {
                self.countdown -= dt;
                if self.countdown > TIMER_EPSILON {
                    return output;
                }
                output.started = Some(self.begin_wave());
            }
            SpawnerPhase::Spawning => self.spawn_timer -= dt,
            SpawnerPhase::WaitingForClear => {}
        }

        if self.phase == SpawnerPhase::Spawning && self.spawn_timer <= TIMER_EPSILON {
            if self.remaining_to_spawn > 0 {
                output.spawn = Some(self.spawn_one(rng));
            }
            if self.remaining_to_spawn == 0 {
                output.completed = Some(self.complete_wave());
            }
        }

        output
    }

    fn begin_wave(&mut self) -> usize {
        let wave = &self.waves[self.current_wave_index];
        self.remaining_to_spawn = wave.enemy_count();
        self.spawn_timer = 0.0;
        self.phase = SpawnerPhase::Spawning;
        self.waves_started += 1;
        self.current_wave_index
    }

    fn spawn_one<R: Rng + ?Sized>(&mut self, rng: &mut R) -> SpawnRequest {
        let wave = &self.waves[self.current_wave_index];
        let point = self.spawn_points[rng.gen_range(0..self.spawn_points.len())];

        self.remaining_to_spawn -= 1;
        self.remaining_alive += 1;
        self.spawn_timer = wave.spawn_interval();

        SpawnRequest {
            wave_index: self.current_wave_index,
            position: point,
            template: wave.enemy_template().clone(),
        }
    }

    fn complete_wave(&mut self) -> (usize, usize) {
        let finished = self.current_wave_index;
        self.current_wave_index = (self.current_wave_index + 1) % self.waves.len();
        self.countdown = self.time_between_waves;
        self.phase = if self.remaining_alive > 0 {
            SpawnerPhase::WaitingForClear
        } else {
            SpawnerPhase::Counting
        };
        (finished, self.current_wave_index)
    }
}
