//! Static configuration (tuning + scenario)
//!
//! Всё здесь задаётся снаружи и не вычисляется ядром: дальности, cooldown,
//! lifetime, волны, точки спавна. Defaults повторяют исходные игровые значения.
//! Отрицательные/нулевые значения: ошибка вызывающей стороны, не корректируются.

use std::collections::BTreeMap;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Per-agent behaviour tuning.
#[derive(Component, Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Reflect)]
#[reflect(Component)]
#[serde(default)]
pub struct AgentTuning {
    pub max_health: u32,
    /// Patrol → Chase when strictly closer than this; Chase → Patrol when strictly farther
    pub chase_range: f32,
    /// Chase → Attack at `<=`, Attack → Chase at `>`
    pub attack_range: f32,
    /// Units per second while chasing
    pub chase_speed: f32,
    /// Seconds between two casts
    pub attack_cooldown: f32,
    /// Projectile spawns this far in front of the agent (along facing)
    pub muzzle_offset: f32,
    pub body_radius: f32,
}

impl Default for AgentTuning {
    fn default() -> Self {
        Self {
            max_health: 3,
            chase_range: 5.0,
            attack_range: 1.5,
            chase_speed: 2.0,
            attack_cooldown: 2.0,
            muzzle_offset: 1.0,
            body_radius: 0.5,
        }
    }
}

/// Spell projectile tuning, carried by the agent that casts it.
#[derive(Component, Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Reflect)]
#[reflect(Component)]
#[serde(default)]
pub struct ProjectileTuning {
    /// Units per second
    pub speed: f32,
    pub damage: u32,
    /// Seconds before the projectile expires on its own
    pub lifetime: f32,
    pub radius: f32,
}

impl Default for ProjectileTuning {
    fn default() -> Self {
        Self {
            speed: 5.0,
            damage: 1,
            lifetime: 3.0,
            radius: 0.25,
        }
    }
}

/// The single tracked target (player) tuning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetTuning {
    pub position: [f32; 2],
    pub health: u32,
    pub body_radius: f32,
    /// Stats owner id (forwarded to the external stats uploader)
    pub player_id: u32,
}

impl Default for TargetTuning {
    fn default() -> Self {
        Self {
            position: [0.0, 0.0],
            health: 10,
            body_radius: 0.5,
            player_id: 3,
        }
    }
}

/// Enemy template: everything needed to instantiate one agent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentTemplate {
    pub agent: AgentTuning,
    pub projectile: ProjectileTuning,
}

/// One configured batch of agents. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct Wave {
    enemy_count: u32,
    spawn_interval: f32,
    enemy_template: AgentTemplate,
}

impl Wave {
    pub fn new(enemy_count: u32, spawn_interval: f32, enemy_template: AgentTemplate) -> Self {
        Self {
            enemy_count,
            spawn_interval,
            enemy_template,
        }
    }

    pub fn enemy_count(&self) -> u32 {
        self.enemy_count
    }

    pub fn spawn_interval(&self) -> f32 {
        self.spawn_interval
    }

    pub fn enemy_template(&self) -> &AgentTemplate {
        &self.enemy_template
    }
}

/// Validated input for [`crate::spawner::WaveSpawner::new`].
#[derive(Debug, Clone)]
pub struct WaveSpawnerConfig {
    pub waves: Vec<Wave>,
    pub spawn_points: Vec<Vec2>,
    /// Inter-wave delay (seconds), also the initial countdown
    pub time_between_waves: f32,
}

impl Default for WaveSpawnerConfig {
    fn default() -> Self {
        Self {
            waves: Vec::new(),
            spawn_points: Vec::new(),
            time_between_waves: 5.0,
        }
    }
}

/// Obstacle (wall, crate) that blocks projectiles.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObstacleConfig {
    pub position: [f32; 2],
    pub radius: f32,
}

/// Wave entry as written in the scenario file (template by name).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaveEntry {
    pub enemy_count: u32,
    pub spawn_interval: f32,
    pub template: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnerSection {
    pub time_between_waves: f32,
    pub spawn_points: Vec<[f32; 2]>,
    pub waves: Vec<WaveEntry>,
}

impl Default for SpawnerSection {
    fn default() -> Self {
        Self {
            time_between_waves: 5.0,
            spawn_points: vec![[8.0, 0.0], [-8.0, 0.0], [0.0, 8.0], [0.0, -8.0]],
            waves: vec![
                WaveEntry {
                    enemy_count: 3,
                    spawn_interval: 1.0,
                    template: "imp".to_string(),
                },
                WaveEntry {
                    enemy_count: 5,
                    spawn_interval: 0.75,
                    template: "imp".to_string(),
                },
            ],
        }
    }
}

/// Headless scenario (TOML).
///
/// ```toml
/// seed = 7
/// duration_secs = 30.0
///
/// [target]
/// position = [0.0, 0.0]
/// health = 10
///
/// [templates.imp.agent]
/// chase_range = 6.0
///
/// [spawner]
/// spawn_points = [[8.0, 0.0]]
///
/// [[spawner.waves]]
/// enemy_count = 3
/// spawn_interval = 1.0
/// template = "imp"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioConfig {
    pub seed: u64,
    /// Fixed step rate of the headless loop
    pub tick_hz: f64,
    pub duration_secs: f32,
    pub target: TargetTuning,
    pub obstacles: Vec<ObstacleConfig>,
    pub templates: BTreeMap<String, AgentTemplate>,
    pub spawner: SpawnerSection,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        let mut templates = BTreeMap::new();
        templates.insert("imp".to_string(), AgentTemplate::default());

        Self {
            seed: 42,
            tick_hz: 60.0,
            duration_secs: 60.0,
            target: TargetTuning::default(),
            obstacles: Vec::new(),
            templates,
            spawner: SpawnerSection::default(),
        }
    }
}

impl ScenarioConfig {
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(source)?)
    }

    /// Resolves template names and builds the spawner input.
    ///
    /// Пустые spawn points / waves здесь не проверяются: это делает
    /// `WaveSpawner::new`, чтобы ошибка была привязана к инстансу спавнера.
    pub fn spawner_config(&self) -> Result<WaveSpawnerConfig, ConfigError> {
        let waves = self
            .spawner
            .waves
            .iter()
            .enumerate()
            .map(|(wave_index, entry)| {
                let template = self.templates.get(&entry.template).ok_or_else(|| {
                    ConfigError::MissingTemplate {
                        wave_index,
                        template: entry.template.clone(),
                    }
                })?;
                Ok(Wave::new(entry.enemy_count, entry.spawn_interval, template.clone()))
            })
            .collect::<Result<Vec<_>, ConfigError>>()?;

        Ok(WaveSpawnerConfig {
            waves,
            spawn_points: self.spawner.spawn_points.iter().map(|p| Vec2::from_array(*p)).collect(),
            time_between_waves: self.spawner.time_between_waves,
        })
    }
}
