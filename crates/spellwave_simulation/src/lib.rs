//! Spellwave Simulation Core
//!
//! ECS-симуляция боя на Bevy 0.16 (headless, без рендера)
//!
//! Состав:
//! - ai: per-agent FSM Patrol → Chase → Attack
//! - combat: spell projectiles, урон и смерть агентов
//! - target: игрок (позиция, Health, CombatStats)
//! - spawner: волны агентов, gated по live count
//!
//! Один шаг симуляции = `step(world, dt)` → schedule `SimulationStep`.
//! `SimulationPlugin` дополнительно гоняет шаг из FixedUpdate (60Hz).

use bevy::ecs::schedule::ScheduleLabel;
use bevy::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

// Публичные модули
pub mod agent;
pub mod ai;
pub mod combat;
pub mod components;
pub mod config;
pub mod error;
pub mod event_log;
pub mod logger;
pub mod spawner;
pub mod target;

// Re-export базовых типов для удобства
pub use agent::{agent_bundle, spawn_agent, Agent, Misconfigured};
pub use ai::{AIPlugin, BehaviorChanged, BehaviorKind, StateMachine};
pub use combat::{
    AgentDamaged, AgentDied, AgentHit, CombatPlugin, Dead, Projectile, ProjectileDestroyed, ProjectileEnd,
    ProjectileFired,
};
pub use components::*;
pub use config::{AgentTemplate, AgentTuning, ProjectileTuning, ScenarioConfig, Wave, WaveSpawnerConfig};
pub use error::ConfigError;
pub use event_log::EventLog;
pub use logger::init_logger;
pub use spawner::{spawn_wave_spawner, AgentSpawned, SpawnerPlugin, WaveCompleted, WaveSpawner, WaveStarted};
pub use target::{CombatLedger, CombatStats, StatsChanged, Target, TargetDied, TargetHit, TargetPlugin};

/// Schedule одного шага симуляции (запускается из `step`)
#[derive(ScheduleLabel, Debug, Clone, PartialEq, Eq, Hash)]
pub struct SimulationStep;

/// Фазы шага (выполняются строго по порядку)
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SimSet {
    /// Ротация event буферов (события живут два шага)
    Events,
    /// Движение + коллизии + lifetime projectiles
    Projectiles,
    /// Урон по target и агентам, смерти
    Damage,
    /// Инициализация и tick FSM агентов
    Agents,
    /// Волны
    Spawning,
}

/// Допуск для таймеров: накопленная ошибка f32 от суммы dt не должна
/// сдвигать срабатывание на лишний тик.
pub const TIMER_EPSILON: f32 = 1e-4;

/// Время симуляции (единственный источник dt для систем шага)
#[derive(Resource, Debug, Default, Clone, Copy, PartialEq)]
pub struct SimClock {
    delta: f32,
    elapsed: f32,
    tick: u64,
}

impl SimClock {
    pub fn delta(&self) -> f32 {
        self.delta
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn advance(&mut self, dt: f32) {
        self.delta = dt;
        self.elapsed += dt;
        self.tick += 1;
    }
}

/// Один дискретный шаг симуляции длиной `dt` секунд.
pub fn step(world: &mut World, dt: f32) {
    world.get_resource_or_init::<SimClock>().advance(dt);

    if let Err(error) = world.try_run_schedule(SimulationStep) {
        logger::log_error(&format!("SimulationStep is not registered: {}", error));
    }
}

/// Регистрация событий симуляции
///
/// `step()` не проходит через `First`, поэтому буферы крутит сам
/// `SimulationStep`: событие читается в своём шаге и в следующем, потом удаляется.
pub trait SimEventAppExt {
    fn add_sim_event<E: Event>(&mut self) -> &mut Self;
}

impl SimEventAppExt for App {
    fn add_sim_event<E: Event>(&mut self) -> &mut Self {
        self.add_event::<E>()
            .add_systems(SimulationStep, rotate_events::<E>.in_set(SimSet::Events))
    }
}

fn rotate_events<E: Event>(mut events: ResMut<Events<E>>) {
    events.update();
}

/// FixedUpdate → step (для обычного `App::update` цикла)
fn run_fixed_step(world: &mut World) {
    let Some(dt) = world.get_resource::<Time<Fixed>>().map(|time| time.delta_secs()) else {
        return;
    };
    step(world, dt);
}

/// Главный plugin симуляции (объединяет все подсистемы)
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        app.init_schedule(SimulationStep)
            .configure_sets(
                SimulationStep,
                (
                    SimSet::Events,
                    SimSet::Projectiles,
                    SimSet::Damage,
                    SimSet::Agents,
                    SimSet::Spawning,
                )
                    .chain(),
            )
            // Fixed timestep 60Hz для simulation tick (легче считать интервалы)
            .insert_resource(Time::<Fixed>::from_hz(60.0))
            // Детерминистичный RNG (seed по умолчанию)
            .insert_resource(DeterministicRng::new(42))
            .init_resource::<SimClock>()
            .init_resource::<SpawnCounter>()
            // Подсистемы
            .add_plugins((CombatPlugin, TargetPlugin, AIPlugin, SpawnerPlugin))
            .add_systems(FixedUpdate, run_fixed_step);
    }
}

/// Детерминистичный RNG resource (seeded)
#[derive(Resource)]
pub struct DeterministicRng {
    pub rng: ChaCha8Rng,
    pub seed: u64,
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }
}

/// Создаёт minimal Bevy App для headless симуляции
pub fn create_headless_app(seed: u64) -> App {
    let mut app = App::new();
    init_logger();
    app.add_plugins((MinimalPlugins, SimulationPlugin))
        .insert_resource(DeterministicRng::new(seed));

    app
}

/// Entities created by [`build_scenario`].
#[derive(Debug, Clone)]
pub struct ScenarioEntities {
    pub target: Entity,
    pub obstacles: Vec<Entity>,
    pub spawner: Entity,
}

/// Spawns target, obstacles and the wave spawner described by `scenario`.
///
/// Конфиг валидируется до спавна: при ошибке мир не меняется.
pub fn build_scenario(world: &mut World, scenario: &ScenarioConfig) -> Result<ScenarioEntities, ConfigError> {
    let spawner = WaveSpawner::new(scenario.spawner_config()?)?;

    let target = world.spawn(target::target_bundle(&scenario.target)).id();
    let obstacles = scenario
        .obstacles
        .iter()
        .map(|obstacle| world.spawn(target::obstacle_bundle(obstacle)).id())
        .collect();
    // Ledger = сам target (CombatStats живут на игроке)
    let spawner = world.spawn(spawner.with_target(Some(target), Some(target))).id();

    logger::log_info(&format!(
        "🗺️ Scenario ready: target {:?}, {} obstacles, spawner {:?}",
        target,
        scenario.obstacles.len(),
        spawner
    ));

    Ok(ScenarioEntities {
        target,
        obstacles,
        spawner,
    })
}

/// Snapshot мира для сравнения детерминизма
pub fn world_snapshot<T: Component>(world: &mut World) -> Vec<u8>
where
    T: std::fmt::Debug,
{
    // Собираем все компоненты в детерминированный формат
    let mut snapshot = Vec::new();

    let mut query = world.query::<(Entity, &T)>();
    let mut entities: Vec<_> = query.iter(world).collect();

    // Сортируем по Entity ID для детерминизма
    entities.sort_by_key(|(entity, _)| entity.index());

    // Сериализуем в байты через Debug (простейший способ)
    for (entity, component) in entities {
        snapshot.extend_from_slice(&entity.index().to_le_bytes());
        snapshot.extend_from_slice(format!("{:?}", component).as_bytes());
    }

    snapshot
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sim_clock_advance() {
        let mut clock = SimClock::default();
        clock.advance(0.5);
        clock.advance(0.25);

        assert_eq!(clock.delta(), 0.25);
        assert_eq!(clock.elapsed(), 0.75);
        assert_eq!(clock.tick(), 2);
    }

    #[test]
    fn test_build_scenario_rejects_bad_config() {
        let mut app = create_headless_app(1);
        let mut scenario = ScenarioConfig::default();
        scenario.spawner.spawn_points.clear();

        let result = build_scenario(app.world_mut(), &scenario);
        assert!(matches!(result, Err(ConfigError::EmptySpawnPoints)));

        // Мир не тронут
        let targets = app.world_mut().query::<&Target>().iter(app.world()).count();
        assert_eq!(targets, 0);
    }
}
