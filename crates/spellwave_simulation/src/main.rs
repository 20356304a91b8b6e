//! Headless симуляция Spellwave
//!
//! Usage: `spellwave_simulation [scenario.toml]`
//! Без аргумента: ScenarioConfig::default().

use spellwave_simulation::logger::{log_error, log_info};
use spellwave_simulation::{
    build_scenario, create_headless_app, step, AgentDied, CombatStats, ConfigError, EventLog, ProjectileFired,
    ScenarioConfig, WaveSpawner, WaveStarted,
};

fn load_scenario(path: Option<String>) -> Result<ScenarioConfig, String> {
    let Some(path) = path else {
        return Ok(ScenarioConfig::default());
    };

    let source = std::fs::read_to_string(&path).map_err(|error| format!("cannot read {}: {}", path, error))?;
    ScenarioConfig::from_toml_str(&source).map_err(|error: ConfigError| format!("{}: {}", path, error))
}

fn main() {
    let scenario = match load_scenario(std::env::args().nth(1)) {
        Ok(scenario) => scenario,
        Err(message) => {
            eprintln!("{}", message);
            std::process::exit(1);
        }
    };

    println!(
        "Starting Spellwave headless simulation (seed: {}, {} Hz, {}s)",
        scenario.seed, scenario.tick_hz, scenario.duration_secs
    );

    let mut app = create_headless_app(scenario.seed);
    let entities = match build_scenario(app.world_mut(), &scenario) {
        Ok(entities) => entities,
        Err(error) => {
            log_error(&error.to_string());
            std::process::exit(1);
        }
    };

    let dt = (1.0 / scenario.tick_hz) as f32;
    let ticks = (scenario.duration_secs / dt).ceil() as u64;

    let mut waves = EventLog::<WaveStarted>::new();
    let mut casts = EventLog::<ProjectileFired>::new();
    let mut deaths = EventLog::<AgentDied>::new();

    for tick in 0..ticks {
        step(app.world_mut(), dt);

        for started in waves.record(app.world()) {
            log_info(&format!("🌊 Wave {} started", started.wave_number));
        }
        casts.record(app.world());
        deaths.record(app.world());

        if tick % (scenario.tick_hz as u64).max(1) == 0 {
            let world = app.world();
            let alive = world.get::<WaveSpawner>(entities.spawner).map(|s| s.remaining_alive());
            log_info(&format!(
                "Tick {}: {} entities, alive agents: {:?}",
                tick,
                world.entities().len(),
                alive
            ));
        }
    }

    log_info(&format!(
        "Waves started: {}, spells cast: {}, agents died: {}",
        waves.len(),
        casts.len(),
        deaths.len()
    ));

    match app.world().get::<CombatStats>(entities.target) {
        Some(stats) => match toml::to_string(stats) {
            Ok(encoded) => println!("Simulation complete!\n{}", encoded),
            Err(error) => log_error(&format!("cannot encode stats: {}", error)),
        },
        None => println!("Simulation complete! (no stats)"),
    }
}
