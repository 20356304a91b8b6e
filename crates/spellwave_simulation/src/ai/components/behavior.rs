//! Behaviors: Patrol / Chase / Attack
//!
//! Каждое состояние: отдельный тип за трейтом [`Behavior`]. Состояния не
//! ссылаются друг на друга: `update` возвращает запрошенный переход
//! (`Some(BehaviorKind)`), а `StateMachine` разрешает его по своей таблице.
//!
//! Границы (должны совпадать точно, иначе агент осциллирует):
//! - Patrol → Chase: `distance < chase_range`
//! - Chase → Patrol: `distance > chase_range`
//! - Chase → Attack: `distance <= attack_range`
//! - Attack → Chase: `distance > attack_range`
//!
//! На `distance == chase_range` ни Patrol, ни Chase не переходят.

use bevy::prelude::*;

use crate::components::Facing;
use crate::config::AgentTuning;

/// Identity of a behavior slot in the agent's table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect)]
pub enum BehaviorKind {
    Patrol,
    Chase,
    Attack,
}

impl BehaviorKind {
    pub const ALL: [BehaviorKind; 3] = [BehaviorKind::Patrol, BehaviorKind::Chase, BehaviorKind::Attack];

    pub fn index(self) -> usize {
        match self {
            BehaviorKind::Patrol => 0,
            BehaviorKind::Chase => 1,
            BehaviorKind::Attack => 2,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            BehaviorKind::Patrol => "Patrol",
            BehaviorKind::Chase => "Chase",
            BehaviorKind::Attack => "Attack",
        }
    }
}

/// Cast requested by Attack; the owning system turns it into a projectile.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CastRequest {
    /// Muzzle position (in front of the agent along facing)
    pub origin: Vec2,
    /// Target position at the moment of the cast
    pub aim: Vec2,
}

/// Mutable view of one agent, handed to the active behavior.
///
/// Target позиция: только чтение; агенты никогда не пишут в target.
pub struct AgentContext<'a> {
    pub agent: Entity,
    pub position: &'a mut Vec2,
    pub facing: &'a mut Facing,
    /// `None`: target отсутствует, distance checks пропускаются
    pub target: Option<Vec2>,
    pub tuning: &'a AgentTuning,
    /// Elapsed time of this step (seconds)
    pub dt: f32,
    pub casts: &'a mut Vec<CastRequest>,
}

impl AgentContext<'_> {
    pub fn distance_to_target(&self) -> Option<f32> {
        self.target.map(|target| self.position.distance(target))
    }

    pub fn face_target(&mut self) {
        if let Some(target) = self.target {
            *self.facing = Facing::toward(*self.position, target);
        }
    }
}

/// Behavior contract (Enter / Update / Exit).
pub trait Behavior: Send + Sync + 'static {
    fn kind(&self) -> BehaviorKind;

    fn enter(&mut self, _ctx: &mut AgentContext) {}

    /// Runs once per tick while active; returns a requested transition.
    fn update(&mut self, ctx: &mut AgentContext) -> Option<BehaviorKind>;

    fn exit(&mut self, _ctx: &mut AgentContext) {}
}

/// Patrol: начальное состояние, ждём пока target подойдёт.
#[derive(Debug, Default)]
pub struct Patrol;

impl Behavior for Patrol {
    fn kind(&self) -> BehaviorKind {
        BehaviorKind::Patrol
    }

    fn enter(&mut self, ctx: &mut AgentContext) {
        crate::logger::log(&format!("AI: {:?} entering Patrol", ctx.agent));
    }

    fn update(&mut self, ctx: &mut AgentContext) -> Option<BehaviorKind> {
        let distance = ctx.distance_to_target()?;

        if distance < ctx.tuning.chase_range {
            return Some(BehaviorKind::Chase);
        }

        None
    }

    fn exit(&mut self, ctx: &mut AgentContext) {
        crate::logger::log(&format!("AI: {:?} exiting Patrol", ctx.agent));
    }
}

/// Chase: бежим к target по прямой (без pathfinding).
#[derive(Debug, Default)]
pub struct Chase;

impl Behavior for Chase {
    fn kind(&self) -> BehaviorKind {
        BehaviorKind::Chase
    }

    fn enter(&mut self, ctx: &mut AgentContext) {
        crate::logger::log(&format!("AI: {:?} entering Chase", ctx.agent));
    }

    fn update(&mut self, ctx: &mut AgentContext) -> Option<BehaviorKind> {
        let target = ctx.target?;
        ctx.face_target();

        let distance = ctx.position.distance(target);

        if distance > ctx.tuning.chase_range {
            return Some(BehaviorKind::Patrol);
        }

        if distance <= ctx.tuning.attack_range {
            return Some(BehaviorKind::Attack);
        }

        let direction = (target - *ctx.position).normalize_or_zero();
        *ctx.position += direction * ctx.tuning.chase_speed * ctx.dt;

        None
    }

    fn exit(&mut self, ctx: &mut AgentContext) {
        crate::logger::log(&format!("AI: {:?} exiting Chase", ctx.agent));
    }
}

/// Attack: стоим и кастуем спелл раз в `attack_cooldown`.
#[derive(Debug, Default)]
pub struct Attack {
    /// Seconds since the last cast
    since_last_cast: f32,
    /// Attack window open (between Enter and Exit)
    engaged: bool,
}

impl Attack {
    pub fn since_last_cast(&self) -> f32 {
        self.since_last_cast
    }

    pub fn is_engaged(&self) -> bool {
        self.engaged
    }

    fn cast(&self, ctx: &mut AgentContext, aim: Vec2) {
        let origin = *ctx.position + Vec2::new(ctx.tuning.muzzle_offset * ctx.facing.sign(), 0.0);
        ctx.casts.push(CastRequest { origin, aim });
    }
}

impl Behavior for Attack {
    fn kind(&self) -> BehaviorKind {
        BehaviorKind::Attack
    }

    fn enter(&mut self, ctx: &mut AgentContext) {
        crate::logger::log(&format!("AI: {:?} entering Attack", ctx.agent));
        // Первый Update атакует сразу
        self.since_last_cast = ctx.tuning.attack_cooldown;
        self.engaged = true;
    }

    fn update(&mut self, ctx: &mut AgentContext) -> Option<BehaviorKind> {
        let target = ctx.target?;
        ctx.face_target();

        if ctx.position.distance(target) > ctx.tuning.attack_range {
            return Some(BehaviorKind::Chase);
        }

        self.since_last_cast += ctx.dt;
        if self.since_last_cast + crate::TIMER_EPSILON >= ctx.tuning.attack_cooldown {
            crate::logger::log(&format!("🔥 {:?} casts at {:?}", ctx.agent, target));
            self.cast(ctx, target);
            self.since_last_cast = 0.0;
        }

        None
    }

    fn exit(&mut self, ctx: &mut AgentContext) {
        crate::logger::log(&format!("AI: {:?} exiting Attack", ctx.agent));
        self.engaged = false;
    }
}
