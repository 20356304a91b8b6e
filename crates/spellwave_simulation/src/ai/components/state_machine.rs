//! StateMachine component
//!
//! Держит фиксированную таблицу behaviors (по одному на `BehaviorKind`)
//! и индекс активного. Таблица строится один раз при создании агента и живёт
//! столько же, сколько агент. Логики переходов здесь нет: её решают behaviors.

use bevy::prelude::*;

use super::behavior::{Attack, AgentContext, Behavior, BehaviorKind, Chase, Patrol};
use crate::error::ConfigError;

/// Fixed lookup table: slot `kind.index()` holds the behavior of that kind.
pub struct BehaviorTable {
    slots: [Box<dyn Behavior>; 3],
}

impl BehaviorTable {
    /// Builds a table from explicit behaviors.
    ///
    /// Каждый behavior обязан лежать в своём слоте, иначе wiring битый.
    pub fn new(
        patrol: Box<dyn Behavior>,
        chase: Box<dyn Behavior>,
        attack: Box<dyn Behavior>,
    ) -> Result<Self, ConfigError> {
        let slots = [patrol, chase, attack];

        for (slot, expected) in slots.iter().zip(BehaviorKind::ALL) {
            if slot.kind() != expected {
                return Err(ConfigError::MissingBehavior { kind: expected });
            }
        }

        Ok(Self { slots })
    }

    pub fn get(&self, kind: BehaviorKind) -> &dyn Behavior {
        self.slots[kind.index()].as_ref()
    }

    pub fn get_mut(&mut self, kind: BehaviorKind) -> &mut dyn Behavior {
        self.slots[kind.index()].as_mut()
    }
}

impl Default for BehaviorTable {
    fn default() -> Self {
        Self {
            slots: [Box::new(Patrol), Box::new(Chase), Box::new(Attack::default())],
        }
    }
}

/// Transition taken during a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: BehaviorKind,
    pub to: BehaviorKind,
}

/// Per-agent state machine.
///
/// Инвариант: Exit() предыдущего всегда раньше Enter() следующего;
/// повторный выбор активного: no-op (cooldown не сбрасывается).
#[derive(Component, Default)]
pub struct StateMachine {
    table: BehaviorTable,
    current: Option<BehaviorKind>,
}

impl StateMachine {
    pub fn new(table: BehaviorTable) -> Self {
        Self { table, current: None }
    }

    pub fn current(&self) -> Option<BehaviorKind> {
        self.current
    }

    pub fn behavior(&self, kind: BehaviorKind) -> &dyn Behavior {
        self.table.get(kind)
    }

    /// Switches to `next`. Returns `false` when `next` is already active.
    pub fn set_active(&mut self, next: BehaviorKind, ctx: &mut AgentContext) -> bool {
        if self.current == Some(next) {
            return false;
        }

        if let Some(previous) = self.current.take() {
            self.table.get_mut(previous).exit(ctx);
        }

        self.current = Some(next);
        self.table.get_mut(next).enter(ctx);
        true
    }

    /// Runs the active behavior's Update and applies its requested transition
    /// synchronously. No-op without an active behavior.
    pub fn tick(&mut self, ctx: &mut AgentContext) -> Option<Transition> {
        let from = self.current?;
        let to = self.table.get_mut(from).update(ctx)?;

        self.set_active(to, ctx).then_some(Transition { from, to })
    }

    /// Exits the active behavior and leaves the machine empty (agent teardown).
    pub fn shutdown(&mut self, ctx: &mut AgentContext) -> Option<BehaviorKind> {
        let previous = self.current.take()?;
        self.table.get_mut(previous).exit(ctx);
        Some(previous)
    }
}

impl std::fmt::Debug for StateMachine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StateMachine").field("current", &self.current).finish()
    }
}
