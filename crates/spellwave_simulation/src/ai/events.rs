//! AI Events: наружу для анимации/звука
//!
//! Ядро только публикует; кто слушает (sprite flip, SFX): не наша забота.

use bevy::prelude::*;

use super::components::BehaviorKind;

/// Active behavior of an agent changed.
///
/// `from: None` при первом Enter, `to: None` когда агент удалён.
#[derive(Event, Debug, Clone, PartialEq)]
pub struct BehaviorChanged {
    pub agent: Entity,
    pub from: Option<BehaviorKind>,
    pub to: Option<BehaviorKind>,
}
