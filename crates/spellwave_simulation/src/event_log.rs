//! EventLog: накопление событий поверх ротируемых буферов
//!
//! `Events<E>` хранит только два последних шага. Кто хочет видеть всю историю
//! (main summary, тесты) держит свой cursor и дочитывает после каждого шага.

use bevy::ecs::event::EventCursor;
use bevy::prelude::*;

pub struct EventLog<E: Event> {
    cursor: EventCursor<E>,
    entries: Vec<E>,
}

impl<E: Event> Default for EventLog<E> {
    fn default() -> Self {
        Self {
            cursor: EventCursor::default(),
            entries: Vec::new(),
        }
    }
}

impl<E: Event + Clone> EventLog<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Дочитывает новые события и возвращает только их.
    ///
    /// Вызывать не реже раза в шаг, иначе старые события уже ротированы.
    pub fn record(&mut self, world: &World) -> &[E] {
        let start = self.entries.len();
        if let Some(events) = world.get_resource::<Events<E>>() {
            self.entries.extend(self.cursor.read(events).cloned());
        }
        &self.entries[start..]
    }

    pub fn entries(&self) -> &[E] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::ProjectileFired;
    use crate::{create_headless_app, step};

    fn fired(shooter: Entity) -> ProjectileFired {
        ProjectileFired {
            shooter,
            projectile: Entity::PLACEHOLDER,
            origin: Vec2::ZERO,
            direction: Vec2::X,
        }
    }

    #[test]
    fn test_buffers_rotate_each_step() {
        let mut app = create_headless_app(1);
        let mut log = EventLog::<ProjectileFired>::new();

        for _ in 0..50 {
            app.world_mut().send_event(fired(Entity::PLACEHOLDER));
            step(app.world_mut(), 0.1);
            assert_eq!(log.record(app.world()).len(), 1);
        }

        // Буфер держит максимум два шага, log держит всё
        assert!(app.world().resource::<Events<ProjectileFired>>().len() <= 2);
        assert_eq!(log.len(), 50);
    }

    #[test]
    fn test_record_twice_yields_nothing_new() {
        let mut app = create_headless_app(1);
        let mut log = EventLog::<ProjectileFired>::new();

        app.world_mut().send_event(fired(Entity::PLACEHOLDER));
        step(app.world_mut(), 0.1);

        assert_eq!(log.record(app.world()).len(), 1);
        assert!(log.record(app.world()).is_empty());
        assert_eq!(log.entries().len(), 1);
    }
}
