//! Per-frame event queue

use crate::event::GameEvent;

/// Gameplay pushes during a frame; the loop takes the batch once and hands
/// the same slice to every system.
#[derive(Debug, Default)]
pub struct EventBus {
    queued: Vec<GameEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: GameEvent) {
        self.queued.push(event);
    }

    /// Take everything queued so far, oldest first
    pub fn drain(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.queued)
    }

    pub fn len(&self) -> usize {
        self.queued.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queued.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flare_core::Vec3;

    #[test]
    fn drain_keeps_push_order() {
        let mut bus = EventBus::new();
        bus.push(GameEvent::DashStarted {
            position: Vec3::ZERO,
        });
        bus.push(GameEvent::DashEnded);
        assert_eq!(bus.len(), 2);

        let batch = bus.drain();
        assert_eq!(batch[0].label(), "dash_start");
        assert_eq!(batch[1], GameEvent::DashEnded);
        assert!(bus.is_empty());
        assert!(bus.drain().is_empty());
    }
}
