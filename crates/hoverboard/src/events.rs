//! Player events and their delivery.
//!
//! Events are delivered to observers synchronously, in registration order,
//! at the moment they are published. They are also queued so the host loop
//! can drain them after the tick. A host that never drains only keeps the
//! newest [`MAX_PENDING`] events.

use std::collections::VecDeque;

use crate::mode::{PlayerMode, TransitionCause};

/// Queued events kept for draining; older ones are dropped past this.
pub const MAX_PENDING: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlayerEvent {
    /// The active mode changed.
    ModeChanged {
        from: PlayerMode,
        to: PlayerMode,
        cause: TransitionCause,
    },
    /// The rider came off the board. Published before `ModeChanged`.
    Fell,
    /// The ragdoll must be engaged (`true`) or released (`false`).
    RagdollToggled(bool),
    /// The rider got back up after a fall.
    Recovered,
    /// A charged jump was released.
    Jumped { charge: f32 },
    /// A landing converted accumulated tricks into speed.
    TrickBoost { amount: f32 },
    Interact,
}

/// Something that wants to hear about player events as they happen.
pub trait PlayerObserver {
    fn on_event(&mut self, event: &PlayerEvent);
}

impl<F: FnMut(&PlayerEvent)> PlayerObserver for F {
    fn on_event(&mut self, event: &PlayerEvent) {
        self(event)
    }
}

#[derive(Default)]
pub struct EventBus {
    observers: Vec<Box<dyn PlayerObserver>>,
    pending: VecDeque<PlayerEvent>,
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("observers", &self.observers.len())
            .field("pending", &self.pending)
            .finish()
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, observer: Box<dyn PlayerObserver>) {
        self.observers.push(observer);
    }

    pub fn publish(&mut self, event: PlayerEvent) {
        for observer in &mut self.observers {
            observer.on_event(&event);
        }
        if self.pending.len() == MAX_PENDING {
            self.pending.pop_front();
            log::trace!("event queue full, dropped oldest");
        }
        self.pending.push_back(event);
    }

    /// Take every event published since the last drain, oldest first.
    pub fn drain(&mut self) -> Vec<PlayerEvent> {
        self.pending.drain(..).collect()
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn observers_hear_events_in_registration_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut bus = EventBus::new();
        for tag in ["first", "second"] {
            let log = Rc::clone(&log);
            bus.subscribe(Box::new(move |event: &PlayerEvent| {
                log.borrow_mut().push((tag, *event));
            }));
        }

        bus.publish(PlayerEvent::Fell);
        bus.publish(PlayerEvent::Interact);

        let log = log.borrow();
        assert_eq!(
            *log,
            vec![
                ("first", PlayerEvent::Fell),
                ("second", PlayerEvent::Fell),
                ("first", PlayerEvent::Interact),
                ("second", PlayerEvent::Interact),
            ]
        );
    }

    #[test]
    fn drain_empties_queue() {
        let mut bus = EventBus::new();
        bus.publish(PlayerEvent::Recovered);
        assert_eq!(bus.pending(), 1);
        assert_eq!(bus.drain(), vec![PlayerEvent::Recovered]);
        assert_eq!(bus.pending(), 0);
    }

    #[test]
    fn undrained_queue_keeps_newest_events() {
        let mut bus = EventBus::new();
        for i in 0..MAX_PENDING + 10 {
            bus.publish(PlayerEvent::Jumped { charge: i as f32 });
        }
        assert_eq!(bus.pending(), MAX_PENDING);
        let drained = bus.drain();
        assert_eq!(drained.first(), Some(&PlayerEvent::Jumped { charge: 10.0 }));
        assert_eq!(
            drained.last(),
            Some(&PlayerEvent::Jumped {
                charge: (MAX_PENDING + 9) as f32
            })
        );
    }
}
