//! Wraparound navigation over the gallery's slot range.

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::debug;

use crate::events::{SlotChanged, SlotId};

/// Tracks the current slot against an inclusive upper bound, cycling in both
/// directions. A negative max marks an empty gallery in which navigation is
/// a no-op. Observers subscribe for change notifications.
#[derive(Debug)]
pub struct Navigator {
    current: SlotId,
    max: SlotId,
    observers: Vec<UnboundedSender<SlotChanged>>,
}

impl Navigator {
    /// `initial` is clamped into `[0, max]`. With a negative `max` the
    /// current id stays pinned at 0 until the range grows.
    #[must_use]
    pub fn new(initial: SlotId, max: SlotId) -> Self {
        let current = if max < 0 { 0 } else { initial.clamp(0, max) };
        debug!(current, max, "navigator initialized");
        Self {
            current,
            max,
            observers: Vec::new(),
        }
    }

    #[must_use]
    pub fn current_id(&self) -> SlotId {
        self.current
    }

    #[must_use]
    pub fn max_id(&self) -> SlotId {
        self.max
    }

    /// Register an observer. Every change notification goes to all
    /// subscribers that are still alive; closed ones are pruned on send.
    pub fn subscribe(&mut self) -> UnboundedReceiver<SlotChanged> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.observers.push(tx);
        rx
    }

    /// Resize the upper bound. Negative input clamps to 0. When the current
    /// id falls outside the shrunk range it is pulled back to the new max
    /// and a single change notification goes out; otherwise nothing is sent.
    pub fn set_max_id(&mut self, new_max: SlotId) {
        let new_max = new_max.max(0);
        if self.max == new_max {
            return;
        }
        self.max = new_max;
        debug!(max = self.max, "navigator max id updated");
        if self.current > self.max {
            self.current = self.max;
            self.notify();
        }
    }

    /// Advance with wraparound. Returns `false` on an empty gallery.
    pub fn next(&mut self) -> bool {
        if self.max < 0 {
            return false;
        }
        self.current = (self.current + 1) % (self.max + 1);
        debug!(current = self.current, "moved to next slot");
        self.notify();
        true
    }

    /// Step back with wraparound. Returns `false` on an empty gallery.
    pub fn previous(&mut self) -> bool {
        if self.max < 0 {
            return false;
        }
        self.current = if self.current == 0 {
            self.max
        } else {
            self.current - 1
        };
        debug!(current = self.current, "moved to previous slot");
        self.notify();
        true
    }

    fn notify(&mut self) {
        let changed = SlotChanged(self.current);
        self.observers.retain(|tx| tx.send(changed).is_ok());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_id_is_clamped_into_range() {
        assert_eq!(Navigator::new(-3, 9).current_id(), 0);
        assert_eq!(Navigator::new(42, 9).current_id(), 9);
        assert_eq!(Navigator::new(5, 9).current_id(), 5);
    }

    #[test]
    fn negative_max_pins_current_at_zero() {
        let nav = Navigator::new(7, -1);
        assert_eq!(nav.current_id(), 0);
        assert_eq!(nav.max_id(), -1);
    }

    #[test]
    fn population_after_an_empty_start_keeps_current_at_zero() {
        let mut nav = Navigator::new(7, -1);
        nav.set_max_id(9);
        assert_eq!(nav.current_id(), 0);
        assert!(nav.next());
        assert_eq!(nav.current_id(), 1);
    }

    #[test]
    fn next_wraps_over_the_full_cycle() {
        let mut nav = Navigator::new(0, 4);
        let mut seen = Vec::new();
        for _ in 0..5 {
            assert!(nav.next());
            seen.push(nav.current_id());
        }
        assert_eq!(seen, vec![1, 2, 3, 4, 0]);
    }

    #[test]
    fn previous_wraps_from_zero_to_max() {
        let mut nav = Navigator::new(0, 4);
        assert!(nav.previous());
        assert_eq!(nav.current_id(), 4);
        assert!(nav.previous());
        assert_eq!(nav.current_id(), 3);
    }

    #[test]
    fn empty_gallery_rejects_navigation() {
        let mut nav = Navigator::new(0, -1);
        assert!(!nav.next());
        assert!(!nav.previous());
        assert_eq!(nav.current_id(), 0);
    }

    #[test]
    fn single_slot_gallery_cycles_onto_itself() {
        let mut nav = Navigator::new(0, 0);
        assert!(nav.next());
        assert_eq!(nav.current_id(), 0);
        assert!(nav.previous());
        assert_eq!(nav.current_id(), 0);
    }

    #[test]
    fn every_navigation_notifies_subscribers() {
        let mut nav = Navigator::new(0, 4);
        let mut rx = nav.subscribe();
        nav.next();
        nav.previous();
        assert_eq!(rx.try_recv().unwrap(), SlotChanged(1));
        assert_eq!(rx.try_recv().unwrap(), SlotChanged(0));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn shrinking_max_clamps_current_and_notifies_once() {
        let mut nav = Navigator::new(7, 10);
        let mut rx = nav.subscribe();
        nav.set_max_id(3);
        assert_eq!(nav.max_id(), 3);
        assert_eq!(nav.current_id(), 3);
        assert_eq!(rx.try_recv().unwrap(), SlotChanged(3));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn growing_max_leaves_current_untouched() {
        let mut nav = Navigator::new(2, 4);
        let mut rx = nav.subscribe();
        nav.set_max_id(20);
        assert_eq!(nav.current_id(), 2);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn unchanged_max_sends_no_notification() {
        let mut nav = Navigator::new(2, 4);
        let mut rx = nav.subscribe();
        nav.set_max_id(4);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn negative_set_max_clamps_to_zero() {
        let mut nav = Navigator::new(0, -1);
        nav.set_max_id(-5);
        assert_eq!(nav.max_id(), 0);
        assert!(nav.next());
        assert_eq!(nav.current_id(), 0);
    }

    #[test]
    fn multiple_observers_each_get_notified() {
        let mut nav = Navigator::new(0, 3);
        let mut a = nav.subscribe();
        let mut b = nav.subscribe();
        nav.next();
        assert_eq!(a.try_recv().unwrap(), SlotChanged(1));
        assert_eq!(b.try_recv().unwrap(), SlotChanged(1));
    }

    #[test]
    fn dropped_observers_are_pruned() {
        let mut nav = Navigator::new(0, 3);
        let rx = nav.subscribe();
        drop(rx);
        nav.next();
        assert_eq!(nav.current_id(), 1);
    }
}
