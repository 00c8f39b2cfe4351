//! FIFO queue of gears waiting to be dropped

use std::collections::VecDeque;

use crate::level::GearSpec;

/// Pending gears, consumed from the front
#[derive(Debug, Clone, Default)]
pub struct InventoryQueue {
    gears: VecDeque<GearSpec>,
}

impl InventoryQueue {
    pub fn new(initial: impl IntoIterator<Item = GearSpec>) -> Self {
        Self {
            gears: initial.into_iter().collect(),
        }
    }

    /// Front of the queue without removing it
    pub fn peek_next(&self) -> Option<&GearSpec> {
        self.gears.front()
    }

    /// Remove and return the front of the queue
    pub fn consume_next(&mut self) -> Option<GearSpec> {
        self.gears.pop_front()
    }

    pub fn add(&mut self, spec: GearSpec) {
        self.gears.push_back(spec);
    }

    pub fn is_empty(&self) -> bool {
        self.gears.is_empty()
    }

    pub fn remaining_count(&self) -> usize {
        self.gears.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_empty_queue_returns_none() {
        let mut queue = InventoryQueue::default();
        assert!(queue.is_empty());
        assert!(queue.peek_next().is_none());
        assert!(queue.consume_next().is_none());
        assert_eq!(queue.remaining_count(), 0);
    }

    #[test]
    fn test_peek_does_not_consume() {
        let queue = InventoryQueue::new([GearSpec::queued(30.0), GearSpec::queued(20.0)]);
        assert_eq!(queue.peek_next().map(|g| g.radius), Some(30.0));
        assert_eq!(queue.peek_next().map(|g| g.radius), Some(30.0));
        assert_eq!(queue.remaining_count(), 2);
    }

    #[test]
    fn test_add_appends_to_back() {
        let mut queue = InventoryQueue::new([GearSpec::queued(30.0)]);
        queue.add(GearSpec::queued(50.0));
        assert_eq!(queue.consume_next().map(|g| g.radius), Some(30.0));
        assert_eq!(queue.consume_next().map(|g| g.radius), Some(50.0));
        assert!(queue.is_empty());
    }

    proptest! {
        #[test]
        fn prop_consume_is_fifo(radii in prop::collection::vec(1.0f32..100.0, 0..16)) {
            let mut queue = InventoryQueue::new(radii.iter().map(|&r| GearSpec::queued(r)));
            for &r in &radii {
                prop_assert_eq!(queue.consume_next().map(|g| g.radius), Some(r));
            }
            prop_assert!(queue.consume_next().is_none());
            prop_assert!(queue.consume_next().is_none());
        }
    }
}
