//! Bounded per-channel message history.

use crate::types::Message;
use std::collections::VecDeque;

/// Ring buffer of the most recent messages on a channel, oldest first.
///
/// Never holds more than `capacity` messages. A capacity of zero disables
/// storage entirely.
pub struct History<V> {
    messages: VecDeque<Message<V>>,
    capacity: usize,
}

impl<V> History<V> {
    pub fn new(capacity: usize) -> Self {
        Self {
            messages: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a message, evicting the oldest ones past capacity.
    ///
    /// Returns how many messages were evicted.
    pub fn push(&mut self, message: Message<V>) -> usize {
        if self.capacity == 0 {
            return 0;
        }

        self.messages.push_back(message);

        let mut evicted = 0;
        while self.messages.len() > self.capacity {
            self.messages.pop_front();
            evicted += 1;
        }
        evicted
    }

    /// The messages a replay capped at `count` would deliver, oldest first.
    ///
    /// `None` selects the whole history; a count larger than the history
    /// also selects everything.
    pub fn window(&self, count: Option<usize>) -> impl Iterator<Item = &Message<V>> {
        let start = match count {
            Some(count) => self.messages.len().saturating_sub(count),
            None => 0,
        };
        self.messages.range(start..)
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled(capacity: usize, count: i32) -> History<i32> {
        let mut history = History::new(capacity);
        for i in 1..=count {
            history.push(Message::new(vec![i]));
        }
        history
    }

    fn firsts(history: &History<i32>, count: Option<usize>) -> Vec<i32> {
        history.window(count).map(|m| m[0]).collect()
    }

    #[test]
    fn test_push_within_capacity() {
        let history = filled(5, 3);
        assert_eq!(history.len(), 3);
        assert_eq!(firsts(&history, None), vec![1, 2, 3]);
    }

    #[test]
    fn test_push_evicts_oldest() {
        let mut history = filled(5, 5);
        let evicted = history.push(Message::new(vec![6]));

        assert_eq!(evicted, 1);
        assert_eq!(history.len(), 5);
        assert_eq!(firsts(&history, None), vec![2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_zero_capacity_stores_nothing() {
        let mut history = filled(0, 10);
        assert!(history.is_empty());
        assert_eq!(history.push(Message::new(vec![11])), 0);
        assert!(history.is_empty());
    }

    #[test]
    fn test_window_counts() {
        let history = filled(5, 5);

        assert_eq!(firsts(&history, Some(1)), vec![5]);
        assert_eq!(firsts(&history, Some(3)), vec![3, 4, 5]);
        assert_eq!(firsts(&history, Some(0)), Vec::<i32>::new());
        assert_eq!(firsts(&history, Some(50)), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_window_after_eviction_is_oldest_first() {
        let history = filled(3, 4);
        assert_eq!(firsts(&history, None), vec![2, 3, 4]);
        assert_eq!(firsts(&history, Some(2)), vec![3, 4]);
    }

    #[test]
    fn test_window_variable_arity() {
        let mut history = History::new(4);
        history.push(Message::new(vec![]));
        history.push(Message::new(vec![1, 2, 3]));

        let arities: Vec<usize> = history.window(None).map(|m| m.len()).collect();
        assert_eq!(arities, vec![0, 3]);
    }
}
