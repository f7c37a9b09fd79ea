use std::collections::VecDeque;

/// Bounded FIFO holding the most recent `capacity` records.
#[derive(Debug, Clone)]
pub struct SlidingWindow<T> {
    items: VecDeque<T>,
    capacity: usize,
}

impl<T> SlidingWindow<T> {
    pub fn new(capacity: usize) -> Self {
        Self {
            // Capacity can come straight from the command line; don't
            // reserve more than a checkpoint's worth up front.
            items: VecDeque::with_capacity(capacity.min(4096)),
            capacity,
        }
    }

    /// Appends `item`, returning whatever fell out of the window.
    ///
    /// With a capacity of zero the item itself is returned.
    pub fn push(&mut self, item: T) -> Option<T> {
        if self.capacity == 0 {
            return Some(item);
        }
        let evicted = if self.items.len() == self.capacity {
            self.items.pop_front()
        } else {
            None
        };
        self.items.push_back(item);
        evicted
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_evicts_oldest_first() {
        let mut window = SlidingWindow::new(2);
        assert_eq!(window.push(1), None);
        assert_eq!(window.push(2), None);
        assert_eq!(window.push(3), Some(1));
        assert_eq!(window.iter().copied().collect::<Vec<_>>(), vec![2, 3]);
        assert_eq!(window.len(), 2);
    }

    #[test]
    fn test_zero_capacity_passes_through() {
        let mut window = SlidingWindow::new(0);
        assert_eq!(window.push("a"), Some("a"));
        assert!(window.is_empty());
    }

    #[test]
    fn test_never_exceeds_capacity() {
        let mut window = SlidingWindow::new(3);
        for i in 0..100 {
            window.push(i);
            assert!(window.len() <= window.capacity());
        }
        assert_eq!(window.iter().copied().collect::<Vec<_>>(), vec![97, 98, 99]);
    }
}
