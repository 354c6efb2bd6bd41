use std::{
    collections::{HashMap, VecDeque},
    hash::Hash,
};

/// The component instances of one parent, kept in the order they were rendered.
///
/// Keys don't have to be unique. Elements created by a single `element!` invocation inside a loop
/// all share that invocation's key, so each key maps to a queue of positions. When the parent is
/// rendered again, [`take`](Self::take) hands out instances with a given key in the order they
/// were inserted, which matches them up with their elements by position.
pub(crate) struct SiblingMap<K, V> {
    slots: Vec<Option<V>>,
    positions: HashMap<K, VecDeque<usize>>,
}

impl<K, V> Default for SiblingMap<K, V> {
    fn default() -> Self {
        Self {
            slots: Vec::new(),
            positions: HashMap::new(),
        }
    }
}

impl<K: Hash + Eq, V> SiblingMap<K, V> {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            positions: HashMap::with_capacity(capacity),
        }
    }

    /// The number of values that haven't been taken.
    pub fn len(&self) -> usize {
        self.values().count()
    }

    pub fn push(&mut self, key: K, value: V) {
        self.positions
            .entry(key)
            .or_default()
            .push_back(self.slots.len());
        self.slots.push(Some(value));
    }

    /// Removes and returns the earliest inserted value with the given key.
    pub fn take(&mut self, key: &K) -> Option<V> {
        let position = self.positions.get_mut(key)?.pop_front()?;
        self.slots[position].take()
    }

    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.slots.iter().flatten()
    }

    pub fn values_mut(&mut self) -> impl Iterator<Item = &mut V> {
        self.slots.iter_mut().flatten()
    }

    /// Consumes the map, returning the values that were never taken in insertion order.
    pub fn into_values(self) -> impl Iterator<Item = V> {
        self.slots.into_iter().flatten()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sibling_map() {
        let mut map = SiblingMap::default();
        map.push("a", 1);
        map.push("b", 2);
        map.push("a", 3);
        assert_eq!(map.len(), 3);
        assert_eq!(map.values().copied().collect::<Vec<_>>(), vec![1, 2, 3]);

        assert_eq!(map.take(&"a"), Some(1));
        assert_eq!(map.take(&"a"), Some(3));
        assert_eq!(map.take(&"a"), None);
        assert_eq!(map.take(&"c"), None);

        for value in map.values_mut() {
            *value *= 10;
        }
        assert_eq!(map.len(), 1);
        assert_eq!(map.into_values().collect::<Vec<_>>(), vec![20]);
    }
}
