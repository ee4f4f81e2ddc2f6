//! Set of values with constant time membership and stable enumeration.
//!
//! Sets have the following properties:
//!
//! * Elements are added, removed, and checked for existence in constant time
//!   (O(1)).
//! * Elements are enumerated in O(n), in insertion order until a removal
//!   happens. A removal moves the last element into the freed position.
//! * Enumeration never yields duplicates and is stable across calls as long
//!   as the set is not mutated.
use std::{collections::HashMap, hash::Hash};

/// An enumerable set of `T` values.
#[derive(Clone, Debug)]
pub struct EnumerableSet<T> {
    /// Values in the set.
    values: Vec<T>,
    /// Position is the index of the value in the `values` array plus 1.
    /// Position 0 is never stored, absence from the map means absence from
    /// the set.
    positions: HashMap<T, usize>,
}

impl<T> Default for EnumerableSet<T> {
    fn default() -> Self {
        Self { values: Vec::new(), positions: HashMap::new() }
    }
}

impl<T: Copy + Eq + Hash> EnumerableSet<T> {
    /// Adds a value to a set.
    ///
    /// Returns true if the `value` was added to the set, that is if it was not
    /// already present.
    ///
    /// # Arguments
    ///
    /// * `&mut self` - Write access to the set's state.
    /// * `value` - The value to add to the set.
    pub fn add(&mut self, value: T) -> bool {
        if self.contains(value) {
            false
        } else {
            self.values.push(value);
            self.positions.insert(value, self.values.len());
            true
        }
    }

    /// Removes a `value` from a set.
    ///
    /// Returns true if the `value` was removed from the set, that is if it was
    /// present.
    ///
    /// # Arguments
    ///
    /// * `&mut self` - Write access to the set's state.
    /// * `value` - The value to remove from the set.
    pub fn remove(&mut self, value: T) -> bool {
        let Some(position) = self.positions.remove(&value) else {
            return false;
        };

        let value_index = position - 1;
        self.values.swap_remove(value_index);

        // The former last value now lives at `value_index`.
        if let Some(&moved) = self.values.get(value_index) {
            self.positions.insert(moved, position);
        }

        true
    }

    /// Removes all values from a set.
    pub fn clear(&mut self) {
        self.values.clear();
        self.positions.clear();
    }

    /// Returns true if the `value` is in the set.
    #[must_use]
    pub fn contains(&self, value: T) -> bool {
        self.positions.contains_key(&value)
    }

    /// Returns the number of values in the set.
    #[must_use]
    pub fn length(&self) -> usize {
        self.values.len()
    }

    /// Returns true if the set holds no values.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Returns the value stored at position `index` in the set.
    ///
    /// Note that the ordering of values may change when values are removed.
    #[must_use]
    pub fn at(&self, index: usize) -> Option<T> {
        self.values.get(index).copied()
    }

    /// Returns the entire set in an array.
    #[must_use]
    pub fn values(&self) -> Vec<T> {
        self.values.clone()
    }

    /// Iterates over the set without copying it.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.values.iter()
    }
}
