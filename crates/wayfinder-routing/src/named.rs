//! Insertion-ordered collection keyed by name.

use std::collections::HashMap;

/// Items in insertion order with O(1) lookup by name.
///
/// Inserting an existing name replaces the item in place, keeping its
/// position.
#[derive(Debug, Clone)]
pub(crate) struct NamedSet<T> {
    items: Vec<(String, T)>,
    index: HashMap<String, usize>,
}

impl<T> Default for NamedSet<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl<T> NamedSet<T> {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces, returning the stored item.
    pub(crate) fn insert(&mut self, name: &str, item: T) -> &mut T {
        let position = if let Some(&position) = self.index.get(name) {
            self.items[position].1 = item;
            position
        } else {
            self.items.push((name.to_string(), item));
            self.index.insert(name.to_string(), self.items.len() - 1);
            self.items.len() - 1
        };
        &mut self.items[position].1
    }

    pub(crate) fn get(&self, name: &str) -> Option<&T> {
        self.index.get(name).map(|&i| &self.items[i].1)
    }

    pub(crate) fn get_mut(&mut self, name: &str) -> Option<&mut T> {
        let position = *self.index.get(name)?;
        Some(&mut self.items[position].1)
    }

    pub(crate) fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub(crate) fn remove(&mut self, name: &str) -> Option<T> {
        let position = self.index.remove(name)?;
        let (_, item) = self.items.remove(position);
        for slot in self.index.values_mut() {
            if *slot > position {
                *slot -= 1;
            }
        }
        Some(item)
    }

    pub(crate) fn values(&self) -> impl Iterator<Item = &T> {
        self.items.iter().map(|(_, item)| item)
    }

    pub(crate) fn len(&self) -> usize {
        self.items.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub(crate) fn clear(&mut self) {
        self.items.clear();
        self.index.clear();
    }
}
