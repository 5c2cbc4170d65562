use std::collections::{HashMap, HashSet};

use bevy::prelude::*;

use super::entity::Tracked;
use super::error::WorldError;

/// Bounded table of tracked entities with per-cycle mark-and-sweep.
///
/// Items live in a dense `Vec`; `index` maps ids to slots and `seen` holds the
/// mark for the slot with the same index. A cycle is [`begin_cycle`], any
/// number of [`upsert`] calls, then [`sweep`].
///
/// [`begin_cycle`]: EntityTable::begin_cycle
/// [`upsert`]: EntityTable::upsert
/// [`sweep`]: EntityTable::sweep
#[derive(Debug)]
pub struct EntityTable<T> {
    name: &'static str,
    items: Vec<T>,
    index: HashMap<String, usize>,
    seen: Vec<bool>,
    capacity: usize,
}

impl<T: Tracked> EntityTable<T> {
    pub fn new(name: &'static str, capacity: usize) -> Self {
        Self {
            name,
            items: Vec::new(),
            index: HashMap::new(),
            seen: Vec::new(),
            capacity,
        }
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

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.items.iter_mut()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.items.iter().map(|t| t.id())
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn find(&self, id: &str) -> Option<&T> {
        self.index.get(id).map(|&i| &self.items[i])
    }

    pub fn find_mut(&mut self, id: &str) -> Option<&mut T> {
        self.index.get(id).map(|&i| &mut self.items[i])
    }

    pub fn begin_cycle(&mut self) {
        self.seen.iter_mut().for_each(|s| *s = false);
    }

    /// Creates or refreshes `id` and marks it seen for the current cycle.
    pub fn upsert(
        &mut self,
        id: &str,
        snap: &T::Snapshot,
        default_dims: Vec2,
    ) -> Result<(), WorldError> {
        if let Some(&i) = self.index.get(id) {
            self.items[i].update(snap, default_dims);
            self.seen[i] = true;
            return Ok(());
        }
        if self.items.len() >= self.capacity {
            return Err(WorldError::Capacity {
                table: self.name,
                capacity: self.capacity,
                id: id.to_string(),
            });
        }
        self.index.insert(id.to_string(), self.items.len());
        self.items.push(T::create(id.to_string(), snap, default_dims));
        self.seen.push(true);
        Ok(())
    }

    /// Drops every entity not marked since [`begin_cycle`](Self::begin_cycle).
    /// Returns how many were removed.
    pub fn sweep(&mut self) -> usize {
        let before = self.items.len();
        // walking backwards, the slot swapped in was already checked
        for i in (0..self.items.len()).rev() {
            if self.seen[i] {
                continue;
            }
            let gone = self.items.swap_remove(i);
            self.seen.swap_remove(i);
            self.index.remove(gone.id());
            if let Some(moved) = self.items.get(i) {
                self.index.insert(moved.id().to_string(), i);
            }
        }
        before - self.items.len()
    }

    /// Keeps only the entities whose id is in `current`.
    pub fn remove_if_absent(&mut self, current: &HashSet<&str>) -> usize {
        for (i, item) in self.items.iter().enumerate() {
            self.seen[i] = current.contains(item.id());
        }
        self.sweep()
    }

    pub fn remove(&mut self, id: &str) -> Option<T> {
        let i = self.index.remove(id)?;
        let gone = self.items.swap_remove(i);
        self.seen.swap_remove(i);
        if let Some(moved) = self.items.get(i) {
            self.index.insert(moved.id().to_string(), i);
        }
        Some(gone)
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.index.clear();
        self.seen.clear();
    }
}
