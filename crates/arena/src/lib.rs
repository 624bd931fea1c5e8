//! Generational Arena
//!
//! Backing store for the document tree. Every node handed out by the DOM is a
//! [`GenIndex`]; once the page destroys a node its slot is recycled under a new
//! generation, so any handle still sitting in a queued mutation record simply
//! stops resolving instead of aliasing a different node.

use std::fmt;

/// Slot position plus the generation it was issued under.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct GenIndex {
    pub index: u32,
    pub generation: u32,
}

impl fmt::Debug for GenIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}v{}", self.index, self.generation)
    }
}

enum Entry<T> {
    Occupied { generation: u32, value: T },
    Vacant { generation: u32, next_free: Option<u32> },
}

impl<T> Entry<T> {
    fn generation(&self) -> u32 {
        match self {
            Entry::Occupied { generation, .. } | Entry::Vacant { generation, .. } => *generation,
        }
    }
}

pub struct Arena<T> {
    entries: Vec<Entry<T>>,
    free_head: Option<u32>,
    live: usize,
}

impl<T> Default for Arena<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Arena<T> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            free_head: None,
            live: 0,
        }
    }

    /// Store `value` and return its handle, reusing a vacant slot when one exists.
    pub fn insert(&mut self, value: T) -> GenIndex {
        self.live += 1;
        match self.free_head {
            Some(index) => {
                let entry = &mut self.entries[index as usize];
                let (generation, next_free) = match entry {
                    Entry::Vacant { generation, next_free } => (*generation, *next_free),
                    Entry::Occupied { .. } => unreachable!("free list points at an occupied slot"),
                };
                *entry = Entry::Occupied { generation, value };
                self.free_head = next_free;
                GenIndex { index, generation }
            }
            None => {
                let index = self.entries.len() as u32;
                self.entries.push(Entry::Occupied { generation: 0, value });
                GenIndex { index, generation: 0 }
            }
        }
    }

    pub fn get(&self, id: GenIndex) -> Option<&T> {
        match self.entries.get(id.index as usize)? {
            Entry::Occupied { generation, value } if *generation == id.generation => Some(value),
            _ => None,
        }
    }

    pub fn get_mut(&mut self, id: GenIndex) -> Option<&mut T> {
        match self.entries.get_mut(id.index as usize)? {
            Entry::Occupied { generation, value } if *generation == id.generation => Some(value),
            _ => None,
        }
    }

    /// Free the slot behind `id`. Stale or unknown handles are ignored.
    pub fn remove(&mut self, id: GenIndex) -> Option<T> {
        let slot = self.entries.get_mut(id.index as usize)?;
        if !matches!(slot, Entry::Occupied { generation, .. } if *generation == id.generation) {
            return None;
        }
        let vacant = Entry::Vacant {
            generation: slot.generation().wrapping_add(1),
            next_free: self.free_head,
        };
        let old = std::mem::replace(slot, vacant);
        self.free_head = Some(id.index);
        self.live -= 1;
        match old {
            Entry::Occupied { value, .. } => Some(value),
            Entry::Vacant { .. } => None,
        }
    }

    pub fn contains(&self, id: GenIndex) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Live entries in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (GenIndex, &T)> {
        self.entries
            .iter()
            .enumerate()
            .filter_map(|(i, entry)| match entry {
                Entry::Occupied { generation, value } => Some((
                    GenIndex {
                        index: i as u32,
                        generation: *generation,
                    },
                    value,
                )),
                Entry::Vacant { .. } => None,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_then_get() {
        let mut arena = Arena::new();
        let id = arena.insert("div");
        assert_eq!(arena.get(id), Some(&"div"));
        assert_eq!(arena.len(), 1);
    }

    #[test]
    fn removed_handle_goes_stale() {
        let mut arena = Arena::new();
        let old = arena.insert(1);
        assert_eq!(arena.remove(old), Some(1));
        let new = arena.insert(2);
        assert_eq!(old.index, new.index);
        assert_ne!(old.generation, new.generation);
        assert_eq!(arena.get(old), None);
        assert!(!arena.contains(old));
        assert_eq!(arena.get(new), Some(&2));
    }

    #[test]
    fn remove_twice_is_none() {
        let mut arena = Arena::new();
        let id = arena.insert(7);
        arena.remove(id);
        assert_eq!(arena.remove(id), None);
        assert!(arena.is_empty());
    }

    #[test]
    fn out_of_range_handle() {
        let arena: Arena<u8> = Arena::new();
        assert_eq!(arena.get(GenIndex { index: 42, generation: 0 }), None);
    }

    #[test]
    fn iter_skips_vacant() {
        let mut arena = Arena::new();
        arena.insert('a');
        let b = arena.insert('b');
        arena.insert('c');
        arena.remove(b);
        let live: Vec<char> = arena.iter().map(|(_, c)| *c).collect();
        assert_eq!(live, vec!['a', 'c']);
    }

    #[test]
    fn get_mut_updates_in_place() {
        let mut arena = Arena::new();
        let id = arena.insert(String::from("over"));
        arena.get_mut(id).unwrap().push_str("flow");
        assert_eq!(arena.get(id).map(String::as_str), Some("overflow"));
    }
}
