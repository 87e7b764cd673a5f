//! Generational slot storage backing node and edge objects
//!
//! A slot's generation is bumped every time it is freed, so a key taken
//! before the free never resolves to whatever is stored there afterwards.

/// Raw slot address shared by [`crate::NodeKey`] and [`crate::EdgeKey`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(crate) struct RawKey {
    pub(crate) index: u32,
    pub(crate) generation: u32,
}

#[derive(Debug, Clone)]
enum Slot<T> {
    Occupied { generation: u32, value: T },
    Vacant { generation: u32, next_free: Option<u32> },
}

/// Arena of values addressed by generational keys
#[derive(Debug, Clone)]
pub(crate) struct Arena<T> {
    slots: Vec<Slot<T>>,
    free_head: Option<u32>,
    len: usize,
}

impl<T> Default for Arena<T> {
    fn default() -> Self {
        Self {
            slots: Vec::new(),
            free_head: None,
            len: 0,
        }
    }
}

impl<T> Arena<T> {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Number of occupied slots
    pub(crate) fn len(&self) -> usize {
        self.len
    }

    pub(crate) fn insert(&mut self, value: T) -> RawKey {
        self.len += 1;

        if let Some(index) = self.free_head {
            if let Some(&Slot::Vacant {
                generation,
                next_free,
            }) = self.slots.get(index as usize)
            {
                self.slots[index as usize] = Slot::Occupied { generation, value };
                self.free_head = next_free;
                return RawKey { index, generation };
            }
        }

        let index = self.slots.len() as u32;
        self.slots.push(Slot::Occupied {
            generation: 0,
            value,
        });
        RawKey {
            index,
            generation: 0,
        }
    }

    pub(crate) fn get(&self, key: RawKey) -> Option<&T> {
        match self.slots.get(key.index as usize)? {
            Slot::Occupied { generation, value } if *generation == key.generation => Some(value),
            _ => None,
        }
    }

    pub(crate) fn get_mut(&mut self, key: RawKey) -> Option<&mut T> {
        match self.slots.get_mut(key.index as usize)? {
            Slot::Occupied { generation, value } if *generation == key.generation => Some(value),
            _ => None,
        }
    }

    pub(crate) fn contains(&self, key: RawKey) -> bool {
        self.get(key).is_some()
    }

    /// Free a slot, returning its value. The key goes stale.
    pub(crate) fn remove(&mut self, key: RawKey) -> Option<T> {
        if !self.contains(key) {
            return None;
        }

        let vacant = Slot::Vacant {
            generation: key.generation.wrapping_add(1),
            next_free: self.free_head,
        };
        let old = std::mem::replace(&mut self.slots[key.index as usize], vacant);
        self.free_head = Some(key.index);
        self.len -= 1;

        match old {
            Slot::Occupied { value, .. } => Some(value),
            Slot::Vacant { .. } => None,
        }
    }
}
