// PixelCanvas
// copyright zipxing@hotmail.com 2022～2025

//! Bounded slot pool backing the texture and shape tables.
//!
//! Slots are recycled through a free-list stack, so allocate and release are
//! O(1) instead of the linear free-slot scan older revisions used. Every slot
//! carries a generation counter that is bumped on release; a handle minted
//! for an earlier generation is rejected instead of silently aliasing
//! whatever lives in the recycled slot.

use crate::error::CanvasError;
use std::marker::PhantomData;

/// Typed, copyable id of a live pool entry. Packs (index, generation).
pub struct Handle<T> {
    index: u32,
    generation: u32,
    _marker: PhantomData<T>,
}

impl<T> Handle<T> {
    fn new(index: u32, generation: u32) -> Self {
        Self {
            index,
            generation,
            _marker: PhantomData,
        }
    }

    /// Raw u64 form, generation in the high half. Debug aid only.
    pub fn as_u64(&self) -> u64 {
        (self.generation as u64) << 32 | self.index as u64
    }
}

impl<T> Clone for Handle<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Handle<T> {}

impl<T> PartialEq for Handle<T> {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index && self.generation == other.generation
    }
}

impl<T> Eq for Handle<T> {}

impl<T> std::hash::Hash for Handle<T> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.as_u64().hash(state);
    }
}

impl<T> std::fmt::Debug for Handle<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Handle")
            .field("index", &self.index)
            .field("generation", &self.generation)
            .finish()
    }
}

enum Slot<T> {
    Vacant { generation: u32, next_free: Option<u32> },
    Occupied { generation: u32, value: T },
}

pub struct SlotPool<T> {
    slots: Vec<Slot<T>>,
    free_head: Option<u32>,
    capacity: usize,
    live: usize,
    kind: &'static str,
}

impl<T> SlotPool<T> {
    /// `kind` names the table in error messages ("texture", "shape").
    pub fn new(capacity: usize, kind: &'static str) -> Self {
        Self {
            slots: Vec::new(),
            free_head: None,
            capacity,
            live: 0,
            kind,
        }
    }

    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn insert(&mut self, value: T) -> Result<Handle<T>, CanvasError> {
        if let Some(index) = self.free_head {
            let slot = &mut self.slots[index as usize];
            let (generation, next_free) = match slot {
                Slot::Vacant { generation, next_free } => (*generation, *next_free),
                Slot::Occupied { .. } => unreachable!("free list points at occupied slot"),
            };
            self.free_head = next_free;
            *slot = Slot::Occupied { generation, value };
            self.live += 1;
            return Ok(Handle::new(index, generation));
        }
        if self.slots.len() >= self.capacity {
            return Err(CanvasError::Exhausted(self.kind));
        }
        let index = self.slots.len() as u32;
        self.slots.push(Slot::Occupied { generation: 0, value });
        self.live += 1;
        Ok(Handle::new(index, 0))
    }

    pub fn get(&self, handle: Handle<T>) -> Result<&T, CanvasError> {
        match self.slots.get(handle.index as usize) {
            Some(Slot::Occupied { generation, value }) if *generation == handle.generation => {
                Ok(value)
            }
            _ => Err(CanvasError::StaleHandle),
        }
    }

    pub fn get_mut(&mut self, handle: Handle<T>) -> Result<&mut T, CanvasError> {
        match self.slots.get_mut(handle.index as usize) {
            Some(Slot::Occupied { generation, value }) if *generation == handle.generation => {
                Ok(value)
            }
            _ => Err(CanvasError::StaleHandle),
        }
    }

    pub fn remove(&mut self, handle: Handle<T>) -> Result<T, CanvasError> {
        let slot = self
            .slots
            .get_mut(handle.index as usize)
            .ok_or(CanvasError::StaleHandle)?;
        match slot {
            Slot::Occupied { generation, .. } if *generation == handle.generation => {
                let next = Slot::Vacant {
                    generation: handle.generation.wrapping_add(1),
                    next_free: self.free_head,
                };
                let old = std::mem::replace(slot, next);
                self.free_head = Some(handle.index);
                self.live -= 1;
                match old {
                    Slot::Occupied { value, .. } => Ok(value),
                    Slot::Vacant { .. } => unreachable!(),
                }
            }
            _ => Err(CanvasError::StaleHandle),
        }
    }

    /// Drop every live value. Used on teardown and reset.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.free_head = None;
        self.live = 0;
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.slots.iter().filter_map(|s| match s {
            Slot::Occupied { value, .. } => Some(value),
            Slot::Vacant { .. } => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_get_remove() {
        let mut pool: SlotPool<u32> = SlotPool::new(8, "test");
        let h = pool.insert(42).unwrap();
        assert_eq!(*pool.get(h).unwrap(), 42);
        *pool.get_mut(h).unwrap() = 43;
        assert_eq!(pool.remove(h).unwrap(), 43);
        assert!(pool.is_empty());
    }

    #[test]
    fn release_then_allocate_exactly_refills() {
        let mut pool: SlotPool<usize> = SlotPool::new(16, "test");
        let handles: Vec<_> = (0..16).map(|i| pool.insert(i).unwrap()).collect();
        assert!(matches!(pool.insert(99), Err(CanvasError::Exhausted(_))));
        for h in handles {
            pool.remove(h).unwrap();
        }
        for i in 0..16 {
            pool.insert(i).unwrap();
        }
        assert_eq!(pool.len(), 16);
        assert!(matches!(pool.insert(99), Err(CanvasError::Exhausted(_))));
    }

    #[test]
    fn exhaustion_is_a_defined_error() {
        let mut pool: SlotPool<u8> = SlotPool::new(2, "test");
        pool.insert(1).unwrap();
        pool.insert(2).unwrap();
        match pool.insert(3) {
            Err(CanvasError::Exhausted(kind)) => assert_eq!(kind, "test"),
            other => panic!("expected exhaustion, got {:?}", other.map(|h| h.as_u64())),
        }
    }

    #[test]
    fn stale_handle_detected_after_slot_reuse() {
        let mut pool: SlotPool<u32> = SlotPool::new(4, "test");
        let a = pool.insert(1).unwrap();
        pool.remove(a).unwrap();
        let b = pool.insert(2).unwrap();
        // b reuses a's slot index but carries the bumped generation
        assert!(pool.get(a).is_err());
        assert_eq!(*pool.get(b).unwrap(), 2);
        assert!(pool.remove(a).is_err());
        assert_eq!(pool.len(), 1);
    }

    #[test]
    fn double_remove_fails() {
        let mut pool: SlotPool<u32> = SlotPool::new(4, "test");
        let h = pool.insert(7).unwrap();
        pool.remove(h).unwrap();
        assert!(matches!(pool.remove(h), Err(CanvasError::StaleHandle)));
    }

    #[test]
    fn clear_drops_everything() {
        let mut pool: SlotPool<String> = SlotPool::new(4, "test");
        let h = pool.insert("x".to_string()).unwrap();
        pool.clear();
        assert!(pool.get(h).is_err());
        assert_eq!(pool.len(), 0);
        // pool is usable again after clear
        pool.insert("y".to_string()).unwrap();
    }
}
