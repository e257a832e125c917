//! Slab-like storage for container nodes.
//!
//! Storage hands out a stable [`Key`] for every value it holds. The key
//! stays valid until the value is removed, and vacated slots are reused by
//! later inserts. Containers link their nodes through these keys instead of
//! through pointers.

use core::fmt;
use core::mem;

use crate::Key;

/// Slab-like storage with stable keys.
///
/// # Requirements
///
/// Implementations must provide:
/// - **Stable keys**: a key remains valid until its value is removed
/// - **O(1)** insert, remove and get
/// - **Fallible insert**: running out of room hands the value back as
///   [`Full`] instead of aborting
///
/// # Implementations
///
/// - [`SlotStorage<T, K>`] - growable or fixed capacity (in this crate)
/// - `slab::Slab<T>` - growable, key `usize` (feature `slab`)
pub trait Storage<T> {
    /// Key type for this storage.
    type Key: Key;

    /// Inserts a value, returning its key.
    ///
    /// # Errors
    ///
    /// Returns `Err(Full(value))` if no slot could be made available.
    fn try_insert(&mut self, value: T) -> Result<Self::Key, Full<T>>;

    /// Removes and returns the value at `key`, if present.
    fn remove(&mut self, key: Self::Key) -> Option<T>;

    /// Returns a reference to the value at `key`, if present.
    fn get(&self, key: Self::Key) -> Option<&T>;

    /// Returns a mutable reference to the value at `key`, if present.
    fn get_mut(&mut self, key: Self::Key) -> Option<&mut T>;

    /// Returns the number of stored values.
    fn len(&self) -> usize;

    /// Returns `true` if nothing is stored.
    #[inline]
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns a reference without checking the key.
    ///
    /// # Safety
    ///
    /// `key` must be valid and occupied.
    unsafe fn get_unchecked(&self, key: Self::Key) -> &T;

    /// Returns a mutable reference without checking the key.
    ///
    /// # Safety
    ///
    /// `key` must be valid and occupied.
    unsafe fn get_unchecked_mut(&mut self, key: Self::Key) -> &mut T;

    /// Removes a value without checking the key.
    ///
    /// # Safety
    ///
    /// `key` must be valid and occupied.
    unsafe fn remove_unchecked(&mut self, key: Self::Key) -> T;
}

/// Error returned when storage cannot make room for a value.
///
/// Carries the value so the caller can recover it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Full<T>(pub T);

impl<T> Full<T> {
    /// Returns the value that could not be inserted.
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> fmt::Display for Full<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "storage is full")
    }
}

impl<T: fmt::Debug> std::error::Error for Full<T> {}

// =============================================================================
// SlotStorage - vector of slots with an intrusive free list
// =============================================================================

#[derive(Debug)]
enum Slot<T, K> {
    Occupied(T),
    /// Link to the next vacant slot, or `K::NONE`.
    Vacant(K),
}

/// Storage backed by a vector of slots.
///
/// Vacated slots form an intrusive free list, so removal never allocates
/// and the most recently freed slot is reused first.
///
/// Two modes:
/// - [`SlotStorage::new`]: grows on demand. Growth uses `try_reserve`, so
///   an allocation failure surfaces as [`Full`] rather than an abort.
/// - [`SlotStorage::try_with_capacity`]: preallocates and never grows.
///
/// Either way the key type bounds the number of slots: a `u8` key can
/// address 255 values, because `u8::MAX` is the [`Key::NONE`] sentinel.
///
/// # Example
///
/// ```
/// use nexus_container::{SlotStorage, Storage};
///
/// let mut storage: SlotStorage<u64> = SlotStorage::try_with_capacity(2).unwrap();
///
/// let a = storage.try_insert(1).unwrap();
/// storage.try_insert(2).unwrap();
/// assert!(storage.try_insert(3).is_err());
///
/// assert_eq!(storage.remove(a), Some(1));
/// assert!(storage.try_insert(3).is_ok());
/// ```
#[derive(Debug)]
pub struct SlotStorage<T, K: Key = u32> {
    slots: Vec<Slot<T, K>>,
    /// Head of the free list.
    next_free: K,
    len: usize,
    /// Slot limit for fixed-capacity storage.
    limit: Option<usize>,
}

impl<T, K: Key> Default for SlotStorage<T, K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, K: Key> SlotStorage<T, K> {
    /// Creates empty, growable storage. Does not allocate.
    #[inline]
    pub const fn new() -> Self {
        Self {
            slots: Vec::new(),
            next_free: K::NONE,
            len: 0,
            limit: None,
        }
    }

    /// Creates fixed-capacity storage with exactly `capacity` slots.
    ///
    /// # Errors
    ///
    /// - [`Error::SizeInvalid`](crate::Error::SizeInvalid) if `capacity` is
    ///   zero or exceeds what the key type can address.
    /// - [`Error::OutOfMemory`](crate::Error::OutOfMemory) if the slots
    ///   cannot be allocated.
    pub fn try_with_capacity(capacity: usize) -> Result<Self, crate::Error> {
        if capacity == 0 || K::try_from_usize(capacity - 1).is_none() {
            return Err(crate::Error::SizeInvalid);
        }

        let mut slots = Vec::new();
        slots
            .try_reserve_exact(capacity)
            .map_err(|_| crate::Error::OutOfMemory)?;

        Ok(Self {
            slots,
            next_free: K::NONE,
            len: 0,
            limit: Some(capacity),
        })
    }

    /// Returns the slot limit, or `None` for growable storage.
    #[inline]
    pub const fn capacity(&self) -> Option<usize> {
        self.limit
    }

    /// Returns `true` if no further value fits without a removal.
    ///
    /// Growable storage is never full up front; it only fails when an
    /// allocation fails or the key space runs out.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.next_free.is_none() && self.limit.is_some_and(|limit| self.slots.len() >= limit)
    }
}

impl<T, K: Key> Storage<T> for SlotStorage<T, K> {
    type Key = K;

    fn try_insert(&mut self, value: T) -> Result<K, Full<T>> {
        if self.next_free.is_some() {
            let key = self.next_free;
            // Safety: the free list only links vacant in-bounds slots
            let slot = unsafe { self.slots.get_unchecked_mut(key.as_usize()) };
            if let Slot::Vacant(next) = *slot {
                self.next_free = next;
            }
            *slot = Slot::Occupied(value);
            self.len += 1;
            return Ok(key);
        }

        let index = self.slots.len();
        if self.limit.is_some_and(|limit| index >= limit) {
            return Err(Full(value));
        }
        let Some(key) = K::try_from_usize(index) else {
            return Err(Full(value));
        };
        if self.slots.try_reserve(1).is_err() {
            return Err(Full(value));
        }

        self.slots.push(Slot::Occupied(value));
        self.len += 1;
        Ok(key)
    }

    fn remove(&mut self, key: K) -> Option<T> {
        let slot = self.slots.get_mut(key.as_usize())?;
        match mem::replace(slot, Slot::Vacant(self.next_free)) {
            Slot::Occupied(value) => {
                self.next_free = key;
                self.len -= 1;
                Some(value)
            }
            vacant => {
                *slot = vacant;
                None
            }
        }
    }

    #[inline]
    fn get(&self, key: K) -> Option<&T> {
        match self.slots.get(key.as_usize())? {
            Slot::Occupied(value) => Some(value),
            Slot::Vacant(_) => None,
        }
    }

    #[inline]
    fn get_mut(&mut self, key: K) -> Option<&mut T> {
        match self.slots.get_mut(key.as_usize())? {
            Slot::Occupied(value) => Some(value),
            Slot::Vacant(_) => None,
        }
    }

    #[inline]
    fn len(&self) -> usize {
        self.len
    }

    #[inline]
    unsafe fn get_unchecked(&self, key: K) -> &T {
        match unsafe { self.slots.get_unchecked(key.as_usize()) } {
            Slot::Occupied(value) => value,
            // Safety: caller guarantees the slot is occupied
            Slot::Vacant(_) => unsafe { core::hint::unreachable_unchecked() },
        }
    }

    #[inline]
    unsafe fn get_unchecked_mut(&mut self, key: K) -> &mut T {
        match unsafe { self.slots.get_unchecked_mut(key.as_usize()) } {
            Slot::Occupied(value) => value,
            // Safety: caller guarantees the slot is occupied
            Slot::Vacant(_) => unsafe { core::hint::unreachable_unchecked() },
        }
    }

    #[inline]
    unsafe fn remove_unchecked(&mut self, key: K) -> T {
        unsafe { self.remove(key).unwrap_unchecked() }
    }
}

// =============================================================================
// slab::Slab implementation
// =============================================================================

#[cfg(feature = "slab")]
impl<T> Storage<T> for slab::Slab<T> {
    type Key = usize;

    #[inline]
    fn try_insert(&mut self, value: T) -> Result<usize, Full<T>> {
        if self.vacant_key() == usize::NONE {
            return Err(Full(value));
        }
        Ok(self.insert(value))
    }

    #[inline]
    fn remove(&mut self, key: usize) -> Option<T> {
        self.try_remove(key)
    }

    #[inline]
    fn get(&self, key: usize) -> Option<&T> {
        slab::Slab::get(self, key)
    }

    #[inline]
    fn get_mut(&mut self, key: usize) -> Option<&mut T> {
        slab::Slab::get_mut(self, key)
    }

    #[inline]
    fn len(&self) -> usize {
        slab::Slab::len(self)
    }

    #[inline]
    unsafe fn get_unchecked(&self, key: usize) -> &T {
        unsafe { slab::Slab::get_unchecked(self, key) }
    }

    #[inline]
    unsafe fn get_unchecked_mut(&mut self, key: usize) -> &mut T {
        unsafe { slab::Slab::get_unchecked_mut(self, key) }
    }

    #[inline]
    unsafe fn remove_unchecked(&mut self, key: usize) -> T {
        slab::Slab::remove(self, key)
    }
}
