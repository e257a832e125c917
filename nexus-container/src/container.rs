//! Doubly-linked container that owns its elements.
//!
//! A [`Container`] keeps its payloads in slab-like [`Storage`] and chains
//! them together through prev/next keys. It can act as a deque (add and
//! remove at either end), a sorted sequence (comparator-driven insertion),
//! or a small map (lookup, replace and delete by a matching probe).
//!
//! # Ownership
//!
//! The container owns every linked payload. Ownership leaves the container
//! in exactly two ways:
//!
//! - the `get_*` family detaches an element and returns it as an
//!   [`Element<T>`], an owned handle the caller is now responsible for;
//! - the `delete_*` family (and [`Drop`]) destroys elements in place.
//!
//! # Destruction hook
//!
//! An optional hook runs on a payload immediately before the container
//! drops it: on `delete_*`, on [`Container::delete_standalone`], on the old
//! payload during [`Container::replace_matching`], and once per element
//! when the container itself is torn down. It never runs for an element
//! that is still linked, and never runs twice for the same payload.
//!
//! # Comparators
//!
//! Comparators return [`Ordering`]: `Less`, `Equal`, `Greater` for "first
//! argument is smaller / equal / larger". The first argument is always the
//! caller's side (the value being inserted, or the probe being searched
//! for) and the second is the stored element.
//!
//! # Example
//!
//! ```
//! use nexus_container::Container;
//!
//! let mut list: Container<u64> = Container::new();
//!
//! for value in [5, 1, 3] {
//!     list.add_sorted_ascending(value, |new, cur| new.cmp(cur)).unwrap();
//! }
//!
//! assert_eq!(list.peek_front(), Some(&1));
//! assert_eq!(list.peek_last(), Some(&5));
//!
//! let first = list.get_front().unwrap();
//! assert_eq!(*first, 1);
//! list.delete_standalone(first);
//!
//! assert_eq!(list.len(), 2);
//! list.delete_all();
//! assert!(list.is_empty());
//! ```
//!
//! # Use Case: Map
//!
//! Matching operations take a probe of any type, so a sequence of entries
//! can be searched by key alone:
//!
//! ```
//! use nexus_container::Container;
//!
//! #[derive(Debug)]
//! struct Entry {
//!     key: String,
//!     value: i64,
//! }
//!
//! let by_key = |probe: &str, entry: &Entry| probe.cmp(entry.key.as_str());
//!
//! let mut map: Container<Entry> = Container::new();
//! map.add_sorted_ascending(Entry { key: "b".into(), value: 2 }, |n, c| n.key.cmp(&c.key))
//!     .unwrap();
//! map.add_sorted_ascending(Entry { key: "a".into(), value: 1 }, |n, c| n.key.cmp(&c.key))
//!     .unwrap();
//!
//! assert_eq!(map.peek_matching("b", by_key).map(|e| e.value), Some(2));
//! assert!(map.delete_matching("a", by_key));
//! assert!(map.peek_matching("a", by_key).is_none());
//! ```

use core::cmp::Ordering;
use core::fmt;
use core::marker::PhantomData;
use core::mem;
use core::ops::{Deref, DerefMut};

use crate::{Error, Full, Key, Rejected, SlotStorage, Storage};

/// Default storage for a container: growable slots keyed by `K`.
pub type ContainerStorage<T, K = u32> = SlotStorage<Node<T, K>, K>;

/// Container storage backed by `slab::Slab`.
#[cfg(feature = "slab")]
pub type SlabContainerStorage<T> = slab::Slab<Node<T, usize>>;

/// Destruction hook, run on a payload right before it is dropped.
///
/// Hooks are `Send`, so a container is `Send` whenever its payload and
/// storage are.
pub type Hook<T> = Box<dyn FnMut(&mut T) + Send>;

/// A linked node in storage.
///
/// Wraps the payload with its neighbour links. Users only ever see the
/// payload; the node is an implementation detail exposed so storage types
/// can be named.
#[derive(Debug)]
pub struct Node<T, K: Key = u32> {
    data: T,
    prev: K,
    next: K,
}

impl<T, K: Key> Node<T, K> {
    #[inline]
    fn new(data: T) -> Self {
        Self {
            data,
            prev: K::NONE,
            next: K::NONE,
        }
    }
}

/// An element detached from a container.
///
/// Returned only by the `get_*` family. The caller owns it; handing it back
/// through [`Container::delete_standalone`] runs the container's hook
/// before the payload is dropped. Dropping it any other way (or calling
/// [`Element::into_inner`]) skips the hook.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use = "a detached element should be passed to `delete_standalone` or consumed"]
pub struct Element<T> {
    data: T,
}

impl<T> Element<T> {
    #[inline]
    fn new(data: T) -> Self {
        Self { data }
    }

    /// Returns a reference to the payload.
    #[inline]
    pub fn data(&self) -> &T {
        &self.data
    }

    /// Returns a mutable reference to the payload.
    #[inline]
    pub fn data_mut(&mut self) -> &mut T {
        &mut self.data
    }

    /// Takes the payload out without running any hook.
    #[inline]
    pub fn into_inner(self) -> T {
        self.data
    }
}

impl<T> Deref for Element<T> {
    type Target = T;

    #[inline]
    fn deref(&self) -> &T {
        &self.data
    }
}

impl<T> DerefMut for Element<T> {
    #[inline]
    fn deref_mut(&mut self) -> &mut T {
        &mut self.data
    }
}

/// A doubly-linked sequence of owned payloads.
///
/// # Type Parameters
///
/// - `T`: payload type
/// - `S`: node storage (default [`ContainerStorage<T>`])
/// - `K`: link key type (default `u32`)
///
/// # Invariants
///
/// - `head` is `NONE` iff `tail` is `NONE` iff `len == 0`
/// - following `next` from `head` visits exactly the nodes that following
///   `prev` from `tail` visits, in reverse order
/// - `len` equals the number of linked nodes, which equals the number of
///   nodes in storage
pub struct Container<T, S = ContainerStorage<T>, K: Key = u32>
where
    S: Storage<Node<T, K>, Key = K>,
{
    storage: S,
    head: K,
    tail: K,
    len: usize,
    hook: Option<Hook<T>>,
}

impl<T, K: Key> Default for Container<T, ContainerStorage<T, K>, K> {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Construction on the default storage
// =============================================================================

impl<T, K: Key> Container<T, ContainerStorage<T, K>, K> {
    /// Creates an empty, growable container with no hook.
    #[inline]
    pub const fn new() -> Self {
        Self {
            storage: SlotStorage::new(),
            head: K::NONE,
            tail: K::NONE,
            len: 0,
            hook: None,
        }
    }

    /// Creates an empty, growable container that runs `hook` on every
    /// payload it destroys.
    ///
    /// # Example
    ///
    /// ```
    /// use std::sync::Arc;
    /// use std::sync::atomic::{AtomicUsize, Ordering};
    /// use nexus_container::Container;
    ///
    /// let destroyed = Arc::new(AtomicUsize::new(0));
    /// let counter = destroyed.clone();
    ///
    /// let mut list: Container<u64> = Container::with_hook(move |_| {
    ///     counter.fetch_add(1, Ordering::Relaxed);
    /// });
    /// list.add_back(1).unwrap();
    /// list.add_back(2).unwrap();
    ///
    /// list.delete_container();
    /// assert_eq!(destroyed.load(Ordering::Relaxed), 2);
    /// ```
    pub fn with_hook(hook: impl FnMut(&mut T) + Send + 'static) -> Self {
        let mut container = Self::new();
        container.set_hook(Some(Box::new(hook)));
        container
    }

    /// Creates an empty container limited to `capacity` elements.
    ///
    /// All slots are allocated up front; once full, insertions fail with
    /// [`Error::OutOfMemory`] until an element is removed.
    ///
    /// # Errors
    ///
    /// - [`Error::SizeInvalid`] if `capacity` is zero or too large for `K`.
    /// - [`Error::OutOfMemory`] if the slots cannot be allocated.
    pub fn try_with_capacity(capacity: usize) -> Result<Self, Error> {
        Ok(Self::with_storage(SlotStorage::try_with_capacity(capacity)?))
    }
}

// =============================================================================
// Operations on any storage
// =============================================================================

impl<T, S, K: Key> Container<T, S, K>
where
    S: Storage<Node<T, K>, Key = K>,
{
    /// Creates an empty container over `storage`, with no hook.
    ///
    /// `storage` should be empty; nodes already in it are never linked
    /// and are dropped with the storage, without the hook.
    #[inline]
    pub fn with_storage(storage: S) -> Self {
        debug_assert!(storage.is_empty(), "container storage must start empty");
        Self {
            storage,
            head: K::NONE,
            tail: K::NONE,
            len: 0,
            hook: None,
        }
    }

    /// Installs or clears the destruction hook.
    #[inline]
    pub fn set_hook(&mut self, hook: Option<Hook<T>>) {
        self.hook = hook;
    }

    /// Returns `true` if a destruction hook is installed.
    #[inline]
    pub fn has_hook(&self) -> bool {
        self.hook.is_some()
    }

    /// Returns the number of elements.
    #[inline]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the container holds no elements.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns a front-to-back iterator over the payloads.
    ///
    /// Iterating never detaches anything; use `get_front` in a loop to drain.
    #[inline]
    pub fn iter(&self) -> Iter<'_, T, S, K> {
        Iter {
            storage: &self.storage,
            front: self.head,
            back: self.tail,
            remaining: self.len,
            _marker: PhantomData,
        }
    }

    // ========================================================================
    // Insertion
    // ========================================================================

    /// Adds `value` at the front. O(1).
    ///
    /// # Errors
    ///
    /// Returns the value with [`Error::OutOfMemory`] if storage has no room.
    /// The container is unchanged.
    #[inline]
    pub fn add_front(&mut self, value: T) -> Result<(), Rejected<T>> {
        let key = self.store(value)?;
        self.link_before(key, self.head);
        Ok(())
    }

    /// Adds `value` at the back. O(1).
    ///
    /// # Errors
    ///
    /// Returns the value with [`Error::OutOfMemory`] if storage has no room.
    /// The container is unchanged.
    #[inline]
    pub fn add_back(&mut self, value: T) -> Result<(), Rejected<T>> {
        let key = self.store(value)?;
        self.link_before(key, K::NONE);
        Ok(())
    }

    /// Inserts `value` keeping the container in ascending order. O(n).
    ///
    /// Scans from the front past every element `compare(&value, stored)`
    /// reports as `Greater`, and links the value before the first element
    /// that is not smaller, or at the back. A value equal to existing
    /// elements lands in front of them.
    ///
    /// # Errors
    ///
    /// Returns the value with [`Error::OutOfMemory`] if storage has no room.
    /// The container is unchanged.
    #[inline]
    pub fn add_sorted_ascending<F>(&mut self, value: T, compare: F) -> Result<(), Rejected<T>>
    where
        F: FnMut(&T, &T) -> Ordering,
    {
        self.add_sorted(value, Ordering::Greater, compare)
    }

    /// Inserts `value` keeping the container in descending order. O(n).
    ///
    /// Mirror image of [`add_sorted_ascending`](Self::add_sorted_ascending):
    /// the scan skips elements the value is `Less` than.
    ///
    /// # Errors
    ///
    /// Returns the value with [`Error::OutOfMemory`] if storage has no room.
    /// The container is unchanged.
    #[inline]
    pub fn add_sorted_descending<F>(&mut self, value: T, compare: F) -> Result<(), Rejected<T>>
    where
        F: FnMut(&T, &T) -> Ordering,
    {
        self.add_sorted(value, Ordering::Less, compare)
    }

    fn add_sorted<F>(&mut self, value: T, skip: Ordering, mut compare: F) -> Result<(), Rejected<T>>
    where
        F: FnMut(&T, &T) -> Ordering,
    {
        let mut before = self.head;
        while before.is_some() {
            // Safety: `before` was reached by traversal from head
            let node = unsafe { self.storage.get_unchecked(before) };
            if compare(&value, &node.data) != skip {
                break;
            }
            before = node.next;
        }

        let key = self.store(value)?;
        self.link_before(key, before);
        Ok(())
    }

    // ========================================================================
    // Detaching lookups
    // ========================================================================

    /// Detaches and returns the front element.
    ///
    /// Returns `None` if the container is empty.
    #[inline]
    pub fn get_front(&mut self) -> Option<Element<T>> {
        if self.head.is_none() {
            return None;
        }
        Some(Element::new(self.detach(self.head)))
    }

    /// Detaches and returns the back element.
    ///
    /// Returns `None` if the container is empty.
    #[inline]
    pub fn get_last(&mut self) -> Option<Element<T>> {
        if self.tail.is_none() {
            return None;
        }
        Some(Element::new(self.detach(self.tail)))
    }

    /// Detaches and returns the first element matching `probe`.
    ///
    /// Scans from the front for the first element where
    /// `compare(probe, stored)` is `Equal`. Returns `None` if nothing
    /// matches or the container is empty.
    #[inline]
    pub fn get_matching<Q, F>(&mut self, probe: &Q, compare: F) -> Option<Element<T>>
    where
        Q: ?Sized,
        F: FnMut(&Q, &T) -> Ordering,
    {
        let key = self.find(probe, compare)?;
        Some(Element::new(self.detach(key)))
    }

    // ========================================================================
    // Non-destructive lookups
    // ========================================================================

    /// Returns the front element without detaching it.
    #[inline]
    pub fn peek_front(&self) -> Option<&T> {
        if self.head.is_none() {
            None
        } else {
            // Safety: head is valid when is_some()
            Some(unsafe { &self.storage.get_unchecked(self.head).data })
        }
    }

    /// Returns the back element without detaching it.
    #[inline]
    pub fn peek_last(&self) -> Option<&T> {
        if self.tail.is_none() {
            None
        } else {
            // Safety: tail is valid when is_some()
            Some(unsafe { &self.storage.get_unchecked(self.tail).data })
        }
    }

    /// Returns the first element matching `probe` without detaching it.
    ///
    /// Same search as [`get_matching`](Self::get_matching).
    #[inline]
    pub fn peek_matching<Q, F>(&self, probe: &Q, compare: F) -> Option<&T>
    where
        Q: ?Sized,
        F: FnMut(&Q, &T) -> Ordering,
    {
        let key = self.find(probe, compare)?;
        // Safety: find only returns linked keys
        Some(unsafe { &self.storage.get_unchecked(key).data })
    }

    // ========================================================================
    // Replacement
    // ========================================================================

    /// Swaps the payload of the first element matching `probe` for `value`.
    ///
    /// The hook runs on the old payload before it is dropped. The element
    /// keeps its position: nothing is re-sorted, so a container kept in
    /// order by the replaced field may be out of order afterwards.
    ///
    /// # Errors
    ///
    /// Returns the value with [`Error::ContainerEmpty`] or
    /// [`Error::ElementNotFound`]. The container is unchanged.
    pub fn replace_matching<Q, F>(&mut self, probe: &Q, value: T, compare: F) -> Result<(), Rejected<T>>
    where
        Q: ?Sized,
        F: FnMut(&Q, &T) -> Ordering,
    {
        if self.is_empty() {
            return Err(Rejected::new(Error::ContainerEmpty, value));
        }
        match self.find(probe, compare) {
            Some(key) => {
                self.replace_at(key, value);
                Ok(())
            }
            None => Err(Rejected::new(Error::ElementNotFound, value)),
        }
    }

    // ========================================================================
    // Destruction
    // ========================================================================

    /// Destroys the front element. Returns `false` if there was none.
    #[inline]
    pub fn delete_front(&mut self) -> bool {
        match self.get_front() {
            Some(element) => {
                self.delete_standalone(element);
                true
            }
            None => false,
        }
    }

    /// Destroys the back element. Returns `false` if there was none.
    #[inline]
    pub fn delete_last(&mut self) -> bool {
        match self.get_last() {
            Some(element) => {
                self.delete_standalone(element);
                true
            }
            None => false,
        }
    }

    /// Destroys the first element matching `probe`.
    ///
    /// Returns `false` if nothing matched.
    #[inline]
    pub fn delete_matching<Q, F>(&mut self, probe: &Q, compare: F) -> bool
    where
        Q: ?Sized,
        F: FnMut(&Q, &T) -> Ordering,
    {
        match self.get_matching(probe, compare) {
            Some(element) => {
                self.delete_standalone(element);
                true
            }
            None => false,
        }
    }

    /// Destroys an element previously detached by a `get_*` call.
    ///
    /// Runs the hook, then drops the payload.
    #[inline]
    pub fn delete_standalone(&mut self, element: Element<T>) {
        self.destroy(element.data);
    }

    /// Destroys every element, front to back. O(n).
    pub fn delete_all(&mut self) {
        while self.delete_front() {}
    }

    /// Destroys every element, then the container itself.
    ///
    /// Equivalent to dropping the container; spelled out for callers that
    /// want teardown to be explicit.
    pub fn delete_container(mut self) {
        self.delete_all();
    }

    // ========================================================================
    // Internals
    // ========================================================================

    /// Moves `value` into an unlinked node in storage.
    #[inline]
    fn store(&mut self, value: T) -> Result<K, Rejected<T>> {
        self.storage
            .try_insert(Node::new(value))
            .map_err(|Full(node)| Rejected::new(Error::OutOfMemory, node.data))
    }

    /// Returns the key of the first node matching `probe`.
    pub(crate) fn find<Q, F>(&self, probe: &Q, mut compare: F) -> Option<K>
    where
        Q: ?Sized,
        F: FnMut(&Q, &T) -> Ordering,
    {
        let mut key = self.head;
        while key.is_some() {
            // Safety: key was reached by traversal from head
            let node = unsafe { self.storage.get_unchecked(key) };
            if compare(probe, &node.data) == Ordering::Equal {
                return Some(key);
            }
            key = node.next;
        }
        None
    }

    /// Links the stored, unlinked node `key` immediately before `before`.
    ///
    /// `before == K::NONE` links at the back; `before == head` links at
    /// the front. O(1).
    fn link_before(&mut self, key: K, before: K) {
        let prev = if before.is_some() {
            // Safety: before is a linked node (caller contract)
            unsafe { self.storage.get_unchecked(before) }.prev
        } else {
            self.tail
        };

        {
            // Safety: key was just stored
            let node = unsafe { self.storage.get_unchecked_mut(key) };
            debug_assert!(node.prev.is_none() && node.next.is_none());
            node.prev = prev;
            node.next = before;
        }

        if prev.is_some() {
            // Safety: prev is valid when is_some() (list invariant)
            unsafe { self.storage.get_unchecked_mut(prev) }.next = key;
        } else {
            self.head = key;
        }

        if before.is_some() {
            // Safety: before validated above
            unsafe { self.storage.get_unchecked_mut(before) }.prev = key;
        } else {
            self.tail = key;
        }

        self.len += 1;
    }

    /// Unlinks the linked node `key`, removes it from storage and returns
    /// its payload. O(1).
    fn detach(&mut self, key: K) -> T {
        debug_assert!(self.len > 0, "detach from empty container");

        // Safety: key is a linked node (caller contract)
        let node = unsafe { self.storage.remove_unchecked(key) };

        if node.prev.is_some() {
            // Safety: prev is valid when is_some() (list invariant)
            unsafe { self.storage.get_unchecked_mut(node.prev) }.next = node.next;
        } else {
            debug_assert!(self.head == key);
            self.head = node.next;
        }

        if node.next.is_some() {
            // Safety: next is valid when is_some() (list invariant)
            unsafe { self.storage.get_unchecked_mut(node.next) }.prev = node.prev;
        } else {
            debug_assert!(self.tail == key);
            self.tail = node.prev;
        }

        self.len -= 1;
        node.data
    }

    /// Runs the hook on the payload of `key`, then installs `value`.
    pub(crate) fn replace_at(&mut self, key: K, value: T) {
        // Safety: key is a linked node (caller contract)
        let node = unsafe { self.storage.get_unchecked_mut(key) };
        if let Some(hook) = self.hook.as_mut() {
            hook(&mut node.data);
        }
        drop(mem::replace(&mut node.data, value));
    }

    /// Runs the hook on `data`, then drops it.
    #[inline]
    fn destroy(&mut self, mut data: T) {
        if let Some(hook) = self.hook.as_mut() {
            hook(&mut data);
        }
        drop(data);
    }
}

// =============================================================================
// Iteration
// =============================================================================

/// Front-to-back iterator over a container's payloads.
pub struct Iter<'a, T, S, K: Key> {
    storage: &'a S,
    front: K,
    back: K,
    remaining: usize,
    _marker: PhantomData<&'a T>,
}

impl<'a, T: 'a, S, K: Key + 'a> Iterator for Iter<'a, T, S, K>
where
    S: Storage<Node<T, K>, Key = K>,
{
    type Item = &'a T;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        // Safety: remaining > 0 means front is a linked node
        let node = unsafe { self.storage.get_unchecked(self.front) };
        self.front = node.next;
        self.remaining -= 1;

        Some(&node.data)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, T: 'a, S, K: Key + 'a> DoubleEndedIterator for Iter<'a, T, S, K>
where
    S: Storage<Node<T, K>, Key = K>,
{
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        // Safety: remaining > 0 means back is a linked node
        let node = unsafe { self.storage.get_unchecked(self.back) };
        self.back = node.prev;
        self.remaining -= 1;

        Some(&node.data)
    }
}

impl<'a, T: 'a, S, K: Key + 'a> ExactSizeIterator for Iter<'a, T, S, K> where
    S: Storage<Node<T, K>, Key = K>
{
}

impl<'a, T: 'a, S, K: Key + 'a> IntoIterator for &'a Container<T, S, K>
where
    S: Storage<Node<T, K>, Key = K>,
{
    type Item = &'a T;
    type IntoIter = Iter<'a, T, S, K>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T, S, K: Key> Drop for Container<T, S, K>
where
    S: Storage<Node<T, K>, Key = K>,
{
    fn drop(&mut self) {
        self.delete_all();
    }
}

impl<T, S, K: Key> fmt::Debug for Container<T, S, K>
where
    S: Storage<Node<T, K>, Key = K>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Container")
            .field("len", &self.len)
            .field("head", &self.head)
            .field("tail", &self.tail)
            .field("hook", &self.hook.is_some())
            .finish()
    }
}

// =============================================================================
// Test support
// =============================================================================

#[cfg(test)]
impl<T, S, K: Key> Container<T, S, K>
where
    S: Storage<Node<T, K>, Key = K>,
{
    /// Payloads front to back.
    pub(crate) fn forward(&self) -> Vec<&T> {
        self.iter().collect()
    }

    /// Checks count, boundary and link-symmetry invariants.
    pub(crate) fn assert_invariants(&self) {
        assert_eq!(self.head.is_none(), self.tail.is_none());
        assert_eq!(self.head.is_none(), self.len == 0);
        assert_eq!(self.storage.len(), self.len);

        let mut forward = Vec::with_capacity(self.len);
        let mut prev = K::NONE;
        let mut key = self.head;
        while key.is_some() {
            let node = self.storage.get(key).expect("dangling next link");
            assert_eq!(node.prev, prev, "prev link does not mirror next link");
            forward.push(key);
            prev = key;
            key = node.next;
        }
        assert_eq!(prev, self.tail);
        assert_eq!(forward.len(), self.len);

        let mut backward = Vec::with_capacity(self.len);
        let mut key = self.tail;
        while key.is_some() {
            backward.push(key);
            key = self.storage.get(key).expect("dangling prev link").prev;
        }
        backward.reverse();
        assert_eq!(forward, backward);
    }
}
