use std::cmp::Ordering;
use std::sync::atomic::{self, AtomicUsize};
use std::sync::{Arc, Mutex};
use std::thread;

use nexus_container::{
    Blob, Container, ContainerStorage, Error, Full, Key, Node, SlotStorage, Storage,
};

// =============================================================================
// Helpers
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
struct Pair {
    key: String,
    val: i64,
}

fn pair(key: &str, val: i64) -> Pair {
    Pair {
        key: key.to_owned(),
        val,
    }
}

fn key_order(new: &Pair, cur: &Pair) -> Ordering {
    new.key.cmp(&cur.key)
}

fn by_key(probe: &str, stored: &Pair) -> Ordering {
    probe.cmp(stored.key.as_str())
}

fn keys<S>(map: &Container<Pair, S>) -> Vec<String>
where
    S: Storage<Node<Pair, u32>, Key = u32>,
{
    map.iter().map(|p| p.key.clone()).collect()
}

/// Shared call counter that can move into a hook.
#[derive(Clone, Default)]
struct Counter(Arc<AtomicUsize>);

impl Counter {
    fn get(&self) -> usize {
        self.0.load(atomic::Ordering::Relaxed)
    }

    fn bump(&self) {
        self.0.fetch_add(1, atomic::Ordering::Relaxed);
    }
}

/// Counts payload drops independently of the hook.
struct DropCounter(Counter);

impl Drop for DropCounter {
    fn drop(&mut self) {
        self.0.bump();
    }
}

// =============================================================================
// Map usage
// =============================================================================

#[test]
fn map_insert_or_replace() {
    let released = Arc::new(Mutex::new(Vec::new()));
    let log = released.clone();
    let mut map: Container<Pair> =
        Container::with_hook(move |p: &mut Pair| log.lock().unwrap().push(p.key.clone()));

    for (key, val) in [("m", 1), ("c", 2), ("x", 3), ("c", 20)] {
        let entry = pair(key, val);
        if map.peek_matching(key, by_key).is_some() {
            map.replace_matching(key, entry, by_key).unwrap();
        } else {
            map.add_sorted_ascending(entry, key_order).unwrap();
        }
    }

    assert_eq!(keys(&map), vec!["c", "m", "x"]);
    assert_eq!(map.peek_matching("c", by_key).map(|p| p.val), Some(20));
    assert_eq!(*released.lock().unwrap(), vec!["c".to_owned()]);

    while let Some(element) = map.get_front() {
        map.delete_standalone(element);
    }
    assert_eq!(*released.lock().unwrap(), vec!["c", "c", "m", "x"]);
}

#[test]
fn map_descending_order() {
    let mut map: Container<Pair> = Container::new();
    for key in ["b", "d", "a", "c"] {
        map.add_sorted_descending(pair(key, 0), key_order).unwrap();
    }
    assert_eq!(keys(&map), vec!["d", "c", "b", "a"]);
}

// =============================================================================
// Ownership
// =============================================================================

#[test]
fn every_payload_dropped_exactly_once() {
    let drops = Counter::default();
    let hooks = Counter::default();
    let hook_count = hooks.clone();

    let mut list: Container<DropCounter> =
        Container::with_hook(move |_| hook_count.bump());
    for _ in 0..6 {
        list.add_back(DropCounter(drops.clone())).ok().unwrap();
    }

    // Hooked path.
    assert!(list.delete_front());
    let element = list.get_last().unwrap();
    list.delete_standalone(element);

    // Unhooked path: caller keeps the payload.
    let kept = list.get_front().unwrap().into_inner();
    assert_eq!(drops.get(), 2);
    drop(kept);
    assert_eq!(drops.get(), 3);
    assert_eq!(hooks.get(), 2);

    drop(list);
    assert_eq!(drops.get(), 6);
    assert_eq!(hooks.get(), 5);
}

#[test]
fn rejected_value_is_not_dropped_or_hooked() {
    let drops = Counter::default();
    let hooks = Counter::default();
    let hook_count = hooks.clone();

    let mut list: Container<DropCounter> = Container::try_with_capacity(1).unwrap();
    list.set_hook(Some(Box::new(move |_: &mut DropCounter| {
        hook_count.bump()
    })));

    list.add_back(DropCounter(drops.clone())).ok().unwrap();
    let rejected = match list.add_back(DropCounter(drops.clone())) {
        Ok(()) => panic!("bounded container accepted a second element"),
        Err(rejected) => rejected,
    };

    assert_eq!(rejected.error, Error::OutOfMemory);
    assert_eq!(drops.get(), 0);
    assert_eq!(hooks.get(), 0);

    drop(rejected);
    assert_eq!(drops.get(), 1);
    assert_eq!(hooks.get(), 0);
}

// =============================================================================
// Storage choices
// =============================================================================

#[test]
fn narrow_keys_bound_the_container() {
    // u8 keys address slots 0..=254.
    let mut list: Container<u32, ContainerStorage<u32, u8>, u8> = Container::new();
    for i in 0..255 {
        list.add_back(i).unwrap();
    }

    let rejected = list.add_back(255).unwrap_err();
    assert_eq!(rejected.error, Error::OutOfMemory);
    assert_eq!(list.len(), 255);

    assert!(list.delete_matching(&100, |p, cur| p.cmp(cur)));
    list.add_back(255).unwrap();
    assert_eq!(list.peek_last(), Some(&255));
}

#[test]
fn explicit_slot_storage() {
    let storage: ContainerStorage<&str> = SlotStorage::try_with_capacity(2).unwrap();
    let mut list: Container<&str> = Container::with_storage(storage);

    list.add_back("a").unwrap();
    list.add_front("b").unwrap();
    assert_eq!(list.add_back("c").unwrap_err().into_inner(), "c");
    assert_eq!(list.iter().copied().collect::<Vec<_>>(), vec!["b", "a"]);
}

/// Minimal storage without slot reuse, exercising the `Storage` seam.
struct AppendOnly<T> {
    slots: Vec<Option<T>>,
    len: usize,
}

impl<T> AppendOnly<T> {
    fn new() -> Self {
        Self {
            slots: Vec::new(),
            len: 0,
        }
    }
}

impl<T> Storage<T> for AppendOnly<T> {
    type Key = u32;

    fn try_insert(&mut self, value: T) -> Result<u32, Full<T>> {
        let Some(key) = u32::try_from_usize(self.slots.len()) else {
            return Err(Full(value));
        };
        self.slots.push(Some(value));
        self.len += 1;
        Ok(key)
    }

    fn remove(&mut self, key: u32) -> Option<T> {
        let value = self.slots.get_mut(key.as_usize())?.take();
        if value.is_some() {
            self.len -= 1;
        }
        value
    }

    fn get(&self, key: u32) -> Option<&T> {
        self.slots.get(key.as_usize())?.as_ref()
    }

    fn get_mut(&mut self, key: u32) -> Option<&mut T> {
        self.slots.get_mut(key.as_usize())?.as_mut()
    }

    fn len(&self) -> usize {
        self.len
    }

    unsafe fn get_unchecked(&self, key: u32) -> &T {
        self.get(key).unwrap()
    }

    unsafe fn get_unchecked_mut(&mut self, key: u32) -> &mut T {
        self.get_mut(key).unwrap()
    }

    unsafe fn remove_unchecked(&mut self, key: u32) -> T {
        self.remove(key).unwrap()
    }
}

#[test]
fn custom_storage_backend() {
    let mut list: Container<u64, AppendOnly<Node<u64>>> = Container::with_storage(AppendOnly::new());

    for value in [30, 10, 20] {
        list.add_sorted_ascending(value, |new, cur| new.cmp(cur)).unwrap();
    }
    assert_eq!(list.get_matching(&20, |p, cur| p.cmp(cur)).map(|e| e.into_inner()), Some(20));
    list.add_front(5).unwrap();

    assert_eq!(list.iter().copied().collect::<Vec<_>>(), vec![5, 10, 30]);
    assert_eq!(list.iter().rev().copied().collect::<Vec<_>>(), vec![30, 10, 5]);
}

#[cfg(feature = "slab")]
#[test]
fn slab_storage_backend() {
    use nexus_container::SlabContainerStorage;

    let mut list: Container<String, SlabContainerStorage<String>, usize> =
        Container::with_storage(slab::Slab::new());

    list.add_back("tail".to_owned()).unwrap();
    list.add_front("head".to_owned()).unwrap();
    list.replace_matching("tail", "end".to_owned(), |p: &str, s: &String| p.cmp(s.as_str()))
        .unwrap();

    assert_eq!(list.peek_last().map(String::as_str), Some("end"));
    assert_eq!(list.len(), 2);
}

// =============================================================================
// Errors
// =============================================================================

#[test]
fn question_mark_propagation() {
    fn load(list: &mut Container<Pair>, input: &[(&str, i64)]) -> Result<usize, Error> {
        for &(key, val) in input {
            list.add_back(pair(key, val))?;
        }
        list.replace_matching("missing", pair("missing", 0), by_key)?;
        Ok(list.len())
    }

    let mut list: Container<Pair> = Container::new();
    assert_eq!(load(&mut list, &[]), Err(Error::ContainerEmpty));
    assert_eq!(load(&mut list, &[("a", 1)]), Err(Error::ElementNotFound));
    assert_eq!(list.len(), 1);
}

#[test]
fn boxed_error_sources() {
    let mut list: Container<u8> = Container::try_with_capacity(1).unwrap();
    list.add_back(1).unwrap();

    let err: Box<dyn std::error::Error> = Box::new(list.add_back(2).unwrap_err());
    assert_eq!(err.to_string(), "value rejected: out of memory");
    assert_eq!(err.source().map(|s| s.to_string()).as_deref(), Some("out of memory"));
}

// =============================================================================
// Byte payloads
// =============================================================================

#[test]
fn byte_container_round_trip() {
    let mut list: Container<Blob> = Container::new();
    let order = |a: &[u8], b: &[u8]| a.cmp(b);

    list.add_sorted_ascending_bytes(&7i64.to_le_bytes(), 8, order).unwrap();
    list.add_sorted_ascending_bytes(b"zz", 2, order).unwrap();
    list.add_sorted_ascending_bytes(b"aa", 2, order).unwrap();

    // Little-endian 7 starts with 0x07, below any ASCII letter.
    assert_eq!(list.peek_front().map(|b| b.len()), Some(8));
    assert_eq!(list.peek_last().map(|b| b.as_bytes()), Some(&b"zz"[..]));

    let found = list.get_matching_bytes(&7i64.to_le_bytes(), 8, order).unwrap();
    let raw: [u8; 8] = found.as_bytes().try_into().unwrap();
    assert_eq!(i64::from_le_bytes(raw), 7);
    assert_eq!(list.peek_front().map(|b| b.as_bytes()), Some(&b"aa"[..]));

    assert_eq!(
        list.replace_matching_bytes(b"aa", 2, b"", 0, order),
        Err(Error::DataInvalid)
    );
    list.replace_matching_bytes(b"aa", 2, b"bb", 2, order).unwrap();
    assert!(list.peek_matching_bytes(b"bb", 2, order).is_some());
}

// =============================================================================
// Threads
// =============================================================================

#[test]
fn shared_behind_a_lock() {
    let hooks = Counter::default();
    let hook_count = hooks.clone();
    let shared: Arc<Mutex<Container<u64>>> =
        Arc::new(Mutex::new(Container::with_hook(move |_| hook_count.bump())));

    let workers: Vec<_> = (0..4u64)
        .map(|worker| {
            let shared = Arc::clone(&shared);
            thread::spawn(move || {
                for i in 0..50 {
                    let mut list = shared.lock().unwrap();
                    list.add_sorted_ascending(worker * 100 + i, |new, cur| new.cmp(cur))
                        .unwrap();
                }
            })
        })
        .collect();
    for worker in workers {
        worker.join().unwrap();
    }

    let mut list = shared.lock().unwrap();
    assert_eq!(list.len(), 200);
    let values: Vec<u64> = list.iter().copied().collect();
    assert!(values.windows(2).all(|w| w[0] <= w[1]));

    list.delete_all();
    assert_eq!(hooks.get(), 200);
}

#[test]
fn container_moves_to_another_thread() {
    let mut list: Container<String> = Container::new();
    list.add_back("crossing".to_owned()).unwrap();

    let handle = thread::spawn(move || list.get_front().map(|e| e.into_inner()));
    assert_eq!(handle.join().unwrap().as_deref(), Some("crossing"));
}
