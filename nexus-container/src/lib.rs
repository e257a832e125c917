//! Generic doubly-linked container over slab storage.
//!
//! [`Container`] is an ordered sequence of owned payloads that can be used
//! as a deque, a sorted list, or a small key/value map. Nodes live in
//! slab-like [`Storage`] and link to each other by key, so detaching an
//! element never shuffles the others.
//!
//! # Design
//!
//! ```text
//! Storage (SlotStorage, slab::Slab) - owns nodes, hands out stable keys
//! Container                         - links keys front to back, owns payloads
//! Element<T>                        - a payload detached from its container
//! ```
//!
//! - **Owned payloads**: insertion moves the value in; `get_*` moves it back
//!   out as an [`Element`]; `delete_*` and teardown destroy it in place.
//! - **Destruction hook**: an optional closure runs on each payload right
//!   before the container drops it.
//! - **Fallible allocation**: storage growth uses `try_reserve`, so running
//!   out of memory is an [`Error::OutOfMemory`] with the value handed back
//!   in [`Rejected`], not an abort.
//! - **Caller-defined order**: sorted insertion and lookups take a
//!   comparator returning [`Ordering`](core::cmp::Ordering).
//!
//! # Quick Start
//!
//! ```
//! use nexus_container::Container;
//!
//! let mut queue: Container<u64> = Container::new();
//!
//! queue.add_back(1).unwrap();
//! queue.add_back(2).unwrap();
//! queue.add_front(0).unwrap();
//!
//! assert_eq!(queue.len(), 3);
//! assert_eq!(queue.get_front().map(|e| e.into_inner()), Some(0));
//! assert_eq!(queue.peek_last(), Some(&2));
//! ```
//!
//! # Bounded Containers
//!
//! A container built with [`Container::try_with_capacity`] allocates all of
//! its slots up front and never grows:
//!
//! ```
//! use nexus_container::{Container, Error};
//!
//! let mut bounded: Container<u64> = Container::try_with_capacity(1).unwrap();
//! bounded.add_back(1).unwrap();
//!
//! let rejected = bounded.add_back(2).unwrap_err();
//! assert_eq!(rejected.error, Error::OutOfMemory);
//! assert_eq!(rejected.into_inner(), 2);
//! ```
//!
//! # Byte Payloads
//!
//! [`Blob`] stores a validated copy of a byte slice; see the [`blob`]
//! module for the `*_bytes` operations on `Container<Blob>`.
//!
//! # Features
//!
//! - `slab`: implements [`Storage`] for `slab::Slab`.

#![warn(missing_docs)]

pub mod blob;
pub mod container;
pub mod error;
pub mod key;
pub mod storage;

pub use blob::Blob;
pub use container::{Container, ContainerStorage, Element, Hook, Iter, Node};
pub use error::{Error, Rejected};
pub use key::Key;
pub use storage::{Full, SlotStorage, Storage};

#[cfg(feature = "slab")]
pub use container::SlabContainerStorage;
