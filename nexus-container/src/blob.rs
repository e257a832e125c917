//! Byte-buffer payloads.
//!
//! [`Blob`] is an owned, non-empty copy of caller-supplied bytes. A
//! `Container<Blob>` gains `*_bytes` variants of the insertion, lookup and
//! replacement operations that take a byte slice plus an explicit size,
//! validate both, and copy exactly `size` bytes into the container.
//!
//! Arguments are checked in a fixed order: data first ([`Error::DataInvalid`]
//! if empty), then size ([`Error::SizeInvalid`] if zero or past the end of
//! the data). Replacement validates old and new arguments, then checks for
//! an empty container and a match, and only then allocates the new buffer.
//!
//! ```
//! use nexus_container::{Blob, Container, Error};
//!
//! let mut list: Container<Blob> = Container::new();
//! let order = |a: &[u8], b: &[u8]| a.cmp(b);
//!
//! list.add_sorted_ascending_bytes(b"pear", 4, order).unwrap();
//! list.add_sorted_ascending_bytes(b"apple-pie", 5, order).unwrap();
//!
//! assert_eq!(list.peek_front().map(|b| b.as_bytes()), Some(&b"apple"[..]));
//! assert_eq!(list.add_back_bytes(b"", 1), Err(Error::DataInvalid));
//! assert_eq!(list.add_back_bytes(b"ab", 3), Err(Error::SizeInvalid));
//! ```

use core::cmp::Ordering;
use core::ops::Deref;

use crate::{Container, Element, Error, Key, Node, Storage};

/// An owned, non-empty byte buffer.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Blob(Box<[u8]>);

impl Blob {
    /// Copies the first `size` bytes of `data`.
    ///
    /// # Errors
    ///
    /// - [`Error::DataInvalid`] if `data` is empty.
    /// - [`Error::SizeInvalid`] if `size` is zero or exceeds `data.len()`.
    /// - [`Error::OutOfMemory`] if the buffer cannot be allocated.
    pub fn copy_from(data: &[u8], size: usize) -> Result<Self, Error> {
        let bytes = checked(data, size)?;

        let mut buf = Vec::new();
        buf.try_reserve_exact(bytes.len())
            .map_err(|_| Error::OutOfMemory)?;
        buf.extend_from_slice(bytes);

        Ok(Self(buf.into_boxed_slice()))
    }

    /// Returns the stored bytes.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Converts into a `Vec<u8>` without copying.
    #[inline]
    pub fn into_vec(self) -> Vec<u8> {
        self.0.into_vec()
    }
}

impl Deref for Blob {
    type Target = [u8];

    #[inline]
    fn deref(&self) -> &[u8] {
        &self.0
    }
}

impl AsRef<[u8]> for Blob {
    #[inline]
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// Validates a (data, size) pair and returns the addressed prefix.
#[inline]
fn checked(data: &[u8], size: usize) -> Result<&[u8], Error> {
    if data.is_empty() {
        return Err(Error::DataInvalid);
    }
    if size == 0 || size > data.len() {
        return Err(Error::SizeInvalid);
    }
    Ok(&data[..size])
}

impl<S, K: Key> Container<Blob, S, K>
where
    S: Storage<Node<Blob, K>, Key = K>,
{
    /// Copies `size` bytes of `data` to the front.
    ///
    /// # Errors
    ///
    /// See [`Blob::copy_from`]; also [`Error::OutOfMemory`] if storage is full.
    pub fn add_front_bytes(&mut self, data: &[u8], size: usize) -> Result<(), Error> {
        self.add_front(Blob::copy_from(data, size)?)?;
        Ok(())
    }

    /// Copies `size` bytes of `data` to the back.
    ///
    /// # Errors
    ///
    /// See [`Blob::copy_from`]; also [`Error::OutOfMemory`] if storage is full.
    pub fn add_back_bytes(&mut self, data: &[u8], size: usize) -> Result<(), Error> {
        self.add_back(Blob::copy_from(data, size)?)?;
        Ok(())
    }

    /// Copies `size` bytes of `data` into ascending position.
    ///
    /// # Errors
    ///
    /// See [`Blob::copy_from`]; also [`Error::OutOfMemory`] if storage is full.
    pub fn add_sorted_ascending_bytes<F>(
        &mut self,
        data: &[u8],
        size: usize,
        mut compare: F,
    ) -> Result<(), Error>
    where
        F: FnMut(&[u8], &[u8]) -> Ordering,
    {
        let blob = Blob::copy_from(data, size)?;
        self.add_sorted_ascending(blob, |new, cur| compare(new, cur))?;
        Ok(())
    }

    /// Copies `size` bytes of `data` into descending position.
    ///
    /// # Errors
    ///
    /// See [`Blob::copy_from`]; also [`Error::OutOfMemory`] if storage is full.
    pub fn add_sorted_descending_bytes<F>(
        &mut self,
        data: &[u8],
        size: usize,
        mut compare: F,
    ) -> Result<(), Error>
    where
        F: FnMut(&[u8], &[u8]) -> Ordering,
    {
        let blob = Blob::copy_from(data, size)?;
        self.add_sorted_descending(blob, |new, cur| compare(new, cur))?;
        Ok(())
    }

    /// Detaches the first element matching the first `size` bytes of
    /// `probe`. Invalid arguments match nothing.
    pub fn get_matching_bytes<F>(&mut self, probe: &[u8], size: usize, mut compare: F) -> Option<Element<Blob>>
    where
        F: FnMut(&[u8], &[u8]) -> Ordering,
    {
        let probe = checked(probe, size).ok()?;
        self.get_matching(probe, |p: &[u8], stored: &Blob| compare(p, stored))
    }

    /// Returns the first element matching the first `size` bytes of
    /// `probe`. Invalid arguments match nothing.
    pub fn peek_matching_bytes<F>(&self, probe: &[u8], size: usize, mut compare: F) -> Option<&Blob>
    where
        F: FnMut(&[u8], &[u8]) -> Ordering,
    {
        let probe = checked(probe, size).ok()?;
        self.peek_matching(probe, |p: &[u8], stored: &Blob| compare(p, stored))
    }

    /// Destroys the first element matching the first `size` bytes of
    /// `probe`. Returns `false` if nothing matched or the arguments are
    /// invalid.
    pub fn delete_matching_bytes<F>(&mut self, probe: &[u8], size: usize, compare: F) -> bool
    where
        F: FnMut(&[u8], &[u8]) -> Ordering,
    {
        match self.get_matching_bytes(probe, size, compare) {
            Some(element) => {
                self.delete_standalone(element);
                true
            }
            None => false,
        }
    }

    /// Replaces the payload of the first element matching `old` with a
    /// copy of `new`, keeping its position.
    ///
    /// # Errors
    ///
    /// In order of precedence: [`Error::DataInvalid`] / [`Error::SizeInvalid`]
    /// for `old`, then for `new`; [`Error::ContainerEmpty`];
    /// [`Error::ElementNotFound`]; [`Error::OutOfMemory`] if the new buffer
    /// cannot be allocated. On error the container is unchanged.
    pub fn replace_matching_bytes<F>(
        &mut self,
        old: &[u8],
        old_size: usize,
        new: &[u8],
        new_size: usize,
        mut compare: F,
    ) -> Result<(), Error>
    where
        F: FnMut(&[u8], &[u8]) -> Ordering,
    {
        let probe = checked(old, old_size)?;
        checked(new, new_size)?;

        if self.is_empty() {
            return Err(Error::ContainerEmpty);
        }
        let key = self
            .find(probe, |p: &[u8], stored: &Blob| compare(p, stored))
            .ok_or(Error::ElementNotFound)?;

        let blob = Blob::copy_from(new, new_size)?;
        self.replace_at(key, blob);
        Ok(())
    }
}
