//! Link keys for container nodes.
//!
//! Nodes refer to their neighbours by key rather than by pointer. A key is
//! a small integer slot number with one reserved value, [`Key::NONE`], that
//! marks "no neighbour" at either end of the chain.

/// Key type used to address nodes in storage and to link them together.
///
/// The reserved [`NONE`](Key::NONE) value is never handed out by storage,
/// so the usable key space is one smaller than the integer range.
///
/// # Example
///
/// ```
/// use nexus_container::Key;
///
/// let key: u32 = 7;
/// assert!(key.is_some());
/// assert!(u32::NONE.is_none());
///
/// // The sentinel itself cannot be produced from a slot number.
/// assert_eq!(u8::try_from_usize(254), Some(254));
/// assert_eq!(u8::try_from_usize(255), None);
/// ```
pub trait Key: Copy + Eq + core::fmt::Debug {
    /// Sentinel meaning "no node".
    const NONE: Self;

    /// Converts a slot number into a key.
    ///
    /// Returns `None` if the slot number does not fit, or would collide
    /// with [`NONE`](Key::NONE).
    fn try_from_usize(val: usize) -> Option<Self>;

    /// Returns the slot number this key addresses.
    fn as_usize(&self) -> usize;

    /// Returns `true` if this is the sentinel.
    #[inline]
    fn is_none(&self) -> bool {
        *self == Self::NONE
    }

    /// Returns `true` if this addresses a node.
    #[inline]
    fn is_some(&self) -> bool {
        !self.is_none()
    }
}

macro_rules! impl_key_for_unsigned {
    ($($ty:ty),*) => {
        $(
            impl Key for $ty {
                const NONE: Self = <$ty>::MAX;

                #[inline]
                fn try_from_usize(val: usize) -> Option<Self> {
                    match <$ty>::try_from(val) {
                        Ok(key) if key != Self::NONE => Some(key),
                        _ => None,
                    }
                }

                #[inline]
                fn as_usize(&self) -> usize {
                    *self as usize
                }
            }
        )*
    };
}

impl_key_for_unsigned!(u8, u16, u32, u64, usize);
