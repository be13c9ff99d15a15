//! Integer widths for vertex indices and capacities.
//!
//! Every graph and solver is generic over a `(VertexIndex, Capacity)` pair so the
//! same code serves the four supported precision modes: (u32, u32), (u32, u64),
//! (u64, u32) and (u64, u64).

use core::fmt::{Debug, Display};
use core::hash::Hash;
use core::ops::{Add, AddAssign, Sub, SubAssign};

use crate::{MfError, MfResult};

/// Integer type used to name vertices and adjacency slots.
pub trait VertexIndex:
    Copy + Eq + Ord + Hash + Debug + Display + Default + Send + Sync + 'static
{
    /// Width in bits.
    const BITS: u32;

    /// Checked conversion from a native index.
    fn from_usize(value: usize) -> MfResult<Self>;

    /// Convert back to a native index.
    ///
    /// Values only ever originate from `from_usize`, so this is lossless.
    fn index(self) -> usize;
}

/// Unsigned capacity / flow type.
pub trait Capacity:
    Copy
    + Eq
    + Ord
    + Hash
    + Debug
    + Display
    + Default
    + Send
    + Sync
    + Add<Output = Self>
    + Sub<Output = Self>
    + AddAssign
    + SubAssign
    + 'static
{
    const ZERO: Self;
    const MAX: Self;
    const BITS: u32;

    fn checked_add(self, rhs: Self) -> Option<Self>;

    fn saturating_sub(self, rhs: Self) -> Self;

    /// Half of the value, rounded down.
    fn halve(self) -> Self;

    /// Smallest power of two `>= self`, or the top bit when that would overflow.
    fn power_of_two_ceiling(self) -> Self;

    /// Widen to the largest supported capacity type.
    fn widen(self) -> u64;

    /// Checked narrowing from the largest supported capacity type.
    fn from_u64(value: u64) -> MfResult<Self>;

    /// Narrow a flow accumulator, clamping at `MAX`.
    fn saturating_from_u128(value: u128) -> Self;

    #[inline]
    fn is_zero(self) -> bool {
        self == Self::ZERO
    }
}

macro_rules! impl_vertex_index {
    ($t:ty) => {
        impl VertexIndex for $t {
            const BITS: u32 = <$t>::BITS;

            #[inline]
            fn from_usize(value: usize) -> MfResult<Self> {
                <$t>::try_from(value).map_err(|_| MfError::WidthOverflow {
                    what: "vertex index",
                    value: value as u64,
                    bits: <$t>::BITS,
                })
            }

            #[inline]
            fn index(self) -> usize {
                self as usize
            }
        }
    };
}

macro_rules! impl_capacity {
    ($t:ty) => {
        impl Capacity for $t {
            const ZERO: Self = 0;
            const MAX: Self = <$t>::MAX;
            const BITS: u32 = <$t>::BITS;

            #[inline]
            fn checked_add(self, rhs: Self) -> Option<Self> {
                <$t>::checked_add(self, rhs)
            }

            #[inline]
            fn saturating_sub(self, rhs: Self) -> Self {
                <$t>::saturating_sub(self, rhs)
            }

            #[inline]
            fn halve(self) -> Self {
                self / 2
            }

            #[inline]
            fn power_of_two_ceiling(self) -> Self {
                self.checked_next_power_of_two()
                    .unwrap_or(1 << (<$t>::BITS - 1))
            }

            #[inline]
            fn widen(self) -> u64 {
                u64::from(self)
            }

            #[inline]
            fn from_u64(value: u64) -> MfResult<Self> {
                <$t>::try_from(value).map_err(|_| MfError::WidthOverflow {
                    what: "capacity",
                    value,
                    bits: <$t>::BITS,
                })
            }

            #[inline]
            fn saturating_from_u128(value: u128) -> Self {
                <$t>::try_from(value).unwrap_or(<$t>::MAX)
            }
        }
    };
}

impl_vertex_index!(u32);
impl_vertex_index!(u64);
impl_capacity!(u32);
impl_capacity!(u64);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vertex_index_round_trip() {
        for i in [0_usize, 1, 42, 10_000] {
            assert_eq!(u32::from_usize(i).unwrap().index(), i);
            assert_eq!(u64::from_usize(i).unwrap().index(), i);
        }
    }

    #[cfg(target_pointer_width = "64")]
    #[test]
    fn narrow_vertex_index_rejects_large_values() {
        let err = u32::from_usize(u32::MAX as usize + 1).unwrap_err();
        assert!(matches!(err, MfError::WidthOverflow { bits: 32, .. }));
    }

    #[test]
    fn capacity_narrowing() {
        assert_eq!(u32::from_u64(7).unwrap(), 7);
        assert!(u32::from_u64(u64::from(u32::MAX) + 1).is_err());
        assert_eq!(u64::from_u64(u64::MAX).unwrap(), u64::MAX);
    }

    #[test]
    fn power_of_two_ceiling_saturates_at_top_bit() {
        assert_eq!(0_u32.power_of_two_ceiling(), 1);
        assert_eq!(5_u32.power_of_two_ceiling(), 8);
        assert_eq!(8_u64.power_of_two_ceiling(), 8);
        assert_eq!(u32::MAX.power_of_two_ceiling(), 1 << 31);
    }

    #[test]
    fn checked_add_detects_overflow() {
        assert_eq!(Capacity::checked_add(u32::MAX, 1), None);
        assert_eq!(Capacity::checked_add(3_u64, 4), Some(7));
        assert!(0_u64.is_zero());
        assert_eq!(<u32 as Capacity>::halve(9), 4);
    }

    #[test]
    fn accumulator_narrowing_clamps() {
        assert_eq!(u32::saturating_from_u128(17), 17);
        assert_eq!(u32::saturating_from_u128(u128::from(u32::MAX) * 2), u32::MAX);
        assert_eq!(u64::saturating_from_u128(u128::MAX), u64::MAX);
    }

    proptest::proptest! {
        #[test]
        fn power_of_two_ceiling_bounds(x in 1_u64..=(1 << 63)) {
            let p = x.power_of_two_ceiling();
            proptest::prop_assert!(p.is_power_of_two());
            proptest::prop_assert!(p >= x && p.halve() < x);
        }

        #[test]
        fn narrowing_matches_try_from(x in proptest::prelude::any::<u64>()) {
            proptest::prop_assert_eq!(u32::from_u64(x).ok(), u32::try_from(x).ok());
        }
    }
}
