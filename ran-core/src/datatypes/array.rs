//! SEQUENCE OF containers

use crate::error::{CodecError, CodecResult};
use serde::{Deserialize, Deserializer, Serialize};
use std::ops::Deref;

/// Unbounded SEQUENCE OF
pub type DynArray<T> = Vec<T>;

/// SEQUENCE (SIZE(LB..N)) OF
///
/// `N` matches the ASN.1 `SIZE` upper bound. Every way of growing the array
/// checks it, so a value holding more than `N` elements cannot be
/// constructed and therefore cannot be packed. The lower bound `LB` is only
/// checked by the codec, since an array is built up from empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct BoundedArray<T, const N: usize, const LB: usize = 0>(Vec<T>);

impl<T, const N: usize, const LB: usize> BoundedArray<T, N, LB> {
    /// Maximum number of elements
    pub const CAPACITY: usize = N;
    /// Minimum number of elements on the wire
    pub const MIN_SIZE: usize = LB;

    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Append an element
    ///
    /// # Errors
    ///
    /// Returns `CodecError::SizeOutOfRange` if the array is already full.
    pub fn push(&mut self, value: T) -> CodecResult<()> {
        if self.0.len() >= N {
            return Err(CodecError::size_out_of_range(self.0.len() + 1, LB, N));
        }
        self.0.push(value);
        Ok(())
    }

    pub fn pop(&mut self) -> Option<T> {
        self.0.pop()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn is_full(&self) -> bool {
        self.0.len() == N
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.0.iter_mut()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<T> {
        self.0
    }
}

impl<T, const N: usize, const LB: usize> Default for BoundedArray<T, N, LB> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, const N: usize, const LB: usize> Deref for BoundedArray<T, N, LB> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        &self.0
    }
}

impl<T, const N: usize, const LB: usize> TryFrom<Vec<T>> for BoundedArray<T, N, LB> {
    type Error = CodecError;

    fn try_from(values: Vec<T>) -> CodecResult<Self> {
        if values.len() > N {
            return Err(CodecError::size_out_of_range(values.len(), LB, N));
        }
        Ok(Self(values))
    }
}

impl<T, const N: usize, const LB: usize> IntoIterator for BoundedArray<T, N, LB> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a, T, const N: usize, const LB: usize> IntoIterator for &'a BoundedArray<T, N, LB> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl<'de, T: Deserialize<'de>, const N: usize, const LB: usize> Deserialize<'de> for BoundedArray<T, N, LB> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let values = Vec::<T>::deserialize(deserializer)?;
        Self::try_from(values).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounded_array_push_past_capacity() {
        let mut array = BoundedArray::<u8, 2>::new();
        array.push(1).unwrap();
        array.push(2).unwrap();
        assert!(array.is_full());
        assert_eq!(
            array.push(3),
            Err(CodecError::SizeOutOfRange { size: 3, lb: 0, ub: 2 })
        );
        assert_eq!(array.len(), 2);
    }

    #[test]
    fn test_bounded_array_lower_bound_in_error() {
        let mut array = BoundedArray::<u8, 1, 1>::new();
        array.push(1).unwrap();
        assert_eq!(
            array.push(2),
            Err(CodecError::SizeOutOfRange { size: 2, lb: 1, ub: 1 })
        );
    }

    #[test]
    fn test_bounded_array_try_from() {
        assert!(BoundedArray::<u8, 3>::try_from(vec![1, 2, 3]).is_ok());
        assert!(BoundedArray::<u8, 3>::try_from(vec![1, 2, 3, 4]).is_err());
    }

    #[test]
    fn test_bounded_array_serde() {
        let array = BoundedArray::<u8, 2>::try_from(vec![4, 5]).unwrap();
        assert_eq!(serde_json::to_string(&array).unwrap(), "[4,5]");
        assert!(serde_json::from_str::<BoundedArray<u8, 2>>("[1,2,3]").is_err());
    }
}
