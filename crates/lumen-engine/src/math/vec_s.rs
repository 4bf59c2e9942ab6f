use std::fmt;
use std::ops::{Index, IndexMut};

use super::vector::Vector;

/// Fixed-size `i16` vector with exact equality and a standard hash.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct VecS<const N: usize> {
    v: [i16; N],
}

pub type VecS2 = VecS<2>;
pub type VecS3 = VecS<3>;
pub type VecS4 = VecS<4>;

impl<const N: usize> VecS<N> {
    #[inline]
    pub const fn from_array(v: [i16; N]) -> Self {
        Self { v }
    }

    #[inline]
    pub const fn zero() -> Self {
        Self { v: [0; N] }
    }

    #[inline]
    pub const fn to_array(self) -> [i16; N] {
        self.v
    }
}

impl VecS<2> {
    #[inline]
    pub const fn new(x: i16, y: i16) -> Self {
        Self { v: [x, y] }
    }
}

impl VecS<3> {
    #[inline]
    pub const fn new(x: i16, y: i16, z: i16) -> Self {
        Self { v: [x, y, z] }
    }
}

impl VecS<4> {
    #[inline]
    pub const fn new(x: i16, y: i16, z: i16, w: i16) -> Self {
        Self { v: [x, y, z, w] }
    }
}

impl<const N: usize> Vector for VecS<N> {
    type Elem = i16;

    #[inline]
    fn as_array(&self) -> &[i16] {
        &self.v
    }

    #[inline]
    fn as_array_mut(&mut self) -> &mut [i16] {
        &mut self.v
    }
}

impl<const N: usize> Default for VecS<N> {
    fn default() -> Self {
        Self::zero()
    }
}

impl<const N: usize> From<[i16; N]> for VecS<N> {
    fn from(v: [i16; N]) -> Self {
        Self::from_array(v)
    }
}

impl<const N: usize> fmt::Display for VecS<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, c) in self.v.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{c}")?;
        }
        Ok(())
    }
}

impl<const N: usize> Index<usize> for VecS<N> {
    type Output = i16;
    #[inline]
    fn index(&self, i: usize) -> &i16 {
        &self.v[i]
    }
}

impl<const N: usize> IndexMut<usize> for VecS<N> {
    #[inline]
    fn index_mut(&mut self, i: usize) -> &mut i16 {
        &mut self.v[i]
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn set_then_get_round_trips() {
        let mut v = VecS3::zero();
        v.set(0, i16::MIN).unwrap();
        v.set(2, i16::MAX).unwrap();
        assert_eq!(v.get(0).unwrap(), i16::MIN);
        assert_eq!(v.get(1).unwrap(), 0);
        assert_eq!(v.get(2).unwrap(), i16::MAX);
    }

    #[test]
    fn out_of_range_index_is_reported() {
        let v = VecS2::new(1, 2);
        assert!(v.get(2).is_err());
    }

    #[test]
    fn equality_is_exact_and_ordered() {
        let a = VecS2::new(5, -3);
        assert_eq!(a, VecS2::new(5, -3));
        assert_ne!(a, VecS2::new(5, 3));
        assert_ne!(a, VecS2::new(-3, 5));
    }

    #[test]
    fn hash_agrees_with_equality() {
        let mut map = HashMap::new();
        map.insert(VecS2::new(5, -3), "a");
        map.insert(VecS2::new(-3, 5), "b");
        assert_eq!(map.get(&VecS2::new(5, -3)), Some(&"a"));
        assert_eq!(map.get(&VecS2::new(-3, 5)), Some(&"b"));
        assert_eq!(map.get(&VecS2::new(5, 3)), None);
    }

    #[test]
    fn mutable_array_aliases_storage() {
        let mut v = VecS4::new(1, 2, 3, 4);
        v.as_array_mut()[3] = -7;
        assert_eq!(v.get(3).unwrap(), -7);
    }

    #[test]
    fn buffer_view_is_rewound_and_packed() {
        let v = VecS3::new(1, 2, 3);
        let mut b = v.as_buffer();
        assert_eq!(b.get(), Some(1));
        assert_eq!(v.as_buffer().position(), 0);
        assert_eq!(v.as_buffer().as_bytes().len(), 6);
    }

    #[test]
    fn display_is_space_separated() {
        assert_eq!(VecS3::new(1, -2, 3).to_string(), "1 -2 3");
    }
}
