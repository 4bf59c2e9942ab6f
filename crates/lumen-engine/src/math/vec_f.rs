use std::fmt;
use std::ops::{Add, Index, IndexMut, Mul, Neg, Sub};

use super::vector::Vector;
use super::EPSILON;

/// Fixed-size `f32` vector.
///
/// Equality is per-component within [`EPSILON`]. That relation is not
/// transitive, so `VecF` implements neither `Eq` nor `Hash`; use
/// [`VecF::exact_key`] to key hash containers by exact component bits.
#[derive(Debug, Copy, Clone)]
pub struct VecF<const N: usize> {
    v: [f32; N],
}

pub type VecF2 = VecF<2>;
pub type VecF3 = VecF<3>;
pub type VecF4 = VecF<4>;

impl<const N: usize> VecF<N> {
    #[inline]
    pub const fn from_array(v: [f32; N]) -> Self {
        Self { v }
    }

    #[inline]
    pub const fn zero() -> Self {
        Self { v: [0.0; N] }
    }

    #[inline]
    pub const fn splat(value: f32) -> Self {
        Self { v: [value; N] }
    }

    #[inline]
    pub const fn to_array(self) -> [f32; N] {
        self.v
    }

    #[inline]
    pub fn is_finite(&self) -> bool {
        self.v.iter().all(|c| c.is_finite())
    }

    #[inline]
    pub fn dot(&self, rhs: &Self) -> f32 {
        self.v.iter().zip(rhs.v.iter()).map(|(a, b)| a * b).sum()
    }

    #[inline]
    pub fn length(&self) -> f32 {
        self.dot(self).sqrt()
    }

    /// Unit-length copy, or `None` for a zero (or non-finite) vector.
    pub fn normalized(&self) -> Option<Self> {
        let len = self.length();
        if len > 0.0 && len.is_finite() {
            Some(*self * (1.0 / len))
        } else {
            None
        }
    }

    /// True when every component pair differs by at most `epsilon`.
    ///
    /// Equal infinities compare equal; NaN components never do.
    pub fn approx_eq(&self, other: &Self, epsilon: f32) -> bool {
        self.v
            .iter()
            .zip(other.v.iter())
            .all(|(a, b)| a == b || (a - b).abs() <= epsilon)
    }

    /// Bit-exact equality (`-0.0 == 0.0`, NaN equal to NaN).
    #[inline]
    pub fn exact_eq(&self, other: &Self) -> bool {
        self.exact_key() == other.exact_key()
    }

    /// Hashable key built from canonicalized component bits.
    pub fn exact_key(&self) -> ExactKey<N> {
        let mut bits = [0u32; N];
        for (dst, c) in bits.iter_mut().zip(self.v.iter()) {
            *dst = canonical_bits(*c);
        }
        ExactKey(bits)
    }
}

impl VecF<2> {
    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { v: [x, y] }
    }
}

impl VecF<3> {
    #[inline]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { v: [x, y, z] }
    }

    #[inline]
    pub fn cross(&self, rhs: &Self) -> Self {
        let [ax, ay, az] = self.v;
        let [bx, by, bz] = rhs.v;
        Self::new(ay * bz - az * by, az * bx - ax * bz, ax * by - ay * bx)
    }

    /// Homogeneous extension with the given `w`.
    #[inline]
    pub const fn extend(self, w: f32) -> VecF4 {
        let [x, y, z] = self.v;
        VecF4::new(x, y, z, w)
    }
}

impl VecF<4> {
    #[inline]
    pub const fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { v: [x, y, z, w] }
    }

    /// Position in homogeneous coordinates (`w = 1`).
    #[inline]
    pub const fn point(x: f32, y: f32, z: f32) -> Self {
        Self::new(x, y, z, 1.0)
    }

    /// Drops `w`.
    #[inline]
    pub const fn truncate(self) -> VecF3 {
        let [x, y, z, _] = self.v;
        VecF3::new(x, y, z)
    }
}

impl<const N: usize> Vector for VecF<N> {
    type Elem = f32;

    #[inline]
    fn as_array(&self) -> &[f32] {
        &self.v
    }

    #[inline]
    fn as_array_mut(&mut self) -> &mut [f32] {
        &mut self.v
    }
}

impl<const N: usize> Default for VecF<N> {
    fn default() -> Self {
        Self::zero()
    }
}

impl<const N: usize> From<[f32; N]> for VecF<N> {
    fn from(v: [f32; N]) -> Self {
        Self::from_array(v)
    }
}

impl<const N: usize> PartialEq for VecF<N> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self, other) || self.approx_eq(other, EPSILON)
    }
}

impl<const N: usize> fmt::Display for VecF<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, c) in self.v.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{c:?}")?;
        }
        Ok(())
    }
}

impl<const N: usize> Index<usize> for VecF<N> {
    type Output = f32;
    #[inline]
    fn index(&self, i: usize) -> &f32 {
        &self.v[i]
    }
}

impl<const N: usize> IndexMut<usize> for VecF<N> {
    #[inline]
    fn index_mut(&mut self, i: usize) -> &mut f32 {
        &mut self.v[i]
    }
}

impl<const N: usize> Add for VecF<N> {
    type Output = Self;
    #[inline]
    fn add(mut self, rhs: Self) -> Self {
        for (a, b) in self.v.iter_mut().zip(rhs.v) {
            *a += b;
        }
        self
    }
}

impl<const N: usize> Sub for VecF<N> {
    type Output = Self;
    #[inline]
    fn sub(mut self, rhs: Self) -> Self {
        for (a, b) in self.v.iter_mut().zip(rhs.v) {
            *a -= b;
        }
        self
    }
}

impl<const N: usize> Mul<f32> for VecF<N> {
    type Output = Self;
    #[inline]
    fn mul(mut self, rhs: f32) -> Self {
        for a in self.v.iter_mut() {
            *a *= rhs;
        }
        self
    }
}

impl<const N: usize> Neg for VecF<N> {
    type Output = Self;
    #[inline]
    fn neg(self) -> Self {
        self * -1.0
    }
}

impl From<VecF3> for glam::Vec3 {
    fn from(v: VecF3) -> Self {
        glam::Vec3::from_array(v.v)
    }
}

impl From<glam::Vec3> for VecF3 {
    fn from(v: glam::Vec3) -> Self {
        Self::from_array(v.to_array())
    }
}

impl From<VecF4> for glam::Vec4 {
    fn from(v: VecF4) -> Self {
        glam::Vec4::from_array(v.v)
    }
}

impl From<glam::Vec4> for VecF4 {
    fn from(v: glam::Vec4) -> Self {
        Self::from_array(v.to_array())
    }
}

/// Exact-bits identity of a `VecF`, usable as a `HashMap`/`HashSet` key.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct ExactKey<const N: usize>([u32; N]);

fn canonical_bits(c: f32) -> u32 {
    if c.is_nan() {
        f32::NAN.to_bits()
    } else if c == 0.0 {
        0
    } else {
        c.to_bits()
    }
}
