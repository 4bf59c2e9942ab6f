//! Small fixed-size vector types and camera matrix helpers.
//!
//! Vectors own their storage as a plain array and expose it without copying:
//! - `VecF<N>`: `f32` components, tolerance equality (`EPSILON`)
//! - `VecS<N>`: `i16` components, exact equality and hashing
//!
//! Both share the [`Vector`] contract (bounds-checked get/set, aliased slice,
//! rewound buffer view). Matrices are `glam::Mat4`; see [`matrix`].

pub mod matrix;

mod vec_f;
mod vec_s;
mod vector;

pub use vec_f::{ExactKey, VecF, VecF2, VecF3, VecF4};
pub use vec_s::{VecS, VecS2, VecS3, VecS4};
pub use vector::{IndexOutOfBounds, Vector, VectorBuffer};

/// Per-component tolerance used by `VecF` equality.
pub const EPSILON: f32 = 1.0e-5;
