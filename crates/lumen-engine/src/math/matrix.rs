//! Camera and model matrix helpers.
//!
//! Conventions: right-handed, column-major `glam::Mat4`, clip depth `0..1`
//! (wgpu). Angles are in degrees.

use glam::Mat4;

use super::{VecF3, VecF4};

#[inline]
pub fn identity() -> Mat4 {
    Mat4::IDENTITY
}

/// View matrix looking from `eye` at `at`. `w` components are ignored.
pub fn look_at(eye: VecF4, at: VecF4, up: VecF4) -> Mat4 {
    Mat4::look_at_rh(
        eye.truncate().into(),
        at.truncate().into(),
        up.truncate().into(),
    )
}

/// Perspective projection with vertical field of view `fovy_deg`.
pub fn perspective(fovy_deg: f32, aspect: f32, z_near: f32, z_far: f32) -> Mat4 {
    Mat4::perspective_rh(fovy_deg.to_radians(), aspect.max(f32::EPSILON), z_near, z_far)
}

#[inline]
pub fn translate(v: VecF3) -> Mat4 {
    Mat4::from_translation(v.into())
}

#[inline]
pub fn rotation_x(deg: f32) -> Mat4 {
    Mat4::from_rotation_x(deg.to_radians())
}

#[inline]
pub fn rotation_y(deg: f32) -> Mat4 {
    Mat4::from_rotation_y(deg.to_radians())
}

#[inline]
pub fn rotation_z(deg: f32) -> Mat4 {
    Mat4::from_rotation_z(deg.to_radians())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn apply(m: Mat4, p: VecF4) -> VecF4 {
        (m * glam::Vec4::from(p)).into()
    }

    #[test]
    fn identity_leaves_points_alone() {
        let p = VecF4::point(1.0, -2.0, 3.0);
        assert_eq!(apply(identity(), p), p);
    }

    #[test]
    fn translate_moves_points_not_directions() {
        let m = translate(VecF3::new(1.0, 2.0, 3.0));
        assert_eq!(apply(m, VecF4::point(0.0, 0.0, 0.0)), VecF4::point(1.0, 2.0, 3.0));
        assert_eq!(apply(m, VecF4::new(1.0, 0.0, 0.0, 0.0)), VecF4::new(1.0, 0.0, 0.0, 0.0));
    }

    #[test]
    fn rotation_z_quarter_turn() {
        let p = apply(rotation_z(90.0), VecF4::point(1.0, 0.0, 0.0));
        assert_eq!(p, VecF4::point(0.0, 1.0, 0.0));
    }

    #[test]
    fn rotation_x_quarter_turn() {
        let p = apply(rotation_x(90.0), VecF4::point(0.0, 1.0, 0.0));
        assert_eq!(p, VecF4::point(0.0, 0.0, 1.0));
    }

    #[test]
    fn look_at_puts_target_on_negative_z() {
        let view = look_at(
            VecF4::point(0.0, 0.0, 5.0),
            VecF4::point(0.0, 0.0, 0.0),
            VecF4::new(0.0, 1.0, 0.0, 0.0),
        );
        assert_eq!(apply(view, VecF4::point(0.0, 0.0, 0.0)), VecF4::point(0.0, 0.0, -5.0));
    }

    #[test]
    fn perspective_maps_near_plane_to_zero_depth() {
        let proj = perspective(60.0, 1.5, 0.1, 100.0);
        let clip = proj * glam::Vec4::new(0.0, 0.0, -0.1, 1.0);
        assert!((clip.z / clip.w).abs() < 1.0e-5);
        let clip = proj * glam::Vec4::new(0.0, 0.0, -100.0, 1.0);
        assert!((clip.z / clip.w - 1.0).abs() < 1.0e-5);
    }
}
