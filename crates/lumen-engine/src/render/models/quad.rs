use crate::math::VecF3;

use super::mesh::{Mesh, Model, Vertex};

/// Axis-aligned rectangle in the XY plane, facing +Z.
///
/// Two counter-clockwise triangles; texture coordinates run from `(0, 0)` at
/// the lower-left corner to `(1, 1)` at the upper-right.
#[derive(Debug)]
pub struct Quad {
    width: f32,
    height: f32,
    center: VecF3,
    mesh: Mesh,
}

impl Quad {
    pub fn new(width: f32, height: f32, center: VecF3) -> Self {
        let [cx, cy, cz] = center.to_array();
        let (hw, hh) = (width * 0.5, height * 0.5);

        let corner = |sx: f32, sy: f32| Vertex {
            position: [cx + sx * hw, cy + sy * hh, cz, 1.0],
            tex_coord: [(sx + 1.0) * 0.5, (sy + 1.0) * 0.5],
        };
        let ll = corner(-1.0, -1.0);
        let lr = corner(1.0, -1.0);
        let ur = corner(1.0, 1.0);
        let ul = corner(-1.0, 1.0);

        Self {
            width,
            height,
            center,
            mesh: Mesh::new(
                "lumen quad vbo",
                vec![ll, lr, ur, ll, ur, ul],
                wgpu::PrimitiveTopology::TriangleList,
            ),
        }
    }

    pub fn size(&self) -> (f32, f32) {
        (self.width, self.height)
    }

    pub fn center(&self) -> VecF3 {
        self.center
    }
}

impl Model for Quad {
    fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    fn mesh_mut(&mut self) -> &mut Mesh {
        &mut self.mesh
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signed_area(a: [f32; 4], b: [f32; 4], c: [f32; 4]) -> f32 {
        0.5 * ((b[0] - a[0]) * (c[1] - a[1]) - (c[0] - a[0]) * (b[1] - a[1]))
    }

    #[test]
    fn full_screen_quad_spans_clip_space() {
        let quad = Quad::new(2.0, 2.0, VecF3::new(0.0, 0.0, 0.1));
        let v = quad.vertices();
        assert_eq!(v.len(), 6);
        for vertex in v {
            assert_eq!(vertex.position[0].abs(), 1.0);
            assert_eq!(vertex.position[1].abs(), 1.0);
            assert_eq!(vertex.position[2], 0.1);
            assert_eq!(vertex.position[3], 1.0);
        }
    }

    #[test]
    fn triangles_wind_counter_clockwise() {
        let quad = Quad::new(3.0, 1.0, VecF3::new(1.0, -2.0, 0.0));
        for tri in quad.vertices().chunks(3) {
            assert!(signed_area(tri[0].position, tri[1].position, tri[2].position) > 0.0);
        }
    }

    #[test]
    fn tex_coords_follow_corners() {
        let quad = Quad::new(4.0, 2.0, VecF3::new(0.0, 0.0, 0.0));
        for vertex in quad.vertices() {
            let [u, v] = vertex.tex_coord;
            assert_eq!(u, if vertex.position[0] > 0.0 { 1.0 } else { 0.0 });
            assert_eq!(v, if vertex.position[1] > 0.0 { 1.0 } else { 0.0 });
        }
    }
}
