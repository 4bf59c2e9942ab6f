use crate::math::VecF3;

use super::mesh::{Mesh, Model, Vertex};

/// Line segment with tick marks, drawn as a line list.
///
/// Ticks are laid out from `start` every `minor_interval`; those that fall on
/// a multiple of `major_interval` are major. A major tick reaches
/// `minor_interval` to each side of the axis, a minor tick half that.
/// Ticks lie in the plane spanned by the axis and world Y (world X for an
/// axis parallel to Y).
#[derive(Debug)]
pub struct Axis {
    start: VecF3,
    end: VecF3,
    major_interval: f32,
    minor_interval: f32,
    mesh: Mesh,
}

impl Axis {
    pub fn new(start: VecF3, end: VecF3, major_interval: f32, minor_interval: f32) -> Self {
        let vertices = build_vertices(start, end, major_interval, minor_interval);
        Self {
            start,
            end,
            major_interval,
            minor_interval,
            mesh: Mesh::new("lumen axis vbo", vertices, wgpu::PrimitiveTopology::LineList),
        }
    }

    pub fn start(&self) -> VecF3 {
        self.start
    }

    pub fn end(&self) -> VecF3 {
        self.end
    }

    pub fn intervals(&self) -> (f32, f32) {
        (self.major_interval, self.minor_interval)
    }
}

impl Model for Axis {
    fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    fn mesh_mut(&mut self) -> &mut Mesh {
        &mut self.mesh
    }
}

/// Fraction of an interval within which a position counts as on a tick.
const TICK_SNAP: f32 = 1.0e-3;

/// Intervals that would need more ticks than this draw none.
pub const MAX_TICKS: u32 = 10_000;

/// Number of interval steps along `length`, or `None` past [`MAX_TICKS`].
fn tick_steps(length: f32, interval: f32) -> Option<u32> {
    let steps = (length / interval + TICK_SNAP).floor();
    if steps.is_finite() && steps <= MAX_TICKS as f32 {
        Some(steps as u32)
    } else {
        log::warn!("axis interval {interval} needs {steps} ticks over {length}, drawing none");
        None
    }
}

fn build_vertices(start: VecF3, end: VecF3, major: f32, minor: f32) -> Vec<Vertex> {
    let mut out = vec![vertex(start), vertex(end)];

    let along = end - start;
    let length = along.length();
    let (Some(dir), true) = (along.normalized(), length.is_finite()) else {
        return out;
    };

    let up = if dir.cross(&VecF3::new(0.0, 1.0, 0.0)).length() < 1.0e-4 {
        VecF3::new(1.0, 0.0, 0.0)
    } else {
        VecF3::new(0.0, 1.0, 0.0)
    };
    // Perpendicular to the axis, in the axis/up plane.
    let Some(side) = dir.cross(&up).cross(&dir).normalized() else {
        return out;
    };

    let mut tick = |t: f32, half: f32| {
        let at = start + dir * t;
        out.push(vertex(at - side * half));
        out.push(vertex(at + side * half));
    };

    if minor > 0.0 {
        let Some(steps) = tick_steps(length, minor) else {
            return out;
        };
        for k in 0..=steps {
            let t = k as f32 * minor;
            let half = if is_multiple_of(t, major) { minor } else { minor * 0.5 };
            tick(t, half);
        }
    } else if major > 0.0 {
        let Some(steps) = tick_steps(length, major) else {
            return out;
        };
        for k in 0..=steps {
            tick(k as f32 * major, major * 0.1);
        }
    }

    out
}

fn is_multiple_of(t: f32, interval: f32) -> bool {
    if interval <= 0.0 {
        return false;
    }
    let q = t / interval;
    (q - q.round()).abs() < TICK_SNAP
}

fn vertex(p: VecF3) -> Vertex {
    let [x, y, z] = p.to_array();
    Vertex { position: [x, y, z, 1.0], tex_coord: [0.0, 0.0] }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn x_axis() -> Axis {
        Axis::new(VecF3::new(-1.0, 0.0, 0.0), VecF3::new(1.0, 0.0, 0.0), 0.1, 0.02)
    }

    fn tick_half_lengths(axis: &Axis) -> Vec<f32> {
        axis.vertices()[2..]
            .chunks(2)
            .map(|pair| (pair[1].position[1] - pair[0].position[1]).abs() * 0.5)
            .collect()
    }

    #[test]
    fn starts_with_the_axis_line() {
        let axis = x_axis();
        let v = axis.vertices();
        assert_eq!(v[0].position, [-1.0, 0.0, 0.0, 1.0]);
        assert_eq!(v[1].position, [1.0, 0.0, 0.0, 1.0]);
        assert_eq!(axis.topology(), wgpu::PrimitiveTopology::LineList);
        assert_eq!(v.len() % 2, 0);
    }

    #[test]
    fn ticks_every_minor_interval_with_majors_longer() {
        let axis = x_axis();
        let halves = tick_half_lengths(&axis);

        // 2.0 / 0.02 = 100 intervals -> 101 ticks, every fifth is major.
        assert_eq!(halves.len(), 101);
        let majors = halves.iter().filter(|h| (**h - 0.02).abs() < 1e-5).count();
        let minors = halves.iter().filter(|h| (**h - 0.01).abs() < 1e-5).count();
        assert_eq!(majors, 21);
        assert_eq!(minors, 80);
    }

    #[test]
    fn origin_carries_a_major_tick() {
        let axis = x_axis();
        let at_origin = axis.vertices()[2..]
            .chunks(2)
            .find(|pair| pair[0].position[0].abs() < 1e-4)
            .map(|pair| (pair[1].position[1] - pair[0].position[1]).abs());
        assert!(matches!(at_origin, Some(len) if (len - 0.04).abs() < 1e-5));
    }

    #[test]
    fn ticks_on_a_vertical_axis_are_horizontal() {
        let axis = Axis::new(VecF3::new(0.0, -1.0, 0.0), VecF3::new(0.0, 1.0, 0.0), 0.1, 0.02);
        for pair in axis.vertices()[2..].chunks(2) {
            assert!((pair[0].position[1] - pair[1].position[1]).abs() < 1e-6);
            assert!((pair[0].position[0] - pair[1].position[0]).abs() > 0.0);
        }
    }

    #[test]
    fn tiny_interval_draws_only_the_line() {
        let axis = Axis::new(VecF3::new(-1.0, 0.0, 0.0), VecF3::new(1.0, 0.0, 0.0), 0.1, 1.0e-7);
        assert_eq!(axis.vertices().len(), 2);
        assert_eq!(tick_steps(2.0, 0.02), Some(100));
        assert_eq!(tick_steps(2.0, f32::MIN_POSITIVE), None);
    }

    #[test]
    fn degenerate_axis_has_no_ticks() {
        let p = VecF3::new(0.5, 0.5, 0.5);
        let axis = Axis::new(p, p, 0.1, 0.02);
        assert_eq!(axis.vertices().len(), 2);
    }
}
