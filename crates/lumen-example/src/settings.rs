use std::path::PathBuf;

use lumen_engine::math::{VecF3, VecF4};

/// Overrides the directory the WGSL programs are read from.
pub const SHADER_DIR_ENV: &str = "LUMEN_SHADER_DIR";
/// Overrides where screenshots are written.
pub const SCREENSHOT_ENV: &str = "LUMEN_SCREENSHOT";

/// Everything the example reads at startup.
#[derive(Debug, Clone)]
pub struct ExampleSettings {
    pub window_title: String,
    pub window_width: u32,
    pub window_height: u32,
    pub vsync: bool,

    pub shader_dir: PathBuf,
    pub screenshot_path: PathBuf,

    // camera
    pub fovy: f32,
    pub z_near: f32,
    pub z_far: f32,
    pub radius: f32,
    pub theta: f32,
    pub phi: f32,

    // orbit controls
    pub initial_view_dist: f32,
    pub initial_rotation: VecF3,
    /// Degrees per logical pixel of drag.
    pub rotation_sensitivity: f32,
    /// View distance change per wheel line.
    pub zoom_sensitivity: f32,
    pub view_dist_range: (f32, f32),
}

impl Default for ExampleSettings {
    fn default() -> Self {
        Self {
            window_title: "lumen example".to_string(),
            window_width: 1024,
            window_height: 768,
            vsync: true,

            shader_dir: PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/shaders")),
            screenshot_path: PathBuf::from("screenshot.png"),

            fovy: 45.0,
            z_near: 0.1,
            z_far: 3000.0,
            radius: 1.0,
            theta: 0.0,
            phi: 0.0,

            initial_view_dist: -3.0,
            initial_rotation: VecF3::new(20.0, -35.0, 0.0),
            rotation_sensitivity: 0.4,
            zoom_sensitivity: 0.25,
            view_dist_range: (-50.0, -1.2),
        }
    }
}

impl ExampleSettings {
    /// Defaults with [`SHADER_DIR_ENV`] / [`SCREENSHOT_ENV`] applied.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut settings = Self::default();
        let non_empty = |key| lookup(key).filter(|v: &String| !v.trim().is_empty());

        if let Some(dir) = non_empty(SHADER_DIR_ENV) {
            settings.shader_dir = PathBuf::from(dir);
        }
        if let Some(path) = non_empty(SCREENSHOT_ENV) {
            settings.screenshot_path = PathBuf::from(path);
        }
        settings
    }

    /// Camera position on the sphere of `radius` at polar `theta`, azimuth `phi`.
    pub fn eye(&self) -> VecF4 {
        let (r, t, p) = (self.radius, self.theta, self.phi);
        VecF4::point(r * t.sin() * p.cos(), r * t.sin() * p.sin(), r * t.cos())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn environment_overrides_paths() {
        let settings = ExampleSettings::from_lookup(|key| match key {
            SHADER_DIR_ENV => Some("/opt/shaders".to_string()),
            SCREENSHOT_ENV => Some("out/shot.png".to_string()),
            _ => None,
        });
        assert_eq!(settings.shader_dir, PathBuf::from("/opt/shaders"));
        assert_eq!(settings.screenshot_path, PathBuf::from("out/shot.png"));
    }

    #[test]
    fn blank_environment_keeps_defaults() {
        let settings = ExampleSettings::from_lookup(|_| Some(String::new()));
        assert_eq!(settings.screenshot_path, ExampleSettings::default().screenshot_path);
        assert!(settings.shader_dir.ends_with("shaders"));
    }

    #[test]
    fn default_eye_sits_on_positive_z() {
        let eye = ExampleSettings::default().eye();
        assert_eq!(eye, VecF4::point(0.0, 0.0, 1.0));
    }

    #[test]
    fn view_distance_starts_inside_its_range() {
        let s = ExampleSettings::default();
        let (lo, hi) = s.view_dist_range;
        assert!(lo <= s.initial_view_dist && s.initial_view_dist <= hi);
    }
}
