/// What the frame loop should do after `get_current_texture` failed.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SurfaceErrorAction {
    /// Lost or outdated surface was reconfigured; try again next frame.
    Reconfigured,
    /// Timeout or unspecified error; drop this frame only.
    SkipFrame,
    /// Out of memory; stop rendering.
    Fatal,
}

impl SurfaceErrorAction {
    #[inline]
    pub fn is_fatal(self) -> bool {
        self == SurfaceErrorAction::Fatal
    }
}
