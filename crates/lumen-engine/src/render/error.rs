use std::path::PathBuf;

use super::uniform::UniformKind;

/// Errors from shader programs, their uniforms and the models drawn with them.
#[derive(Debug, thiserror::Error)]
pub enum ShaderError {
    #[error("failed to read shader source {path:?}")]
    ReadSource {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("program `{program}` failed validation: {message}")]
    Compile { program: String, message: String },

    #[error("no uniform named `{0}`")]
    UnknownUniform(String),

    #[error("uniform `{name}` is declared as {declared:?}, staged as {staged:?}")]
    KindMismatch {
        name: String,
        declared: UniformKind,
        staged: UniformKind,
    },

    #[error("uniform `{0}` was never staged")]
    UniformNotStaged(String),

    #[error("program `{program}` used more than {capacity} times this frame")]
    SlotsExhausted { program: String, capacity: u32 },

    #[error("program `{program}` has no texture bound at unit {unit}")]
    TextureNotBound { program: String, unit: u32 },

    #[error("program `{program}` has no texture unit {unit}")]
    NoSuchTextureUnit { program: String, unit: u32 },

    #[error("program `{0}` is not initialized")]
    UninitializedProgram(String),

    #[error("model was drawn before `init`")]
    UninitializedModel,

    #[error("program `{program}` draws {program_topology:?}, model is {model_topology:?}")]
    TopologyMismatch {
        program: String,
        program_topology: wgpu::PrimitiveTopology,
        model_topology: wgpu::PrimitiveTopology,
    },
}

/// Errors while copying rendered pixels back to the CPU.
#[derive(Debug, thiserror::Error)]
pub enum ReadbackError {
    #[error("texture format {0:?} cannot be read back as 8-bit RGBA")]
    UnsupportedFormat(wgpu::TextureFormat),

    #[error("readback is {expected:?}, capture is {found:?}")]
    SizeMismatch { expected: (u32, u32), found: (u32, u32) },

    #[error("device poll failed: {0}")]
    Poll(#[from] wgpu::PollError),

    #[error("mapping the readback buffer failed: {0}")]
    Map(#[from] wgpu::BufferAsyncError),

    #[error("map callback was dropped before completing")]
    MapCallbackDropped,

    #[error("failed to encode screenshot: {0}")]
    Encode(#[from] image::ImageError),
}
