//! WGSL shader programs.
//!
//! A [`ShaderProgram`] bundles one render pipeline with its uniform block and
//! an optional set of sampled textures. Bind groups:
//!
//! - group 0, binding 0: the uniform block, with a dynamic offset into a
//!   per-frame arena so a program can be used for several draws in one pass
//! - group 1: texture unit `u` at binding `2u`, its sampler at `2u + 1`
//!
//! Vertex stages use the entry point `vs_main`, fragment stages `fs_main`.

use std::collections::HashMap;
use std::num::NonZeroU64;
use std::path::{Path, PathBuf};

use glam::Mat4;

use crate::math::VecF4;

use super::error::ShaderError;
use super::models::Vertex;
use super::uniform::{align_up, UniformBlock, UniformKind, UniformLayout};

/// Minimum spacing of uniform slots in the arena.
pub const UNIFORM_SLOT_ALIGN: u32 = 256;

/// Pipeline state for a program.
#[derive(Debug, Clone)]
pub struct ProgramDesc<'a> {
    /// Uniforms in the order of the WGSL uniform struct fields.
    pub uniforms: &'a [(&'a str, UniformKind)],

    /// Number of sampled 2D textures in group 1.
    pub texture_units: u32,

    pub color_format: wgpu::TextureFormat,
    pub depth_format: Option<wgpu::TextureFormat>,
    pub topology: wgpu::PrimitiveTopology,
    pub cull_mode: Option<wgpu::Face>,
    pub blend: Option<wgpu::BlendState>,

    /// How many times the program may be used between two `begin_frame` calls.
    pub max_uses_per_frame: u32,
}

impl<'a> ProgramDesc<'a> {
    /// Triangles, back-face culling, alpha blending, no depth, no textures.
    pub fn new(uniforms: &'a [(&'a str, UniformKind)], color_format: wgpu::TextureFormat) -> Self {
        Self {
            uniforms,
            texture_units: 0,
            color_format,
            depth_format: None,
            topology: wgpu::PrimitiveTopology::TriangleList,
            cull_mode: Some(wgpu::Face::Back),
            blend: Some(wgpu::BlendState::ALPHA_BLENDING),
            max_uses_per_frame: 16,
        }
    }
}

/// Dynamic offset of one uploaded uniform block.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct UniformSlot {
    offset: u32,
}

impl UniformSlot {
    #[inline]
    pub fn offset(self) -> u32 {
        self.offset
    }
}

/// Compiled program with its staged uniforms.
pub struct ShaderProgram {
    name: String,
    pipeline: wgpu::RenderPipeline,
    topology: wgpu::PrimitiveTopology,

    uniforms: UniformBlock,
    arena: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    slot_stride: u32,
    capacity: u32,
    cursor: u32,

    texture_units: u32,
    texture_layout: Option<wgpu::BindGroupLayout>,
    texture_bind_group: Option<wgpu::BindGroup>,
    sampler: Option<wgpu::Sampler>,
}

impl ShaderProgram {
    fn new(
        device: &wgpu::Device,
        name: &str,
        vertex: &wgpu::ShaderModule,
        fragment: &wgpu::ShaderModule,
        desc: &ProgramDesc<'_>,
    ) -> Self {
        let layout = UniformLayout::new(desc.uniforms.iter().copied());
        let block_size = layout.size() as u64;

        let min_align = device.limits().min_uniform_buffer_offset_alignment;
        let slot_stride = align_up(layout.size(), min_align.max(UNIFORM_SLOT_ALIGN) as usize) as u32;
        let capacity = desc.max_uses_per_frame.max(1);

        let arena = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(&format!("lumen {name} uniform arena")),
            size: slot_stride as u64 * capacity as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let uniform_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some(&format!("lumen {name} uniform bgl")),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: true,
                    min_binding_size: NonZeroU64::new(block_size),
                },
                count: None,
            }],
        });

        let uniform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(&format!("lumen {name} uniform bind group")),
            layout: &uniform_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                    buffer: &arena,
                    offset: 0,
                    size: NonZeroU64::new(block_size),
                }),
            }],
        });

        let (texture_layout, sampler) = if desc.texture_units > 0 {
            (
                Some(texture_bind_group_layout(device, name, desc.texture_units)),
                Some(device.create_sampler(&wgpu::SamplerDescriptor {
                    label: Some(&format!("lumen {name} sampler")),
                    address_mode_u: wgpu::AddressMode::ClampToEdge,
                    address_mode_v: wgpu::AddressMode::ClampToEdge,
                    mag_filter: wgpu::FilterMode::Linear,
                    min_filter: wgpu::FilterMode::Linear,
                    mipmap_filter: wgpu::MipmapFilterMode::Nearest,
                    ..Default::default()
                })),
            )
        } else {
            (None, None)
        };

        let mut bind_group_layouts = vec![&uniform_layout];
        if let Some(l) = texture_layout.as_ref() {
            bind_group_layouts.push(l);
        }

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some(&format!("lumen {name} pipeline layout")),
            bind_group_layouts: &bind_group_layouts,
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(&format!("lumen {name} pipeline")),
            layout: Some(&pipeline_layout),

            vertex: wgpu::VertexState {
                module: vertex,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[Vertex::layout()],
            },

            fragment: Some(wgpu::FragmentState {
                module: fragment,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: desc.color_format,
                    blend: desc.blend,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),

            primitive: wgpu::PrimitiveState {
                topology: desc.topology,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: desc.cull_mode,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },

            depth_stencil: desc.depth_format.map(|format| wgpu::DepthStencilState {
                format,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::LessEqual,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),

            multiview_mask: None,
            cache: None,
        });

        log::debug!(
            "program `{name}`: {} uniforms, {} bytes/slot, {} slots, {} texture units",
            layout.len(),
            slot_stride,
            capacity,
            desc.texture_units
        );

        Self {
            name: name.to_string(),
            pipeline,
            topology: desc.topology,
            uniforms: UniformBlock::new(layout),
            arena,
            uniform_bind_group,
            slot_stride,
            capacity,
            cursor: 0,
            texture_units: desc.texture_units,
            texture_layout,
            texture_bind_group: None,
            sampler,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn topology(&self) -> wgpu::PrimitiveTopology {
        self.topology
    }

    // ── staging ───────────────────────────────────────────────────────────

    pub fn set_uniform_matrix(&mut self, name: &str, value: Mat4) -> Result<(), ShaderError> {
        self.uniforms.set_matrix(name, value)
    }

    pub fn set_uniform_vector(&mut self, name: &str, value: VecF4) -> Result<(), ShaderError> {
        self.uniforms.set_vector(name, value)
    }

    pub fn set_uniform_int(&mut self, name: &str, value: i32) -> Result<(), ShaderError> {
        self.uniforms.set_int(name, value)
    }

    pub fn set_uniform_float(&mut self, name: &str, value: f32) -> Result<(), ShaderError> {
        self.uniforms.set_float(name, value)
    }

    /// Binds a view to every texture unit the program declares.
    ///
    /// `textures` pairs a unit with its view; every declared unit must appear.
    pub fn bind_textures(
        &mut self,
        device: &wgpu::Device,
        textures: &[(u32, &wgpu::TextureView)],
    ) -> Result<(), ShaderError> {
        let (Some(layout), Some(sampler)) = (self.texture_layout.as_ref(), self.sampler.as_ref())
        else {
            return Err(ShaderError::NoSuchTextureUnit {
                program: self.name.clone(),
                unit: textures.first().map_or(0, |(unit, _)| *unit),
            });
        };

        let mut views: Vec<Option<&wgpu::TextureView>> = vec![None; self.texture_units as usize];
        for &(unit, view) in textures {
            let slot = views.get_mut(unit as usize).ok_or_else(|| ShaderError::NoSuchTextureUnit {
                program: self.name.clone(),
                unit,
            })?;
            *slot = Some(view);
        }

        let mut entries = Vec::with_capacity(views.len() * 2);
        for (unit, view) in views.into_iter().enumerate() {
            let unit = unit as u32;
            let view = view.ok_or_else(|| ShaderError::TextureNotBound {
                program: self.name.clone(),
                unit,
            })?;
            entries.push(wgpu::BindGroupEntry {
                binding: 2 * unit,
                resource: wgpu::BindingResource::TextureView(view),
            });
            entries.push(wgpu::BindGroupEntry {
                binding: 2 * unit + 1,
                resource: wgpu::BindingResource::Sampler(sampler),
            });
        }

        self.texture_bind_group = Some(device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(&format!("lumen {} texture bind group", self.name)),
            layout,
            entries: &entries,
        }));
        Ok(())
    }

    // ── per frame ─────────────────────────────────────────────────────────

    /// Rewinds the uniform arena. Call once per frame before the first use.
    pub fn begin_frame(&mut self) {
        self.cursor = 0;
    }

    /// Uploads the staged uniforms into the next arena slot.
    ///
    /// Fails if any declared uniform was never staged, if a declared texture
    /// unit is unbound, or if the program was used too often this frame.
    pub fn use_program(&mut self, queue: &wgpu::Queue) -> Result<UniformSlot, ShaderError> {
        let bytes = self.uniforms.bytes()?;

        if self.texture_units > 0 && self.texture_bind_group.is_none() {
            return Err(ShaderError::TextureNotBound { program: self.name.clone(), unit: 0 });
        }

        if self.cursor >= self.capacity {
            return Err(ShaderError::SlotsExhausted {
                program: self.name.clone(),
                capacity: self.capacity,
            });
        }

        let offset = self.cursor * self.slot_stride;
        queue.write_buffer(&self.arena, offset as u64, bytes);
        self.cursor += 1;

        Ok(UniformSlot { offset })
    }

    /// Sets the pipeline and bind groups for a draw using `slot`.
    pub fn bind(&self, pass: &mut wgpu::RenderPass<'_>, slot: UniformSlot) {
        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, &self.uniform_bind_group, &[slot.offset]);
        if let Some(textures) = self.texture_bind_group.as_ref() {
            pass.set_bind_group(1, textures, &[]);
        }
    }
}

fn texture_bind_group_layout(device: &wgpu::Device, name: &str, units: u32) -> wgpu::BindGroupLayout {
    let entries: Vec<wgpu::BindGroupLayoutEntry> = (0..units)
        .flat_map(|unit| {
            [
                wgpu::BindGroupLayoutEntry {
                    binding: 2 * unit,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 2 * unit + 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ]
        })
        .collect();

    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some(&format!("lumen {name} texture bgl")),
        entries: &entries,
    })
}

/// Handle to a program owned by a [`ShaderLoader`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct ProgramId(usize);

/// Reads WGSL sources from disk and owns every program it created.
pub struct ShaderLoader {
    shader_dir: PathBuf,
    programs: HashMap<ProgramId, ShaderProgram>,
    next_id: usize,
}

impl ShaderLoader {
    /// Relative source paths are resolved against `shader_dir`.
    pub fn new(shader_dir: impl Into<PathBuf>) -> Self {
        Self {
            shader_dir: shader_dir.into(),
            programs: HashMap::new(),
            next_id: 0,
        }
    }

    pub fn shader_dir(&self) -> &Path {
        &self.shader_dir
    }

    /// Reads and compiles `vertex_path` / `fragment_path`.
    ///
    /// Both stages may live in the same file.
    pub fn create_program(
        &mut self,
        device: &wgpu::Device,
        name: &str,
        vertex_path: impl AsRef<Path>,
        fragment_path: impl AsRef<Path>,
        desc: &ProgramDesc<'_>,
    ) -> Result<ProgramId, ShaderError> {
        let vertex_path = self.resolve(vertex_path.as_ref());
        let fragment_path = self.resolve(fragment_path.as_ref());

        // Invalid WGSL or pipeline state would otherwise reach wgpu's
        // uncaptured-error handler, which panics.
        let scope = device.push_error_scope(wgpu::ErrorFilter::Validation);
        let built = build_program(device, name, &vertex_path, &fragment_path, desc);
        let captured = pollster::block_on(scope.pop());
        let program = validated(name, built?, captured)?;

        let id = ProgramId(self.next_id);
        self.next_id += 1;
        self.programs.insert(id, program);

        log::info!("loaded program `{name}` from {vertex_path:?} + {fragment_path:?}");
        Ok(id)
    }

    pub fn program_mut(&mut self, id: ProgramId) -> Option<&mut ShaderProgram> {
        self.programs.get_mut(&id)
    }

    /// Rewinds the uniform arena of every program.
    pub fn begin_frame(&mut self) {
        for program in self.programs.values_mut() {
            program.begin_frame();
        }
    }

    /// Drops every program. Their ids resolve to `None` afterwards.
    pub fn cleanup(&mut self) {
        let n = self.programs.len();
        self.programs.clear();
        log::debug!("shader loader released {n} programs");
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.shader_dir.join(path)
        }
    }
}

fn build_program(
    device: &wgpu::Device,
    name: &str,
    vertex_path: &Path,
    fragment_path: &Path,
    desc: &ProgramDesc<'_>,
) -> Result<ShaderProgram, ShaderError> {
    let vertex = compile(device, name, vertex_path)?;
    if vertex_path == fragment_path {
        return Ok(ShaderProgram::new(device, name, &vertex, &vertex, desc));
    }
    let fragment = compile(device, name, fragment_path)?;
    Ok(ShaderProgram::new(device, name, &vertex, &fragment, desc))
}

/// Turns an error captured while building `program` into [`ShaderError::Compile`].
fn validated<T>(program: &str, value: T, captured: Option<wgpu::Error>) -> Result<T, ShaderError> {
    match captured {
        None => Ok(value),
        Some(err) => Err(ShaderError::Compile {
            program: program.to_string(),
            message: err.to_string(),
        }),
    }
}

fn compile(device: &wgpu::Device, name: &str, path: &Path) -> Result<wgpu::ShaderModule, ShaderError> {
    let source = std::fs::read_to_string(path).map_err(|source| ShaderError::ReadSource {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(&format!("lumen {name} shader ({})", path.display())),
        source: wgpu::ShaderSource::Wgsl(source.into()),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_paths_resolve_against_shader_dir() {
        let loader = ShaderLoader::new("assets/shaders");
        assert_eq!(
            loader.resolve(Path::new("vs_axes.wgsl")),
            PathBuf::from("assets/shaders/vs_axes.wgsl")
        );
    }

    #[test]
    fn absolute_paths_are_kept() {
        let loader = ShaderLoader::new("assets/shaders");
        let abs = std::env::temp_dir().join("fs.wgsl");
        assert_eq!(loader.resolve(&abs), abs);
    }

    #[test]
    fn captured_validation_error_fails_the_program() {
        let err = wgpu::Error::Validation {
            source: Box::new(std::io::Error::other("expected `;`")),
            description: "shader parsing error".to_string(),
        };
        match validated("axes", (), Some(err)) {
            Err(ShaderError::Compile { program, .. }) => assert_eq!(program, "axes"),
            other => panic!("expected a compile error, got {other:?}"),
        }
        assert!(validated("axes", 7, None).is_ok_and(|v| v == 7));
    }

    #[test]
    fn desc_defaults_match_the_framework_state() {
        let uniforms = [("MVMatrix", UniformKind::Mat4)];
        let desc = ProgramDesc::new(&uniforms, wgpu::TextureFormat::Bgra8Unorm);
        assert_eq!(desc.topology, wgpu::PrimitiveTopology::TriangleList);
        assert_eq!(desc.cull_mode, Some(wgpu::Face::Back));
        assert_eq!(desc.blend, Some(wgpu::BlendState::ALPHA_BLENDING));
        assert!(desc.depth_format.is_none());
        assert_eq!(desc.texture_units, 0);
    }

    #[test]
    fn slots_are_spaced_by_the_offset_alignment() {
        let small = UniformLayout::new([("PMatrix", UniformKind::Mat4)]);
        assert_eq!(align_up(small.size(), UNIFORM_SLOT_ALIGN as usize), 256);

        let big = UniformLayout::new([
            ("a", UniformKind::Mat4),
            ("b", UniformKind::Mat4),
            ("c", UniformKind::Mat4),
            ("d", UniformKind::Mat4),
            ("e", UniformKind::Vec4),
        ]);
        assert_eq!(big.size(), 272);
        assert_eq!(align_up(big.size(), UNIFORM_SLOT_ALIGN as usize), 512);
    }
}
