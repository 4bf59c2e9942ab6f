//! Uniform blocks staged on the CPU and packed with std140-style layout.
//!
//! A program declares its uniforms once, in the same order as the fields of
//! its WGSL uniform struct. Values are staged by name between draws; packing
//! fails if a declared uniform was never staged.

use glam::Mat4;

use crate::math::{VecF4, Vector};

use super::error::ShaderError;

/// Type of one uniform in a block.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum UniformKind {
    Mat4,
    Vec4,
    Int,
    Float,
}

impl UniformKind {
    #[inline]
    pub const fn size(self) -> usize {
        match self {
            UniformKind::Mat4 => 64,
            UniformKind::Vec4 => 16,
            UniformKind::Int | UniformKind::Float => 4,
        }
    }

    #[inline]
    pub const fn align(self) -> usize {
        match self {
            UniformKind::Mat4 | UniformKind::Vec4 => 16,
            UniformKind::Int | UniformKind::Float => 4,
        }
    }
}

#[inline]
pub(crate) const fn align_up(value: usize, align: usize) -> usize {
    value.div_ceil(align) * align
}

#[derive(Debug, Clone)]
struct UniformEntry {
    name: String,
    kind: UniformKind,
    offset: usize,
}

/// Byte layout of a uniform block.
#[derive(Debug, Clone)]
pub struct UniformLayout {
    entries: Vec<UniformEntry>,
    size: usize,
}

impl UniformLayout {
    pub fn new<'a, I>(fields: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, UniformKind)>,
    {
        let mut entries = Vec::new();
        let mut cursor = 0;

        for (name, kind) in fields {
            let offset = align_up(cursor, kind.align());
            entries.push(UniformEntry { name: name.to_string(), kind, offset });
            cursor = offset + kind.size();
        }

        // Bindings must not be empty, and WGSL rounds struct sizes to 16.
        let size = align_up(cursor.max(1), 16);
        Self { entries, size }
    }

    /// Packed size in bytes, a non-zero multiple of 16.
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn offset_of(&self, name: &str) -> Option<usize> {
        self.find(name).map(|(_, e)| e.offset)
    }

    pub fn kind_of(&self, name: &str) -> Option<UniformKind> {
        self.find(name).map(|(_, e)| e.kind)
    }

    fn find(&self, name: &str) -> Option<(usize, &UniformEntry)> {
        self.entries.iter().enumerate().find(|(_, e)| e.name == name)
    }
}

/// CPU-side values of a uniform block.
///
/// Staged values persist until overwritten, so a program can re-use
/// matrices across several draws and only re-stage what changes.
#[derive(Debug, Clone)]
pub struct UniformBlock {
    layout: UniformLayout,
    data: Vec<u8>,
    staged: Vec<bool>,
}

impl UniformBlock {
    pub fn new(layout: UniformLayout) -> Self {
        let data = vec![0; layout.size()];
        let staged = vec![false; layout.len()];
        Self { layout, data, staged }
    }

    pub fn layout(&self) -> &UniformLayout {
        &self.layout
    }

    pub fn set_matrix(&mut self, name: &str, value: Mat4) -> Result<(), ShaderError> {
        self.stage(name, UniformKind::Mat4, bytemuck::bytes_of(&value.to_cols_array()))
    }

    pub fn set_vector(&mut self, name: &str, value: VecF4) -> Result<(), ShaderError> {
        self.stage(name, UniformKind::Vec4, value.as_buffer().as_bytes())
    }

    pub fn set_int(&mut self, name: &str, value: i32) -> Result<(), ShaderError> {
        self.stage(name, UniformKind::Int, bytemuck::bytes_of(&value))
    }

    pub fn set_float(&mut self, name: &str, value: f32) -> Result<(), ShaderError> {
        self.stage(name, UniformKind::Float, bytemuck::bytes_of(&value))
    }

    /// Packed block, or the first declared uniform that is still unstaged.
    pub fn bytes(&self) -> Result<&[u8], ShaderError> {
        match self.staged.iter().position(|s| !s) {
            Some(i) => Err(ShaderError::UniformNotStaged(self.layout.entries[i].name.clone())),
            None => Ok(&self.data),
        }
    }

    fn stage(&mut self, name: &str, kind: UniformKind, bytes: &[u8]) -> Result<(), ShaderError> {
        let (index, entry) = self
            .layout
            .find(name)
            .ok_or_else(|| ShaderError::UnknownUniform(name.to_string()))?;

        if entry.kind != kind {
            return Err(ShaderError::KindMismatch {
                name: name.to_string(),
                declared: entry.kind,
                staged: kind,
            });
        }

        let offset = entry.offset;
        self.data[offset..offset + bytes.len()].copy_from_slice(bytes);
        self.staged[index] = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn axes_layout() -> UniformLayout {
        UniformLayout::new([
            ("PMatrix", UniformKind::Mat4),
            ("MVMatrix", UniformKind::Mat4),
            ("Color", UniformKind::Vec4),
        ])
    }

    // ── layout ────────────────────────────────────────────────────────────

    #[test]
    fn matrices_and_vectors_pack_back_to_back() {
        let layout = axes_layout();
        assert_eq!(layout.offset_of("PMatrix"), Some(0));
        assert_eq!(layout.offset_of("MVMatrix"), Some(64));
        assert_eq!(layout.offset_of("Color"), Some(128));
        assert_eq!(layout.size(), 144);
    }

    #[test]
    fn scalars_pack_tightly_and_block_rounds_to_16() {
        let layout = UniformLayout::new([
            ("MVMatrix", UniformKind::Mat4),
            ("scrWidth", UniformKind::Int),
            ("scrHeight", UniformKind::Int),
        ]);
        assert_eq!(layout.offset_of("scrWidth"), Some(64));
        assert_eq!(layout.offset_of("scrHeight"), Some(68));
        assert_eq!(layout.size(), 80);
    }

    #[test]
    fn vector_after_scalar_is_realigned() {
        let layout = UniformLayout::new([("t", UniformKind::Float), ("c", UniformKind::Vec4)]);
        assert_eq!(layout.offset_of("c"), Some(16));
        assert_eq!(layout.size(), 32);
    }

    #[test]
    fn empty_layout_still_has_a_binding_size() {
        let layout = UniformLayout::new([]);
        assert!(layout.is_empty());
        assert_eq!(layout.size(), 16);
    }

    // ── staging ───────────────────────────────────────────────────────────

    #[test]
    fn unstaged_uniform_is_reported_by_name() {
        let mut block = UniformBlock::new(axes_layout());
        block.set_matrix("PMatrix", Mat4::IDENTITY).unwrap();
        block.set_matrix("MVMatrix", Mat4::IDENTITY).unwrap();

        match block.bytes() {
            Err(ShaderError::UniformNotStaged(name)) => assert_eq!(name, "Color"),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn staged_values_land_at_their_offsets() {
        let mut block = UniformBlock::new(axes_layout());
        block.set_matrix("PMatrix", Mat4::IDENTITY).unwrap();
        block.set_matrix("MVMatrix", Mat4::from_scale(glam::Vec3::splat(2.0))).unwrap();
        block.set_vector("Color", VecF4::new(0.0, 1.0, 0.0, 1.0)).unwrap();

        let bytes = block.bytes().unwrap();
        let floats: &[f32] = bytemuck::cast_slice(bytes);
        assert_eq!(floats[0], 1.0);
        assert_eq!(floats[16], 2.0);
        assert_eq!(&floats[32..36], &[0.0, 1.0, 0.0, 1.0]);
    }

    #[test]
    fn vectors_are_copied_from_their_buffer_view() {
        let color = VecF4::new(0.25, 0.5, 0.75, 1.0);
        let mut block = UniformBlock::new(UniformLayout::new([("Color", UniformKind::Vec4)]));
        block.set_vector("Color", color).unwrap();
        assert_eq!(&block.bytes().unwrap()[..16], color.as_buffer().as_bytes());
    }

    #[test]
    fn restaging_overwrites_and_persists() {
        let mut block = UniformBlock::new(UniformLayout::new([("Color", UniformKind::Vec4)]));
        block.set_vector("Color", VecF4::new(1.0, 0.0, 0.0, 1.0)).unwrap();
        block.set_vector("Color", VecF4::new(0.0, 0.0, 1.0, 1.0)).unwrap();

        let floats: &[f32] = bytemuck::cast_slice(block.bytes().unwrap());
        assert_eq!(&floats[..4], &[0.0, 0.0, 1.0, 1.0]);
        assert!(block.bytes().is_ok());
    }

    #[test]
    fn unknown_name_and_wrong_kind_are_rejected() {
        let mut block = UniformBlock::new(axes_layout());
        assert!(matches!(
            block.set_int("Colour", 1),
            Err(ShaderError::UnknownUniform(_))
        ));
        assert!(matches!(
            block.set_float("Color", 1.0),
            Err(ShaderError::KindMismatch { declared: UniformKind::Vec4, .. })
        ));
    }

    #[test]
    fn ints_are_written_as_little_endian_words() {
        let layout = UniformLayout::new([("scrWidth", UniformKind::Int)]);
        let mut block = UniformBlock::new(layout);
        block.set_int("scrWidth", 640).unwrap();
        let bytes = block.bytes().unwrap();
        assert_eq!(i32::from_ne_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]), 640);
    }
}
