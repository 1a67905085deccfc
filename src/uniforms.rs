//! Staging of uniform data at reflected byte offsets.

/// A zeroed byte buffer for one pass's uniform data, written through the
/// offsets carried by a [`ShaderReflection`](crate::ShaderReflection).
///
/// The host stages the MVP and per texture size vec4s here, then uploads
/// [`ubo_bytes`](UniformStorage::ubo_bytes) to the uniform buffer it
/// allocated for the pass.
pub struct UniformStorage {
    ubo: Box<[u8]>,
}

impl UniformStorage {
    /// Allocate zeroed storage of `ubo_size` bytes.
    pub fn new(ubo_size: usize) -> Self {
        UniformStorage {
            ubo: vec![0u8; ubo_size].into_boxed_slice(),
        }
    }

    /// The staged bytes, ready for upload.
    pub fn ubo_bytes(&self) -> &[u8] {
        &self.ubo
    }

    fn write_mat4_inner(buffer: &mut [u8], mat4: &[f32; 16]) {
        let mat4 = bytemuck::cast_slice(mat4);
        buffer.copy_from_slice(mat4);
    }

    fn write_vec4_inner(buffer: &mut [u8], vec4: impl Into<[f32; 4]>) {
        let vec4 = vec4.into();
        let vec4 = bytemuck::cast_slice(&vec4);
        buffer.copy_from_slice(vec4);
    }

    /// Write a column major mat4 at `offset`.
    pub fn bind_mat4(&mut self, offset: usize, value: &[f32; 16]) {
        Self::write_mat4_inner(
            &mut self.ubo[offset..][..16 * std::mem::size_of::<f32>()],
            value,
        );
    }

    /// Write a vec4 at `offset`.
    pub fn bind_vec4(&mut self, offset: usize, value: impl Into<[f32; 4]>) {
        Self::write_vec4_inner(
            &mut self.ubo[offset..][..4 * std::mem::size_of::<f32>()],
            value,
        );
    }
}

#[cfg(test)]
mod test {
    use crate::uniforms::UniformStorage;
    use crate::Size;

    #[test]
    fn mat4_lands_at_offset() {
        let mvp: [f32; 16] = [
            2.0, 0.0, 0.0, 0.0, //
            0.0, 2.0, 0.0, 0.0, //
            0.0, 0.0, 2.0, 0.0, //
            0.0, 0.0, 0.0, 1.0, //
        ];

        let mut storage = UniformStorage::new(80);
        storage.bind_mat4(16, &mvp);

        let expected: &[u8] = bytemuck::cast_slice(&mvp);
        assert_eq!(&storage.ubo_bytes()[16..80], expected);
        assert!(storage.ubo_bytes()[..16].iter().all(|byte| *byte == 0));
    }

    #[test]
    fn vec4_lands_at_offset() {
        let value = [1.0f32, 2.0, 0.5, 0.25];

        let mut storage = UniformStorage::new(32);
        storage.bind_vec4(16, value);

        let expected: &[u8] = bytemuck::cast_slice(&value);
        assert_eq!(&storage.ubo_bytes()[16..32], expected);
        assert!(storage.ubo_bytes()[..16].iter().all(|byte| *byte == 0));
    }

    #[test]
    fn size_stages_as_width_height_reciprocals() {
        let mut storage = UniformStorage::new(16);
        storage.bind_vec4(0, Size::new(640u32, 480u32));

        let staged = [640.0f32, 480.0, 1.0 / 640.0, 1.0 / 480.0];
        let expected: &[u8] = bytemuck::cast_slice(&staged);
        assert_eq!(storage.ubo_bytes(), expected);
    }
}
