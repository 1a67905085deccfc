//! phosphor-reflect validates compiled shader pairs for phosphor's retro
//! post processing chain and reflects the resource layout the host needs to
//! bind them.
//!
//! A pass is a vertex and fragment shader compiled to SPIR-V. Both stages
//! are reflected together and checked against a fixed binding contract:
//!
//! * The vertex stage takes exactly two inputs, at locations 0 and 1, and
//!   declares exactly one uniform buffer containing a mat4 named `MVP`.
//! * The fragment stage may declare at most one uniform buffer. If both
//!   stages declare one, it is the same buffer at the same binding.
//! * The fragment stage may sample the semantic textures `Original` (the
//!   unfiltered input to the chain) and `Source` (the previous pass's
//!   output), and may receive their dimensions through vec4 uniforms named
//!   `OriginalSize` and `SourceSize`.
//! * Everything lives in descriptor set 0, every binding is below
//!   [`MAX_BINDINGS_COUNT`](crate::reflect::semantics::MAX_BINDINGS_COUNT),
//!   and no two resources share a binding.
//!
//! Reflection either yields a [`ShaderReflection`] with the buffer size,
//! stage masks, `MVP` offset and per texture bindings, or rejects the pair
//! with a [`ShaderReflectError`] naming the violated rule.
//!
//! ```no_run
//! use phosphor_reflect::reflect::semantics::TextureSemantics;
//! use phosphor_reflect::uniforms::UniformStorage;
//! use phosphor_reflect::{reflect_spirv, Size};
//!
//! # fn compile() -> (Vec<u32>, Vec<u32>) { (Vec::new(), Vec::new()) }
//! let (vertex, fragment) = compile();
//! let reflection = reflect_spirv(&vertex, &fragment)?;
//!
//! let mut uniforms = UniformStorage::new(reflection.ubo.size as usize);
//! let mvp: [f32; 16] = [
//!     2.0, 0.0, 0.0, 0.0, //
//!     0.0, 2.0, 0.0, 0.0, //
//!     0.0, 0.0, 2.0, 0.0, //
//!     -1.0, -1.0, 0.0, 1.0, //
//! ];
//! uniforms.bind_mat4(reflection.mvp_offset, &mvp);
//!
//! if let Some(original) = reflection.texture(TextureSemantics::Original) {
//!     // the input texture goes to original.binding
//!     if let Some(offset) = original.size_offset {
//!         uniforms.bind_vec4(offset, Size::new(640u32, 480u32));
//!     }
//! }
//! # Ok::<(), phosphor_reflect::ShaderReflectError>(())
//! ```
use num_traits::AsPrimitive;

pub mod error;
pub mod reflect;
pub mod uniforms;

pub use crate::error::ShaderReflectError;
pub use crate::reflect::cross::reflect_spirv;
pub use crate::reflect::ShaderReflection;

/// The dimensions of a texture in pixels.
#[derive(Default, Debug, Copy, Clone, PartialEq, Eq)]
pub struct Size<T> {
    pub width: T,
    pub height: T,
}

impl<T> Size<T> {
    pub fn new(width: T, height: T) -> Self {
        Size { width, height }
    }
}

/// The layout of a `<Name>Size` uniform: width and height followed by their
/// reciprocals.
impl<T> From<Size<T>> for [f32; 4]
where
    T: Copy + AsPrimitive<f32>,
{
    fn from(value: Size<T>) -> Self {
        [
            value.width.as_(),
            value.height.as_(),
            1.0 / value.width.as_(),
            1.0 / value.height.as_(),
        ]
    }
}
