use crate::error::ShaderReflectError;
use spirv_cross::spirv::Decoration;
use spirv_cross::ErrorCode;

/// Reflection via spirv-cross.
pub mod cross;

/// Shader semantics and reflection record types.
pub mod semantics;

mod helper;

pub use semantics::ShaderReflection;

/// A trait for compiled shader pairs that can produce reflection information.
pub trait ReflectShader {
    /// Validate the pair against the binding contract and reflect its
    /// resource layout.
    fn reflect(&self) -> Result<ShaderReflection, ShaderReflectError>;
}

/// A resource declaration reported by the SPIR-V decoder.
#[derive(Debug, Clone)]
pub struct Resource {
    /// The id of the resource variable, carrying its decorations.
    pub id: u32,
    /// The id of the resource's base type, carrying member layout.
    pub base_type_id: u32,
    /// The declared name of the resource.
    pub name: String,
}

/// One stage's declared resources, grouped by category.
#[derive(Debug, Clone, Default)]
pub struct StageResources {
    pub stage_inputs: Vec<Resource>,
    pub uniform_buffers: Vec<Resource>,
    pub sampled_images: Vec<Resource>,
    pub storage_buffers: Vec<Resource>,
    pub storage_images: Vec<Resource>,
    pub subpass_inputs: Vec<Resource>,
    pub atomic_counters: Vec<Resource>,
    pub push_constant_buffers: Vec<Resource>,
}

/// The subset of SPIR-V type information the reflection pass inspects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Type {
    /// A struct, with the type ids of its members in declaration order.
    Struct { member_types: Vec<u32> },
    /// A floating point scalar, vector or matrix.
    Float {
        vecsize: u32,
        columns: u32,
        array: Vec<u32>,
    },
    /// Any type the reflection pass has no interest in.
    Other,
}

/// The layout queries the reflection pass makes against a compiled stage.
///
/// Implemented for [`spirv_cross::spirv::Ast`]; the indirection keeps the
/// validation logic independent of the decoder so tests can drive it with
/// synthetic layouts.
pub trait ReflectAst {
    /// All resources declared by the stage.
    fn shader_resources(&self) -> Result<StageResources, ErrorCode>;

    /// The value of a decoration on an id, or an error if undecorated.
    fn decoration(&self, id: u32, decoration: Decoration) -> Result<u32, ErrorCode>;

    /// The declared name of a struct member.
    fn member_name(&self, base_type_id: u32, index: u32) -> Result<String, ErrorCode>;

    /// The value of a decoration on a struct member.
    fn member_decoration(
        &self,
        base_type_id: u32,
        index: u32,
        decoration: Decoration,
    ) -> Result<u32, ErrorCode>;

    /// The type behind a type id.
    fn type_of(&self, type_id: u32) -> Result<Type, ErrorCode>;

    /// The size of a struct type as laid out in a buffer, in bytes.
    fn declared_struct_size(&self, base_type_id: u32) -> Result<u32, ErrorCode>;
}
