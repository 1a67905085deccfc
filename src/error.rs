//! Error types for reflection and validation of shader pairs.
use crate::reflect::semantics::TextureSemantics;
use thiserror::Error;

/// The kind of contract violation found while validating a shader stage.
#[derive(Debug)]
pub enum SemanticsErrorKind {
    /// The stage declared the wrong number of uniform buffers.
    InvalidUniformBufferCount(usize),
    /// The vertex inputs do not occupy locations 0 and 1. Carries the mask of
    /// locations that were actually declared.
    InvalidLocation(u32),
    /// A resource lives outside descriptor set 0.
    InvalidDescriptorSet(u32),
    /// The vertex stage declared the wrong number of inputs.
    InvalidInputCount(usize),
    /// A binding index is outside the host's descriptor table.
    InvalidBinding(u32),
    /// The stage declared a resource category the contract forbids, or a
    /// uniform buffer whose type is not a struct.
    InvalidResourceType,
    /// A sampled image name matches no known semantic.
    UnknownSemantics(String),
    /// A semantic uniform was declared with the wrong type.
    InvalidTypeForSemantic(String),
}

/// Error type for shader reflection.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum ShaderReflectError {
    /// The SPIR-V could not be parsed or queried.
    #[error("spirv-cross error: {0}")]
    SpirvCrossError(#[from] spirv_cross::ErrorCode),
    /// Error when validating the vertex stage.
    #[error("error when verifying vertex semantics: {0:?}")]
    VertexSemanticError(SemanticsErrorKind),
    /// Error when validating the fragment stage.
    #[error("error when verifying fragment semantics: {0:?}")]
    FragmentSemanticError(SemanticsErrorKind),
    /// The vertex and fragment stages declared the shared uniform buffer at
    /// different bindings.
    #[error("vertex and fragment uniform buffer must have the same binding (vertex {vertex}, fragment {fragment})")]
    MismatchedUniformBuffer { vertex: u32, fragment: u32 },
    /// Two resources claimed the same descriptor binding.
    #[error("binding {0} is already in use")]
    BindingInUse(u32),
    /// The vertex uniform buffer has no `MVP` member.
    #[error("could not find offset for the MVP uniform")]
    MissingMvp,
    /// Two sampled images resolved to the same texture semantic.
    #[error("semantic {0:?} is populated by more than one sampled image")]
    DuplicateSemantic(TextureSemantics),
}
