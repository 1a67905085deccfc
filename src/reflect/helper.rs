use crate::error::{SemanticsErrorKind, ShaderReflectError};

/// The stage a contract violation is charged to.
#[derive(Debug, Copy, Clone)]
pub enum SemanticErrorBlame {
    Vertex,
    Fragment,
}

impl SemanticErrorBlame {
    pub fn error(self, kind: SemanticsErrorKind) -> ShaderReflectError {
        match self {
            SemanticErrorBlame::Vertex => ShaderReflectError::VertexSemanticError(kind),
            SemanticErrorBlame::Fragment => ShaderReflectError::FragmentSemanticError(kind),
        }
    }
}

/// Binding and size of one stage's uniform buffer, before the stages are
/// reconciled.
pub struct UboData {
    pub binding: u32,
    pub size: u32,
}

/// Name and binding of a sampled image that passed the per-texture checks.
pub struct TextureData<'a> {
    pub name: &'a str,
    pub binding: u32,
}

/// A uniform buffer member located by name.
pub struct UniformMember {
    /// Byte offset of the member within the buffer.
    pub offset: usize,
    /// Type id of the member, for shape checks against its semantic.
    pub type_id: u32,
}
