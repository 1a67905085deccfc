use crate::error::{SemanticsErrorKind, ShaderReflectError};
use crate::reflect::helper::{SemanticErrorBlame, TextureData, UboData, UniformMember};
use crate::reflect::semantics::{
    BindingStage, ShaderReflection, TextureReflection, TextureSemantics, TypeInfo, UboReflection,
    ValidateTypeSemantics, MAX_BINDINGS_COUNT, TEXTURE_SEMANTICS_COUNT,
};
use crate::reflect::{ReflectAst, ReflectShader, Resource, StageResources, Type};
use log::error;
use spirv_cross::spirv::{self, Ast, Decoration, Module};
use spirv_cross::{glsl, ErrorCode};

impl ValidateTypeSemantics<Type> for TextureSemantics {
    fn validate_type(&self, ty: &Type) -> Option<TypeInfo> {
        let Type::Float {
            vecsize,
            columns,
            ref array,
        } = *ty
        else {
            return None;
        };

        if !array.is_empty() {
            return None;
        }

        // size uniforms are always vec4
        if vecsize == 4 && columns == 1 {
            Some(TypeInfo {
                size: vecsize,
                columns,
            })
        } else {
            None
        }
    }
}

/// Reflects one post processing pass, a compiled vertex and fragment pair,
/// against the resource binding contract.
///
/// Generic over the decoder answering layout queries; [`GlslReflect`] is the
/// spirv-cross backed instantiation the host uses.
pub struct PassReflect<A> {
    vertex: A,
    fragment: A,
}

pub type GlslReflect = PassReflect<Ast<glsl::Target>>;

impl<T> PassReflect<Ast<T>>
where
    T: spirv::Target,
    Ast<T>: spirv::Compile<T>,
    Ast<T>: spirv::Parse<T>,
{
    /// Parse two compiled SPIR-V word streams into a reflectable pass.
    pub fn new(vertex: &[u32], fragment: &[u32]) -> Result<Self, ShaderReflectError> {
        let vertex_module = Module::from_words(vertex);
        let fragment_module = Module::from_words(fragment);

        let vertex = Ast::parse(&vertex_module)?;
        let fragment = Ast::parse(&fragment_module)?;

        Ok(PassReflect { vertex, fragment })
    }
}

fn convert_resources(resources: Vec<spirv::Resource>) -> Vec<Resource> {
    resources
        .into_iter()
        .map(|resource| Resource {
            id: resource.id,
            base_type_id: resource.base_type_id,
            name: resource.name,
        })
        .collect()
}

fn convert_type(ty: spirv::Type) -> Type {
    match ty {
        spirv::Type::Struct { member_types, .. } => Type::Struct { member_types },
        spirv::Type::Float {
            vecsize,
            columns,
            array,
            ..
        } => Type::Float {
            vecsize,
            columns,
            array,
        },
        _ => Type::Other,
    }
}

impl<T> ReflectAst for Ast<T>
where
    T: spirv::Target,
    Ast<T>: spirv::Compile<T>,
    Ast<T>: spirv::Parse<T>,
{
    fn shader_resources(&self) -> Result<StageResources, ErrorCode> {
        let resources = self.get_shader_resources()?;
        Ok(StageResources {
            stage_inputs: convert_resources(resources.stage_inputs),
            uniform_buffers: convert_resources(resources.uniform_buffers),
            sampled_images: convert_resources(resources.sampled_images),
            storage_buffers: convert_resources(resources.storage_buffers),
            storage_images: convert_resources(resources.storage_images),
            subpass_inputs: convert_resources(resources.subpass_inputs),
            atomic_counters: convert_resources(resources.atomic_counters),
            push_constant_buffers: convert_resources(resources.push_constant_buffers),
        })
    }

    fn decoration(&self, id: u32, decoration: Decoration) -> Result<u32, ErrorCode> {
        self.get_decoration(id, decoration)
    }

    fn member_name(&self, base_type_id: u32, index: u32) -> Result<String, ErrorCode> {
        self.get_member_name(base_type_id, index)
    }

    fn member_decoration(
        &self,
        base_type_id: u32,
        index: u32,
        decoration: Decoration,
    ) -> Result<u32, ErrorCode> {
        self.get_member_decoration(base_type_id, index, decoration)
    }

    fn type_of(&self, type_id: u32) -> Result<Type, ErrorCode> {
        Ok(convert_type(self.get_type(type_id)?))
    }

    fn declared_struct_size(&self, base_type_id: u32) -> Result<u32, ErrorCode> {
        self.get_declared_struct_size(base_type_id)
    }
}

impl<A> PassReflect<A>
where
    A: ReflectAst,
{
    fn validate(
        &self,
        vertex_res: &StageResources,
        fragment_res: &StageResources,
    ) -> Result<(), ShaderReflectError> {
        if !vertex_res.sampled_images.is_empty()
            || !vertex_res.storage_buffers.is_empty()
            || !vertex_res.subpass_inputs.is_empty()
            || !vertex_res.storage_images.is_empty()
            || !vertex_res.atomic_counters.is_empty()
            || !vertex_res.push_constant_buffers.is_empty()
        {
            return Err(ShaderReflectError::VertexSemanticError(
                SemanticsErrorKind::InvalidResourceType,
            ));
        }

        if !fragment_res.storage_buffers.is_empty()
            || !fragment_res.subpass_inputs.is_empty()
            || !fragment_res.storage_images.is_empty()
            || !fragment_res.atomic_counters.is_empty()
            || !fragment_res.push_constant_buffers.is_empty()
        {
            return Err(ShaderReflectError::FragmentSemanticError(
                SemanticsErrorKind::InvalidResourceType,
            ));
        }

        let vert_inputs = vertex_res.stage_inputs.len();
        if vert_inputs != 2 {
            return Err(ShaderReflectError::VertexSemanticError(
                SemanticsErrorKind::InvalidInputCount(vert_inputs),
            ));
        }

        let vert_mask = vertex_res.stage_inputs.iter().try_fold(0u32, |mask, input| {
            let location = self.vertex.decoration(input.id, Decoration::Location)?;
            // locations past the mask width can never satisfy the 0b11 check,
            // and shifting by them would overflow
            if location >= u32::BITS {
                return Err(ShaderReflectError::VertexSemanticError(
                    SemanticsErrorKind::InvalidLocation(location),
                ));
            }
            Ok(mask | 1 << location)
        })?;
        if vert_mask != 0x3 {
            return Err(ShaderReflectError::VertexSemanticError(
                SemanticsErrorKind::InvalidLocation(vert_mask),
            ));
        }

        let vert_ubo_count = vertex_res.uniform_buffers.len();
        if vert_ubo_count != 1 {
            return Err(ShaderReflectError::VertexSemanticError(
                SemanticsErrorKind::InvalidUniformBufferCount(vert_ubo_count),
            ));
        }

        let frag_ubo_count = fragment_res.uniform_buffers.len();
        if frag_ubo_count > 1 {
            return Err(ShaderReflectError::FragmentSemanticError(
                SemanticsErrorKind::InvalidUniformBufferCount(frag_ubo_count),
            ));
        }

        Ok(())
    }

    fn get_ubo_data(
        ast: &A,
        ubo: &Resource,
        blame: SemanticErrorBlame,
    ) -> Result<UboData, ShaderReflectError> {
        let descriptor_set = ast.decoration(ubo.id, Decoration::DescriptorSet)?;
        if descriptor_set != 0 {
            return Err(blame.error(SemanticsErrorKind::InvalidDescriptorSet(descriptor_set)));
        }

        let binding = ast.decoration(ubo.id, Decoration::Binding)?;
        let size = ast.declared_struct_size(ubo.base_type_id)?;
        Ok(UboData { binding, size })
    }

    fn reflect_ubos(
        &self,
        vertex_ubo: &Resource,
        fragment_ubo: Option<&Resource>,
    ) -> Result<UboReflection, ShaderReflectError> {
        let vertex_ubo = Self::get_ubo_data(&self.vertex, vertex_ubo, SemanticErrorBlame::Vertex)?;

        let mut size = vertex_ubo.size;
        let mut stage_mask = BindingStage::VERTEX;

        if let Some(fragment_ubo) = fragment_ubo {
            let fragment_ubo =
                Self::get_ubo_data(&self.fragment, fragment_ubo, SemanticErrorBlame::Fragment)?;
            if vertex_ubo.binding != fragment_ubo.binding {
                return Err(ShaderReflectError::MismatchedUniformBuffer {
                    vertex: vertex_ubo.binding,
                    fragment: fragment_ubo.binding,
                });
            }

            size = std::cmp::max(size, fragment_ubo.size);
            stage_mask |= BindingStage::FRAGMENT;
        }

        if vertex_ubo.binding >= MAX_BINDINGS_COUNT {
            return Err(SemanticErrorBlame::Vertex
                .error(SemanticsErrorKind::InvalidBinding(vertex_ubo.binding)));
        }

        Ok(UboReflection {
            binding: vertex_ubo.binding,
            size,
            stage_mask,
        })
    }

    /// Scan the uniform buffer's members in declaration order for one named
    /// `name`, yielding its byte offset and type id.
    fn find_uniform_offset(
        ast: &A,
        ubo: &Resource,
        name: &str,
        blame: SemanticErrorBlame,
    ) -> Result<Option<UniformMember>, ShaderReflectError> {
        let Type::Struct { member_types } = ast.type_of(ubo.base_type_id)? else {
            return Err(blame.error(SemanticsErrorKind::InvalidResourceType));
        };

        for (index, &type_id) in member_types.iter().enumerate() {
            let index = index as u32;
            if ast.member_name(ubo.base_type_id, index)? == name {
                let offset = ast.member_decoration(ubo.base_type_id, index, Decoration::Offset)?;
                return Ok(Some(UniformMember {
                    offset: offset as usize,
                    type_id,
                }));
            }
        }

        Ok(None)
    }

    fn reflect_texture<'a>(
        &self,
        texture: &'a Resource,
    ) -> Result<TextureData<'a>, ShaderReflectError> {
        let descriptor_set = self.fragment.decoration(texture.id, Decoration::DescriptorSet)?;
        if descriptor_set != 0 {
            return Err(ShaderReflectError::FragmentSemanticError(
                SemanticsErrorKind::InvalidDescriptorSet(descriptor_set),
            ));
        }

        let binding = self.fragment.decoration(texture.id, Decoration::Binding)?;
        if binding >= MAX_BINDINGS_COUNT {
            return Err(ShaderReflectError::FragmentSemanticError(
                SemanticsErrorKind::InvalidBinding(binding),
            ));
        }

        Ok(TextureData {
            name: &texture.name,
            binding,
        })
    }

    /// Look up the `<Name>Size` uniform for a semantic texture in the
    /// fragment uniform buffer, if both exist.
    fn reflect_texture_size(
        &self,
        fragment_ubo: Option<&Resource>,
        semantic: TextureSemantics,
    ) -> Result<Option<usize>, ShaderReflectError> {
        let Some(fragment_ubo) = fragment_ubo else {
            return Ok(None);
        };

        let size_uniform = semantic.size_uniform_name();
        let Some(member) = Self::find_uniform_offset(
            &self.fragment,
            fragment_ubo,
            &size_uniform,
            SemanticErrorBlame::Fragment,
        )?
        else {
            return Ok(None);
        };

        let ty = self.fragment.type_of(member.type_id)?;
        if semantic.validate_type(&ty).is_none() {
            return Err(SemanticErrorBlame::Fragment
                .error(SemanticsErrorKind::InvalidTypeForSemantic(size_uniform)));
        }

        Ok(Some(member.offset))
    }
}

impl<A> ReflectShader for PassReflect<A>
where
    A: ReflectAst,
{
    fn reflect(&self) -> Result<ShaderReflection, ShaderReflectError> {
        let vertex_res = self.vertex.shader_resources()?;
        let fragment_res = self.fragment.shader_resources()?;
        self.validate(&vertex_res, &fragment_res)?;

        let vertex_ubo = &vertex_res.uniform_buffers[0];
        let fragment_ubo = fragment_res.uniform_buffers.first();

        let ubo = self.reflect_ubos(vertex_ubo, fragment_ubo)?;

        let Some(mvp) =
            Self::find_uniform_offset(&self.vertex, vertex_ubo, "MVP", SemanticErrorBlame::Vertex)?
        else {
            return Err(ShaderReflectError::MissingMvp);
        };

        let mut binding_mask = 1u16 << ubo.binding;
        let mut textures = [None; TEXTURE_SEMANTICS_COUNT];

        for sampled_image in &fragment_res.sampled_images {
            let texture = self.reflect_texture(sampled_image)?;
            if binding_mask & (1 << texture.binding) != 0 {
                return Err(ShaderReflectError::BindingInUse(texture.binding));
            }
            binding_mask |= 1 << texture.binding;

            let Some(semantic) = TextureSemantics::from_texture_name(texture.name) else {
                return Err(SemanticErrorBlame::Fragment.error(
                    SemanticsErrorKind::UnknownSemantics(texture.name.to_string()),
                ));
            };

            if textures[semantic.index()].is_some() {
                return Err(ShaderReflectError::DuplicateSemantic(semantic));
            }

            let size_offset = self.reflect_texture_size(fragment_ubo, semantic)?;

            textures[semantic.index()] = Some(TextureReflection {
                binding: texture.binding,
                stage_mask: BindingStage::FRAGMENT,
                size_offset,
            });
        }

        Ok(ShaderReflection {
            ubo,
            mvp_offset: mvp.offset,
            textures,
        })
    }
}

/// Reflect a compiled vertex and fragment SPIR-V pair against the binding
/// contract.
///
/// On success the returned [`ShaderReflection`] carries everything the host
/// needs to bind the pass. On failure no record is produced; the error names
/// the violated rule and, for stage local violations, the offending stage.
/// Failures are also reported through the [`log`] facade so hosts that wire
/// up a logger see one line per rejected pair.
pub fn reflect_spirv(
    vertex: &[u32],
    fragment: &[u32],
) -> Result<ShaderReflection, ShaderReflectError> {
    let result = GlslReflect::new(vertex, fragment).and_then(|reflect| reflect.reflect());
    if let Err(error) = &result {
        error!("failed to reflect shader pair: {error}");
    }
    result
}
