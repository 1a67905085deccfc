use bitflags::bitflags;

/// The number of texture semantics the binding contract recognizes.
pub const TEXTURE_SEMANTICS_COUNT: usize = 2;

/// The maximum number of descriptor bindings the host allocates per pass.
///
/// Every reflected binding index is strictly less than this.
pub const MAX_BINDINGS_COUNT: u32 = 16;

/// Texture semantics recognized by the binding contract.
///
/// Shader authors opt into a semantic texture by declaring a sampled image
/// with its canonical name. The set is closed; widening it means adding a
/// variant here and a row to [`from_texture_name`](TextureSemantics::from_texture_name).
/// The discriminants are dense so the enum can index
/// [`ShaderReflection::textures`] and pack into a mask word.
#[repr(i32)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum TextureSemantics {
    // the unfiltered input to the whole filter chain
    Original = 0,
    // the output of the previous pass
    Source = 1,
}

impl TextureSemantics {
    pub const TEXTURE_SEMANTICS: [TextureSemantics; TEXTURE_SEMANTICS_COUNT] =
        [TextureSemantics::Original, TextureSemantics::Source];

    /// Classify a sampled image by its declared name.
    ///
    /// Exact match, case sensitive. Names outside the table have no semantic
    /// and make the declaring shader invalid.
    pub fn from_texture_name(name: &str) -> Option<Self> {
        match name {
            "Original" => Some(TextureSemantics::Original),
            "Source" => Some(TextureSemantics::Source),
            _ => None,
        }
    }

    /// The canonical sampled image name for this semantic.
    pub const fn texture_name(self) -> &'static str {
        match self {
            TextureSemantics::Original => "Original",
            TextureSemantics::Source => "Source",
        }
    }

    /// The name of the vec4 uniform carrying this texture's dimensions.
    pub fn size_uniform_name(self) -> String {
        format!("{}Size", self.texture_name())
    }

    /// The dense index of this semantic within [`ShaderReflection::textures`].
    pub const fn index(self) -> usize {
        self as usize
    }
}

bitflags! {
    /// The shader stages that reference a resource.
    pub struct BindingStage: u8 {
        const NONE = 0b00000000;
        const VERTEX = 0b00000001;
        const FRAGMENT = 0b00000010;
    }
}

/// Where to validate the type of a uniform against its semantic.
pub trait ValidateTypeSemantics<T> {
    /// Returns the scalar layout of the type if it is acceptable for this
    /// semantic, or `None` if the shader declared the wrong shape.
    fn validate_type(&self, ty: &T) -> Option<TypeInfo>;
}

/// The scalar layout of a validated uniform member.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct TypeInfo {
    pub size: u32,
    pub columns: u32,
}

/// Reflection of the single uniform buffer shared by a shader pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UboReflection {
    /// The descriptor binding, identical in every stage that declares the buffer.
    pub binding: u32,
    /// The larger of the two stages' declared struct sizes, in bytes.
    pub size: u32,
    /// The stages that declare the buffer. Always contains
    /// [`BindingStage::VERTEX`].
    pub stage_mask: BindingStage,
}

/// Reflection of one semantic texture sampled by the fragment stage.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct TextureReflection {
    /// The descriptor binding of the sampled image.
    pub binding: u32,
    /// The stages sampling the texture.
    pub stage_mask: BindingStage,
    /// Byte offset of the `<Name>Size` vec4 within the uniform buffer, if the
    /// fragment stage declared one.
    pub size_offset: Option<usize>,
}

/// Everything the host needs to bind resources and feed uniforms for one
/// validated shader pair.
///
/// A record is produced once per pair by [`reflect_spirv`](crate::reflect_spirv)
/// and never changes afterwards; reflection failures yield no record at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderReflection {
    pub ubo: UboReflection,
    /// Byte offset of the `MVP` mat4 within the uniform buffer.
    pub mvp_offset: usize,
    /// Semantic texture slots, indexed by [`TextureSemantics::index`].
    pub textures: [Option<TextureReflection>; TEXTURE_SEMANTICS_COUNT],
}

impl ShaderReflection {
    /// The reflection for one semantic texture, if the fragment stage samples it.
    pub fn texture(&self, semantics: TextureSemantics) -> Option<&TextureReflection> {
        self.textures[semantics.index()].as_ref()
    }

    /// Bitmask over [`TextureSemantics`] discriminants marking the populated
    /// texture slots.
    pub fn texture_mask(&self) -> u32 {
        self.textures
            .iter()
            .enumerate()
            .fold(0, |mask, (index, texture)| match texture {
                Some(_) => mask | 1 << index,
                None => mask,
            })
    }

    /// Bitmask over [`TextureSemantics`] discriminants marking the populated
    /// texture slots that also carry a `<Name>Size` uniform offset.
    ///
    /// Always a subset of [`texture_mask`](ShaderReflection::texture_mask).
    pub fn texture_size_mask(&self) -> u32 {
        self.textures
            .iter()
            .enumerate()
            .fold(0, |mask, (index, texture)| match texture {
                Some(texture) if texture.size_offset.is_some() => mask | 1 << index,
                _ => mask,
            })
    }
}

#[cfg(test)]
mod test {
    use crate::reflect::semantics::{
        BindingStage, TextureSemantics, UboReflection, TEXTURE_SEMANTICS_COUNT,
    };

    #[test]
    fn classifier_is_exact_and_case_sensitive() {
        assert_eq!(
            TextureSemantics::from_texture_name("Original"),
            Some(TextureSemantics::Original)
        );
        assert_eq!(
            TextureSemantics::from_texture_name("Source"),
            Some(TextureSemantics::Source)
        );

        assert_eq!(TextureSemantics::from_texture_name("original"), None);
        assert_eq!(TextureSemantics::from_texture_name("SOURCE"), None);
        assert_eq!(TextureSemantics::from_texture_name("History1"), None);
        assert_eq!(TextureSemantics::from_texture_name("OriginalSize"), None);
        assert_eq!(TextureSemantics::from_texture_name(""), None);
    }

    #[test]
    fn canonical_names_round_trip() {
        for semantics in TextureSemantics::TEXTURE_SEMANTICS {
            assert_eq!(
                TextureSemantics::from_texture_name(semantics.texture_name()),
                Some(semantics)
            );
        }
    }

    #[test]
    fn size_uniform_names_append_suffix() {
        assert_eq!(
            TextureSemantics::Original.size_uniform_name(),
            "OriginalSize"
        );
        assert_eq!(TextureSemantics::Source.size_uniform_name(), "SourceSize");
    }

    #[test]
    fn semantics_indices_are_dense() {
        for (position, semantics) in TextureSemantics::TEXTURE_SEMANTICS.iter().enumerate() {
            assert_eq!(semantics.index(), position);
        }
        assert!(TEXTURE_SEMANTICS_COUNT <= u32::BITS as usize);
    }

    #[test]
    fn stage_mask_unions() {
        let mask = BindingStage::VERTEX | BindingStage::FRAGMENT;
        assert!(mask.contains(BindingStage::VERTEX));
        assert!(mask.contains(BindingStage::FRAGMENT));
        assert_eq!(BindingStage::NONE.bits(), 0);

        let ubo = UboReflection {
            binding: 0,
            size: 64,
            stage_mask: BindingStage::VERTEX,
        };
        assert!(!ubo.stage_mask.contains(BindingStage::FRAGMENT));
    }
}
