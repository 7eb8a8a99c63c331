//! Materials, texture slots and images.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Where an image's pixels come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageSource {
    /// Backed by a file on disk.
    #[default]
    File,
    /// Generated in memory by the host.
    Generated,
    Sequence,
    Movie,
}

/// An image referenced by a texture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Image {
    pub filepath: PathBuf,
    #[serde(default)]
    pub source: ImageSource,
    /// Color space name as reported by the host (e.g. `sRGB`).
    #[serde(default = "default_colorspace")]
    pub colorspace: String,
    #[serde(default)]
    pub use_alpha: bool,
}

fn default_colorspace() -> String {
    "sRGB".to_string()
}

impl Image {
    pub fn new(filepath: impl Into<PathBuf>) -> Self {
        Self {
            filepath: filepath.into(),
            source: ImageSource::File,
            colorspace: default_colorspace(),
            use_alpha: false,
        }
    }

    pub fn with_alpha(mut self, use_alpha: bool) -> Self {
        self.use_alpha = use_alpha;
        self
    }

    pub fn with_colorspace(mut self, colorspace: impl Into<String>) -> Self {
        self.colorspace = colorspace.into();
        self
    }

    /// Whether the image can be relocated and declared (file-backed).
    pub fn is_file(&self) -> bool {
        self.source == ImageSource::File
    }
}

/// Texture type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextureKind {
    #[default]
    Image,
    /// Procedural textures; never exported.
    Procedural,
}

/// Behaviour outside the `[0, 1]` UV range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextureExtension {
    #[default]
    Repeat,
    Extend,
    Clip,
    ClipCube,
    Checker,
}

impl fmt::Display for TextureExtension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TextureExtension::Repeat => "REPEAT",
            TextureExtension::Extend => "EXTEND",
            TextureExtension::Clip => "CLIP",
            TextureExtension::ClipCube => "CLIP_CUBE",
            TextureExtension::Checker => "CHECKER",
        };
        f.write_str(name)
    }
}

/// A texture datablock.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Texture {
    pub name: String,
    #[serde(default)]
    pub kind: TextureKind,
    #[serde(default)]
    pub image: Option<Image>,
    #[serde(default)]
    pub extension: TextureExtension,
    #[serde(default = "default_repeat")]
    pub repeat: [f32; 2],
}

fn default_repeat() -> [f32; 2] {
    [1.0, 1.0]
}

impl Texture {
    /// An image texture with repeat wrapping and unit tiling.
    pub fn image(name: impl Into<String>, image: Image) -> Self {
        Self {
            name: name.into(),
            kind: TextureKind::Image,
            image: Some(image),
            extension: TextureExtension::Repeat,
            repeat: default_repeat(),
        }
    }

    /// The file-backed image of an image texture.
    pub fn file_image(&self) -> Option<&Image> {
        match self.kind {
            TextureKind::Image => self.image.as_ref().filter(|image| image.is_file()),
            TextureKind::Procedural => None,
        }
    }
}

/// Source of the texture coordinates a slot samples with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TexCoords {
    #[default]
    Uv,
    Orco,
    Global,
    Object,
    Normal,
    Window,
}

impl fmt::Display for TexCoords {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TexCoords::Uv => "UV",
            TexCoords::Orco => "ORCO",
            TexCoords::Global => "GLOBAL",
            TexCoords::Object => "OBJECT",
            TexCoords::Normal => "NORMAL",
            TexCoords::Window => "WINDOW",
        };
        f.write_str(name)
    }
}

/// Projection from texture coordinates onto the image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mapping {
    #[default]
    Flat,
    Cube,
    Tube,
    Sphere,
}

impl fmt::Display for Mapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Mapping::Flat => "FLAT",
            Mapping::Cube => "CUBE",
            Mapping::Tube => "TUBE",
            Mapping::Sphere => "SPHERE",
        };
        f.write_str(name)
    }
}

/// A material's texture slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextureSlot {
    pub texture: Texture,
    #[serde(default)]
    pub texture_coords: TexCoords,
    #[serde(default)]
    pub mapping: Mapping,
}

impl TextureSlot {
    pub fn new(texture: Texture) -> Self {
        Self {
            texture,
            texture_coords: TexCoords::Uv,
            mapping: Mapping::Flat,
        }
    }
}

/// A surface material.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub name: String,
    #[serde(default = "default_white")]
    pub diffuse_color: [f32; 3],
    #[serde(default = "default_white")]
    pub specular_color: [f32; 3],
    #[serde(default = "default_one")]
    pub specular_alpha: f32,
    #[serde(default = "default_one")]
    pub ambient: f32,
    #[serde(default)]
    pub emit: f32,
    #[serde(default = "default_hardness")]
    pub specular_hardness: f32,
    #[serde(default)]
    pub texture_slots: Vec<TextureSlot>,
}

fn default_white() -> [f32; 3] {
    [1.0, 1.0, 1.0]
}

fn default_one() -> f32 {
    1.0
}

fn default_hardness() -> f32 {
    50.0
}

impl Material {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            diffuse_color: default_white(),
            specular_color: default_white(),
            specular_alpha: default_one(),
            ambient: default_one(),
            emit: 0.0,
            specular_hardness: default_hardness(),
            texture_slots: Vec::new(),
        }
    }

    pub fn with_texture(mut self, slot: TextureSlot) -> Self {
        self.texture_slots.push(slot);
        self
    }

    /// Exported texture slots (image textures backed by a file), in slot order.
    pub fn image_slots(&self) -> impl Iterator<Item = (&TextureSlot, &Image)> + '_ {
        self.texture_slots
            .iter()
            .filter_map(|slot| slot.texture.file_image().map(|image| (slot, image)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_slots_skip_procedural_and_generated() {
        let mut procedural = Texture::image("clouds", Image::new("clouds.png"));
        procedural.kind = TextureKind::Procedural;
        let mut generated = Image::new("baked.png");
        generated.source = ImageSource::Generated;

        let material = Material::new("skin")
            .with_texture(TextureSlot::new(Texture::image("diffuse", Image::new("skin.png"))))
            .with_texture(TextureSlot::new(procedural))
            .with_texture(TextureSlot::new(Texture::image("baked", generated)))
            .with_texture(TextureSlot::new(Texture::image("normal", Image::new("skin_n.png"))));

        let paths: Vec<_> = material
            .image_slots()
            .map(|(_, image)| image.filepath.clone())
            .collect();
        assert_eq!(paths, vec![PathBuf::from("skin.png"), PathBuf::from("skin_n.png")]);
    }

    #[test]
    fn test_material_defaults_from_json() {
        let material: Material = serde_json::from_str(r#"{ "name": "eyes" }"#).unwrap();
        assert_eq!(material, Material::new("eyes"));
    }

    #[test]
    fn test_texture_enums_from_json() {
        let slot: TextureSlot = serde_json::from_str(
            r#"{
                "texture": {
                    "name": "t",
                    "image": { "filepath": "a.png", "colorspace": "Non-Color" },
                    "extension": "clip_cube",
                    "repeat": [2.0, 1.0]
                },
                "texture_coords": "orco",
                "mapping": "sphere"
            }"#,
        )
        .unwrap();
        assert_eq!(slot.texture.extension, TextureExtension::ClipCube);
        assert_eq!(slot.texture_coords, TexCoords::Orco);
        assert_eq!(slot.mapping, Mapping::Sphere);
        assert_eq!(slot.texture.image.unwrap().colorspace, "Non-Color");
    }
}
