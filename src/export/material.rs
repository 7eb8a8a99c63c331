//! `<Texture>` and `<Material>` declarations.

use super::{Diagnostics, TextureRelocator};
use crate::error::{ExportWarning, Result};
use crate::names;
use crate::scene::{
    Image, Mapping, Material, SceneSource, TexCoords, Texture, TextureExtension, TextureSlot,
};
use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Wrap mode written when the texture's extension mode has no egg equivalent.
const UNSPECIFIED_WRAP: &str = "unspecified";

/// Materials to declare, in scene order, one per sanitized name.
///
/// With `all_used` every material that is active on a mesh or referenced by
/// one of its polygons is declared. Otherwise only active materials are, and
/// meshes without one are reported. A distinct material whose sanitized
/// name is already declared is dropped and reported.
pub fn declared_materials<'a, S: SceneSource + ?Sized>(
    scene: &'a S,
    all_used: bool,
    diagnostics: &mut Diagnostics,
) -> Vec<&'a Material> {
    let mut seen: HashMap<String, &Material> = HashMap::new();
    let mut declared = Vec::new();

    for mesh in scene.meshes() {
        let candidates: Vec<&Material> = if all_used {
            let used: HashSet<usize> = mesh
                .polygons
                .iter()
                .map(|polygon| polygon.material_index)
                .chain(mesh.active_material)
                .collect();
            mesh.materials
                .iter()
                .enumerate()
                .filter(|(i, _)| used.contains(i))
                .map(|(_, material)| material)
                .collect()
        } else {
            match mesh.active_material() {
                Some(material) => vec![material],
                None => {
                    diagnostics.warn(ExportWarning::NoActiveMaterial {
                        mesh: mesh.name.clone(),
                    });
                    Vec::new()
                }
            }
        };

        for material in candidates {
            match seen.entry(names::material_name(&material.name)) {
                Entry::Vacant(entry) => {
                    entry.insert(material);
                    declared.push(material);
                }
                Entry::Occupied(entry) => {
                    if *entry.get() != material {
                        diagnostics.warn(ExportWarning::MaterialNameCollision {
                            name: entry.key().clone(),
                            material: material.name.clone(),
                        });
                    }
                }
            }
        }
    }
    declared
}

/// Materials whose image textures must be declared: the declared ones
/// followed by every material a polygon references, so each `<TRef>` a
/// polygon writes has a matching `<Texture>`.
pub fn textured_materials<'a, S: SceneSource + ?Sized>(
    scene: &'a S,
    declared: &[&'a Material],
) -> Vec<&'a Material> {
    let referenced = scene.meshes().iter().flat_map(|mesh| {
        mesh.polygons
            .iter()
            .filter_map(move |polygon| mesh.materials.get(polygon.material_index))
    });
    declared.iter().copied().chain(referenced).collect()
}

/// Write one `<Texture>` per distinct image used by `materials`, copying each
/// image next to the document.
pub fn write_textures<W: Write>(
    out: &mut W,
    materials: &[&Material],
    relocator: &mut TextureRelocator,
    diagnostics: &mut Diagnostics,
) -> Result<()> {
    let mut written: HashSet<&PathBuf> = HashSet::new();
    let mut names_in_use: HashMap<String, &PathBuf> = HashMap::new();

    for material in materials {
        for (slot, image) in material.image_slots() {
            if !written.insert(&image.filepath) {
                continue;
            }
            let name = names::texture_name(&image.filepath);
            if let Some(previous) = names_in_use.insert(name.clone(), &image.filepath) {
                if previous != &image.filepath {
                    diagnostics.warn(ExportWarning::TextureNameCollision { name: name.clone() });
                }
            }

            let path = relocator.relocate(&image.filepath, diagnostics);
            write_texture(out, &name, &path, slot, image, diagnostics)?;
        }
    }
    Ok(())
}

fn write_texture<W: Write>(
    out: &mut W,
    name: &str,
    path: &Path,
    slot: &TextureSlot,
    image: &Image,
    diagnostics: &mut Diagnostics,
) -> Result<()> {
    let texture = &slot.texture;
    writeln!(out, "<Texture> {} {{", name)?;
    writeln!(out, "  \"{}\"", path.display())?;
    writeln!(out, "  <Scalar> format {{ {} }}", image_format(image, diagnostics))?;
    writeln!(out, "  <Scalar> wrapu {{ {} }}", wrap_mode(texture, 'x', diagnostics))?;
    writeln!(out, "  <Scalar> wrapv {{ {} }}", wrap_mode(texture, 'y', diagnostics))?;
    writeln!(out, "  <Scalar> type {{ {} }}", texture_type(slot, diagnostics))?;
    writeln!(out, "}}")?;
    writeln!(out)?;
    Ok(())
}

/// Channel format: `RGB` for sRGB images, `A` appended when alpha is used.
/// Unknown color spaces give an empty channel list.
pub fn image_format(image: &Image, diagnostics: &mut Diagnostics) -> String {
    let mut format = String::new();
    if image.colorspace == "sRGB" {
        format.push_str("RGB");
    } else {
        diagnostics.warn(ExportWarning::UnknownColorSpace {
            image: image.filepath.clone(),
            colorspace: image.colorspace.clone(),
        });
    }
    if image.use_alpha {
        format.push('A');
    }
    format
}

/// Wrap mode along `axis` (`'x'` for u, `'y'` for v). Only unit-factor
/// repeat maps onto an egg wrap mode.
pub fn wrap_mode(texture: &Texture, axis: char, diagnostics: &mut Diagnostics) -> &'static str {
    let repeat = if axis == 'x' { texture.repeat[0] } else { texture.repeat[1] };
    if texture.extension == TextureExtension::Repeat && repeat == 1.0 {
        return "repeat";
    }
    diagnostics.warn(ExportWarning::UnsupportedWrap {
        texture: texture.name.clone(),
        axis,
        extension: texture.extension.to_string(),
        repeat,
    });
    UNSPECIFIED_WRAP
}

/// Texture type: `2d` for flat UV mapping, `undefined` for anything else.
pub fn texture_type(slot: &TextureSlot, diagnostics: &mut Diagnostics) -> &'static str {
    if slot.texture_coords == TexCoords::Uv && slot.mapping == Mapping::Flat {
        return "2d";
    }
    diagnostics.warn(ExportWarning::UnsupportedMapping {
        texture: slot.texture.name.clone(),
        coords: slot.texture_coords.to_string(),
        mapping: slot.mapping.to_string(),
    });
    "undefined"
}

/// Write a `<Material>` declaration.
pub fn write_material<W: Write>(out: &mut W, material: &Material) -> Result<()> {
    let [diff_r, diff_g, diff_b] = material.diffuse_color;
    let [spec_r, spec_g, spec_b] = material.specular_color;
    let scalars = [
        ("diffr", diff_r),
        ("diffg", diff_g),
        ("diffb", diff_b),
        ("specr", spec_r),
        ("specg", spec_g),
        ("specb", spec_b),
        ("speca", material.specular_alpha),
        ("ambr", material.ambient),
        ("ambg", material.ambient),
        ("ambb", material.ambient),
        ("emitr", material.emit),
        ("emitg", material.emit),
        ("emitb", material.emit),
        ("shininess", material.specular_hardness),
    ];

    writeln!(out, "<Material> {} {{", names::material_name(&material.name))?;
    for (key, value) in scalars {
        writeln!(out, "  <Scalar> {} {{ {:.4} }}", key, value)?;
    }
    writeln!(out, "}}")?;
    writeln!(out)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{Mesh, Polygon, Scene, Vertex};
    use glam::Vec3;

    fn render<F: FnOnce(&mut Vec<u8>) -> Result<()>>(f: F) -> String {
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    fn two_material_scene() -> Scene {
        let mut scene = Scene::new("");
        let mut mesh = Mesh::new("body");
        mesh.add_material(Material::new("human:Skin Material"));
        mesh.add_material(Material::new("Eyebrows"));
        mesh.add_material(Material::new("Unused"));
        mesh.add_vertex(Vertex::new(Vec3::ZERO, Vec3::Z));
        mesh.add_polygon(Polygon::new(vec![0, 0, 0]).with_material(1));
        scene.add_mesh(mesh);

        let mut clothes = Mesh::new("shirt");
        clothes.add_material(Material::new("Skin Material"));
        scene.add_mesh(clothes);
        scene
    }

    #[test]
    fn test_material_record() {
        let mut material = Material::new("Skin Material");
        material.diffuse_color = [0.8, 0.6, 0.5];
        material.specular_color = [0.1, 0.1, 0.1];
        material.specular_alpha = 0.5;
        material.ambient = 0.25;
        material.emit = 0.125;
        material.specular_hardness = 20.0;

        let text = render(|out| write_material(out, &material));

        assert!(text.starts_with("<Material> Skin_Material {\n"));
        assert!(text.contains("  <Scalar> diffr { 0.8000 }\n"));
        assert!(text.contains("  <Scalar> diffb { 0.5000 }\n"));
        assert!(text.contains("  <Scalar> speca { 0.5000 }\n"));
        for key in ["ambr", "ambg", "ambb"] {
            assert!(text.contains(&format!("<Scalar> {key} {{ 0.2500 }}")));
        }
        for key in ["emitr", "emitg", "emitb"] {
            assert!(text.contains(&format!("<Scalar> {key} {{ 0.1250 }}")));
        }
        assert!(text.contains("<Scalar> shininess { 20.0000 }"));
        assert_eq!(text.matches('{').count(), text.matches('}').count());
    }

    #[test]
    fn test_declared_materials_all_used() {
        let scene = two_material_scene();
        let mut diagnostics = Diagnostics::new();
        let names: Vec<_> = declared_materials(&scene, true, &mut diagnostics)
            .iter()
            .map(|m| m.name.as_str())
            .collect();
        // "Skin Material" on the shirt sanitizes to the same name as the body's.
        assert_eq!(names, vec!["human:Skin Material", "Eyebrows"]);
        assert_eq!(
            diagnostics.warnings(),
            &[ExportWarning::MaterialNameCollision {
                name: "Skin_Material".to_string(),
                material: "Skin Material".to_string(),
            }]
        );
    }

    #[test]
    fn test_shared_material_is_not_a_collision() {
        let mut scene = Scene::new("");
        for name in ["body", "head"] {
            let mut mesh = Mesh::new(name);
            mesh.add_material(Material::new("Skin"));
            scene.add_mesh(mesh);
        }
        let mut diagnostics = Diagnostics::new();
        assert_eq!(declared_materials(&scene, true, &mut diagnostics).len(), 1);
        assert!(diagnostics.warnings().is_empty());
    }

    #[test]
    fn test_textured_materials_include_dropped_duplicates() {
        let mut scene = Scene::new("");
        for (name, file) in [("human:Skin", "/x/face.png"), ("cloth:Skin", "/x/shirt.png")] {
            let mut mesh = Mesh::new(name);
            mesh.add_material(
                Material::new(name)
                    .with_texture(TextureSlot::new(Texture::image("d", Image::new(file)))),
            );
            mesh.add_vertex(Vertex::new(Vec3::ZERO, Vec3::Z));
            mesh.add_polygon(Polygon::new(vec![0, 0, 0]));
            scene.add_mesh(mesh);
        }

        let mut diagnostics = Diagnostics::new();
        let declared = declared_materials(&scene, true, &mut diagnostics);
        assert_eq!(declared.len(), 1);
        let textured: Vec<_> = textured_materials(&scene, &declared)
            .iter()
            .map(|m| m.name.as_str())
            .collect();
        assert_eq!(textured, vec!["human:Skin", "human:Skin", "cloth:Skin"]);
    }

    #[test]
    fn test_declared_materials_active_only() {
        let mut scene = two_material_scene();
        scene.add_mesh(Mesh::new("bare"));
        let mut diagnostics = Diagnostics::new();
        let names: Vec<_> = declared_materials(&scene, false, &mut diagnostics)
            .iter()
            .map(|m| m.name.as_str())
            .collect();
        assert_eq!(names, vec!["human:Skin Material"]);
        assert_eq!(
            diagnostics.warnings(),
            &[ExportWarning::NoActiveMaterial { mesh: "bare".to_string() }]
        );
    }

    #[test]
    fn test_image_format() {
        let mut diagnostics = Diagnostics::new();
        assert_eq!(image_format(&Image::new("a.png"), &mut diagnostics), "RGB");
        assert_eq!(image_format(&Image::new("a.png").with_alpha(true), &mut diagnostics), "RGBA");
        assert!(diagnostics.warnings().is_empty());

        let linear = Image::new("n.png").with_colorspace("Non-Color").with_alpha(true);
        assert_eq!(image_format(&linear, &mut diagnostics), "A");
        assert!(matches!(
            diagnostics.warnings(),
            [ExportWarning::UnknownColorSpace { .. }]
        ));
    }

    #[test]
    fn test_wrap_mode() {
        let mut diagnostics = Diagnostics::new();
        let mut texture = Texture::image("skin", Image::new("skin.png"));
        assert_eq!(wrap_mode(&texture, 'x', &mut diagnostics), "repeat");

        texture.repeat = [1.0, 2.0];
        assert_eq!(wrap_mode(&texture, 'x', &mut diagnostics), "repeat");
        assert_eq!(wrap_mode(&texture, 'y', &mut diagnostics), UNSPECIFIED_WRAP);

        texture.extension = TextureExtension::Clip;
        assert_eq!(wrap_mode(&texture, 'x', &mut diagnostics), UNSPECIFIED_WRAP);
        assert_eq!(diagnostics.warnings().len(), 2);
    }

    #[test]
    fn test_texture_type() {
        let mut diagnostics = Diagnostics::new();
        let mut slot = TextureSlot::new(Texture::image("skin", Image::new("skin.png")));
        assert_eq!(texture_type(&slot, &mut diagnostics), "2d");

        slot.mapping = Mapping::Cube;
        assert_eq!(texture_type(&slot, &mut diagnostics), "undefined");
        assert_eq!(
            diagnostics.warnings(),
            &[ExportWarning::UnsupportedMapping {
                texture: "skin".to_string(),
                coords: "UV".to_string(),
                mapping: "CUBE".to_string(),
            }]
        );
    }

    #[test]
    fn test_write_textures_dedups_images() {
        let src = tempfile::tempdir().unwrap();
        let out_dir = tempfile::tempdir().unwrap();
        let skin = src.path().join("young skin.png");
        std::fs::write(&skin, b"png").unwrap();

        let slot = TextureSlot::new(Texture::image("diffuse", Image::new(&skin)));
        let body = Material::new("body").with_texture(slot.clone());
        let head = Material::new("head").with_texture(slot);

        let mut relocator = TextureRelocator::new(out_dir.path(), "textures", true);
        let mut diagnostics = Diagnostics::new();
        let text =
            render(|out| write_textures(out, &[&body, &head], &mut relocator, &mut diagnostics));

        assert_eq!(text.matches("<Texture>").count(), 1);
        assert!(text.starts_with("<Texture> young skin_png {\n"));
        let expected_path = Path::new("textures").join("young skin.png");
        assert!(text.contains(&format!("  \"{}\"\n", expected_path.display())));
        assert!(text.contains("  <Scalar> format { RGB }\n"));
        assert!(text.contains("  <Scalar> wrapu { repeat }\n"));
        assert!(text.contains("  <Scalar> wrapv { repeat }\n"));
        assert!(text.contains("  <Scalar> type { 2d }\n"));
        assert_eq!(relocator.copy_count(), 1);
        assert!(diagnostics.warnings().is_empty());
    }

    #[test]
    fn test_write_textures_reports_name_collision() {
        let out_dir = tempfile::tempdir().unwrap();
        let a = Material::new("a")
            .with_texture(TextureSlot::new(Texture::image("a", Image::new("/one/skin.png"))));
        let b = Material::new("b")
            .with_texture(TextureSlot::new(Texture::image("b", Image::new("/two/skin.png"))));

        let mut relocator = TextureRelocator::new(out_dir.path(), "textures", true);
        let mut diagnostics = Diagnostics::new();
        render(|out| write_textures(out, &[&a, &b], &mut relocator, &mut diagnostics));

        assert!(diagnostics
            .warnings()
            .contains(&ExportWarning::TextureNameCollision { name: "skin_png".to_string() }));
    }
}
