//! Identifier rules for names written into egg documents.
//!
//! Every function here is pure and idempotent: feeding a sanitized name back
//! in returns it unchanged.

use std::borrow::Cow;
use std::path::Path;

/// Joint name for a bone: `.` and `-` become `_`.
pub fn bone_name(name: &str) -> String {
    name.replace(['.', '-'], "_")
}

/// Mesh name with any `namespace:` prefixes stripped.
pub fn mesh_name(name: &str) -> String {
    strip_namespace(name).to_string()
}

/// Material name: spaces become `_`, then namespaces are stripped.
pub fn material_name(name: &str) -> String {
    strip_namespace(&name.replace(' ', "_")).to_string()
}

/// Texture name derived from the image's file name, with `.` replaced by `_`
/// so the extension stays part of the identifier.
pub fn texture_name(path: &Path) -> String {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy())
        .unwrap_or_else(|| last_component(path));
    file_name.replace('.', "_")
}

/// Base identifier for an output file: the file stem with spaces, `-` and
/// any remaining `.` replaced by `_`.
pub fn file_base_name(path: &Path) -> String {
    let stem = path
        .file_stem()
        .map(|n| n.to_string_lossy())
        .unwrap_or_else(|| last_component(path));
    stem.replace([' ', '-', '.'], "_")
}

/// Final component of a path that has no file name, such as `a/..`.
fn last_component(path: &Path) -> Cow<'_, str> {
    path.components()
        .next_back()
        .map(|c| c.as_os_str().to_string_lossy())
        .unwrap_or_default()
}

/// Last non-empty `:`-separated segment. A name made only of separators maps
/// to `_` so a non-empty input never yields an empty identifier.
fn strip_namespace(name: &str) -> &str {
    if name.is_empty() {
        return name;
    }
    name.rsplit(':').find(|segment| !segment.is_empty()).unwrap_or("_")
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_bone_name() {
        assert_eq!(bone_name("upperarm.L"), "upperarm_L");
        assert_eq!(bone_name("spine-01.002"), "spine_01_002");
        assert_eq!(bone_name("root"), "root");
    }

    #[test]
    fn test_mesh_name_strips_namespaces() {
        assert_eq!(mesh_name("human:body"), "body");
        assert_eq!(mesh_name("a:b:eyes"), "eyes");
        assert_eq!(mesh_name("body"), "body");
        assert_eq!(mesh_name("body:"), "body");
        assert_eq!(mesh_name(":::"), "_");
    }

    #[test]
    fn test_material_name() {
        assert_eq!(material_name("Skin Material"), "Skin_Material");
        assert_eq!(material_name("human:young caucasian"), "young_caucasian");
    }

    #[test]
    fn test_texture_name_keeps_extension() {
        assert_eq!(
            texture_name(Path::new("/tmp/skins/young.lightskinned.png")),
            "young_lightskinned_png"
        );
        assert_eq!(texture_name(Path::new("eye.png")), "eye_png");
    }

    #[test]
    fn test_texture_name_without_file_name() {
        let name = texture_name(Path::new("skins/faces/.."));
        assert_eq!(name, "__");
        assert!(!name.contains('/'));
    }

    #[test]
    fn test_file_base_name() {
        assert_eq!(file_base_name(Path::new("/out/my human-01.egg")), "my_human_01");
        assert_eq!(file_base_name(Path::new("model.egg")), "model");
        assert_eq!(file_base_name(Path::new("/out/a.b.egg")), "a_b");
        assert_eq!(file_base_name(Path::new("a_b")), "a_b");
    }

    proptest! {
        #[test]
        fn bone_name_is_idempotent(name in ".*") {
            let once = bone_name(&name);
            prop_assert!(!once.contains('.') && !once.contains('-'));
            prop_assert_eq!(bone_name(&once), once);
        }

        #[test]
        fn mesh_name_is_idempotent(name in ".+") {
            let once = mesh_name(&name);
            prop_assert!(!once.is_empty());
            prop_assert!(!once.contains(':'));
            prop_assert_eq!(mesh_name(&once), once);
        }

        #[test]
        fn material_name_is_idempotent(name in ".+") {
            let once = material_name(&name);
            prop_assert!(!once.is_empty());
            prop_assert!(!once.contains(':') && !once.contains(' '));
            prop_assert_eq!(material_name(&once), once);
        }

        #[test]
        fn texture_name_is_idempotent(name in "[a-zA-Z0-9_. -]{1,24}") {
            let once = texture_name(Path::new(&name));
            prop_assert!(!once.contains('.'));
            prop_assert_eq!(texture_name(Path::new(&once)), once);
        }

        #[test]
        fn file_base_name_is_idempotent(name in "[a-zA-Z0-9_. -]{1,24}") {
            let once = file_base_name(Path::new(&name));
            prop_assert!(!once.contains('.') && !once.contains('-') && !once.contains(' '));
            prop_assert_eq!(file_base_name(Path::new(&once)), once);
        }
    }
}
