//! Joint hierarchy with per-joint vertex membership.

use super::{Diagnostics, Indent, SkinWeightIndex};
use crate::error::{ExportWarning, Result};
use crate::names;
use crate::scene::SceneSource;
use std::io::Write;

/// Write the joint tree rooted at the scene's first root bone.
///
/// Nothing is written for a scene without bones.
pub fn write_armature<W: Write, S: SceneSource + ?Sized>(
    out: &mut W,
    scene: &S,
    index: &SkinWeightIndex,
    indent: Indent,
    diagnostics: &mut Diagnostics,
) -> Result<()> {
    let Some(root) = scene.root_bone() else {
        return Ok(());
    };
    let mut visited = vec![false; scene.bones().len()];
    write_joint(out, scene, root, index, indent, &mut visited, diagnostics)
}

fn write_joint<W: Write, S: SceneSource + ?Sized>(
    out: &mut W,
    scene: &S,
    bone_index: usize,
    index: &SkinWeightIndex,
    indent: Indent,
    visited: &mut [bool],
    diagnostics: &mut Diagnostics,
) -> Result<()> {
    let bone = &scene.bones()[bone_index];
    visited[bone_index] = true;

    let inner = indent.next();
    let head = scene.relative_head(bone_index);
    writeln!(out, "{}<Joint> {} {{", indent, names::bone_name(&bone.name))?;
    writeln!(out, "{}<Transform> {{", inner)?;
    writeln!(
        out,
        "{}<Translate> {{ {:.5} {:.5} {:.5} }}",
        inner.next(),
        head.x,
        head.y,
        head.z
    )?;
    writeln!(out, "{}}}", inner)?;

    for &child in &bone.children {
        match visited.get(child).copied() {
            Some(false) => write_joint(out, scene, child, index, inner, visited, diagnostics)?,
            Some(true) => {
                diagnostics.warn(ExportWarning::BoneCycle {
                    bone: scene.bones()[child].name.clone(),
                });
            }
            None => tracing::debug!("bone {} lists missing child {}", bone.name, child),
        }
    }

    if let Some(meshes) = index.bone(&bone.name) {
        for (mesh, buckets) in meshes {
            let mesh = names::mesh_name(mesh);
            for (weight, vertices) in buckets {
                let vertices: Vec<String> = vertices.iter().map(u32::to_string).collect();
                writeln!(out, "{}<VertexRef> {{", inner)?;
                writeln!(out, "{}{}", inner.next(), vertices.join(" "))?;
                writeln!(out, "{}<Scalar> membership {{ {} }}", inner.next(), weight)?;
                writeln!(out, "{}<Ref> {{ {}_Mesh }}", inner.next(), mesh)?;
                writeln!(out, "{}}}", inner)?;
            }
        }
    }

    writeln!(out, "{}}}", indent)?;
    Ok(())
}
