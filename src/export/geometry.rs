//! Mesh groups: vertex pools and polygons.

use super::{Diagnostics, Indent};
use crate::error::{ExportWarning, Result};
use crate::names;
use crate::scene::{Mesh, Vertex};
use glam::Vec2;
use std::io::Write;

/// Write `<Group> <mesh>_Mesh { <VertexPool> ... <Polygon> ... }` for a mesh.
pub fn write_mesh<W: Write>(
    out: &mut W,
    mesh: &Mesh,
    indent: Indent,
    diagnostics: &mut Diagnostics,
) -> Result<()> {
    let name = names::mesh_name(&mesh.name);
    writeln!(out, "{}<Group> {}_Mesh {{", indent, name)?;
    write_vertex_pool(out, mesh, &name, indent.next(), diagnostics)?;
    write_polygons(out, mesh, &name, indent.next(), diagnostics)?;
    writeln!(out, "{}}}", indent)?;
    Ok(())
}

/// Write the vertex pool. Each vertex keeps only the first UV found among
/// its corners; vertices with several distinct UVs are counted and reported.
pub fn write_vertex_pool<W: Write>(
    out: &mut W,
    mesh: &Mesh,
    name: &str,
    indent: Indent,
    diagnostics: &mut Diagnostics,
) -> Result<()> {
    let first_uvs = mesh.first_uvs();
    let split = mesh.uv_counts().into_iter().filter(|&n| n > 1).count();
    if split > 0 {
        diagnostics.warn(ExportWarning::DiscardedUvs {
            mesh: mesh.name.clone(),
            vertices: split,
        });
    }

    writeln!(out, "{}<VertexPool> {}_Mesh {{", indent, name)?;
    for (index, vertex) in mesh.vertices.iter().enumerate() {
        write_vertex(out, mesh, index, vertex, first_uvs[index], indent.next())?;
    }
    writeln!(out, "{}}}", indent)?;
    Ok(())
}

fn write_vertex<W: Write>(
    out: &mut W,
    mesh: &Mesh,
    index: usize,
    vertex: &Vertex,
    uv: Option<Vec2>,
    indent: Indent,
) -> Result<()> {
    let inner = indent.next();
    let p = vertex.position;
    let n = vertex.normal;

    writeln!(out, "{}<Vertex> {} {{", indent, index)?;
    writeln!(out, "{}{:.4} {:.4} {:.4}", inner, p.x, p.y, p.z)?;
    if let Some(uv) = uv {
        writeln!(out, "{}<UV> {{ {:.4} {:.4} }}", inner, uv.x, uv.y)?;
    }
    writeln!(out, "{}<Normal> {{ {:.4} {:.4} {:.4} }}", inner, n.x, n.y, n.z)?;
    // Informational only; joints carry the real membership.
    for entry in &vertex.groups {
        if entry.weight == 0.0 {
            continue;
        }
        if let Some(group) = mesh.vertex_groups.get(entry.group) {
            writeln!(out, "{}// {}:{:.8}", inner, names::bone_name(group), entry.weight)?;
        }
    }
    writeln!(out, "{}}}", indent)?;
    Ok(())
}

/// Write every polygon with its texture and material references and its
/// vertex loop.
pub fn write_polygons<W: Write>(
    out: &mut W,
    mesh: &Mesh,
    name: &str,
    indent: Indent,
    diagnostics: &mut Diagnostics,
) -> Result<()> {
    let inner = indent.next();
    for (index, polygon) in mesh.polygons.iter().enumerate() {
        writeln!(out, "{}<Polygon> {} {{", indent, index)?;

        match mesh.materials.get(polygon.material_index) {
            Some(material) => {
                for (_, image) in material.image_slots() {
                    let texture = names::texture_name(&image.filepath);
                    writeln!(out, "{}<TRef> {{ {} }}", inner, texture)?;
                }
                writeln!(out, "{}<MRef> {{ {} }}", inner, names::material_name(&material.name))?;
            }
            None => diagnostics.warn(ExportWarning::MissingMaterial {
                mesh: mesh.name.clone(),
                polygon: index,
                index: polygon.material_index,
            }),
        }

        let loop_indices: Vec<String> = polygon.vertices.iter().map(u32::to_string).collect();
        writeln!(out, "{}<VertexRef> {{", inner)?;
        writeln!(out, "{}{}", inner.next(), loop_indices.join(" "))?;
        writeln!(out, "{}<Ref> {{ {}_Mesh }}", inner.next(), name)?;
        writeln!(out, "{}}}", inner)?;
        writeln!(out, "{}}}", indent)?;
    }
    Ok(())
}
