//! JSON formats for target meshes, parameters and grown graphs.

use anyhow::{Context, Result};
use glam::Vec3;
use mycelium_core::mesh::triangles_from_indexed;
use mycelium_core::{GrowthGraph, GrowthParams, NodeId, Triangle};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::Path;

/// Indexed target mesh: `{"vertices": [[x, y, z], ...], "faces": [[i, j, k], ...]}`.
#[derive(Debug, Deserialize)]
struct MeshFile {
    vertices: Vec<[f32; 3]>,
    faces: Vec<[usize; 3]>,
}

#[derive(Debug, Serialize)]
pub struct NodeRecord {
    pub id: NodeId,
    pub position: [f32; 3],
    pub parent: Option<NodeId>,
}

#[derive(Debug, Serialize)]
pub struct GraphDocument {
    pub nodes: Vec<NodeRecord>,
    pub edges: Vec<[NodeId; 2]>,
}

#[derive(Debug, Serialize)]
pub struct StrandsDocument {
    pub strands: Vec<Vec<[f32; 3]>>,
}

pub fn parse_mesh(json: &str) -> Result<Vec<Triangle>> {
    let mesh: MeshFile = serde_json::from_str(json).context("malformed mesh JSON")?;
    let vertices: Vec<Vec3> = mesh.vertices.into_iter().map(Vec3::from_array).collect();
    Ok(triangles_from_indexed(&vertices, &mesh.faces)?)
}

pub fn load_mesh(path: &Path) -> Result<Vec<Triangle>> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("failed to read mesh {}", path.display()))?;
    parse_mesh(&json).with_context(|| format!("invalid mesh {}", path.display()))
}

/// Reads parameters; fields missing from the file keep their defaults.
pub fn load_params(path: &Path) -> Result<GrowthParams> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("failed to read parameters {}", path.display()))?;
    serde_json::from_str(&json)
        .with_context(|| format!("invalid parameters {}", path.display()))
}

pub fn graph_document(graph: &GrowthGraph) -> GraphDocument {
    GraphDocument {
        nodes: graph
            .nodes()
            .iter()
            .enumerate()
            .map(|(id, n)| NodeRecord {
                id,
                position: n.pos.to_array(),
                parent: n.parent,
            })
            .collect(),
        edges: graph.edges().map(|(p, c)| [p, c]).collect(),
    }
}

pub fn strands_document(graph: &GrowthGraph) -> StrandsDocument {
    StrandsDocument {
        strands: graph
            .strands()
            .into_iter()
            .map(|s| s.into_iter().map(|id| graph.position(id).to_array()).collect())
            .collect(),
    }
}

/// Writes `value` as JSON to `output`, or to stdout when `None`.
pub fn write_json<T: Serialize>(value: &T, output: Option<&Path>, pretty: bool) -> Result<()> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    match output {
        Some(path) => fs::write(path, json + "\n")
            .with_context(|| format!("failed to write {}", path.display())),
        None => {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{json}").context("failed to write to stdout")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mesh_json_becomes_triangles() {
        let tris = parse_mesh(
            r#"{ "vertices": [[0,0,0],[1,0,0],[0,1,0],[1,1,0]],
                 "faces": [[0,1,2],[1,3,2]] }"#,
        )
        .unwrap();
        assert_eq!(tris.len(), 2);
        assert_eq!(tris[0].normal, Vec3::Z);
    }

    #[test]
    fn mesh_with_bad_index_is_rejected() {
        let err = parse_mesh(r#"{ "vertices": [[0,0,0]], "faces": [[0,1,2]] }"#).unwrap_err();
        assert!(err.to_string().contains("references vertex 1"), "{err}");
    }

    #[test]
    fn graph_document_lists_nodes_and_edges() {
        let mut graph = GrowthGraph::new();
        let root = graph.add_node(Vec3::ZERO);
        let tip = graph.add_child(root, Vec3::Z);
        graph.add_child(tip, Vec3::new(1.0, 0.0, 1.0));

        let doc = graph_document(&graph);
        assert_eq!(doc.nodes.len(), 3);
        assert_eq!(doc.nodes[2].parent, Some(1));
        assert_eq!(doc.edges, vec![[0, 1], [1, 2]]);

        let json = serde_json::to_value(&doc).unwrap();
        assert_eq!(json["nodes"][1]["position"], serde_json::json!([0.0, 0.0, 1.0]));
    }

    #[test]
    fn strands_document_uses_positions() {
        let mut graph = GrowthGraph::new();
        let root = graph.add_node(Vec3::ZERO);
        let tip = graph.add_child(root, Vec3::Z);
        graph.add_child(tip, Vec3::X);
        graph.add_child(tip, Vec3::Y);

        let doc = strands_document(&graph);
        assert_eq!(
            doc.strands,
            vec![
                vec![[0.0, 0.0, 0.0], [0.0, 0.0, 1.0]],
                vec![[0.0, 0.0, 1.0], [1.0, 0.0, 0.0]],
                vec![[0.0, 0.0, 1.0], [0.0, 1.0, 0.0]],
            ]
        );
    }
}
