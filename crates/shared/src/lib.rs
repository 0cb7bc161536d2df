use serde::{Deserialize, Serialize};

/// Unique identifier of a node in the scene
pub type NodeId = String;

/// Local transform of a node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: [f64; 3],
    /// Euler angles XYZ, radians
    pub rotation: [f64; 3],
    pub scale: [f64; 3],
}

impl Transform {
    pub fn new() -> Self {
        Self {
            position: [0.0, 0.0, 0.0],
            rotation: [0.0, 0.0, 0.0],
            scale: [1.0, 1.0, 1.0],
        }
    }

    pub fn at(position: [f64; 3]) -> Self {
        Self {
            position,
            ..Self::new()
        }
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::new()
    }
}

/// Triangle mesh buffers. Positions are mandatory (3 floats per vertex);
/// normals (3 per vertex), uvs (2 per vertex) and the triangle index
/// buffer are optional. A mesh without indices is a non-indexed triangle
/// list, which the editing operations reject.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct MeshDescription {
    pub positions: Vec<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub normals: Option<Vec<f32>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uvs: Option<Vec<f32>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub indices: Option<Vec<u32>>,
}

impl MeshDescription {
    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }
}

/// Display material of a node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialDescription {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// RGB, each component in [0, 1]
    pub color: [f32; 3],
}

impl Default for MaterialDescription {
    fn default() -> Self {
        Self {
            name: None,
            color: [0.8, 0.8, 0.8],
        }
    }
}

/// One node of the scene forest: a transform, an optional mesh with its
/// material, and owned children.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct NodeDescription {
    /// Stable id; assigned on load when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<NodeId>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub transform: Transform,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mesh: Option<MeshDescription>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub material: Option<MaterialDescription>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NodeDescription>,
}

/// Serialized scene: a forest of nodes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct SceneDescription {
    pub nodes: Vec<NodeDescription>,
}

impl SceneDescription {
    /// Total node count, including nested children
    pub fn node_count(&self) -> usize {
        fn count(nodes: &[NodeDescription]) -> usize {
            nodes.iter().map(|n| 1 + count(&n.children)).sum()
        }
        count(&self.nodes)
    }
}
