//! Display helpers for node names and ids

use super::Node;

/// First 8 characters of a uuid-style id
pub fn short_id(id: &str) -> &str {
    if id.len() > 8 {
        &id[..8]
    } else {
        id
    }
}

/// Node name for UI/inspection output; falls back to the shortened id
pub fn node_display_name(node: &Node) -> String {
    if node.name.is_empty() {
        format!("Node {}", short_id(&node.id))
    } else {
        node.name.clone()
    }
}
