// SPDX-License-Identifier: MIT OR Apache-2.0
//! Node definitions for the shader graph.

use crate::port::{Port, PortId};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(pub Uuid);

impl NodeId {
    /// Create a new random node ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::new()
    }
}

/// Node type category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeCategory {
    /// Constant inputs (RGB, value)
    Input,
    /// Terminal nodes (material output)
    Output,
    /// Nodes producing a shader closure
    Shader,
    /// Image-backed textures
    Texture,
    /// Procedural textures, evaluated per shading point
    Procedural,
    /// Pass-through converters (gamma, normal map, bump, ...)
    Converter,
    /// Math operations
    Math,
    /// Anything else
    Utility,
}

/// Node type definition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeType {
    /// Unique type identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// Category
    pub category: NodeCategory,
    /// Description
    pub description: String,
    /// Default input sockets
    pub inputs: Vec<Port>,
    /// Default output sockets
    pub outputs: Vec<Port>,
}

/// A node instance in a shader graph
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    /// Unique instance ID
    pub id: NodeId,
    /// Node type ID
    pub node_type: String,
    /// Category copied from the type
    pub category: NodeCategory,
    /// Display name (unique per graph in the host tool)
    pub name: String,
    /// Input sockets
    pub inputs: Vec<Port>,
    /// Output sockets
    pub outputs: Vec<Port>,
}

impl Node {
    /// Create a new node from a type definition
    pub fn new(node_type: &NodeType) -> Self {
        Self {
            id: NodeId::new(),
            node_type: node_type.id.clone(),
            category: node_type.category,
            name: node_type.name.clone(),
            inputs: node_type.inputs.iter().map(Port::instantiate).collect(),
            outputs: node_type.outputs.iter().map(Port::instantiate).collect(),
        }
    }

    /// Get an input socket by name
    pub fn input_named(&self, name: &str) -> Option<&Port> {
        self.inputs.iter().find(|p| p.name == name)
    }

    /// Get a mutable input socket by name
    pub fn input_named_mut(&mut self, name: &str) -> Option<&mut Port> {
        self.inputs.iter_mut().find(|p| p.name == name)
    }

    /// Get an output socket by name
    pub fn output_named(&self, name: &str) -> Option<&Port> {
        self.outputs.iter().find(|p| p.name == name)
    }

    /// Get a socket by ID
    pub fn port(&self, port_id: &PortId) -> Option<&Port> {
        self.inputs.iter().find(|p| p.id == *port_id)
            .or_else(|| self.outputs.iter().find(|p| p.id == *port_id))
    }

    /// First output socket carrying a shader closure
    pub fn first_shader_output(&self) -> Option<&Port> {
        self.outputs.iter().find(|p| p.is_shader_compatible())
    }

    /// Whether this node yields texture data a channel can be mapped onto
    pub fn is_texture_producer(&self) -> bool {
        matches!(self.category, NodeCategory::Texture | NodeCategory::Procedural)
    }

    /// Whether the node's output cannot be exported as-is and has to be
    /// rendered to a bitmap first
    pub fn requires_bake(&self) -> bool {
        self.category == NodeCategory::Procedural
    }

    /// Whether channel lookups should follow through this node to its inputs
    pub fn is_pass_through(&self) -> bool {
        self.category == NodeCategory::Converter
    }
}

/// Registry of available node types
pub struct NodeRegistry {
    /// Registered node types by ID
    types: indexmap::IndexMap<String, NodeType>,
}

impl NodeRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            types: indexmap::IndexMap::new(),
        }
    }

    /// Register a node type
    pub fn register(&mut self, node_type: NodeType) {
        self.types.insert(node_type.id.clone(), node_type);
    }

    /// Get a node type by ID
    pub fn get(&self, id: &str) -> Option<&NodeType> {
        self.types.get(id)
    }

    /// Get types by category
    pub fn types_in_category(&self, category: NodeCategory) -> impl Iterator<Item = &NodeType> {
        self.types.values().filter(move |t| t.category == category)
    }

    /// Create a node from a type ID
    pub fn create_node(&self, type_id: &str) -> Option<Node> {
        self.get(type_id).map(Node::new)
    }
}

impl Default for NodeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::port::PortType;

    fn texture_type(category: NodeCategory) -> NodeType {
        NodeType {
            id: "tex".to_string(),
            name: "Tex".to_string(),
            category,
            description: String::new(),
            inputs: vec![Port::input("Vector", PortType::Vector3)],
            outputs: vec![
                Port::output("Color", PortType::Color),
                Port::output("Fac", PortType::Float),
            ],
        }
    }

    #[test]
    fn test_instances_get_distinct_socket_ids() {
        let ty = texture_type(NodeCategory::Texture);
        let a = Node::new(&ty);
        let b = Node::new(&ty);
        assert_ne!(a.id, b.id);
        assert_ne!(a.outputs[0].id, b.outputs[0].id);
    }

    #[test]
    fn test_predicates_follow_category() {
        let image = Node::new(&texture_type(NodeCategory::Texture));
        assert!(image.is_texture_producer());
        assert!(!image.requires_bake());

        let noise = Node::new(&texture_type(NodeCategory::Procedural));
        assert!(noise.is_texture_producer());
        assert!(noise.requires_bake());

        let gamma = Node::new(&texture_type(NodeCategory::Converter));
        assert!(gamma.is_pass_through());
        assert!(!gamma.is_texture_producer());
    }

    #[test]
    fn test_named_lookup() {
        let node = Node::new(&texture_type(NodeCategory::Texture));
        assert!(node.input_named("Vector").is_some());
        assert!(node.output_named("Fac").is_some());
        assert!(node.output_named("Vector").is_none());
        assert!(node.first_shader_output().is_none());
    }

    #[test]
    fn test_registry_lookup() {
        let mut registry = NodeRegistry::new();
        registry.register(texture_type(NodeCategory::Texture));
        assert!(registry.create_node("tex").is_some());
        assert!(registry.create_node("missing").is_none());
        assert_eq!(registry.types_in_category(NodeCategory::Texture).count(), 1);
    }
}
