// SPDX-License-Identifier: MIT OR Apache-2.0
//! Graph data structure containing nodes and the links between them.

use crate::node::{Node, NodeId};
use crate::port::{PortDirection, PortId};
use crate::shaders::types;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a link
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConnectionId(pub Uuid);

/// A directed link from an output socket to an input socket
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Connection {
    /// Unique link ID
    pub id: ConnectionId,
    /// Source node ID
    pub from_node: NodeId,
    /// Source socket ID
    pub from_port: PortId,
    /// Target node ID
    pub to_node: NodeId,
    /// Target socket ID
    pub to_port: PortId,
}

impl Connection {
    /// Whether the link starts or ends at `node_id`
    pub fn involves_node(&self, node_id: NodeId) -> bool {
        self.from_node == node_id || self.to_node == node_id
    }

    /// Whether the link feeds input socket `port_id` of `node_id`
    pub fn targets(&self, node_id: NodeId, port_id: PortId) -> bool {
        self.to_node == node_id && self.to_port == port_id
    }
}

/// A shader node graph.
///
/// Nodes and links keep their insertion order, and removals preserve the
/// order of what remains, so scans over the graph are reproducible.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Graph {
    /// Graph name
    pub name: String,
    /// Nodes in declaration order
    nodes: IndexMap<NodeId, Node>,
    /// Links between sockets
    connections: IndexMap<ConnectionId, Connection>,
}

impl Graph {
    /// Create a new empty graph
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            nodes: IndexMap::new(),
            connections: IndexMap::new(),
        }
    }

    /// Add a node to the graph
    pub fn add_node(&mut self, node: Node) -> NodeId {
        let id = node.id;
        self.nodes.insert(id, node);
        id
    }

    /// Remove a node and its links
    pub fn remove_node(&mut self, node_id: NodeId) -> Option<Node> {
        self.connections.retain(|_, c| !c.involves_node(node_id));
        self.nodes.shift_remove(&node_id)
    }

    /// Get a node by ID
    pub fn node(&self, node_id: NodeId) -> Option<&Node> {
        self.nodes.get(&node_id)
    }

    /// Get a mutable node by ID
    pub fn node_mut(&mut self, node_id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(&node_id)
    }

    /// Get all nodes in declaration order
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    /// First material output node in declaration order
    pub fn output_node(&self) -> Option<&Node> {
        self.nodes().find(|n| n.node_type == types::OUTPUT_MATERIAL)
    }

    /// Link an output socket to an input socket
    pub fn connect(
        &mut self,
        from_node: NodeId,
        from_port: PortId,
        to_node: NodeId,
        to_port: PortId,
    ) -> Result<ConnectionId, ConnectionError> {
        // Validate nodes exist
        let source_node = self.nodes.get(&from_node)
            .ok_or(ConnectionError::NodeNotFound(from_node))?;
        let target_node = self.nodes.get(&to_node)
            .ok_or(ConnectionError::NodeNotFound(to_node))?;

        // Validate sockets exist
        let source_port = source_node.port(&from_port)
            .ok_or(ConnectionError::PortNotFound(from_port))?;
        let target_port = target_node.port(&to_port)
            .ok_or(ConnectionError::PortNotFound(to_port))?;

        // Output into input, closures only into closures
        if source_port.direction != PortDirection::Output
            || !source_port.can_connect(target_port)
        {
            return Err(ConnectionError::IncompatiblePorts);
        }

        // Inputs take a single link
        if !target_port.multi_connect
            && self.connections.values().any(|c| c.targets(to_node, to_port))
        {
            return Err(ConnectionError::PortAlreadyConnected(to_port));
        }

        // Prevent self-loops
        if from_node == to_node {
            return Err(ConnectionError::SelfLoop);
        }

        let id = ConnectionId(Uuid::new_v4());
        self.connections.insert(
            id,
            Connection {
                id,
                from_node,
                from_port,
                to_node,
                to_port,
            },
        );
        Ok(id)
    }

    /// Link two sockets by name
    pub fn connect_named(
        &mut self,
        from_node: NodeId,
        from_socket: &str,
        to_node: NodeId,
        to_socket: &str,
    ) -> Result<ConnectionId, ConnectionError> {
        let from_port = self.nodes.get(&from_node)
            .ok_or(ConnectionError::NodeNotFound(from_node))?
            .output_named(from_socket)
            .ok_or_else(|| ConnectionError::SocketNotFound(from_socket.to_string()))?
            .id;
        let to_port = self.nodes.get(&to_node)
            .ok_or(ConnectionError::NodeNotFound(to_node))?
            .input_named(to_socket)
            .ok_or_else(|| ConnectionError::SocketNotFound(to_socket.to_string()))?
            .id;
        self.connect(from_node, from_port, to_node, to_port)
    }

    /// Remove a link
    pub fn disconnect(&mut self, connection_id: ConnectionId) -> Option<Connection> {
        self.connections.shift_remove(&connection_id)
    }

    /// The link feeding an input socket, if any
    pub fn incoming(&self, node_id: NodeId, port_id: PortId) -> Option<&Connection> {
        self.connections.values().find(|c| c.targets(node_id, port_id))
    }

    /// Get the number of links
    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }
}

impl Default for Graph {
    fn default() -> Self {
        Self::new("Untitled")
    }
}

/// Error when creating a link
#[derive(Debug, thiserror::Error)]
pub enum ConnectionError {
    /// Node not found
    #[error("Node not found: {0:?}")]
    NodeNotFound(NodeId),

    /// Socket not found
    #[error("Socket not found: {0:?}")]
    PortNotFound(PortId),

    /// Socket name not found
    #[error("Socket not found: {0}")]
    SocketNotFound(String),

    /// Incompatible socket kinds or directions
    #[error("Incompatible sockets")]
    IncompatiblePorts,

    /// Input socket is already linked
    #[error("Socket already connected: {0:?}")]
    PortAlreadyConnected(PortId),

    /// Self-loop not allowed
    #[error("Self-loop not allowed")]
    SelfLoop,
}
