// SPDX-License-Identifier: MIT OR Apache-2.0
//! Read-only access to a shader graph.

use crate::graph::{Connection, Graph};
use crate::node::{Node, NodeId};
use crate::port::{Port, PortValue};

/// Read interface over a shader graph.
///
/// Consumers that only inspect sockets and links (channel resolution) take
/// this instead of a concrete [`Graph`].
pub trait GraphRead {
    /// Get a node by ID
    fn node(&self, node_id: NodeId) -> Option<&Node>;

    /// The link feeding an input socket of a node, if any
    fn incoming(&self, node_id: NodeId, port: &Port) -> Option<&Connection>;

    /// Source node feeding an input socket, if any
    fn upstream(&self, node_id: NodeId, port: &Port) -> Option<&Node> {
        let connection = self.incoming(node_id, port)?;
        self.node(connection.from_node)
    }

    /// Static default of a named input socket
    fn default_of(&self, node_id: NodeId, socket: &str) -> Option<&PortValue> {
        self.node(node_id)?.input_named(socket)?.default_value.as_ref()
    }
}

impl GraphRead for Graph {
    fn node(&self, node_id: NodeId) -> Option<&Node> {
        Graph::node(self, node_id)
    }

    fn incoming(&self, node_id: NodeId, port: &Port) -> Option<&Connection> {
        Graph::incoming(self, node_id, port.id)
    }
}
