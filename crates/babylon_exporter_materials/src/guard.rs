// SPDX-License-Identifier: MIT OR Apache-2.0
//! Severs and restores the material output connection around an export.
//!
//! Before materials are exported, the link feeding each output node's
//! `Surface` input is removed so nothing downstream of the shader gets
//! baked. The removed links are remembered per material and put back
//! afterwards. When the remembered source is gone, a shader is picked by a
//! fixed scan over the node tree instead.

use babylon_exporter_graph::{
    types, ConnectionError, Document, Graph, Material, MaterialId, NodeId, PortId,
};
use indexmap::IndexMap;
use thiserror::Error;

/// Input of the output node carrying the surface shader
pub const SURFACE_SOCKET: &str = "Surface";

/// Node types considered shaders by the fallback scan, in no particular
/// priority (the scan follows graph order)
pub const SHADER_NODE_TYPES: [&str; 12] = [
    types::PRINCIPLED_BSDF,
    types::DIFFUSE_BSDF,
    types::GLOSSY_BSDF,
    types::TRANSPARENT_BSDF,
    types::REFRACTION_BSDF,
    types::ANISOTROPIC_BSDF,
    types::VELVET_BSDF,
    types::TOON_BSDF,
    types::SUBSURFACE_SCATTERING,
    types::MIX_SHADER,
    types::ADD_SHADER,
    types::EMISSION,
];

/// Link removed from a material's output node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionRecord {
    /// Material owning the link
    pub material: MaterialId,
    /// Node that fed the surface input
    pub source_node: NodeId,
    /// Output socket of that node
    pub source_socket: String,
}

/// Per-material failure while restoring a link
#[derive(Debug, Error)]
pub enum GuardError {
    /// Graph refused to create the link
    #[error("Could not relink material output: {0}")]
    Connect(#[from] ConnectionError),
}

/// Counts of the last restore pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReconnectSummary {
    /// Materials for which a stored link was looked up
    pub primary_attempts: usize,
    /// Stored links recreated
    pub primary: usize,
    /// Links created by the fallback scan
    pub fallback: usize,
    /// Links the graph refused
    pub failed: usize,
}

impl ReconnectSummary {
    /// Total links restored
    pub fn restored(&self) -> usize {
        self.primary + self.fallback
    }
}

/// How a material's surface link was restored
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Restore {
    Primary,
    Fallback,
    Nothing,
}

/// Owner of the links removed during one export run
#[derive(Debug, Default)]
pub struct ConnectionGuard {
    stored: IndexMap<MaterialId, ConnectionRecord>,
    last_reconnect: ReconnectSummary,
}

impl ConnectionGuard {
    /// Create a guard with no stored links
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove every material's surface link, remembering each one.
    ///
    /// Records left over from an earlier run are dropped first. Returns the
    /// number of links removed.
    pub fn disconnect(&mut self, document: &mut Document) -> usize {
        self.stored.clear();
        let mut count = 0;

        for material in document.materials_mut() {
            if self.disconnect_material(material) {
                count += 1;
            }
        }

        tracing::info!("Disconnected {} shader(s) from Material Output", count);
        count
    }

    /// Put back the surface link of every material.
    ///
    /// Stored links are restored first; materials without one (or whose
    /// source node or socket is gone) fall back to the first shader found in
    /// the tree. Returns the number of links created.
    pub fn reconnect(&mut self, document: &mut Document) -> usize {
        let mut summary = ReconnectSummary::default();

        for material in document.materials_mut() {
            match self.reconnect_material(material, &mut summary) {
                Ok(Restore::Primary) => summary.primary += 1,
                Ok(Restore::Fallback) => summary.fallback += 1,
                Ok(Restore::Nothing) => {}
                Err(e) => {
                    summary.failed += 1;
                    tracing::warn!("Material '{}': {}", material.name, e);
                }
            }
        }

        self.last_reconnect = summary;
        tracing::info!(
            "Reconnected {} shader(s) to Material Output ({} stored, {} by scan)",
            summary.restored(),
            summary.primary,
            summary.fallback
        );
        summary.restored()
    }

    /// Stored link of a material, if its removal has not been undone yet
    pub fn record(&self, material: MaterialId) -> Option<&ConnectionRecord> {
        self.stored.get(&material)
    }

    /// Number of links still awaiting restore
    pub fn pending(&self) -> usize {
        self.stored.len()
    }

    /// Counts of the last [`ConnectionGuard::reconnect`]
    pub fn last_reconnect(&self) -> ReconnectSummary {
        self.last_reconnect
    }

    fn disconnect_material(&mut self, material: &mut Material) -> bool {
        if !material.use_nodes {
            return false;
        }

        // Find the link feeding the surface input
        let graph = &mut material.node_tree;
        let Some(output) = graph.output_node() else {
            tracing::debug!("Material '{}' has no output node", material.name);
            return false;
        };
        let Some(surface) = output.input_named(SURFACE_SOCKET) else {
            return false;
        };
        let Some(link) = graph.incoming(output.id, surface.id) else {
            return false;
        };

        // Remember the source by node and socket name
        let link_id = link.id;
        let source_node = link.from_node;
        let source_socket = graph
            .node(source_node)
            .and_then(|n| n.port(&link.from_port))
            .map(|p| p.name.clone())
            .unwrap_or_default();

        graph.disconnect(link_id);
        self.stored.insert(
            material.id,
            ConnectionRecord {
                material: material.id,
                source_node,
                source_socket,
            },
        );
        true
    }

    fn reconnect_material(
        &mut self,
        material: &mut Material,
        summary: &mut ReconnectSummary,
    ) -> Result<Restore, GuardError> {
        if !material.use_nodes {
            return Ok(Restore::Nothing);
        }
        let graph = &mut material.node_tree;
        let Some((output, surface)) = surface_input(graph) else {
            return Ok(Restore::Nothing);
        };

        // Stored link first
        if let Some(record) = self.stored.get(&material.id).cloned() {
            summary.primary_attempts += 1;
            let source = graph
                .node(record.source_node)
                .and_then(|n| n.output_named(&record.source_socket))
                .map(|p| p.id);
            if let Some(from_port) = source {
                // Relinked by someone else in the meantime
                if graph.incoming(output, surface).is_some() {
                    self.stored.shift_remove(&material.id);
                    return Ok(Restore::Nothing);
                }
                graph.connect(record.source_node, from_port, output, surface)?;
                self.stored.shift_remove(&material.id);
                return Ok(Restore::Primary);
            }
            tracing::debug!(
                "Stored source of material '{}' is gone, scanning for a shader",
                material.name
            );
        }

        // Already in its target state
        if graph.incoming(output, surface).is_some() {
            return Ok(Restore::Nothing);
        }

        // Scan for a shader
        let Some((node, port)) = fallback_shader(graph) else {
            tracing::debug!("Material '{}' has no shader to reconnect", material.name);
            return Ok(Restore::Nothing);
        };
        graph.connect(node, port, output, surface)?;
        self.stored.shift_remove(&material.id);
        Ok(Restore::Fallback)
    }
}

/// Output node and its surface input
fn surface_input(graph: &Graph) -> Option<(NodeId, PortId)> {
    let output = graph.output_node()?;
    let surface = output.input_named(SURFACE_SOCKET)?;
    Some((output.id, surface.id))
}

/// First shader output to link when no stored link applies.
///
/// Nodes of a known shader type are preferred; otherwise any node exposing a
/// closure output qualifies. Both scans follow graph declaration order.
fn fallback_shader(graph: &Graph) -> Option<(NodeId, PortId)> {
    let by_type = graph
        .nodes()
        .find(|n| SHADER_NODE_TYPES.contains(&n.node_type.as_str()));
    let node = by_type.or_else(|| graph.nodes().find(|n| n.first_shader_output().is_some()))?;
    let port = node.first_shader_output()?;
    Some((node.id, port.id))
}
