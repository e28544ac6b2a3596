// SPDX-License-Identifier: MIT OR Apache-2.0
//! One material export run.
//!
//! Output links are severed for the duration of the run and restored when
//! the run's scope ends, whichever way it ends: normal completion, early
//! return, or panic.

use crate::guard::{ConnectionGuard, ReconnectSummary, SURFACE_SOCKET};
use crate::record::MaterialRecord;
use crate::resolver;
use crate::settings::ExportSettings;
use babylon_exporter_graph::{types, Document, Graph, Material, MaterialId, NodeId};
use serde::Serialize;

/// Link counts of one run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExportSummary {
    /// Links severed at the start
    pub disconnected: usize,
    /// Restore pass counts
    pub reconnected: ReconnectSummary,
}

/// Scope during which material outputs are severed.
///
/// Dropping the scope restores the links; [`ExportScope::finish`] does the
/// same and reports the counts.
pub struct ExportScope<'d> {
    document: &'d mut Document,
    guard: ConnectionGuard,
    disconnected: usize,
    finished: bool,
}

impl<'d> ExportScope<'d> {
    /// Sever every material's output link
    pub fn begin(document: &'d mut Document) -> Self {
        let mut guard = ConnectionGuard::new();
        let disconnected = guard.disconnect(document);
        Self {
            document,
            guard,
            disconnected,
            finished: false,
        }
    }

    /// Read access to the document while links are severed
    pub fn document(&self) -> &Document {
        self.document
    }

    /// Guard holding the severed links
    pub fn guard(&self) -> &ConnectionGuard {
        &self.guard
    }

    /// Number of links severed by [`ExportScope::begin`]
    pub fn disconnected(&self) -> usize {
        self.disconnected
    }

    /// Restore the links and report the counts
    pub fn finish(mut self) -> ExportSummary {
        self.restore()
    }

    fn restore(&mut self) -> ExportSummary {
        if !self.finished {
            self.finished = true;
            self.guard.reconnect(self.document);
            if self.guard.pending() > 0 {
                tracing::warn!(
                    "{} material output(s) could not be restored",
                    self.guard.pending()
                );
            }
        }
        ExportSummary {
            disconnected: self.disconnected,
            reconnected: self.guard.last_reconnect(),
        }
    }
}

impl Drop for ExportScope<'_> {
    fn drop(&mut self) {
        if !self.finished {
            tracing::warn!("Export ended early, restoring material outputs");
            self.restore();
        }
    }
}

/// Run `export` with every material output severed, then restore them
pub fn with_severed_outputs<T>(
    document: &mut Document,
    export: impl FnOnce(&Document, &ConnectionGuard) -> T,
) -> (T, ExportSummary) {
    let scope = ExportScope::begin(document);
    let value = export(scope.document(), scope.guard());
    (value, scope.finish())
}

/// Resolved record of one material
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportedMaterial {
    /// Material ID
    pub material: MaterialId,
    /// Material name
    pub name: String,
    /// Principled node the record was resolved from
    pub shading_node: NodeId,
    /// Resolved channels
    pub record: MaterialRecord,
}

/// Result of [`export_materials`]
#[derive(Debug, Clone, Default)]
pub struct MaterialExport {
    /// Records in document order
    pub materials: Vec<ExportedMaterial>,
    /// Link counts
    pub summary: ExportSummary,
}

/// Resolve every node-based material of the document
pub fn export_materials(document: &mut Document, settings: &ExportSettings) -> MaterialExport {
    let overload = settings.overload_channels;

    if !settings.sever_output_connections {
        return MaterialExport {
            materials: resolve_all(document, None, overload),
            summary: ExportSummary::default(),
        };
    }

    let (materials, summary) = with_severed_outputs(document, |document, guard| {
        resolve_all(document, Some(guard), overload)
    });
    MaterialExport { materials, summary }
}

fn resolve_all(
    document: &Document,
    guard: Option<&ConnectionGuard>,
    overload_channels: bool,
) -> Vec<ExportedMaterial> {
    document
        .materials()
        .filter(|m| m.use_nodes)
        .filter_map(|material| {
            let hint = match guard {
                Some(guard) => guard.record(material.id).map(|r| r.source_node),
                None => surface_source(&material.node_tree),
            };
            let Some(node) = shading_node(material, hint) else {
                tracing::debug!("Material '{}' has no principled node, skipped", material.name);
                return None;
            };
            Some(ExportedMaterial {
                material: material.id,
                name: material.name.clone(),
                shading_node: node,
                record: resolver::resolve(&material.node_tree, node, overload_channels),
            })
        })
        .collect()
}

/// Principled node to export: the one that fed the output, else the first
/// one in the tree
fn shading_node(material: &Material, hint: Option<NodeId>) -> Option<NodeId> {
    let graph = &material.node_tree;
    let is_principled = |id: &NodeId| {
        graph
            .node(*id)
            .is_some_and(|n| n.node_type == types::PRINCIPLED_BSDF)
    };

    hint.filter(is_principled).or_else(|| {
        graph
            .nodes()
            .find(|n| n.node_type == types::PRINCIPLED_BSDF)
            .map(|n| n.id)
    })
}

fn surface_source(graph: &Graph) -> Option<NodeId> {
    let output = graph.output_node()?;
    let surface = output.input_named(SURFACE_SOCKET)?;
    graph.incoming(output.id, surface.id).map(|c| c.from_node)
}
