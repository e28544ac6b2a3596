// SPDX-License-Identifier: MIT OR Apache-2.0
//! Shader node graph model for the babylon.js exporter.
//!
//! This crate mirrors the parts of the authoring tool's data the exporter
//! reads and touches:
//! - Shader node trees (nodes, typed sockets, links)
//! - The node types and socket schemas of the authoring tool
//! - Materials and the document that owns them
//!
//! ## Architecture
//!
//! The model is a generic graph with:
//! - Named, typed input/output sockets with static defaults
//! - Validated links (one incoming link per input)
//! - Stable declaration order for nodes and links
//! - RON serialization support

pub mod node;
pub mod port;
pub mod graph;
pub mod access;
pub mod shaders;
pub mod document;

pub use node::{Node, NodeCategory, NodeId, NodeRegistry, NodeType};
pub use port::{Port, PortDirection, PortId, PortType, PortValue};
pub use graph::{Connection, ConnectionError, ConnectionId, Graph};
pub use access::GraphRead;
pub use shaders::{legacy_principled_type, principled_type, shader_registry, types};
pub use document::{Document, DocumentError, Material, MaterialId};
