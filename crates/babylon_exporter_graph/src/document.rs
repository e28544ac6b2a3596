// SPDX-License-Identifier: MIT OR Apache-2.0
//! Materials and the document that owns them.

use crate::graph::Graph;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use uuid::Uuid;

/// Current document format version
pub const DOCUMENT_FORMAT_VERSION: u32 = 1;

/// Unique identifier for a material
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MaterialId(pub Uuid);

impl MaterialId {
    /// Create a new random material ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for MaterialId {
    fn default() -> Self {
        Self::new()
    }
}

/// A material authored in the host tool
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Material {
    /// Unique material ID
    pub id: MaterialId,
    /// Display name
    pub name: String,
    /// Whether shading is defined by the node tree
    pub use_nodes: bool,
    /// Shader node tree
    pub node_tree: Graph,
}

impl Material {
    /// Create a node-based material with an empty tree
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            id: MaterialId::new(),
            node_tree: Graph::new(name.clone()),
            name,
            use_nodes: true,
        }
    }

    /// Create a material whose node tree is ignored by the host
    pub fn without_nodes(name: impl Into<String>) -> Self {
        Self {
            use_nodes: false,
            ..Self::new(name)
        }
    }
}

/// Document errors
#[derive(Debug, Error)]
pub enum DocumentError {
    /// File could not be read or written
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// RON text could not be parsed
    #[error("Parse error: {0}")]
    Parse(#[from] ron::error::SpannedError),

    /// Document could not be serialized
    #[error("Serialization error: {0}")]
    Serialize(#[from] ron::Error),

    /// Document written by a newer exporter
    #[error("Document version {found} is newer than supported version {supported}")]
    UnsupportedVersion {
        /// Version found in the file
        found: u32,
        /// Newest supported version
        supported: u32,
    },
}

/// Result type for document operations
pub type Result<T> = std::result::Result<T, DocumentError>;

/// An authoring document: the set of materials an export run walks
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Format version
    pub version: u32,
    /// Materials in declaration order
    materials: IndexMap<MaterialId, Material>,
}

impl Document {
    /// Create an empty document
    pub fn new() -> Self {
        Self {
            version: DOCUMENT_FORMAT_VERSION,
            materials: IndexMap::new(),
        }
    }

    /// Add a material
    pub fn add_material(&mut self, material: Material) -> MaterialId {
        let id = material.id;
        self.materials.insert(id, material);
        id
    }

    /// Get a material by ID
    pub fn material(&self, id: MaterialId) -> Option<&Material> {
        self.materials.get(&id)
    }

    /// Get a mutable material by ID
    pub fn material_mut(&mut self, id: MaterialId) -> Option<&mut Material> {
        self.materials.get_mut(&id)
    }

    /// All materials in declaration order
    pub fn materials(&self) -> impl Iterator<Item = &Material> {
        self.materials.values()
    }

    /// All materials, mutably
    pub fn materials_mut(&mut self) -> impl Iterator<Item = &mut Material> {
        self.materials.values_mut()
    }

    /// Number of materials
    pub fn material_count(&self) -> usize {
        self.materials.len()
    }

    /// Serialize to RON
    pub fn to_ron(&self) -> Result<String> {
        let config = ron::ser::PrettyConfig::default()
            .struct_names(true)
            .enumerate_arrays(false);
        Ok(ron::ser::to_string_pretty(self, config)?)
    }

    /// Deserialize from RON
    pub fn from_ron(s: &str) -> Result<Self> {
        let document: Document = ron::from_str(s)?;
        if document.version > DOCUMENT_FORMAT_VERSION {
            return Err(DocumentError::UnsupportedVersion {
                found: document.version,
                supported: DOCUMENT_FORMAT_VERSION,
            });
        }
        Ok(document)
    }

    /// Load a document from a RON file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let document = Self::from_ron(&content)?;
        tracing::debug!("Loaded {} material(s) from {:?}", document.material_count(), path);
        Ok(document)
    }

    /// Save the document to a RON file
    pub fn save(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.to_ron()?)?;
        Ok(())
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shaders::{shader_registry, types};

    #[test]
    fn test_document_serialization() {
        let registry = shader_registry();
        let mut material = Material::new("Brick");
        let bsdf = material.node_tree.add_node(registry.create_node(types::PRINCIPLED_BSDF).unwrap());
        let output = material.node_tree.add_node(registry.create_node(types::OUTPUT_MATERIAL).unwrap());
        material.node_tree.connect_named(bsdf, "BSDF", output, "Surface").unwrap();

        let mut document = Document::new();
        let id = document.add_material(material);
        document.add_material(Material::without_nodes("Flat"));

        let ron = document.to_ron().unwrap();
        let loaded = Document::from_ron(&ron).unwrap();
        assert_eq!(loaded.material_count(), 2);

        let brick = loaded.material(id).unwrap();
        assert!(brick.use_nodes);
        assert_eq!(brick.node_tree.connection_count(), 1);
        let names: Vec<&str> = loaded.materials().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["Brick", "Flat"]);
    }

    #[test]
    fn test_newer_version_rejected() {
        let mut document = Document::new();
        document.version = DOCUMENT_FORMAT_VERSION + 1;
        let ron = document.to_ron().unwrap();
        assert!(matches!(
            Document::from_ron(&ron),
            Err(DocumentError::UnsupportedVersion { .. })
        ));
    }
}
