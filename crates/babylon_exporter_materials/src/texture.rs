// SPDX-License-Identifier: MIT OR Apache-2.0
//! Texture slots a resolved channel can be baked into.

use serde::{Deserialize, Serialize};

/// Texture slot of the target material.
///
/// Several channels can share a slot (clear-coat intensity and roughness both
/// land in [`TextureKind::ClearCoat`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TextureKind {
    /// Base color
    #[serde(rename = "DIFFUSE_TEX")]
    Diffuse,
    /// Metalness
    #[serde(rename = "METAL_TEX")]
    Metal,
    /// Specular level
    #[serde(rename = "SPECULAR_TEX")]
    Specular,
    /// Roughness
    #[serde(rename = "ROUGHNESS_TEX")]
    Roughness,
    /// Clear-coat intensity/roughness
    #[serde(rename = "CLEARCOAT_TEX")]
    ClearCoat,
    /// Sheen intensity/tint
    #[serde(rename = "SHEEN_TEX")]
    Sheen,
    /// Index of refraction
    #[serde(rename = "REFRACTION_TEX")]
    Refraction,
    /// Emissive color
    #[serde(rename = "EMISSIVE_TEX")]
    Emissive,
    /// Normal map
    #[serde(rename = "BUMP_TEX")]
    Bump,
    /// Clear-coat normal map
    #[serde(rename = "CLEARCOAT_BUMP_TEX")]
    ClearCoatBump,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slots_serialize_as_bake_tags() {
        assert_eq!(ron::to_string(&TextureKind::Diffuse).unwrap(), "DIFFUSE_TEX");
        assert_eq!(
            ron::to_string(&TextureKind::ClearCoatBump).unwrap(),
            "CLEARCOAT_BUMP_TEX"
        );
        let kind: TextureKind = ron::from_str("SHEEN_TEX").unwrap();
        assert_eq!(kind, TextureKind::Sheen);
    }
}
