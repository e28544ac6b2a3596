// SPDX-License-Identifier: MIT OR Apache-2.0
//! Logical shading channels and their resolved values.

use crate::texture::TextureKind;
use babylon_exporter_graph::NodeId;
use serde::{Deserialize, Serialize};

/// A logical physically-based shading property
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Channel {
    /// Base color, alpha included
    BaseColor,
    /// Metalness
    Metallic,
    /// Specular level
    Specular,
    /// Roughness
    Roughness,
    /// Clear-coat intensity
    ClearCoat,
    /// Clear-coat roughness
    ClearCoatRoughness,
    /// Sheen intensity
    Sheen,
    /// Sheen tint color
    SheenTint,
    /// Anisotropy intensity
    Anisotropy,
    /// Subsurface translucency intensity
    Subsurface,
    /// Subsurface tint color
    SubsurfaceTint,
    /// Index of refraction
    IndexOfRefraction,
    /// Emissive color
    Emission,
    /// Emissive intensity
    EmissionStrength,
    /// Surface normal
    Normal,
    /// Clear-coat normal
    ClearCoatNormal,
}

/// A constant channel value
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ChannelValue {
    /// Scalar
    Scalar(f32),
    /// RGBA color
    Color([f32; 4]),
}

/// What an export emits for one channel
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ResolvedChannel {
    /// Nothing to emit
    #[default]
    Absent,
    /// Constant scalar
    Scalar(f32),
    /// Constant RGBA color
    Color([f32; 4]),
    /// Texture reference, optionally tinted by a constant
    TextureBaked {
        /// Target texture slot
        kind: TextureKind,
        /// Whether the source has to be rendered to a bitmap first
        bake: bool,
        /// Node producing the texture
        source: NodeId,
        /// Constant captured alongside the texture
        tint: Option<ChannelValue>,
    },
}

impl ResolvedChannel {
    /// Whether nothing was resolved
    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    /// Texture slot, when the channel is texture-backed
    pub fn texture(&self) -> Option<TextureKind> {
        match self {
            Self::TextureBaked { kind, .. } => Some(*kind),
            Self::Absent | Self::Scalar(_) | Self::Color(_) => None,
        }
    }

    /// The constant carried by the channel, standalone or as a tint
    pub fn value(&self) -> Option<ChannelValue> {
        match self {
            Self::Absent => None,
            Self::Scalar(v) => Some(ChannelValue::Scalar(*v)),
            Self::Color(c) => Some(ChannelValue::Color(*c)),
            Self::TextureBaked { tint, .. } => *tint,
        }
    }

    /// Scalar value of a constant channel
    pub fn scalar(&self) -> Option<f32> {
        match self {
            Self::Scalar(v) => Some(*v),
            _ => None,
        }
    }
}

impl From<ChannelValue> for ResolvedChannel {
    fn from(value: ChannelValue) -> Self {
        match value {
            ChannelValue::Scalar(v) => Self::Scalar(v),
            ChannelValue::Color(c) => Self::Color(c),
        }
    }
}
