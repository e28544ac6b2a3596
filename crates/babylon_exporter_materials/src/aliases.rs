// SPDX-License-Identifier: MIT OR Apache-2.0
//! Socket alias chains and intensity thresholds.
//!
//! The authoring tool renamed most principled BSDF sockets between schema
//! generations. Each channel lists its candidate socket names newest first;
//! the first name present on a node wins, and the other generation is never
//! consulted for that channel.

use crate::channel::Channel;
use crate::texture::TextureKind;
use babylon_exporter_graph::{Node, Port};

/// Conditional channels are emitted only above this intensity
pub const MIN_INTENSITY: f32 = 0.0;

/// Emission strength when the node has no strength socket
pub const DEFAULT_EMISSION_STRENGTH: f32 = 1.0;

/// First key, in priority order, for which `lookup` yields a value
pub fn first_match<'k, T>(
    keys: &[&'k str],
    lookup: impl FnMut(&'k str) -> Option<T>,
) -> Option<T> {
    keys.iter().copied().find_map(lookup)
}

/// Whether a conditional channel intensity is worth emitting
pub fn exceeds_threshold(intensity: f32) -> bool {
    intensity > MIN_INTENSITY
}

/// Candidate socket names for one channel, highest priority first
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AliasChain(pub &'static [&'static str]);

impl AliasChain {
    /// The active socket: first alias present on the node
    pub fn active_socket<'n>(&self, node: &'n Node) -> Option<&'n Port> {
        first_match(self.0, |name| node.input_named(name))
    }

    /// Candidate names
    pub fn names(&self) -> &'static [&'static str] {
        self.0
    }
}

/// How a channel's constant is read from its socket
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueShape {
    /// Single scalar
    Scalar,
    /// RGBA color (scalars widen to gray)
    Color,
    /// The channel only ever carries a texture
    TextureOnly,
}

/// Resolution policy for one channel
#[derive(Debug, Clone, Copy)]
pub struct ChannelSpec {
    /// Channel being resolved
    pub channel: Channel,
    /// Chain used to find the socket checked for a texture
    pub detect: AliasChain,
    /// Chain used to read the constant
    pub value: AliasChain,
    /// Constant shape
    pub shape: ValueShape,
    /// Texture slot, for channels that accept textures
    pub texture: Option<TextureKind>,
}

/// Resolution policy for base color
pub const BASE_COLOR: ChannelSpec = ChannelSpec {
    channel: Channel::BaseColor,
    detect: AliasChain(&["Base Color"]),
    value: AliasChain(&["Base Color"]),
    shape: ValueShape::Color,
    texture: Some(TextureKind::Diffuse),
};

/// Resolution policy for metallic
pub const METALLIC: ChannelSpec = ChannelSpec {
    channel: Channel::Metallic,
    detect: AliasChain(&["Metallic"]),
    value: AliasChain(&["Metallic"]),
    shape: ValueShape::Scalar,
    texture: Some(TextureKind::Metal),
};

/// Resolution policy for specular
pub const SPECULAR: ChannelSpec = ChannelSpec {
    channel: Channel::Specular,
    detect: AliasChain(&["Specular IOR Level", "Specular"]),
    value: AliasChain(&["Specular IOR Level", "Specular"]),
    shape: ValueShape::Scalar,
    texture: Some(TextureKind::Specular),
};

/// Resolution policy for roughness
pub const ROUGHNESS: ChannelSpec = ChannelSpec {
    channel: Channel::Roughness,
    detect: AliasChain(&["Roughness"]),
    value: AliasChain(&["Roughness"]),
    shape: ValueShape::Scalar,
    texture: Some(TextureKind::Roughness),
};

/// Resolution policy for clear coat
pub const CLEAR_COAT: ChannelSpec = ChannelSpec {
    channel: Channel::ClearCoat,
    detect: AliasChain(&["Coat Weight", "Clearcoat"]),
    value: AliasChain(&["Coat Weight", "Clearcoat"]),
    shape: ValueShape::Scalar,
    texture: Some(TextureKind::ClearCoat),
};

/// Resolution policy for clear coat roughness
pub const CLEAR_COAT_ROUGHNESS: ChannelSpec = ChannelSpec {
    channel: Channel::ClearCoatRoughness,
    detect: AliasChain(&["Coat Roughness", "Clearcoat Roughness"]),
    value: AliasChain(&["Coat Roughness", "Clearcoat Roughness"]),
    shape: ValueShape::Scalar,
    texture: Some(TextureKind::ClearCoat),
};

/// Resolution policy for sheen
pub const SHEEN: ChannelSpec = ChannelSpec {
    channel: Channel::Sheen,
    detect: AliasChain(&["Sheen Weight", "Sheen"]),
    value: AliasChain(&["Sheen Weight", "Sheen"]),
    shape: ValueShape::Scalar,
    texture: Some(TextureKind::Sheen),
};

/// Resolution policy for sheen tint
pub const SHEEN_TINT: ChannelSpec = ChannelSpec {
    channel: Channel::SheenTint,
    detect: AliasChain(&["Sheen Tint"]),
    value: AliasChain(&["Sheen Tint"]),
    shape: ValueShape::Color,
    texture: Some(TextureKind::Sheen),
};

/// Resolution policy for anisotropy
pub const ANISOTROPY: ChannelSpec = ChannelSpec {
    channel: Channel::Anisotropy,
    detect: AliasChain(&["Anisotropy", "Anisotropic"]),
    value: AliasChain(&["Anisotropy", "Anisotropic"]),
    shape: ValueShape::Scalar,
    texture: None,
};

/// Resolution policy for subsurface
pub const SUBSURFACE: ChannelSpec = ChannelSpec {
    channel: Channel::Subsurface,
    detect: AliasChain(&["Subsurface Weight", "Subsurface"]),
    value: AliasChain(&["Subsurface Weight", "Subsurface"]),
    shape: ValueShape::Scalar,
    texture: None,
};

/// Resolution policy for subsurface tint
pub const SUBSURFACE_TINT: ChannelSpec = ChannelSpec {
    channel: Channel::SubsurfaceTint,
    detect: AliasChain(&["Subsurface Color"]),
    value: AliasChain(&["Subsurface Color"]),
    shape: ValueShape::Color,
    texture: None,
};

/// Resolution policy for index of refraction
pub const INDEX_OF_REFRACTION: ChannelSpec = ChannelSpec {
    channel: Channel::IndexOfRefraction,
    detect: AliasChain(&["IOR"]),
    value: AliasChain(&["IOR"]),
    shape: ValueShape::Scalar,
    texture: Some(TextureKind::Refraction),
};

/// Resolution policy for emission
pub const EMISSION: ChannelSpec = ChannelSpec {
    channel: Channel::Emission,
    detect: AliasChain(&["Emission Color", "Emission"]),
    value: AliasChain(&["Emission Color", "Emission"]),
    shape: ValueShape::Color,
    texture: Some(TextureKind::Emissive),
};

/// Resolution policy for emission strength
pub const EMISSION_STRENGTH: ChannelSpec = ChannelSpec {
    channel: Channel::EmissionStrength,
    detect: AliasChain(&["Emission Strength"]),
    value: AliasChain(&["Emission Strength"]),
    shape: ValueShape::Scalar,
    texture: None,
};

/// Resolution policy for normal
pub const NORMAL: ChannelSpec = ChannelSpec {
    channel: Channel::Normal,
    detect: AliasChain(&["Normal"]),
    value: AliasChain(&[]),
    shape: ValueShape::TextureOnly,
    texture: Some(TextureKind::Bump),
};

/// Resolution policy for clear coat normal
pub const CLEAR_COAT_NORMAL: ChannelSpec = ChannelSpec {
    channel: Channel::ClearCoatNormal,
    detect: AliasChain(&["Coat Normal", "Clearcoat Normal"]),
    value: AliasChain(&[]),
    shape: ValueShape::TextureOnly,
    texture: Some(TextureKind::ClearCoatBump),
};

/// Channels resolved unconditionally: texture, constant, or both
pub const DIRECT_CHANNELS: [ChannelSpec; 8] = [
    BASE_COLOR,
    METALLIC,
    SPECULAR,
    ROUGHNESS,
    INDEX_OF_REFRACTION,
    EMISSION,
    NORMAL,
    CLEAR_COAT_NORMAL,
];
