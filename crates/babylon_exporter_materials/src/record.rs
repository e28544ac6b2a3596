// SPDX-License-Identifier: MIT OR Apache-2.0
//! Flat material record produced for one shading node.

use crate::channel::{Channel, ResolvedChannel};
use crate::texture::TextureKind;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Channels whose source must be rendered to a bitmap before export
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BakeFlags {
    /// Base color
    pub diffuse: bool,
    /// Metalness
    pub metal: bool,
    /// Specular level
    pub specular: bool,
    /// Roughness
    pub roughness: bool,
    /// Clear-coat intensity or roughness
    pub clear_coat: bool,
    /// Sheen intensity or tint
    pub sheen: bool,
    /// Index of refraction
    pub refraction: bool,
    /// Emissive color
    pub emissive: bool,
    /// Surface normal
    pub normal: bool,
    /// Clear-coat normal
    pub clear_coat_normal: bool,
}

impl BakeFlags {
    /// Raise the flag covering `channel` when its source needs baking
    pub fn mark(&mut self, channel: Channel, must_bake: bool) {
        if !must_bake {
            return;
        }
        let flag = match channel {
            Channel::BaseColor => &mut self.diffuse,
            Channel::Metallic => &mut self.metal,
            Channel::Specular => &mut self.specular,
            Channel::Roughness => &mut self.roughness,
            Channel::ClearCoat | Channel::ClearCoatRoughness => &mut self.clear_coat,
            Channel::Sheen | Channel::SheenTint => &mut self.sheen,
            Channel::IndexOfRefraction => &mut self.refraction,
            Channel::Emission => &mut self.emissive,
            Channel::Normal => &mut self.normal,
            Channel::ClearCoatNormal => &mut self.clear_coat_normal,
            // Read from static defaults only
            Channel::Anisotropy
            | Channel::Subsurface
            | Channel::SubsurfaceTint
            | Channel::EmissionStrength => return,
        };
        *flag = true;
    }

    /// Whether any channel needs baking
    pub fn any(&self) -> bool {
        self.diffuse
            || self.metal
            || self.specular
            || self.roughness
            || self.clear_coat
            || self.sheen
            || self.refraction
            || self.emissive
            || self.normal
            || self.clear_coat_normal
    }
}

/// Resolved description of one material
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MaterialRecord {
    /// Non-absent channels
    channels: BTreeMap<Channel, ResolvedChannel>,
    /// Texture slots found anywhere on the node
    textures: BTreeSet<TextureKind>,
    /// Channels needing a bake pass
    pub must_bake: BakeFlags,
}

impl MaterialRecord {
    /// Create an empty record
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolved value of a channel
    pub fn get(&self, channel: Channel) -> &ResolvedChannel {
        const ABSENT: ResolvedChannel = ResolvedChannel::Absent;
        self.channels.get(&channel).unwrap_or(&ABSENT)
    }

    /// Store a channel; storing [`ResolvedChannel::Absent`] clears it
    pub fn set(&mut self, channel: Channel, value: ResolvedChannel) {
        if value.is_absent() {
            self.channels.remove(&channel);
        } else {
            self.channels.insert(channel, value);
        }
    }

    /// Register a texture slot found on the node
    pub fn add_texture(&mut self, kind: TextureKind) {
        self.textures.insert(kind);
    }

    /// Whether any channel of the node fed the given slot
    pub fn has_texture(&self, kind: TextureKind) -> bool {
        self.textures.contains(&kind)
    }

    /// Texture slots found, in slot order
    pub fn textures(&self) -> impl Iterator<Item = TextureKind> + '_ {
        self.textures.iter().copied()
    }

    /// Non-absent channels, in channel order
    pub fn channels(&self) -> impl Iterator<Item = (Channel, &ResolvedChannel)> {
        self.channels.iter().map(|(c, v)| (*c, v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_is_not_stored() {
        let mut record = MaterialRecord::new();
        record.set(Channel::Roughness, ResolvedChannel::Scalar(0.5));
        assert_eq!(record.get(Channel::Roughness).scalar(), Some(0.5));

        record.set(Channel::Roughness, ResolvedChannel::Absent);
        assert!(record.get(Channel::Roughness).is_absent());
        assert_eq!(record.channels().count(), 0);
    }

    #[test]
    fn test_bake_flags_group_channels() {
        let mut flags = BakeFlags::default();
        flags.mark(Channel::ClearCoatRoughness, true);
        flags.mark(Channel::ClearCoat, false);
        flags.mark(Channel::Subsurface, true);
        assert!(flags.clear_coat);
        assert!(!flags.normal);
        assert!(flags.any());

        let mut normals = BakeFlags::default();
        normals.mark(Channel::ClearCoatNormal, true);
        assert!(normals.clear_coat_normal);
        assert!(!normals.normal);
    }
}
