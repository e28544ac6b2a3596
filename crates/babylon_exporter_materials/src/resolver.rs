// SPDX-License-Identifier: MIT OR Apache-2.0
//! Channel resolution for the principled BSDF.
//!
//! Maps each shading channel of one principled node onto a texture slot, a
//! constant, or both. Resolution is a pure read of the graph: it never fails
//! and never mutates anything. Missing sockets simply leave the channel
//! absent.

use crate::aliases::{self, ChannelSpec, ValueShape};
use crate::channel::{Channel, ChannelValue, ResolvedChannel};
use crate::record::MaterialRecord;
use babylon_exporter_graph::{GraphRead, Node, NodeId, Port, PortValue};
use std::collections::HashSet;

/// Producing node found behind a socket
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct TextureSource {
    node: NodeId,
    bake: bool,
}

/// Outcome of inspecting a channel's active socket
struct Probe<'n> {
    socket: &'n Port,
    texture: Option<TextureSource>,
}

/// Resolve every channel of a principled node.
///
/// With `overload_channels` set, constants are captured even for channels
/// that are texture-backed, so the texture can be tinted. Returns an empty
/// record when `node_id` is not in the graph.
pub fn resolve<G: GraphRead + ?Sized>(
    graph: &G,
    node_id: NodeId,
    overload_channels: bool,
) -> MaterialRecord {
    let Some(node) = graph.node(node_id) else {
        tracing::debug!("Shading node {:?} not found, nothing to resolve", node_id);
        return MaterialRecord::new();
    };
    ChannelResolver::new(graph, overload_channels).resolve_node(node)
}

/// Channel resolver bound to one graph
pub struct ChannelResolver<'g, G: GraphRead + ?Sized> {
    graph: &'g G,
    overload_channels: bool,
}

impl<'g, G: GraphRead + ?Sized> ChannelResolver<'g, G> {
    /// Create a resolver over a graph
    pub fn new(graph: &'g G, overload_channels: bool) -> Self {
        Self {
            graph,
            overload_channels,
        }
    }

    /// Resolve every channel of `node`
    pub fn resolve_node(&self, node: &Node) -> MaterialRecord {
        let mut record = MaterialRecord::new();

        for spec in &aliases::DIRECT_CHANNELS {
            self.resolve_direct(node, spec, &mut record);
        }

        self.resolve_paired(node, &aliases::CLEAR_COAT, &aliases::CLEAR_COAT_ROUGHNESS, &mut record);
        self.resolve_paired(node, &aliases::SHEEN, &aliases::SHEEN_TINT, &mut record);
        self.resolve_anisotropy(node, &mut record);
        self.resolve_subsurface(node, &mut record);
        self.resolve_emission_strength(node, &mut record);

        tracing::debug!(
            "Resolved '{}': {} channel(s), {} texture slot(s)",
            node.name,
            record.channels().count(),
            record.textures().count()
        );
        record
    }

    /// Texture, constant, or both for a channel that is always emitted
    fn resolve_direct(&self, node: &Node, spec: &ChannelSpec, record: &mut MaterialRecord) {
        let Some(probe) = self.probe(node, spec) else {
            return;
        };
        tracing::trace!("{:?} reads socket '{}'", spec.channel, probe.socket.name);

        let value = if probe.texture.is_none() || self.overload_channels {
            self.read_value(node, spec)
        } else {
            None
        };

        match (probe.texture, spec.texture) {
            (Some(source), Some(kind)) => {
                record.add_texture(kind);
                record.must_bake.mark(spec.channel, source.bake);
                record.set(
                    spec.channel,
                    ResolvedChannel::TextureBaked {
                        kind,
                        bake: source.bake,
                        source: source.node,
                        tint: value,
                    },
                );
            }
            _ => {
                if let Some(value) = value {
                    record.set(spec.channel, value.into());
                }
            }
        }
    }

    /// Intensity channel plus a companion channel sharing its texture slot.
    ///
    /// Constants are only emitted when neither socket (nor any other socket
    /// of the node) fed the slot and the intensity is above the threshold.
    fn resolve_paired(
        &self,
        node: &Node,
        intensity: &ChannelSpec,
        companion: &ChannelSpec,
        record: &mut MaterialRecord,
    ) {
        let primary = self.probe(node, intensity);
        let secondary = self.probe(node, companion);

        for (spec, probe) in [(intensity, &primary), (companion, &secondary)] {
            let (Some(probe), Some(kind)) = (probe, spec.texture) else {
                continue;
            };
            let Some(source) = probe.texture else {
                continue;
            };
            record.add_texture(kind);
            record.must_bake.mark(spec.channel, source.bake);
            record.set(
                spec.channel,
                ResolvedChannel::TextureBaked {
                    kind,
                    bake: source.bake,
                    source: source.node,
                    tint: None,
                },
            );
        }

        if primary.is_none() {
            return;
        }
        if intensity.texture.is_some_and(|kind| record.has_texture(kind)) {
            return;
        }
        let Some(strength) = self.read_scalar(node, intensity) else {
            return;
        };
        if !aliases::exceeds_threshold(strength) {
            return;
        }

        record.set(intensity.channel, ResolvedChannel::Scalar(strength));
        if secondary.is_some() {
            if let Some(value) = self.read_value(node, companion) {
                record.set(companion.channel, value.into());
            }
        }
    }

    fn resolve_anisotropy(&self, node: &Node, record: &mut MaterialRecord) {
        if let Some(strength) = self.read_scalar(node, &aliases::ANISOTROPY) {
            if aliases::exceeds_threshold(strength) {
                record.set(Channel::Anisotropy, ResolvedChannel::Scalar(strength));
            }
        }
    }

    fn resolve_subsurface(&self, node: &Node, record: &mut MaterialRecord) {
        let Some(strength) = self.read_scalar(node, &aliases::SUBSURFACE) else {
            return;
        };
        if !aliases::exceeds_threshold(strength) {
            return;
        }

        record.set(Channel::Subsurface, ResolvedChannel::Scalar(strength));
        // Newer schemas dropped the tint socket; the base color covers it
        if let Some(tint) = self.read_value(node, &aliases::SUBSURFACE_TINT) {
            record.set(Channel::SubsurfaceTint, tint.into());
        }
    }

    fn resolve_emission_strength(&self, node: &Node, record: &mut MaterialRecord) {
        let strength = match aliases::EMISSION_STRENGTH.detect.active_socket(node) {
            Some(_) => self.read_scalar(node, &aliases::EMISSION_STRENGTH),
            None => Some(aliases::DEFAULT_EMISSION_STRENGTH),
        };
        if let Some(strength) = strength {
            record.set(Channel::EmissionStrength, ResolvedChannel::Scalar(strength));
        }
    }

    /// Pick the active socket and look for a texture behind it
    fn probe<'n>(&self, node: &'n Node, spec: &ChannelSpec) -> Option<Probe<'n>> {
        let socket = spec.detect.active_socket(node)?;
        let texture = if spec.texture.is_some() {
            self.trace_texture(node, socket)
        } else {
            None
        };
        Some(Probe { socket, texture })
    }

    /// Follow the link into `socket` through converters until a texture
    /// producer or a dead end
    fn trace_texture(&self, node: &Node, socket: &Port) -> Option<TextureSource> {
        let mut current = self.graph.upstream(node.id, socket)?;
        let mut visited = HashSet::new();

        loop {
            if current.is_texture_producer() {
                return Some(TextureSource {
                    node: current.id,
                    bake: current.requires_bake(),
                });
            }
            if !current.is_pass_through() || !visited.insert(current.id) {
                return None;
            }
            let via = current;
            current = via
                .inputs
                .iter()
                .find_map(|input| self.graph.upstream(via.id, input))?;
        }
    }

    /// Constant of a channel, read through its value chain
    fn read_value(&self, node: &Node, spec: &ChannelSpec) -> Option<ChannelValue> {
        let value = self.static_default(node, spec)?;
        match spec.shape {
            ValueShape::Scalar => value.as_scalar().map(ChannelValue::Scalar),
            ValueShape::Color => value.as_color().map(ChannelValue::Color),
            ValueShape::TextureOnly => None,
        }
    }

    fn read_scalar(&self, node: &Node, spec: &ChannelSpec) -> Option<f32> {
        self.static_default(node, spec)?.as_scalar()
    }

    /// Static default of the first socket of the value chain present on `node`
    fn static_default(&self, node: &Node, spec: &ChannelSpec) -> Option<&'g PortValue> {
        let socket = spec.value.active_socket(node)?;
        self.graph.default_of(node.id, &socket.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::texture::TextureKind;
    use babylon_exporter_graph::{
        legacy_principled_type, shader_registry, types, Graph, NodeCategory, NodeRegistry,
        NodeType, PortType, PortValue,
    };

    struct Fixture {
        registry: NodeRegistry,
        graph: Graph,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                registry: shader_registry(),
                graph: Graph::new("Fixture"),
            }
        }

        fn add(&mut self, type_id: &str) -> NodeId {
            let node = self.registry.create_node(type_id).unwrap();
            self.graph.add_node(node)
        }

        fn add_type(&mut self, ty: &NodeType) -> NodeId {
            self.graph.add_node(Node::new(ty))
        }

        fn link(&mut self, from: NodeId, output: &str, to: NodeId, input: &str) {
            self.graph.connect_named(from, output, to, input).unwrap();
        }

        fn set_default(&mut self, node: NodeId, socket: &str, value: PortValue) {
            let port = self.graph.node_mut(node).unwrap().input_named_mut(socket).unwrap();
            port.default_value = Some(value);
        }
    }

    fn minimal_principled() -> NodeType {
        NodeType {
            id: types::PRINCIPLED_BSDF.to_string(),
            name: "Principled BSDF".to_string(),
            category: NodeCategory::Shader,
            description: String::new(),
            inputs: vec![
                Port::input("Base Color", PortType::Color)
                    .with_default(PortValue::Color([0.8, 0.8, 0.8, 1.0])),
                Port::input("Metallic", PortType::Float).with_default(PortValue::Float(0.0)),
                Port::input("Roughness", PortType::Float).with_default(PortValue::Float(0.5)),
            ],
            outputs: vec![Port::output("BSDF", PortType::Shader)],
        }
    }

    #[test]
    fn test_textured_base_color_scenario() {
        let mut fx = Fixture::new();
        let image = fx.add(types::IMAGE_TEXTURE);
        let bsdf = fx.add_type(&minimal_principled());
        fx.link(image, "Color", bsdf, "Base Color");

        let record = resolve(&fx.graph, bsdf, false);

        assert_eq!(
            *record.get(Channel::BaseColor),
            ResolvedChannel::TextureBaked {
                kind: TextureKind::Diffuse,
                bake: false,
                source: image,
                tint: None,
            }
        );
        assert_eq!(*record.get(Channel::Metallic), ResolvedChannel::Scalar(0.0));
        assert_eq!(*record.get(Channel::Roughness), ResolvedChannel::Scalar(0.5));
        assert!(record.get(Channel::Subsurface).is_absent());
        assert!(record.get(Channel::SubsurfaceTint).is_absent());
        assert!(record.get(Channel::Specular).is_absent());
        assert!(record.has_texture(TextureKind::Diffuse));
        assert!(!record.must_bake.diffuse);
    }

    #[test]
    fn test_missing_strength_socket_defaults_to_one() {
        let mut fx = Fixture::new();
        let bsdf = fx.add_type(&minimal_principled());
        let record = resolve(&fx.graph, bsdf, false);
        assert_eq!(
            *record.get(Channel::EmissionStrength),
            ResolvedChannel::Scalar(aliases::DEFAULT_EMISSION_STRENGTH)
        );
    }

    #[test]
    fn test_first_alias_wins_when_both_generations_present() {
        let mut ty = minimal_principled();
        ty.inputs.push(Port::input("Specular IOR Level", PortType::Float).with_default(PortValue::Float(0.3)));
        ty.inputs.push(Port::input("Specular", PortType::Float).with_default(PortValue::Float(0.9)));

        let mut fx = Fixture::new();
        let bsdf = fx.add_type(&ty);
        let noise = fx.add(types::NOISE_TEXTURE);
        // Texture on the lower-priority socket is never looked at
        fx.link(noise, "Fac", bsdf, "Specular");

        let record = resolve(&fx.graph, bsdf, false);
        assert_eq!(*record.get(Channel::Specular), ResolvedChannel::Scalar(0.3));
        assert!(!record.has_texture(TextureKind::Specular));
        assert!(!record.must_bake.specular);
    }

    #[test]
    fn test_first_alias_wins_even_without_value() {
        let mut ty = minimal_principled();
        ty.inputs.push(Port::input("Anisotropy", PortType::Float));
        ty.inputs.push(Port::input("Anisotropic", PortType::Float).with_default(PortValue::Float(0.7)));

        let mut fx = Fixture::new();
        let bsdf = fx.add_type(&ty);
        let record = resolve(&fx.graph, bsdf, false);
        assert!(record.get(Channel::Anisotropy).is_absent());
    }

    #[test]
    fn test_resolution_is_idempotent() {
        let mut fx = Fixture::new();
        let bsdf = fx.add(types::PRINCIPLED_BSDF);
        let image = fx.add(types::IMAGE_TEXTURE);
        let noise = fx.add(types::NOISE_TEXTURE);
        fx.link(image, "Color", bsdf, "Base Color");
        fx.link(noise, "Fac", bsdf, "Roughness");
        fx.set_default(bsdf, "Sheen Weight", PortValue::Float(0.4));

        let first = resolve(&fx.graph, bsdf, true);
        let second = resolve(&fx.graph, bsdf, true);
        assert_eq!(first, second);
    }

    #[test]
    fn test_zero_intensity_never_emitted() {
        let mut fx = Fixture::new();
        let bsdf = fx.add(types::PRINCIPLED_BSDF);
        fx.set_default(bsdf, "Sheen Weight", PortValue::Float(0.0));
        fx.set_default(bsdf, "Coat Weight", PortValue::Float(0.0));

        let record = resolve(&fx.graph, bsdf, true);
        for channel in [
            Channel::Sheen,
            Channel::SheenTint,
            Channel::ClearCoat,
            Channel::ClearCoatRoughness,
            Channel::Anisotropy,
            Channel::Subsurface,
        ] {
            assert!(record.get(channel).is_absent(), "{channel:?} should be absent");
        }
    }

    #[test]
    fn test_overload_keeps_tint_next_to_texture() {
        let mut fx = Fixture::new();
        let bsdf = fx.add(types::PRINCIPLED_BSDF);
        let image = fx.add(types::IMAGE_TEXTURE);
        fx.link(image, "Color", bsdf, "Base Color");
        fx.set_default(bsdf, "Base Color", PortValue::Color([1.0, 0.5, 0.25, 0.75]));

        let plain = resolve(&fx.graph, bsdf, false);
        assert_eq!(plain.get(Channel::BaseColor).value(), None);

        let overloaded = resolve(&fx.graph, bsdf, true);
        let channel = overloaded.get(Channel::BaseColor);
        assert_eq!(channel.texture(), Some(TextureKind::Diffuse));
        assert_eq!(channel.value(), Some(ChannelValue::Color([1.0, 0.5, 0.25, 0.75])));
    }

    #[test]
    fn test_positive_sheen_and_coat_emit_scalars() {
        let mut fx = Fixture::new();
        let bsdf = fx.add(types::PRINCIPLED_BSDF);
        fx.set_default(bsdf, "Sheen Weight", PortValue::Float(0.4));
        fx.set_default(bsdf, "Sheen Tint", PortValue::Color([0.2, 0.3, 0.4, 1.0]));
        fx.set_default(bsdf, "Coat Weight", PortValue::Float(0.6));

        let record = resolve(&fx.graph, bsdf, false);
        assert_eq!(*record.get(Channel::Sheen), ResolvedChannel::Scalar(0.4));
        assert_eq!(*record.get(Channel::SheenTint), ResolvedChannel::Color([0.2, 0.3, 0.4, 1.0]));
        assert_eq!(*record.get(Channel::ClearCoat), ResolvedChannel::Scalar(0.6));
        assert_eq!(*record.get(Channel::ClearCoatRoughness), ResolvedChannel::Scalar(0.03));
    }

    #[test]
    fn test_texture_on_companion_suppresses_coat_scalars() {
        let mut fx = Fixture::new();
        let bsdf = fx.add(types::PRINCIPLED_BSDF);
        let noise = fx.add(types::NOISE_TEXTURE);
        fx.set_default(bsdf, "Coat Weight", PortValue::Float(0.8));
        fx.link(noise, "Fac", bsdf, "Coat Roughness");

        let record = resolve(&fx.graph, bsdf, true);
        assert!(record.has_texture(TextureKind::ClearCoat));
        assert!(record.get(Channel::ClearCoat).is_absent());
        assert_eq!(record.get(Channel::ClearCoatRoughness).texture(), Some(TextureKind::ClearCoat));
        assert_eq!(record.get(Channel::ClearCoatRoughness).value(), None);
        assert!(record.must_bake.clear_coat);
    }

    #[test]
    fn test_follows_converters_to_texture() {
        let mut fx = Fixture::new();
        let bsdf = fx.add(types::PRINCIPLED_BSDF);
        let image = fx.add(types::IMAGE_TEXTURE);
        let gamma = fx.add(types::GAMMA);
        let normal_image = fx.add(types::IMAGE_TEXTURE);
        let normal_map = fx.add(types::NORMAL_MAP);
        fx.link(image, "Color", gamma, "Color");
        fx.link(gamma, "Color", bsdf, "Base Color");
        fx.link(normal_image, "Color", normal_map, "Color");
        fx.link(normal_map, "Normal", bsdf, "Normal");

        let record = resolve(&fx.graph, bsdf, false);
        match record.get(Channel::BaseColor) {
            ResolvedChannel::TextureBaked { source, .. } => assert_eq!(*source, image),
            other => panic!("unexpected base color {other:?}"),
        }
        match record.get(Channel::Normal) {
            ResolvedChannel::TextureBaked { kind, source, .. } => {
                assert_eq!(*kind, TextureKind::Bump);
                assert_eq!(*source, normal_image);
            }
            other => panic!("unexpected normal {other:?}"),
        }
        assert!(record.get(Channel::ClearCoatNormal).is_absent());
    }

    #[test]
    fn test_procedural_sources_need_baking() {
        let mut fx = Fixture::new();
        let bsdf = fx.add(types::PRINCIPLED_BSDF);
        let noise = fx.add(types::NOISE_TEXTURE);
        let bump = fx.add(types::BUMP);
        fx.link(noise, "Fac", bsdf, "Roughness");
        fx.link(noise, "Fac", bump, "Height");
        fx.link(bump, "Normal", bsdf, "Coat Normal");

        let record = resolve(&fx.graph, bsdf, false);
        assert!(record.must_bake.roughness);
        assert!(record.must_bake.clear_coat_normal);
        assert!(!record.must_bake.normal);
        assert!(record.has_texture(TextureKind::ClearCoatBump));
        assert!(!record.has_texture(TextureKind::Bump));
    }

    #[test]
    fn test_dead_end_falls_back_to_default() {
        let mut fx = Fixture::new();
        let bsdf = fx.add(types::PRINCIPLED_BSDF);
        let value = fx.add(types::VALUE);
        let gamma = fx.add(types::GAMMA);
        fx.link(value, "Value", bsdf, "Metallic");
        // Converter with nothing linked upstream
        fx.link(gamma, "Color", bsdf, "Base Color");

        let record = resolve(&fx.graph, bsdf, false);
        assert_eq!(*record.get(Channel::Metallic), ResolvedChannel::Scalar(0.0));
        assert_eq!(*record.get(Channel::BaseColor), ResolvedChannel::Color([0.8, 0.8, 0.8, 1.0]));
        assert!(!record.has_texture(TextureKind::Diffuse));
    }

    #[test]
    fn test_converter_cycle_terminates() {
        let mut fx = Fixture::new();
        let bsdf = fx.add(types::PRINCIPLED_BSDF);
        let a = fx.add(types::GAMMA);
        let b = fx.add(types::GAMMA);
        fx.link(b, "Color", a, "Color");
        fx.link(a, "Color", b, "Color");
        fx.link(a, "Color", bsdf, "Base Color");

        let record = resolve(&fx.graph, bsdf, false);
        assert!(record.get(Channel::BaseColor).texture().is_none());
    }

    #[test]
    fn test_legacy_schema_sockets() {
        let mut fx = Fixture::new();
        let bsdf = fx.add_type(&legacy_principled_type());
        fx.set_default(bsdf, "Clearcoat", PortValue::Float(0.5));
        fx.set_default(bsdf, "Sheen", PortValue::Float(0.2));
        fx.set_default(bsdf, "Subsurface", PortValue::Float(0.1));
        fx.set_default(bsdf, "Specular", PortValue::Float(0.25));

        let record = resolve(&fx.graph, bsdf, false);
        assert_eq!(*record.get(Channel::ClearCoat), ResolvedChannel::Scalar(0.5));
        assert_eq!(*record.get(Channel::ClearCoatRoughness), ResolvedChannel::Scalar(0.03));
        assert_eq!(*record.get(Channel::Sheen), ResolvedChannel::Scalar(0.2));
        assert_eq!(*record.get(Channel::SheenTint), ResolvedChannel::Color([0.5, 0.5, 0.5, 1.0]));
        assert_eq!(*record.get(Channel::Subsurface), ResolvedChannel::Scalar(0.1));
        assert_eq!(*record.get(Channel::SubsurfaceTint), ResolvedChannel::Color([0.8, 0.8, 0.8, 1.0]));
        assert_eq!(*record.get(Channel::Specular), ResolvedChannel::Scalar(0.25));
        assert_eq!(*record.get(Channel::IndexOfRefraction), ResolvedChannel::Scalar(1.45));
        assert_eq!(*record.get(Channel::Emission), ResolvedChannel::Color([0.0, 0.0, 0.0, 1.0]));
        assert_eq!(*record.get(Channel::EmissionStrength), ResolvedChannel::Scalar(1.0));
    }

    #[test]
    fn test_unknown_node_yields_empty_record() {
        let fx = Fixture::new();
        let record = resolve(&fx.graph, NodeId::new(), true);
        assert_eq!(record, MaterialRecord::new());
    }
}
