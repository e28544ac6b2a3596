// SPDX-License-Identifier: MIT OR Apache-2.0
//! Shader node types of the authoring tool.
//!
//! Describes the node types a material's node tree can contain, with the
//! socket names and defaults the authoring tool uses. The principled BSDF is
//! registered with its current socket schema; [`legacy_principled_type`]
//! provides the previous generation, whose sockets were renamed.

use crate::node::{NodeCategory, NodeRegistry, NodeType};
use crate::port::{Port, PortType, PortValue};

/// Node type identifiers
pub mod types {
    /// Material output
    pub const OUTPUT_MATERIAL: &str = "ShaderNodeOutputMaterial";
    /// Principled BSDF (both socket schemas share the identifier)
    pub const PRINCIPLED_BSDF: &str = "ShaderNodeBsdfPrincipled";
    /// Diffuse BSDF
    pub const DIFFUSE_BSDF: &str = "ShaderNodeBsdfDiffuse";
    /// Glossy BSDF
    pub const GLOSSY_BSDF: &str = "ShaderNodeBsdfGlossy";
    /// Transparent BSDF
    pub const TRANSPARENT_BSDF: &str = "ShaderNodeBsdfTransparent";
    /// Refraction BSDF
    pub const REFRACTION_BSDF: &str = "ShaderNodeBsdfRefraction";
    /// Anisotropic BSDF
    pub const ANISOTROPIC_BSDF: &str = "ShaderNodeBsdfAnisotropic";
    /// Velvet BSDF
    pub const VELVET_BSDF: &str = "ShaderNodeBsdfVelvet";
    /// Toon BSDF
    pub const TOON_BSDF: &str = "ShaderNodeBsdfToon";
    /// Subsurface scattering
    pub const SUBSURFACE_SCATTERING: &str = "ShaderNodeSubsurfaceScattering";
    /// Mix shader
    pub const MIX_SHADER: &str = "ShaderNodeMixShader";
    /// Add shader
    pub const ADD_SHADER: &str = "ShaderNodeAddShader";
    /// Emission
    pub const EMISSION: &str = "ShaderNodeEmission";
    /// Holdout
    pub const HOLDOUT: &str = "ShaderNodeHoldout";
    /// Image texture
    pub const IMAGE_TEXTURE: &str = "ShaderNodeTexImage";
    /// Noise texture
    pub const NOISE_TEXTURE: &str = "ShaderNodeTexNoise";
    /// Voronoi texture
    pub const VORONOI_TEXTURE: &str = "ShaderNodeTexVoronoi";
    /// Checker texture
    pub const CHECKER_TEXTURE: &str = "ShaderNodeTexChecker";
    /// Gamma
    pub const GAMMA: &str = "ShaderNodeGamma";
    /// Hue/Saturation/Value
    pub const HUE_SATURATION: &str = "ShaderNodeHueSaturation";
    /// Invert
    pub const INVERT: &str = "ShaderNodeInvert";
    /// Normal map
    pub const NORMAL_MAP: &str = "ShaderNodeNormalMap";
    /// Bump
    pub const BUMP: &str = "ShaderNodeBump";
    /// Constant color
    pub const RGB: &str = "ShaderNodeRGB";
    /// Constant value
    pub const VALUE: &str = "ShaderNodeValue";
    /// Math
    pub const MATH: &str = "ShaderNodeMath";
}

fn float(name: &str, value: f32) -> Port {
    Port::input(name, PortType::Float).with_default(PortValue::Float(value))
}

fn color(name: &str, value: [f32; 4]) -> Port {
    Port::input(name, PortType::Color).with_default(PortValue::Color(value))
}

fn vector(name: &str, value: [f32; 3]) -> Port {
    Port::input(name, PortType::Vector3).with_default(PortValue::Vector3(value))
}

/// Sockets without a static value (driven by geometry when unlinked)
fn implicit(name: &str) -> Port {
    Port::input(name, PortType::Vector3)
}

fn bsdf_output() -> Vec<Port> {
    vec![Port::output("BSDF", PortType::Shader)]
}

fn shader(id: &str, name: &str, description: &str, inputs: Vec<Port>, output: &str) -> NodeType {
    NodeType {
        id: id.to_string(),
        name: name.to_string(),
        category: NodeCategory::Shader,
        description: description.to_string(),
        inputs,
        outputs: vec![Port::output(output, PortType::Shader)],
    }
}

fn converter(id: &str, name: &str, inputs: Vec<Port>, output: Port) -> NodeType {
    NodeType {
        id: id.to_string(),
        name: name.to_string(),
        category: NodeCategory::Converter,
        description: format!("{name} converter"),
        inputs,
        outputs: vec![output],
    }
}

fn procedural(id: &str, name: &str, mut inputs: Vec<Port>) -> NodeType {
    inputs.insert(0, implicit("Vector"));
    NodeType {
        id: id.to_string(),
        name: name.to_string(),
        category: NodeCategory::Procedural,
        description: format!("Procedural {name}"),
        inputs,
        outputs: vec![
            Port::output("Fac", PortType::Float),
            Port::output("Color", PortType::Color),
        ],
    }
}

/// Principled BSDF with the current socket schema
pub fn principled_type() -> NodeType {
    NodeType {
        id: types::PRINCIPLED_BSDF.to_string(),
        name: "Principled BSDF".to_string(),
        category: NodeCategory::Shader,
        description: "Physically based surface shader".to_string(),
        inputs: vec![
            color("Base Color", [0.8, 0.8, 0.8, 1.0]),
            float("Metallic", 0.0),
            float("Roughness", 0.5),
            float("IOR", 1.5),
            float("Alpha", 1.0),
            implicit("Normal"),
            float("Subsurface Weight", 0.0),
            vector("Subsurface Radius", [1.0, 0.2, 0.1]),
            float("Subsurface Scale", 0.05),
            float("Specular IOR Level", 0.5),
            color("Specular Tint", [1.0, 1.0, 1.0, 1.0]),
            float("Anisotropic", 0.0),
            float("Anisotropic Rotation", 0.0),
            implicit("Tangent"),
            float("Transmission Weight", 0.0),
            float("Coat Weight", 0.0),
            float("Coat Roughness", 0.03),
            float("Coat IOR", 1.5),
            color("Coat Tint", [1.0, 1.0, 1.0, 1.0]),
            implicit("Coat Normal"),
            float("Sheen Weight", 0.0),
            float("Sheen Roughness", 0.5),
            color("Sheen Tint", [1.0, 1.0, 1.0, 1.0]),
            color("Emission Color", [1.0, 1.0, 1.0, 1.0]),
            float("Emission Strength", 0.0),
        ],
        outputs: bsdf_output(),
    }
}

/// Principled BSDF with the previous socket schema
pub fn legacy_principled_type() -> NodeType {
    NodeType {
        id: types::PRINCIPLED_BSDF.to_string(),
        name: "Principled BSDF".to_string(),
        category: NodeCategory::Shader,
        description: "Physically based surface shader (legacy sockets)".to_string(),
        inputs: vec![
            color("Base Color", [0.8, 0.8, 0.8, 1.0]),
            float("Subsurface", 0.0),
            vector("Subsurface Radius", [1.0, 0.2, 0.1]),
            color("Subsurface Color", [0.8, 0.8, 0.8, 1.0]),
            float("Metallic", 0.0),
            float("Specular", 0.5),
            float("Specular Tint", 0.0),
            float("Roughness", 0.5),
            float("Anisotropic", 0.0),
            float("Anisotropic Rotation", 0.0),
            float("Sheen", 0.0),
            float("Sheen Tint", 0.5),
            float("Clearcoat", 0.0),
            float("Clearcoat Roughness", 0.03),
            float("IOR", 1.45),
            float("Transmission", 0.0),
            color("Emission", [0.0, 0.0, 0.0, 1.0]),
            float("Emission Strength", 1.0),
            float("Alpha", 1.0),
            implicit("Normal"),
            implicit("Clearcoat Normal"),
            implicit("Tangent"),
        ],
        outputs: bsdf_output(),
    }
}

/// Create the shader node registry with all known node types
pub fn shader_registry() -> NodeRegistry {
    let mut registry = NodeRegistry::new();

    // ========================================================================
    // Output
    // ========================================================================

    registry.register(NodeType {
        id: types::OUTPUT_MATERIAL.to_string(),
        name: "Material Output".to_string(),
        category: NodeCategory::Output,
        description: "Final material output".to_string(),
        inputs: vec![
            Port::input("Surface", PortType::Shader),
            Port::input("Volume", PortType::Shader),
            vector("Displacement", [0.0, 0.0, 0.0]),
        ],
        outputs: vec![],
    });

    // ========================================================================
    // Shaders
    // ========================================================================

    registry.register(principled_type());
    registry.register(shader(
        types::DIFFUSE_BSDF,
        "Diffuse BSDF",
        "Lambertian diffuse",
        vec![color("Color", [0.8, 0.8, 0.8, 1.0]), float("Roughness", 0.0), implicit("Normal")],
        "BSDF",
    ));
    registry.register(shader(
        types::GLOSSY_BSDF,
        "Glossy BSDF",
        "Specular reflection",
        vec![color("Color", [0.8, 0.8, 0.8, 1.0]), float("Roughness", 0.5), implicit("Normal")],
        "BSDF",
    ));
    registry.register(shader(
        types::TRANSPARENT_BSDF,
        "Transparent BSDF",
        "Straight-through transparency",
        vec![color("Color", [1.0, 1.0, 1.0, 1.0])],
        "BSDF",
    ));
    registry.register(shader(
        types::REFRACTION_BSDF,
        "Refraction BSDF",
        "Glossy refraction",
        vec![color("Color", [1.0, 1.0, 1.0, 1.0]), float("Roughness", 0.0), float("IOR", 1.45)],
        "BSDF",
    ));
    registry.register(shader(
        types::ANISOTROPIC_BSDF,
        "Anisotropic BSDF",
        "Anisotropic glossy reflection",
        vec![color("Color", [0.8, 0.8, 0.8, 1.0]), float("Roughness", 0.5), float("Anisotropy", 0.5)],
        "BSDF",
    ));
    registry.register(shader(
        types::VELVET_BSDF,
        "Velvet BSDF",
        "Cloth-like reflection",
        vec![color("Color", [0.8, 0.8, 0.8, 1.0]), float("Sigma", 1.0)],
        "BSDF",
    ));
    registry.register(shader(
        types::TOON_BSDF,
        "Toon BSDF",
        "Cartoon light bands",
        vec![color("Color", [0.8, 0.8, 0.8, 1.0]), float("Size", 0.5), float("Smooth", 0.0)],
        "BSDF",
    ));
    registry.register(shader(
        types::SUBSURFACE_SCATTERING,
        "Subsurface Scattering",
        "Volumetric light scattering",
        vec![color("Color", [0.8, 0.8, 0.8, 1.0]), float("Scale", 1.0)],
        "BSSRDF",
    ));
    registry.register(shader(
        types::MIX_SHADER,
        "Mix Shader",
        "Blend two shaders",
        vec![
            float("Fac", 0.5),
            Port::input("Shader", PortType::Shader),
            Port::input("Shader", PortType::Shader),
        ],
        "Shader",
    ));
    registry.register(shader(
        types::ADD_SHADER,
        "Add Shader",
        "Sum two shaders",
        vec![Port::input("Shader", PortType::Shader), Port::input("Shader", PortType::Shader)],
        "Shader",
    ));
    registry.register(shader(
        types::EMISSION,
        "Emission",
        "Light emission",
        vec![color("Color", [1.0, 1.0, 1.0, 1.0]), float("Strength", 1.0)],
        "Emission",
    ));
    registry.register(shader(
        types::HOLDOUT,
        "Holdout",
        "Cut out of the render",
        vec![],
        "Holdout",
    ));

    // ========================================================================
    // Textures
    // ========================================================================

    registry.register(NodeType {
        id: types::IMAGE_TEXTURE.to_string(),
        name: "Image Texture".to_string(),
        category: NodeCategory::Texture,
        description: "Sample an image".to_string(),
        inputs: vec![implicit("Vector")],
        outputs: vec![
            Port::output("Color", PortType::Color),
            Port::output("Alpha", PortType::Float),
        ],
    });
    registry.register(procedural(
        types::NOISE_TEXTURE,
        "Noise Texture",
        vec![float("Scale", 5.0), float("Detail", 2.0), float("Roughness", 0.5)],
    ));
    registry.register(procedural(
        types::VORONOI_TEXTURE,
        "Voronoi Texture",
        vec![float("Scale", 5.0), float("Randomness", 1.0)],
    ));
    registry.register(procedural(
        types::CHECKER_TEXTURE,
        "Checker Texture",
        vec![
            color("Color1", [0.8, 0.8, 0.8, 1.0]),
            color("Color2", [0.2, 0.2, 0.2, 1.0]),
            float("Scale", 5.0),
        ],
    ));

    // ========================================================================
    // Converters
    // ========================================================================

    registry.register(converter(
        types::GAMMA,
        "Gamma",
        vec![color("Color", [1.0, 1.0, 1.0, 1.0]), float("Gamma", 1.0)],
        Port::output("Color", PortType::Color),
    ));
    registry.register(converter(
        types::HUE_SATURATION,
        "Hue/Saturation/Value",
        vec![
            float("Hue", 0.5),
            float("Saturation", 1.0),
            float("Value", 1.0),
            float("Fac", 1.0),
            color("Color", [0.8, 0.8, 0.8, 1.0]),
        ],
        Port::output("Color", PortType::Color),
    ));
    registry.register(converter(
        types::INVERT,
        "Invert",
        vec![float("Fac", 1.0), color("Color", [0.0, 0.0, 0.0, 1.0])],
        Port::output("Color", PortType::Color),
    ));
    registry.register(converter(
        types::NORMAL_MAP,
        "Normal Map",
        vec![float("Strength", 1.0), color("Color", [0.5, 0.5, 1.0, 1.0])],
        Port::output("Normal", PortType::Vector3),
    ));
    registry.register(converter(
        types::BUMP,
        "Bump",
        vec![
            float("Strength", 1.0),
            float("Distance", 1.0),
            float("Height", 1.0),
            implicit("Normal"),
        ],
        Port::output("Normal", PortType::Vector3),
    ));

    // ========================================================================
    // Inputs & math
    // ========================================================================

    registry.register(NodeType {
        id: types::RGB.to_string(),
        name: "RGB".to_string(),
        category: NodeCategory::Input,
        description: "Constant color".to_string(),
        inputs: vec![],
        outputs: vec![Port::output("Color", PortType::Color)],
    });
    registry.register(NodeType {
        id: types::VALUE.to_string(),
        name: "Value".to_string(),
        category: NodeCategory::Input,
        description: "Constant value".to_string(),
        inputs: vec![],
        outputs: vec![Port::output("Value", PortType::Float)],
    });
    registry.register(NodeType {
        id: types::MATH.to_string(),
        name: "Math".to_string(),
        category: NodeCategory::Math,
        description: "Scalar math".to_string(),
        inputs: vec![float("Value", 0.5), float("Value", 0.5)],
        outputs: vec![Port::output("Value", PortType::Float)],
    });

    registry
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_contains_core_types() {
        let registry = shader_registry();
        for id in [
            types::OUTPUT_MATERIAL,
            types::PRINCIPLED_BSDF,
            types::IMAGE_TEXTURE,
            types::NOISE_TEXTURE,
            types::NORMAL_MAP,
            types::EMISSION,
        ] {
            assert!(registry.get(id).is_some(), "missing {id}");
        }
    }

    #[test]
    fn test_schemas_share_identifier_but_not_sockets() {
        let current = principled_type();
        let legacy = legacy_principled_type();
        assert_eq!(current.id, legacy.id);

        let has = |ty: &NodeType, name: &str| ty.inputs.iter().any(|p| p.name == name);
        assert!(has(&current, "Coat Weight") && !has(&current, "Clearcoat"));
        assert!(has(&legacy, "Clearcoat") && !has(&legacy, "Coat Weight"));
        assert!(has(&current, "Emission Color") && has(&legacy, "Emission"));
    }

    #[test]
    fn test_every_shader_exposes_a_closure() {
        let registry = shader_registry();
        for ty in registry.types_in_category(NodeCategory::Shader) {
            assert!(
                ty.outputs.iter().any(|p| p.port_type == PortType::Shader),
                "{} has no closure output",
                ty.id
            );
        }
    }
}
