// SPDX-License-Identifier: MIT OR Apache-2.0
//! Socket definitions for node inputs/outputs.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a socket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PortId(pub Uuid);

impl PortId {
    /// Create a new random socket ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for PortId {
    fn default() -> Self {
        Self::new()
    }
}

/// Socket direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PortDirection {
    /// Input socket
    Input,
    /// Output socket
    Output,
}

/// Data kind that can flow through a socket
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PortType {
    /// Scalar value
    Float,
    /// Integer value
    Int,
    /// 2D vector
    Vector2,
    /// 3D vector (also normals)
    Vector3,
    /// Color (RGBA)
    Color,
    /// Closure produced by a shader node
    Shader,
    /// Any value kind
    Any,
}

impl PortType {
    /// Whether this kind carries a shader closure
    pub fn is_shader(&self) -> bool {
        matches!(self, Self::Shader)
    }

    /// Check if this kind can connect to another kind
    pub fn can_connect_to(&self, other: &PortType) -> bool {
        if matches!(self, Self::Any) || matches!(other, Self::Any) {
            return true;
        }

        // Closures only flow into closure inputs; every value kind converts
        // implicitly into every other value kind.
        self.is_shader() == other.is_shader()
    }
}

/// A socket on a node
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Port {
    /// Unique socket ID
    pub id: PortId,
    /// Socket name
    pub name: String,
    /// Socket direction
    pub direction: PortDirection,
    /// Data kind
    pub port_type: PortType,
    /// Static default value (for inputs)
    pub default_value: Option<PortValue>,
    /// Whether multiple connections are allowed
    pub multi_connect: bool,
}

impl Port {
    /// Create a new input socket
    pub fn input(name: impl Into<String>, port_type: PortType) -> Self {
        Self {
            id: PortId::new(),
            name: name.into(),
            direction: PortDirection::Input,
            port_type,
            default_value: None,
            multi_connect: false,
        }
    }

    /// Create a new output socket
    pub fn output(name: impl Into<String>, port_type: PortType) -> Self {
        Self {
            id: PortId::new(),
            name: name.into(),
            direction: PortDirection::Output,
            port_type,
            default_value: None,
            multi_connect: true, // Outputs can feed many inputs
        }
    }

    /// Set the default value
    pub fn with_default(mut self, value: PortValue) -> Self {
        self.default_value = Some(value);
        self
    }

    /// Copy of this socket with a fresh identity, used when instancing a node type
    pub fn instantiate(&self) -> Self {
        Self {
            id: PortId::new(),
            ..self.clone()
        }
    }

    /// Whether this socket carries shader closures
    pub fn is_shader_compatible(&self) -> bool {
        self.port_type.is_shader()
    }

    /// Check if a connection to another socket is valid
    pub fn can_connect(&self, other: &Port) -> bool {
        if self.direction == other.direction {
            return false;
        }

        self.port_type.can_connect_to(&other.port_type)
    }
}

/// Static value stored on a socket
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PortValue {
    /// Scalar
    Float(f32),
    /// Integer
    Int(i32),
    /// 2D vector
    Vector2([f32; 2]),
    /// 3D vector
    Vector3([f32; 3]),
    /// Color (RGBA)
    Color([f32; 4]),
}

impl PortValue {
    /// Read the value as a scalar.
    ///
    /// Colors and vectors are not collapsed; only numeric scalars convert.
    pub fn as_scalar(&self) -> Option<f32> {
        match self {
            Self::Float(v) => Some(*v),
            Self::Int(v) => Some(*v as f32),
            Self::Vector2(_) | Self::Vector3(_) | Self::Color(_) => None,
        }
    }

    /// Read the value as an RGBA color.
    ///
    /// Scalars become an opaque gray, vectors an opaque color.
    pub fn as_color(&self) -> Option<[f32; 4]> {
        match self {
            Self::Color(c) => Some(*c),
            Self::Vector3([r, g, b]) => Some([*r, *g, *b, 1.0]),
            Self::Float(_) | Self::Int(_) => self.as_scalar().map(|v| [v, v, v, 1.0]),
            Self::Vector2(_) => None,
        }
    }
}
