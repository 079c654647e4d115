// SPDX-License-Identifier: MIT OR Apache-2.0
//! Port definitions for node inputs/outputs.
//!
//! Ports are addressed by a stable `identifier`. The display `name` is
//! cosmetic and may repeat on the same node (a mix node has two inputs
//! both called "Image").

use serde::{Deserialize, Serialize};

/// Which side of a node a socket sits on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PortDirection {
    /// Receives links
    Input,
    /// Sends links
    Output,
}

/// Socket data type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PortType {
    /// Boolean
    Bool,
    /// 32-bit integer
    Int,
    /// Scalar
    Float,
    /// XYZ
    Vector,
    /// RGBA
    Color,
    /// Text
    String,
    /// Compositor image buffer
    Image,
    /// Shader closure
    Shader,
    /// Geometry set
    Geometry,
    /// Reference to a scene object
    Object,
    /// Any type (group interface slots, reroutes)
    Any,
}

impl PortType {
    /// Whether an output of this type may feed an input of type `other`
    pub fn can_connect_to(&self, other: &PortType) -> bool {
        match (self, other) {
            (a, b) if a == b => true,
            (Self::Any, _) | (_, Self::Any) => true,
            // Scalars convert freely
            (Self::Bool | Self::Int | Self::Float, Self::Bool | Self::Int | Self::Float) => true,
            // Scalars broadcast into vectors and colors
            (Self::Bool | Self::Int | Self::Float, Self::Vector | Self::Color) => true,
            (Self::Vector | Self::Color, Self::Bool | Self::Int | Self::Float) => true,
            (Self::Vector, Self::Color) | (Self::Color, Self::Vector) => true,
            // Compositor buffers accept per-pixel values
            (Self::Image, Self::Color | Self::Float | Self::Vector) => true,
            (Self::Color | Self::Float | Self::Vector, Self::Image) => true,
            _ => false,
        }
    }

    /// Whether sockets of this type carry an editable default value
    pub fn has_default_value(&self) -> bool {
        !matches!(self, Self::Image | Self::Shader | Self::Geometry | Self::Any)
    }
}

/// A socket on a node
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Port {
    /// Stable identifier, unique per direction on a node
    pub identifier: String,
    /// Display name, may repeat on a node
    pub name: String,
    /// Input or output
    pub direction: PortDirection,
    /// Data type
    pub port_type: PortType,
    /// Value used while the socket is unlinked
    pub default_value: Option<PortValue>,
    /// Disabled sockets stay on the node but are not drawn
    pub enabled: bool,
    /// Accepts more than one incoming link. Outputs always fan out.
    pub multi_connect: bool,
}

impl Port {
    /// Socket whose identifier and display name may differ
    pub fn new(
        identifier: impl Into<String>,
        name: impl Into<String>,
        port_type: PortType,
        direction: PortDirection,
    ) -> Self {
        Self {
            identifier: identifier.into(),
            name: name.into(),
            port_type,
            default_value: None,
            enabled: true,
            multi_connect: matches!(direction, PortDirection::Output),
            direction,
        }
    }

    /// Create a new input port whose identifier equals its name
    pub fn input(name: impl Into<String>, port_type: PortType) -> Self {
        let name = name.into();
        Self::new(name.clone(), name, port_type, PortDirection::Input)
    }

    /// Create a new output port whose identifier equals its name
    pub fn output(name: impl Into<String>, port_type: PortType) -> Self {
        let name = name.into();
        Self::new(name.clone(), name, port_type, PortDirection::Output)
    }

    /// Override the identifier (for ports sharing a display name)
    pub fn with_identifier(mut self, identifier: impl Into<String>) -> Self {
        self.identifier = identifier.into();
        self
    }

    /// Set the value used while unlinked
    pub fn with_default(mut self, value: PortValue) -> Self {
        self.default_value = Some(value);
        self
    }

    /// Accept multiple incoming connections
    pub fn multi(mut self) -> Self {
        self.multi_connect = true;
        self
    }

    /// Mark the port as disabled
    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    /// Whether a link from this socket to `other` is allowed
    pub fn can_connect(&self, other: &Port) -> bool {
        self.direction != other.direction && self.port_type.can_connect_to(&other.port_type)
    }

    /// Store a new default value, converting it to this port's type.
    ///
    /// Returns `false` when the value cannot represent this port's type.
    pub fn set_default(&mut self, value: PortValue) -> bool {
        if !self.port_type.has_default_value() && self.port_type != PortType::Any {
            return false;
        }
        match value.convert_to(self.port_type) {
            Some(converted) => {
                self.default_value = Some(converted);
                true
            }
            None => false,
        }
    }
}

/// Value that can be stored in a port or a node property
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PortValue {
    /// Boolean
    Bool(bool),
    /// Integer
    Int(i32),
    /// Scalar
    Float(f32),
    /// XYZ
    Vector([f32; 3]),
    /// RGBA
    Color([f32; 4]),
    /// Text, also used for enum-like node settings
    String(String),
    /// Object reference by name, `None` when unset
    Object(Option<String>),
}

impl PortValue {
    /// Socket type that stores this value unconverted
    pub fn port_type(&self) -> PortType {
        match self {
            Self::Bool(_) => PortType::Bool,
            Self::Int(_) => PortType::Int,
            Self::Float(_) => PortType::Float,
            Self::Vector(_) => PortType::Vector,
            Self::Color(_) => PortType::Color,
            Self::String(_) => PortType::String,
            Self::Object(_) => PortType::Object,
        }
    }

    /// Convert to the representation used by `target`, if one exists
    pub fn convert_to(self, target: PortType) -> Option<PortValue> {
        if target == PortType::Any || self.port_type() == target {
            return Some(self);
        }

        let scalar = match &self {
            Self::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            Self::Int(i) => Some(*i as f32),
            Self::Float(f) => Some(*f),
            _ => None,
        };

        match (target, scalar, self) {
            (PortType::Float, Some(s), _) => Some(Self::Float(s)),
            (PortType::Int, Some(s), _) => Some(Self::Int(s.round() as i32)),
            (PortType::Bool, Some(s), _) => Some(Self::Bool(s != 0.0)),
            (PortType::Vector, Some(s), _) => Some(Self::Vector([s; 3])),
            (PortType::Color, Some(s), _) => Some(Self::Color([s, s, s, 1.0])),
            (PortType::Vector, None, Self::Color([r, g, b, _])) => Some(Self::Vector([r, g, b])),
            (PortType::Color, None, Self::Vector([x, y, z])) => Some(Self::Color([x, y, z, 1.0])),
            (PortType::Object, None, Self::String(name)) => Some(Self::Object(Some(name))),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_port_type_compatibility() {
        assert!(PortType::Float.can_connect_to(&PortType::Color));
        assert!(PortType::Image.can_connect_to(&PortType::Color));
        assert!(PortType::Any.can_connect_to(&PortType::Shader));
        assert!(!PortType::Shader.can_connect_to(&PortType::Float));
        assert!(!PortType::Geometry.can_connect_to(&PortType::Image));
    }

    #[test]
    fn test_set_default_converts_scalars() {
        let mut port = Port::input("Size", PortType::Float);
        assert!(port.set_default(PortValue::Int(3)));
        assert_eq!(port.default_value, Some(PortValue::Float(3.0)));

        let mut color = Port::input("Color", PortType::Color);
        assert!(color.set_default(PortValue::Vector([0.1, 0.2, 0.3])));
        assert_eq!(color.default_value, Some(PortValue::Color([0.1, 0.2, 0.3, 1.0])));
    }

    #[test]
    fn test_set_default_rejects_mismatch() {
        let mut port = Port::input("Size", PortType::Float);
        assert!(!port.set_default(PortValue::String("big".to_string())));
        assert!(port.default_value.is_none());

        let mut image = Port::input("Image", PortType::Image);
        assert!(!image.set_default(PortValue::Float(1.0)));
    }
}
