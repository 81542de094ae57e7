use serde::{Deserialize, Serialize};

use crate::shape::TypeShape;

/// The cross-image identity of a marker kind: a (namespace, name) pair,
/// independent of which image defines the descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MarkerIdentity {
    pub namespace: String,
    pub name: String,
}

impl MarkerIdentity {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
        }
    }
}

impl std::fmt::Display for MarkerIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.namespace.is_empty() {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{}.{}", self.namespace, self.name)
        }
    }
}

/// Bitmask of declaration kinds a marker may be applied to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TargetMask(pub u32);

impl TargetMask {
    pub const ASSEMBLY: TargetMask = TargetMask(1);
    pub const MODULE: TargetMask = TargetMask(1 << 1);
    pub const CLASS: TargetMask = TargetMask(1 << 2);
    pub const METHOD: TargetMask = TargetMask(1 << 3);
    pub const PROPERTY: TargetMask = TargetMask(1 << 4);
    pub const FIELD: TargetMask = TargetMask(1 << 5);
    pub const PARAMETER: TargetMask = TargetMask(1 << 6);
    pub const RETURN_VALUE: TargetMask = TargetMask(1 << 7);
    pub const GENERIC_PARAMETER: TargetMask = TargetMask(1 << 8);
    pub const ALL: TargetMask = TargetMask((1 << 9) - 1);

    pub fn contains(self, other: TargetMask) -> bool {
        self.0 & other.0 == other.0
    }
}

impl std::ops::BitOr for TargetMask {
    type Output = TargetMask;

    fn bitor(self, rhs: TargetMask) -> TargetMask {
        TargetMask(self.0 | rhs.0)
    }
}

/// Application restrictions recorded on a marker descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkerUsage {
    pub targets: TargetMask,
    pub allow_multiple: bool,
    pub inherited: bool,
}

impl MarkerUsage {
    /// Usage with the given targets, single application, non-inherited —
    /// the common case for nullability markers.
    pub fn targets(targets: TargetMask) -> Self {
        Self {
            targets,
            allow_multiple: false,
            inherited: false,
        }
    }

    pub fn allow_multiple(mut self) -> Self {
        self.allow_multiple = true;
        self
    }
}

/// The shape a synthesized marker descriptor must take: its constructor
/// signatures (ordered positional parameter shapes), its optional usage
/// restriction, and whether it is tagged as a compiler-internal embedded
/// implementation detail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkerShape {
    pub constructors: Vec<Vec<TypeShape>>,
    pub usage: Option<MarkerUsage>,
    pub embedded: bool,
}

impl MarkerShape {
    /// A shape with a single parameterless constructor.
    pub fn parameterless() -> Self {
        Self {
            constructors: vec![Vec::new()],
            usage: None,
            embedded: false,
        }
    }

    /// A shape with the given constructor signatures.
    pub fn with_constructors(constructors: Vec<Vec<TypeShape>>) -> Self {
        Self {
            constructors,
            usage: None,
            embedded: false,
        }
    }

    pub fn usage(mut self, usage: MarkerUsage) -> Self {
        self.usage = Some(usage);
        self
    }

    pub fn embedded(mut self) -> Self {
        self.embedded = true;
        self
    }
}

/// How the registry obtains a marker descriptor for an identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MarkerStrategy {
    /// A canonical descriptor is assumed to already resolve in the subject
    /// image; failure to resolve it is a fatal configuration error.
    Predefined,
    /// Materialize a descriptor of this shape on demand.
    Synthesized(MarkerShape),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_display() {
        let id = MarkerIdentity::new("System.Diagnostics.CodeAnalysis", "NotNullAttribute");
        assert_eq!(
            id.to_string(),
            "System.Diagnostics.CodeAnalysis.NotNullAttribute"
        );
    }

    #[test]
    fn test_target_mask_contains() {
        let mask = TargetMask::FIELD | TargetMask::PARAMETER | TargetMask::PROPERTY;
        assert!(mask.contains(TargetMask::PARAMETER));
        assert!(!mask.contains(TargetMask::METHOD));
        assert!(TargetMask::ALL.contains(mask));
    }

    #[test]
    fn test_marker_shape_builders() {
        let shape = MarkerShape::parameterless()
            .usage(MarkerUsage::targets(TargetMask::PARAMETER))
            .embedded();
        assert_eq!(shape.constructors, vec![Vec::new()]);
        assert!(shape.embedded);
        assert!(!shape.usage.unwrap().allow_multiple);
    }
}
