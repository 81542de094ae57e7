use serde::{Deserialize, Serialize};

use crate::marker::MarkerIdentity;
use crate::shape::TypeShape;

/// A positional annotation argument value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ArgValue {
    Boolean(bool),
    Byte(u8),
    Int32(i32),
    String(String),
    ByteArray(Vec<u8>),
}

/// A typed positional argument: the declared argument shape plus the value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotationArgument {
    pub ty: TypeShape,
    pub value: ArgValue,
}

impl AnnotationArgument {
    pub fn new(ty: TypeShape, value: ArgValue) -> Self {
        Self { ty, value }
    }
}

/// A named (field- or property-valued) argument. Instances carrying any of
/// these are outside the supported surface and are ignored by the
/// transplanter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedArgument {
    pub name: String,
    pub argument: AnnotationArgument,
}

/// One application of a marker to a declaration: the marker's identity, the
/// constructor signature actually used, and the ordered positional argument
/// values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotationInstance {
    pub marker: MarkerIdentity,
    /// Ordered positional parameter shapes of the constructor bound to this
    /// instance.
    pub constructor_sig: Vec<TypeShape>,
    pub arguments: Vec<AnnotationArgument>,
    pub named_arguments: Vec<NamedArgument>,
}

impl AnnotationInstance {
    /// An instance bound to the parameterless constructor.
    pub fn new(marker: MarkerIdentity) -> Self {
        Self {
            marker,
            constructor_sig: Vec::new(),
            arguments: Vec::new(),
            named_arguments: Vec::new(),
        }
    }

    /// An instance with the given positional arguments; the constructor
    /// signature is taken from the argument shapes.
    pub fn with_arguments(marker: MarkerIdentity, arguments: Vec<AnnotationArgument>) -> Self {
        let constructor_sig = arguments.iter().map(|a| a.ty.clone()).collect();
        Self {
            marker,
            constructor_sig,
            arguments,
            named_arguments: Vec::new(),
        }
    }

    pub fn with_named_argument(mut self, name: impl Into<String>, argument: AnnotationArgument) -> Self {
        self.named_arguments.push(NamedArgument {
            name: name.into(),
            argument,
        });
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::system;

    #[test]
    fn test_with_arguments_derives_signature() {
        let marker = MarkerIdentity::new("System.Diagnostics.CodeAnalysis", "NotNullWhenAttribute");
        let instance = AnnotationInstance::with_arguments(
            marker,
            vec![AnnotationArgument::new(
                system::boolean(),
                ArgValue::Boolean(true),
            )],
        );
        assert_eq!(instance.constructor_sig, vec![system::boolean()]);
        assert!(instance.named_arguments.is_empty());
    }

    #[test]
    fn test_named_argument_attaches() {
        let marker = MarkerIdentity::new("N", "MAttribute");
        let instance = AnnotationInstance::new(marker).with_named_argument(
            "Extra",
            AnnotationArgument::new(system::int32(), ArgValue::Int32(3)),
        );
        assert_eq!(instance.named_arguments.len(), 1);
        assert_eq!(instance.named_arguments[0].name, "Extra");
    }
}
