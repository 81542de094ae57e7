use serde::{Deserialize, Serialize};

/// One dimension of an array shape.
///
/// Bounds are optional because most single-dimensional arrays carry no
/// explicit bounds at all; a multi-dimensional array records a
/// (lower, upper) pair per dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ArrayDimension {
    pub lower: Option<i32>,
    pub upper: Option<i32>,
}

impl ArrayDimension {
    /// An unbounded dimension (no recorded lower or upper bound).
    pub fn unbounded() -> Self {
        Self::default()
    }

    /// A dimension with explicit bounds.
    pub fn bounded(lower: i32, upper: i32) -> Self {
        Self {
            lower: Some(lower),
            upper: Some(upper),
        }
    }
}

/// A structural type reference.
///
/// A `TypeShape` is a value tree: it carries everything that participates
/// in cross-image equivalence (variant tag, names, nesting chain, generic
/// arity, recursive element shapes) and nothing that doesn't (base types,
/// interface lists, member lists, annotations). Two shapes from two
/// independently compiled images can therefore be compared without any
/// shared object identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TypeShape {
    /// A named (possibly nested, possibly generic) type reference.
    Named {
        namespace: String,
        name: String,
        /// Declaring type for nested references; `None` for top-level.
        declaring: Option<Box<TypeShape>>,
        /// Declared generic parameter count. Names are kept plain; arity is
        /// explicit rather than mangled into the name.
        arity: usize,
    },
    /// An array of the element shape with the given dimensions.
    Array {
        element: Box<TypeShape>,
        dimensions: Vec<ArrayDimension>,
    },
    /// An unmanaged pointer to the element shape.
    Pointer { element: Box<TypeShape> },
    /// A by-reference slot of the element shape.
    ByRef { element: Box<TypeShape> },
    /// A generic instantiation of the element with ordered arguments.
    GenericInstance {
        element: Box<TypeShape>,
        arguments: Vec<TypeShape>,
    },
    /// A positional generic parameter slot.
    GenericParameter { index: usize },
}

impl TypeShape {
    /// A top-level non-generic named type.
    pub fn named(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        TypeShape::Named {
            namespace: namespace.into(),
            name: name.into(),
            declaring: None,
            arity: 0,
        }
    }

    /// A top-level generic named type with the given arity.
    pub fn generic_named(
        namespace: impl Into<String>,
        name: impl Into<String>,
        arity: usize,
    ) -> Self {
        TypeShape::Named {
            namespace: namespace.into(),
            name: name.into(),
            declaring: None,
            arity,
        }
    }

    /// A type nested inside `declaring`. Nested names carry no namespace of
    /// their own.
    pub fn nested(declaring: TypeShape, name: impl Into<String>, arity: usize) -> Self {
        TypeShape::Named {
            namespace: String::new(),
            name: name.into(),
            declaring: Some(Box::new(declaring)),
            arity,
        }
    }

    /// A single-dimensional array with no recorded bounds.
    pub fn array(element: TypeShape) -> Self {
        TypeShape::Array {
            element: Box::new(element),
            dimensions: vec![ArrayDimension::unbounded()],
        }
    }

    /// An array with explicit dimensions.
    pub fn array_with_dimensions(element: TypeShape, dimensions: Vec<ArrayDimension>) -> Self {
        TypeShape::Array {
            element: Box::new(element),
            dimensions,
        }
    }

    pub fn pointer(element: TypeShape) -> Self {
        TypeShape::Pointer {
            element: Box::new(element),
        }
    }

    pub fn byref(element: TypeShape) -> Self {
        TypeShape::ByRef {
            element: Box::new(element),
        }
    }

    pub fn generic_instance(element: TypeShape, arguments: Vec<TypeShape>) -> Self {
        TypeShape::GenericInstance {
            element: Box::new(element),
            arguments,
        }
    }

    pub fn generic_parameter(index: usize) -> Self {
        TypeShape::GenericParameter { index }
    }

    /// Human-readable rendering for diagnostics, e.g. `System.String`,
    /// `Outer/Inner`, `System.Int32[]`, `List<T0>`.
    pub fn display_name(&self) -> String {
        match self {
            TypeShape::Named {
                namespace,
                name,
                declaring,
                ..
            } => match declaring {
                Some(parent) => format!("{}/{}", parent.display_name(), name),
                None if namespace.is_empty() => name.clone(),
                None => format!("{}.{}", namespace, name),
            },
            TypeShape::Array {
                element,
                dimensions,
            } => format!(
                "{}[{}]",
                element.display_name(),
                ",".repeat(dimensions.len().saturating_sub(1))
            ),
            TypeShape::Pointer { element } => format!("{}*", element.display_name()),
            TypeShape::ByRef { element } => format!("{}&", element.display_name()),
            TypeShape::GenericInstance { element, arguments } => {
                let args: Vec<String> = arguments.iter().map(|a| a.display_name()).collect();
                format!("{}<{}>", element.display_name(), args.join(","))
            }
            TypeShape::GenericParameter { index } => format!("T{}", index),
        }
    }
}

/// Shapes for the core runtime types the marker configurations reference.
pub mod system {
    use super::TypeShape;

    pub fn boolean() -> TypeShape {
        TypeShape::named("System", "Boolean")
    }

    pub fn byte() -> TypeShape {
        TypeShape::named("System", "Byte")
    }

    pub fn byte_array() -> TypeShape {
        TypeShape::array(byte())
    }

    pub fn int32() -> TypeShape {
        TypeShape::named("System", "Int32")
    }

    pub fn string() -> TypeShape {
        TypeShape::named("System", "String")
    }

    pub fn object() -> TypeShape {
        TypeShape::named("System", "Object")
    }
}
