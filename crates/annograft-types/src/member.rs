use serde::{Deserialize, Serialize};

use crate::annotation::AnnotationInstance;
use crate::shape::TypeShape;

/// Member accessibility class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Accessibility {
    Private,
    FamilyAndAssembly,
    Assembly,
    Family,
    FamilyOrAssembly,
    Public,
}

/// A method parameter: name, declared shape, and annotation list. Only the
/// shape participates in equivalence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterDef {
    pub name: String,
    pub ty: TypeShape,
    pub annotations: Vec<AnnotationInstance>,
}

impl ParameterDef {
    pub fn new(name: impl Into<String>, ty: TypeShape) -> Self {
        Self {
            name: name.into(),
            ty,
            annotations: Vec::new(),
        }
    }
}

/// A method's return slot: the declared return shape plus the annotations
/// attached to the return value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReturnSlot {
    pub ty: TypeShape,
    pub annotations: Vec<AnnotationInstance>,
}

impl ReturnSlot {
    pub fn new(ty: TypeShape) -> Self {
        Self {
            ty,
            annotations: Vec::new(),
        }
    }

    /// The `System.Void` return slot.
    pub fn void() -> Self {
        Self::new(TypeShape::named("System", "Void"))
    }
}

/// A generic parameter declaration on a type or method.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenericParamDef {
    pub name: String,
    pub annotations: Vec<AnnotationInstance>,
}

impl GenericParamDef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            annotations: Vec::new(),
        }
    }
}

/// An implemented-interface slot on a type: the interface shape plus the
/// annotations attached to the implementation itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterfaceImpl {
    pub interface: TypeShape,
    pub annotations: Vec<AnnotationInstance>,
}

impl InterfaceImpl {
    pub fn new(interface: TypeShape) -> Self {
        Self {
            interface,
            annotations: Vec::new(),
        }
    }
}

/// A method declaration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodDef {
    pub name: String,
    pub access: Accessibility,
    pub is_static: bool,
    /// Instance constructors participate in matching like any other method
    /// and double as the constructor table of marker descriptors.
    pub is_constructor: bool,
    pub generic_params: Vec<GenericParamDef>,
    pub parameters: Vec<ParameterDef>,
    pub return_slot: ReturnSlot,
    pub annotations: Vec<AnnotationInstance>,
}

impl MethodDef {
    /// A public instance method with the given parameters and return shape.
    pub fn new(name: impl Into<String>, parameters: Vec<ParameterDef>, return_slot: ReturnSlot) -> Self {
        Self {
            name: name.into(),
            access: Accessibility::Public,
            is_static: false,
            is_constructor: false,
            generic_params: Vec::new(),
            parameters,
            return_slot,
            annotations: Vec::new(),
        }
    }

    /// A public instance constructor with the given parameter shapes.
    pub fn constructor(parameter_types: Vec<TypeShape>) -> Self {
        Self {
            name: ".ctor".to_string(),
            access: Accessibility::Public,
            is_static: false,
            is_constructor: true,
            generic_params: Vec::new(),
            parameters: parameter_types
                .into_iter()
                .enumerate()
                .map(|(i, ty)| ParameterDef::new(format!("arg{}", i), ty))
                .collect(),
            return_slot: ReturnSlot::void(),
            annotations: Vec::new(),
        }
    }

    pub fn access(mut self, access: Accessibility) -> Self {
        self.access = access;
        self
    }

    pub fn static_method(mut self) -> Self {
        self.is_static = true;
        self
    }

    pub fn generic(mut self, params: Vec<GenericParamDef>) -> Self {
        self.generic_params = params;
        self
    }

    /// Diagnostic rendering of the declared signature, e.g.
    /// `System.Boolean M(System.String,System.Int32)`.
    pub fn signature(&self) -> String {
        let params: Vec<String> = self.parameters.iter().map(|p| p.ty.display_name()).collect();
        format!(
            "{} {}({})",
            self.return_slot.ty.display_name(),
            self.name,
            params.join(",")
        )
    }
}

/// A property declaration. Accessors are indices into the declaring type's
/// method list, mirroring how the method definitions are shared between the
/// method table and the property table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyDef {
    pub name: String,
    pub getter: Option<usize>,
    pub setter: Option<usize>,
    /// Indexer parameters.
    pub parameters: Vec<ParameterDef>,
    pub annotations: Vec<AnnotationInstance>,
}

impl PropertyDef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            getter: None,
            setter: None,
            parameters: Vec::new(),
            annotations: Vec::new(),
        }
    }

    pub fn with_getter(mut self, method_index: usize) -> Self {
        self.getter = Some(method_index);
        self
    }

    pub fn with_setter(mut self, method_index: usize) -> Self {
        self.setter = Some(method_index);
        self
    }
}

/// A field declaration. Fields are matched by name alone, so only the name
/// participates in equivalence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDef {
    pub name: String,
    pub ty: TypeShape,
    pub annotations: Vec<AnnotationInstance>,
}

impl FieldDef {
    pub fn new(name: impl Into<String>, ty: TypeShape) -> Self {
        Self {
            name: name.into(),
            ty,
            annotations: Vec::new(),
        }
    }
}
