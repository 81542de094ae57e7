use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::annotation::AnnotationInstance;
use crate::marker::{MarkerIdentity, MarkerUsage};
use crate::member::{FieldDef, GenericParamDef, InterfaceImpl, MethodDef, PropertyDef};

/// Index of a type declaration within its owning `Image`. Identifiers are
/// only meaningful within one image; the two images of a run never share
/// them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypeId(pub usize);

/// A type declaration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeDef {
    pub namespace: String,
    pub name: String,
    /// Declaring type for nested declarations.
    pub declaring: Option<TypeId>,
    /// Nested type declarations, in declaration order.
    pub nested: Vec<TypeId>,
    pub is_public: bool,
    pub is_sealed: bool,
    /// Tagged as a compiler-internal embedded implementation detail, set on
    /// synthesized marker descriptors.
    pub is_embedded: bool,
    /// Application restriction recorded on marker descriptors.
    pub usage: Option<MarkerUsage>,
    pub generic_params: Vec<GenericParamDef>,
    pub interfaces: Vec<InterfaceImpl>,
    pub methods: Vec<MethodDef>,
    pub properties: Vec<PropertyDef>,
    pub fields: Vec<FieldDef>,
    pub annotations: Vec<AnnotationInstance>,
}

impl TypeDef {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
            declaring: None,
            nested: Vec::new(),
            is_public: true,
            is_sealed: false,
            is_embedded: false,
            usage: None,
            generic_params: Vec::new(),
            interfaces: Vec::new(),
            methods: Vec::new(),
            properties: Vec::new(),
            fields: Vec::new(),
            annotations: Vec::new(),
        }
    }

    pub fn non_public(mut self) -> Self {
        self.is_public = false;
        self
    }

    pub fn sealed(mut self) -> Self {
        self.is_sealed = true;
        self
    }

    pub fn generic(mut self, params: Vec<GenericParamDef>) -> Self {
        self.generic_params = params;
        self
    }

    /// The (namespace, name) identity of this declaration, as used for
    /// marker lookup.
    pub fn identity(&self) -> MarkerIdentity {
        MarkerIdentity::new(self.namespace.clone(), self.name.clone())
    }
}

/// An entry in the forwarded/exported type table. `target` carries the
/// already-resolved forward destination within this image, or `None` when
/// the external resolver failed to supply it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportedType {
    pub namespace: String,
    pub name: String,
    pub target: Option<TypeId>,
}

/// Module metadata. The type arena conceptually belongs to the main module;
/// extra modules only exist so multi-module inputs can be rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleMeta {
    pub name: String,
    /// Whether the module contains only managed, verifiable code. Mixed-mode
    /// modules make the whole image unsupported input.
    pub pure_managed: bool,
    pub annotations: Vec<AnnotationInstance>,
}

impl ModuleMeta {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            pure_managed: true,
            annotations: Vec::new(),
        }
    }
}

/// An in-memory metadata image: an arena of type declarations plus the
/// assembly- and module-level annotation lists and the exported type table.
///
/// Types are stored in declaration order and addressed by `TypeId`; the
/// arena is append-only within a run (marker synthesis adds descriptors,
/// nothing is ever removed).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Image {
    pub name: String,
    pub assembly_annotations: Vec<AnnotationInstance>,
    pub modules: Vec<ModuleMeta>,
    pub exported: Vec<ExportedType>,
    types: Vec<TypeDef>,
    /// (namespace, name) lookup for top-level declarations. Tuple keys do
    /// not survive JSON maps, so the table serializes as an entry list.
    #[serde(with = "top_level_entries")]
    top_level: HashMap<(String, String), TypeId>,
}

mod top_level_entries {
    use std::collections::HashMap;

    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use super::TypeId;

    pub fn serialize<S: Serializer>(
        map: &HashMap<(String, String), TypeId>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        let mut entries: Vec<(&(String, String), &TypeId)> = map.iter().collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        entries.serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<HashMap<(String, String), TypeId>, D::Error> {
        let entries = Vec::<((String, String), TypeId)>::deserialize(deserializer)?;
        Ok(entries.into_iter().collect())
    }
}

impl Image {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            modules: vec![ModuleMeta::new(format!("{}.dll", name))],
            name,
            assembly_annotations: Vec::new(),
            exported: Vec::new(),
            types: Vec::new(),
            top_level: HashMap::new(),
        }
    }

    /// Append a top-level type declaration and register it in the lookup
    /// table. Returns its id.
    pub fn add_type(&mut self, ty: TypeDef) -> TypeId {
        let id = TypeId(self.types.len());
        self.top_level
            .insert((ty.namespace.clone(), ty.name.clone()), id);
        self.types.push(ty);
        id
    }

    /// Append a type declaration nested inside `declaring`. Nested types do
    /// not appear in the top-level lookup table.
    pub fn add_nested_type(&mut self, declaring: TypeId, mut ty: TypeDef) -> TypeId {
        let id = TypeId(self.types.len());
        ty.declaring = Some(declaring);
        self.types.push(ty);
        self.types[declaring.0].nested.push(id);
        id
    }

    pub fn get(&self, id: TypeId) -> &TypeDef {
        &self.types[id.0]
    }

    pub fn get_mut(&mut self, id: TypeId) -> &mut TypeDef {
        &mut self.types[id.0]
    }

    /// Look up a top-level type by namespace and name.
    pub fn lookup(&self, namespace: &str, name: &str) -> Option<TypeId> {
        self.top_level
            .get(&(namespace.to_string(), name.to_string()))
            .copied()
    }

    /// All type ids, including nested declarations, in declaration order.
    pub fn all_type_ids(&self) -> Vec<TypeId> {
        (0..self.types.len()).map(TypeId).collect()
    }

    pub fn type_count(&self) -> usize {
        self.types.len()
    }

    /// Full diagnostic name of a declaration, nesting rendered with `/`.
    pub fn full_name(&self, id: TypeId) -> String {
        let ty = self.get(id);
        match ty.declaring {
            Some(parent) => format!("{}/{}", self.full_name(parent), ty.name),
            None if ty.namespace.is_empty() => ty.name.clone(),
            None => format!("{}.{}", ty.namespace, ty.name),
        }
    }
}
