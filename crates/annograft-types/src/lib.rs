//! Core data model shared across the annograft engines
//!
//! This crate provides the in-memory representation of a compiled metadata
//! image and everything attached to it:
//!
//! - **Type shapes**: structural type references compared across images
//! - **Declarations**: types, methods, properties, fields and their slots
//! - **Images**: arena-allocated declaration graphs with lookup tables
//! - **Markers**: well-known annotation identities, shapes and strategies
//! - **Annotation instances**: positional-argument marker applications
//!
//! No engine logic lives here; the matching, registry and transplant
//! engines are in `annograft-core`.

pub mod annotation;
pub mod image;
pub mod marker;
pub mod member;
pub mod shape;

pub use annotation::{AnnotationArgument, AnnotationInstance, ArgValue, NamedArgument};
pub use image::{ExportedType, Image, ModuleMeta, TypeDef, TypeId};
pub use marker::{MarkerIdentity, MarkerShape, MarkerStrategy, MarkerUsage, TargetMask};
pub use member::{
    Accessibility, FieldDef, GenericParamDef, InterfaceImpl, MethodDef, ParameterDef, PropertyDef,
    ReturnSlot,
};
pub use shape::{ArrayDimension, TypeShape};
