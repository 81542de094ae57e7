//! Structural equivalence predicates.
//!
//! Pure, stateless predicates deciding whether two declarations from two
//! independently compiled images are "the same" declaration. Equivalence is
//! a declared-signature-shape relation: base types, implemented interfaces,
//! member lists, parameter names, default values and existing annotations
//! never participate. Compound shapes recurse; named shapes compare nesting,
//! namespace, name (ordinal) and generic arity, nothing else.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use annograft_types::{
    ArrayDimension, Image, MethodDef, PropertyDef, TypeDef, TypeId, TypeShape,
};

/// Exact equality of one array dimension's (lower, upper) bound pair.
pub fn array_dimensions_equivalent(a: &ArrayDimension, b: &ArrayDimension) -> bool {
    a.lower == b.lower && a.upper == b.upper
}

/// Structural equivalence of two type shapes.
///
/// Rules, in precedence order: by-ref against by-ref, pointer against
/// pointer and generic instance against generic instance recurse on their
/// elements (and pairwise on ordered arguments); arrays require the same
/// rank and per-dimension bound equality on top of element equivalence; any
/// cross-variant combination is not equivalent. Named shapes require
/// matching nesting (recursively), exact namespace and name, and equal
/// generic arity.
pub fn types_equivalent(a: &TypeShape, b: &TypeShape) -> bool {
    match (a, b) {
        (TypeShape::ByRef { element: ae }, TypeShape::ByRef { element: be }) => {
            types_equivalent(ae, be)
        }
        (TypeShape::Pointer { element: ae }, TypeShape::Pointer { element: be }) => {
            types_equivalent(ae, be)
        }
        (
            TypeShape::GenericInstance {
                element: ae,
                arguments: aa,
            },
            TypeShape::GenericInstance {
                element: be,
                arguments: ba,
            },
        ) => {
            types_equivalent(ae, be)
                && aa.len() == ba.len()
                && aa.iter().zip(ba).all(|(x, y)| types_equivalent(x, y))
        }
        (
            TypeShape::Array {
                element: ae,
                dimensions: ad,
            },
            TypeShape::Array {
                element: be,
                dimensions: bd,
            },
        ) => {
            ad.len() == bd.len()
                && ad
                    .iter()
                    .zip(bd)
                    .all(|(x, y)| array_dimensions_equivalent(x, y))
                && types_equivalent(ae, be)
        }
        (TypeShape::GenericParameter { index: ai }, TypeShape::GenericParameter { index: bi }) => {
            ai == bi
        }
        (
            TypeShape::Named {
                namespace: ans,
                name: an,
                declaring: ad,
                arity: aa,
            },
            TypeShape::Named {
                namespace: bns,
                name: bn,
                declaring: bd,
                arity: ba,
            },
        ) => {
            let nesting_matches = match (ad, bd) {
                (None, None) => true,
                (Some(x), Some(y)) => types_equivalent(x, y),
                _ => false,
            };
            nesting_matches && ans == bns && an == bn && aa == ba
        }
        _ => false,
    }
}

/// Weak bucketing hash for a type shape.
///
/// Named shapes hash on (declaring hash XOR name hash) when nested, the
/// name hash alone otherwise; compound shapes hash on their element. The
/// hash is intentionally collision-prone: correctness always falls back to
/// [`types_equivalent`], never to the hash alone.
pub fn shape_hash(shape: &TypeShape) -> u64 {
    match shape {
        TypeShape::Named {
            name, declaring, ..
        } => match declaring {
            Some(parent) => shape_hash(parent) ^ str_hash(name),
            None => str_hash(name),
        },
        TypeShape::Array { element, .. }
        | TypeShape::Pointer { element }
        | TypeShape::ByRef { element }
        | TypeShape::GenericInstance { element, .. } => shape_hash(element),
        TypeShape::GenericParameter { index } => *index as u64,
    }
}

/// Structural equivalence of two type declarations from two images: nesting
/// chains must correspond, namespace and name must match exactly, and the
/// generic arities must be equal.
pub fn type_defs_equivalent(
    a_image: &Image,
    a: TypeId,
    b_image: &Image,
    b: TypeId,
) -> bool {
    let at = a_image.get(a);
    let bt = b_image.get(b);

    match (at.declaring, bt.declaring) {
        (None, None) => {}
        (Some(ap), Some(bp)) => {
            if !type_defs_equivalent(a_image, ap, b_image, bp) {
                return false;
            }
        }
        _ => return false,
    }

    if at.namespace != bt.namespace || at.name != bt.name {
        return false;
    }

    at.generic_params.len() == bt.generic_params.len()
}

/// Weak bucketing hash for a type declaration, mirroring [`shape_hash`].
pub fn type_def_hash(image: &Image, id: TypeId) -> u64 {
    let ty = image.get(id);
    match ty.declaring {
        Some(parent) => type_def_hash(image, parent) ^ str_hash(&ty.name),
        None => str_hash(&ty.name),
    }
}

/// Structural equivalence of two method declarations: accessibility class,
/// staticness, name, generic arity, parameter count, return shape, and
/// parameter shapes pairwise in declared order.
pub fn methods_equivalent(a: &MethodDef, b: &MethodDef) -> bool {
    if a.access != b.access || a.is_static != b.is_static {
        return false;
    }

    if a.name != b.name {
        return false;
    }

    if a.generic_params.len() != b.generic_params.len() {
        return false;
    }

    if a.parameters.len() != b.parameters.len() {
        return false;
    }

    if !types_equivalent(&a.return_slot.ty, &b.return_slot.ty) {
        return false;
    }

    a.parameters
        .iter()
        .zip(&b.parameters)
        .all(|(x, y)| types_equivalent(&x.ty, &y.ty))
}

/// Weak bucketing hash for a method: name hash XOR parameter count.
pub fn method_hash(method: &MethodDef) -> u64 {
    str_hash(&method.name) ^ method.parameters.len() as u64
}

/// Structural equivalence of two property declarations.
///
/// The relation is deliberately one-directional: an accessor declared on
/// the left side must have a method-equivalent accessor on the right, but
/// the right side is permitted to declare accessors the left lacks. This
/// tolerates accessor additions between the two compiled versions.
pub fn properties_equivalent(
    a_type: &TypeDef,
    a: &PropertyDef,
    b_type: &TypeDef,
    b: &PropertyDef,
) -> bool {
    if a.name != b.name {
        return false;
    }

    if let Some(getter) = a.getter {
        match b.getter {
            Some(b_getter) => {
                if !methods_equivalent(&a_type.methods[getter], &b_type.methods[b_getter]) {
                    return false;
                }
            }
            None => return false,
        }
    }

    if let Some(setter) = a.setter {
        match b.setter {
            Some(b_setter) => {
                if !methods_equivalent(&a_type.methods[setter], &b_type.methods[b_setter]) {
                    return false;
                }
            }
            None => return false,
        }
    }

    true
}

fn str_hash(s: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    s.hash(&mut hasher);
    hasher.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use annograft_types::shape::system;
    use annograft_types::{ParameterDef, ReturnSlot};

    #[test]
    fn test_byref_only_matches_byref() {
        let byref = TypeShape::byref(system::int32());
        let pointer = TypeShape::pointer(system::int32());

        assert!(types_equivalent(&byref, &byref.clone()));
        assert!(!types_equivalent(&byref, &pointer));
        assert!(!types_equivalent(&byref, &system::int32()));
    }

    #[test]
    fn test_array_rank_is_never_bridged() {
        let rank1 = TypeShape::array(system::int32());
        let rank2 = TypeShape::array_with_dimensions(
            system::int32(),
            vec![ArrayDimension::unbounded(), ArrayDimension::unbounded()],
        );

        assert!(!types_equivalent(&rank1, &rank2));
        assert!(!types_equivalent(&rank2, &rank1));
    }

    #[test]
    fn test_array_bounds_compared_per_dimension() {
        let bounded = TypeShape::array_with_dimensions(
            system::int32(),
            vec![ArrayDimension::bounded(0, 9)],
        );
        let other = TypeShape::array_with_dimensions(
            system::int32(),
            vec![ArrayDimension::bounded(0, 10)],
        );

        assert!(types_equivalent(&bounded, &bounded.clone()));
        assert!(!types_equivalent(&bounded, &other));
    }

    #[test]
    fn test_generic_instance_arguments_ordered() {
        let dict = TypeShape::generic_named("System.Collections.Generic", "Dictionary", 2);
        let a = TypeShape::generic_instance(dict.clone(), vec![system::string(), system::int32()]);
        let b = TypeShape::generic_instance(dict, vec![system::int32(), system::string()]);

        assert!(!types_equivalent(&a, &b));
    }

    #[test]
    fn test_named_arity_mismatch_rejected() {
        let plain = TypeShape::named("N", "Widget");
        let generic = TypeShape::generic_named("N", "Widget", 1);

        assert!(!types_equivalent(&plain, &generic));
    }

    #[test]
    fn test_nesting_must_match_on_both_sides() {
        let nested = TypeShape::nested(TypeShape::named("N", "Outer"), "Inner", 0);
        let top_level = TypeShape::named("", "Inner");

        assert!(!types_equivalent(&nested, &top_level));
        assert!(!types_equivalent(&top_level, &nested));
    }

    #[test]
    fn test_shape_hash_ignores_compound_wrappers() {
        // The weak hash intentionally collides wrappers with their element.
        let int = system::int32();
        assert_eq!(shape_hash(&TypeShape::array(int.clone())), shape_hash(&int));
        assert_eq!(shape_hash(&TypeShape::byref(int.clone())), shape_hash(&int));
    }

    #[test]
    fn test_method_parameter_order_sensitive() {
        let a = MethodDef::new(
            "M",
            vec![
                ParameterDef::new("a", system::string()),
                ParameterDef::new("b", system::int32()),
            ],
            ReturnSlot::void(),
        );
        let b = MethodDef::new(
            "M",
            vec![
                ParameterDef::new("a", system::int32()),
                ParameterDef::new("b", system::string()),
            ],
            ReturnSlot::void(),
        );

        assert!(!methods_equivalent(&a, &b));
    }

    #[test]
    fn test_method_parameter_names_ignored() {
        let a = MethodDef::new(
            "M",
            vec![ParameterDef::new("first", system::string())],
            ReturnSlot::void(),
        );
        let b = MethodDef::new(
            "M",
            vec![ParameterDef::new("renamed", system::string())],
            ReturnSlot::void(),
        );

        assert!(methods_equivalent(&a, &b));
    }

    #[test]
    fn test_method_staticness_and_access_compared() {
        let a = MethodDef::new("M", vec![], ReturnSlot::void());
        let b = MethodDef::new("M", vec![], ReturnSlot::void()).static_method();

        assert!(!methods_equivalent(&a, &b));

        let c = MethodDef::new("M", vec![], ReturnSlot::void())
            .access(annograft_types::Accessibility::Family);
        assert!(!methods_equivalent(&a, &c));
    }
}
