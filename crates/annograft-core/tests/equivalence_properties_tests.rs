//! Property tests over the structural-equivalence predicates.
//!
//! Generates arbitrary (bounded) type shapes and checks the algebraic
//! properties the matcher relies on: equivalence is reflexive and
//! symmetric, and the bucketing hash never separates equivalent shapes.

use annograft_core::equivalence::{shape_hash, types_equivalent};
use annograft_types::TypeShape;
use proptest::prelude::*;

fn shape_strategy() -> impl Strategy<Value = TypeShape> {
    let leaf = prop_oneof![
        ("[A-Z][a-z]{0,5}", "[A-Z][a-z]{0,5}", 0usize..3).prop_map(|(ns, name, arity)| {
            TypeShape::generic_named(ns, name, arity)
        }),
        (0usize..4).prop_map(TypeShape::generic_parameter),
    ];

    leaf.prop_recursive(3, 24, 3, |inner| {
        prop_oneof![
            inner.clone().prop_map(TypeShape::byref),
            inner.clone().prop_map(TypeShape::pointer),
            inner.clone().prop_map(TypeShape::array),
            (inner.clone(), prop::collection::vec(inner, 1..3))
                .prop_map(|(element, arguments)| TypeShape::generic_instance(element, arguments)),
        ]
    })
}

proptest! {
    #[test]
    fn equivalence_is_reflexive(shape in shape_strategy()) {
        prop_assert!(types_equivalent(&shape, &shape));
    }

    #[test]
    fn equivalence_is_symmetric(a in shape_strategy(), b in shape_strategy()) {
        prop_assert_eq!(types_equivalent(&a, &b), types_equivalent(&b, &a));
    }

    #[test]
    fn equivalent_shapes_share_a_bucket(a in shape_strategy(), b in shape_strategy()) {
        // The hash may collide freely; it must never separate equivalents.
        if types_equivalent(&a, &b) {
            prop_assert_eq!(shape_hash(&a), shape_hash(&b));
        }
    }

    #[test]
    fn clone_round_trips_through_equivalence(shape in shape_strategy()) {
        let copy = shape.clone();
        prop_assert!(types_equivalent(&shape, &copy));
        prop_assert_eq!(shape_hash(&shape), shape_hash(&copy));
    }
}
