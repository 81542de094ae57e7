//! The nullability marker family.
//!
//! Two groups share one configuration: the compiler-embedded encoding
//! markers under `System.Runtime.CompilerServices`, and the analysis
//! markers under `System.Diagnostics.CodeAnalysis`. All of them are
//! synthesized on demand when the subject image does not already carry a
//! publicly visible descriptor.

use annograft_types::shape::system;
use annograft_types::{MarkerIdentity, MarkerShape, MarkerStrategy, MarkerUsage, TargetMask};

const COMPILER_SERVICES_NS: &str = "System.Runtime.CompilerServices";
const CODE_ANALYSIS_NS: &str = "System.Diagnostics.CodeAnalysis";

pub fn nullable() -> MarkerIdentity {
    MarkerIdentity::new(COMPILER_SERVICES_NS, "NullableAttribute")
}

pub fn nullable_context() -> MarkerIdentity {
    MarkerIdentity::new(COMPILER_SERVICES_NS, "NullableContextAttribute")
}

pub fn nullable_public_only() -> MarkerIdentity {
    MarkerIdentity::new(COMPILER_SERVICES_NS, "NullablePublicOnlyAttribute")
}

pub fn allow_null() -> MarkerIdentity {
    MarkerIdentity::new(CODE_ANALYSIS_NS, "AllowNullAttribute")
}

pub fn disallow_null() -> MarkerIdentity {
    MarkerIdentity::new(CODE_ANALYSIS_NS, "DisallowNullAttribute")
}

pub fn does_not_return() -> MarkerIdentity {
    MarkerIdentity::new(CODE_ANALYSIS_NS, "DoesNotReturnAttribute")
}

pub fn does_not_return_if() -> MarkerIdentity {
    MarkerIdentity::new(CODE_ANALYSIS_NS, "DoesNotReturnIfAttribute")
}

pub fn maybe_null() -> MarkerIdentity {
    MarkerIdentity::new(CODE_ANALYSIS_NS, "MaybeNullAttribute")
}

pub fn maybe_null_when() -> MarkerIdentity {
    MarkerIdentity::new(CODE_ANALYSIS_NS, "MaybeNullWhenAttribute")
}

pub fn not_null() -> MarkerIdentity {
    MarkerIdentity::new(CODE_ANALYSIS_NS, "NotNullAttribute")
}

pub fn not_null_if_not_null() -> MarkerIdentity {
    MarkerIdentity::new(CODE_ANALYSIS_NS, "NotNullIfNotNullAttribute")
}

pub fn not_null_when() -> MarkerIdentity {
    MarkerIdentity::new(CODE_ANALYSIS_NS, "NotNullWhenAttribute")
}

/// The full nullability configuration: every marker identity the transplant
/// understands, each with a synthesis shape matching its reference
/// declaration.
pub fn nullability_generation() -> Vec<(MarkerIdentity, MarkerStrategy)> {
    let member_slots = TargetMask::FIELD | TargetMask::PARAMETER | TargetMask::PROPERTY;
    let value_slots =
        TargetMask::FIELD | TargetMask::PARAMETER | TargetMask::PROPERTY | TargetMask::RETURN_VALUE;

    vec![
        // Compiler encoding markers. No usage restriction is declared on
        // these; the compiler places them wherever the encoding demands.
        (
            nullable(),
            synthesized(
                MarkerShape::with_constructors(vec![
                    vec![system::byte()],
                    vec![system::byte_array()],
                ])
                .embedded(),
            ),
        ),
        (
            nullable_context(),
            synthesized(MarkerShape::with_constructors(vec![vec![system::byte()]]).embedded()),
        ),
        (
            nullable_public_only(),
            synthesized(MarkerShape::with_constructors(vec![vec![system::boolean()]]).embedded()),
        ),
        // Analysis markers.
        (
            allow_null(),
            synthesized(MarkerShape::parameterless().usage(MarkerUsage::targets(member_slots))),
        ),
        (
            disallow_null(),
            synthesized(MarkerShape::parameterless().usage(MarkerUsage::targets(member_slots))),
        ),
        (
            does_not_return(),
            synthesized(
                MarkerShape::parameterless().usage(MarkerUsage::targets(TargetMask::METHOD)),
            ),
        ),
        (
            does_not_return_if(),
            synthesized(
                MarkerShape::with_constructors(vec![vec![system::boolean()]])
                    .usage(MarkerUsage::targets(TargetMask::PARAMETER)),
            ),
        ),
        (
            maybe_null(),
            synthesized(MarkerShape::parameterless().usage(MarkerUsage::targets(value_slots))),
        ),
        (
            maybe_null_when(),
            synthesized(
                MarkerShape::with_constructors(vec![vec![system::boolean()]])
                    .usage(MarkerUsage::targets(TargetMask::PARAMETER)),
            ),
        ),
        (
            not_null(),
            synthesized(MarkerShape::parameterless().usage(MarkerUsage::targets(value_slots))),
        ),
        (
            not_null_if_not_null(),
            synthesized(
                MarkerShape::with_constructors(vec![vec![system::string()]])
                    .usage(
                        MarkerUsage::targets(
                            TargetMask::PARAMETER | TargetMask::PROPERTY | TargetMask::RETURN_VALUE,
                        )
                        .allow_multiple(),
                    ),
            ),
        ),
        (
            not_null_when(),
            synthesized(
                MarkerShape::with_constructors(vec![vec![system::boolean()]])
                    .usage(MarkerUsage::targets(TargetMask::PARAMETER)),
            ),
        ),
    ]
}

fn synthesized(shape: MarkerShape) -> MarkerStrategy {
    MarkerStrategy::Synthesized(shape)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generation_covers_all_identities() {
        let config = nullability_generation();
        assert_eq!(config.len(), 12);

        let identities: Vec<&MarkerIdentity> = config.iter().map(|(id, _)| id).collect();
        assert!(identities.contains(&&nullable()));
        assert!(identities.contains(&&disallow_null()));
        assert!(identities.contains(&&not_null_when()));
    }

    #[test]
    fn test_encoding_markers_are_embedded() {
        let config = nullability_generation();
        for (identity, strategy) in &config {
            let MarkerStrategy::Synthesized(shape) = strategy else {
                panic!("nullability markers are all synthesized");
            };
            let embedded_expected = identity.namespace == COMPILER_SERVICES_NS;
            assert_eq!(shape.embedded, embedded_expected, "{}", identity);
        }
    }

    #[test]
    fn test_not_null_if_not_null_allows_multiple() {
        let config = nullability_generation();
        let (_, strategy) = config
            .iter()
            .find(|(id, _)| *id == not_null_if_not_null())
            .unwrap();
        let MarkerStrategy::Synthesized(shape) = strategy else {
            panic!("synthesized");
        };
        let usage = shape.usage.unwrap();
        assert!(usage.allow_multiple);
        assert!(usage.targets.contains(TargetMask::RETURN_VALUE));
    }
}
