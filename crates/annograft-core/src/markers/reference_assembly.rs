//! The reference-assembly marker.
//!
//! An annotated subject describes a reference-only assembly, and consumers
//! expect the assembly-level marker saying so. When this configuration is
//! loaded, the driver guarantees the marker is present on the subject even
//! if the donor never applies it.

use annograft_types::{MarkerIdentity, MarkerShape, MarkerStrategy};

const COMPILER_SERVICES_NS: &str = "System.Runtime.CompilerServices";

pub fn reference_assembly() -> MarkerIdentity {
    MarkerIdentity::new(COMPILER_SERVICES_NS, "ReferenceAssemblyAttribute")
}

/// Configuration entry for the reference-assembly marker: a single
/// parameterless constructor, synthesized when the subject does not already
/// define a publicly visible descriptor.
pub fn reference_assembly_generation() -> Vec<(MarkerIdentity, MarkerStrategy)> {
    vec![(
        reference_assembly(),
        MarkerStrategy::Synthesized(MarkerShape::parameterless()),
    )]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generation_is_parameterless_synthesized() {
        let config = reference_assembly_generation();
        assert_eq!(config.len(), 1);
        assert_eq!(config[0].0, reference_assembly());

        let MarkerStrategy::Synthesized(shape) = &config[0].1 else {
            panic!("the reference-assembly marker is synthesized");
        };
        assert_eq!(shape.constructors, vec![Vec::new()]);
        assert!(!shape.embedded);
        assert!(shape.usage.is_none());
    }
}
