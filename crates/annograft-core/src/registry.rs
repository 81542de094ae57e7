//! Marker descriptor resolution and synthesis.
//!
//! The registry is configured once per run with a strategy per marker
//! identity and hands out the subject image's descriptor for each identity,
//! materializing it on first use when the subject does not already define
//! it. Materialization is append-only and exactly-once per identity per
//! run, guarded by a locked check-then-create cache so concurrent
//! per-top-level-type traversals cannot create duplicates.

use std::collections::HashMap;
use std::sync::Mutex;

use tracing::debug;

use annograft_types::{
    Image, MarkerIdentity, MarkerShape, MarkerStrategy, MethodDef, TypeDef, TypeId,
};

use crate::errors::{AnnotateError, Result};

/// Registry of the well-known marker identities a run understands.
#[derive(Debug)]
pub struct MarkerRegistry {
    strategies: HashMap<MarkerIdentity, MarkerStrategy>,
    cache: Mutex<HashMap<MarkerIdentity, TypeId>>,
}

impl MarkerRegistry {
    pub fn new(config: impl IntoIterator<Item = (MarkerIdentity, MarkerStrategy)>) -> Self {
        Self {
            strategies: config.into_iter().collect(),
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Whether this identity is one of the configured markers of interest.
    pub fn is_of_interest(&self, identity: &MarkerIdentity) -> bool {
        self.strategies.contains_key(identity)
    }

    pub fn identities(&self) -> impl Iterator<Item = &MarkerIdentity> {
        self.strategies.keys()
    }

    /// Resolve the subject image's descriptor for `identity`, materializing
    /// it if the subject does not already define a publicly visible one.
    ///
    /// A descriptor is created at most once per identity per run no matter
    /// how many call sites request it; the cache lock is held across the
    /// whole check-then-create.
    ///
    /// # Errors
    ///
    /// - `UnknownMarker` if the identity has no configured strategy.
    /// - `UnresolvedPredefinedMarker` if a `Predefined` identity does not
    ///   resolve in the subject image.
    pub fn resolve_or_create(&self, identity: &MarkerIdentity, subject: &mut Image) -> Result<TypeId> {
        let mut cache = match self.cache.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        if let Some(&id) = cache.get(identity) {
            return Ok(id);
        }

        let strategy =
            self.strategies
                .get(identity)
                .ok_or_else(|| AnnotateError::UnknownMarker {
                    identity: identity.to_string(),
                })?;

        // A publicly visible descriptor already in the subject is reused
        // unchanged; a duplicate is never synthesized alongside it.
        if let Some(existing) = subject.lookup(&identity.namespace, &identity.name) {
            if subject.get(existing).is_public {
                cache.insert(identity.clone(), existing);
                return Ok(existing);
            }
        }

        let id = match strategy {
            MarkerStrategy::Predefined => {
                return Err(AnnotateError::UnresolvedPredefinedMarker {
                    identity: identity.to_string(),
                });
            }
            MarkerStrategy::Synthesized(shape) => {
                debug!(marker = %identity, "materializing marker descriptor");
                subject.add_type(materialize(identity, shape))
            }
        };

        cache.insert(identity.clone(), id);
        Ok(id)
    }
}

/// Build a fresh descriptor for a synthesized marker: non-public, sealed,
/// empty-initialized, tagged per the configured shape, with one declared
/// constructor per configured signature.
fn materialize(identity: &MarkerIdentity, shape: &MarkerShape) -> TypeDef {
    let mut ty = TypeDef::new(identity.namespace.clone(), identity.name.clone())
        .non_public()
        .sealed();

    ty.is_embedded = shape.embedded;
    ty.usage = shape.usage;
    ty.methods = shape
        .constructors
        .iter()
        .map(|sig| MethodDef::constructor(sig.clone()))
        .collect();

    ty
}

#[cfg(test)]
mod tests {
    use super::*;
    use annograft_types::shape::system;
    use annograft_types::{MarkerUsage, TargetMask};

    fn test_identity() -> MarkerIdentity {
        MarkerIdentity::new("System.Diagnostics.CodeAnalysis", "NotNullWhenAttribute")
    }

    fn test_shape() -> MarkerShape {
        MarkerShape::with_constructors(vec![vec![system::boolean()]])
            .usage(MarkerUsage::targets(TargetMask::PARAMETER))
    }

    #[test]
    fn test_synthesizes_once_per_identity() {
        let registry = MarkerRegistry::new(vec![(
            test_identity(),
            MarkerStrategy::Synthesized(test_shape()),
        )]);
        let mut subject = Image::new("subject");

        let first = registry.resolve_or_create(&test_identity(), &mut subject).unwrap();
        let second = registry.resolve_or_create(&test_identity(), &mut subject).unwrap();

        assert_eq!(first, second);
        assert_eq!(subject.type_count(), 1);
    }

    #[test]
    fn test_synthesized_descriptor_shape() {
        let registry = MarkerRegistry::new(vec![(
            test_identity(),
            MarkerStrategy::Synthesized(test_shape().embedded()),
        )]);
        let mut subject = Image::new("subject");

        let id = registry.resolve_or_create(&test_identity(), &mut subject).unwrap();
        let ty = subject.get(id);

        assert!(!ty.is_public);
        assert!(ty.is_sealed);
        assert!(ty.is_embedded);
        assert_eq!(ty.usage, Some(MarkerUsage::targets(TargetMask::PARAMETER)));
        assert_eq!(ty.methods.len(), 1);
        assert!(ty.methods[0].is_constructor);
        assert_eq!(ty.methods[0].parameters.len(), 1);
    }

    #[test]
    fn test_reuses_existing_public_descriptor() {
        let registry = MarkerRegistry::new(vec![(
            test_identity(),
            MarkerStrategy::Synthesized(test_shape()),
        )]);
        let mut subject = Image::new("subject");
        let mut existing = TypeDef::new(
            "System.Diagnostics.CodeAnalysis",
            "NotNullWhenAttribute",
        );
        existing.methods.push(MethodDef::constructor(vec![system::boolean()]));
        let existing_id = subject.add_type(existing);

        let resolved = registry.resolve_or_create(&test_identity(), &mut subject).unwrap();

        assert_eq!(resolved, existing_id);
        assert_eq!(subject.type_count(), 1);
    }

    #[test]
    fn test_predefined_unresolvable_is_fatal() {
        let registry = MarkerRegistry::new(vec![(test_identity(), MarkerStrategy::Predefined)]);
        let mut subject = Image::new("subject");

        let err = registry
            .resolve_or_create(&test_identity(), &mut subject)
            .unwrap_err();

        assert!(matches!(err, AnnotateError::UnresolvedPredefinedMarker { .. }));
    }

    #[test]
    fn test_unconfigured_identity_is_fatal() {
        let registry = MarkerRegistry::new(Vec::new());
        let mut subject = Image::new("subject");

        let err = registry
            .resolve_or_create(&test_identity(), &mut subject)
            .unwrap_err();

        assert!(matches!(err, AnnotateError::UnknownMarker { .. }));
    }
}
