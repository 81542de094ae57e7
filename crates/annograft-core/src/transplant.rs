//! Marker instance transplanting.
//!
//! Given one matched pair of declarations, strips the subject side's stale
//! marker instances, then copies over every donor instance that survives
//! filtering, rebinding each to a constructor the subject's own descriptor
//! actually declares. The operation is idempotent: rerunning it with the
//! same configuration leaves the subject's annotation lists unchanged.

use tracing::debug;

use annograft_types::{AnnotationArgument, AnnotationInstance, Image, MarkerIdentity, TypeId};

use crate::equivalence::types_equivalent;
use crate::errors::Result;
use crate::registry::MarkerRegistry;
use crate::report::RunReport;

/// Location of one annotation list within the subject image. Indices are
/// stable for the duration of a run: the arena is append-only and member
/// lists are never restructured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnnLoc {
    Assembly,
    Module(usize),
    Type(TypeId),
    Interface(TypeId, usize),
    TypeGenericParam(TypeId, usize),
    Method(TypeId, usize),
    MethodReturn(TypeId, usize),
    MethodParam(TypeId, usize, usize),
    MethodGenericParam(TypeId, usize, usize),
    Property(TypeId, usize),
    PropertyParam(TypeId, usize, usize),
    Field(TypeId, usize),
}

impl AnnLoc {
    fn annotations_mut<'a>(&self, image: &'a mut Image) -> &'a mut Vec<AnnotationInstance> {
        match *self {
            AnnLoc::Assembly => &mut image.assembly_annotations,
            AnnLoc::Module(m) => &mut image.modules[m].annotations,
            AnnLoc::Type(t) => &mut image.get_mut(t).annotations,
            AnnLoc::Interface(t, i) => &mut image.get_mut(t).interfaces[i].annotations,
            AnnLoc::TypeGenericParam(t, i) => &mut image.get_mut(t).generic_params[i].annotations,
            AnnLoc::Method(t, m) => &mut image.get_mut(t).methods[m].annotations,
            AnnLoc::MethodReturn(t, m) => &mut image.get_mut(t).methods[m].return_slot.annotations,
            AnnLoc::MethodParam(t, m, p) => {
                &mut image.get_mut(t).methods[m].parameters[p].annotations
            }
            AnnLoc::MethodGenericParam(t, m, g) => {
                &mut image.get_mut(t).methods[m].generic_params[g].annotations
            }
            AnnLoc::Property(t, p) => &mut image.get_mut(t).properties[p].annotations,
            AnnLoc::PropertyParam(t, p, i) => {
                &mut image.get_mut(t).properties[p].parameters[i].annotations
            }
            AnnLoc::Field(t, f) => &mut image.get_mut(t).fields[f].annotations,
        }
    }
}

const CODE_ANALYSIS_NS: &str = "System.Diagnostics.CodeAnalysis";
const DISALLOW_NULL: &str = "DisallowNullAttribute";
const COLLECTIONS_GENERIC_NS: &str = "System.Collections.Generic";

/// The one standing exclusion: the "must not be absent" nullability marker
/// is never transplanted onto the parameter of `GetHashCode` on the two
/// canonical equality-comparer shapes, because the upstream data source
/// over-annotates that specific well-known signature.
pub fn is_excluded(image: &Image, loc: &AnnLoc, marker: &MarkerIdentity) -> bool {
    if marker.namespace != CODE_ANALYSIS_NS || marker.name != DISALLOW_NULL {
        return false;
    }

    let AnnLoc::MethodParam(type_id, method_index, _) = *loc else {
        return false;
    };

    let ty = image.get(type_id);
    if ty.namespace != COLLECTIONS_GENERIC_NS || ty.generic_params.len() != 1 {
        return false;
    }

    if ty.name != "IEqualityComparer" && ty.name != "EqualityComparer" {
        return false;
    }

    ty.methods[method_index].name == "GetHashCode"
}

/// Transplant the donor annotation list at `loc` onto the subject.
///
/// Phase one strips every subject instance whose identity is a configured
/// marker, plus any instance matched by the exclusion rule, so the
/// operation is idempotent across reruns and marker-generation changes.
/// Phase two copies each surviving donor instance, bound to the matching
/// constructor of the subject's own descriptor; instances with named
/// arguments, excluded instances, and instances with no matching
/// destination constructor are skipped.
///
/// # Errors
///
/// Propagates registry failures (unknown or unresolvable markers); every
/// per-instance condition is recovered locally.
pub fn transplant(
    subject: &mut Image,
    loc: AnnLoc,
    donor_annotations: &[AnnotationInstance],
    registry: &MarkerRegistry,
    report: &mut RunReport,
) -> Result<()> {
    strip_stale(subject, loc, registry, report);

    let mut additions = Vec::new();
    for instance in donor_annotations {
        if !registry.is_of_interest(&instance.marker) {
            continue;
        }

        if !instance.named_arguments.is_empty() {
            report.instances_skipped_named_args += 1;
            continue;
        }

        if is_excluded(subject, &loc, &instance.marker) {
            report.instances_excluded += 1;
            continue;
        }

        let descriptor = registry.resolve_or_create(&instance.marker, subject)?;
        match find_constructor(subject, descriptor, instance) {
            Some(signature) => {
                additions.push(rebind(instance, signature));
                report.instances_copied += 1;
            }
            None => {
                debug!(
                    marker = %instance.marker,
                    "no destination constructor matches the instance arguments; dropping"
                );
                report.instances_dropped_schema_drift += 1;
            }
        }
    }

    loc.annotations_mut(subject).extend(additions);
    Ok(())
}

fn strip_stale(image: &mut Image, loc: AnnLoc, registry: &MarkerRegistry, report: &mut RunReport) {
    // The exclusion check reads the image, so decide first, mutate after.
    let markers: Vec<MarkerIdentity> = loc
        .annotations_mut(image)
        .iter()
        .map(|a| a.marker.clone())
        .collect();
    let stale: Vec<bool> = markers
        .iter()
        .map(|marker| registry.is_of_interest(marker) || is_excluded(image, &loc, marker))
        .collect();

    let list = loc.annotations_mut(image);
    let mut index = 0;
    list.retain(|_| {
        let keep = !stale[index];
        index += 1;
        keep
    });
    report.instances_stripped += stale.iter().filter(|&&s| s).count();
}

/// Find, among the subject descriptor's declared constructors, one whose
/// positional parameter shapes match the instance's actual argument shapes
/// exactly, by count and pairwise equivalence.
fn find_constructor(
    subject: &Image,
    descriptor: TypeId,
    instance: &AnnotationInstance,
) -> Option<Vec<annograft_types::TypeShape>> {
    subject
        .get(descriptor)
        .methods
        .iter()
        .find(|method| {
            method.is_constructor
                && method.parameters.len() == instance.arguments.len()
                && method
                    .parameters
                    .iter()
                    .zip(&instance.arguments)
                    .all(|(param, arg)| types_equivalent(&param.ty, &arg.ty))
        })
        .map(|method| method.parameters.iter().map(|p| p.ty.clone()).collect())
}

/// Build the subject-side instance: argument values are copied positionally
/// and retyped with the destination constructor's parameter shapes.
fn rebind(instance: &AnnotationInstance, signature: Vec<annograft_types::TypeShape>) -> AnnotationInstance {
    let arguments = signature
        .iter()
        .zip(&instance.arguments)
        .map(|(ty, arg)| AnnotationArgument::new(ty.clone(), arg.value.clone()))
        .collect();

    AnnotationInstance {
        marker: instance.marker.clone(),
        constructor_sig: signature,
        arguments,
        named_arguments: Vec::new(),
    }
}
