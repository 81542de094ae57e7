//! The top-down annotation traversal.
//!
//! Walks the whole subject graph — assembly, module, then every type with
//! its members and sub-members — locating each declaration's donor
//! counterpart and transplanting the configured markers onto it before
//! descending. A declaration without a counterpart prunes its entire
//! subtree; a method-match ambiguity is the only per-symbol condition that
//! aborts the run.

use tracing::{debug, info, warn};

use annograft_types::{AnnotationInstance, Image, TypeId};

use crate::equivalence::types_equivalent;
use crate::errors::{AnnotateError, Result};
use crate::markers::reference_assembly::reference_assembly;
use crate::matcher::{self, MatchResult};
use crate::registry::MarkerRegistry;
use crate::report::RunReport;
use crate::transplant::{transplant, AnnLoc};

/// How an ambiguous property match is resolved.
///
/// Method ambiguity is always fatal; property ambiguity historically picked
/// a candidate silently. The policy is explicit and configurable here
/// rather than silently replicated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PropertyAmbiguity {
    /// Deterministically take the first candidate in declaration order.
    #[default]
    FirstCandidate,
    /// Abort the run, like the method rule.
    Fail,
}

/// Options for one annotation transplant run.
#[derive(Debug, Clone, Default)]
pub struct AnnotateOptions {
    pub property_ambiguity: PropertyAmbiguity,
}

/// Annotate the subject image from the donor image.
///
/// The subject's annotation lists and top-level type table are the only
/// state mutated; the donor is read throughout. When the registry carries
/// the reference-assembly marker, its presence at the assembly level is
/// guaranteed even if the donor never applies it. Returns the run's counter
/// report.
///
/// # Errors
///
/// - `MultiModuleImage` / `MixedModeModule` for unsupported subject input.
/// - `AmbiguousMethodMatch` (and `AmbiguousPropertyMatch` under the strict
///   policy) when a unique counterpart cannot be chosen.
/// - Registry configuration failures surfaced from descriptor resolution.
pub fn annotate_image(
    subject: &mut Image,
    donor: &Image,
    registry: &MarkerRegistry,
    options: &AnnotateOptions,
) -> Result<RunReport> {
    if subject.modules.len() != 1 {
        return Err(AnnotateError::MultiModuleImage {
            image: subject.name.clone(),
            count: subject.modules.len(),
        });
    }

    if !subject.modules[0].pure_managed {
        warn!(
            module = %subject.modules[0].name,
            "skipping mixed-mode implementation assembly"
        );
        return Err(AnnotateError::MixedModeModule {
            module: subject.modules[0].name.clone(),
        });
    }

    let mut report = RunReport::new();

    // Snapshot before any transplanting: descriptors the registry appends
    // during the run are never visited.
    let type_ids = subject.all_type_ids();

    transplant(
        subject,
        AnnLoc::Assembly,
        &donor.assembly_annotations,
        registry,
        &mut report,
    )?;
    transplant(
        subject,
        AnnLoc::Module(0),
        &donor.modules[0].annotations,
        registry,
        &mut report,
    )?;

    ensure_reference_assembly_marker(subject, registry, &mut report)?;

    for sid in type_ids {
        annotate_type(subject, donor, sid, registry, options, &mut report)?;
    }

    Ok(report)
}

/// Guarantee the subject carries the assembly-level reference-assembly
/// marker when this run's registry is configured with it. The descriptor is
/// resolved or synthesized like any other marker; a subject already marked
/// is left alone.
fn ensure_reference_assembly_marker(
    subject: &mut Image,
    registry: &MarkerRegistry,
    report: &mut RunReport,
) -> Result<()> {
    let identity = reference_assembly();
    if !registry.is_of_interest(&identity) {
        return Ok(());
    }

    if subject
        .assembly_annotations
        .iter()
        .any(|a| a.marker == identity)
    {
        return Ok(());
    }

    registry.resolve_or_create(&identity, subject)?;
    subject
        .assembly_annotations
        .push(AnnotationInstance::new(identity));
    report.assembly_markers_ensured += 1;
    Ok(())
}

fn annotate_type(
    subject: &mut Image,
    donor: &Image,
    sid: TypeId,
    registry: &MarkerRegistry,
    options: &AnnotateOptions,
    report: &mut RunReport,
) -> Result<()> {
    report.types_visited += 1;

    // The marker descriptors themselves are never annotated from the donor.
    if registry.is_of_interest(&subject.get(sid).identity()) {
        report.types_skipped_markers += 1;
        return Ok(());
    }

    let Some(aid) = matcher::find_type(subject, sid, donor) else {
        report.types_unmatched += 1;
        return Ok(());
    };
    report.types_matched += 1;
    let donor_ty = donor.get(aid);

    transplant(subject, AnnLoc::Type(sid), &donor_ty.annotations, registry, report)?;

    // Interface slots transplant only when an equivalent slot exists on the
    // matched donor type. Duplicate equivalent donor slots are degenerate
    // metadata, but each one's annotations still carry over.
    let interface_count = subject.get(sid).interfaces.len();
    for i in 0..interface_count {
        let shape = subject.get(sid).interfaces[i].interface.clone();
        let mut matched = false;
        let mut combined = Vec::new();
        for candidate in &donor_ty.interfaces {
            if types_equivalent(&shape, &candidate.interface) {
                matched = true;
                combined.extend(candidate.annotations.iter().cloned());
            }
        }
        if matched {
            transplant(
                subject,
                AnnLoc::Interface(sid, i),
                &combined,
                registry,
                report,
            )?;
        }
    }

    // Generic parameter counts are equal by type equivalence.
    let generic_count = subject
        .get(sid)
        .generic_params
        .len()
        .min(donor_ty.generic_params.len());
    for i in 0..generic_count {
        transplant(
            subject,
            AnnLoc::TypeGenericParam(sid, i),
            &donor_ty.generic_params[i].annotations,
            registry,
            report,
        )?;
    }

    annotate_methods(subject, donor_ty, sid, registry, report)?;
    annotate_properties(subject, donor_ty, sid, registry, options, report)?;
    annotate_fields(subject, donor_ty, sid, registry, report)?;

    Ok(())
}

fn annotate_methods(
    subject: &mut Image,
    donor_ty: &annograft_types::TypeDef,
    sid: TypeId,
    registry: &MarkerRegistry,
    report: &mut RunReport,
) -> Result<()> {
    let method_count = subject.get(sid).methods.len();
    for mi in 0..method_count {
        let matched = matcher::find_method(&subject.get(sid).methods[mi], donor_ty);
        let am = match matched {
            MatchResult::None => {
                report.methods_unmatched += 1;
                continue;
            }
            MatchResult::Ambiguous(candidates) => {
                let method = subject.get(sid).methods[mi].signature();
                let type_name = subject.full_name(sid);
                info!(%type_name, %method, "cannot find a unique match; candidates:");
                let rendered: Vec<String> = candidates
                    .iter()
                    .map(|&c| donor_ty.methods[c].signature())
                    .collect();
                for candidate in &rendered {
                    info!("  {}", candidate);
                }
                return Err(AnnotateError::AmbiguousMethodMatch {
                    type_name,
                    method,
                    candidates: rendered,
                });
            }
            MatchResult::Unique(am) => am,
        };
        report.methods_matched += 1;

        let donor_method = &donor_ty.methods[am];
        transplant(
            subject,
            AnnLoc::Method(sid, mi),
            &donor_method.annotations,
            registry,
            report,
        )?;
        transplant(
            subject,
            AnnLoc::MethodReturn(sid, mi),
            &donor_method.return_slot.annotations,
            registry,
            report,
        )?;

        let param_count = subject.get(sid).methods[mi]
            .parameters
            .len()
            .min(donor_method.parameters.len());
        for p in 0..param_count {
            transplant(
                subject,
                AnnLoc::MethodParam(sid, mi, p),
                &donor_method.parameters[p].annotations,
                registry,
                report,
            )?;
        }

        let generic_count = subject.get(sid).methods[mi]
            .generic_params
            .len()
            .min(donor_method.generic_params.len());
        for g in 0..generic_count {
            transplant(
                subject,
                AnnLoc::MethodGenericParam(sid, mi, g),
                &donor_method.generic_params[g].annotations,
                registry,
                report,
            )?;
        }
    }

    Ok(())
}

fn annotate_properties(
    subject: &mut Image,
    donor_ty: &annograft_types::TypeDef,
    sid: TypeId,
    registry: &MarkerRegistry,
    options: &AnnotateOptions,
    report: &mut RunReport,
) -> Result<()> {
    let property_count = subject.get(sid).properties.len();
    for pi in 0..property_count {
        let matched = matcher::find_property(subject.get(sid), pi, donor_ty);
        let ap = match matched {
            MatchResult::None => {
                report.properties_unmatched += 1;
                continue;
            }
            MatchResult::Unique(ap) => {
                report.properties_matched += 1;
                ap
            }
            MatchResult::Ambiguous(candidates) => match options.property_ambiguity {
                PropertyAmbiguity::FirstCandidate => {
                    debug!(
                        type_name = %subject.full_name(sid),
                        property = %subject.get(sid).properties[pi].name,
                        "ambiguous property match; taking the first candidate"
                    );
                    report.properties_matched += 1;
                    report.properties_first_pick += 1;
                    candidates[0]
                }
                PropertyAmbiguity::Fail => {
                    return Err(AnnotateError::AmbiguousPropertyMatch {
                        type_name: subject.full_name(sid),
                        property: subject.get(sid).properties[pi].name.clone(),
                        candidates: candidates
                            .iter()
                            .map(|&c| donor_ty.properties[c].name.clone())
                            .collect(),
                    });
                }
            },
        };

        let donor_property = &donor_ty.properties[ap];
        transplant(
            subject,
            AnnLoc::Property(sid, pi),
            &donor_property.annotations,
            registry,
            report,
        )?;

        let index_count = subject.get(sid).properties[pi]
            .parameters
            .len()
            .min(donor_property.parameters.len());
        for i in 0..index_count {
            transplant(
                subject,
                AnnLoc::PropertyParam(sid, pi, i),
                &donor_property.parameters[i].annotations,
                registry,
                report,
            )?;
        }
    }

    Ok(())
}

fn annotate_fields(
    subject: &mut Image,
    donor_ty: &annograft_types::TypeDef,
    sid: TypeId,
    registry: &MarkerRegistry,
    report: &mut RunReport,
) -> Result<()> {
    let field_count = subject.get(sid).fields.len();
    for fi in 0..field_count {
        let name = subject.get(sid).fields[fi].name.clone();
        match matcher::find_field(&name, donor_ty) {
            Some(af) => {
                report.fields_matched += 1;
                transplant(
                    subject,
                    AnnLoc::Field(sid, fi),
                    &donor_ty.fields[af].annotations,
                    registry,
                    report,
                )?;
            }
            None => report.fields_unmatched += 1,
        }
    }

    Ok(())
}
