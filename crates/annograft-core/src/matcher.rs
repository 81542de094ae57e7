//! Counterpart search across the two images.
//!
//! Walks outward from a subject declaration and finds its structural
//! counterpart in the donor image using the equivalence predicates. The
//! matcher never mutates either image and reports ambiguity as data; the
//! traversal driver decides fatality per declaration kind.

use std::collections::HashMap;

use tracing::info;

use annograft_types::{Image, MethodDef, TypeDef, TypeId};

use crate::equivalence::{
    method_hash, methods_equivalent, properties_equivalent, type_defs_equivalent,
};

/// Outcome of a counterpart search for one declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchResult<T> {
    /// Exactly one counterpart.
    Unique(T),
    /// No counterpart — expected drift between the two compilations.
    None,
    /// More than one counterpart; all candidates are reported.
    Ambiguous(Vec<T>),
}

impl<T> MatchResult<T> {
    fn from_candidates(mut candidates: Vec<T>) -> Self {
        match candidates.len() {
            0 => MatchResult::None,
            1 => MatchResult::Unique(candidates.remove(0)),
            _ => MatchResult::Ambiguous(candidates),
        }
    }
}

/// Find the donor counterpart of a subject type declaration.
///
/// Nested types resolve their declaring type first; a declaring type
/// without a counterpart prunes the search entirely (the nested name is
/// never looked up independently). Top-level types go through the donor's
/// lookup table, then its forwarded/exported table; a forward whose
/// resolution failed is logged and treated as no counterpart. Whatever
/// candidate is found must still pass full definition equivalence,
/// including generic arity.
pub fn find_type(subject: &Image, sid: TypeId, donor: &Image) -> Option<TypeId> {
    let ty = subject.get(sid);

    if let Some(declaring) = ty.declaring {
        let donor_declaring = find_type(subject, declaring, donor)?;
        return donor
            .get(donor_declaring)
            .nested
            .iter()
            .copied()
            .find(|&candidate| type_defs_equivalent(subject, sid, donor, candidate));
    }

    let candidate = match donor.lookup(&ty.namespace, &ty.name) {
        Some(id) => Some(id),
        None => find_forwarded(subject, sid, donor),
    }?;

    if !type_defs_equivalent(subject, sid, donor, candidate) {
        return None;
    }

    Some(candidate)
}

/// Scan the donor's exported type table for a name+namespace match and
/// follow the forward. A forward the external resolver could not supply is
/// an informational event, not an error.
fn find_forwarded(subject: &Image, sid: TypeId, donor: &Image) -> Option<TypeId> {
    let ty = subject.get(sid);
    let export = donor
        .exported
        .iter()
        .find(|e| e.name == ty.name && e.namespace == ty.namespace)?;

    match export.target {
        Some(target) => Some(target),
        None => {
            info!(
                type_name = %subject.full_name(sid),
                "cannot find a matching type: forwarded type failed to resolve"
            );
            None
        }
    }
}

/// Find the donor counterpart of a subject method within the matched donor
/// type. Candidates are pre-bucketed by the weak method hash; correctness
/// rests on the full equivalence predicate.
pub fn find_method(subject_method: &MethodDef, donor_type: &TypeDef) -> MatchResult<usize> {
    let mut buckets: HashMap<u64, Vec<usize>> = HashMap::new();
    for (i, method) in donor_type.methods.iter().enumerate() {
        buckets.entry(method_hash(method)).or_default().push(i);
    }

    let candidates = buckets
        .remove(&method_hash(subject_method))
        .unwrap_or_default()
        .into_iter()
        .filter(|&i| methods_equivalent(subject_method, &donor_type.methods[i]))
        .collect();

    MatchResult::from_candidates(candidates)
}

/// Find the donor counterpart of a subject property within the matched
/// donor type. Ambiguity is reported as data; the caller applies the
/// configured property-ambiguity policy.
pub fn find_property(
    subject_type: &TypeDef,
    property_index: usize,
    donor_type: &TypeDef,
) -> MatchResult<usize> {
    let property = &subject_type.properties[property_index];
    let candidates = donor_type
        .properties
        .iter()
        .enumerate()
        .filter(|(_, candidate)| {
            properties_equivalent(subject_type, property, donor_type, candidate)
        })
        .map(|(i, _)| i)
        .collect();

    MatchResult::from_candidates(candidates)
}

/// Find the donor counterpart of a subject field. Fields are matched by
/// name alone — a deliberately weaker rule, since field shapes rarely need
/// disambiguation.
pub fn find_field(name: &str, donor_type: &TypeDef) -> Option<usize> {
    donor_type.fields.iter().position(|f| f.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use annograft_types::shape::system;
    use annograft_types::{ExportedType, ParameterDef, ReturnSlot, TypeDef};

    fn method(name: &str, params: Vec<annograft_types::TypeShape>) -> MethodDef {
        MethodDef::new(
            name,
            params
                .into_iter()
                .enumerate()
                .map(|(i, ty)| ParameterDef::new(format!("p{}", i), ty))
                .collect(),
            ReturnSlot::void(),
        )
    }

    #[test]
    fn test_find_type_by_lookup_table() {
        let mut subject = Image::new("subject");
        let sid = subject.add_type(TypeDef::new("N", "Widget"));

        let mut donor = Image::new("donor");
        let did = donor.add_type(TypeDef::new("N", "Widget"));

        assert_eq!(find_type(&subject, sid, &donor), Some(did));
    }

    #[test]
    fn test_find_type_rejects_arity_mismatch() {
        let mut subject = Image::new("subject");
        let sid = subject.add_type(TypeDef::new("N", "Widget"));

        let mut donor = Image::new("donor");
        donor.add_type(
            TypeDef::new("N", "Widget")
                .generic(vec![annograft_types::GenericParamDef::new("T")]),
        );

        assert_eq!(find_type(&subject, sid, &donor), None);
    }

    #[test]
    fn test_nested_type_pruned_when_parent_unmatched() {
        let mut subject = Image::new("subject");
        let outer = subject.add_type(TypeDef::new("N", "Outer"));
        let inner = subject.add_nested_type(outer, TypeDef::new("", "Inner"));

        // The donor has no Outer, but does define a top-level Inner that a
        // direct search would wrongly find.
        let mut donor = Image::new("donor");
        donor.add_type(TypeDef::new("", "Inner"));

        assert_eq!(find_type(&subject, inner, &donor), None);
    }

    #[test]
    fn test_forwarded_type_followed_when_resolved() {
        let mut subject = Image::new("subject");
        let sid = subject.add_type(TypeDef::new("N", "Moved"));

        let mut donor = Image::new("donor");
        let target = donor.add_type(TypeDef::new("N2", "MovedImpl"));
        // Identity inside the donor's own type table differs; the export
        // entry is what carries the (namespace, name) the subject knows.
        donor.get_mut(target).namespace = "N".to_string();
        donor.get_mut(target).name = "Moved".to_string();
        donor.exported.push(ExportedType {
            namespace: "N".to_string(),
            name: "Moved".to_string(),
            target: Some(target),
        });

        assert_eq!(find_type(&subject, sid, &donor), Some(target));
    }

    #[test]
    fn test_forwarded_type_resolution_failure_is_none() {
        let mut subject = Image::new("subject");
        let sid = subject.add_type(TypeDef::new("N", "Moved"));

        let mut donor = Image::new("donor");
        donor.exported.push(ExportedType {
            namespace: "N".to_string(),
            name: "Moved".to_string(),
            target: None,
        });

        assert_eq!(find_type(&subject, sid, &donor), None);
    }

    #[test]
    fn test_find_method_unique_none_ambiguous() {
        let mut donor_type = TypeDef::new("N", "Widget");
        donor_type.methods.push(method("M", vec![system::string()]));

        let probe = method("M", vec![system::string()]);
        assert_eq!(find_method(&probe, &donor_type), MatchResult::Unique(0));

        let missing = method("M", vec![system::int32()]);
        assert_eq!(find_method(&missing, &donor_type), MatchResult::None);

        donor_type.methods.push(method("M", vec![system::string()]));
        assert_eq!(
            find_method(&probe, &donor_type),
            MatchResult::Ambiguous(vec![0, 1])
        );
    }

    #[test]
    fn test_find_field_by_name_only() {
        let mut donor_type = TypeDef::new("N", "Widget");
        donor_type
            .fields
            .push(annograft_types::FieldDef::new("count", system::int32()));

        // Shape differences are deliberately ignored for fields.
        assert_eq!(find_field("count", &donor_type), Some(0));
        assert_eq!(find_field("missing", &donor_type), None);
    }
}
