use serde::Serialize;

/// Counters accumulated over one annotation transplant run.
///
/// Every per-symbol recovery (missing counterpart, dropped instance) is
/// counted here so a run's outcome can be inspected without parsing logs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunReport {
    pub types_visited: usize,
    pub types_matched: usize,
    pub types_unmatched: usize,
    /// Types skipped because their identity is itself a configured marker.
    pub types_skipped_markers: usize,
    pub methods_matched: usize,
    pub methods_unmatched: usize,
    pub properties_matched: usize,
    /// Ambiguous property matches resolved by picking the first candidate.
    pub properties_first_pick: usize,
    pub properties_unmatched: usize,
    pub fields_matched: usize,
    pub fields_unmatched: usize,
    /// Instances copied onto the subject.
    pub instances_copied: usize,
    /// Stale subject instances stripped before copying.
    pub instances_stripped: usize,
    /// Donor instances ignored because they carry named arguments.
    pub instances_skipped_named_args: usize,
    /// Donor instances dropped because no destination constructor matched.
    pub instances_dropped_schema_drift: usize,
    /// Donor instances suppressed by the standing exclusion rule.
    pub instances_excluded: usize,
    /// Reference-assembly markers appended by the driver's ensure pass.
    pub assembly_markers_ensured: usize,
}

impl RunReport {
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_serializes_to_json() {
        let mut report = RunReport::new();
        report.types_matched = 2;
        report.instances_copied = 5;

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["types_matched"], 2);
        assert_eq!(json["instances_copied"], 5);
    }
}
