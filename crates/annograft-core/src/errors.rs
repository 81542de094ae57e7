use thiserror::Error;

/// Result type alias using AnnotateError
pub type Result<T> = std::result::Result<T, AnnotateError>;

/// Error taxonomy for an annotation transplant run.
///
/// Per-symbol conditions (missing counterpart, missing constructor shape,
/// unresolvable forward) are recovered locally and never surface here; the
/// variants below are the conditions that abort the whole run.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnnotateError {
    /// The subject image contains a module that is not purely managed code
    #[error("Skipping mixed-mode module '{module}': image is not purely managed")]
    MixedModeModule { module: String },

    /// The subject image has more than one module
    #[error("Image '{image}' has {count} modules; only single-module images are supported")]
    MultiModuleImage { image: String, count: usize },

    /// More than one donor method matched a subject method
    #[error("Cannot find a unique match for '{method}' on type '{type_name}': {} candidates", candidates.len())]
    AmbiguousMethodMatch {
        type_name: String,
        method: String,
        /// Rendered signatures of every ambiguous candidate.
        candidates: Vec<String>,
    },

    /// More than one donor property matched and strict matching was requested
    #[error("Cannot find a unique match for property '{property}' on type '{type_name}': {} candidates", candidates.len())]
    AmbiguousPropertyMatch {
        type_name: String,
        property: String,
        candidates: Vec<String>,
    },

    /// A marker configured as Predefined does not resolve in the subject image
    #[error("Predefined marker '{identity}' could not be resolved in the subject image")]
    UnresolvedPredefinedMarker { identity: String },

    /// The registry was asked for an identity it has no strategy for
    #[error("Marker '{identity}' is not configured in the registry")]
    UnknownMarker { identity: String },
}
