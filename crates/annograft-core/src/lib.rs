//! Annotation transplant engines
//!
//! Reconciles two independently compiled metadata images of "the same"
//! library: an unannotated subject image and a richer annotated donor. The
//! engines find structurally corresponding declarations across the two
//! graphs and copy a whitelisted set of annotation markers from the donor
//! onto the subject, synthesizing the marker descriptors themselves when
//! the subject does not define them.
//!
//! - [`equivalence`] — pure structural-equivalence predicates
//! - [`matcher`] — counterpart search, returning [`matcher::MatchResult`]
//! - [`registry`] — resolve-or-synthesize marker descriptors, exactly once
//! - [`transplant`] — strip-then-copy of marker instances per matched pair
//! - [`annotate`] — the top-down traversal driving the engines
//! - [`markers`] — ready-made marker configurations
//!
//! All file, path and serialization handling is an external collaborator;
//! the entry point [`annotate::annotate_image`] takes two in-memory
//! [`annograft_types::Image`] graphs and mutates the subject in place.

pub mod annotate;
pub mod equivalence;
pub mod errors;
pub mod logging;
pub mod markers;
pub mod matcher;
pub mod registry;
pub mod report;
pub mod transplant;

pub use annotate::{annotate_image, AnnotateOptions, PropertyAmbiguity};
pub use errors::{AnnotateError, Result};
pub use matcher::MatchResult;
pub use registry::MarkerRegistry;
pub use report::RunReport;
