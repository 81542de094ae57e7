//! Built-in marker configurations.
//!
//! A marker configuration is plain data: the identities a run cares about
//! and the strategy for obtaining each identity's descriptor in the
//! subject image. The engine itself is agnostic to what the markers mean.

pub mod nullability;
pub mod reference_assembly;

pub use nullability::nullability_generation;
pub use reference_assembly::reference_assembly_generation;
