use annograft_core::markers::{nullability_generation, reference_assembly_generation};
use annograft_core::{AnnotateOptions, MarkerRegistry, RunReport};
use annograft_types::shape::system;
use annograft_types::{
    AnnotationArgument, AnnotationInstance, ArgValue, Image, MarkerIdentity, MethodDef,
    ParameterDef, ReturnSlot, TypeShape,
};

/// Registry loaded with the full nullability configuration.
#[allow(dead_code)]
pub fn nullability_registry() -> MarkerRegistry {
    MarkerRegistry::new(nullability_generation())
}

/// Registry loaded with the nullability and reference-assembly
/// configurations together, as a production run would be.
#[allow(dead_code)]
pub fn full_registry() -> MarkerRegistry {
    let mut config = nullability_generation();
    config.extend(reference_assembly_generation());
    MarkerRegistry::new(config)
}

/// A method with positionally named parameters and a void return.
#[allow(dead_code)]
pub fn method(name: &str, params: Vec<TypeShape>) -> MethodDef {
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

/// A parameterless marker instance.
#[allow(dead_code)]
pub fn instance(identity: MarkerIdentity) -> AnnotationInstance {
    AnnotationInstance::new(identity)
}

/// A marker instance with a single boolean argument.
#[allow(dead_code)]
pub fn bool_instance(identity: MarkerIdentity, value: bool) -> AnnotationInstance {
    AnnotationInstance::with_arguments(
        identity,
        vec![AnnotationArgument::new(
            system::boolean(),
            ArgValue::Boolean(value),
        )],
    )
}

/// Run the full annotation pass with default options, panicking on error.
#[allow(dead_code)]
pub fn annotate(subject: &mut Image, donor: &Image, registry: &MarkerRegistry) -> RunReport {
    annograft_core::annotate_image(subject, donor, registry, &AnnotateOptions::default())
        .expect("annotation run should succeed")
}
