use crate::components::{
    AttributeDeclaration, ComplexTypeDefinition, ElementDeclaration, ElementUse, Ref,
};

/// An already-loaded schema, as consumed by the registry.
///
/// All four operations are synchronous, name-keyed and side-effect-free.
/// `None` means the schema does not define the requested component; the
/// registry turns that into a [mismatch error](crate::SchemaError) naming
/// the absent symbol.
///
/// [`SchemaModel`](crate::SchemaModel) is the in-tree implementation, built
/// from a compact descriptor table. External loaders (for instance one
/// backed by a full XSD parser) can implement this trait instead; the
/// registry never assumes more than these four lookups.
pub trait SchemaSource {
    /// Resolves a top-level complex type by its schema type name.
    fn resolve_type(&self, name: &str) -> Option<Ref<ComplexTypeDefinition>>;

    /// Resolves an attribute declared by `type_def`, by local name. The
    /// empty name resolves the type's simple-content value attribute.
    fn resolve_attribute(
        &self,
        type_def: Ref<ComplexTypeDefinition>,
        local_name: &str,
    ) -> Option<Ref<AttributeDeclaration>>;

    /// Resolves a structural child permitted under `type_def`, by local
    /// element name.
    fn resolve_child(
        &self,
        type_def: Ref<ComplexTypeDefinition>,
        local_name: &str,
    ) -> Option<Ref<ElementUse>>;

    /// Resolves a top-level (document root) element declaration by name.
    fn resolve_root_element(&self, name: &str) -> Option<Ref<ElementDeclaration>>;
}
