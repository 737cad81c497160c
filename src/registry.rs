//! The node type registry.
//!
//! [`TypeRegistry::initialize`] resolves the fixed [catalog](crate::catalog)
//! against a [`SchemaSource`] in one flat pass and freezes the result. After
//! that the registry is read-only: consumers look up node types by name and
//! slots by local name, many times, without ever touching the source again.

use std::collections::HashMap;

use log::debug;

use crate::catalog::{self, SchemaCatalog};
use crate::components::{
    AttributeDeclaration, ComplexTypeDefinition, ElementDeclaration, ElementUse, Ref, ValueKind,
};
use crate::error::{SchemaError, SlotKind};
use crate::source::SchemaSource;

/// A resolved attribute slot on one node type.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct AttributeSlot {
    declaration: Ref<AttributeDeclaration>,
    owner: &'static str,
    name: &'static str,
    kind: ValueKind,
}

impl AttributeSlot {
    /// The slot's local name. Empty for the simple-content value attribute.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The value space this slot's content maps into.
    pub fn kind(&self) -> ValueKind {
        self.kind
    }

    /// The name of the node type that declares this slot.
    pub fn owner(&self) -> &'static str {
        self.owner
    }

    /// The underlying schema component.
    pub fn declaration(&self) -> Ref<AttributeDeclaration> {
        self.declaration
    }
}

/// A resolved child slot on one node type.
///
/// The admitted child type is carried by name; resolve it on demand with
/// [`TypeRegistry::child_type`]. Containment in the schema is cyclic, so an
/// eager link from slot to type descriptor is not constructible in a single
/// registration pass.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ChildSlot {
    element_use: Ref<ElementUse>,
    owner: &'static str,
    name: &'static str,
    child_type: &'static str,
}

impl ChildSlot {
    /// The slot's local element name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The name of the node type admitted under this slot.
    pub fn child_type_name(&self) -> &'static str {
        self.child_type
    }

    /// The name of the node type that declares this slot.
    pub fn owner(&self) -> &'static str {
        self.owner
    }

    /// The underlying schema component.
    pub fn element_use(&self) -> Ref<ElementUse> {
        self.element_use
    }
}

/// One node type: its resolved definition plus its slot tables.
#[derive(Debug, PartialEq)]
pub struct NodeTypeInfo {
    name: &'static str,
    definition: Ref<ComplexTypeDefinition>,
    attributes: HashMap<&'static str, AttributeSlot>,
    children: HashMap<&'static str, ChildSlot>,
}

impl NodeTypeInfo {
    /// The schema type name, e.g. `"nodeType"`.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The resolved complex type definition.
    pub fn definition(&self) -> Ref<ComplexTypeDefinition> {
        self.definition
    }

    /// Looks up an attribute slot by local name.
    ///
    /// Panics if the type does not declare the slot. Slot names are
    /// compiled-in constants on the consumer side, so an unknown name is a
    /// programming error; use [`Self::find_attribute`] for names that come
    /// from data.
    pub fn attribute(&self, name: &str) -> &AttributeSlot {
        self.find_attribute(name)
            .unwrap_or_else(|| panic!("node type `{}` has no attribute `{name}`", self.name))
    }

    /// Looks up an attribute slot by local name, or `None`.
    pub fn find_attribute(&self, name: &str) -> Option<&AttributeSlot> {
        self.attributes.get(name)
    }

    /// The simple-content value attribute, for types that carry one.
    pub fn value_attribute(&self) -> Option<&AttributeSlot> {
        self.attributes.get("")
    }

    /// Looks up a child slot by local element name.
    ///
    /// Panics if the type does not declare the slot, like
    /// [`Self::attribute`].
    pub fn child(&self, name: &str) -> &ChildSlot {
        self.find_child(name)
            .unwrap_or_else(|| panic!("node type `{}` has no child `{name}`", self.name))
    }

    /// Looks up a child slot by local element name, or `None`.
    pub fn find_child(&self, name: &str) -> Option<&ChildSlot> {
        self.children.get(name)
    }

    /// Iterates over all attribute slots, in no particular order.
    pub fn attributes(&self) -> impl Iterator<Item = &AttributeSlot> {
        self.attributes.values()
    }

    /// Iterates over all child slots, in no particular order.
    pub fn children(&self) -> impl Iterator<Item = &ChildSlot> {
        self.children.values()
    }
}

/// The designated document root: the element and its aggregate node type.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct RootBinding {
    element: Ref<ElementDeclaration>,
    element_name: &'static str,
    type_name: &'static str,
}

impl RootBinding {
    /// The root element name, `"ATG"` for the bundled catalog.
    pub fn element_name(&self) -> &'static str {
        self.element_name
    }

    /// The name of the root's node type.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// The underlying schema component.
    pub fn element(&self) -> Ref<ElementDeclaration> {
        self.element
    }
}

/// The frozen registry of node types.
#[derive(Debug, PartialEq)]
pub struct TypeRegistry {
    types: HashMap<&'static str, NodeTypeInfo>,
    root: RootBinding,
}

impl TypeRegistry {
    /// Resolves the bundled ATGI catalog against `source`.
    pub fn initialize(source: &impl SchemaSource) -> Result<Self, SchemaError> {
        Self::with_catalog(&catalog::ATGI, source)
    }

    /// Resolves `catalog` against `source`.
    ///
    /// All-or-nothing: the first row or slot the source cannot resolve
    /// aborts the whole build with an error naming the absent symbol, and
    /// no registry is produced. On success every catalog row is present.
    pub fn with_catalog(
        catalog: &SchemaCatalog,
        source: &impl SchemaSource,
    ) -> Result<Self, SchemaError> {
        let mut types = HashMap::with_capacity(catalog.types.len());

        for spec in catalog.types {
            let definition = source
                .resolve_type(spec.name)
                .ok_or(SchemaError::SchemaMismatch { name: spec.name })?;

            let mut attributes = HashMap::with_capacity(spec.attributes.len());
            for attr in spec.attributes {
                let declaration = source.resolve_attribute(definition, attr.name).ok_or(
                    SchemaError::SlotMismatch {
                        type_name: spec.name,
                        kind: SlotKind::Attribute,
                        name: attr.name,
                    },
                )?;
                attributes.insert(
                    attr.name,
                    AttributeSlot {
                        declaration,
                        owner: spec.name,
                        name: attr.name,
                        kind: attr.kind,
                    },
                );
            }

            let mut children = HashMap::with_capacity(spec.children.len());
            for child in spec.children {
                let element_use = source.resolve_child(definition, child.name).ok_or(
                    SchemaError::SlotMismatch {
                        type_name: spec.name,
                        kind: SlotKind::Child,
                        name: child.name,
                    },
                )?;
                children.insert(
                    child.name,
                    ChildSlot {
                        element_use,
                        owner: spec.name,
                        name: child.name,
                        child_type: child.type_name,
                    },
                );
            }

            types.insert(
                spec.name,
                NodeTypeInfo {
                    name: spec.name,
                    definition,
                    attributes,
                    children,
                },
            );
        }

        let element = source
            .resolve_root_element(catalog.root.name)
            .ok_or(SchemaError::SchemaMismatch {
                name: catalog.root.name,
            })?;
        let root = RootBinding {
            element,
            element_name: catalog.root.name,
            type_name: catalog.root.type_name,
        };

        debug!(
            "type registry initialized: {} node types, root element `{}` of type `{}`",
            types.len(),
            root.element_name,
            root.type_name
        );

        Ok(Self { types, root })
    }

    /// Looks up a node type by schema type name.
    ///
    /// Panics if the name is not in the catalog; type names on the consumer
    /// side are compiled-in constants. Use [`Self::find_node_type`] for
    /// names that come from data.
    pub fn node_type(&self, name: &str) -> &NodeTypeInfo {
        self.find_node_type(name)
            .unwrap_or_else(|| panic!("node type `{name}` is not in the catalog"))
    }

    /// Looks up a node type by schema type name, or `None`.
    pub fn find_node_type(&self, name: &str) -> Option<&NodeTypeInfo> {
        self.types.get(name)
    }

    /// Resolves the node type admitted under a child slot.
    pub fn child_type(&self, slot: &ChildSlot) -> &NodeTypeInfo {
        self.node_type(slot.child_type_name())
    }

    /// The document root binding.
    pub fn root(&self) -> &RootBinding {
        &self.root
    }

    /// The node type of the document root.
    pub fn root_type(&self) -> &NodeTypeInfo {
        self.node_type(self.root.type_name)
    }

    /// Iterates over all node types, in no particular order.
    pub fn node_types(&self) -> impl Iterator<Item = &NodeTypeInfo> {
        self.types.values()
    }

    /// The number of node types in the registry.
    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::catalog::{AttributeSpec, RootSpec, TypeSpec};
    use crate::model::SchemaModel;

    fn atgi_registry() -> (SchemaModel, TypeRegistry) {
        let model = SchemaModel::atgi();
        let registry = TypeRegistry::initialize(&model).unwrap();
        (model, registry)
    }

    #[test]
    fn initialization_covers_every_catalog_row() {
        let (_, registry) = atgi_registry();

        assert_eq!(registry.len(), catalog::ATGI.types.len());
        for spec in catalog::ATGI.types {
            let info = registry.node_type(spec.name);
            assert_eq!(info.attributes().count(), spec.attributes.len());
            assert_eq!(info.children().count(), spec.children.len());
        }
    }

    #[test]
    fn slots_carry_catalog_metadata() {
        let (_, registry) = atgi_registry();
        let node = registry.node_type("nodeType");

        let transform = node.attribute("transform");
        assert_eq!(transform.name(), "transform");
        assert_eq!(transform.kind(), ValueKind::FloatArray);
        assert_eq!(transform.owner(), "nodeType");

        let mesh = node.child("mesh");
        assert_eq!(mesh.child_type_name(), "meshType");
        assert_eq!(mesh.owner(), "nodeType");
    }

    #[test]
    fn value_attribute_only_on_simple_content_types() {
        let (_, registry) = atgi_registry();

        let rotation = registry.node_type("rotationType");
        assert_eq!(
            rotation.value_attribute().unwrap().kind(),
            ValueKind::FloatArray
        );

        assert!(registry.node_type("worldType").value_attribute().is_none());
    }

    #[test]
    fn child_types_resolve_lazily_through_cycles() {
        let (_, registry) = atgi_registry();
        let joint = registry.node_type("jointType");

        // A joint admits joints: following the slot must land back on the
        // same descriptor.
        let nested = registry.child_type(joint.child("joint"));
        assert!(std::ptr::eq(nested, joint));

        let node = registry.child_type(joint.child("node"));
        assert_eq!(node.name(), "nodeType");
    }

    #[test]
    fn same_named_slots_on_different_types_do_not_alias() {
        let (_, registry) = atgi_registry();

        let world = registry.node_type("worldType").child("joint");
        let scene = registry.node_type("sceneType").child("joint");
        let joint = registry.node_type("jointType").child("joint");

        // All three admit jointType, but each owner declares its own slot.
        assert_eq!(world.child_type_name(), "jointType");
        assert_ne!(world, scene);
        assert_ne!(world, joint);
        assert_ne!(scene, joint);
    }

    #[test]
    fn root_binding_names_the_world_type() {
        let (_, registry) = atgi_registry();

        assert_eq!(registry.root().element_name(), "ATG");
        assert_eq!(registry.root().type_name(), "worldType");
        assert!(std::ptr::eq(
            registry.root_type(),
            registry.node_type("worldType")
        ));
    }

    #[test]
    fn initialization_is_repeatable() {
        let model = SchemaModel::atgi();
        let first = TypeRegistry::initialize(&model).unwrap();
        let second = TypeRegistry::initialize(&model).unwrap();
        assert_eq!(first, second);
    }

    const WORLD_ONLY: SchemaCatalog = SchemaCatalog {
        root: RootSpec {
            name: "ATG",
            type_name: "worldType",
        },
        types: &[TypeSpec {
            name: "worldType",
            attributes: &[AttributeSpec {
                name: "name",
                kind: ValueKind::String,
            }],
            children: &[],
        }],
    };

    /// A skewed variant of the bundled catalog, for modeling an older schema
    /// revision. Leaked in tests only.
    fn skewed_catalog(map: impl Fn(TypeSpec) -> Option<TypeSpec>) -> SchemaCatalog {
        let types: Vec<TypeSpec> = catalog::ATGI.types.iter().copied().filter_map(map).collect();
        SchemaCatalog {
            types: Box::leak(types.into_boxed_slice()),
            root: catalog::ATGI.root,
        }
    }

    #[test]
    fn missing_type_aborts_with_schema_mismatch() {
        let skewed = skewed_catalog(|spec| (spec.name != "jointType").then_some(spec));
        let source = SchemaModel::from_catalog(&skewed);

        let result = TypeRegistry::initialize(&source);
        assert_eq!(
            result.unwrap_err(),
            SchemaError::SchemaMismatch { name: "jointType" }
        );
    }

    #[test]
    fn missing_attribute_aborts_with_slot_mismatch() {
        const EXPECTS_VERSION: SchemaCatalog = SchemaCatalog {
            root: WORLD_ONLY.root,
            types: &[TypeSpec {
                name: "worldType",
                attributes: &[
                    AttributeSpec {
                        name: "name",
                        kind: ValueKind::String,
                    },
                    AttributeSpec {
                        name: "version",
                        kind: ValueKind::String,
                    },
                ],
                children: &[],
            }],
        };

        let source = SchemaModel::from_catalog(&WORLD_ONLY);
        let result = TypeRegistry::with_catalog(&EXPECTS_VERSION, &source);
        assert_eq!(
            result.unwrap_err(),
            SchemaError::SlotMismatch {
                type_name: "worldType",
                kind: SlotKind::Attribute,
                name: "version",
            }
        );
    }

    #[test]
    fn missing_child_aborts_with_slot_mismatch() {
        let skewed = skewed_catalog(|spec| {
            Some(if spec.name == "meshType" {
                TypeSpec {
                    name: spec.name,
                    attributes: spec.attributes,
                    children: &[],
                }
            } else {
                spec
            })
        });

        let source = SchemaModel::from_catalog(&skewed);
        let result = TypeRegistry::initialize(&source);
        assert_eq!(
            result.unwrap_err(),
            SchemaError::SlotMismatch {
                type_name: "meshType",
                kind: SlotKind::Child,
                name: "vertexArray",
            }
        );
    }

    #[test]
    fn mismatch_errors_name_the_absent_symbol() {
        let skewed = skewed_catalog(|spec| (spec.name != "jointType").then_some(spec));
        let source = SchemaModel::from_catalog(&skewed);
        let error = TypeRegistry::initialize(&source).unwrap_err();
        assert_eq!(
            error.to_string(),
            "schema does not define expected component `jointType`"
        );

        let error = SchemaError::SlotMismatch {
            type_name: "meshType",
            kind: SlotKind::Child,
            name: "vertexArray",
        };
        assert_eq!(
            error.to_string(),
            "type `meshType` is missing expected child `vertexArray`"
        );
    }

    #[test]
    #[should_panic(expected = "is not in the catalog")]
    fn unknown_type_name_panics() {
        let (_, registry) = atgi_registry();
        registry.node_type("colladaType");
    }

    #[test]
    #[should_panic(expected = "has no attribute")]
    fn unknown_attribute_name_panics() {
        let (_, registry) = atgi_registry();
        registry.node_type("worldType").attribute("transform");
    }
}
