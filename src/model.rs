use std::collections::HashMap;

use log::debug;

use crate::catalog::{self, SchemaCatalog};
use crate::components::{
    AttributeDeclaration, ComplexTypeDefinition, ConstructionComponentTable, ElementDeclaration,
    ElementUse, Ref, SchemaComponentTable,
};
use crate::source::SchemaSource;

/// A loaded schema, constructed at runtime from a descriptor table.
///
/// The model owns a frozen component table plus by-name indexes over its
/// top-level types and root elements. It never changes after construction;
/// a [`Ref`] handed out by one of the resolve operations stays valid for the
/// model's whole lifetime.
pub struct SchemaModel {
    components: SchemaComponentTable,
    types: HashMap<String, Ref<ComplexTypeDefinition>>,
    root_elements: HashMap<String, Ref<ElementDeclaration>>,
}

impl SchemaModel {
    /// Builds a model from `catalog` in a single flat pass over its rows.
    ///
    /// Child slots reference their admitted type by name, so no row depends
    /// on another row having been materialized first; the cyclic containment
    /// graph needs no ordering or fixup pass.
    ///
    /// Panics if the catalog lists the same type or root element name twice.
    /// Catalogs are compiled-in tables, so a duplicate is a programming
    /// error, not an input condition.
    pub fn from_catalog(catalog: &SchemaCatalog) -> Self {
        let mut components = ConstructionComponentTable::new();
        let mut types = HashMap::with_capacity(catalog.types.len());
        let mut root_elements = HashMap::new();

        for spec in catalog.types {
            let attribute_uses = spec
                .attributes
                .iter()
                .map(|attr| {
                    components.create(AttributeDeclaration {
                        name: attr.name.into(),
                        value_kind: attr.kind,
                    })
                })
                .collect();
            let element_uses = spec
                .children
                .iter()
                .map(|child| {
                    components.create(ElementUse {
                        name: child.name.into(),
                        type_name: child.type_name.into(),
                    })
                })
                .collect();

            let type_def = components.create(ComplexTypeDefinition {
                name: spec.name.into(),
                attribute_uses,
                element_uses,
            });
            let previous = types.insert(spec.name.to_string(), type_def);
            assert!(previous.is_none(), "duplicate type row {}", spec.name);
        }

        let root = components.create(ElementDeclaration {
            name: catalog.root.name.into(),
            type_name: catalog.root.type_name.into(),
        });
        root_elements.insert(catalog.root.name.to_string(), root);

        debug!(
            "built schema model: {} types, {} root element(s)",
            types.len(),
            root_elements.len()
        );

        let components = components
            .convert_to_schema_table()
            .expect("all component slots are populated on creation");

        Self {
            components,
            types,
            root_elements,
        }
    }

    /// The bundled ATGI schema.
    pub fn atgi() -> Self {
        Self::from_catalog(&catalog::ATGI)
    }

    /// The component table backing this model's [`Ref`]s.
    pub fn components(&self) -> &SchemaComponentTable {
        &self.components
    }
}

impl SchemaSource for SchemaModel {
    fn resolve_type(&self, name: &str) -> Option<Ref<ComplexTypeDefinition>> {
        self.types.get(name).copied()
    }

    fn resolve_attribute(
        &self,
        type_def: Ref<ComplexTypeDefinition>,
        local_name: &str,
    ) -> Option<Ref<AttributeDeclaration>> {
        type_def
            .get(&self.components)
            .attribute_uses
            .iter()
            .copied()
            .find(|use_| use_.get(&self.components).name == local_name)
    }

    fn resolve_child(
        &self,
        type_def: Ref<ComplexTypeDefinition>,
        local_name: &str,
    ) -> Option<Ref<ElementUse>> {
        type_def
            .get(&self.components)
            .element_uses
            .iter()
            .copied()
            .find(|use_| use_.get(&self.components).name == local_name)
    }

    fn resolve_root_element(&self, name: &str) -> Option<Ref<ElementDeclaration>> {
        self.root_elements.get(name).copied()
    }
}
