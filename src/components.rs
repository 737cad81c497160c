use std::fmt;
use std::hash::Hash;
use std::marker::PhantomData;
use std::num::{NonZeroU32, NonZeroUsize};

/// Trait implemented by all concrete schema components.
pub trait Component {
    const DISPLAY_NAME: &'static str;
}

/// Type on which internal component traits are implemented.
///
/// This type is used to prevent leaking internal functions into the [`Component`]
pub struct ComponentTraits;

/// A component referencable via [`Ref`]. Intended for internal use.
pub trait HasArenaContainer<R: Component>: Sized {
    fn get_container_from_construction_component_table(
        table: &ConstructionComponentTable,
    ) -> &[Option<R>];
    fn get_container_from_construction_component_table_mut(
        table: &mut ConstructionComponentTable,
    ) -> &mut Vec<Option<R>>;
    fn get_container_from_schema_component_table(table: &SchemaComponentTable) -> &[R];
}

/// A reference to a [`Component`] stored in a [`ComponentTable`]
pub struct Ref<R>(NonZeroU32, PhantomData<R>)
where
    R: Component,
    ComponentTraits: HasArenaContainer<R>;

impl<R> Ref<R>
where
    R: Component,
    ComponentTraits: HasArenaContainer<R>,
{
    const fn from_inner(inner: NonZeroU32) -> Self {
        Self(inner, PhantomData)
    }

    fn index(self) -> usize {
        let size: NonZeroUsize = self
            .0
            .try_into()
            .expect("Could not convert component reference to usize index");
        usize::from(size) - 1
    }

    pub fn get(self, table: &impl ComponentTable) -> &R {
        table.get(self)
    }
}

// derive(...) does not work if R itself does not derive the trait, even though it is only "used"
// in the PhantomData; hence we have to manually implement required traits for the Ref type.

impl<R> Copy for Ref<R>
where
    R: Component,
    ComponentTraits: HasArenaContainer<R>,
{
}

impl<R> Clone for Ref<R>
where
    R: Component,
    ComponentTraits: HasArenaContainer<R>,
{
    fn clone(&self) -> Self {
        *self
    }
}

impl<R> fmt::Debug for Ref<R>
where
    R: Component,
    ComponentTraits: HasArenaContainer<R>,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "<{} #{}>", R::DISPLAY_NAME, self.0)
    }
}

impl<R> PartialEq for Ref<R>
where
    R: Component,
    ComponentTraits: HasArenaContainer<R>,
{
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl<R> Eq for Ref<R>
where
    R: Component,
    ComponentTraits: HasArenaContainer<R>,
{
}

impl<R> Hash for Ref<R>
where
    R: Component,
    ComponentTraits: HasArenaContainer<R>,
{
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.0.hash(state);
    }
}

/// The value space an attribute's lexical content maps into.
///
/// ATGI carries its bulk geometry and animation data as whitespace-separated
/// primitive arrays in simple element content; those land on the array kinds.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ValueKind {
    String,
    Boolean,
    Int,
    Float,
    IntArray,
    FloatArray,
}

/// Schema Component: Complex Type Definition.
///
/// Carries the resolved attribute and element uses declared by the type, in
/// declaration order. The registry only ever resolves uses by local name, so
/// no content-model structure (particles, compositors) is retained.
#[derive(Debug, Clone, PartialEq)]
pub struct ComplexTypeDefinition {
    pub name: String,
    pub attribute_uses: Vec<Ref<AttributeDeclaration>>,
    pub element_uses: Vec<Ref<ElementUse>>,
}

/// Schema Component: Attribute Declaration, local to one complex type.
///
/// An empty `name` denotes the type's simple-content value attribute (the
/// unnamed slot that holds a primitive array for types like key-value or
/// rotation records).
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeDeclaration {
    pub name: String,
    pub value_kind: ValueKind,
}

/// Schema Component: Element Use, a structural child permitted under one
/// complex type.
///
/// The admitted child type is referenced by name only. The containment graph
/// of ATGI types is cyclic, so the reference is left symbolic and resolved
/// against the catalog on demand.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementUse {
    pub name: String,
    pub type_name: String,
}

/// Schema Component: Element Declaration, a top-level (document root) element.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementDeclaration {
    pub name: String,
    pub type_name: String,
}

/// An arena-like container for various [`Component`]s
pub trait ComponentTable {
    /// Retrieves a component's value by reference from this component table.
    /// This function panics if the component value is not present in the table.
    fn get<R>(&self, ref_: Ref<R>) -> &R
    where
        R: Component,
        ComponentTraits: HasArenaContainer<R>;
}

/// The [component table](ComponentTable) implementation that is used while a
/// schema model is being constructed.
///
/// The individual container `Vec`s contain the components wrapped in `Option`s,
/// since a component's slot may be reserved before its value is known.
#[derive(Default)]
pub struct ConstructionComponentTable {
    complex_type_definitions: Vec<Option<ComplexTypeDefinition>>,
    attribute_declarations: Vec<Option<AttributeDeclaration>>,
    element_uses: Vec<Option<ElementUse>>,
    element_declarations: Vec<Option<ElementDeclaration>>,
}

impl ComponentTable for ConstructionComponentTable {
    fn get<R>(&self, ref_: Ref<R>) -> &R
    where
        R: Component,
        ComponentTraits: HasArenaContainer<R>,
    {
        let container = ComponentTraits::get_container_from_construction_component_table(self);
        container
            .get(ref_.index())
            .expect("Invalid component reference (out-of-bounds)")
            .as_ref()
            .expect("Component is not present")
    }
}

impl ConstructionComponentTable {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Creates a [`Ref`] which points to an absent, reserved slot in the table.
    pub(crate) fn reserve<R>(&mut self) -> Ref<R>
    where
        R: Component,
        ComponentTraits: HasArenaContainer<R>,
    {
        let container = ComponentTraits::get_container_from_construction_component_table_mut(self);

        // Reserve a slot by inserting None
        container.push(None);

        // We use the size for the ref's ID, which is non-zero after the push
        let size = NonZeroUsize::new(container.len()).unwrap();
        let id: NonZeroU32 = size.try_into().expect("ID did not fit into 32-bit integer");

        Ref::from_inner(id)
    }

    /// Inserts the `value` into the slot pointed to by `ref_`. Returns `ref_` for convenience.
    pub(crate) fn insert<R>(&mut self, ref_: Ref<R>, value: R) -> Ref<R>
    where
        R: Component,
        ComponentTraits: HasArenaContainer<R>,
    {
        let container = ComponentTraits::get_container_from_construction_component_table_mut(self);

        let slot = container
            .get_mut(ref_.index())
            .expect("Invalid component reference (out-of-bounds)");

        *slot = Some(value);

        ref_
    }

    /// Shorthand for `insert(reserve(), value)`
    pub(crate) fn create<R>(&mut self, value: R) -> Ref<R>
    where
        R: Component,
        ComponentTraits: HasArenaContainer<R>,
    {
        let ref_ = self.reserve();
        self.insert(ref_, value)
    }

    /// Tries to convert this construction table to a [schema table](`SchemaComponentTable`).
    /// If a component value is absent, `None` is returned instead.
    pub(crate) fn convert_to_schema_table(self) -> Option<SchemaComponentTable> {
        Some(SchemaComponentTable {
            complex_type_definitions: Self::convert_container(self.complex_type_definitions)?,
            attribute_declarations: Self::convert_container(self.attribute_declarations)?,
            element_uses: Self::convert_container(self.element_uses)?,
            element_declarations: Self::convert_container(self.element_declarations)?,
        })
    }

    /// Helper for [`Self::convert_to_schema_table()`]
    fn convert_container<R>(container: Vec<Option<R>>) -> Option<Box<[R]>> {
        let mut result = Vec::<R>::with_capacity(container.len());
        for component in container {
            result.push(component?);
        }
        Some(result.into_boxed_slice())
    }
}

/// The [component table](ComponentTable) implementation that backs a finished
/// schema model.
///
/// Components for which a [`Ref`] exists will always be present in this table.
///
/// Since this table is meant to be read-only, the components are stored in boxed slices, which
/// reduces the struct's size by one pointer per component type compared to the `Vec`-storage used
/// in the [`ConstructionComponentTable`].
#[derive(Debug)]
pub struct SchemaComponentTable {
    complex_type_definitions: Box<[ComplexTypeDefinition]>,
    attribute_declarations: Box<[AttributeDeclaration]>,
    element_uses: Box<[ElementUse]>,
    element_declarations: Box<[ElementDeclaration]>,
}

impl ComponentTable for SchemaComponentTable {
    fn get<R>(&self, ref_: Ref<R>) -> &R
    where
        R: Component,
        ComponentTraits: HasArenaContainer<R>,
    {
        let container = ComponentTraits::get_container_from_schema_component_table(self);
        container
            .get(ref_.index())
            .expect("Invalid component reference (out-of-bounds)")
    }
}

macro_rules! component_impl {
    ($type_name:ty, $display_name:literal, $field_name:ident) => {
        impl Component for $type_name {
            const DISPLAY_NAME: &'static str = $display_name;
        }

        impl HasArenaContainer<$type_name> for ComponentTraits {
            fn get_container_from_construction_component_table(
                table: &ConstructionComponentTable,
            ) -> &[Option<$type_name>] {
                &table.$field_name
            }

            fn get_container_from_construction_component_table_mut(
                table: &mut ConstructionComponentTable,
            ) -> &mut Vec<Option<$type_name>> {
                &mut table.$field_name
            }

            fn get_container_from_schema_component_table(
                table: &SchemaComponentTable,
            ) -> &[$type_name] {
                &table.$field_name
            }
        }
    };
}

component_impl!(
    ComplexTypeDefinition,
    "ComplexTypeDefinition",
    complex_type_definitions
);
component_impl!(
    AttributeDeclaration,
    "AttributeDeclaration",
    attribute_declarations
);
component_impl!(ElementUse, "ElementUse", element_uses);
component_impl!(ElementDeclaration, "ElementDeclaration", element_declarations);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reserve_insert_get_round_trip() {
        let mut table = ConstructionComponentTable::new();

        let ref_ = table.reserve::<AttributeDeclaration>();
        table.insert(
            ref_,
            AttributeDeclaration {
                name: "name".into(),
                value_kind: ValueKind::String,
            },
        );

        assert_eq!(ref_.get(&table).name, "name");
        assert_eq!(ref_.get(&table).value_kind, ValueKind::String);
    }

    #[test]
    fn distinct_creations_yield_distinct_refs() {
        let mut table = ConstructionComponentTable::new();

        let a = table.create(ElementUse {
            name: "node".into(),
            type_name: "nodeType".into(),
        });
        let b = table.create(ElementUse {
            name: "node".into(),
            type_name: "nodeType".into(),
        });

        assert_ne!(a, b);
    }

    #[test]
    fn conversion_fails_with_unpopulated_slot() {
        let mut table = ConstructionComponentTable::new();
        let _hole = table.reserve::<ElementDeclaration>();

        assert!(table.convert_to_schema_table().is_none());
    }

    #[test]
    fn frozen_table_serves_same_refs() {
        let mut table = ConstructionComponentTable::new();
        let ref_ = table.create(ComplexTypeDefinition {
            name: "worldType".into(),
            attribute_uses: Vec::new(),
            element_uses: Vec::new(),
        });

        let frozen = table.convert_to_schema_table().unwrap();
        assert_eq!(ref_.get(&frozen).name, "worldType");
    }
}
