//! Node type registry for the ATGI scene-interchange schema.
//!
//! ATGI documents are trees of typed nodes (worlds, scenes, nodes, joints,
//! meshes, animations). This crate builds the read-only registry a DOM layer
//! binds those nodes against: one [`NodeTypeInfo`] per schema complex type,
//! with resolved attribute and child slots, plus the [`RootBinding`] for the
//! `ATG` document root.
//!
//! ```
//! use atgi_schema::{SchemaModel, TypeRegistry};
//!
//! let schema = SchemaModel::atgi();
//! let registry = TypeRegistry::initialize(&schema).unwrap();
//!
//! let node = registry.node_type("nodeType");
//! assert_eq!(node.attribute("translate").kind(), atgi_schema::ValueKind::FloatArray);
//!
//! let mesh = registry.child_type(node.child("mesh"));
//! assert_eq!(mesh.name(), "meshType");
//! ```
//!
//! The registry is fed through the [`SchemaSource`] trait; [`SchemaModel`]
//! is the bundled implementation, constructed at runtime from the descriptor
//! table in [`catalog`].

pub mod catalog;
pub mod error;
pub mod model;
pub mod registry;
pub mod source;

mod components;

pub use components::{
    AttributeDeclaration, ComplexTypeDefinition, ComponentTable, ElementDeclaration, ElementUse,
    Ref, SchemaComponentTable, ValueKind,
};
pub use error::{SchemaError, SlotKind};
pub use model::SchemaModel;
pub use registry::{AttributeSlot, ChildSlot, NodeTypeInfo, RootBinding, TypeRegistry};
pub use source::SchemaSource;
