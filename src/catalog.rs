//! The fixed ATGI node type catalog.
//!
//! One row per complex type the registry resolves, naming the attribute and
//! child slots that type is expected to declare. The rows are the registry's
//! build-time expectation list *and* the descriptor table the bundled
//! [`SchemaModel`](crate::SchemaModel) is constructed from; a schema source
//! that disagrees with them is a different schema revision, which
//! [`TypeRegistry::initialize`](crate::TypeRegistry::initialize) reports as a
//! mismatch error.
//!
//! The containment relationships here form a cyclic graph, not a tree:
//! `node` and `joint` elements are admissible under the world, under scenes,
//! under plain nodes and under themselves. Child rows therefore reference
//! their admitted type by name only.

use std::collections::HashMap;

use lazy_static::lazy_static;

use crate::components::{ValueKind, ValueKind as Vk};

/// One expected attribute slot. An empty `name` denotes the simple-content
/// value attribute of the type.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct AttributeSpec {
    pub name: &'static str,
    pub kind: ValueKind,
}

/// One expected child slot, along with the name of the admitted child type.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ChildSpec {
    pub name: &'static str,
    pub type_name: &'static str,
}

/// One expected complex type and its declared slots.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct TypeSpec {
    pub name: &'static str,
    pub attributes: &'static [AttributeSpec],
    pub children: &'static [ChildSpec],
}

/// The single designated document root element and its type.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct RootSpec {
    pub name: &'static str,
    pub type_name: &'static str,
}

/// A complete catalog: the fixed type list plus the root binding.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct SchemaCatalog {
    pub types: &'static [TypeSpec],
    pub root: RootSpec,
}

impl SchemaCatalog {
    /// Finds the row for `name`, if the catalog lists it.
    pub fn type_spec(&self, name: &str) -> Option<&'static TypeSpec> {
        self.types.iter().find(|spec| spec.name == name)
    }
}

const fn attr(name: &'static str, kind: ValueKind) -> AttributeSpec {
    AttributeSpec { name, kind }
}

/// The unnamed simple-content value attribute.
const fn content(kind: ValueKind) -> AttributeSpec {
    AttributeSpec { name: "", kind }
}

const fn child(name: &'static str, type_name: &'static str) -> ChildSpec {
    ChildSpec { name, type_name }
}

/// Transform attributes shared by every placeable scene object. The schema
/// declares them independently per type (flat composition, no extension
/// between the listed types), so each owning type gets its own slot rows.
const TRANSFORM_ATTRIBUTES: &[AttributeSpec] = &[
    attr("name", Vk::String),
    attr("transform", Vk::FloatArray),
    attr("translate", Vk::FloatArray),
    attr("scale", Vk::FloatArray),
    attr("scalePivot", Vk::FloatArray),
    attr("scalePivotTranslation", Vk::FloatArray),
    attr("rotatePivot", Vk::FloatArray),
    attr("rotatePivotTranslation", Vk::FloatArray),
    attr("boundingBox", Vk::FloatArray),
    attr("visibility", Vk::Boolean),
];

const JOINT_ATTRIBUTES: &[AttributeSpec] = &[
    attr("name", Vk::String),
    attr("transform", Vk::FloatArray),
    attr("translate", Vk::FloatArray),
    attr("scale", Vk::FloatArray),
    attr("scalePivot", Vk::FloatArray),
    attr("scalePivotTranslation", Vk::FloatArray),
    attr("rotatePivot", Vk::FloatArray),
    attr("rotatePivotTranslation", Vk::FloatArray),
    attr("boundingBox", Vk::FloatArray),
    attr("visibility", Vk::Boolean),
    attr("scaleCompensate", Vk::Boolean),
];

/// The ATGI catalog.
pub const ATGI: SchemaCatalog = SchemaCatalog {
    root: RootSpec {
        name: "ATG",
        type_name: "worldType",
    },
    types: &[
        TypeSpec {
            name: "worldType",
            attributes: &[attr("name", Vk::String)],
            children: &[
                child("scene", "sceneType"),
                child("node", "nodeType"),
                child("joint", "jointType"),
                child("customData", "customDataType"),
            ],
        },
        TypeSpec {
            name: "sceneType",
            attributes: &[attr("name", Vk::String)],
            children: &[
                child("node", "nodeType"),
                child("joint", "jointType"),
                child("instance", "instanceType"),
                child("lodgroup", "lodgroupType"),
                child("material", "materialType"),
                child("shader", "shaderType"),
                child("texture", "textureType"),
                child("anim", "animType"),
                child("pose", "poseType"),
                child("blendshape", "blendshapeType"),
                child("customData", "customDataType"),
            ],
        },
        TypeSpec {
            name: "nodeType",
            attributes: TRANSFORM_ATTRIBUTES,
            children: &[
                child("rotEul", "rotationType"),
                child("rotAxisEul", "rotationType"),
                child("mesh", "meshType"),
                child("node", "nodeType"),
                child("joint", "jointType"),
                child("instance", "instanceType"),
                child("lodgroup", "lodgroupType"),
                child("customData", "customDataType"),
            ],
        },
        TypeSpec {
            name: "jointType",
            attributes: JOINT_ATTRIBUTES,
            children: &[
                child("rotEul", "rotationType"),
                child("rotAxisEul", "rotationType"),
                child("freedoms", "jointType_freedoms"),
                child("minrotation", "jointType_minrotation"),
                child("maxrotation", "jointType_maxrotation"),
                child("jointOrientEul", "jointType_jointOrientEul"),
                child("mesh", "meshType"),
                child("node", "nodeType"),
                child("joint", "jointType"),
                child("customData", "customDataType"),
            ],
        },
        TypeSpec {
            name: "jointType_freedoms",
            attributes: &[attr("channels", Vk::String)],
            children: &[],
        },
        TypeSpec {
            name: "jointType_minrotation",
            attributes: &[content(Vk::FloatArray), attr("channels", Vk::String)],
            children: &[],
        },
        TypeSpec {
            name: "jointType_maxrotation",
            attributes: &[content(Vk::FloatArray), attr("channels", Vk::String)],
            children: &[],
        },
        TypeSpec {
            name: "jointType_jointOrientEul",
            attributes: &[content(Vk::FloatArray), attr("rotOrd", Vk::String)],
            children: &[],
        },
        TypeSpec {
            name: "rotationType",
            attributes: &[content(Vk::FloatArray), attr("rotOrd", Vk::String)],
            children: &[],
        },
        TypeSpec {
            name: "meshType",
            attributes: &[attr("name", Vk::String), attr("boundingBox", Vk::FloatArray)],
            children: &[
                child("vertexArray", "meshType_vertexArray"),
                child("customData", "customDataType"),
            ],
        },
        TypeSpec {
            name: "meshType_vertexArray",
            attributes: &[],
            children: &[
                child("array", "vertexArray_array"),
                child("primitives", "vertexArray_primitives"),
            ],
        },
        TypeSpec {
            name: "vertexArray_array",
            attributes: &[
                content(Vk::FloatArray),
                attr("name", Vk::String),
                attr("count", Vk::Int),
                attr("stride", Vk::Int),
            ],
            children: &[],
        },
        TypeSpec {
            name: "vertexArray_primitives",
            attributes: &[
                content(Vk::IntArray),
                attr("name", Vk::String),
                attr("sizes", Vk::IntArray),
                attr("type", Vk::String),
                attr("count", Vk::Int),
                attr("shader", Vk::String),
            ],
            children: &[child("binding", "bindingType")],
        },
        TypeSpec {
            name: "bindingType",
            attributes: &[attr("source", Vk::String)],
            children: &[],
        },
        TypeSpec {
            name: "instanceType",
            attributes: &[attr("name", Vk::String), attr("target", Vk::String)],
            children: &[child("customData", "customDataType")],
        },
        TypeSpec {
            name: "lodgroupType",
            attributes: &[attr("name", Vk::String), attr("thresholds", Vk::FloatArray)],
            children: &[
                child("node", "nodeType"),
                child("customData", "customDataType"),
            ],
        },
        TypeSpec {
            name: "materialType",
            attributes: &[attr("name", Vk::String)],
            children: &[
                child("texture", "textureType"),
                child("binding", "bindingType"),
                child("customData", "customDataType"),
            ],
        },
        TypeSpec {
            name: "textureType",
            attributes: &[attr("name", Vk::String), attr("uri", Vk::String)],
            children: &[child("customData", "customDataType")],
        },
        TypeSpec {
            name: "shaderType",
            attributes: &[attr("name", Vk::String)],
            children: &[
                child("binding", "bindingType"),
                child("customData", "customDataType"),
            ],
        },
        TypeSpec {
            name: "animType",
            attributes: &[attr("name", Vk::String)],
            children: &[
                child("animChannel", "animChannelType"),
                child("customData", "customDataType"),
            ],
        },
        TypeSpec {
            name: "animChannelType",
            attributes: &[attr("name", Vk::String), attr("target", Vk::String)],
            children: &[
                child("animData", "animDataType"),
                child("customData", "customDataType"),
            ],
        },
        TypeSpec {
            name: "animDataType",
            attributes: &[attr("keyStride", Vk::Int), attr("interp", Vk::String)],
            children: &[
                child("keyValues", "animData_keyValues"),
                child("keyTimes", "animData_keyTimes"),
            ],
        },
        TypeSpec {
            name: "animData_keyValues",
            attributes: &[content(Vk::FloatArray)],
            children: &[],
        },
        TypeSpec {
            name: "animData_keyTimes",
            attributes: &[content(Vk::FloatArray)],
            children: &[],
        },
        TypeSpec {
            name: "poseType",
            attributes: &[attr("name", Vk::String)],
            children: &[child("element", "poseType_element")],
        },
        TypeSpec {
            name: "poseType_element",
            attributes: &[
                attr("target", Vk::String),
                attr("translate", Vk::FloatArray),
                attr("rotate", Vk::FloatArray),
                attr("scale", Vk::FloatArray),
            ],
            children: &[],
        },
        TypeSpec {
            name: "blendshapeType",
            attributes: &[attr("name", Vk::String), attr("base", Vk::String)],
            children: &[
                child("target", "blendshapeTargetType"),
                child("customData", "customDataType"),
            ],
        },
        TypeSpec {
            name: "blendshapeTargetType",
            attributes: &[attr("name", Vk::String), attr("weight", Vk::Float)],
            children: &[],
        },
        TypeSpec {
            name: "customDataType",
            attributes: &[],
            children: &[child("attribute", "customDataAttributeType")],
        },
        TypeSpec {
            name: "customDataAttributeType",
            attributes: &[
                attr("name", Vk::String),
                attr("type", Vk::String),
                attr("value", Vk::String),
                attr("count", Vk::Int),
                attr("isArray", Vk::Boolean),
            ],
            children: &[],
        },
    ],
};

lazy_static! {
    /// By-name index over the [`ATGI`] rows.
    static ref ATGI_TYPE_INDEX: HashMap<&'static str, &'static TypeSpec> = ATGI
        .types
        .iter()
        .map(|spec| (spec.name, spec))
        .collect();
}

/// Looks up the ATGI catalog row for `name`.
pub fn atgi_type(name: &str) -> Option<&'static TypeSpec> {
    ATGI_TYPE_INDEX.get(name).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_duplicate_type_names() {
        assert_eq!(ATGI_TYPE_INDEX.len(), ATGI.types.len());
    }

    #[test]
    fn child_rows_reference_cataloged_types() {
        for spec in ATGI.types {
            for child in spec.children {
                assert!(
                    ATGI.type_spec(child.type_name).is_some(),
                    "{}/{} references unknown type {}",
                    spec.name,
                    child.name,
                    child.type_name
                );
            }
        }
    }

    #[test]
    fn root_references_cataloged_type() {
        assert!(ATGI.type_spec(ATGI.root.type_name).is_some());
    }

    #[test]
    fn indexed_lookup_agrees_with_linear_lookup() {
        for spec in ATGI.types {
            assert_eq!(atgi_type(spec.name), ATGI.type_spec(spec.name));
        }
        assert_eq!(atgi_type("colladaType"), None);
        assert_eq!(ATGI.type_spec("colladaType"), None);
    }

    #[test]
    fn at_most_one_value_attribute_per_type() {
        for spec in ATGI.types {
            let unnamed = spec.attributes.iter().filter(|a| a.name.is_empty()).count();
            assert!(unnamed <= 1, "{} declares {} value attributes", spec.name, unnamed);
        }
    }

    #[test]
    fn containment_graph_is_cyclic() {
        // jointType admits itself, which is what forces by-name child
        // references instead of eager descriptor links.
        let joint = atgi_type("jointType").unwrap();
        assert!(joint.children.iter().any(|c| c.type_name == "jointType"));
    }
}
