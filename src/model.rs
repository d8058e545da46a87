//! Documentation model produced by extraction.
//!
//! A [`ControllerRecord`] owns its [`RequestRecord`]s, each of which owns its
//! parameters, headers and single [`ResponseRecord`]. Links back to the owning
//! controller and to the matching request of a previous snapshot are plain keys,
//! never shared ownership.

use crate::declaration::TypeShape;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Documentation for one controller.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ControllerRecord {
    pub class_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package_name: Option<String>,
    /// Whether the class itself asks for documentation
    #[serde(default)]
    pub documented: bool,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    /// URL prefix shared by all requests, set by framework hooks
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(default)]
    pub requests: Vec<RequestRecord>,
}

impl ControllerRecord {
    /// An empty record for the named class
    pub fn new(class_name: impl Into<String>) -> Self {
        Self {
            class_name: class_name.into(),
            ..Default::default()
        }
    }

    /// Find a request by the name of its handler method
    pub fn request_by_method(&self, method_name: &str) -> Option<&RequestRecord> {
        self.requests.iter().find(|r| r.method_name == method_name)
    }
}

/// Documentation for one handler method.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestRecord {
    pub method_name: String,
    pub url: String,
    /// HTTP method tokens, insertion ordered and free of duplicates
    #[serde(default)]
    pub methods: Vec<String>,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default)]
    pub deprecated: bool,
    #[serde(default)]
    pub params: Vec<ParamRecord>,
    #[serde(default)]
    pub headers: Vec<HeaderRecord>,
    pub response: ResponseRecord,
    /// Class name of the owning controller
    #[serde(default)]
    pub controller: String,
    /// Matching request in the previous snapshot, if any
    #[serde(skip)]
    pub previous: Option<PreviousRequest>,
    pub change_status: ChangeStatus,
}

/// Documentation for one parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParamRecord {
    pub name: String,
    /// Canonical type; written once and never overwritten
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub type_name: Option<String>,
    #[serde(default)]
    pub description: String,
}

impl ParamRecord {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: None,
            description: String::new(),
        }
    }

    /// Sets the type unless one has already been recorded.
    ///
    /// Returns whether the type was written.
    pub fn set_type_once(&mut self, type_name: impl Into<String>) -> bool {
        if self.type_name.is_some() {
            return false;
        }
        self.type_name = Some(type_name.into());
        true
    }
}

/// A request header expected by a handler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderRecord {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// Documentation for a handler's response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseRecord {
    /// The declared response type as written
    pub type_name: String,
    /// One entry per root-level type argument of the response type
    #[serde(default)]
    pub generics: Vec<GenericRecord>,
    /// Structure of the response type
    pub shape: Shape,
}

/// A root-level type argument of a response type, kept for deferred resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenericRecord {
    /// Source file the argument was declared in
    pub from_file: PathBuf,
    pub type_ref: TypeShape,
}

/// Structural serialization of a resolved type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Shape {
    /// A canonical scalar such as `string` or `long`, or an opaque `object`
    Value { type_name: String },
    /// A list of items
    List { items: Box<Shape> },
    /// A resolved struct with its fields
    Object {
        class_name: String,
        fields: Vec<FieldShape>,
    },
    /// A resolved enum with its variant names
    Enum {
        class_name: String,
        variants: Vec<String>,
    },
    /// A reference back to a type already being resolved
    Cyclic { class_name: String },
}

impl Shape {
    pub fn value(type_name: impl Into<String>) -> Self {
        Shape::Value {
            type_name: type_name.into(),
        }
    }

    pub fn list(items: Shape) -> Self {
        Shape::List {
            items: Box::new(items),
        }
    }
}

/// One field of a resolved struct.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldShape {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub shape: Shape,
}

/// Change of a request relative to the previous snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ChangeStatus {
    /// No request with the same URL existed before
    #[default]
    New,
    /// A request with the same URL existed but differs
    Modified,
    /// A request with the same URL existed and is structurally identical
    Unchanged,
}

/// Position of a request inside a [`Baseline`](crate::change::Baseline).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PreviousRequest {
    pub controller_index: usize,
    pub request_index: usize,
}
