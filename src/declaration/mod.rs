//! Neutral declaration tree for one controller.
//!
//! The extraction pipeline never touches `syn` directly. The [`parser`](crate::parser)
//! lowers a struct and its inherent `impl` blocks into a [`ClassDecl`], which exposes
//! exactly what documentation extraction needs: names, attributes (markers), doc
//! comments, parameter types and return types.

pub mod doc;

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::path::PathBuf;

pub use doc::{DocComment, DocTag};

/// A controller class: a struct together with the methods of its inherent impls.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassDecl {
    /// The struct name
    pub name: String,
    /// Module path the struct lives in (e.g. `crate::api::users`)
    pub package: Option<String>,
    /// Attributes of the struct and of every inherent impl block
    pub attributes: Vec<Attribute>,
    /// Doc comment attached to the struct
    pub doc: Option<DocComment>,
    /// Methods in declaration order
    pub methods: Vec<MethodDecl>,
    /// File the declaration was read from
    pub file: PathBuf,
}

/// One method of a controller.
#[derive(Debug, Clone, PartialEq)]
pub struct MethodDecl {
    pub name: String,
    /// Whether the method is declared `pub`
    pub is_public: bool,
    pub attributes: Vec<Attribute>,
    pub doc: Option<DocComment>,
    /// Formal parameters, receiver excluded
    pub params: Vec<ParamDecl>,
    /// Declared return type; `None` for unit returns
    pub return_type: Option<TypeShape>,
}

/// A formal parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct ParamDecl {
    pub name: String,
    pub ty: TypeShape,
}

/// Declared shape of a type, independent of what it resolves to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TypeShape {
    /// A plain named type without type arguments (`String`, `User`, `i32`)
    Scalar { name: String },
    /// Fixed-size array or slice (`[T; N]`, `[T]`, `&[T]`)
    Array { component: Box<TypeShape> },
    /// A named type with type arguments (`Vec<T>`, `HashMap<K, V>`)
    Generic { name: String, args: Vec<TypeShape> },
}

impl TypeShape {
    /// Create a scalar shape
    pub fn scalar(name: impl Into<String>) -> Self {
        TypeShape::Scalar { name: name.into() }
    }

    /// Create an array shape around a component
    pub fn array(component: TypeShape) -> Self {
        TypeShape::Array {
            component: Box::new(component),
        }
    }

    /// Create a generic shape
    pub fn generic(name: impl Into<String>, args: Vec<TypeShape>) -> Self {
        TypeShape::Generic {
            name: name.into(),
            args,
        }
    }

    /// The outer type name; arrays report the name of their component.
    pub fn name(&self) -> &str {
        match self {
            TypeShape::Scalar { name } | TypeShape::Generic { name, .. } => name,
            TypeShape::Array { component } => component.name(),
        }
    }

    /// Root-level type arguments
    pub fn type_args(&self) -> &[TypeShape] {
        match self {
            TypeShape::Generic { args, .. } => args,
            _ => &[],
        }
    }

    /// Strips array layers, returning the innermost element type.
    pub fn element_type(&self) -> &TypeShape {
        match self {
            TypeShape::Array { component } => component.element_type(),
            other => other,
        }
    }
}

impl fmt::Display for TypeShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeShape::Scalar { name } => write!(f, "{}", name),
            TypeShape::Array { component } => write!(f, "[{}]", component),
            TypeShape::Generic { name, args } => {
                write!(f, "{}<", name)?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", arg)?;
                }
                write!(f, ">")
            }
        }
    }
}

/// An attribute such as `#[api_doc(url = "/x")]` or `#[deprecated]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    /// Last path segment of the attribute (`actix_web::get` is `get`)
    pub name: String,
    pub args: MarkerArgs,
}

impl Attribute {
    /// Attribute without arguments
    pub fn bare(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            args: MarkerArgs::Empty,
        }
    }

    /// Attribute with the given entries
    pub fn with_entries(name: impl Into<String>, entries: Vec<MarkerEntry>) -> Self {
        Self {
            name: name.into(),
            args: MarkerArgs::Entries(entries),
        }
    }

    /// Entries of the attribute, empty when it has none or could not be parsed
    pub fn entries(&self) -> &[MarkerEntry] {
        match &self.args {
            MarkerArgs::Entries(entries) => entries,
            _ => &[],
        }
    }

    /// First unkeyed string entry, e.g. the path in `#[get("/users")]`
    pub fn first_positional_str(&self) -> Option<&str> {
        self.entries().iter().find_map(|entry| match entry {
            MarkerEntry {
                key: None,
                value: MarkerValue::Str(s),
            } => Some(s.as_str()),
            _ => None,
        })
    }

    /// All string values stored under `key`
    pub fn str_values<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.entries().iter().filter_map(move |entry| match entry {
            MarkerEntry {
                key: Some(k),
                value: MarkerValue::Str(s),
            } if k == key => Some(s.as_str()),
            _ => None,
        })
    }
}

/// Arguments of an attribute.
#[derive(Debug, Clone, PartialEq)]
pub enum MarkerArgs {
    /// `#[name]`
    Empty,
    /// `#[name(a, key = b, ...)]`
    Entries(Vec<MarkerEntry>),
    /// Tokens that could not be read as entries, kept verbatim
    Malformed(String),
}

/// One `key = value` or positional entry of an attribute.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerEntry {
    pub key: Option<String>,
    pub value: MarkerValue,
}

impl MarkerEntry {
    pub fn positional(value: MarkerValue) -> Self {
        Self { key: None, value }
    }

    pub fn keyed(key: impl Into<String>, value: MarkerValue) -> Self {
        Self {
            key: Some(key.into()),
            value,
        }
    }
}

/// Value of an attribute entry.
#[derive(Debug, Clone, PartialEq)]
pub enum MarkerValue {
    /// A string literal
    Str(String),
    /// A type reference
    Type(TypeShape),
    /// Any other literal, kept as written
    Other(String),
}

impl MarkerValue {
    /// Short description of the value kind for diagnostics
    pub fn kind(&self) -> &'static str {
        match self {
            MarkerValue::Str(_) => "string literal",
            MarkerValue::Type(_) => "type",
            MarkerValue::Other(_) => "literal",
        }
    }
}

impl ClassDecl {
    /// Create an empty class declaration
    pub fn new(name: impl Into<String>, file: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            package: None,
            attributes: Vec::new(),
            doc: None,
            methods: Vec::new(),
            file: file.into(),
        }
    }

    /// Whether the class carries an attribute with the given name
    pub fn has_attribute(&self, name: &str) -> bool {
        self.attribute(name).is_some()
    }

    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.name == name)
    }

    /// Public methods in declaration order
    pub fn public_methods(&self) -> impl Iterator<Item = &MethodDecl> {
        self.methods.iter().filter(|m| m.is_public)
    }

    /// Checks the structural preconditions extraction relies on.
    pub fn validate(&self) -> Result<()> {
        let invalid = |message: String| Error::InvalidDeclaration {
            class: self.name.clone(),
            message,
        };

        if self.name.trim().is_empty() {
            return Err(invalid("class name is empty".to_string()));
        }

        for method in &self.methods {
            if method.name.trim().is_empty() {
                return Err(invalid("method name is empty".to_string()));
            }

            let mut seen = HashSet::new();
            for param in &method.params {
                if param.name.trim().is_empty() {
                    return Err(invalid(format!(
                        "method {} has a parameter without a name",
                        method.name
                    )));
                }
                if !seen.insert(param.name.as_str()) {
                    return Err(invalid(format!(
                        "method {} declares parameter {} twice",
                        method.name, param.name
                    )));
                }
            }
        }

        Ok(())
    }
}

impl MethodDecl {
    /// Create a public method with no parameters, attributes or return type
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_public: true,
            attributes: Vec::new(),
            doc: None,
            params: Vec::new(),
            return_type: None,
        }
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.attribute(name).is_some()
    }

    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.name == name)
    }
}

impl ParamDecl {
    pub fn new(name: impl Into<String>, ty: TypeShape) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}
