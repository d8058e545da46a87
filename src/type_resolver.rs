use crate::declaration::{DocComment, TypeShape};
use crate::model::{FieldShape, GenericRecord, Shape};
use crate::parser::{doc_lines, lower_type, ParsedFile};
use crate::type_normalizer::{self, DEFAULT_COLLECTIONS, OBJECT};
use log::{debug, warn};
use std::collections::HashMap;

/// Resolves the structure of a response type.
///
/// Extraction only knows the declared shape of a return type; an implementation of
/// this trait turns it into a [`Shape`] that documents its fields. Implementations
/// keep no state between calls.
pub trait StructureResolver {
    /// Resolves `ty`. `generics` holds one record per root-level type argument
    /// and supplies the bindings for the root type's own type parameters.
    fn resolve(&self, ty: &TypeShape, generics: &[GenericRecord]) -> Shape;
}

/// Resolver that only normalizes the declared shape and never looks at definitions.
#[derive(Debug, Default, Clone, Copy)]
pub struct DeclaredShapeResolver;

impl StructureResolver for DeclaredShapeResolver {
    fn resolve(&self, ty: &TypeShape, _generics: &[GenericRecord]) -> Shape {
        declared_shape(ty)
    }
}

fn declared_shape(ty: &TypeShape) -> Shape {
    match ty {
        TypeShape::Array { component } => Shape::list(declared_shape(component)),
        TypeShape::Generic { name, args }
            if type_normalizer::is_collection(name, DEFAULT_COLLECTIONS) =>
        {
            Shape::list(args.first().map(declared_shape).unwrap_or_else(|| Shape::value(OBJECT)))
        }
        TypeShape::Generic { name, args } if RESPONSE_WRAPPERS.contains(&name.as_str()) => args
            .first()
            .map(declared_shape)
            .unwrap_or_else(|| Shape::value(OBJECT)),
        other => Shape::value(type_normalizer::canonical(other)),
    }
}

/// Wrappers that document as their first type argument
const RESPONSE_WRAPPERS: &[&str] = &["Option", "Box", "Rc", "Arc", "Cow", "Json", "Result", "Form"];

/// Map types; their keys and values are not documented individually
const MAP_TYPES: &[&str] = &["HashMap", "BTreeMap", "IndexMap", "Value"];

/// Nesting depth after which types are reported as opaque objects
const MAX_DEPTH: usize = 16;

/// Type resolver - resolves struct and enum definitions found in the parsed project
pub struct TypeResolver {
    /// All parsed files of the project
    parsed_files: Vec<ParsedFile>,
    /// Type names documented as lists
    collections: Vec<String>,
}

/// Serde attributes for a field
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SerdeAttributes {
    /// Renamed field name
    pub rename: Option<String>,
    /// Whether to skip this field during serialization
    pub skip: bool,
    /// Whether to flatten this field
    pub flatten: bool,
}

/// Per-call resolution state
struct Resolution {
    /// Types currently being resolved, to detect circular references
    stack: Vec<String>,
}

impl TypeResolver {
    /// Create a new TypeResolver with parsed files
    pub fn new(parsed_files: Vec<ParsedFile>) -> Self {
        debug!("Initializing TypeResolver with {} files", parsed_files.len());
        Self {
            parsed_files,
            collections: DEFAULT_COLLECTIONS.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Use the given collection type names instead of the defaults
    pub fn with_collections(mut self, collections: Vec<String>) -> Self {
        self.collections = collections;
        self
    }

    /// Find a struct definition by name across all parsed files, inline modules included
    pub fn find_struct_definition(&self, name: &str) -> Option<&syn::ItemStruct> {
        debug!("Searching for struct definition: {}", name);
        self.parsed_files.iter().find_map(|parsed_file| {
            find_item(&parsed_file.syntax_tree.items, &|item| match item {
                syn::Item::Struct(item_struct) if item_struct.ident == name => Some(item_struct),
                _ => None,
            })
        })
    }

    /// Find an enum definition by name across all parsed files, inline modules included
    pub fn find_enum_definition(&self, name: &str) -> Option<&syn::ItemEnum> {
        debug!("Searching for enum definition: {}", name);
        self.parsed_files.iter().find_map(|parsed_file| {
            find_item(&parsed_file.syntax_tree.items, &|item| match item {
                syn::Item::Enum(item_enum) if item_enum.ident == name => Some(item_enum),
                _ => None,
            })
        })
    }

    fn resolve_shape(
        &self,
        ty: &TypeShape,
        bindings: &HashMap<String, TypeShape>,
        state: &mut Resolution,
    ) -> Shape {
        if state.stack.len() > MAX_DEPTH {
            warn!("Type nesting too deep, stopping at {}", ty);
            return Shape::value(OBJECT);
        }

        let (name, args) = match ty {
            TypeShape::Array { component } => {
                return Shape::list(self.resolve_shape(component, bindings, state));
            }
            TypeShape::Scalar { name } => (name.as_str(), &[][..]),
            TypeShape::Generic { name, args } => (name.as_str(), args.as_slice()),
        };

        if let Some(bound) = bindings.get(name) {
            return self.resolve_shape(bound, &HashMap::new(), state);
        }

        let resolve_first = |state: &mut Resolution| {
            args.first()
                .map(|arg| self.resolve_shape(arg, bindings, state))
                .unwrap_or_else(|| Shape::value(OBJECT))
        };

        if type_normalizer::is_collection(name, &self.collections) {
            return Shape::list(resolve_first(state));
        }
        if RESPONSE_WRAPPERS.contains(&name) {
            return resolve_first(state);
        }
        if MAP_TYPES.contains(&name) {
            return Shape::value(OBJECT);
        }

        let canonical = type_normalizer::normalize_name(name);
        if canonical != OBJECT {
            return Shape::value(canonical);
        }

        // Resolved arguments are bound before descending, so nested generics see
        // the caller's bindings rather than their own parameter names
        let resolved_args: Vec<TypeShape> =
            args.iter().map(|arg| substitute(arg, bindings)).collect();

        if let Some(item_struct) = self.find_struct_definition(name) {
            if state.stack.iter().any(|s| s == name) {
                warn!("Circular reference detected for type: {}", name);
                return Shape::Cyclic {
                    class_name: name.to_string(),
                };
            }
            state.stack.push(name.to_string());
            let shape = self.struct_shape(item_struct, &resolved_args, state);
            state.stack.pop();
            return shape;
        }

        if let Some(item_enum) = self.find_enum_definition(name) {
            debug!("Parsing enum definition: {}", name);
            return Shape::Enum {
                class_name: name.to_string(),
                variants: item_enum
                    .variants
                    .iter()
                    .map(|v| v.ident.to_string())
                    .collect(),
            };
        }

        debug!("Could not resolve type {}, documenting as object", name);
        Shape::value(OBJECT)
    }

    fn struct_shape(
        &self,
        item_struct: &syn::ItemStruct,
        args: &[TypeShape],
        state: &mut Resolution,
    ) -> Shape {
        let struct_name = item_struct.ident.to_string();
        debug!("Parsing struct definition: {}", struct_name);

        let bindings: HashMap<String, TypeShape> = item_struct
            .generics
            .type_params()
            .map(|param| param.ident.to_string())
            .zip(args.iter().cloned())
            .collect();

        let mut fields = Vec::new();
        if let syn::Fields::Named(named_fields) = &item_struct.fields {
            for field in &named_fields.named {
                let Some(ident) = field.ident.as_ref() else {
                    continue;
                };
                let serde_attrs = Self::parse_serde_attributes(&field.attrs);
                if serde_attrs.skip {
                    continue;
                }

                let shape = self.resolve_shape(&lower_type(&field.ty), &bindings, state);

                let shape = match shape {
                    Shape::Object {
                        fields: inner_fields,
                        ..
                    } if serde_attrs.flatten => {
                        fields.extend(inner_fields);
                        continue;
                    }
                    other => other,
                };

                let description = DocComment::parse(&doc_lines(&field.attrs))
                    .map(|doc| doc.summary)
                    .unwrap_or_default();

                fields.push(FieldShape {
                    name: serde_attrs
                        .rename
                        .unwrap_or_else(|| ident.to_string()),
                    description,
                    shape,
                });
            }
        }

        debug!("Parsed {} fields", fields.len());
        Shape::Object {
            class_name: struct_name,
            fields,
        }
    }

    /// Parse Serde attributes from field attributes
    fn parse_serde_attributes(attrs: &[syn::Attribute]) -> SerdeAttributes {
        let mut serde_attrs = SerdeAttributes::default();

        for attr in attrs {
            if !attr.path().is_ident("serde") {
                continue;
            }

            if let Ok(meta_list) = attr.meta.require_list() {
                let tokens_str = meta_list.tokens.to_string();

                if let Some(value) = Self::extract_rename_value(&tokens_str) {
                    debug!("Found serde rename: {}", value);
                    serde_attrs.rename = Some(value);
                }

                if tokens_str
                    .split(',')
                    .any(|part| matches!(part.trim(), "skip" | "skip_serializing"))
                {
                    serde_attrs.skip = true;
                }

                if tokens_str.contains("flatten") {
                    serde_attrs.flatten = true;
                }
            }
        }

        serde_attrs
    }

    /// Extract rename value from serde attribute tokens
    fn extract_rename_value(tokens_str: &str) -> Option<String> {
        let rename_pos = tokens_str.find("rename")?;
        let after_rename = &tokens_str[rename_pos..];
        // `rename_all` applies to containers, not fields
        if after_rename.starts_with("rename_all") {
            return None;
        }
        let after_eq = &after_rename[after_rename.find('=')? + 1..];
        let after_start = &after_eq[after_eq.find('"')? + 1..];
        let end_quote = after_start.find('"')?;
        Some(after_start[..end_quote].to_string())
    }
}

impl StructureResolver for TypeResolver {
    fn resolve(&self, ty: &TypeShape, generics: &[GenericRecord]) -> Shape {
        debug!("Resolving response type: {}", ty);

        let root = match ty {
            TypeShape::Generic { name, .. } if !generics.is_empty() => TypeShape::generic(
                name.clone(),
                generics.iter().map(|g| g.type_ref.clone()).collect(),
            ),
            other => other.clone(),
        };

        let mut state = Resolution { stack: Vec::new() };
        self.resolve_shape(&root, &HashMap::new(), &mut state)
    }
}

/// Replace bound type parameters inside `ty`
fn substitute(ty: &TypeShape, bindings: &HashMap<String, TypeShape>) -> TypeShape {
    match ty {
        TypeShape::Scalar { name } => bindings.get(name).cloned().unwrap_or_else(|| ty.clone()),
        TypeShape::Array { component } => TypeShape::array(substitute(component, bindings)),
        TypeShape::Generic { name, args } => TypeShape::generic(
            name.clone(),
            args.iter().map(|arg| substitute(arg, bindings)).collect(),
        ),
    }
}

fn find_item<'a, T, F>(items: &'a [syn::Item], pick: &F) -> Option<&'a T>
where
    F: Fn(&'a syn::Item) -> Option<&'a T>,
{
    items.iter().find_map(|item| match item {
        syn::Item::Mod(item_mod) => item_mod
            .content
            .as_ref()
            .and_then(|(_, inner)| find_item(inner, pick)),
        other => pick(other),
    })
}
