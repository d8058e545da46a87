//! Canonical documentation types.
//!
//! Every declared type is mapped onto a small vocabulary so records from different
//! controllers compare and render uniformly. Normalization is total (unknown types
//! become [`OBJECT`]) and idempotent (canonical names map to themselves), because
//! canonical names written by `@param {type}` tags flow through the same path as
//! names read from signatures.

use crate::declaration::TypeShape;
use crate::parser::lower_type;

pub const INT: &str = "int";
pub const LONG: &str = "long";
pub const FLOAT: &str = "float";
pub const DOUBLE: &str = "double";
pub const CHAR: &str = "char";
pub const BOOLEAN: &str = "boolean";
pub const STRING: &str = "string";
pub const DATE: &str = "date";
pub const FILE: &str = "file";
pub const OBJECT: &str = "object";

/// Suffix marking "list of" the preceding type
pub const LIST_SUFFIX: &str = "[]";

/// Collection types recognized when no configuration is supplied
pub const DEFAULT_COLLECTIONS: &[&str] = &[
    "Vec",
    "VecDeque",
    "LinkedList",
    "HashSet",
    "BTreeSet",
    "BinaryHeap",
    "IndexSet",
    "SmallVec",
];

/// Wrappers that document as their first type argument
const TRANSPARENT_WRAPPERS: &[&str] = &["Option", "Box", "Rc", "Arc", "Cow"];

/// Normalizes a raw type name.
///
/// Path prefixes, references and generic argument lists are dropped before lookup;
/// `[]` suffixes are kept around the normalized base type.
pub fn normalize_name(raw: &str) -> String {
    let mut base = raw.trim();
    let mut depth = 0;
    while let Some(stripped) = base.strip_suffix(LIST_SUFFIX) {
        base = stripped.trim_end();
        depth += 1;
    }

    let mut canonical = canonical_base(base).to_string();
    for _ in 0..depth {
        canonical.push_str(LIST_SUFFIX);
    }
    canonical
}

/// Normalizes a type written as text, such as an `@param {type}` hint.
///
/// Text that reads as a Rust type keeps its generic arguments, so `Vec<u64>` is
/// `long[]` exactly as the parsed shape would be. Anything else, canonical names
/// with `[]` suffixes included, goes through [`normalize_name`].
pub fn normalize_hint<S: AsRef<str>>(raw: &str, collections: &[S]) -> String {
    match syn::parse_str::<syn::Type>(raw.trim()) {
        Ok(ty) => canonical_with(&lower_type(&ty), collections),
        Err(_) => normalize_name(raw),
    }
}

/// Appends the list marker to a canonical name.
pub fn list_of(canonical: &str) -> String {
    format!("{}{}", canonical, LIST_SUFFIX)
}

/// Normalizes a declared type shape, using the default collection set.
pub fn canonical(shape: &TypeShape) -> String {
    canonical_with(shape, DEFAULT_COLLECTIONS)
}

/// Normalizes a declared type shape against the given collection names.
pub fn canonical_with<S: AsRef<str>>(shape: &TypeShape, collections: &[S]) -> String {
    match shape {
        TypeShape::Scalar { name } if is_collection(name, collections) => list_of(OBJECT),
        TypeShape::Scalar { name } => normalize_name(name),
        TypeShape::Array { component } => list_of(&canonical_with(component, collections)),
        TypeShape::Generic { name, args } => {
            if is_collection(name, collections) {
                let element = args
                    .first()
                    .map(|arg| canonical_with(arg, collections))
                    .unwrap_or_else(|| OBJECT.to_string());
                list_of(&element)
            } else if TRANSPARENT_WRAPPERS.contains(&name.as_str()) {
                args.first()
                    .map(|arg| canonical_with(arg, collections))
                    .unwrap_or_else(|| OBJECT.to_string())
            } else {
                normalize_name(name)
            }
        }
    }
}

/// Whether `name` is one of the recognized collection types.
pub fn is_collection<S: AsRef<str>>(name: &str, collections: &[S]) -> bool {
    let simple = simple_name(name);
    collections.iter().any(|c| c.as_ref() == simple)
}

/// Last path segment with generic arguments and references removed.
fn simple_name(raw: &str) -> &str {
    let mut name = raw.trim();
    if let Some(pos) = name.find('<') {
        name = &name[..pos];
    }
    let name = name.trim_start_matches('&').trim_start();
    let name = name.strip_prefix("mut ").unwrap_or(name);
    let name = name.strip_prefix("'static ").unwrap_or(name);
    name.rsplit("::").next().unwrap_or(name).trim()
}

fn canonical_base(raw: &str) -> &'static str {
    match simple_name(raw) {
        "i8" | "i16" | "i32" | "u8" | "u16" | "u32" | "int" | "Integer" | "short" | "byte"
        | "NonZeroU32" | "NonZeroI32" => INT,
        "i64" | "u64" | "i128" | "u128" | "isize" | "usize" | "long" | "Long" | "NonZeroU64"
        | "NonZeroI64" => LONG,
        "f32" | "float" => FLOAT,
        "f64" | "double" | "Decimal" | "BigDecimal" => DOUBLE,
        "char" => CHAR,
        "bool" | "boolean" => BOOLEAN,
        "String" | "str" | "Uuid" | "string" => STRING,
        "DateTime" | "NaiveDate" | "NaiveDateTime" | "NaiveTime" | "SystemTime"
        | "OffsetDateTime" | "PrimitiveDateTime" | "Date" | "Timestamp" | "date" => DATE,
        "File" | "Multipart" | "TempFile" | "NamedTempFile" | "Bytes" | "file" => FILE,
        _ => OBJECT,
    }
}
