use crate::declaration::{
    Attribute, ClassDecl, DocComment, MarkerArgs, MarkerEntry, MarkerValue, MethodDecl,
    ParamDecl, TypeShape,
};
use anyhow::{Context, Result};
use log::{debug, warn};
use std::fs;
use std::path::{Component, Path, PathBuf};
use syn::parse::{Parse, ParseStream};
use syn::visit::Visit;

/// AST (Abstract Syntax Tree) parser for Rust source files.
///
/// The `AstParser` uses the `syn` crate to parse Rust source code into an abstract syntax tree,
/// and lowers controller structs into the [`ClassDecl`] tree consumed by extraction.
///
/// # Example
///
/// ```no_run
/// use apidocs_from_source::parser::AstParser;
/// use std::path::Path;
///
/// let parsed = AstParser::parse_file(Path::new("src/api/user_controller.rs")).unwrap();
/// let class = AstParser::find_class(&parsed, "UserController");
/// println!("Found controller: {}", class.is_some());
/// ```
pub struct AstParser;

/// A successfully parsed Rust file with its abstract syntax tree.
#[derive(Debug, Clone)]
pub struct ParsedFile {
    /// Path to the source file
    pub path: PathBuf,
    /// The parsed abstract syntax tree
    pub syntax_tree: syn::File,
}

impl AstParser {
    /// Parses a single Rust source file into an AST.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file cannot be read
    /// - The file contains invalid Rust syntax
    pub fn parse_file(path: &Path) -> Result<ParsedFile> {
        debug!("Parsing file: {}", path.display());

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read file: {}", path.display()))?;

        Self::parse_source(path, &content)
    }

    /// Parses source text that is attributed to `path`.
    pub fn parse_source(path: &Path, content: &str) -> Result<ParsedFile> {
        let syntax_tree = syn::parse_file(content)
            .with_context(|| format!("Failed to parse Rust syntax in file: {}", path.display()))?;

        debug!("Successfully parsed file: {}", path.display());

        Ok(ParsedFile {
            path: path.to_path_buf(),
            syntax_tree,
        })
    }

    /// Parses multiple Rust source files, continuing even if some fail.
    ///
    /// Files that fail to parse are logged as warnings and returned as `Err`, so the
    /// caller can still document every file that parsed.
    pub fn parse_files(paths: &[PathBuf]) -> Vec<Result<ParsedFile>> {
        debug!("Parsing {} files", paths.len());

        let results: Vec<Result<ParsedFile>> = paths
            .iter()
            .map(|path| {
                Self::parse_file(path).map_err(|e| {
                    warn!("Failed to parse {}: {}", path.display(), e);
                    e
                })
            })
            .collect();

        let success_count = results.iter().filter(|r| r.is_ok()).count();
        debug!(
            "Parsing complete: {} succeeded, {} failed",
            success_count,
            results.len() - success_count
        );

        results
    }

    /// Lowers the struct `class_name` and its inherent impl blocks into a [`ClassDecl`].
    ///
    /// Inline modules are searched too. Returns `None` when neither a struct nor an
    /// inherent impl with that name exists in the file.
    pub fn find_class(parsed: &ParsedFile, class_name: &str) -> Option<ClassDecl> {
        let mut collector = ClassCollector::new(class_name);
        collector.visit_file(&parsed.syntax_tree);

        if !collector.found {
            debug!(
                "Class {} not found in {}",
                class_name,
                parsed.path.display()
            );
            return None;
        }

        let package = module_path_for(&parsed.path).map(|base| {
            collector
                .module_path
                .iter()
                .fold(base, |acc, m| format!("{}::{}", acc, m))
        });

        debug!(
            "Lowered class {} with {} methods",
            class_name,
            collector.methods.len()
        );

        Some(ClassDecl {
            name: class_name.to_string(),
            package,
            attributes: collector.attributes,
            doc: DocComment::parse(&collector.doc_lines),
            methods: collector.methods,
            file: parsed.path.clone(),
        })
    }
}

/// Derives the module path of a source file, e.g. `src/api/users.rs` → `crate::api::users`.
pub fn module_path_for(path: &Path) -> Option<String> {
    let components: Vec<String> = path
        .components()
        .filter_map(|c| match c {
            Component::Normal(os) => Some(os.to_string_lossy().to_string()),
            _ => None,
        })
        .collect();

    let last = components.last()?;
    let start = components
        .iter()
        .rposition(|c| c == "src")
        .map(|pos| pos + 1)
        .unwrap_or(components.len() - 1);
    if start >= components.len() {
        return None;
    }

    let mut segments: Vec<String> = components[start..components.len() - 1].to_vec();
    let stem = Path::new(last)
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    if !matches!(stem.as_str(), "mod" | "lib" | "main" | "") {
        segments.push(stem);
    }

    segments.insert(0, "crate".to_string());
    Some(segments.join("::"))
}

/// Controller name for a file, e.g. `user_controller.rs` → `UserController`.
pub fn controller_name_for(path: &Path) -> Option<String> {
    let stem = path.file_stem()?.to_string_lossy();
    let name: String = stem
        .split('_')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect();

    if name.is_empty() {
        None
    } else {
        Some(name)
    }
}

/// Visitor collecting the struct and inherent impls of one class
struct ClassCollector<'a> {
    class_name: &'a str,
    found: bool,
    current_module: Vec<String>,
    module_path: Vec<String>,
    struct_seen: bool,
    attributes: Vec<Attribute>,
    doc_lines: Vec<String>,
    methods: Vec<MethodDecl>,
}

impl<'a> ClassCollector<'a> {
    fn new(class_name: &'a str) -> Self {
        Self {
            class_name,
            found: false,
            current_module: Vec::new(),
            module_path: Vec::new(),
            struct_seen: false,
            attributes: Vec::new(),
            doc_lines: Vec::new(),
            methods: Vec::new(),
        }
    }

    fn mark_found(&mut self, is_struct: bool) {
        // The struct's location wins over impl blocks declared elsewhere
        if !self.found || (is_struct && !self.struct_seen) {
            self.module_path = self.current_module.clone();
        }
        self.found = true;
        self.struct_seen |= is_struct;
    }
}

impl<'ast> Visit<'ast> for ClassCollector<'_> {
    fn visit_item_mod(&mut self, node: &'ast syn::ItemMod) {
        self.current_module.push(node.ident.to_string());
        syn::visit::visit_item_mod(self, node);
        self.current_module.pop();
    }

    fn visit_item_struct(&mut self, node: &'ast syn::ItemStruct) {
        if node.ident == self.class_name {
            self.mark_found(true);
            self.attributes.extend(lower_attributes(&node.attrs));
            self.doc_lines = doc_lines(&node.attrs);
        }
    }

    fn visit_item_impl(&mut self, node: &'ast syn::ItemImpl) {
        if node.trait_.is_some() || self_type_name(&node.self_ty).as_deref() != Some(self.class_name)
        {
            return;
        }

        self.mark_found(false);
        self.attributes.extend(lower_attributes(&node.attrs));
        for item in &node.items {
            if let syn::ImplItem::Fn(method) = item {
                self.methods.push(lower_method(method));
            }
        }
    }
}

fn self_type_name(ty: &syn::Type) -> Option<String> {
    match ty {
        syn::Type::Path(type_path) => type_path
            .path
            .segments
            .last()
            .map(|segment| segment.ident.to_string()),
        _ => None,
    }
}

fn lower_method(method: &syn::ImplItemFn) -> MethodDecl {
    let params = method
        .sig
        .inputs
        .iter()
        .enumerate()
        .filter_map(|(index, input)| match input {
            syn::FnArg::Typed(pat_type) => Some(ParamDecl::new(
                pattern_name(&pat_type.pat, index),
                lower_type(&pat_type.ty),
            )),
            syn::FnArg::Receiver(_) => None,
        })
        .collect();

    let return_type = match &method.sig.output {
        syn::ReturnType::Default => None,
        syn::ReturnType::Type(_, ty) => match lower_type(ty) {
            TypeShape::Scalar { name } if name == "()" => None,
            shape => Some(shape),
        },
    };

    MethodDecl {
        name: method.sig.ident.to_string(),
        is_public: matches!(method.vis, syn::Visibility::Public(_)),
        attributes: lower_attributes(&method.attrs),
        doc: DocComment::parse(&doc_lines(&method.attrs)),
        params,
        return_type,
    }
}

/// Name of a parameter pattern; destructuring patterns join their bindings.
fn pattern_name(pat: &syn::Pat, index: usize) -> String {
    let mut names = Vec::new();
    collect_bindings(pat, &mut names);
    if names.is_empty() {
        format!("arg{}", index)
    } else {
        names.join("_")
    }
}

fn collect_bindings(pat: &syn::Pat, names: &mut Vec<String>) {
    match pat {
        syn::Pat::Ident(pat_ident) => names.push(pat_ident.ident.to_string()),
        syn::Pat::Reference(r) => collect_bindings(&r.pat, names),
        syn::Pat::Type(t) => collect_bindings(&t.pat, names),
        syn::Pat::Paren(p) => collect_bindings(&p.pat, names),
        syn::Pat::Tuple(t) => t.elems.iter().for_each(|p| collect_bindings(p, names)),
        syn::Pat::TupleStruct(ts) => ts.elems.iter().for_each(|p| collect_bindings(p, names)),
        syn::Pat::Struct(s) => s
            .fields
            .iter()
            .for_each(|field| collect_bindings(&field.pat, names)),
        _ => {}
    }
}

/// Lowers a `syn::Type` into its declared shape.
pub fn lower_type(ty: &syn::Type) -> TypeShape {
    match ty {
        syn::Type::Path(type_path) => lower_path(&type_path.path),
        syn::Type::Reference(r) => lower_type(&r.elem),
        syn::Type::Paren(p) => lower_type(&p.elem),
        syn::Type::Group(g) => lower_type(&g.elem),
        syn::Type::Ptr(p) => lower_type(&p.elem),
        syn::Type::Array(a) => TypeShape::array(lower_type(&a.elem)),
        syn::Type::Slice(s) => TypeShape::array(lower_type(&s.elem)),
        syn::Type::ImplTrait(it) => bound_shape(&it.bounds),
        syn::Type::TraitObject(to) => bound_shape(&to.bounds),
        syn::Type::Tuple(t) if t.elems.is_empty() => TypeShape::scalar("()"),
        syn::Type::Tuple(_) => TypeShape::scalar("tuple"),
        _ => TypeShape::scalar("unknown"),
    }
}

fn lower_path(path: &syn::Path) -> TypeShape {
    let Some(segment) = path.segments.last() else {
        return TypeShape::scalar("unknown");
    };
    let name = segment.ident.to_string();

    if let syn::PathArguments::AngleBracketed(args) = &segment.arguments {
        let args: Vec<TypeShape> = args
            .args
            .iter()
            .filter_map(|arg| match arg {
                syn::GenericArgument::Type(inner) => Some(lower_type(inner)),
                _ => None,
            })
            .collect();
        if !args.is_empty() {
            return TypeShape::generic(name, args);
        }
    }

    TypeShape::scalar(name)
}

fn bound_shape(
    bounds: &syn::punctuated::Punctuated<syn::TypeParamBound, syn::Token![+]>,
) -> TypeShape {
    bounds
        .iter()
        .find_map(|bound| match bound {
            syn::TypeParamBound::Trait(trait_bound) => Some(lower_path(&trait_bound.path)),
            _ => None,
        })
        .unwrap_or_else(|| TypeShape::scalar("unknown"))
}

/// Doc comment lines of an item, one entry per source line.
pub(crate) fn doc_lines(attrs: &[syn::Attribute]) -> Vec<String> {
    attrs
        .iter()
        .filter(|attr| attr.path().is_ident("doc"))
        .filter_map(|attr| match &attr.meta {
            syn::Meta::NameValue(nv) => match &nv.value {
                syn::Expr::Lit(syn::ExprLit {
                    lit: syn::Lit::Str(s),
                    ..
                }) => Some(s.value()),
                _ => None,
            },
            _ => None,
        })
        .flat_map(|text| {
            text.lines()
                .map(|line| line.strip_prefix(' ').unwrap_or(line).to_string())
                .collect::<Vec<_>>()
        })
        .collect()
}

/// Non-doc attributes in their neutral form.
fn lower_attributes(attrs: &[syn::Attribute]) -> Vec<Attribute> {
    attrs
        .iter()
        .filter(|attr| !attr.path().is_ident("doc"))
        .filter_map(lower_attribute)
        .collect()
}

fn lower_attribute(attr: &syn::Attribute) -> Option<Attribute> {
    let name = attr.path().segments.last()?.ident.to_string();

    let args = match &attr.meta {
        syn::Meta::Path(_) => MarkerArgs::Empty,
        syn::Meta::List(list) if list.tokens.is_empty() => MarkerArgs::Empty,
        syn::Meta::List(list) => match syn::parse2::<AttributeEntries>(list.tokens.clone()) {
            Ok(entries) => MarkerArgs::Entries(entries.0),
            Err(e) => {
                debug!("Attribute #[{}] has unreadable arguments: {}", name, e);
                MarkerArgs::Malformed(list.tokens.to_string())
            }
        },
        syn::Meta::NameValue(nv) => match &nv.value {
            syn::Expr::Lit(syn::ExprLit { lit, .. }) => {
                MarkerArgs::Entries(vec![MarkerEntry::positional(lit_value(lit))])
            }
            _ => MarkerArgs::Malformed(name.clone()),
        },
    };

    Some(Attribute { name, args })
}

/// Comma separated `value` / `key = value` entries of an attribute
struct AttributeEntries(Vec<MarkerEntry>);

impl Parse for AttributeEntries {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let mut entries = Vec::new();

        while !input.is_empty() {
            let key = if input.peek(syn::Ident) && input.peek2(syn::Token![=]) {
                let ident: syn::Ident = input.parse()?;
                input.parse::<syn::Token![=]>()?;
                Some(ident.to_string())
            } else {
                None
            };

            let value = if input.peek(syn::Lit) {
                lit_value(&input.parse::<syn::Lit>()?)
            } else {
                MarkerValue::Type(lower_type(&input.parse::<syn::Type>()?))
            };

            entries.push(MarkerEntry { key, value });

            if input.is_empty() {
                break;
            }
            input.parse::<syn::Token![,]>()?;
        }

        Ok(AttributeEntries(entries))
    }
}

fn lit_value(lit: &syn::Lit) -> MarkerValue {
    match lit {
        syn::Lit::Str(s) => MarkerValue::Str(s.value()),
        syn::Lit::Int(i) => MarkerValue::Other(i.base10_digits().to_string()),
        syn::Lit::Float(f) => MarkerValue::Other(f.base10_digits().to_string()),
        syn::Lit::Bool(b) => MarkerValue::Other(b.value.to_string()),
        syn::Lit::Char(c) => MarkerValue::Other(c.value().to_string()),
        _ => MarkerValue::Other("literal".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;
    use tempfile::TempDir;

    /// Helper function to create a temporary file with content
    fn create_temp_file(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let file_path = dir.path().join(name);
        let mut file = fs::File::create(&file_path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file_path
    }

    fn parse_code(code: &str) -> ParsedFile {
        AstParser::parse_source(Path::new("src/api/user_controller.rs"), code)
            .expect("Failed to parse test code")
    }

    #[test]
    fn test_parse_valid_rust_file() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = create_temp_file(&temp_dir, "valid.rs", "pub struct User { pub id: u32 }");
        let parsed = AstParser::parse_file(&file_path).unwrap();

        assert_eq!(parsed.path, file_path);
        assert!(!parsed.syntax_tree.items.is_empty());
    }

    #[test]
    fn test_parse_invalid_rust_file() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = create_temp_file(&temp_dir, "invalid.rs", "fn broken( {");
        let err = AstParser::parse_file(&file_path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse Rust syntax"));
    }

    #[test]
    fn test_parse_nonexistent_file() {
        let err = AstParser::parse_file(Path::new("/nonexistent/file.rs")).unwrap_err();
        assert!(err.to_string().contains("Failed to read file"));
    }

    #[test]
    fn test_parse_files_batch() {
        let temp_dir = TempDir::new().unwrap();
        let file1 = create_temp_file(&temp_dir, "a.rs", "pub fn hello() {}");
        let file2 = create_temp_file(&temp_dir, "b.rs", "pub fn broken( {");

        let results = AstParser::parse_files(&[file1, file2]);
        assert_eq!(results.len(), 2);
        assert!(results[0].is_ok());
        assert!(results[1].is_err());
    }

    #[test]
    fn test_find_class_lowers_methods() {
        let code = r#"
            /// Manages users.
            ///
            /// @author jane
            #[api_doc]
            pub struct UserController;

            impl UserController {
                /// Gets a user.
                /// @param id {long} user id
                #[api_doc(url = "/users/get", method = "GET", result = UserDto)]
                pub async fn get(&self, id: u64, tags: &[String]) -> Json<UserDto> {
                    todo!()
                }

                #[deprecated]
                pub fn remove(&self, ids: Vec<u64>) {}

                fn helper(&self) -> bool { true }
            }

            impl Default for UserController {
                fn default() -> Self { UserController }
            }
        "#;

        let class = AstParser::find_class(&parse_code(code), "UserController").unwrap();

        assert_eq!(class.name, "UserController");
        assert_eq!(class.package.as_deref(), Some("crate::api::user_controller"));
        assert!(class.has_attribute("api_doc"));
        let doc = class.doc.as_ref().unwrap();
        assert_eq!(doc.summary, "Manages users.");
        assert_eq!(doc.tag("author").unwrap().content, "jane");

        // Trait impls do not contribute methods
        assert_eq!(class.methods.len(), 3);
        assert_eq!(class.public_methods().count(), 2);

        let get = &class.methods[0];
        assert_eq!(get.name, "get");
        assert_eq!(get.params.len(), 2);
        assert_eq!(get.params[0], ParamDecl::new("id", TypeShape::scalar("u64")));
        assert_eq!(
            get.params[1],
            ParamDecl::new("tags", TypeShape::array(TypeShape::scalar("String")))
        );
        assert_eq!(
            get.return_type,
            Some(TypeShape::generic("Json", vec![TypeShape::scalar("UserDto")]))
        );
        assert_eq!(get.doc.as_ref().unwrap().summary, "Gets a user.");

        let marker = get.attribute("api_doc").unwrap();
        assert_eq!(
            marker.args,
            MarkerArgs::Entries(vec![
                MarkerEntry::keyed("url", MarkerValue::Str("/users/get".to_string())),
                MarkerEntry::keyed("method", MarkerValue::Str("GET".to_string())),
                MarkerEntry::keyed("result", MarkerValue::Type(TypeShape::scalar("UserDto"))),
            ])
        );

        let remove = &class.methods[1];
        assert!(remove.has_attribute("deprecated"));
        assert_eq!(remove.return_type, None);
        assert!(!class.methods[2].is_public);
    }

    #[test]
    fn test_find_class_missing() {
        let parsed = parse_code("pub struct Other;");
        assert!(AstParser::find_class(&parsed, "UserController").is_none());
    }

    #[test]
    fn test_find_class_in_inline_module() {
        let code = r#"
            pub mod admin {
                pub struct UserController;
                impl UserController {
                    pub fn list(&self) -> Vec<String> { vec![] }
                }
            }
        "#;
        let class = AstParser::find_class(&parse_code(code), "UserController").unwrap();
        assert_eq!(
            class.package.as_deref(),
            Some("crate::api::user_controller::admin")
        );
        assert_eq!(class.methods.len(), 1);
    }

    #[test]
    fn test_single_value_and_malformed_markers() {
        let code = r#"
            pub struct UserController;
            impl UserController {
                #[api_doc(Vec<UserDto>)]
                pub fn list(&self) {}

                #[api_doc(|x| x)]
                pub fn broken(&self) {}

                #[deprecated = "use list"]
                pub fn old(&self) {}
            }
        "#;
        let class = AstParser::find_class(&parse_code(code), "UserController").unwrap();

        assert_eq!(
            class.methods[0].attribute("api_doc").unwrap().args,
            MarkerArgs::Entries(vec![MarkerEntry::positional(MarkerValue::Type(
                TypeShape::generic("Vec", vec![TypeShape::scalar("UserDto")])
            ))])
        );
        assert!(matches!(
            class.methods[1].attribute("api_doc").unwrap().args,
            MarkerArgs::Malformed(_)
        ));
        assert_eq!(
            class.methods[2].attribute("deprecated").unwrap().first_positional_str(),
            Some("use list")
        );
    }

    #[test]
    fn test_destructured_parameter_names() {
        let code = r#"
            pub struct UserController;
            impl UserController {
                pub fn get(&self, Path((team, id)): Path<(u32, u32)>, _: String) -> String { todo!() }
            }
        "#;
        let class = AstParser::find_class(&parse_code(code), "UserController").unwrap();
        let params = &class.methods[0].params;
        assert_eq!(params[0].name, "team_id");
        assert_eq!(params[0].ty, TypeShape::generic("Path", vec![TypeShape::scalar("tuple")]));
        assert_eq!(params[1].name, "arg2");
    }

    #[test]
    fn test_impl_trait_and_unit_returns() {
        let code = r#"
            pub struct UserController;
            impl UserController {
                pub fn a(&self) -> impl Responder { todo!() }
                pub fn b(&self) -> () {}
            }
        "#;
        let class = AstParser::find_class(&parse_code(code), "UserController").unwrap();
        assert_eq!(class.methods[0].return_type, Some(TypeShape::scalar("Responder")));
        assert_eq!(class.methods[1].return_type, None);
    }

    #[test]
    fn test_module_path_for() {
        assert_eq!(
            module_path_for(Path::new("project/src/api/users.rs")).as_deref(),
            Some("crate::api::users")
        );
        assert_eq!(
            module_path_for(Path::new("project/src/api/mod.rs")).as_deref(),
            Some("crate::api")
        );
        assert_eq!(module_path_for(Path::new("src/lib.rs")).as_deref(), Some("crate"));
        assert_eq!(
            module_path_for(Path::new("handlers.rs")).as_deref(),
            Some("crate::handlers")
        );
    }

    #[test]
    fn test_controller_name_for() {
        assert_eq!(
            controller_name_for(Path::new("src/user_controller.rs")).as_deref(),
            Some("UserController")
        );
        assert_eq!(
            controller_name_for(Path::new("WidgetController.rs")).as_deref(),
            Some("WidgetController")
        );
    }
}
