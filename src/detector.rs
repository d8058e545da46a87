use crate::cli::Framework;
use crate::extractor::route_macro::RouteMacroHook;
use crate::extractor::ControllerParser;
use crate::parser::ParsedFile;
use log::{debug, info};
use std::collections::HashSet;
use syn::{Item, UseTree};

/// Framework detector choosing the routing conventions applied to controllers.
///
/// Detection examines `use` statements, inline modules included. Projects importing
/// `actix_web` get the Actix-Web route macro hooks; anything else is documented
/// with the core conventions only.
pub struct FrameworkDetector;

/// Result of framework detection.
pub struct DetectionResult {
    /// Detected frameworks, without duplicates
    pub frameworks: Vec<Framework>,
}

impl DetectionResult {
    /// Framework whose conventions are applied
    pub fn primary(&self) -> Framework {
        if self.frameworks.contains(&Framework::ActixWeb) {
            Framework::ActixWeb
        } else {
            Framework::Plain
        }
    }
}

impl FrameworkDetector {
    /// Detects web frameworks used in the provided parsed files.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use apidocs_from_source::detector::FrameworkDetector;
    /// use apidocs_from_source::parser::AstParser;
    /// use std::path::Path;
    ///
    /// let parsed = AstParser::parse_file(Path::new("src/main.rs")).unwrap();
    /// let result = FrameworkDetector::detect(&[parsed]);
    /// println!("Using {:?} conventions", result.primary());
    /// ```
    pub fn detect(parsed_files: &[ParsedFile]) -> DetectionResult {
        debug!("Detecting frameworks in {} files", parsed_files.len());

        let mut detected_frameworks = HashSet::new();
        for parsed_file in parsed_files {
            Self::check_items(&parsed_file.syntax_tree.items, &mut detected_frameworks);
        }

        let frameworks: Vec<Framework> = detected_frameworks.into_iter().collect();
        debug!("Detected frameworks: {:?}", frameworks);

        DetectionResult { frameworks }
    }

    /// Registers the hooks implementing the conventions of `framework`
    pub fn apply_hooks(parser: ControllerParser, framework: Framework) -> ControllerParser {
        info!("Applying {:?} conventions", framework);
        match framework {
            Framework::ActixWeb => parser
                .with_controller_hook(Box::new(RouteMacroHook))
                .with_method_hook(Box::new(RouteMacroHook)),
            Framework::Plain => parser,
        }
    }

    fn check_items(items: &[Item], detected: &mut HashSet<Framework>) {
        for item in items {
            match item {
                Item::Use(use_item) => Self::check_use_tree(&use_item.tree, detected),
                Item::Mod(item_mod) => {
                    if let Some((_, inner)) = &item_mod.content {
                        Self::check_items(inner, detected);
                    }
                }
                _ => {}
            }
        }
    }

    /// Recursively check use tree for framework imports
    fn check_use_tree(tree: &UseTree, detected: &mut HashSet<Framework>) {
        match tree {
            UseTree::Path(path) => {
                Self::check_ident(&path.ident, detected);
                Self::check_use_tree(&path.tree, detected);
            }
            UseTree::Group(group) => {
                for item in &group.items {
                    Self::check_use_tree(item, detected);
                }
            }
            UseTree::Rename(rename) => Self::check_ident(&rename.ident, detected),
            UseTree::Name(name) => Self::check_ident(&name.ident, detected),
            // Glob imports don't help us identify the framework
            UseTree::Glob(_) => {}
        }
    }

    fn check_ident(ident: &syn::Ident, detected: &mut HashSet<Framework>) {
        if ident == "actix_web" {
            detected.insert(Framework::ActixWeb);
        }
    }
}
