//! API docs from source - API documentation extracted from Rust controllers.
//!
//! A controller is a struct whose inherent `impl` blocks hold `pub fn` request
//! handlers. Documentation is merged from three sources, in this order of
//! precedence: explicit `#[api_doc(...)]` markers, `///` doc comments with
//! `@param` / `@author` / `@description` tags, and the method signatures. Types are
//! normalized into a small canonical vocabulary and every request is classified
//! against the output of a previous run.
//!
//! # Architecture
//!
//! 1. [`scanner`] - Recursively scans project directories for Rust files
//! 2. [`parser`] - Parses files and lowers controllers into [`declaration`] trees
//! 3. [`detector`] - Chooses the routing conventions of the project
//! 4. [`extractor`] - Builds [`model::ControllerRecord`]s from declarations
//! 5. [`type_normalizer`] - Maps declared types onto canonical names
//! 6. [`type_resolver`] - Resolves the structure of response types
//! 7. [`change`] - Classifies requests against a baseline
//! 8. [`serializer`] - Serializes records to YAML or JSON and loads baselines
//!
//! # Example Usage
//!
//! ```no_run
//! use apidocs_from_source::{
//!     change::Baseline,
//!     config::DocsConfig,
//!     extractor::{route_macro::RouteMacroHook, ControllerParser},
//!     parser::AstParser,
//!     scanner::FileScanner,
//!     serializer::serialize_yaml,
//!     type_resolver::TypeResolver,
//! };
//! use std::path::PathBuf;
//!
//! let scan_result = FileScanner::new(PathBuf::from("./my-project")).scan().unwrap();
//! let parsed_files: Vec<_> = AstParser::parse_files(&scan_result.rust_files)
//!     .into_iter()
//!     .filter_map(Result::ok)
//!     .collect();
//!
//! let resolver = TypeResolver::new(parsed_files.clone());
//! let parser = ControllerParser::new(DocsConfig::default(), Baseline::empty(), Box::new(resolver))
//!     .with_controller_hook(Box::new(RouteMacroHook))
//!     .with_method_hook(Box::new(RouteMacroHook));
//!
//! let controllers = parser.parse_all(&parsed_files);
//! println!("{}", serialize_yaml(&controllers).unwrap());
//! ```
//!
//! # Command-Line Interface
//!
//! For command-line usage, see the [`cli`] module which provides a complete CLI application.

pub mod change;
pub mod cli;
pub mod config;
pub mod declaration;
pub mod detector;
pub mod error;
pub mod extractor;
pub mod model;
pub mod parser;
pub mod scanner;
pub mod serializer;
pub mod type_normalizer;
pub mod type_resolver;
