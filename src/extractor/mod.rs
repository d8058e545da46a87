//! Controller documentation extraction.
//!
//! [`ControllerParser`] turns one controller (a struct plus its inherent `impl`
//! blocks) into a [`ControllerRecord`]:
//!
//! 1. controller hooks, `before_controller`
//! 2. class metadata, see [`class_reader`]
//! 3. one request per eligible public method, see [`member`]
//! 4. controller hooks, `after_controller`
//!
//! Framework conventions are layered on through [`hooks`]; [`route_macro`] supplies
//! the Actix-Web ones.
//!
//! # Example
//!
//! ```no_run
//! use apidocs_from_source::change::Baseline;
//! use apidocs_from_source::config::DocsConfig;
//! use apidocs_from_source::extractor::ControllerParser;
//! use apidocs_from_source::parser::AstParser;
//! use apidocs_from_source::type_resolver::DeclaredShapeResolver;
//! use std::path::Path;
//!
//! let parsed = AstParser::parse_file(Path::new("src/user_controller.rs")).unwrap();
//! let parser = ControllerParser::new(DocsConfig::default(), Baseline::empty(), Box::new(DeclaredShapeResolver));
//! let record = parser.parse(&parsed, "UserController").unwrap();
//! println!("Found {} requests", record.requests.len());
//! ```

pub mod class_reader;
pub mod hooks;
pub mod marker;
pub mod member;
pub mod route_macro;

use crate::change::Baseline;
use crate::config::DocsConfig;
use crate::error::{Error, Result};
use crate::model::ControllerRecord;
use crate::parser::{controller_name_for, AstParser, ParsedFile};
use crate::type_resolver::StructureResolver;
use hooks::{ControllerHook, MethodHook};
use log::{debug, info, warn};
use member::MemberExtractor;

/// Extracts controller records from parsed files.
///
/// Holds only read-only state, so one parser can serve any number of files.
/// Each call builds its record from scratch and keeps nothing between calls.
pub struct ControllerParser {
    config: DocsConfig,
    baseline: Baseline,
    resolver: Box<dyn StructureResolver>,
    controller_hooks: Vec<Box<dyn ControllerHook>>,
    method_hooks: Vec<Box<dyn MethodHook>>,
}

impl ControllerParser {
    pub fn new(
        config: DocsConfig,
        baseline: Baseline,
        resolver: Box<dyn StructureResolver>,
    ) -> Self {
        Self {
            config,
            baseline,
            resolver,
            controller_hooks: Vec::new(),
            method_hooks: Vec::new(),
        }
    }

    /// Registers a controller hook after the ones already registered
    pub fn with_controller_hook(mut self, hook: Box<dyn ControllerHook>) -> Self {
        self.controller_hooks.push(hook);
        self
    }

    /// Registers a method hook after the ones already registered
    pub fn with_method_hook(mut self, hook: Box<dyn MethodHook>) -> Self {
        self.method_hooks.push(hook);
        self
    }

    pub fn config(&self) -> &DocsConfig {
        &self.config
    }

    pub fn baseline(&self) -> &Baseline {
        &self.baseline
    }

    /// Extracts the controller named `class_name`.
    ///
    /// A class missing from the file yields an empty record. Structurally invalid
    /// declarations fail with [`Error::InvalidDeclaration`].
    pub fn parse(&self, parsed: &ParsedFile, class_name: &str) -> Result<ControllerRecord> {
        let Some(class) = AstParser::find_class(parsed, class_name) else {
            debug!(
                "{}",
                Error::NotFound {
                    class: class_name.to_string()
                }
            );
            return Ok(ControllerRecord::new(class_name));
        };
        class.validate()?;

        let mut record = ControllerRecord::new(class_name);
        for hook in &self.controller_hooks {
            hook.before_controller(&mut record, &class);
        }

        let record = class_reader::read_class(&class, &self.config.marker, record);

        let extractor = MemberExtractor {
            config: &self.config,
            baseline: &self.baseline,
            resolver: self.resolver.as_ref(),
            hooks: &self.method_hooks,
        };
        let mut record = extractor.extract(&class, record)?;

        for hook in &self.controller_hooks {
            hook.after_controller(&mut record, &class);
        }

        debug!(
            "Extracted {} requests from {}",
            record.requests.len(),
            record.class_name
        );
        Ok(record)
    }

    /// Extracts the controller named after the file stem (`user_controller.rs` is `UserController`).
    pub fn parse_file(&self, parsed: &ParsedFile) -> Result<ControllerRecord> {
        let class_name = controller_name_for(&parsed.path).ok_or_else(|| {
            Error::InvalidArgument(format!(
                "Cannot derive a controller name from {}",
                parsed.path.display()
            ))
        })?;
        self.parse(parsed, &class_name)
    }

    /// Extracts every file, skipping files without a controller.
    ///
    /// A failing file is logged and does not stop the batch.
    pub fn parse_all(&self, parsed_files: &[ParsedFile]) -> Vec<ControllerRecord> {
        let mut records = Vec::new();

        for parsed in parsed_files {
            match self.parse_file(parsed) {
                Ok(record) if record.requests.is_empty() && !record.documented => {
                    debug!("No documented controller in {}", parsed.path.display());
                }
                Ok(record) => records.push(record),
                Err(e) => warn!("Failed to extract {}: {}", parsed.path.display(), e),
            }
        }

        info!("Extracted {} controllers", records.len());
        records
    }
}
