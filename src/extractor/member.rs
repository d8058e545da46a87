//! Per-method request extraction.
//!
//! A [`RequestBuilder`] is threaded through the stages below, each taking the
//! builder by value and returning it:
//!
//! 1. defaults from the method name and the controller author
//! 2. `#[deprecated]`
//! 3. the doc comment (summary, `@param`, `@author`)
//! 4. the formal parameters
//! 5. marker overrides
//! 6. method hooks
//!
//! [`RequestBuilder::build`] then resolves the response, and the change status is
//! assigned last.

use super::hooks::MethodHook;
use super::marker::{self, MarkerOverrides};
use crate::change::{self, Baseline};
use crate::config::DocsConfig;
use crate::declaration::{ClassDecl, MethodDecl, TypeShape};
use crate::error::{Error, Result};
use crate::model::{
    ChangeStatus, ControllerRecord, GenericRecord, HeaderRecord, ParamRecord, RequestRecord,
    ResponseRecord,
};
use crate::type_normalizer::{self, OBJECT};
use crate::type_resolver::StructureResolver;
use log::{debug, warn};
use std::path::Path;

/// A request record under construction.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestBuilder {
    pub method_name: String,
    pub url: String,
    pub methods: Vec<String>,
    pub description: String,
    pub author: Option<String>,
    pub deprecated: bool,
    pub params: Vec<ParamRecord>,
    pub headers: Vec<HeaderRecord>,
    /// Response type set by a marker; the declared return type is used otherwise
    pub response_type: Option<TypeShape>,
}

impl RequestBuilder {
    /// Defaults: URL and description are the method name, author is inherited.
    pub fn new(method_name: &str, controller: &ControllerRecord) -> Self {
        Self {
            method_name: method_name.to_string(),
            url: method_name.to_string(),
            methods: Vec::new(),
            description: method_name.to_string(),
            author: controller.author.clone(),
            deprecated: false,
            params: Vec::new(),
            headers: Vec::new(),
            response_type: None,
        }
    }

    /// Adds an HTTP method token unless it is already present
    pub fn add_method(&mut self, token: &str) {
        let token = token.trim().to_uppercase();
        if !token.is_empty() && !self.methods.contains(&token) {
            self.methods.push(token);
        }
    }

    /// Adds a header, replacing the description of one with the same name
    pub fn add_header(&mut self, header: HeaderRecord) {
        match self.headers.iter_mut().find(|h| h.name == header.name) {
            Some(existing) => existing.description = header.description,
            None => self.headers.push(header),
        }
    }

    pub fn param(&self, name: &str) -> Option<&ParamRecord> {
        self.params.iter().find(|p| p.name == name)
    }

    pub fn param_mut(&mut self, name: &str) -> Option<&mut ParamRecord> {
        self.params.iter_mut().find(|p| p.name == name)
    }

    /// The record for `name`, created at the end of the list if missing
    pub fn param_entry(&mut self, name: &str) -> &mut ParamRecord {
        let index = match self.params.iter().position(|p| p.name == name) {
            Some(index) => index,
            None => {
                self.params.push(ParamRecord::new(name));
                self.params.len() - 1
            }
        };
        &mut self.params[index]
    }

    pub fn remove_param(&mut self, name: &str) -> Option<ParamRecord> {
        let index = self.params.iter().position(|p| p.name == name)?;
        Some(self.params.remove(index))
    }

    pub fn with_deprecation(mut self, method: &MethodDecl) -> Self {
        if method.has_attribute("deprecated") {
            self.deprecated = true;
        }
        self
    }

    /// Applies the summary, `@param` and `@author` tags of the method's doc comment.
    pub fn with_doc(mut self, method: &MethodDecl, config: &DocsConfig) -> Self {
        let Some(doc) = &method.doc else {
            return self;
        };

        if !doc.summary.is_empty() {
            self.description = doc.summary.clone();
        }

        for tag in &doc.tags {
            match tag.name.as_str() {
                "param" => {
                    let Some(name) = tag.param.as_deref() else {
                        continue;
                    };
                    let param = self.param_entry(name);
                    param.description = tag.content.clone();
                    if let Some(hint) = &tag.type_hint {
                        param.set_type_once(type_normalizer::normalize_hint(
                            hint,
                            &config.collection_types,
                        ));
                    }
                }
                "author" => self.author = Some(tag.content.clone()),
                _ => {}
            }
        }
        self
    }

    /// Drops framework-injected parameters and infers types of tracked ones.
    ///
    /// Parameters without a record (never named by a `@param` tag) stay untracked.
    pub fn with_signature(mut self, method: &MethodDecl, config: &DocsConfig) -> Self {
        for decl in &method.params {
            if self.param(&decl.name).is_none() {
                debug!("Parameter {} of {} is not tracked", decl.name, method.name);
                continue;
            }

            if config.is_excluded_param(decl.ty.name()) {
                debug!("Removing excluded parameter {} of {}", decl.name, method.name);
                self.remove_param(&decl.name);
                continue;
            }

            let ty = unwrap_extractors(&decl.ty, &config.extractor_types);
            let type_name = param_type_name(ty, &config.collection_types);
            if let Some(param) = self.param_mut(&decl.name) {
                param.set_type_once(type_name);
            }
        }
        self
    }

    pub fn with_overrides(mut self, overrides: MarkerOverrides) -> Self {
        if let Some(url) = overrides.url {
            self.url = url;
        }
        for token in &overrides.methods {
            self.add_method(token);
        }
        if overrides.response_type.is_some() {
            self.response_type = overrides.response_type;
        }
        self
    }

    /// Resolves the response and finishes the record.
    ///
    /// Fails with [`Error::UnresolvedResponseType`] when neither a marker override
    /// nor a declared return type is available.
    pub fn build(
        self,
        method: &MethodDecl,
        controller: &ControllerRecord,
        file: &Path,
        resolver: &dyn StructureResolver,
    ) -> Result<RequestRecord> {
        let response_type = self
            .response_type
            .or_else(|| method.return_type.clone())
            .ok_or_else(|| Error::UnresolvedResponseType {
                method: method.name.clone(),
            })?;

        let generics: Vec<GenericRecord> = response_type
            .element_type()
            .type_args()
            .iter()
            .map(|arg| GenericRecord {
                from_file: file.to_path_buf(),
                type_ref: arg.clone(),
            })
            .collect();
        let shape = resolver.resolve(&response_type, &generics);

        Ok(RequestRecord {
            method_name: self.method_name,
            url: self.url,
            methods: self.methods,
            description: self.description,
            author: self.author,
            deprecated: self.deprecated,
            params: self.params,
            headers: self.headers,
            response: ResponseRecord {
                type_name: response_type.to_string(),
                generics,
                shape,
            },
            controller: controller.class_name.clone(),
            previous: None,
            change_status: ChangeStatus::New,
        })
    }
}

/// The type carried by request extractors such as `Path<u64>` or `Json<NewUser>`.
fn unwrap_extractors<'t>(ty: &'t TypeShape, extractors: &[String]) -> &'t TypeShape {
    match ty {
        TypeShape::Generic { name, args } if extractors.iter().any(|e| e == name) => args
            .first()
            .map(|inner| unwrap_extractors(inner, extractors))
            .unwrap_or(ty),
        _ => ty,
    }
}

/// Canonical type of a parameter; arrays and collections document their element as a list.
fn param_type_name(ty: &TypeShape, collections: &[String]) -> String {
    let (element, is_list) = match ty {
        TypeShape::Array { component } => (Some(component.as_ref()), true),
        TypeShape::Generic { name, args } if type_normalizer::is_collection(name, collections) => {
            (args.first(), true)
        }
        TypeShape::Scalar { name } if type_normalizer::is_collection(name, collections) => {
            (None, true)
        }
        other => (Some(other), false),
    };

    let canonical = element
        .map(|element| type_normalizer::canonical_with(element, collections))
        .unwrap_or_else(|| OBJECT.to_string());
    if is_list {
        type_normalizer::list_of(&canonical)
    } else {
        canonical
    }
}

/// Builds request records for the methods of one controller.
pub struct MemberExtractor<'a> {
    pub config: &'a DocsConfig,
    pub baseline: &'a Baseline,
    pub resolver: &'a dyn StructureResolver,
    pub hooks: &'a [Box<dyn MethodHook>],
}

impl MemberExtractor<'_> {
    /// Whether a public method is documented
    pub fn is_eligible(&self, method: &MethodDecl, controller: &ControllerRecord) -> bool {
        method.has_attribute(&self.config.marker) || controller.documented || self.config.auto_generate
    }

    /// Appends a record for every eligible public method, in declaration order.
    ///
    /// Methods failing with a method-local error are logged and skipped; any other
    /// error aborts the controller.
    pub fn extract(
        &self,
        class: &ClassDecl,
        mut controller: ControllerRecord,
    ) -> Result<ControllerRecord> {
        for method in class.public_methods() {
            match self.extract_method(class, method, &controller) {
                Ok(Some(request)) => controller.requests.push(request),
                Ok(None) => {}
                Err(e @ Error::UnresolvedResponseType { .. }) => {
                    debug!("Skipping {}::{}: {}", class.name, method.name, e);
                }
                Err(e) if e.is_method_local() => {
                    warn!("Skipping {}::{}: {}", class.name, method.name, e);
                }
                Err(e) => return Err(e),
            }
        }
        Ok(controller)
    }

    /// Extracts one method; `Ok(None)` when it is not eligible.
    pub fn extract_method(
        &self,
        class: &ClassDecl,
        method: &MethodDecl,
        controller: &ControllerRecord,
    ) -> Result<Option<RequestRecord>> {
        if !self.is_eligible(method, controller) {
            return Ok(None);
        }
        debug!("Extracting {}::{}", class.name, method.name);

        let mut builder = RequestBuilder::new(&method.name, controller)
            .with_deprecation(method)
            .with_doc(method, self.config)
            .with_signature(method, self.config);

        if let Some(marker) = method.attribute(&self.config.marker) {
            builder = builder.with_overrides(marker::resolve(&method.name, marker)?);
        }

        for hook in self.hooks {
            hook.after_method(&mut builder, method, controller);
        }

        let mut request = builder.build(method, controller, &class.file, self.resolver)?;
        let (status, previous) = change::classify(&request, self.baseline);
        request.change_status = status;
        request.previous = previous;
        Ok(Some(request))
    }
}
