//! Actix-Web routing conventions.
//!
//! ```text
//! #[scope("/api/users")]
//! impl UserController {
//!     #[get("/{id}")]
//!     pub async fn get(&self, auth: TypedHeader<Authorization>, id: u64) -> Json<User>;
//!
//!     #[route("/", method = "GET", method = "HEAD")]
//!     pub async fn list(&self) -> Json<Vec<User>>;
//! }
//! ```

use super::hooks::{ControllerHook, MethodHook};
use super::member::RequestBuilder;
use crate::declaration::{Attribute, ClassDecl, MethodDecl, TypeShape};
use crate::model::{ControllerRecord, HeaderRecord};
use log::debug;

/// HTTP methods with a dedicated route macro.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Patch,
    Options,
    Head,
}

impl HttpMethod {
    /// Upper-case method token
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Options => "OPTIONS",
            HttpMethod::Head => "HEAD",
        }
    }
}

/// Parameter wrappers that carry a request header
const HEADER_EXTRACTORS: &[&str] = &["TypedHeader", "Header"];

/// Hook applying `#[scope]`, route macros and typed header extractors.
#[derive(Debug, Default, Clone, Copy)]
pub struct RouteMacroHook;

impl ControllerHook for RouteMacroHook {
    fn before_controller(&self, record: &mut ControllerRecord, class: &ClassDecl) {
        if let Some(scope) = class.attribute("scope").and_then(Attribute::first_positional_str) {
            debug!("Controller {} is scoped at {}", class.name, scope);
            record.base_url = Some(scope.to_string());
        }
    }
}

impl MethodHook for RouteMacroHook {
    fn after_method(
        &self,
        builder: &mut RequestBuilder,
        method: &MethodDecl,
        controller: &ControllerRecord,
    ) {
        let scope = controller.base_url.as_deref().unwrap_or("");

        for attr in &method.attributes {
            if let Some((methods, path)) = parse_route_macro(attr) {
                builder.url = combine_paths(scope, &path);
                for token in methods {
                    builder.add_method(&token);
                }
                debug!("Route {} {:?} for {}", builder.url, builder.methods, method.name);
            }
        }

        for param in &method.params {
            let Some(header) = header_name(&param.ty) else {
                continue;
            };
            let description = method
                .doc
                .as_ref()
                .and_then(|doc| doc.param_tag(&param.name))
                .map(|tag| tag.content.clone())
                .unwrap_or_default();
            builder.add_header(HeaderRecord {
                name: header.to_string(),
                description,
            });
        }
    }
}

/// Parse a route macro attribute to extract HTTP methods and path
fn parse_route_macro(attr: &Attribute) -> Option<(Vec<String>, String)> {
    let path = attr.first_positional_str()?.to_string();

    if attr.name == "route" {
        let methods = attr.str_values("method").map(str::to_string).collect();
        return Some((methods, path));
    }

    let method = parse_http_method(&attr.name)?;
    Some((vec![method.as_str().to_string()], path))
}

/// Parse HTTP method from string
fn parse_http_method(method: &str) -> Option<HttpMethod> {
    match method.to_lowercase().as_str() {
        "get" => Some(HttpMethod::Get),
        "post" => Some(HttpMethod::Post),
        "put" => Some(HttpMethod::Put),
        "delete" => Some(HttpMethod::Delete),
        "patch" => Some(HttpMethod::Patch),
        "head" => Some(HttpMethod::Head),
        "options" => Some(HttpMethod::Options),
        _ => None,
    }
}

/// Combine scope and path, handling slashes correctly
fn combine_paths(scope: &str, path: &str) -> String {
    if scope.is_empty() {
        return path.to_string();
    }

    let scope = scope.trim_end_matches('/');
    let path = path.trim_start_matches('/');

    if path.is_empty() {
        scope.to_string()
    } else {
        format!("{}/{}", scope, path)
    }
}

/// Header type carried by `TypedHeader<T>` or `Header<T>`
fn header_name(ty: &TypeShape) -> Option<&str> {
    match ty {
        TypeShape::Generic { name, args } if HEADER_EXTRACTORS.contains(&name.as_str()) => {
            args.first().map(TypeShape::name)
        }
        _ => None,
    }
}
