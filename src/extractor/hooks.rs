//! Extension points for framework conventions.
//!
//! Hooks receive the in-progress records with full mutable access and run in the
//! order they were registered on the [`ControllerParser`](super::ControllerParser).

use super::member::RequestBuilder;
use crate::declaration::{ClassDecl, MethodDecl};
use crate::model::ControllerRecord;

/// Hook around class-level metadata extraction.
pub trait ControllerHook {
    /// Runs before class metadata is read
    fn before_controller(&self, _record: &mut ControllerRecord, _class: &ClassDecl) {}

    /// Runs after every request has been extracted
    fn after_controller(&self, _record: &mut ControllerRecord, _class: &ClassDecl) {}
}

/// Hook run for each request after marker overrides and before response resolution.
pub trait MethodHook {
    fn after_method(
        &self,
        builder: &mut RequestBuilder,
        method: &MethodDecl,
        controller: &ControllerRecord,
    );
}
