//! Class-level metadata.

use crate::declaration::ClassDecl;
use crate::model::ControllerRecord;
use log::debug;

/// Fills package, documented flag, description and author of `record`.
///
/// Description precedence is `@description` tag, then the doc summary, then the
/// class name.
pub fn read_class(class: &ClassDecl, marker: &str, mut record: ControllerRecord) -> ControllerRecord {
    record.class_name = class.name.clone();
    record.package_name = class.package.clone();
    record.documented = class.has_attribute(marker);

    let doc = class.doc.as_ref();
    record.description = doc
        .and_then(|d| d.tag("description"))
        .map(|tag| tag.content.clone())
        .or_else(|| doc.map(|d| d.summary.clone()).filter(|s| !s.is_empty()))
        .unwrap_or_else(|| class.name.clone());
    record.author = doc.and_then(|d| d.tag("author")).map(|tag| tag.content.clone());

    debug!(
        "Controller {} documented={} author={:?}",
        record.class_name, record.documented, record.author
    );
    record
}
