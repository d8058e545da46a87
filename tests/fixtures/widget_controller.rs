use actix_web::HttpRequest;
use serde::Serialize;

#[derive(Serialize)]
pub struct WidgetDto {
    /// Widget id
    pub id: u64,
    pub name: String,
    pub tags: Vec<String>,
}

/// Widget endpoints.
///
/// @author platform-team
pub struct WidgetController;

impl WidgetController {
    /// Finds a widget.
    ///
    /// @param id {string} external widget id
    /// @param req the raw request
    #[api_doc(url = "/widgets", method = "GET", result = WidgetDto)]
    pub fn find(&self, req: HttpRequest, id: u64) -> String {
        format!("{}{}", req.path(), id)
    }

    /// Deletes widgets in bulk.
    ///
    /// @param ids ids to delete
    /// @param tags only widgets carrying one of these tags
    /// @author jane
    #[api_doc(url = "/widgets/bulk", method = "DELETE")]
    #[deprecated]
    pub fn remove_all(&self, ids: &[u64], tags: Vec<String>, force: bool) -> Vec<WidgetDto> {
        let _ = (ids, tags, force);
        Vec::new()
    }

    #[api_doc(WidgetDto)]
    pub fn latest(&self) {}

    #[api_doc(result = "WidgetDto")]
    pub fn broken(&self) -> WidgetDto {
        unimplemented!()
    }

    #[api_doc]
    pub fn ping(&self) {}

    pub fn undocumented(&self) -> String {
        String::new()
    }

    #[api_doc]
    fn helper(&self) -> String {
        String::new()
    }
}
