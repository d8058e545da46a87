use chrono::NaiveDate;
use std::collections::HashMap;

#[api_doc]
pub struct ReportController;

impl ReportController {
    pub fn daily(&self, day: NaiveDate) -> Vec<u32> {
        let _ = day;
        Vec::new()
    }

    pub fn totals(&self) -> HashMap<String, u64> {
        HashMap::new()
    }
}
