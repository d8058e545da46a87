//! Classification of extracted requests against a previous snapshot.

use crate::model::{ChangeStatus, ControllerRecord, PreviousRequest, RequestRecord};
use log::debug;
use serde::Serialize;

/// Controllers produced by a previous run, looked up by request URL.
#[derive(Debug, Clone, Default)]
pub struct Baseline {
    controllers: Vec<ControllerRecord>,
}

impl Baseline {
    pub fn new(controllers: Vec<ControllerRecord>) -> Self {
        Self { controllers }
    }

    /// Baseline without any previous controllers
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.controllers.is_empty()
    }

    pub fn controllers(&self) -> &[ControllerRecord] {
        &self.controllers
    }

    /// Finds the first previous request with exactly this URL.
    ///
    /// Controllers and their requests are scanned in input order. When several
    /// previous requests share the URL only the first one is returned.
    pub fn find_by_url(&self, url: &str) -> Option<PreviousRequest> {
        let mut matches = self.controllers.iter().enumerate().flat_map(|(ci, controller)| {
            controller
                .requests
                .iter()
                .enumerate()
                .filter(move |(_, request)| request.url == url)
                .map(move |(ri, _)| PreviousRequest {
                    controller_index: ci,
                    request_index: ri,
                })
        });

        let first = matches.next()?;
        let duplicates = matches.count();
        if duplicates > 0 {
            debug!(
                "URL {} matches {} previous requests, using the first one",
                url,
                duplicates + 1
            );
        }
        Some(first)
    }

    /// Resolves a locator returned by [`Baseline::find_by_url`]
    pub fn request(&self, previous: PreviousRequest) -> Option<&RequestRecord> {
        self.controllers
            .get(previous.controller_index)?
            .requests
            .get(previous.request_index)
    }
}

/// Classifies `current` against the baseline.
///
/// Returns the status together with the matched previous request, if any.
pub fn classify(
    current: &RequestRecord,
    baseline: &Baseline,
) -> (ChangeStatus, Option<PreviousRequest>) {
    let Some(previous) = baseline.find_by_url(&current.url) else {
        return (ChangeStatus::New, None);
    };
    let Some(previous_request) = baseline.request(previous) else {
        return (ChangeStatus::New, None);
    };

    let status = if is_unchanged(previous_request, current) {
        ChangeStatus::Unchanged
    } else {
        ChangeStatus::Modified
    };
    debug!("{} {} is {:?}", current.method_name, current.url, status);
    (status, Some(previous))
}

fn is_unchanged(previous: &RequestRecord, current: &RequestRecord) -> bool {
    // A method set that only grew keeps older clients working
    let methods_kept = previous
        .methods
        .iter()
        .all(|method| current.methods.contains(method));

    methods_kept
        && structurally_equal(&previous.params, &current.params)
        && structurally_equal(&previous.headers, &current.headers)
        && structurally_equal(&previous.response.shape, &current.response.shape)
}

/// Compares two values through their serialized form.
fn structurally_equal<T: Serialize>(previous: &T, current: &T) -> bool {
    match (serde_json::to_value(previous), serde_json::to_value(current)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}
