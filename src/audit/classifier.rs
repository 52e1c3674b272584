use serde::Serialize;

use crate::models::{Dependency, License, Status};
use crate::policy::{AllowListEntry, PolicyIndex};
use crate::version::Version;

/// Audit outcome for one dependency, borrowing from the policy it came from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassificationResult<'p> {
    pub status: Status,
    /// `None` only for [`Status::Unlisted`].
    pub license: Option<&'p License>,
    /// Allow-list entry the dependency matched, for diagnostics.
    #[serde(skip)]
    pub entry: Option<&'p AllowListEntry>,
}

/// Classify `dep` against `policy`.
///
/// Pure: the same dependency and policy always give the same result.
pub fn classify<'p>(dep: &Dependency, policy: &'p PolicyIndex) -> ClassificationResult<'p> {
    let Some(entry) = policy.lookup(&dep.key) else {
        return ClassificationResult {
            status: Status::Unlisted,
            license: None,
            entry: None,
        };
    };

    let license = policy.resolve_license(entry.license_ref.as_deref());
    let status = if entry.range.contains(&Version::parse(&dep.version)) {
        Status::Ok
    } else {
        Status::WrongVersion
    };

    ClassificationResult {
        status,
        license: Some(license),
        entry: Some(entry),
    }
}
