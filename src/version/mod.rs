//! Version identifiers and Maven-style version ranges.
//!
//! - [`Version`]: dot-separated identifier compared component-wise, numeric
//!   first with a string fallback for qualifiers such as `RELEASE` or `jre`.
//! - [`range`]: `[1.0,2.0)`-style range expressions and membership tests.

pub mod range;

use std::cmp::Ordering;
use std::str::FromStr;

use serde::Serialize;

/// A parsed version identifier. The raw text is retained for display.
#[derive(Debug, Clone, Serialize)]
#[serde(transparent)]
pub struct Version {
    raw: String,
}

impl Version {
    pub fn parse(raw: &str) -> Self {
        Self {
            raw: raw.trim().to_string(),
        }
    }

    fn components(&self) -> Vec<&str> {
        self.raw.split('.').map(str::trim).collect()
    }

    /// Compare two versions component by component.
    ///
    /// A component pair is compared numerically when both sides are
    /// non-negative integers and as plain strings otherwise. The shorter
    /// version is padded with `0` against numeric components and with the
    /// empty string against everything else, so `1.2` equals `1.2.0` and
    /// `4.1.5` sorts before `4.1.5.RELEASE`.
    pub fn compare(&self, other: &Version) -> Ordering {
        let left = self.components();
        let right = other.components();
        let len = left.len().max(right.len());

        for i in 0..len {
            let ord = compare_component(left.get(i).copied(), right.get(i).copied());
            if ord != Ordering::Equal {
                return ord;
            }
        }
        Ordering::Equal
    }
}

fn compare_component(left: Option<&str>, right: Option<&str>) -> Ordering {
    match (left, right) {
        (Some(l), Some(r)) => match (numeric(l), numeric(r)) {
            (Some(a), Some(b)) => a.len().cmp(&b.len()).then_with(|| a.cmp(b)),
            _ => l.cmp(r),
        },
        (Some(l), None) => pad_against(l).reverse(),
        (None, Some(r)) => pad_against(r),
        (None, None) => Ordering::Equal,
    }
}

/// Ordering of a missing component relative to `present`.
fn pad_against(present: &str) -> Ordering {
    match numeric(present) {
        Some("") => Ordering::Equal,
        Some(_) => Ordering::Less,
        None => "".cmp(present),
    }
}

/// Digits of an all-digit component without leading zeros, so that two such
/// values order by length first and then byte-wise, at any magnitude.
fn numeric(component: &str) -> Option<&str> {
    if component.is_empty() || !component.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some(component.trim_start_matches('0'))
}

/// Equality under [`Version::compare`]. Padding makes it non-transitive for
/// versions with empty components (`1.2` equals both `1.2.` and `1.2.0`, which
/// differ from each other), so `Version` is not `Eq`.
impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.compare(other) == Ordering::Equal
    }
}

impl FromStr for Version {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Version::parse(s))
    }
}

impl std::fmt::Display for Version {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.raw)
    }
}
