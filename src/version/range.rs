use std::cmp::Ordering;

use serde::Serialize;

use super::Version;

/// A single contiguous version interval. A missing bound is unbounded.
#[derive(Debug, Clone, PartialEq)]
pub struct Interval {
    pub lower: Option<Version>,
    pub lower_inclusive: bool,
    pub upper: Option<Version>,
    pub upper_inclusive: bool,
}

impl Interval {
    /// Interval accepting every version.
    pub fn unbounded() -> Self {
        Self {
            lower: None,
            lower_inclusive: false,
            upper: None,
            upper_inclusive: false,
        }
    }

    /// Interval accepting exactly `version`.
    pub fn exact(version: Version) -> Self {
        Self {
            lower: Some(version.clone()),
            lower_inclusive: true,
            upper: Some(version),
            upper_inclusive: true,
        }
    }

    pub fn contains(&self, version: &Version) -> bool {
        let above_lower = match &self.lower {
            None => true,
            Some(lower) => match version.compare(lower) {
                Ordering::Greater => true,
                Ordering::Equal => self.lower_inclusive,
                Ordering::Less => false,
            },
        };
        let below_upper = match &self.upper {
            None => true,
            Some(upper) => match version.compare(upper) {
                Ordering::Less => true,
                Ordering::Equal => self.upper_inclusive,
                Ordering::Greater => false,
            },
        };
        above_lower && below_upper
    }
}

/// A part of a range expression that does not follow the grammar.
///
/// The offending interval is replaced by one accepting any version, so an
/// anomaly never blocks an audit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
pub enum RangeAnomaly {
    #[error("unterminated interval `{0}`")]
    Unterminated(String),
    #[error("closing bracket without an opening one in `{0}`")]
    Unopened(String),
    #[error("interval `{0}` has more than two bounds")]
    TooManyBounds(String),
    #[error("interval `{0}` names no version")]
    EmptyExact(String),
    #[error("single-version interval `{0}` must use inclusive brackets")]
    ExclusiveExact(String),
    #[error("interval `{0}` cannot contain any version")]
    Unsatisfiable(String),
}

/// A union of [`Interval`]s parsed from a Maven-style range expression.
///
/// Grammar (whitespace between tokens is insignificant):
/// ```text
/// range    := interval ( "," interval )*
/// interval := ""                      any version
///           | V                       any version (bare version is a soft requirement)
///           | "[" V "]"               exactly V
///           | ( "[" | "(" ) V? "," V? ( "]" | ")" )
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct VersionRange {
    raw: String,
    intervals: Vec<Interval>,
    anomalies: Vec<RangeAnomaly>,
}

impl VersionRange {
    /// Parse a range expression. Never fails: see [`RangeAnomaly`].
    pub fn parse(expr: &str) -> Self {
        let mut intervals = Vec::new();
        let mut anomalies = Vec::new();
        let mut rest = expr.trim();

        loop {
            rest = rest.trim_start_matches(|c: char| c == ',' || c.is_whitespace());
            let Some(first) = rest.chars().next() else {
                break;
            };

            if first == '[' || first == '(' {
                let Some(close) = rest[1..].find([']', ')']).map(|i| i + 1) else {
                    anomalies.push(RangeAnomaly::Unterminated(rest.to_string()));
                    intervals.push(Interval::unbounded());
                    break;
                };
                let segment = &rest[..=close];
                match parse_interval(segment) {
                    Ok(interval) => intervals.push(interval),
                    Err(anomaly) => {
                        anomalies.push(anomaly);
                        intervals.push(Interval::unbounded());
                    }
                }
                rest = &rest[close + 1..];
            } else {
                // Bare version: accepted as "any version".
                let end = rest.find([',', '[', '(']).unwrap_or(rest.len());
                let token = rest[..end].trim();
                if token.contains([']', ')']) {
                    anomalies.push(RangeAnomaly::Unopened(token.to_string()));
                }
                intervals.push(Interval::unbounded());
                rest = &rest[end..];
            }
        }

        if intervals.is_empty() {
            intervals.push(Interval::unbounded());
        }

        for anomaly in &anomalies {
            tracing::warn!(range = expr, "{anomaly}; accepting any version for it");
        }

        Self {
            raw: expr.to_string(),
            intervals,
            anomalies,
        }
    }

    /// `true` if `version` falls into at least one interval.
    pub fn contains(&self, version: &Version) -> bool {
        self.intervals.iter().any(|i| i.contains(version))
    }

    /// The expression exactly as written in the policy.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn anomalies(&self) -> &[RangeAnomaly] {
        &self.anomalies
    }
}

impl std::fmt::Display for VersionRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.raw)
    }
}

/// Parse one bracketed segment such as `[1.0,2.0)`.
fn parse_interval(segment: &str) -> Result<Interval, RangeAnomaly> {
    let lower_inclusive = segment.starts_with('[');
    let upper_inclusive = segment.ends_with(']');
    let body = &segment[1..segment.len() - 1];

    // A nested opener means the previous interval was never closed.
    if body.contains(['[', '(']) {
        return Err(RangeAnomaly::Unterminated(segment.to_string()));
    }

    let bounds: Vec<&str> = body.split(',').map(str::trim).collect();
    match bounds.as_slice() {
        [single] => {
            if single.is_empty() {
                Err(RangeAnomaly::EmptyExact(segment.to_string()))
            } else if lower_inclusive && upper_inclusive {
                Ok(Interval::exact(Version::parse(single)))
            } else {
                Err(RangeAnomaly::ExclusiveExact(segment.to_string()))
            }
        }
        [lower, upper] => {
            let interval = Interval {
                lower: bound(lower),
                lower_inclusive,
                upper: bound(upper),
                upper_inclusive,
            };
            if let (Some(l), Some(u)) = (&interval.lower, &interval.upper) {
                let empty = match l.compare(u) {
                    Ordering::Greater => true,
                    Ordering::Equal => !(lower_inclusive && upper_inclusive),
                    Ordering::Less => false,
                };
                if empty {
                    return Err(RangeAnomaly::Unsatisfiable(segment.to_string()));
                }
            }
            Ok(interval)
        }
        _ => Err(RangeAnomaly::TooManyBounds(segment.to_string())),
    }
}

fn bound(raw: &str) -> Option<Version> {
    (!raw.is_empty()).then(|| Version::parse(raw))
}
