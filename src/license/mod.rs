//! License metadata helpers.
//!
//! - [`spdx`]: maps SPDX identifiers to a [`SourceType`](crate::models::SourceType)
//!   and normalizes common non-SPDX license names.

pub mod spdx;
