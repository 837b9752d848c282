//! License label extraction and risk classification.
//!
//! - [`classifier`]: pulls license labels out of trove classifiers and
//!   classifies resolved license strings into a [`LicenseRisk`](crate::models::LicenseRisk).
//! - [`spdx`]: maps trove labels and common spellings to SPDX identifiers,
//!   and SPDX identifiers to risk levels.

pub mod classifier;
pub mod spdx;
